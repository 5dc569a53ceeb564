//! HTTP surface of the sync server.
//!
//! - `GET /health`: liveness (no auth)
//! - `GET /api/v1/me`: the authenticated user
//! - `POST /api/v1/sync`: full-collection reconciliation
//! - `/api/v1/{exercises,plans,entries}`: per-record CRUD

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::auth::{auth_middleware, ApiKeyStore, AuthUser};
use super::error::{AppError, Result};
use super::service::ReconcileService;
use super::storage::ServerRepository;
use crate::api::WireEntity;
use crate::models::{Exercise, SyncEntity, WorkoutEntry, WorkoutPlan};
use crate::sync::{SyncRequest, SyncResponse};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub api_keys: Arc<ApiKeyStore>,
    pub reconcile: ReconcileService,
}

impl AppState {
    pub fn new(api_keys: ApiKeyStore, reconcile: ReconcileService) -> Self {
        Self {
            api_keys: Arc::new(api_keys),
            reconcile,
        }
    }

    fn repo(&self) -> &ServerRepository {
        self.reconcile.repository()
    }
}

pub fn router(state: AppState) -> Router {
    let public_routes = Router::new().route("/health", get(health));

    let api_routes = Router::new()
        .route("/me", get(me))
        .route("/sync", post(sync))
        .merge(crud_routes::<Exercise>())
        .merge(crud_routes::<WorkoutPlan>())
        .merge(crud_routes::<WorkoutEntry>())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

fn crud_routes<T: WireEntity>() -> Router<AppState> {
    let collection = format!("/{}", T::PATH);
    let item = format!("/{}/{{id}}", T::PATH);

    Router::new()
        .route(&collection, get(list_records::<T>).post(create_record::<T>))
        .route(
            &item,
            get(get_record::<T>)
                .put(update_record::<T>)
                .delete(delete_record::<T>),
        )
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct MeResponse {
    user_id: String,
}

async fn me(Extension(user): Extension<AuthUser>) -> Json<MeResponse> {
    Json(MeResponse {
        user_id: user.user_id,
    })
}

async fn sync(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<SyncRequest>,
) -> Result<Json<SyncResponse>> {
    let response = state.reconcile.reconcile(&user.user_id, request).await?;
    Ok(Json(response))
}

#[derive(Debug, Default, Deserialize)]
struct ListParams {
    #[serde(default)]
    include_deleted: bool,
}

fn not_found<T: SyncEntity>(id: &str) -> AppError {
    AppError::NotFound(format!("{} '{}' not found", T::KIND, id))
}

/// Stamps a server-side edit: bumps the version and `updated_at`.
fn stamp_edit<T: SyncEntity>(record: &mut T) {
    let meta = record.meta_mut();
    meta.version = Some(meta.version.unwrap_or(0) + 1);
    meta.updated_at = Some(Utc::now());
    meta.last_modified_by_device = None;
}

async fn list_records<T: WireEntity>(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<T::Record>>> {
    let mut records: Vec<T> = state
        .repo()
        .list(&user.user_id, params.include_deleted)
        .await?;
    T::sort(&mut records);
    Ok(Json(records.iter().map(T::to_record).collect()))
}

async fn get_record<T: WireEntity>(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<T::Record>> {
    let record: T = state
        .repo()
        .get(&user.user_id, &id)
        .await?
        .ok_or_else(|| not_found::<T>(&id))?;
    Ok(Json(record.to_record()))
}

async fn create_record<T: WireEntity>(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<T::Record>,
) -> Result<(StatusCode, Json<T::Record>)> {
    let mut record = T::from_record(body);
    if record.id().trim().is_empty() {
        return Err(AppError::BadRequest("id is required".to_string()));
    }

    let now = Utc::now();
    let meta = record.meta_mut();
    meta.version = Some(1);
    meta.created_at = Some(now);
    meta.updated_at = Some(now);
    meta.is_deleted = false;
    meta.deleted_at = None;
    meta.last_modified_by_device = None;

    state.repo().insert(&user.user_id, &record).await?;
    tracing::debug!(kind = %T::KIND, id = record.id(), "Created");

    Ok((StatusCode::CREATED, Json(record.to_record())))
}

async fn update_record<T: WireEntity>(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(patch): Json<T::Patch>,
) -> Result<Json<T::Record>> {
    let mut record: T = state
        .repo()
        .get(&user.user_id, &id)
        .await?
        .ok_or_else(|| not_found::<T>(&id))?;

    record.apply_patch(patch);
    stamp_edit(&mut record);
    state.repo().save(&user.user_id, &record).await?;

    Ok(Json(record.to_record()))
}

async fn delete_record<T: WireEntity>(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let mut record: T = state
        .repo()
        .get(&user.user_id, &id)
        .await?
        .ok_or_else(|| not_found::<T>(&id))?;

    record.meta_mut().mark_deleted();
    stamp_edit(&mut record);
    state.repo().save(&user.user_id, &record).await?;
    tracing::debug!(kind = %T::KIND, id = %id, "Deleted");

    Ok(StatusCode::NO_CONTENT)
}
