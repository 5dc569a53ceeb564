//! Server half of a round-trip: merge a device's collections into the
//! user's stored state inside one transaction and answer with the result.

use chrono::Utc;
use sqlx::SqliteConnection;
use std::sync::Arc;
use tracing::{debug, info};

use super::error::{AppError, Result};
use super::reconcile::{merge, ConflictPolicy, LastWriteWins, MergeContext};
use super::storage::{load_all, upsert, ServerRepository};
use crate::models::SyncEntity;
use crate::sync::{SyncConflict, SyncRequest, SyncResponse};

#[derive(Clone)]
pub struct ReconcileService {
    repo: ServerRepository,
    policy: Arc<dyn ConflictPolicy>,
}

impl ReconcileService {
    pub fn new(repo: ServerRepository) -> Self {
        Self {
            repo,
            policy: Arc::new(LastWriteWins),
        }
    }

    pub fn with_policy(mut self, policy: Arc<dyn ConflictPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn repository(&self) -> &ServerRepository {
        &self.repo
    }

    pub async fn reconcile(&self, user_id: &str, request: SyncRequest) -> Result<SyncResponse> {
        let SyncRequest {
            device_id,
            last_sync_at,
            exercises,
            workout_plans,
            workout_entries,
        } = request;

        if device_id.trim().is_empty() {
            return Err(AppError::BadRequest("device_id is required".to_string()));
        }

        let now = Utc::now();
        let ctx = MergeContext {
            device_id: &device_id,
            last_sync_at,
            now,
            policy: self.policy.as_ref(),
        };

        let mut tx = self.repo.pool().begin().await?;
        let mut conflicts = Vec::new();

        let exercises = merge_collection(&mut tx, user_id, exercises, &ctx, &mut conflicts).await?;
        let workout_plans =
            merge_collection(&mut tx, user_id, workout_plans, &ctx, &mut conflicts).await?;
        let workout_entries =
            merge_collection(&mut tx, user_id, workout_entries, &ctx, &mut conflicts).await?;

        tx.commit().await?;

        info!(
            user_id,
            device_id = %device_id,
            exercises = exercises.len(),
            plans = workout_plans.len(),
            entries = workout_entries.len(),
            conflicts = conflicts.len(),
            "Reconciled"
        );

        Ok(SyncResponse {
            server_time: now,
            exercises,
            workout_plans,
            workout_entries,
            conflicts,
        })
    }
}

async fn merge_collection<T: SyncEntity>(
    conn: &mut SqliteConnection,
    user_id: &str,
    client: Vec<T>,
    ctx: &MergeContext<'_>,
    conflicts: &mut Vec<SyncConflict>,
) -> Result<Vec<T>> {
    let stored: Vec<T> = load_all(conn, user_id).await?;
    let result = merge(&stored, client, ctx);

    if result.skipped > 0 {
        debug!(kind = %T::KIND, skipped = result.skipped, "Skipped records without id");
    }
    for record in &result.writes {
        upsert(conn, user_id, record).await?;
    }
    conflicts.extend(result.conflicts);

    load_all(conn, user_id).await
}
