//! HTTP client for the per-record CRUD endpoints.
//!
//! This is the server-authoritative path: every call goes straight to the
//! server and nothing is cached locally.

use reqwest::Response;
use thiserror::Error;

use super::wire::WireEntity;
use crate::config::SyncConfig;
use crate::models::{Exercise, WorkoutEntry, WorkoutPlan};
use crate::sync::error_message;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Sync server not configured. Add server_url and api_key to config.")]
    NotConfigured,

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Every collection as the server currently holds it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemoteData {
    pub exercises: Vec<Exercise>,
    pub plans: Vec<WorkoutPlan>,
    pub entries: Vec<WorkoutEntry>,
}

#[derive(Debug, Clone)]
pub struct DataClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl DataClient {
    pub fn new(server_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: server_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(config: &SyncConfig) -> Result<Self> {
        match (&config.server_url, &config.api_key) {
            (Some(url), Some(key)) => Ok(Self::new(url, key)),
            _ => Err(ApiError::NotConfigured),
        }
    }

    fn collection_url<T: WireEntity>(&self) -> String {
        format!("{}/api/v1/{}", self.base_url, T::PATH)
    }

    fn item_url<T: WireEntity>(&self, id: &str) -> String {
        format!("{}/{}", self.collection_url::<T>(), id)
    }

    pub async fn list<T: WireEntity>(&self, include_deleted: bool) -> Result<Vec<T>> {
        let response = self
            .client
            .get(self.collection_url::<T>())
            .bearer_auth(&self.api_key)
            .query(&[("include_deleted", include_deleted)])
            .send()
            .await?;

        let records: Vec<T::Record> = check(response).await?.json().await?;
        Ok(records.into_iter().map(T::from_record).collect())
    }

    pub async fn get<T: WireEntity>(&self, id: &str) -> Result<T> {
        let response = self
            .client
            .get(self.item_url::<T>(id))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let record: T::Record = check(response).await?.json().await?;
        Ok(T::from_record(record))
    }

    /// Creates a record under its client-generated id.
    pub async fn create<T: WireEntity>(&self, record: &T) -> Result<T> {
        let response = self
            .client
            .post(self.collection_url::<T>())
            .bearer_auth(&self.api_key)
            .json(&record.to_record())
            .send()
            .await?;

        let created: T::Record = check(response).await?.json().await?;
        Ok(T::from_record(created))
    }

    pub async fn update<T: WireEntity>(&self, id: &str, patch: &T::Patch) -> Result<T> {
        let response = self
            .client
            .put(self.item_url::<T>(id))
            .bearer_auth(&self.api_key)
            .json(patch)
            .send()
            .await?;

        let updated: T::Record = check(response).await?.json().await?;
        Ok(T::from_record(updated))
    }

    pub async fn delete<T: WireEntity>(&self, id: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.item_url::<T>(id))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        check(response).await?;
        Ok(())
    }

    /// Fetches the live records of every collection concurrently.
    pub async fn fetch_all(&self) -> Result<RemoteData> {
        let (exercises, plans, entries) = tokio::try_join!(
            self.list::<Exercise>(false),
            self.list::<WorkoutPlan>(false),
            self.list::<WorkoutEntry>(false),
        )?;

        Ok(RemoteData {
            exercises,
            plans,
            entries,
        })
    }
}

async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = error_message(response).await;
    Err(match status.as_u16() {
        404 => ApiError::NotFound(message),
        409 => ApiError::AlreadyExists(message),
        status => ApiError::Status { status, message },
    })
}
