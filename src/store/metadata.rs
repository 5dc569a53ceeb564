use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Per-installation sync bookkeeping stored under `sync_metadata`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncMetadata {
    #[serde(alias = "device_id")]
    pub device_id: String,
    #[serde(default, alias = "last_sync_at")]
    pub last_sync_at: Option<DateTime<Utc>>,
}

impl SyncMetadata {
    /// Fresh metadata with a newly generated device identifier.
    pub fn generate() -> Self {
        Self {
            device_id: generate_device_id(),
            last_sync_at: None,
        }
    }

    /// True when no sync has ever succeeded or the last one is older than `window`.
    pub fn is_stale(&self, now: DateTime<Utc>, window: Duration) -> bool {
        match self.last_sync_at {
            None => true,
            Some(last) => now - last > window,
        }
    }
}

/// Generates a random device identifier.
pub fn generate_device_id() -> String {
    format!("device-{}", uuid::Uuid::new_v4())
}
