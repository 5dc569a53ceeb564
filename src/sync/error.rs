use thiserror::Error;

use crate::store::StoreError;

/// Errors from a reconciliation round-trip.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Sync not configured. Add server_url and api_key to config.")]
    NotConfigured,

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Malformed server response: {0}")]
    Decode(String),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl SyncError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            SyncError::Connection(_) | SyncError::Timeout => true,
            SyncError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    pub(crate) fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SyncError::Timeout
        } else if e.is_decode() {
            SyncError::Decode(e.to_string())
        } else {
            SyncError::Connection(e.to_string())
        }
    }
}
