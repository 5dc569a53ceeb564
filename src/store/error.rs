use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the on-device store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error for {0}: {1}")]
    Io(PathBuf, #[source] io::Error),

    #[error("Stored value for '{0}' is corrupt: {1}")]
    Corrupt(String, #[source] serde_json::Error),

    #[error("Failed to serialize '{0}': {1}")]
    Serialize(String, #[source] serde_json::Error),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Store lock poisoned")]
    Poisoned,
}
