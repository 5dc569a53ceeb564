//! On-device durable storage.
//!
//! The store holds the three synced collections plus sync metadata and
//! local-only settings, each under its own key.

mod backend;
mod error;
mod local;
mod metadata;

pub use backend::{FileBackend, KeyValueBackend, MemoryBackend};
pub use error::StoreError;
pub use local::{Applied, LocalStore, ReadMode, Snapshot, StoreKey, StoredCollection};
pub use metadata::{generate_device_id, SyncMetadata};
