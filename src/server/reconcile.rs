//! The reconciliation engine.
//!
//! Pure and storage-agnostic: given the server's current records for one
//! collection and the full collection a device shipped, it decides which
//! client records to write and which conflicts to report.
//!
//! Versions are owned by the server. For each client record:
//!
//! | server copy | client version vs server | outcome |
//! |-------------|--------------------------|---------|
//! | none        | -                        | insert |
//! | present     | equal, same content      | nothing |
//! | present     | equal, changed           | apply |
//! | present     | older, edited since last sync | conflict, policy decides |
//! | present     | older, untouched         | server copy stands |
//! | present     | newer                    | apply |
//!
//! Referenced ids (exercise ids on entries and plans) are never checked.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::debug;

use crate::models::{SyncEntity, SyncMeta};
use crate::sync::{Resolution, SyncConflict};

/// Decides which side of a conflicting edit survives.
pub trait ConflictPolicy: Send + Sync {
    fn resolve(&self, server: &SyncMeta, client: &SyncMeta) -> Resolution;
}

/// Keeps whichever side has the later `updatedAt`. Ties go to the server.
#[derive(Debug, Clone, Copy, Default)]
pub struct LastWriteWins;

impl ConflictPolicy for LastWriteWins {
    fn resolve(&self, server: &SyncMeta, client: &SyncMeta) -> Resolution {
        match (client.updated_at, server.updated_at) {
            (Some(client_at), Some(server_at)) if client_at > server_at => Resolution::ClientWins,
            (Some(_), None) => Resolution::ClientWins,
            _ => Resolution::ServerWins,
        }
    }
}

/// The stored copy always wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServerWins;

impl ConflictPolicy for ServerWins {
    fn resolve(&self, _server: &SyncMeta, _client: &SyncMeta) -> Resolution {
        Resolution::ServerWins
    }
}

/// Who is syncing and when.
pub struct MergeContext<'a> {
    pub device_id: &'a str,
    pub last_sync_at: Option<DateTime<Utc>>,
    pub now: DateTime<Utc>,
    pub policy: &'a dyn ConflictPolicy,
}

/// Records to persist and conflicts to report for one collection.
#[derive(Debug, Clone)]
pub struct MergeResult<T> {
    pub writes: Vec<T>,
    pub conflicts: Vec<SyncConflict>,
    pub skipped: usize,
}

impl<T> Default for MergeResult<T> {
    fn default() -> Self {
        Self {
            writes: Vec::new(),
            conflicts: Vec::new(),
            skipped: 0,
        }
    }
}

fn edited_since(meta: &SyncMeta, last_sync_at: Option<DateTime<Utc>>) -> bool {
    match (meta.updated_at, last_sync_at) {
        (Some(updated), Some(last)) => updated > last,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

/// Stamps a client record that is about to replace the stored one.
fn accept<T: SyncEntity>(mut record: T, existing: Option<&T>, version: i64, ctx: &MergeContext) -> T {
    let created_at = existing
        .and_then(|e| e.meta().created_at)
        .or(record.meta().created_at)
        .unwrap_or(ctx.now);

    let meta = record.meta_mut();
    meta.version = Some(version);
    meta.updated_at = Some(ctx.now);
    meta.created_at = Some(created_at);
    meta.last_modified_by_device = Some(ctx.device_id.to_string());
    if meta.is_deleted {
        meta.deleted_at = meta.deleted_at.or(Some(ctx.now));
    } else {
        meta.deleted_at = None;
    }
    record
}

/// Merges a device's collection into the server's.
pub fn merge<T: SyncEntity>(server: &[T], client: Vec<T>, ctx: &MergeContext) -> MergeResult<T> {
    let mut current: HashMap<String, T> = server
        .iter()
        .map(|record| (record.id().to_string(), record.clone()))
        .collect();
    let mut written: Vec<String> = Vec::new();
    let mut result = MergeResult::default();

    for record in client {
        if record.id().is_empty() {
            result.skipped += 1;
            continue;
        }
        let id = record.id().to_string();
        let client_version = record.meta().version.unwrap_or(0);

        let accepted = match current.get(&id) {
            None => {
                let version = client_version.max(1);
                Some(accept(record, None, version, ctx))
            }
            Some(stored) => {
                let server_version = stored.meta().version.unwrap_or(1);

                if client_version > server_version {
                    Some(accept(record, Some(stored), client_version + 1, ctx))
                } else if record.same_content(stored) {
                    None
                } else if client_version == server_version {
                    Some(accept(record, Some(stored), server_version + 1, ctx))
                } else if edited_since(record.meta(), ctx.last_sync_at) {
                    let resolution = ctx.policy.resolve(stored.meta(), record.meta());
                    debug!(
                        kind = %T::KIND,
                        id = %id,
                        server_version,
                        client_version,
                        resolution = %resolution,
                        "Conflicting edit"
                    );
                    result.conflicts.push(SyncConflict {
                        entity_type: T::KIND,
                        id: id.clone(),
                        resolution,
                        server_version: Some(server_version),
                        client_version: record.meta().version,
                    });
                    match resolution {
                        Resolution::ClientWins => {
                            Some(accept(record, Some(stored), server_version + 1, ctx))
                        }
                        Resolution::ServerWins => None,
                    }
                } else {
                    None
                }
            }
        };

        if let Some(accepted) = accepted {
            if !written.contains(&id) {
                written.push(id.clone());
            }
            current.insert(id, accepted);
        }
    }

    result.writes = written
        .into_iter()
        .filter_map(|id| current.remove(&id))
        .collect();
    result
}
