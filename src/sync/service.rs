//! One reconciliation round-trip and the application of its result.
//!
//! The client ships its entire local collections and overwrites them with
//! whatever the server returns. It never merges on its own.

use chrono::Utc;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::gate::{Connectivity, Credentials, SkipReason};
use super::protocol::{SyncConflict, SyncRequest};
use super::transport::SyncTransport;
use crate::store::{Applied, LocalStore};

/// Result of [`SyncService::sync_now`].
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// The response was applied and `lastSyncAt` advanced.
    Synced { conflicts: Vec<SyncConflict> },
    /// Preconditions were not met; nothing was sent.
    Skipped(SkipReason),
    /// The round-trip failed; local state is untouched.
    Failed(String),
    /// The store changed while the request was in flight. Local edits were
    /// kept on top of the response and `lastSyncAt` was not advanced.
    Superseded,
}

impl SyncOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SyncOutcome::Synced { .. })
    }
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncOutcome::Synced { conflicts } if conflicts.is_empty() => write!(f, "synced"),
            SyncOutcome::Synced { conflicts } => {
                write!(f, "synced ({} conflict(s) resolved)", conflicts.len())
            }
            SyncOutcome::Skipped(reason) => write!(f, "skipped: {}", reason),
            SyncOutcome::Failed(message) => write!(f, "failed: {}", message),
            SyncOutcome::Superseded => write!(f, "superseded by a local change"),
        }
    }
}

/// Clears the in-flight flag when the round-trip ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Runs reconciliation round-trips for one device.
pub struct SyncService<T> {
    store: Arc<LocalStore>,
    transport: T,
    connectivity: Arc<dyn Connectivity>,
    credentials: Arc<dyn Credentials>,
    staleness: Duration,
    in_flight: AtomicBool,
}

impl<T: SyncTransport> SyncService<T> {
    pub fn new(
        store: Arc<LocalStore>,
        transport: T,
        connectivity: Arc<dyn Connectivity>,
        credentials: Arc<dyn Credentials>,
    ) -> Self {
        Self {
            store,
            transport,
            connectivity,
            credentials,
            staleness: Duration::from_secs(300),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn with_staleness(mut self, staleness: Duration) -> Self {
        self.staleness = staleness;
        self
    }

    pub fn store(&self) -> &Arc<LocalStore> {
        &self.store
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn is_syncing(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// True if no sync has ever succeeded or the last one is older than the
    /// staleness window.
    pub fn needs_sync(&self) -> bool {
        let window = chrono::Duration::from_std(self.staleness)
            .unwrap_or_else(|_| chrono::Duration::minutes(5));
        match self.store.sync_metadata() {
            Ok(meta) => meta.is_stale(Utc::now(), window),
            Err(e) => {
                warn!(error = %e, "Could not read sync metadata");
                true
            }
        }
    }

    /// Performs one round-trip.
    pub async fn sync_now(&self) -> SyncOutcome {
        if !self.credentials.is_authenticated() {
            debug!("Skipping sync: not authenticated");
            return SyncOutcome::Skipped(SkipReason::Unauthenticated);
        }
        if !self.connectivity.is_online() {
            debug!("Skipping sync: offline");
            return SyncOutcome::Skipped(SkipReason::Offline);
        }
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Skipping sync: already in progress");
            return SyncOutcome::Skipped(SkipReason::InFlight);
        }
        let _in_flight = InFlight(&self.in_flight);

        let outcome = self.round_trip().await;
        match &outcome {
            SyncOutcome::Synced { conflicts } => {
                for conflict in conflicts {
                    info!(
                        entity_type = %conflict.entity_type,
                        id = %conflict.id,
                        resolution = %conflict.resolution,
                        "Conflict resolved by server"
                    );
                }
                info!(conflicts = conflicts.len(), "Sync complete");
            }
            SyncOutcome::Failed(message) => warn!(error = %message, "Sync failed"),
            SyncOutcome::Superseded => info!("Local changes made during sync, rebased onto response"),
            SyncOutcome::Skipped(_) => {}
        }
        outcome
    }

    async fn round_trip(&self) -> SyncOutcome {
        let (snapshot, meta) = match (self.store.snapshot(), self.store.sync_metadata()) {
            (Ok(snapshot), Ok(meta)) => (snapshot, meta),
            (Err(e), _) | (_, Err(e)) => return SyncOutcome::Failed(e.to_string()),
        };

        let request = SyncRequest {
            device_id: meta.device_id,
            last_sync_at: meta.last_sync_at,
            exercises: snapshot.exercises.clone(),
            workout_plans: snapshot.plans.clone(),
            workout_entries: snapshot.entries.clone(),
        };
        debug!(
            exercises = request.exercises.len(),
            plans = request.workout_plans.len(),
            entries = request.workout_entries.len(),
            "Starting sync"
        );

        let response = match self.transport.reconcile(&request).await {
            Ok(response) => response,
            Err(e) => return SyncOutcome::Failed(e.to_string()),
        };

        match self.store.apply_response(
            &snapshot,
            &response.exercises,
            &response.workout_plans,
            &response.workout_entries,
        ) {
            Ok(Applied::Replaced) => {}
            Ok(Applied::Rebased) => return SyncOutcome::Superseded,
            Err(e) => return SyncOutcome::Failed(e.to_string()),
        }

        if let Err(e) = self.store.set_last_sync_at(response.server_time) {
            return SyncOutcome::Failed(e.to_string());
        }

        SyncOutcome::Synced {
            conflicts: response.conflicts,
        }
    }
}
