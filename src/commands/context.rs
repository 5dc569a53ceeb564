use std::sync::Arc;
use tracing::{debug, warn};

use titantrack::config::Config;
use titantrack::store::LocalStore;
use titantrack::sync::{
    AlwaysOnline, ChangeAccumulator, HttpTransport, SyncError, SyncOutcome, SyncScheduler,
    SyncService,
};

use super::CommandError;

/// Wiring shared by every command: the local store, the accumulator that
/// records mutations, and (when sync is configured) the scheduler.
pub struct AppContext {
    pub config: Config,
    pub store: Arc<LocalStore>,
    pub changes: ChangeAccumulator,
    scheduler: Option<SyncScheduler<HttpTransport>>,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self, CommandError> {
        let store = Arc::new(LocalStore::open(config.data_dir.value.clone()));

        let scheduler = if config.sync.is_configured() {
            let transport = HttpTransport::from_config(&config.sync)?;
            let service = SyncService::new(
                store.clone(),
                transport,
                Arc::new(AlwaysOnline),
                Arc::new(config.sync.clone()),
            )
            .with_staleness(config.sync.staleness());
            Some(SyncScheduler::new(
                Arc::new(service),
                config.sync.debounce(),
            ))
        } else {
            None
        };

        let changes = match (&scheduler, config.sync.auto_sync) {
            (Some(scheduler), true) => {
                ChangeAccumulator::with_trigger(store.clone(), Arc::new(scheduler.clone()))
            }
            _ => ChangeAccumulator::new(store.clone()),
        };

        Ok(Self {
            config,
            store,
            changes,
            scheduler,
        })
    }

    pub fn service(&self) -> Result<&Arc<SyncService<HttpTransport>>, CommandError> {
        self.scheduler
            .as_ref()
            .map(SyncScheduler::service)
            .ok_or(CommandError::Sync(SyncError::NotConfigured))
    }

    /// Pulls from the server before a read if auto-sync is on and the last
    /// sync is stale. Failures only warn; reads always use local data.
    pub async fn refresh(&self) {
        let Some(scheduler) = self.auto_scheduler() else {
            return;
        };
        let service = scheduler.service();
        if !service.needs_sync() {
            debug!("Local data is fresh, skipping pre-read sync");
            return;
        }

        let outcome = service.sync_now().await;
        report(&outcome);
    }

    /// Runs the debounced sync scheduled by this command's writes before the
    /// process exits.
    pub async fn finish(&self) {
        let Some(scheduler) = self.auto_scheduler() else {
            return;
        };
        if let Some(outcome) = scheduler.flush().await {
            report(&outcome);
        }
    }

    fn auto_scheduler(&self) -> Option<&SyncScheduler<HttpTransport>> {
        if self.config.sync.auto_sync {
            self.scheduler.as_ref()
        } else {
            None
        }
    }
}

fn report(outcome: &SyncOutcome) {
    if let SyncOutcome::Failed(_) = outcome {
        warn!(%outcome, "Auto-sync");
        eprintln!("Warning: sync {}. Changes are saved locally.", outcome);
    } else {
        debug!(%outcome, "Auto-sync");
    }
}
