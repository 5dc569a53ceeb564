//! Client-side synchronization.
//!
//! Local mutations flow through the [`ChangeAccumulator`], which persists
//! them and pokes the [`SyncScheduler`]. The scheduler debounces bursts and
//! hands off to the [`SyncService`], which performs one full-collection
//! round-trip over a [`SyncTransport`] and overwrites local state with the
//! server's answer.

mod accumulator;
mod error;
mod gate;
mod protocol;
mod scheduler;
mod service;
#[cfg(test)]
pub(crate) mod testing;
mod transport;

pub use accumulator::{ChangeAccumulator, SyncTrigger};
pub use error::SyncError;
pub use gate::{
    AlwaysOnline, Connectivity, ConnectivityFlag, Credentials, SkipReason, StaticCredentials,
};
pub use protocol::{Resolution, SyncConflict, SyncRequest, SyncResponse};
pub use scheduler::{SchedulerState, SyncScheduler};
pub use service::{SyncOutcome, SyncService};
pub use transport::{check_server, with_retry, HttpTransport, RetryPolicy, SyncTransport};

pub(crate) use transport::error_message;
