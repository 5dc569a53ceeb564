//! Preconditions checked before a round-trip is attempted.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::SyncConfig;

/// Reports whether the network is currently usable.
pub trait Connectivity: Send + Sync {
    fn is_online(&self) -> bool;
}

/// Reports whether the device holds usable credentials.
pub trait Credentials: Send + Sync {
    fn is_authenticated(&self) -> bool;
}

/// Connectivity assumed to be always present (native CLI).
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOnline;

impl Connectivity for AlwaysOnline {
    fn is_online(&self) -> bool {
        true
    }
}

/// Connectivity flag flipped by whoever observes the network.
#[derive(Debug)]
pub struct ConnectivityFlag(AtomicBool);

impl ConnectivityFlag {
    pub fn new(online: bool) -> Self {
        Self(AtomicBool::new(online))
    }

    pub fn set_online(&self, online: bool) {
        self.0.store(online, Ordering::SeqCst);
    }
}

impl Connectivity for ConnectivityFlag {
    fn is_online(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

impl Credentials for SyncConfig {
    fn is_authenticated(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.is_empty())
    }
}

/// Credentials that are present or absent for the lifetime of the process.
#[derive(Debug, Clone, Copy)]
pub struct StaticCredentials(pub bool);

impl Credentials for StaticCredentials {
    fn is_authenticated(&self) -> bool {
        self.0
    }
}

/// Why a round-trip was not attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Unauthenticated,
    Offline,
    InFlight,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Unauthenticated => write!(f, "not authenticated"),
            SkipReason::Offline => write!(f, "offline"),
            SkipReason::InFlight => write!(f, "sync already in progress"),
        }
    }
}
