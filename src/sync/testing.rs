//! Test doubles shared by the sync tests.

use chrono::Utc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::error::SyncError;
use super::protocol::{SyncRequest, SyncResponse};
use super::transport::SyncTransport;

/// Echoes the request back as the authoritative state.
#[derive(Debug, Default)]
pub struct EchoTransport {
    calls: AtomicU32,
    in_flight: AtomicU32,
    max_in_flight: AtomicU32,
    fail: AtomicBool,
    delay: Duration,
    last_request: Mutex<Option<SyncRequest>>,
}

impl EchoTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> u32 {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<SyncRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

impl SyncTransport for EchoTransport {
    async fn reconcile(&self, request: &SyncRequest) -> Result<SyncResponse, SyncError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now_in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now_in_flight, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail.load(Ordering::SeqCst) {
            return Err(SyncError::Connection("connection refused".to_string()));
        }

        Ok(SyncResponse {
            server_time: Utc::now(),
            exercises: request.exercises.clone(),
            workout_plans: request.workout_plans.clone(),
            workout_entries: request.workout_entries.clone(),
            conflicts: vec![],
        })
    }
}
