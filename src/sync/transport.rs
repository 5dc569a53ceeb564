//! HTTP transport for reconciliation round-trips.
//!
//! Every request carries an explicit deadline. Transient failures
//! (connection errors, timeouts and 5xx responses) are retried with
//! exponential backoff plus jitter; anything else fails immediately.

use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use super::error::SyncError;
use super::protocol::{SyncRequest, SyncResponse};
use crate::config::SyncConfig;

/// Performs one reconciliation round-trip against the remote endpoint.
pub trait SyncTransport: Send + Sync {
    fn reconcile(
        &self,
        request: &SyncRequest,
    ) -> impl Future<Output = Result<SyncResponse, SyncError>> + Send;
}

/// Bounded exponential backoff.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay before the given retry (1-based), with up to 50% added jitter.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exp = self
            .base_delay
            .saturating_mul(2u32.saturating_pow(retry.saturating_sub(1)))
            .min(self.max_delay);
        let jitter_ms = (exp.as_millis() as u64) / 2;
        let jitter = if jitter_ms > 0 {
            rand::rng().random_range(0..=jitter_ms)
        } else {
            0
        };
        exp + Duration::from_millis(jitter)
    }
}

/// Runs `op` until it succeeds, fails permanently, or runs out of attempts.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, SyncError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SyncError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < max_attempts => {
                let delay = policy.delay_for(attempt);
                warn!(
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Sync request failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Reconciliation over `POST /api/v1/sync` with a bearer token.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    server_url: String,
    api_key: String,
    timeout: Duration,
    retry: RetryPolicy,
}

impl HttpTransport {
    pub fn new(server_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            server_url: server_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
        }
    }

    /// Creates a transport from config.
    ///
    /// Returns an error if sync is not configured.
    pub fn from_config(config: &SyncConfig) -> Result<Self, SyncError> {
        let server_url = config.server_url.clone().ok_or(SyncError::NotConfigured)?;
        let api_key = config.api_key.clone().ok_or(SyncError::NotConfigured)?;

        Ok(Self::new(server_url, api_key)
            .with_timeout(config.timeout())
            .with_retry(RetryPolicy {
                max_attempts: config.max_attempts,
                ..RetryPolicy::default()
            }))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.server_url, path)
    }

    /// Checks that the server answers `GET /health`.
    pub async fn health_check(&self) -> bool {
        probe(&self.client, &self.url("/health"), self.timeout).await
    }

    async fn send_once(&self, request: &SyncRequest) -> Result<SyncResponse, SyncError> {
        let response = self
            .client
            .post(self.url("/api/v1/sync"))
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(request)
            .send()
            .await
            .map_err(SyncError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Status {
                status: status.as_u16(),
                message: error_message(response).await,
            });
        }

        let body = response.bytes().await.map_err(SyncError::from_reqwest)?;
        serde_json::from_slice(&body).map_err(|e| SyncError::Decode(e.to_string()))
    }
}

impl SyncTransport for HttpTransport {
    async fn reconcile(&self, request: &SyncRequest) -> Result<SyncResponse, SyncError> {
        debug!(url = %self.server_url, device_id = %request.device_id, "Sending sync request");
        with_retry(&self.retry, || self.send_once(request)).await
    }
}

/// Extracts `message` from a `{error, message}` body, falling back to the raw text.
pub(crate) async fn error_message(response: reqwest::Response) -> String {
    let fallback = response
        .status()
        .canonical_reason()
        .unwrap_or("Unknown error")
        .to_string();

    let text = match response.text().await {
        Ok(text) if !text.is_empty() => text,
        _ => return fallback,
    };

    match serde_json::from_str::<serde_json::Value>(&text) {
        Ok(body) => body["message"]
            .as_str()
            .map(str::to_string)
            .unwrap_or(text),
        Err(_) => text,
    }
}

async fn probe(client: &reqwest::Client, url: &str, timeout: Duration) -> bool {
    match client.get(url).timeout(timeout).send().await {
        Ok(response) => response.status().is_success(),
        Err(e) => {
            debug!(url, error = %e, "Server probe failed");
            false
        }
    }
}

/// Checks whether a sync server is reachable at `server_url`.
pub async fn check_server(server_url: &str) -> bool {
    let url = format!("{}/health", server_url.trim_end_matches('/'));
    probe(&reqwest::Client::new(), &url, Duration::from_secs(5)).await
}
