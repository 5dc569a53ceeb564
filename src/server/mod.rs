//! Sync server: API-key auth, SQLite storage, reconciliation and HTTP routes.

pub mod auth;
pub mod error;
pub mod reconcile;
pub mod routes;
pub mod service;
pub mod storage;

pub use auth::{ApiKeyEntry, ApiKeyStore, AuthUser};
pub use error::AppError;
pub use reconcile::{ConflictPolicy, LastWriteWins, ServerWins};
pub use routes::{router, AppState};
pub use service::ReconcileService;
pub use storage::{init_db, ServerRepository};
