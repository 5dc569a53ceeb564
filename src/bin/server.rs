//! Titantrack sync server
//!
//! Reconciles full-collection uploads from devices and serves per-record CRUD.
//!
//! # Configuration
//!
//! Environment variables:
//! - `TITAN_PORT`: Port to listen on (default: 8000)
//! - `TITAN_DATABASE_PATH`: SQLite database (default: ~/.local/share/titantrack-server/titantrack.db)
//! - `TITAN_SERVER_CONFIG`: API key file (default: ~/.config/titantrack-server/config.yaml)
//!
//! # Key File Format
//!
//! ```yaml
//! api_keys:
//!   - key: "your-secret-key-here"
//!     user_id: "user1"
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use titantrack::server::{
    init_db, router, ApiKeyStore, AppState, ReconcileService, ServerRepository,
};

/// Server configuration
#[derive(Debug, Clone)]
struct Config {
    port: u16,
    database_path: PathBuf,
    config_path: PathBuf,
}

impl Config {
    fn from_env() -> Self {
        let port = std::env::var("TITAN_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8000);

        let database_path = std::env::var("TITAN_DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::data_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("titantrack-server")
                    .join("titantrack.db")
            });

        let config_path = std::env::var("TITAN_SERVER_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::config_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("titantrack-server")
                    .join("config.yaml")
            });

        Self {
            port,
            database_path,
            config_path,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "titantrack=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run(Config::from_env()).await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Database: {}", config.database_path.display());
    tracing::info!("Key file: {}", config.config_path.display());

    let pool = init_db(&config.database_path).await?;
    let api_keys = ApiKeyStore::load(&config.config_path);
    let state = AppState::new(api_keys, ReconcileService::new(ServerRepository::new(pool)));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state)).await?;
    Ok(())
}
