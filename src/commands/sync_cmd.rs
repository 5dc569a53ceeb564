//! Sync CLI commands for reconciling with the server.

use clap::{Args, Subcommand};

use titantrack::sync::{check_server, SyncOutcome};

use super::{AppContext, CommandError};

/// Sync with remote server
#[derive(Debug, Args)]
pub struct SyncCommand {
    #[command(subcommand)]
    command: Option<SyncSubcommand>,
}

#[derive(Debug, Subcommand)]
enum SyncSubcommand {
    /// Show sync configuration and server status
    Status,
}

impl SyncCommand {
    pub async fn run(&self, ctx: &AppContext) -> Result<(), CommandError> {
        match &self.command {
            None => self.sync(ctx).await,
            Some(SyncSubcommand::Status) => self.status(ctx).await,
        }
    }

    async fn sync(&self, ctx: &AppContext) -> Result<(), CommandError> {
        let service = ctx.service()?;

        println!("Syncing with server...");
        match service.sync_now().await {
            SyncOutcome::Synced { conflicts } => {
                for conflict in &conflicts {
                    println!("  ! conflict {}", conflict);
                }
                let snapshot = ctx.store.snapshot()?;
                println!(
                    "✓ synced ({} exercises, {} plans, {} entries)",
                    snapshot.exercises.len(),
                    snapshot.plans.len(),
                    snapshot.entries.len()
                );
                Ok(())
            }
            SyncOutcome::Failed(message) => {
                Err(CommandError::Invalid(format!("Sync failed: {}", message)))
            }
            outcome => {
                println!("Sync {}", outcome);
                Ok(())
            }
        }
    }

    async fn status(&self, ctx: &AppContext) -> Result<(), CommandError> {
        let config = &ctx.config;

        println!("Sync Configuration");
        println!("==================");
        println!();

        let meta = ctx.store.sync_metadata()?;
        println!("Device:    {}", meta.device_id);
        match meta.last_sync_at {
            Some(at) => println!("Last sync: {}", at.to_rfc3339()),
            None => println!("Last sync: never"),
        }
        println!();

        let (server_url, api_key) = match (&config.sync.server_url, &config.sync.api_key) {
            (Some(url), Some(key)) => (url, key),
            _ => {
                println!("Status: Not configured");
                println!();
                println!("To enable sync, add to your config file:");
                println!();
                println!("  sync:");
                println!("    server_url: \"http://localhost:8000\"");
                println!("    api_key: \"your-api-key\"");
                println!("    auto_sync: false");
                println!();
                println!("Or set environment variables:");
                println!("  TITAN_SYNC_URL");
                println!("  TITAN_SYNC_API_KEY");
                return Ok(());
            }
        };

        let key_prefix: String = api_key.chars().take(8).collect();
        println!("Server:    {}", server_url);
        println!("API Key:   {}...", key_prefix);
        println!(
            "Auto-sync: {}",
            if config.sync.auto_sync {
                "enabled"
            } else {
                "disabled"
            }
        );
        println!();

        print!("Server status: ");
        if check_server(server_url).await {
            println!("✓ reachable");
        } else {
            println!("✗ unreachable");
        }

        Ok(())
    }
}
