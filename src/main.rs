use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{
    AppContext, CommandError, ConfigCommand, DeviceCommand, ExerciseCommand, LogCommand,
    PlanCommand, RemoteCommand, SettingsCommand, SyncCommand,
};
use titantrack::config::Config;

#[derive(Parser)]
#[command(name = "titantrack")]
#[command(version)]
#[command(about = "An offline-first workout tracker", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage exercises
    Exercise(ExerciseCommand),

    /// Manage workout plans
    Plan(PlanCommand),

    /// Log and review workouts
    Log(LogCommand),

    /// Sync with the server
    Sync(SyncCommand),

    /// Show or reset this device's sync identity
    Device(DeviceCommand),

    /// Inspect data held on the server
    Remote(RemoteCommand),

    /// Local-only settings
    Settings(SettingsCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "titantrack=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CommandError> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.clone())?;

    let Some(command) = cli.command else {
        println!("Use --help to see available commands");
        return Ok(());
    };

    if let Commands::Config(cmd) = &command {
        return cmd.run(&config, cli.config.as_deref());
    }

    let ctx = AppContext::new(config)?;

    match command {
        Commands::Exercise(cmd) => cmd.run(&ctx).await,
        Commands::Plan(cmd) => cmd.run(&ctx).await,
        Commands::Log(cmd) => cmd.run(&ctx).await,
        Commands::Sync(cmd) => cmd.run(&ctx).await,
        Commands::Device(cmd) => cmd.run(&ctx),
        Commands::Remote(cmd) => cmd.run(&ctx).await,
        Commands::Settings(cmd) => cmd.run(&ctx),
        Commands::Config(cmd) => cmd.run(&ctx.config, None),
    }
}
