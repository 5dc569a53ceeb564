//! Read-only views of what the server holds, bypassing the local store.

use clap::{Args, Subcommand, ValueEnum};

use titantrack::api::DataClient;
use titantrack::models::{Exercise, SyncEntity, WorkoutEntry, WorkoutPlan};

use super::{truncate, AppContext, CommandError, OutputFormat};

#[derive(Clone, Copy, ValueEnum)]
pub enum Collection {
    Exercises,
    Plans,
    Entries,
}

#[derive(Args)]
pub struct RemoteCommand {
    #[command(subcommand)]
    pub command: RemoteSubcommand,
}

#[derive(Subcommand)]
pub enum RemoteSubcommand {
    /// List one collection straight from the server
    List {
        /// Collection to list
        #[arg(value_enum)]
        collection: Collection,

        /// Include deleted records
        #[arg(long)]
        include_deleted: bool,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show record counts on the server
    Summary,
}

impl RemoteCommand {
    pub async fn run(&self, ctx: &AppContext) -> Result<(), CommandError> {
        let client = DataClient::from_config(&ctx.config.sync)?;

        match &self.command {
            RemoteSubcommand::List {
                collection,
                include_deleted,
                format,
            } => {
                match collection {
                    Collection::Exercises => {
                        let items = client.list::<Exercise>(*include_deleted).await?;
                        print_rows(format, &items, |e| {
                            format!("{:<36}  {:<28}  {}", e.id, truncate(&e.name, 28), e.muscle_group)
                        })?;
                    }
                    Collection::Plans => {
                        let items = client.list::<WorkoutPlan>(*include_deleted).await?;
                        print_rows(format, &items, |p| {
                            format!("{:<36}  {:<10}  {}", p.id, p.date, p.title)
                        })?;
                    }
                    Collection::Entries => {
                        let items = client.list::<WorkoutEntry>(*include_deleted).await?;
                        print_rows(format, &items, |e| {
                            format!("{:<36}  {:<10}  {}", e.id, e.date, e.workout_type)
                        })?;
                    }
                }
                Ok(())
            }

            RemoteSubcommand::Summary => {
                let data = client.fetch_all().await?;
                println!("Exercises: {}", data.exercises.len());
                println!("Plans:     {}", data.plans.len());
                println!("Entries:   {}", data.entries.len());
                Ok(())
            }
        }
    }
}

fn print_rows<T, F>(format: &OutputFormat, items: &[T], row: F) -> Result<(), CommandError>
where
    T: SyncEntity,
    F: Fn(&T) -> String,
{
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(items)?),
        OutputFormat::Text => {
            if items.is_empty() {
                println!("No records on server");
                return Ok(());
            }
            for item in items {
                let marker = if item.is_deleted() { " (deleted)" } else { "" };
                println!("{}{}", row(item), marker);
            }
            println!("\nTotal: {}", items.len());
        }
    }
    Ok(())
}
