use clap::{Args, Subcommand};

use super::{confirm, AppContext, CommandError, OutputFormat};

#[derive(Args)]
pub struct DeviceCommand {
    #[command(subcommand)]
    pub command: DeviceSubcommand,
}

#[derive(Subcommand)]
pub enum DeviceSubcommand {
    /// Show this device's identity and last sync time
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Forget sync state (as on logout); a new device id is issued on next use
    Reset {
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl DeviceCommand {
    pub fn run(&self, ctx: &AppContext) -> Result<(), CommandError> {
        match &self.command {
            DeviceSubcommand::Show { format } => {
                let meta = ctx.store.sync_metadata()?;
                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&meta)?),
                    OutputFormat::Text => {
                        println!("Device ID: {}", meta.device_id);
                        match meta.last_sync_at {
                            Some(at) => println!("Last sync: {}", at.to_rfc3339()),
                            None => println!("Last sync: never"),
                        }
                        println!("Data dir:  {}", ctx.config.data_dir.value.display());
                    }
                }
                Ok(())
            }

            DeviceSubcommand::Reset { force } => {
                if !force && !confirm("Reset device identity and sync state?")? {
                    println!("Reset cancelled.");
                    return Ok(());
                }

                ctx.store.clear_sync_data()?;
                println!("Sync state cleared. Local workout data is kept.");
                Ok(())
            }
        }
    }
}
