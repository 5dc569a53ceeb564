use clap::{Args, Subcommand};

use titantrack::models::AiSettings;

use super::{AppContext, CommandError};

#[derive(Args)]
pub struct SettingsCommand {
    #[command(subcommand)]
    pub command: SettingsSubcommand,
}

#[derive(Subcommand)]
pub enum SettingsSubcommand {
    /// Show or set coaching-provider credentials (stored on this device only)
    Ai {
        /// Provider name, e.g. openai
        #[arg(long, requires = "api_key")]
        provider: Option<String>,

        /// Provider API key
        #[arg(long, requires = "provider")]
        api_key: Option<String>,

        /// Model name
        #[arg(long, requires = "provider")]
        model: Option<String>,
    },
}

impl SettingsCommand {
    pub fn run(&self, ctx: &AppContext) -> Result<(), CommandError> {
        match &self.command {
            SettingsSubcommand::Ai {
                provider,
                api_key,
                model,
            } => {
                if let (Some(provider), Some(api_key)) = (provider, api_key) {
                    let settings = AiSettings {
                        provider: provider.clone(),
                        api_key: api_key.clone(),
                        model: model.clone(),
                    };
                    ctx.changes.save_ai_settings(&settings)?;
                    println!("Saved AI settings for {}", settings.provider);
                    return Ok(());
                }

                match ctx.store.ai_settings()? {
                    Some(settings) => {
                        println!("Provider: {}", settings.provider);
                        println!("API key:  {}", settings.masked_key());
                        if let Some(model) = &settings.model {
                            println!("Model:    {}", model);
                        }
                    }
                    None => println!("No AI settings stored"),
                }
                Ok(())
            }
        }
    }
}
