use clap::{Args, Subcommand};
use std::fs;
use std::path::Path;

use titantrack::config::{Config, ConfigSource};

use super::{CommandError, OutputFormat};

const TEMPLATE: &str = r#"# titantrack configuration

# Where workout data is stored (default: platform data dir + titantrack)
# data_dir: ~/.local/share/titantrack

sync:
  # server_url: http://localhost:8000
  # api_key: your-secret-key-here
  auto_sync: false
  debounce_secs: 5
  staleness_secs: 300
  timeout_secs: 30
  max_attempts: 3
"#;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Write a starter config file
    Init {
        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,
    },
}

impl ConfigCommand {
    /// `requested` is the `--config` path, if one was given.
    pub fn run(&self, config: &Config, requested: Option<&Path>) -> Result<(), CommandError> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(config)?),
                    OutputFormat::Text => {
                        match &config.config_file {
                            Some(path) => println!("Config file: {}", path.display()),
                            None => println!(
                                "Config file: {} (not found)",
                                requested
                                    .map(Path::to_path_buf)
                                    .unwrap_or_else(Config::default_config_path)
                                    .display()
                            ),
                        }
                        println!();
                        for (name, value) in describe(config) {
                            println!("{:<20} {}", name, value);
                        }
                    }
                }
                Ok(())
            }

            ConfigSubcommand::Init { force } => {
                let path = requested
                    .map(Path::to_path_buf)
                    .unwrap_or_else(Config::default_config_path);
                if write_template(&path, *force)? {
                    println!("Created config file: {}", path.display());
                    println!("\nSet sync.server_url and sync.api_key to enable sync.");
                } else {
                    println!("Config file already exists: {}", path.display());
                    println!("Use --force to overwrite it.");
                }
                Ok(())
            }
        }
    }
}

/// One `(name, value)` row per setting. The API key is never printed.
fn describe(config: &Config) -> Vec<(&'static str, String)> {
    let sync = &config.sync;
    let data_dir = match &config.data_dir.source {
        ConfigSource::Default => config.data_dir.value.display().to_string(),
        source => format!("{} ({})", config.data_dir.value.display(), source),
    };

    vec![
        ("data_dir", data_dir),
        (
            "sync.server_url",
            sync.server_url.clone().unwrap_or_else(|| "(not set)".to_string()),
        ),
        (
            "sync.api_key",
            if sync.api_key.is_some() { "(set)" } else { "(not set)" }.to_string(),
        ),
        ("sync.auto_sync", sync.auto_sync.to_string()),
        ("sync.debounce", format!("{}s", sync.debounce_secs)),
        ("sync.staleness", format!("{}s", sync.staleness_secs)),
        ("sync.timeout", format!("{}s", sync.timeout_secs)),
        ("sync.max_attempts", sync.max_attempts.to_string()),
    ]
}

/// Returns false, without writing, if the file exists and `force` is off.
fn write_template(path: &Path, force: bool) -> Result<bool, CommandError> {
    if path.exists() && !force {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, TEMPLATE)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_template_loads_with_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.yaml");

        assert!(write_template(&path, false).unwrap());
        let config = Config::load(Some(path.clone())).unwrap();

        assert_eq!(config.config_file, Some(path));
        assert!(!config.sync.auto_sync);
        assert_eq!(config.sync.max_attempts, 3);
    }

    #[test]
    fn test_init_keeps_existing_file_without_force() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(&path, "data_dir: /tmp/mine\n").unwrap();

        assert!(!write_template(&path, false).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "data_dir: /tmp/mine\n");

        assert!(write_template(&path, true).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), TEMPLATE);
    }

    #[test]
    fn test_describe_hides_api_key() {
        let mut config = Config::load(Some(TempDir::new().unwrap().path().join("none.yaml"))).unwrap();
        config.sync.api_key = Some("secret".to_string());

        let rows = describe(&config);

        assert!(rows.iter().all(|(_, value)| !value.contains("secret")));
        let (_, key) = rows.iter().find(|(name, _)| *name == "sync.api_key").unwrap();
        assert_eq!(key, "(set)");
    }
}
