mod config_cmd;
mod context;
mod device;
mod exercise;
mod log;
mod plan;
mod remote;
mod settings;
mod sync_cmd;

use chrono::{Local, NaiveDate};
use clap::ValueEnum;
use std::io::{self, Write};

use titantrack::api::ApiError;
use titantrack::config::ConfigError;
use titantrack::models::{visible, Exercise, SyncEntity, WorkoutSet};
use titantrack::store::StoreError;
use titantrack::sync::SyncError;

pub use config_cmd::ConfigCommand;
pub use context::AppContext;
pub use device::DeviceCommand;
pub use exercise::ExerciseCommand;
pub use log::LogCommand;
pub use plan::PlanCommand;
pub use remote::RemoteCommand;
pub use settings::SettingsCommand;
pub use sync_cmd::SyncCommand;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Errors from CLI commands
#[derive(Debug)]
pub enum CommandError {
    Config(ConfigError),
    Store(StoreError),
    Sync(SyncError),
    Api(ApiError),
    Json(serde_json::Error),
    Io(io::Error),
    NotFound(String),
    Invalid(String),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::Config(e) => write!(f, "{}", e),
            CommandError::Store(e) => write!(f, "{}", e),
            CommandError::Sync(e) => write!(f, "{}", e),
            CommandError::Api(e) => write!(f, "{}", e),
            CommandError::Json(e) => write!(f, "JSON error: {}", e),
            CommandError::Io(e) => write!(f, "IO error: {}", e),
            CommandError::NotFound(what) => write!(f, "Not found: {}", what),
            CommandError::Invalid(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandError::Config(e) => Some(e),
            CommandError::Store(e) => Some(e),
            CommandError::Sync(e) => Some(e),
            CommandError::Api(e) => Some(e),
            CommandError::Json(e) => Some(e),
            CommandError::Io(e) => Some(e),
            CommandError::NotFound(_) | CommandError::Invalid(_) => None,
        }
    }
}

impl From<ConfigError> for CommandError {
    fn from(e: ConfigError) -> Self {
        CommandError::Config(e)
    }
}

impl From<StoreError> for CommandError {
    fn from(e: StoreError) -> Self {
        CommandError::Store(e)
    }
}

impl From<SyncError> for CommandError {
    fn from(e: SyncError) -> Self {
        CommandError::Sync(e)
    }
}

impl From<ApiError> for CommandError {
    fn from(e: ApiError) -> Self {
        CommandError::Api(e)
    }
}

impl From<serde_json::Error> for CommandError {
    fn from(e: serde_json::Error) -> Self {
        CommandError::Json(e)
    }
}

impl From<io::Error> for CommandError {
    fn from(e: io::Error) -> Self {
        CommandError::Io(e)
    }
}

/// Parses a set written as `WEIGHT`, `WEIGHTxREPS` or `WEIGHTxREPS@RPE`.
pub(crate) fn parse_set(s: &str) -> Result<WorkoutSet, String> {
    let invalid = || format!("Invalid set '{}'. Use WEIGHT, WEIGHTxREPS or WEIGHTxREPS@RPE", s);

    let (body, rpe) = match s.split_once('@') {
        Some((body, rpe)) => (body, Some(rpe.trim().parse::<f64>().map_err(|_| invalid())?)),
        None => (s, None),
    };

    let mut set = match body.to_lowercase().split_once('x') {
        Some((weight, reps)) => {
            let weight: f64 = weight.trim().parse().map_err(|_| invalid())?;
            let reps: u32 = reps.trim().parse().map_err(|_| invalid())?;
            WorkoutSet::new(weight).with_reps(reps)
        }
        None => WorkoutSet::new(body.trim().parse().map_err(|_| invalid())?),
    };

    if let Some(rpe) = rpe {
        set = set.with_rpe(rpe);
    }
    Ok(set)
}

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Asks a yes/no question on stdin. Anything but `y` is a no.
pub(crate) fn confirm(prompt: &str) -> Result<bool, CommandError> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

/// Finds a live record by full id or unique id prefix.
pub(crate) fn find_by_id<'a, T: SyncEntity>(
    items: &'a [T],
    id: &str,
) -> Result<&'a T, CommandError> {
    if let Some(item) = visible(items).find(|item| item.id() == id) {
        return Ok(item);
    }

    let mut matches = visible(items).filter(|item| item.id().starts_with(id));
    match (matches.next(), matches.next()) {
        (Some(item), None) if !id.is_empty() => Ok(item),
        (Some(_), Some(_)) => Err(CommandError::Invalid(format!(
            "Ambiguous {} id '{}'",
            T::KIND,
            id
        ))),
        _ => Err(CommandError::NotFound(format!("{} '{}'", T::KIND, id))),
    }
}

/// Display name of an exercise. References to missing exercises are kept,
/// so this falls back to a placeholder.
pub(crate) fn exercise_name(exercises: &[Exercise], id: &str) -> String {
    exercises
        .iter()
        .find(|e| e.id == id)
        .map(|e| e.name.clone())
        .unwrap_or_else(|| format!("Unknown exercise ({})", id))
}

/// Shortens `s` to `width` characters for table output.
pub(crate) fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let head: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}
