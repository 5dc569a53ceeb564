use chrono::NaiveDate;
use clap::{Args, Subcommand};

use titantrack::models::{visible, Exercise, WorkoutEntry, WorkoutPlan, WorkoutSet};

use super::exercise::find_exercise;
use super::{
    exercise_name, find_by_id, parse_set, today, truncate, AppContext, CommandError, OutputFormat,
};

#[derive(Args)]
pub struct LogCommand {
    #[command(subcommand)]
    pub command: LogSubcommand,
}

#[derive(Subcommand)]
pub enum LogSubcommand {
    /// Log a workout for one exercise
    Add {
        /// Exercise ID or name
        exercise: String,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<NaiveDate>,

        /// Workout type
        #[arg(long = "type", default_value = "Strength")]
        workout_type: String,

        /// Set as WEIGHT, WEIGHTxREPS or WEIGHTxREPS@RPE (can be repeated)
        #[arg(long = "set", value_name = "SET", value_parser = parse_set)]
        sets: Vec<WorkoutSet>,

        /// Duration in minutes (recorded as a single set)
        #[arg(long, conflicts_with = "sets")]
        minutes: Option<f64>,

        /// Distance in km, with --minutes
        #[arg(long, requires = "minutes")]
        distance: Option<f64>,

        /// Plan this entry belongs to
        #[arg(long)]
        plan: Option<String>,
    },

    /// List logged workouts, newest first
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Only entries on this date
        #[arg(long, short)]
        date: Option<NaiveDate>,

        /// Only entries for this exercise (ID or name)
        #[arg(long, short)]
        exercise: Option<String>,
    },
}

impl LogCommand {
    pub async fn run(&self, ctx: &AppContext) -> Result<(), CommandError> {
        match &self.command {
            LogSubcommand::Add {
                exercise,
                date,
                workout_type,
                sets,
                minutes,
                distance,
                plan,
            } => {
                let exercises: Vec<Exercise> = ctx.store.read()?;
                let exercise = find_exercise(&exercises, exercise)
                    .ok_or_else(|| CommandError::NotFound(format!("exercise '{}'", exercise)))?;

                let sets = match minutes {
                    Some(minutes) => {
                        let mut set = WorkoutSet::new(0.0).with_time_minutes(*minutes);
                        if let Some(km) = distance {
                            set = set.with_distance(*km);
                        }
                        vec![set.completed()]
                    }
                    None => sets.iter().cloned().map(WorkoutSet::completed).collect(),
                };
                if sets.is_empty() {
                    return Err(CommandError::Invalid(
                        "Provide at least one --set or --minutes".to_string(),
                    ));
                }

                let mut entry =
                    WorkoutEntry::new(date.unwrap_or_else(today), exercise.id.clone(), workout_type)
                        .with_sets(sets);
                if let Some(plan) = plan {
                    let plans: Vec<WorkoutPlan> = ctx.store.read()?;
                    entry = entry.with_plan_id(find_by_id(&plans, plan)?.id.clone());
                }

                let created = ctx.changes.create(entry)?;
                println!("Logged {}: {}", exercise.name, created);
                ctx.finish().await;
                Ok(())
            }

            LogSubcommand::List {
                format,
                date,
                exercise,
            } => {
                ctx.refresh().await;
                let exercises: Vec<Exercise> = ctx.store.read()?;
                let exercise_id = match exercise {
                    Some(identifier) => Some(
                        find_exercise(&exercises, identifier)
                            .map(|e| e.id.clone())
                            .ok_or_else(|| {
                                CommandError::NotFound(format!("exercise '{}'", identifier))
                            })?,
                    ),
                    None => None,
                };

                let entries: Vec<WorkoutEntry> = ctx.store.read()?;
                let mut entries: Vec<&WorkoutEntry> = visible(&entries)
                    .filter(|e| date.map_or(true, |d| e.date == d))
                    .filter(|e| exercise_id.as_ref().map_or(true, |id| &e.exercise_id == id))
                    .collect();
                entries.sort_by(|a, b| b.date.cmp(&a.date));

                if entries.is_empty() {
                    println!("No entries found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&entries)?);
                    }
                    OutputFormat::Text => {
                        println!(
                            "{:<10}  {:<28}  {:<10}  {:>8}  SETS",
                            "DATE", "EXERCISE", "TYPE", "VOLUME"
                        );
                        println!("{}", "-".repeat(80));
                        for entry in &entries {
                            let sets: Vec<String> = entry.sets.iter().map(|s| s.to_string()).collect();
                            println!(
                                "{:<10}  {:<28}  {:<10}  {:>8.1}  {}",
                                entry.date,
                                truncate(&exercise_name(&exercises, &entry.exercise_id), 28),
                                truncate(&entry.workout_type, 10),
                                entry.volume(),
                                sets.join(", ")
                            );
                        }
                        println!("\nTotal: {} entr{}", entries.len(), if entries.len() == 1 { "y" } else { "ies" });
                    }
                }
                Ok(())
            }
        }
    }
}
