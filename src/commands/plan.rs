use chrono::NaiveDate;
use clap::{Args, Subcommand};

use titantrack::models::{visible, Exercise, PlanExercise, WorkoutPlan, WorkoutSet};

use super::exercise::find_exercise;
use super::{
    confirm, exercise_name, find_by_id, parse_set, today, truncate, AppContext, CommandError,
    OutputFormat,
};

#[derive(Args)]
pub struct PlanCommand {
    #[command(subcommand)]
    pub command: PlanSubcommand,
}

#[derive(Subcommand)]
pub enum PlanSubcommand {
    /// List workout plans, newest first
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Earliest date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Latest date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Only plans not yet completed
        #[arg(long)]
        pending: bool,
    },

    /// Show a plan and its exercise blocks
    Show {
        /// Plan ID (or unique prefix)
        plan: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Create a workout plan
    Create {
        /// Plan title
        title: String,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<NaiveDate>,

        /// Tags (can be repeated)
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,
    },

    /// Add an exercise block to a plan
    AddExercise {
        /// Plan ID (or unique prefix)
        plan: String,

        /// Exercise ID or name
        exercise: String,

        /// Set as WEIGHT, WEIGHTxREPS or WEIGHTxREPS@RPE (can be repeated)
        #[arg(long = "set", value_name = "SET", value_parser = parse_set)]
        sets: Vec<WorkoutSet>,
    },

    /// Log every block of a plan and mark it completed
    Complete {
        /// Plan ID (or unique prefix)
        plan: String,

        /// Date the workout was done, defaults to today
        #[arg(long, short)]
        date: Option<NaiveDate>,

        /// Workout type recorded on the logged entries
        #[arg(long = "type", default_value = "Strength")]
        workout_type: String,
    },

    /// Delete a plan
    Delete {
        /// Plan ID (or unique prefix)
        plan: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl PlanCommand {
    pub async fn run(&self, ctx: &AppContext) -> Result<(), CommandError> {
        match &self.command {
            PlanSubcommand::List {
                format,
                from,
                to,
                pending,
            } => {
                ctx.refresh().await;
                let plans: Vec<WorkoutPlan> = ctx.store.read()?;
                let mut plans: Vec<&WorkoutPlan> = visible(&plans)
                    .filter(|p| from.map_or(true, |d| p.date >= d))
                    .filter(|p| to.map_or(true, |d| p.date <= d))
                    .filter(|p| !*pending || !p.is_completed)
                    .collect();
                plans.sort_by(|a, b| b.date.cmp(&a.date));

                if plans.is_empty() {
                    println!("No plans found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&plans)?);
                    }
                    OutputFormat::Text => {
                        println!(
                            "{:<36}  {:<10}  {:<24}  {:<9}  BLOCKS",
                            "ID", "DATE", "TITLE", "STATUS"
                        );
                        println!("{}", "-".repeat(95));
                        for plan in &plans {
                            println!(
                                "{:<36}  {:<10}  {:<24}  {:<9}  {}",
                                plan.id,
                                plan.date,
                                truncate(&plan.title, 24),
                                if plan.is_completed { "done" } else { "planned" },
                                plan.exercises.len()
                            );
                        }
                        println!("\nTotal: {} plan(s)", plans.len());
                    }
                }
                Ok(())
            }

            PlanSubcommand::Show { plan, format } => {
                ctx.refresh().await;
                let plans: Vec<WorkoutPlan> = ctx.store.read()?;
                let plan = find_by_id(&plans, plan)?;

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(plan)?);
                    }
                    OutputFormat::Text => {
                        let exercises: Vec<Exercise> = ctx.store.read()?;
                        print!("{}", plan);
                        for block in &plan.exercises {
                            println!("\n  {}", exercise_name(&exercises, &block.exercise_id));
                            for (i, set) in block.sets.iter().enumerate() {
                                println!("    {}. {}", i + 1, set);
                            }
                        }
                    }
                }
                Ok(())
            }

            PlanSubcommand::Create { title, date, tags } => {
                if title.trim().is_empty() {
                    return Err(CommandError::Invalid(
                        "Plan title cannot be empty".to_string(),
                    ));
                }

                let plan = WorkoutPlan::new(date.unwrap_or_else(today), title.trim())
                    .with_tags(tags.clone());
                let created = ctx.changes.create(plan)?;

                println!("Created plan:");
                print!("{}", created);
                println!("ID: {}", created.id);
                ctx.finish().await;
                Ok(())
            }

            PlanSubcommand::AddExercise {
                plan,
                exercise,
                sets,
            } => {
                let plans: Vec<WorkoutPlan> = ctx.store.read()?;
                let plan_id = find_by_id(&plans, plan)?.id.clone();

                let exercises: Vec<Exercise> = ctx.store.read()?;
                let exercise = find_exercise(&exercises, exercise)
                    .ok_or_else(|| CommandError::NotFound(format!("exercise '{}'", exercise)))?;

                let block = PlanExercise::new(exercise.id.clone(), sets.clone());
                let updated = ctx
                    .changes
                    .update::<WorkoutPlan, _>(&plan_id, |p| p.add_exercise(block))?
                    .ok_or_else(|| CommandError::NotFound(format!("plan '{}'", plan)))?;

                println!(
                    "Added {} ({} set(s)) to '{}'",
                    exercise.name,
                    sets.len(),
                    updated.title
                );
                ctx.finish().await;
                Ok(())
            }

            PlanSubcommand::Complete {
                plan,
                date,
                workout_type,
            } => {
                let plans: Vec<WorkoutPlan> = ctx.store.read()?;
                let found = find_by_id(&plans, plan)?;
                if found.is_completed {
                    println!("Plan '{}' is already completed; logging again.", found.title);
                }

                let entries = ctx
                    .changes
                    .complete_plan(&found.id, date.unwrap_or_else(today), workout_type)?
                    .ok_or_else(|| CommandError::NotFound(format!("plan '{}'", plan)))?;

                println!(
                    "Completed '{}': logged {} entr{}",
                    found.title,
                    entries.len(),
                    if entries.len() == 1 { "y" } else { "ies" }
                );
                ctx.finish().await;
                Ok(())
            }

            PlanSubcommand::Delete { plan, force } => {
                let plans: Vec<WorkoutPlan> = ctx.store.read()?;
                let found = find_by_id(&plans, plan)?;

                if !force && !confirm(&format!("Delete plan '{}' ({})?", found.title, found.date))? {
                    println!("Deletion cancelled.");
                    return Ok(());
                }

                ctx.changes.delete::<WorkoutPlan>(&found.id)?;
                println!("Deleted plan: {}", found.title);
                ctx.finish().await;
                Ok(())
            }
        }
    }
}
