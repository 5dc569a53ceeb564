use clap::{Args, Subcommand};

use titantrack::models::{visible, Exercise, MuscleGroup};

use super::{confirm, truncate, AppContext, CommandError, OutputFormat};

#[derive(Args)]
pub struct ExerciseCommand {
    #[command(subcommand)]
    pub command: ExerciseSubcommand,
}

#[derive(Subcommand)]
pub enum ExerciseSubcommand {
    /// List exercises
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Filter by muscle group
        #[arg(long)]
        muscle_group: Option<MuscleGroup>,
    },

    /// Add a custom exercise
    Add {
        /// Exercise name
        name: String,

        /// Muscle group (chest, back, legs, shoulders, arms, core, full-body, cardio)
        #[arg(long, short)]
        muscle_group: MuscleGroup,

        /// Equipment used
        #[arg(long, short, default_value = "Bodyweight")]
        equipment: String,

        /// Notes
        #[arg(long)]
        notes: Option<String>,

        /// Personal best
        #[arg(long)]
        personal_best: Option<f64>,
    },

    /// Update an exercise
    Update {
        /// Exercise ID or name
        identifier: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New muscle group
        #[arg(long)]
        muscle_group: Option<MuscleGroup>,

        /// New equipment
        #[arg(long)]
        equipment: Option<String>,

        /// New notes
        #[arg(long)]
        notes: Option<String>,

        /// New personal best
        #[arg(long)]
        personal_best: Option<f64>,
    },

    /// Delete an exercise
    Delete {
        /// Exercise ID or name
        identifier: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

/// Finds a live exercise by id, then by case-insensitive name.
pub(crate) fn find_exercise<'a>(exercises: &'a [Exercise], identifier: &str) -> Option<&'a Exercise> {
    visible(exercises)
        .find(|e| e.id == identifier)
        .or_else(|| visible(exercises).find(|e| e.name.eq_ignore_ascii_case(identifier)))
}

impl ExerciseCommand {
    pub async fn run(&self, ctx: &AppContext) -> Result<(), CommandError> {
        match &self.command {
            ExerciseSubcommand::List {
                format,
                muscle_group,
            } => {
                ctx.refresh().await;
                let exercises: Vec<Exercise> = ctx.store.read()?;
                let mut exercises: Vec<&Exercise> = visible(&exercises)
                    .filter(|e| muscle_group.map_or(true, |g| e.muscle_group == g))
                    .collect();
                exercises.sort_by_key(|e| e.name.to_lowercase());

                if exercises.is_empty() {
                    println!("No exercises found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&exercises)?);
                    }
                    OutputFormat::Text => {
                        println!("{:<36}  {:<28}  {:<10}  EQUIPMENT", "ID", "NAME", "GROUP");
                        println!("{}", "-".repeat(90));
                        for e in &exercises {
                            println!(
                                "{:<36}  {:<28}  {:<10}  {}",
                                e.id,
                                truncate(&e.name, 28),
                                e.muscle_group,
                                e.equipment
                            );
                        }
                        println!("\nTotal: {} exercise(s)", exercises.len());
                    }
                }
                Ok(())
            }

            ExerciseSubcommand::Add {
                name,
                muscle_group,
                equipment,
                notes,
                personal_best,
            } => {
                if name.trim().is_empty() {
                    return Err(CommandError::Invalid(
                        "Exercise name cannot be empty".to_string(),
                    ));
                }

                let mut exercise = Exercise::new(name.trim(), *muscle_group, equipment);
                if let Some(notes) = notes {
                    exercise = exercise.with_notes(notes);
                }
                if let Some(pb) = personal_best {
                    exercise = exercise.with_personal_best(*pb);
                }

                let created = ctx.changes.create(exercise)?;
                println!("Created exercise: {}", created);
                println!("ID: {}", created.id);
                ctx.finish().await;
                Ok(())
            }

            ExerciseSubcommand::Update {
                identifier,
                name,
                muscle_group,
                equipment,
                notes,
                personal_best,
            } => {
                let has_updates = name.is_some()
                    || muscle_group.is_some()
                    || equipment.is_some()
                    || notes.is_some()
                    || personal_best.is_some();
                if !has_updates {
                    return Err(CommandError::Invalid(
                        "Nothing to update. Provide at least one option.".to_string(),
                    ));
                }

                let exercises: Vec<Exercise> = ctx.store.read()?;
                let id = find_exercise(&exercises, identifier)
                    .map(|e| e.id.clone())
                    .ok_or_else(|| CommandError::NotFound(format!("exercise '{}'", identifier)))?;

                let updated = ctx
                    .changes
                    .update::<Exercise, _>(&id, |e| {
                        if let Some(name) = name {
                            e.name = name.clone();
                        }
                        if let Some(group) = muscle_group {
                            e.muscle_group = *group;
                        }
                        if let Some(equipment) = equipment {
                            e.equipment = equipment.clone();
                        }
                        if notes.is_some() {
                            e.notes = notes.clone();
                        }
                        if personal_best.is_some() {
                            e.personal_best = *personal_best;
                        }
                    })?
                    .ok_or_else(|| CommandError::NotFound(format!("exercise '{}'", identifier)))?;

                println!("Updated exercise: {}", updated);
                ctx.finish().await;
                Ok(())
            }

            ExerciseSubcommand::Delete { identifier, force } => {
                let exercises: Vec<Exercise> = ctx.store.read()?;
                let exercise = find_exercise(&exercises, identifier)
                    .cloned()
                    .ok_or_else(|| CommandError::NotFound(format!("exercise '{}'", identifier)))?;

                if !force && !confirm(&format!("Delete exercise '{}'?", exercise.name))? {
                    println!("Deletion cancelled.");
                    return Ok(());
                }

                ctx.changes.delete::<Exercise>(&exercise.id)?;
                println!("Deleted exercise: {}", exercise.name);
                ctx.finish().await;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_exercise_by_id_or_name() {
        let mut gone = Exercise::new("Old Curl", MuscleGroup::Arms, "Dumbbell");
        gone.sync.mark_deleted();
        let exercises = vec![
            Exercise::with_id("1", "Barbell Bench Press", MuscleGroup::Chest, "Barbell"),
            gone,
        ];

        assert_eq!(find_exercise(&exercises, "1").unwrap().id, "1");
        assert_eq!(
            find_exercise(&exercises, "barbell bench press").unwrap().id,
            "1"
        );
        assert!(find_exercise(&exercises, "Old Curl").is_none());
    }
}
