mod entity;
mod exercise;
mod muscle_group;
mod seed;
mod settings;
mod workout_entry;
mod workout_plan;
mod workout_set;

pub use entity::{find_visible, new_id, visible, EntityKind, SyncEntity, SyncMeta};
pub use exercise::Exercise;
pub use muscle_group::MuscleGroup;
pub use seed::seed_exercises;
pub use settings::AiSettings;
pub use workout_entry::WorkoutEntry;
pub use workout_plan::{PlanExercise, WorkoutPlan};
pub use workout_set::WorkoutSet;
