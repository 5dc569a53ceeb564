//! Built-in exercise catalogue written on first run.

use super::exercise::Exercise;
use super::muscle_group::MuscleGroup;

pub fn seed_exercises() -> Vec<Exercise> {
    [
        ("1", "Barbell Bench Press", MuscleGroup::Chest, "Barbell"),
        ("10", "Incline Dumbbell Press", MuscleGroup::Chest, "Dumbbell"),
        ("2", "Barbell Back Squat", MuscleGroup::Legs, "Barbell"),
        ("8", "Bulgarian Split Squat", MuscleGroup::Legs, "Dumbbell"),
        ("13", "Romanian Deadlift", MuscleGroup::Legs, "Barbell"),
        ("3", "Conventional Deadlift", MuscleGroup::Back, "Barbell"),
        ("7", "Pull-up", MuscleGroup::Back, "Bodyweight"),
        ("9", "Barbell Row", MuscleGroup::Back, "Barbell"),
        ("4", "Dumbbell Shoulder Press", MuscleGroup::Shoulders, "Dumbbell"),
        ("11", "Dumbbell Lateral Raise", MuscleGroup::Shoulders, "Dumbbell"),
        ("6", "Dumbbell Biceps Curl", MuscleGroup::Arms, "Dumbbell"),
        ("12", "Cable Triceps Pushdown", MuscleGroup::Arms, "Cable"),
        ("5", "Running", MuscleGroup::Cardio, "Treadmill"),
        ("14", "Plank", MuscleGroup::Core, "Bodyweight"),
    ]
    .into_iter()
    .map(|(id, name, group, equipment)| Exercise::with_id(id, name, group, equipment))
    .collect()
}
