use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::entity::{new_id, EntityKind, SyncEntity, SyncMeta};
use super::workout_set::WorkoutSet;

/// One exercise block inside a plan.
///
/// The exercise is referenced by id and resolved at display time; a dangling
/// id is kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanExercise {
    #[serde(alias = "exercise_id")]
    pub exercise_id: String,
    #[serde(default)]
    pub sets: Vec<WorkoutSet>,
}

impl PlanExercise {
    pub fn new(exercise_id: impl Into<String>, sets: Vec<WorkoutSet>) -> Self {
        Self {
            exercise_id: exercise_id.into(),
            sets,
        }
    }
}

/// A workout scheduled for a calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPlan {
    pub id: String,
    pub date: NaiveDate,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub exercises: Vec<PlanExercise>,
    #[serde(default, alias = "is_completed")]
    pub is_completed: bool,
    #[serde(flatten)]
    pub sync: SyncMeta,
}

impl WorkoutPlan {
    pub fn new(date: NaiveDate, title: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            date,
            title: title.into(),
            tags: Vec::new(),
            exercises: Vec::new(),
            is_completed: false,
            sync: SyncMeta::created_now(),
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_exercises(mut self, exercises: Vec<PlanExercise>) -> Self {
        self.exercises = exercises;
        self
    }

    /// Appends an exercise block.
    pub fn add_exercise(&mut self, block: PlanExercise) {
        self.exercises.push(block);
        self.sync.touch();
    }

    /// Removes every block for the given exercise.
    pub fn remove_exercise(&mut self, exercise_id: &str) -> bool {
        let len_before = self.exercises.len();
        self.exercises.retain(|b| b.exercise_id != exercise_id);
        if self.exercises.len() != len_before {
            self.sync.touch();
            true
        } else {
            false
        }
    }

    /// Marks the plan as done. Completion is one-way; returns whether the flag flipped.
    pub fn mark_completed(&mut self) -> bool {
        if self.is_completed {
            return false;
        }
        self.is_completed = true;
        self.sync.touch();
        true
    }
}

impl SyncEntity for WorkoutPlan {
    const KIND: EntityKind = EntityKind::WorkoutPlan;

    fn id(&self) -> &str {
        &self.id
    }

    fn meta(&self) -> &SyncMeta {
        &self.sync
    }

    fn meta_mut(&mut self) -> &mut SyncMeta {
        &mut self.sync
    }
}

impl fmt::Display for WorkoutPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", "=".repeat(self.title.chars().count()))?;
        writeln!(f, "Date: {}", self.date)?;
        if !self.tags.is_empty() {
            writeln!(f, "Tags: {}", self.tags.join(", "))?;
        }
        writeln!(
            f,
            "Status: {}",
            if self.is_completed { "completed" } else { "planned" }
        )?;

        if !self.exercises.is_empty() {
            writeln!(f, "\nExercises: {} block(s)", self.exercises.len())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
    }

    #[test]
    fn test_plan_new() {
        let plan = WorkoutPlan::new(date(), "Leg Day");

        assert_eq!(plan.date, date());
        assert_eq!(plan.title, "Leg Day");
        assert!(!plan.is_completed);
        assert!(plan.exercises.is_empty());
        assert!(plan.sync.created_at.is_some());
    }

    #[test]
    fn test_mark_completed_only_once() {
        let mut plan = WorkoutPlan::new(date(), "Leg Day");

        assert!(plan.mark_completed());
        assert!(plan.is_completed);
        assert!(!plan.mark_completed());
        assert!(plan.is_completed);
    }

    #[test]
    fn test_remove_exercise() {
        let mut plan = WorkoutPlan::new(date(), "Push").with_exercises(vec![
            PlanExercise::new("1", vec![WorkoutSet::new(60.0).with_reps(8)]),
            PlanExercise::new("4", vec![]),
        ]);

        assert!(plan.remove_exercise("1"));
        assert_eq!(plan.exercises.len(), 1);
        assert!(!plan.remove_exercise("1"));
    }

    #[test]
    fn test_plan_json_shape() {
        let plan = WorkoutPlan::new(date(), "Pull")
            .with_tags(vec!["Back".to_string()])
            .with_exercises(vec![PlanExercise::new("7", vec![])]);
        let json = serde_json::to_value(&plan).unwrap();

        assert_eq!(json["date"], "2026-01-01");
        assert_eq!(json["exercises"][0]["exerciseId"], "7");
        assert_eq!(json["isCompleted"], false);
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_plan_reads_minimal_shape() {
        let json = r#"{"id": "p1", "date": "2026-01-05", "title": "Legs"}"#;
        let plan: WorkoutPlan = serde_json::from_str(json).unwrap();

        assert!(plan.tags.is_empty());
        assert!(!plan.is_completed);
        assert_eq!(plan.sync, SyncMeta::default());
    }

    #[test]
    fn test_plan_display() {
        let plan = WorkoutPlan::new(date(), "Leg Day");
        let output = format!("{}", plan);

        assert!(output.contains("Leg Day"));
        assert!(output.contains("2026-01-01"));
        assert!(output.contains("planned"));
    }
}
