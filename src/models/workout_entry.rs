use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::entity::{new_id, EntityKind, SyncEntity, SyncMeta};
use super::workout_set::WorkoutSet;

/// A logged workout for one exercise on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutEntry {
    pub id: String,
    pub date: NaiveDate,
    /// May point at an exercise that no longer exists; callers fall back to a placeholder.
    #[serde(alias = "exercise_id")]
    pub exercise_id: String,
    #[serde(alias = "workout_type")]
    pub workout_type: String,
    #[serde(default)]
    pub sets: Vec<WorkoutSet>,
    #[serde(default, alias = "plan_id", skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<String>,
    #[serde(flatten)]
    pub sync: SyncMeta,
}

impl WorkoutEntry {
    pub fn new(
        date: NaiveDate,
        exercise_id: impl Into<String>,
        workout_type: impl Into<String>,
    ) -> Self {
        Self {
            id: new_id(),
            date,
            exercise_id: exercise_id.into(),
            workout_type: workout_type.into(),
            sets: Vec::new(),
            plan_id: None,
            sync: SyncMeta::created_now(),
        }
    }

    pub fn with_sets(mut self, sets: Vec<WorkoutSet>) -> Self {
        self.sets = sets;
        self
    }

    pub fn with_plan_id(mut self, plan_id: impl Into<String>) -> Self {
        self.plan_id = Some(plan_id.into());
        self
    }

    /// Total weight moved across all sets (weight x reps, reps default to 1).
    pub fn volume(&self) -> f64 {
        self.sets
            .iter()
            .map(|s| s.weight * f64::from(s.reps.unwrap_or(1)))
            .sum()
    }
}

impl SyncEntity for WorkoutEntry {
    const KIND: EntityKind = EntityKind::WorkoutEntry;

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

impl fmt::Display for WorkoutEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({} set(s))", self.date, self.workout_type, self.sets.len())?;
        if let Some(plan_id) = &self.plan_id {
            write!(f, " from plan {}", plan_id)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 2).unwrap()
    }

    #[test]
    fn test_entry_new() {
        let entry = WorkoutEntry::new(date(), "2", "Strength");

        assert_eq!(entry.exercise_id, "2");
        assert!(entry.plan_id.is_none());
        assert!(entry.sets.is_empty());
    }

    #[test]
    fn test_entry_volume() {
        let entry = WorkoutEntry::new(date(), "2", "Strength").with_sets(vec![
            WorkoutSet::new(100.0).with_reps(5),
            WorkoutSet::new(100.0).with_reps(5),
            WorkoutSet::new(20.0),
        ]);

        assert_eq!(entry.volume(), 1020.0);
    }

    #[test]
    fn test_entry_accepts_snake_case_fields() {
        let json = r#"{
            "id": "e1",
            "date": "2026-01-02",
            "exercise_id": "missing-exercise",
            "workout_type": "Strength",
            "sets": [],
            "plan_id": null
        }"#;
        let entry: WorkoutEntry = serde_json::from_str(json).unwrap();

        assert_eq!(entry.exercise_id, "missing-exercise");
        assert!(entry.plan_id.is_none());
    }

    #[test]
    fn test_entry_json_omits_empty_plan() {
        let entry = WorkoutEntry::new(date(), "2", "Strength");
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["exerciseId"], "2");
        assert!(json.get("planId").is_none());
    }
}
