use serde::{Deserialize, Serialize};
use std::fmt;

use super::entity::{new_id, EntityKind, SyncEntity, SyncMeta};
use super::muscle_group::MuscleGroup;

/// An exercise definition that plans and log entries point at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    pub name: String,
    #[serde(alias = "muscle_group")]
    pub muscle_group: MuscleGroup,
    pub equipment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, alias = "personal_best", skip_serializing_if = "Option::is_none")]
    pub personal_best: Option<f64>,
    #[serde(flatten)]
    pub sync: SyncMeta,
}

impl Exercise {
    pub fn new(
        name: impl Into<String>,
        muscle_group: MuscleGroup,
        equipment: impl Into<String>,
    ) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            muscle_group,
            equipment: equipment.into(),
            notes: None,
            personal_best: None,
            sync: SyncMeta::created_now(),
        }
    }

    /// Builds a record with a fixed id and no sync history (used for seed data).
    pub fn with_id(
        id: impl Into<String>,
        name: impl Into<String>,
        muscle_group: MuscleGroup,
        equipment: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            muscle_group,
            equipment: equipment.into(),
            notes: None,
            personal_best: None,
            sync: SyncMeta::default(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_personal_best(mut self, personal_best: f64) -> Self {
        self.personal_best = Some(personal_best);
        self
    }
}

impl SyncEntity for Exercise {
    const KIND: EntityKind = EntityKind::Exercise;

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

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] ({})", self.name, self.muscle_group, self.equipment)?;
        if let Some(pb) = self.personal_best {
            write!(f, " PB {}", pb)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exercise_new() {
        let exercise = Exercise::new("Back Squat", MuscleGroup::Legs, "Barbell");

        assert_eq!(exercise.name, "Back Squat");
        assert_eq!(exercise.muscle_group, MuscleGroup::Legs);
        assert!(exercise.notes.is_none());
        assert!(exercise.sync.updated_at.is_some());
        assert!(exercise.sync.version.is_none());
        assert!(!exercise.sync.is_deleted);
    }

    #[test]
    fn test_exercise_json_is_camel_case() {
        let exercise =
            Exercise::with_id("1", "Bench Press", MuscleGroup::Chest, "Barbell").with_personal_best(100.0);
        let json = serde_json::to_value(&exercise).unwrap();

        assert_eq!(json["muscleGroup"], "Chest");
        assert_eq!(json["personalBest"], 100.0);
        assert!(json.get("notes").is_none());
        assert!(json.get("isDeleted").is_none());
    }

    #[test]
    fn test_exercise_reads_server_shape() {
        let json = r#"{
            "id": "ex-1",
            "name": "Plank",
            "muscleGroup": "Core",
            "equipment": "Bodyweight",
            "notes": null,
            "personalBest": null,
            "version": 4,
            "updatedAt": "2026-01-03T10:00:00Z",
            "createdAt": "2026-01-01T10:00:00Z",
            "isDeleted": false
        }"#;
        let exercise: Exercise = serde_json::from_str(json).unwrap();

        assert_eq!(exercise.id, "ex-1");
        assert_eq!(exercise.sync.version, Some(4));
        assert!(exercise.notes.is_none());
    }

    #[test]
    fn test_same_content_ignores_bookkeeping() {
        let a = Exercise::with_id("1", "Row", MuscleGroup::Back, "Barbell");
        let mut b = a.clone();
        b.sync.version = Some(7);
        b.sync.touch();

        assert!(a.same_content(&b));

        b.sync.mark_deleted();
        assert!(!a.same_content(&b));
    }
}
