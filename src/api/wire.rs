//! Wire shapes for the bulk CRUD endpoints.
//!
//! Top-level fields use snake_case (`muscle_group`, `is_completed`,
//! `exercise_id`); nested plan blocks and sets keep the model's shape.
//! Conversions to and from the in-memory model happen here and nowhere else.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::models::{
    Exercise, MuscleGroup, PlanExercise, SyncEntity, SyncMeta, WorkoutEntry, WorkoutPlan,
    WorkoutSet,
};

fn is_false(value: &bool) -> bool {
    !*value
}

/// Server bookkeeping as it appears on the CRUD wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_deleted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<&SyncMeta> for RecordMeta {
    fn from(meta: &SyncMeta) -> Self {
        Self {
            version: meta.version,
            updated_at: meta.updated_at,
            created_at: meta.created_at,
            is_deleted: meta.is_deleted,
            deleted_at: meta.deleted_at,
        }
    }
}

impl From<RecordMeta> for SyncMeta {
    fn from(meta: RecordMeta) -> Self {
        Self {
            version: meta.version,
            updated_at: meta.updated_at,
            created_at: meta.created_at,
            is_deleted: meta.is_deleted,
            deleted_at: meta.deleted_at,
            last_modified_by_device: None,
        }
    }
}

/// An entity exposed through the CRUD endpoints.
pub trait WireEntity: SyncEntity {
    type Record: Serialize + DeserializeOwned + Send + 'static;
    type Patch: Serialize + DeserializeOwned + Default + Send + 'static;

    /// Collection path under `/api/v1`.
    const PATH: &'static str;

    fn to_record(&self) -> Self::Record;

    fn from_record(record: Self::Record) -> Self;

    /// Applies the fields present in `patch`.
    fn apply_patch(&mut self, patch: Self::Patch);

    /// Presentation order for listings.
    fn sort(_records: &mut [Self]) {}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseRecord {
    pub id: String,
    pub name: String,
    pub muscle_group: MuscleGroup,
    pub equipment: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub personal_best: Option<f64>,
    #[serde(flatten)]
    pub meta: RecordMeta,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExercisePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muscle_group: Option<MuscleGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_best: Option<f64>,
}

impl WireEntity for Exercise {
    type Record = ExerciseRecord;
    type Patch = ExercisePatch;

    const PATH: &'static str = "exercises";

    fn to_record(&self) -> ExerciseRecord {
        ExerciseRecord {
            id: self.id.clone(),
            name: self.name.clone(),
            muscle_group: self.muscle_group,
            equipment: self.equipment.clone(),
            notes: self.notes.clone(),
            personal_best: self.personal_best,
            meta: RecordMeta::from(&self.sync),
        }
    }

    fn from_record(record: ExerciseRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            muscle_group: record.muscle_group,
            equipment: record.equipment,
            notes: record.notes,
            personal_best: record.personal_best,
            sync: record.meta.into(),
        }
    }

    fn apply_patch(&mut self, patch: ExercisePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(group) = patch.muscle_group {
            self.muscle_group = group;
        }
        if let Some(equipment) = patch.equipment {
            self.equipment = equipment;
        }
        if patch.notes.is_some() {
            self.notes = patch.notes;
        }
        if patch.personal_best.is_some() {
            self.personal_best = patch.personal_best;
        }
    }

    fn sort(records: &mut [Self]) {
        records.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRecord {
    pub id: String,
    pub date: NaiveDate,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub exercises: Vec<PlanExercise>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(flatten)]
    pub meta: RecordMeta,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercises: Option<Vec<PlanExercise>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
}

impl WireEntity for WorkoutPlan {
    type Record = PlanRecord;
    type Patch = PlanPatch;

    const PATH: &'static str = "plans";

    fn to_record(&self) -> PlanRecord {
        PlanRecord {
            id: self.id.clone(),
            date: self.date,
            title: self.title.clone(),
            tags: self.tags.clone(),
            exercises: self.exercises.clone(),
            is_completed: self.is_completed,
            meta: RecordMeta::from(&self.sync),
        }
    }

    fn from_record(record: PlanRecord) -> Self {
        Self {
            id: record.id,
            date: record.date,
            title: record.title,
            tags: record.tags,
            exercises: record.exercises,
            is_completed: record.is_completed,
            sync: record.meta.into(),
        }
    }

    fn apply_patch(&mut self, patch: PlanPatch) {
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(exercises) = patch.exercises {
            self.exercises = exercises;
        }
        if let Some(done) = patch.is_completed {
            self.is_completed = done;
        }
    }

    fn sort(records: &mut [Self]) {
        records.sort_by(|a, b| b.date.cmp(&a.date));
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub id: String,
    pub date: NaiveDate,
    pub exercise_id: String,
    pub workout_type: String,
    #[serde(default)]
    pub sets: Vec<WorkoutSet>,
    #[serde(default)]
    pub plan_id: Option<String>,
    #[serde(flatten)]
    pub meta: RecordMeta,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workout_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<Vec<WorkoutSet>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<String>,
}

impl WireEntity for WorkoutEntry {
    type Record = EntryRecord;
    type Patch = EntryPatch;

    const PATH: &'static str = "entries";

    fn to_record(&self) -> EntryRecord {
        EntryRecord {
            id: self.id.clone(),
            date: self.date,
            exercise_id: self.exercise_id.clone(),
            workout_type: self.workout_type.clone(),
            sets: self.sets.clone(),
            plan_id: self.plan_id.clone(),
            meta: RecordMeta::from(&self.sync),
        }
    }

    fn from_record(record: EntryRecord) -> Self {
        Self {
            id: record.id,
            date: record.date,
            exercise_id: record.exercise_id,
            workout_type: record.workout_type,
            sets: record.sets,
            plan_id: record.plan_id,
            sync: record.meta.into(),
        }
    }

    fn apply_patch(&mut self, patch: EntryPatch) {
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(exercise_id) = patch.exercise_id {
            self.exercise_id = exercise_id;
        }
        if let Some(workout_type) = patch.workout_type {
            self.workout_type = workout_type;
        }
        if let Some(sets) = patch.sets {
            self.sets = sets;
        }
        if patch.plan_id.is_some() {
            self.plan_id = patch.plan_id;
        }
    }

    fn sort(records: &mut [Self]) {
        records.sort_by(|a, b| b.date.cmp(&a.date));
    }
}
