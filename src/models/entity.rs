//! Shared sync bookkeeping for every synced record.
//!
//! Each entity flattens a [`SyncMeta`] into its JSON shape, so the fields sit
//! next to the entity's own fields on the wire (`version`, `updatedAt`, ...).
//! The server owns `version`; the client only stamps `updatedAt` and the
//! deletion marker when it mutates something locally.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Generates a new client-side entity identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Sync bookkeeping carried by every entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(default, alias = "updated_at", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "created_at", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "is_deleted", skip_serializing_if = "is_false")]
    pub is_deleted: bool,
    #[serde(default, alias = "deleted_at", skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        alias = "last_modified_by_device",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_modified_by_device: Option<String>,
}

impl SyncMeta {
    /// Metadata for a record created locally right now.
    pub fn created_now() -> Self {
        let now = Utc::now();
        Self {
            created_at: Some(now),
            updated_at: Some(now),
            ..Self::default()
        }
    }

    /// Stamps a local edit.
    pub fn touch(&mut self) {
        let now = Utc::now();
        self.updated_at = Some(now);
        if self.created_at.is_none() {
            self.created_at = Some(now);
        }
    }

    /// Turns the record into a tombstone.
    pub fn mark_deleted(&mut self) {
        self.touch();
        self.is_deleted = true;
        self.deleted_at = self.updated_at;
    }
}

/// The three synced collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Exercise,
    WorkoutPlan,
    WorkoutEntry,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Exercise => "exercise",
            EntityKind::WorkoutPlan => "workout_plan",
            EntityKind::WorkoutEntry => "workout_entry",
        }
    }

    /// Server table holding this kind.
    pub fn table(&self) -> &'static str {
        match self {
            EntityKind::Exercise => "exercises",
            EntityKind::WorkoutPlan => "workout_plans",
            EntityKind::WorkoutEntry => "workout_entries",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exercise" | "exercises" => Ok(EntityKind::Exercise),
            "workout_plan" | "plan" | "plans" => Ok(EntityKind::WorkoutPlan),
            "workout_entry" | "entry" | "entries" => Ok(EntityKind::WorkoutEntry),
            _ => Err(format!("Unknown entity type '{}'", s)),
        }
    }
}

/// A record that takes part in reconciliation.
pub trait SyncEntity:
    Clone + PartialEq + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    const KIND: EntityKind;

    fn id(&self) -> &str;

    fn meta(&self) -> &SyncMeta;

    fn meta_mut(&mut self) -> &mut SyncMeta;

    fn is_deleted(&self) -> bool {
        self.meta().is_deleted
    }

    /// Compares user-visible content, ignoring server bookkeeping.
    ///
    /// The deletion marker counts as content: deleting a record is an edit.
    fn same_content(&self, other: &Self) -> bool {
        let mut a = self.clone();
        let mut b = other.clone();
        *a.meta_mut() = SyncMeta {
            is_deleted: self.is_deleted(),
            ..SyncMeta::default()
        };
        *b.meta_mut() = SyncMeta {
            is_deleted: other.is_deleted(),
            ..SyncMeta::default()
        };
        a == b
    }
}

/// Iterates over the records that have not been deleted.
pub fn visible<T: SyncEntity>(items: &[T]) -> impl Iterator<Item = &T> {
    items.iter().filter(|item| !item.is_deleted())
}

/// Finds a live record by id.
pub fn find_visible<'a, T: SyncEntity>(items: &'a [T], id: &str) -> Option<&'a T> {
    visible(items).find(|item| item.id() == id)
}
