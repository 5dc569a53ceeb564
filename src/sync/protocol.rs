//! Wire types for `POST /api/v1/sync`.
//!
//! Envelope fields are snake_case; entity bodies keep the camelCase model
//! shape (the server also accepts snake_case aliases).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{EntityKind, Exercise, WorkoutEntry, WorkoutPlan};

/// Everything the device holds, shipped in full on every round-trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncRequest {
    pub device_id: String,
    pub last_sync_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    #[serde(default)]
    pub workout_plans: Vec<WorkoutPlan>,
    #[serde(default)]
    pub workout_entries: Vec<WorkoutEntry>,
}

/// The authoritative collections after reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncResponse {
    pub server_time: DateTime<Utc>,
    pub exercises: Vec<Exercise>,
    pub workout_plans: Vec<WorkoutPlan>,
    pub workout_entries: Vec<WorkoutEntry>,
    #[serde(default)]
    pub conflicts: Vec<SyncConflict>,
}

/// Which side of a conflict was kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    ServerWins,
    ClientWins,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::ServerWins => write!(f, "server_wins"),
            Resolution::ClientWins => write!(f, "client_wins"),
        }
    }
}

/// An entity edited concurrently on the server and this device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncConflict {
    pub entity_type: EntityKind,
    #[serde(alias = "entity_id")]
    pub id: String,
    pub resolution: Resolution,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_version: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_version: Option<i64>,
}

impl fmt::Display for SyncConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.entity_type, self.id, self.resolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_envelope_is_snake_case() {
        let request = SyncRequest {
            device_id: "device-1".to_string(),
            last_sync_at: None,
            exercises: vec![],
            workout_plans: vec![],
            workout_entries: vec![],
        };
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["device_id"], "device-1");
        assert!(json["last_sync_at"].is_null());
        assert!(json["workout_plans"].is_array());
        assert!(json["workout_entries"].is_array());
    }

    #[test]
    fn test_response_without_conflicts() {
        let json = r#"{
            "server_time": "2026-01-01T10:00:00Z",
            "exercises": [],
            "workout_plans": [{"id": "p1", "date": "2026-01-01", "title": "Leg Day", "version": 2}],
            "workout_entries": []
        }"#;
        let response: SyncResponse = serde_json::from_str(json).unwrap();

        assert!(response.conflicts.is_empty());
        assert_eq!(response.workout_plans[0].sync.version, Some(2));
    }

    #[test]
    fn test_response_missing_collection_is_rejected() {
        let json = r#"{"server_time": "2026-01-01T10:00:00Z", "exercises": []}"#;
        assert!(serde_json::from_str::<SyncResponse>(json).is_err());
    }

    #[test]
    fn test_conflict_accepts_entity_id_alias() {
        let json = r#"{"entity_type": "workout_plan", "entity_id": "p1", "resolution": "server_wins"}"#;
        let conflict: SyncConflict = serde_json::from_str(json).unwrap();

        assert_eq!(conflict.entity_type, EntityKind::WorkoutPlan);
        assert_eq!(conflict.id, "p1");
        assert_eq!(conflict.resolution, Resolution::ServerWins);
        assert_eq!(conflict.to_string(), "workout_plan p1: server_wins");
    }
}
