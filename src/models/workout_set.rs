use serde::{Deserialize, Serialize};
use std::fmt;

use super::entity::new_id;

/// One set within a plan block or a logged entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSet {
    #[serde(default = "new_id")]
    pub id: String,
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
    #[serde(default, alias = "time_minutes", skip_serializing_if = "Option::is_none")]
    pub time_minutes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpe: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl WorkoutSet {
    pub fn new(weight: f64) -> Self {
        Self {
            id: new_id(),
            weight,
            reps: None,
            time_minutes: None,
            distance: None,
            rpe: None,
            notes: None,
            completed: None,
        }
    }

    pub fn with_reps(mut self, reps: u32) -> Self {
        self.reps = Some(reps);
        self
    }

    pub fn with_time_minutes(mut self, minutes: f64) -> Self {
        self.time_minutes = Some(minutes);
        self
    }

    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = Some(distance);
        self
    }

    pub fn with_rpe(mut self, rpe: f64) -> Self {
        self.rpe = Some(rpe);
        self
    }

    pub fn completed(mut self) -> Self {
        self.completed = Some(true);
        self
    }
}

impl fmt::Display for WorkoutSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}kg", self.weight)?;
        if let Some(reps) = self.reps {
            write!(f, " x {}", reps)?;
        }
        if let Some(minutes) = self.time_minutes {
            write!(f, " {}min", minutes)?;
        }
        if let Some(distance) = self.distance {
            write!(f, " {}km", distance)?;
        }
        if let Some(rpe) = self.rpe {
            write!(f, " @RPE {}", rpe)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_builder() {
        let set = WorkoutSet::new(60.0).with_reps(8).with_rpe(8.5).completed();

        assert_eq!(set.weight, 60.0);
        assert_eq!(set.reps, Some(8));
        assert_eq!(set.completed, Some(true));
        assert_eq!(format!("{}", set), "60kg x 8 @RPE 8.5");
    }

    #[test]
    fn test_set_weight_is_required() {
        let result: Result<WorkoutSet, _> = serde_json::from_str(r#"{"id": "s1", "reps": 5}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_set_reads_minimal_shape() {
        let set: WorkoutSet =
            serde_json::from_str(r#"{"id": "s15", "weight": 0, "timeMinutes": 1}"#).unwrap();
        assert_eq!(set.time_minutes, Some(1.0));
        assert!(set.reps.is_none());
    }
}
