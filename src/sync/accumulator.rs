//! The single write path for local mutations.
//!
//! Every change is persisted to the local store first; only then is the
//! scheduler told that a sync is due. Local-only data (AI settings) is
//! written without notifying anyone.

use chrono::NaiveDate;
use std::sync::Arc;
use tracing::debug;

use crate::models::{AiSettings, SyncEntity, WorkoutEntry, WorkoutPlan};
use crate::store::{LocalStore, StoreError, StoredCollection};

/// Something that wants to hear about local mutations.
pub trait SyncTrigger: Send + Sync {
    fn schedule_sync(&self);
}

pub struct ChangeAccumulator {
    store: Arc<LocalStore>,
    trigger: Option<Arc<dyn SyncTrigger>>,
}

impl ChangeAccumulator {
    /// Accumulator that only persists.
    pub fn new(store: Arc<LocalStore>) -> Self {
        Self {
            store,
            trigger: None,
        }
    }

    pub fn with_trigger(store: Arc<LocalStore>, trigger: Arc<dyn SyncTrigger>) -> Self {
        Self {
            store,
            trigger: Some(trigger),
        }
    }

    pub fn store(&self) -> &Arc<LocalStore> {
        &self.store
    }

    fn notify(&self) {
        if let Some(trigger) = &self.trigger {
            trigger.schedule_sync();
        }
    }

    /// Replaces a whole collection and schedules a sync.
    pub fn apply_mutation<T: StoredCollection>(&self, items: &[T]) -> Result<(), StoreError> {
        self.store.write(items)?;
        debug!(key = T::KEY.as_str(), count = items.len(), "Collection replaced");
        self.notify();
        Ok(())
    }

    /// Edits a collection in place under the store lock and schedules a sync.
    pub fn mutate<T, F, R>(&self, f: F) -> Result<R, StoreError>
    where
        T: StoredCollection,
        F: FnOnce(&mut Vec<T>) -> R,
    {
        let result = self.store.update(f)?;
        self.notify();
        Ok(result)
    }

    /// Adds a new entity.
    pub fn create<T: StoredCollection>(&self, item: T) -> Result<T, StoreError> {
        let created = item.clone();
        self.mutate::<T, _, _>(|items| items.push(item))?;
        debug!(kind = %T::KIND, id = created.id(), "Entity created");
        Ok(created)
    }

    /// Applies `edit` to a live entity and stamps it. Returns `None` if no
    /// live entity has that id; nothing is written in that case.
    pub fn update<T, F>(&self, id: &str, edit: F) -> Result<Option<T>, StoreError>
    where
        T: StoredCollection,
        F: FnOnce(&mut T),
    {
        let current: Vec<T> = self.store.read()?;
        if !current.iter().any(|item| item.id() == id && !item.is_deleted()) {
            return Ok(None);
        }

        self.mutate::<T, _, _>(|items| {
            let item = items
                .iter_mut()
                .find(|item| item.id() == id && !item.is_deleted())?;
            edit(item);
            item.meta_mut().touch();
            Some(item.clone())
        })
    }

    /// Turns a live entity into a tombstone. Returns whether one was found.
    pub fn delete<T: StoredCollection>(&self, id: &str) -> Result<bool, StoreError> {
        let current: Vec<T> = self.store.read()?;
        if !current.iter().any(|item| item.id() == id && !item.is_deleted()) {
            return Ok(false);
        }

        self.mutate::<T, _, _>(|items| {
            match items
                .iter_mut()
                .find(|item| item.id() == id && !item.is_deleted())
            {
                Some(item) => {
                    item.meta_mut().mark_deleted();
                    true
                }
                None => false,
            }
        })
    }

    /// Logs every exercise block of a plan as an entry on `date` and marks
    /// the plan completed. Returns the created entries, or `None` if the plan
    /// does not exist.
    pub fn complete_plan(
        &self,
        plan_id: &str,
        date: NaiveDate,
        workout_type: &str,
    ) -> Result<Option<Vec<WorkoutEntry>>, StoreError> {
        let plans: Vec<WorkoutPlan> = self.store.read()?;
        let plan = match plans.iter().find(|p| p.id == plan_id && !p.is_deleted()) {
            Some(plan) => plan.clone(),
            None => return Ok(None),
        };

        let entries: Vec<WorkoutEntry> = plan
            .exercises
            .iter()
            .map(|block| {
                WorkoutEntry::new(date, block.exercise_id.clone(), workout_type)
                    .with_sets(block.sets.clone())
                    .with_plan_id(plan.id.clone())
            })
            .collect();

        let logged = entries.clone();
        self.mutate::<WorkoutEntry, _, _>(|items| items.extend(entries))?;

        if !plan.is_completed {
            self.mutate::<WorkoutPlan, _, _>(|items| {
                if let Some(p) = items.iter_mut().find(|p| p.id == plan_id) {
                    p.mark_completed();
                }
            })?;
        }

        debug!(plan_id, entries = logged.len(), "Plan completed");
        Ok(Some(logged))
    }

    /// Saves local-only settings. Never schedules a sync.
    pub fn save_ai_settings(&self, settings: &AiSettings) -> Result<(), StoreError> {
        self.store.write_ai_settings(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{visible, Exercise, MuscleGroup, PlanExercise, WorkoutSet};
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Default)]
    struct CountingTrigger(AtomicU32);

    impl SyncTrigger for CountingTrigger {
        fn schedule_sync(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl CountingTrigger {
        fn count(&self) -> u32 {
            self.0.load(Ordering::SeqCst)
        }
    }

    /// Asserts the mutation is already on disk when the trigger fires.
    struct PersistenceCheck {
        store: Arc<LocalStore>,
        seen: AtomicU32,
    }

    impl SyncTrigger for PersistenceCheck {
        fn schedule_sync(&self) {
            let plans: Vec<WorkoutPlan> = self.store.read().unwrap();
            self.seen.store(plans.len() as u32, Ordering::SeqCst);
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
    }

    fn accumulator() -> (ChangeAccumulator, Arc<CountingTrigger>) {
        let trigger = Arc::new(CountingTrigger::default());
        let acc = ChangeAccumulator::with_trigger(Arc::new(LocalStore::in_memory()), trigger.clone());
        (acc, trigger)
    }

    #[test]
    fn test_persists_before_scheduling() {
        let store = Arc::new(LocalStore::in_memory());
        let check = Arc::new(PersistenceCheck {
            store: store.clone(),
            seen: AtomicU32::new(0),
        });
        let acc = ChangeAccumulator::with_trigger(store, check.clone());

        acc.create(WorkoutPlan::new(date(), "Leg Day")).unwrap();

        assert_eq!(check.seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_apply_mutation_replaces_collection() {
        let (acc, trigger) = accumulator();
        let plan = WorkoutPlan::new(date(), "Push");

        acc.apply_mutation(&[plan.clone()]).unwrap();

        let plans: Vec<WorkoutPlan> = acc.store().read().unwrap();
        assert_eq!(plans, vec![plan]);
        assert_eq!(trigger.count(), 1);
    }

    #[test]
    fn test_update_touches_and_schedules() {
        let (acc, trigger) = accumulator();
        let exercise = acc
            .create(Exercise::new("Hip Thrust", MuscleGroup::Legs, "Barbell"))
            .unwrap();
        let before = exercise.sync.updated_at;

        let updated = acc
            .update::<Exercise, _>(&exercise.id, |e| e.personal_best = Some(140.0))
            .unwrap()
            .unwrap();

        assert_eq!(updated.personal_best, Some(140.0));
        assert!(updated.sync.updated_at >= before);
        assert_eq!(trigger.count(), 2);
    }

    #[test]
    fn test_update_missing_writes_nothing() {
        let (acc, trigger) = accumulator();
        let result = acc.update::<WorkoutPlan, _>("nope", |p| p.title.clear()).unwrap();

        assert!(result.is_none());
        assert_eq!(trigger.count(), 0);
    }

    #[test]
    fn test_delete_keeps_tombstone() {
        let (acc, _trigger) = accumulator();
        let plan = acc.create(WorkoutPlan::new(date(), "Pull")).unwrap();

        assert!(acc.delete::<WorkoutPlan>(&plan.id).unwrap());
        assert!(!acc.delete::<WorkoutPlan>(&plan.id).unwrap());

        let plans: Vec<WorkoutPlan> = acc.store().read().unwrap();
        assert_eq!(plans.len(), 1);
        assert!(plans[0].sync.is_deleted);
        assert_eq!(visible(&plans).count(), 0);
    }

    #[test]
    fn test_delete_seed_exercise() {
        let (acc, _trigger) = accumulator();
        assert!(acc.delete::<Exercise>("14").unwrap());

        let exercises: Vec<Exercise> = acc.store().read().unwrap();
        assert!(visible(&exercises).all(|e| e.id != "14"));
    }

    #[test]
    fn test_complete_plan_logs_entries_once() {
        let (acc, _trigger) = accumulator();
        let plan = acc
            .create(WorkoutPlan::new(date(), "Leg Day").with_exercises(vec![
                PlanExercise::new("2", vec![WorkoutSet::new(100.0).with_reps(5)]),
                PlanExercise::new("missing-exercise", vec![]),
            ]))
            .unwrap();

        let entries = acc.complete_plan(&plan.id, date(), "Strength").unwrap().unwrap();

        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.plan_id.as_deref() == Some(plan.id.as_str())));
        assert_eq!(entries[1].exercise_id, "missing-exercise");

        let plans: Vec<WorkoutPlan> = acc.store().read().unwrap();
        assert!(plans[0].is_completed);

        let stored: Vec<WorkoutEntry> = acc.store().read().unwrap();
        assert_eq!(stored.len(), 2);
    }

    #[test]
    fn test_complete_unknown_plan() {
        let (acc, trigger) = accumulator();
        assert!(acc.complete_plan("nope", date(), "Strength").unwrap().is_none());
        assert_eq!(trigger.count(), 0);
    }

    #[test]
    fn test_ai_settings_do_not_schedule_sync() {
        let (acc, trigger) = accumulator();
        let settings = AiSettings {
            provider: "openai".to_string(),
            api_key: "sk-test".to_string(),
            model: Some("gpt-4o".to_string()),
        };

        acc.save_ai_settings(&settings).unwrap();

        assert_eq!(trigger.count(), 0);
        assert_eq!(acc.store().ai_settings().unwrap(), Some(settings));
    }

    #[test]
    fn test_without_trigger_only_persists() {
        let acc = ChangeAccumulator::new(Arc::new(LocalStore::in_memory()));
        acc.create(WorkoutPlan::new(date(), "Solo")).unwrap();

        let plans: Vec<WorkoutPlan> = acc.store().read().unwrap();
        assert_eq!(plans.len(), 1);
    }
}
