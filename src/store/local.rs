//! Typed access to the on-device collections.
//!
//! All access goes through one mutex so a read-modify-write from the
//! accumulator can never interleave with the sync service applying a
//! server response. Every write to a synced collection bumps an in-memory
//! revision counter; the sync service uses it to detect that the store moved
//! while a round-trip was in flight.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, error, warn};

use super::backend::{FileBackend, KeyValueBackend, MemoryBackend};
use super::error::StoreError;
use super::metadata::SyncMetadata;
use crate::models::{seed_exercises, AiSettings, Exercise, SyncEntity, WorkoutEntry, WorkoutPlan};

/// Keys in the underlying key/value store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKey {
    Exercises,
    Logs,
    Plans,
    SyncMetadata,
    /// Reserved, never written.
    PendingChanges,
    AiSettings,
}

impl StoreKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::Exercises => "exercises",
            StoreKey::Logs => "logs",
            StoreKey::Plans => "plans",
            StoreKey::SyncMetadata => "sync_metadata",
            StoreKey::PendingChanges => "pending_changes",
            StoreKey::AiSettings => "ai_settings",
        }
    }
}

/// A synced entity type with its own collection in the store.
pub trait StoredCollection: SyncEntity {
    const KEY: StoreKey;

    /// Value returned when the key has never been written.
    fn bootstrap() -> Vec<Self> {
        Vec::new()
    }
}

impl StoredCollection for Exercise {
    const KEY: StoreKey = StoreKey::Exercises;

    fn bootstrap() -> Vec<Self> {
        seed_exercises()
    }
}

impl StoredCollection for WorkoutPlan {
    const KEY: StoreKey = StoreKey::Plans;
}

impl StoredCollection for WorkoutEntry {
    const KEY: StoreKey = StoreKey::Logs;
}

/// How read failures are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// I/O and parse failures are returned to the caller.
    Strict,
    /// Failures are logged and the seed or empty value is returned instead.
    BestEffort,
}

/// How [`LocalStore::apply_response`] applied a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The store was unchanged since the snapshot and now mirrors the server.
    Replaced,
    /// Local edits made during flight were kept on top of the response.
    Rebased,
}

/// All three synced collections, captured under one lock.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub exercises: Vec<Exercise>,
    pub plans: Vec<WorkoutPlan>,
    pub entries: Vec<WorkoutEntry>,
    pub revision: u64,
}

pub struct LocalStore {
    backend: Box<dyn KeyValueBackend>,
    mode: ReadMode,
    revision: AtomicU64,
    lock: Mutex<()>,
}

impl LocalStore {
    pub fn new(backend: impl KeyValueBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            mode: ReadMode::Strict,
            revision: AtomicU64::new(0),
            lock: Mutex::new(()),
        }
    }

    /// Store that degrades read failures to default values.
    pub fn best_effort(backend: impl KeyValueBackend + 'static) -> Self {
        Self {
            mode: ReadMode::BestEffort,
            ..Self::new(backend)
        }
    }

    /// File-backed store rooted at `data_dir`.
    pub fn open(data_dir: impl Into<PathBuf>) -> Self {
        Self::new(FileBackend::new(data_dir))
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    pub fn mode(&self) -> ReadMode {
        self.mode
    }

    /// Current revision of the synced collections.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }

    fn guard(&self) -> Result<MutexGuard<'_, ()>, StoreError> {
        self.lock.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Reads a collection, bootstrapping it on first access.
    pub fn read<T: StoredCollection>(&self) -> Result<Vec<T>, StoreError> {
        let _guard = self.guard()?;
        self.read_unlocked::<T>()
    }

    /// Replaces a collection.
    pub fn write<T: StoredCollection>(&self, items: &[T]) -> Result<(), StoreError> {
        let _guard = self.guard()?;
        self.write_unlocked(items)
    }

    /// Reads, modifies and writes back a collection under the store lock.
    pub fn update<T, F, R>(&self, f: F) -> Result<R, StoreError>
    where
        T: StoredCollection,
        F: FnOnce(&mut Vec<T>) -> R,
    {
        let _guard = self.guard()?;
        let mut items = self.read_unlocked::<T>()?;
        let result = f(&mut items);
        self.write_unlocked(&items)?;
        Ok(result)
    }

    pub fn snapshot(&self) -> Result<Snapshot, StoreError> {
        let _guard = self.guard()?;
        Ok(Snapshot {
            exercises: self.read_unlocked()?,
            plans: self.read_unlocked()?,
            entries: self.read_unlocked()?,
            revision: self.revision(),
        })
    }

    /// Applies a sync response taken against `snapshot`.
    ///
    /// If nothing was written since the snapshot, the three collections are
    /// replaced wholesale. Otherwise the response is rebased: records left
    /// untouched since the snapshot take the server copy, records edited
    /// during flight keep their local content but adopt the server version,
    /// and records only the server knows are added.
    ///
    /// Either way the three collections are written together or not at all.
    pub fn apply_response(
        &self,
        snapshot: &Snapshot,
        exercises: &[Exercise],
        plans: &[WorkoutPlan],
        entries: &[WorkoutEntry],
    ) -> Result<Applied, StoreError> {
        let _guard = self.guard()?;

        if self.revision() == snapshot.revision {
            self.write_all(exercises, plans, entries)?;
            return Ok(Applied::Replaced);
        }

        debug!(
            expected = snapshot.revision,
            current = self.revision(),
            "Store changed during sync, rebasing local edits onto response"
        );
        let exercises = rebase(self.read_unlocked()?, &snapshot.exercises, exercises);
        let plans = rebase(self.read_unlocked()?, &snapshot.plans, plans);
        let entries = rebase(self.read_unlocked()?, &snapshot.entries, entries);
        self.write_all(&exercises, &plans, &entries)?;
        Ok(Applied::Rebased)
    }

    /// Raw bytes stored under a key.
    pub fn read_raw(&self, key: StoreKey) -> Result<Option<Vec<u8>>, StoreError> {
        let _guard = self.guard()?;
        self.backend.get(key.as_str())
    }

    /// Returns this installation's sync metadata, creating the device
    /// identity on first use.
    pub fn sync_metadata(&self) -> Result<SyncMetadata, StoreError> {
        let _guard = self.guard()?;
        self.sync_metadata_unlocked()
    }

    pub fn device_id(&self) -> Result<String, StoreError> {
        Ok(self.sync_metadata()?.device_id)
    }

    /// Records a successful round-trip.
    pub fn set_last_sync_at(&self, at: chrono::DateTime<chrono::Utc>) -> Result<(), StoreError> {
        let _guard = self.guard()?;
        let mut meta = self.sync_metadata_unlocked()?;
        meta.last_sync_at = Some(at);
        self.put(StoreKey::SyncMetadata, &meta)
    }

    /// Forgets the device identity and sync history.
    pub fn clear_sync_data(&self) -> Result<(), StoreError> {
        let _guard = self.guard()?;
        self.backend.remove(StoreKey::SyncMetadata.as_str())?;
        self.backend.remove(StoreKey::PendingChanges.as_str())?;
        Ok(())
    }

    pub fn ai_settings(&self) -> Result<Option<AiSettings>, StoreError> {
        let _guard = self.guard()?;
        self.get(StoreKey::AiSettings)
    }

    /// Local-only; does not move the revision.
    pub fn write_ai_settings(&self, settings: &AiSettings) -> Result<(), StoreError> {
        let _guard = self.guard()?;
        self.put(StoreKey::AiSettings, settings)
    }

    fn read_unlocked<T: StoredCollection>(&self) -> Result<Vec<T>, StoreError> {
        match self.get::<Vec<T>>(T::KEY) {
            Ok(Some(items)) => Ok(items),
            Ok(None) => {
                let items = T::bootstrap();
                if !items.is_empty() {
                    debug!(key = T::KEY.as_str(), count = items.len(), "Bootstrapping collection");
                    if let Err(e) = self.put(T::KEY, &items) {
                        self.degrade(T::KEY, e)?;
                    }
                }
                Ok(items)
            }
            Err(e) => {
                self.degrade(T::KEY, e)?;
                Ok(T::bootstrap())
            }
        }
    }

    fn write_unlocked<T: StoredCollection>(&self, items: &[T]) -> Result<(), StoreError> {
        self.put(T::KEY, &items)?;
        self.revision.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    /// Writes the three synced collections as one unit, restoring the
    /// previous bytes if any write fails.
    fn write_all(
        &self,
        exercises: &[Exercise],
        plans: &[WorkoutPlan],
        entries: &[WorkoutEntry],
    ) -> Result<(), StoreError> {
        let batch = [
            (StoreKey::Exercises, encode(StoreKey::Exercises, exercises)?),
            (StoreKey::Plans, encode(StoreKey::Plans, plans)?),
            (StoreKey::Logs, encode(StoreKey::Logs, entries)?),
        ];
        let mut previous = Vec::with_capacity(batch.len());
        for (key, _) in &batch {
            previous.push((*key, self.backend.get(key.as_str())?));
        }

        for (written, (key, bytes)) in batch.iter().enumerate() {
            if let Err(e) = self.backend.set(key.as_str(), bytes) {
                self.restore(&previous[..written]);
                return Err(e);
            }
        }

        self.revision.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn restore(&self, previous: &[(StoreKey, Option<Vec<u8>>)]) {
        for (key, bytes) in previous {
            let result = match bytes {
                Some(bytes) => self.backend.set(key.as_str(), bytes),
                None => self.backend.remove(key.as_str()),
            };
            if let Err(e) = result {
                // The store no longer matches any snapshot.
                self.revision.fetch_add(1, Ordering::SeqCst);
                error!(key = key.as_str(), error = %e, "Could not roll back partial write");
            }
        }
    }

    fn sync_metadata_unlocked(&self) -> Result<SyncMetadata, StoreError> {
        match self.get::<SyncMetadata>(StoreKey::SyncMetadata) {
            Ok(Some(meta)) => return Ok(meta),
            Ok(None) => {}
            Err(e @ StoreError::Corrupt(..)) => {
                self.degrade(StoreKey::SyncMetadata, e)?;
                warn!("Sync metadata is corrupt, generating a new device id");
            }
            Err(e) => {
                self.degrade(StoreKey::SyncMetadata, e)?;
                return Ok(SyncMetadata::generate());
            }
        }

        let meta = SyncMetadata::generate();
        debug!(device_id = %meta.device_id, "Generated device id");
        match self.put(StoreKey::SyncMetadata, &meta) {
            Ok(()) => Ok(meta),
            Err(e) => {
                self.degrade(StoreKey::SyncMetadata, e)?;
                Ok(meta)
            }
        }
    }

    /// Swallows the error in best-effort mode, otherwise returns it.
    fn degrade(&self, key: StoreKey, error: StoreError) -> Result<(), StoreError> {
        match self.mode {
            ReadMode::Strict => Err(error),
            ReadMode::BestEffort => {
                warn!(key = key.as_str(), error = %error, "Storage failure, using default value");
                Ok(())
            }
        }
    }

    fn get<V: DeserializeOwned>(&self, key: StoreKey) -> Result<Option<V>, StoreError> {
        match self.backend.get(key.as_str())? {
            None => Ok(None),
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| StoreError::Corrupt(key.as_str().to_string(), e)),
        }
    }

    fn put<V: Serialize + ?Sized>(&self, key: StoreKey, value: &V) -> Result<(), StoreError> {
        let bytes = encode(key, value)?;
        self.backend.set(key.as_str(), &bytes)
    }
}

/// Records untouched since `before` take the server copy; records edited
/// since keep their content on top of the server version.
fn rebase<T: SyncEntity>(local: Vec<T>, before: &[T], response: &[T]) -> Vec<T> {
    let before: HashMap<&str, &T> = before.iter().map(|r| (r.id(), r)).collect();
    let mut remote: HashMap<&str, &T> = response.iter().map(|r| (r.id(), r)).collect();
    let mut merged = Vec::with_capacity(local.len().max(response.len()));

    for mut record in local {
        let Some(server) = remote.remove(record.id()) else {
            merged.push(record);
            continue;
        };
        if before.get(record.id()) == Some(&&record) {
            merged.push(server.clone());
        } else {
            let meta = record.meta_mut();
            meta.version = server.meta().version;
            meta.created_at = server.meta().created_at.or(meta.created_at);
            merged.push(record);
        }
    }

    merged.extend(
        response
            .iter()
            .filter(|r| remote.contains_key(r.id()))
            .cloned(),
    );
    merged
}

fn encode<V: Serialize + ?Sized>(key: StoreKey, value: &V) -> Result<Vec<u8>, StoreError> {
    serde_json::to_vec(value).map_err(|e| StoreError::Serialize(key.as_str().to_string(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MuscleGroup;
    use chrono::{NaiveDate, Utc};
    use std::io;
    use tempfile::TempDir;

    struct FailingBackend;

    impl KeyValueBackend for FailingBackend {
        fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
            Err(StoreError::Io(
                PathBuf::from(key),
                io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            ))
        }

        fn set(&self, key: &str, _value: &[u8]) -> Result<(), StoreError> {
            Err(StoreError::Io(
                PathBuf::from(key),
                io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            ))
        }

        fn remove(&self, _key: &str) -> Result<(), StoreError> {
            Ok(())
        }
    }

    /// In-memory backend whose writes to one key always fail.
    struct FailOnKey {
        inner: MemoryBackend,
        key: &'static str,
    }

    impl FailOnKey {
        fn new(key: &'static str) -> Self {
            Self {
                inner: MemoryBackend::new(),
                key,
            }
        }
    }

    impl KeyValueBackend for FailOnKey {
        fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
            if key == self.key {
                return Err(StoreError::Io(
                    PathBuf::from(key),
                    io::Error::new(io::ErrorKind::Other, "disk full"),
                ));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StoreError> {
            self.inner.remove(key)
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
    }

    #[test]
    fn test_seed_bootstrap_is_persisted() {
        let store = LocalStore::in_memory();
        assert!(store.read_raw(StoreKey::Exercises).unwrap().is_none());

        let exercises: Vec<Exercise> = store.read().unwrap();
        assert_eq!(exercises, seed_exercises());

        let raw = store.read_raw(StoreKey::Exercises).unwrap().unwrap();
        let persisted: Vec<Exercise> = serde_json::from_slice(&raw).unwrap();
        assert_eq!(persisted, seed_exercises());
    }

    #[test]
    fn test_bootstrap_does_not_bump_revision() {
        let store = LocalStore::in_memory();
        let _: Vec<Exercise> = store.read().unwrap();
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_plans_and_entries_default_empty() {
        let store = LocalStore::in_memory();
        let plans: Vec<WorkoutPlan> = store.read().unwrap();
        let entries: Vec<WorkoutEntry> = store.read().unwrap();

        assert!(plans.is_empty());
        assert!(entries.is_empty());
        assert!(store.read_raw(StoreKey::Plans).unwrap().is_none());
    }

    #[test]
    fn test_empty_exercise_list_is_not_reseeded() {
        let store = LocalStore::in_memory();
        store.write::<Exercise>(&[]).unwrap();

        let exercises: Vec<Exercise> = store.read().unwrap();
        assert!(exercises.is_empty());
    }

    #[test]
    fn test_write_is_visible_to_next_read() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalStore::open(temp_dir.path());

        let plan = WorkoutPlan::new(date(), "Leg Day");
        store.write(&[plan.clone()]).unwrap();

        let reopened = LocalStore::open(temp_dir.path());
        let plans: Vec<WorkoutPlan> = reopened.read().unwrap();
        assert_eq!(plans, vec![plan]);
        assert!(temp_dir.path().join("plans.json").exists());
    }

    #[test]
    fn test_entries_live_under_logs_key() {
        let store = LocalStore::in_memory();
        let entry = WorkoutEntry::new(date(), "1", "Strength");
        store.write(&[entry]).unwrap();

        assert!(store.read_raw(StoreKey::Logs).unwrap().is_some());
    }

    #[test]
    fn test_update_bumps_revision() {
        let store = LocalStore::in_memory();
        let before = store.revision();

        let len = store
            .update::<Exercise, _, _>(|items| {
                items.push(Exercise::new("Hip Thrust", MuscleGroup::Legs, "Barbell"));
                items.len()
            })
            .unwrap();

        assert_eq!(len, seed_exercises().len() + 1);
        assert_eq!(store.revision(), before + 1);
    }

    #[test]
    fn test_apply_response_replaces_unchanged_store() {
        let store = LocalStore::in_memory();
        let snapshot = store.snapshot().unwrap();
        let plan = WorkoutPlan::new(date(), "Push");

        let applied = store
            .apply_response(&snapshot, &[], &[plan.clone()], &[])
            .unwrap();

        assert_eq!(applied, Applied::Replaced);
        let plans: Vec<WorkoutPlan> = store.read().unwrap();
        assert_eq!(plans, vec![plan]);
        let exercises: Vec<Exercise> = store.read().unwrap();
        assert!(exercises.is_empty());
    }

    #[test]
    fn test_apply_response_keeps_record_written_during_flight() {
        let store = LocalStore::in_memory();
        let snapshot = store.snapshot().unwrap();

        let local = WorkoutPlan::new(date(), "Written during flight");
        store.write(&[local.clone()]).unwrap();

        let applied = store.apply_response(&snapshot, &[], &[], &[]).unwrap();

        assert_eq!(applied, Applied::Rebased);
        let plans: Vec<WorkoutPlan> = store.read().unwrap();
        assert_eq!(plans, vec![local]);
    }

    #[test]
    fn test_rebase_adopts_server_version_under_local_edit() {
        let store = LocalStore::in_memory();
        let plan = WorkoutPlan::new(date(), "Legs");
        store.write(&[plan.clone()]).unwrap();
        let snapshot = store.snapshot().unwrap();

        let mut accepted = plan.clone();
        accepted.sync.version = Some(1);
        accepted.sync.created_at = Some(Utc::now());
        let mut from_other_device = WorkoutPlan::new(date(), "Arms");
        from_other_device.sync.version = Some(4);

        store
            .update::<WorkoutPlan, _, _>(|plans| plans[0].title = "Legs and core".to_string())
            .unwrap();

        let applied = store
            .apply_response(
                &snapshot,
                &snapshot.exercises,
                &[accepted.clone(), from_other_device.clone()],
                &[],
            )
            .unwrap();

        assert_eq!(applied, Applied::Rebased);
        let plans: Vec<WorkoutPlan> = store.read().unwrap();
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].title, "Legs and core");
        assert_eq!(plans[0].sync.version, Some(1));
        assert_eq!(plans[0].sync.created_at, accepted.sync.created_at);
        assert_eq!(plans[1], from_other_device);
    }

    #[test]
    fn test_rebase_takes_server_copy_of_untouched_records() {
        let store = LocalStore::in_memory();
        let plan = WorkoutPlan::new(date(), "Pull");
        store.write(&[plan.clone()]).unwrap();
        let snapshot = store.snapshot().unwrap();

        let mut server_copy = plan.clone();
        server_copy.title = "Pull (edited elsewhere)".to_string();
        server_copy.sync.version = Some(3);

        // An unrelated write moves the revision.
        store.write::<WorkoutEntry>(&[]).unwrap();

        store
            .apply_response(&snapshot, &snapshot.exercises, &[server_copy.clone()], &[])
            .unwrap();

        let plans: Vec<WorkoutPlan> = store.read().unwrap();
        assert_eq!(plans, vec![server_copy]);
    }

    #[test]
    fn test_failed_apply_leaves_store_untouched() {
        let backend = FailOnKey::new("plans");
        let store = LocalStore::new(backend);
        let before: Vec<Exercise> = store.read().unwrap();
        let snapshot = store.snapshot().unwrap();

        let result = store.apply_response(&snapshot, &[], &[], &[]);

        assert!(result.is_err());
        let after: Vec<Exercise> = store.read().unwrap();
        assert_eq!(after, before);
        assert_eq!(after.len(), seed_exercises().len());
        assert_eq!(store.revision(), snapshot.revision);
    }

    #[test]
    fn test_device_id_is_stable() {
        let store = LocalStore::in_memory();
        let first = store.device_id().unwrap();
        let second = store.device_id().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_set_last_sync_at_keeps_device_id() {
        let store = LocalStore::in_memory();
        let device_id = store.device_id().unwrap();
        let now = Utc::now();

        store.set_last_sync_at(now).unwrap();

        let meta = store.sync_metadata().unwrap();
        assert_eq!(meta.device_id, device_id);
        assert_eq!(meta.last_sync_at, Some(now));
    }

    #[test]
    fn test_clear_sync_data_regenerates_identity() {
        let store = LocalStore::in_memory();
        let before = store.device_id().unwrap();
        store.set_last_sync_at(Utc::now()).unwrap();

        store.clear_sync_data().unwrap();

        let meta = store.sync_metadata().unwrap();
        assert_ne!(meta.device_id, before);
        assert!(meta.last_sync_at.is_none());
    }

    #[test]
    fn test_strict_mode_reports_corrupt_metadata() {
        let backend = MemoryBackend::new();
        backend.set("sync_metadata", b"not json").unwrap();
        let store = LocalStore::new(backend);

        let result = store.sync_metadata();
        assert!(matches!(result, Err(StoreError::Corrupt(_, _))));
        // Still corrupt: nothing was overwritten.
        assert_eq!(
            store.read_raw(StoreKey::SyncMetadata).unwrap().unwrap(),
            b"not json".to_vec()
        );
    }

    #[test]
    fn test_best_effort_mode_regenerates_corrupt_metadata() {
        let backend = MemoryBackend::new();
        backend.set("sync_metadata", b"not json").unwrap();
        let store = LocalStore::best_effort(backend);

        let meta = store.sync_metadata().unwrap();
        assert!(meta.device_id.starts_with("device-"));
        assert_eq!(store.device_id().unwrap(), meta.device_id);
    }

    #[test]
    fn test_ai_settings_do_not_bump_revision() {
        let store = LocalStore::in_memory();
        let settings = AiSettings {
            provider: "anthropic".to_string(),
            api_key: "secret".to_string(),
            model: None,
        };

        store.write_ai_settings(&settings).unwrap();

        assert_eq!(store.ai_settings().unwrap(), Some(settings));
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_strict_mode_propagates_io_errors() {
        let store = LocalStore::new(FailingBackend);

        let result: Result<Vec<WorkoutPlan>, _> = store.read();
        assert!(matches!(result, Err(StoreError::Io(_, _))));
        assert!(store.write::<WorkoutPlan>(&[]).is_err());
    }

    #[test]
    fn test_strict_mode_reports_corrupt_collection() {
        let backend = MemoryBackend::new();
        backend.set("plans", b"{ broken").unwrap();
        let store = LocalStore::new(backend);

        let result: Result<Vec<WorkoutPlan>, _> = store.read();
        assert!(matches!(result, Err(StoreError::Corrupt(_, _))));
    }

    #[test]
    fn test_best_effort_mode_degrades_to_seed() {
        let store = LocalStore::best_effort(FailingBackend);

        let exercises: Vec<Exercise> = store.read().unwrap();
        let plans: Vec<WorkoutPlan> = store.read().unwrap();

        assert_eq!(exercises, seed_exercises());
        assert!(plans.is_empty());
        assert!(store.sync_metadata().is_ok());
    }

    #[test]
    fn test_best_effort_mode_still_fails_writes() {
        let store = LocalStore::best_effort(FailingBackend);
        assert!(store.write::<WorkoutPlan>(&[]).is_err());
    }
}
