//! Server-side record storage (SQLite via sqlx).
//!
//! Each collection has its own table keyed by `(user_id, id)`. The full
//! record is stored as JSON in `data`; sync metadata is mirrored into
//! columns so listings can filter tombstones without parsing.

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::SqliteConnection;
use std::path::Path;
use std::str::FromStr;

use super::error::{AppError, Result};
use crate::models::SyncEntity;

/// Opens the database, creating it if needed, and runs migrations.
pub async fn init_db(path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(sqlx::Error::Io)?;
    }

    let db_url = format!("sqlite:{}?mode=rwc", path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .foreign_keys(true)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Loads every record of one kind for a user, tombstones included.
pub(crate) async fn load_all<T: SyncEntity>(
    conn: &mut SqliteConnection,
    user_id: &str,
) -> Result<Vec<T>> {
    let sql = format!(
        "SELECT data FROM {} WHERE user_id = ? ORDER BY id",
        T::KIND.table()
    );
    let rows: Vec<(String,)> = sqlx::query_as(&sql)
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await?;

    rows.into_iter()
        .map(|(data,)| serde_json::from_str(&data).map_err(AppError::from))
        .collect()
}

/// Inserts or replaces one record.
pub(crate) async fn upsert<T: SyncEntity>(
    conn: &mut SqliteConnection,
    user_id: &str,
    record: &T,
) -> Result<()> {
    let data = serde_json::to_string(record)?;
    let meta = record.meta();
    let updated_at = meta.updated_at.unwrap_or_else(Utc::now).to_rfc3339();

    let sql = format!(
        r#"
        INSERT INTO {} (user_id, id, data, version, updated_at, is_deleted, last_modified_by_device)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (user_id, id) DO UPDATE SET
            data = excluded.data,
            version = excluded.version,
            updated_at = excluded.updated_at,
            is_deleted = excluded.is_deleted,
            last_modified_by_device = excluded.last_modified_by_device
        "#,
        T::KIND.table()
    );

    sqlx::query(&sql)
        .bind(user_id)
        .bind(record.id())
        .bind(&data)
        .bind(meta.version.unwrap_or(1))
        .bind(&updated_at)
        .bind(meta.is_deleted)
        .bind(&meta.last_modified_by_device)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Per-user record repository.
#[derive(Debug, Clone)]
pub struct ServerRepository {
    pool: SqlitePool,
}

impl ServerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn list<T: SyncEntity>(&self, user_id: &str, include_deleted: bool) -> Result<Vec<T>> {
        let mut conn = self.pool.acquire().await?;
        let records: Vec<T> = load_all(&mut conn, user_id).await?;

        Ok(if include_deleted {
            records
        } else {
            records.into_iter().filter(|r| !r.is_deleted()).collect()
        })
    }

    pub async fn get<T: SyncEntity>(&self, user_id: &str, id: &str) -> Result<Option<T>> {
        let sql = format!(
            "SELECT data FROM {} WHERE user_id = ? AND id = ?",
            T::KIND.table()
        );
        let row: Option<(String,)> = sqlx::query_as(&sql)
            .bind(user_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some((data,)) => Ok(Some(serde_json::from_str(&data)?)),
            None => Ok(None),
        }
    }

    /// Stores a new record. Fails with `Conflict` if the id is taken.
    pub async fn insert<T: SyncEntity>(&self, user_id: &str, record: &T) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE user_id = ? AND id = ?",
            T::KIND.table()
        );
        let (count,): (i64,) = sqlx::query_as(&sql)
            .bind(user_id)
            .bind(record.id())
            .fetch_one(&mut *tx)
            .await?;
        if count > 0 {
            return Err(AppError::Conflict(format!(
                "{} '{}' already exists",
                T::KIND,
                record.id()
            )));
        }

        upsert(&mut tx, user_id, record).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Inserts or replaces a record.
    pub async fn save<T: SyncEntity>(&self, user_id: &str, record: &T) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        upsert(&mut conn, user_id, record).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Exercise, MuscleGroup, WorkoutPlan};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    async fn setup() -> (ServerRepository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_db(&temp_dir.path().join("server.db")).await.unwrap();
        (ServerRepository::new(pool), temp_dir)
    }

    fn plan(title: &str) -> WorkoutPlan {
        let mut plan = WorkoutPlan::new(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(), title);
        plan.sync.version = Some(1);
        plan
    }

    #[tokio::test]
    async fn test_init_db_creates_tables() {
        let (repo, _temp) = setup().await;

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name NOT LIKE '_sqlx_%' ORDER BY name",
        )
        .fetch_all(repo.pool())
        .await
        .unwrap();

        let table_names: Vec<&str> = tables.iter().map(|t| t.0.as_str()).collect();
        assert_eq!(table_names, vec!["exercises", "workout_entries", "workout_plans"]);
    }

    #[tokio::test]
    async fn test_save_and_get_roundtrip() {
        let (repo, _temp) = setup().await;
        let p = plan("Leg Day");

        repo.save("alice", &p).await.unwrap();

        let loaded: WorkoutPlan = repo.get("alice", &p.id).await.unwrap().unwrap();
        assert_eq!(loaded, p);
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let (repo, _temp) = setup().await;
        let mut p = plan("Leg Day");
        repo.save("alice", &p).await.unwrap();

        p.title = "Heavy Legs".to_string();
        p.sync.version = Some(2);
        repo.save("alice", &p).await.unwrap();

        let all: Vec<WorkoutPlan> = repo.list("alice", true).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "Heavy Legs");
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let (repo, _temp) = setup().await;
        repo.save("alice", &plan("Alice's")).await.unwrap();
        repo.save("bob", &plan("Bob's")).await.unwrap();

        let alice: Vec<WorkoutPlan> = repo.list("alice", true).await.unwrap();
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].title, "Alice's");
    }

    #[tokio::test]
    async fn test_same_id_for_different_users() {
        let (repo, _temp) = setup().await;
        let exercise = Exercise::with_id("1", "Bench", MuscleGroup::Chest, "Barbell");

        repo.insert("alice", &exercise).await.unwrap();
        repo.insert("bob", &exercise).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_hides_tombstones_unless_asked() {
        let (repo, _temp) = setup().await;
        let live = plan("Live");
        let mut gone = plan("Gone");
        gone.sync.mark_deleted();
        repo.save("alice", &live).await.unwrap();
        repo.save("alice", &gone).await.unwrap();

        let visible: Vec<WorkoutPlan> = repo.list("alice", false).await.unwrap();
        let all: Vec<WorkoutPlan> = repo.list("alice", true).await.unwrap();

        assert_eq!(visible, vec![live]);
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_insert_duplicate_is_conflict() {
        let (repo, _temp) = setup().await;
        let p = plan("Once");

        repo.insert("alice", &p).await.unwrap();
        let result = repo.insert("alice", &p).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_get_missing() {
        let (repo, _temp) = setup().await;
        let missing: Option<WorkoutPlan> = repo.get("alice", "nope").await.unwrap();
        assert!(missing.is_none());
    }
}
