//! Database module - AppState and database operations
//!
//! This module is split into submodules for better separation of concerns:
//! - `course` - Course-related database operations
//! - `student` - Student-related database operations

mod course;
mod student;

use moka::future::Cache;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::config::ServerConfig;
use crate::course::model::Course;

pub const IN_MEMORY_DATABASE_URL: &str = "sqlite::memory:";

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS courses (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS students (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        birth_date TEXT
    )",
    "CREATE TABLE IF NOT EXISTS course_students (
        course_id INTEGER NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
        student_id INTEGER NOT NULL REFERENCES students(id) ON DELETE CASCADE,
        PRIMARY KEY (course_id, student_id)
    )",
    "CREATE INDEX IF NOT EXISTS idx_courses_name ON courses(name)",
    "CREATE INDEX IF NOT EXISTS idx_course_students_student ON course_students(student_id)",
];

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub course_cache: Cache<i64, Course>,
    /// Bumped by every course write; a cache fill that saw it change is dropped.
    pub course_generation: Arc<AtomicU64>,
    pub max_students_per_course: usize,
}

impl AppState {
    pub async fn new(config: &ServerConfig) -> anyhow::Result<Self> {
        let pool = connect_pool(config).await?;
        let state = Self::new_with_pool(pool, config.max_students_per_course).await?;
        Ok(state)
    }

    /// Wraps an existing pool and makes sure the schema exists.
    pub async fn new_with_pool(
        pool: SqlitePool,
        max_students_per_course: usize,
    ) -> Result<Self, sqlx::Error> {
        let course_cache = Cache::builder()
            .time_to_live(Duration::from_secs(10 * 60))
            .max_capacity(1_000)
            .build();

        let state = AppState {
            pool,
            course_cache,
            course_generation: Arc::new(AtomicU64::new(0)),
            max_students_per_course,
        };
        state.init_schema().await?;
        Ok(state)
    }

    pub async fn init_schema(&self) -> Result<(), sqlx::Error> {
        for statement in SCHEMA {
            sqlx::query(*statement).execute(&self.pool).await?;
        }
        log::debug!("Database schema ready");
        Ok(())
    }

    pub(crate) fn current_course_generation(&self) -> u64 {
        self.course_generation.load(Ordering::SeqCst)
    }

    /// Call after the write has committed.
    pub(crate) async fn invalidate_course(&self, id: i64) {
        self.course_generation.fetch_add(1, Ordering::SeqCst);
        self.course_cache.invalidate(&id).await;
    }

    pub(crate) fn invalidate_all_courses(&self) {
        self.course_generation.fetch_add(1, Ordering::SeqCst);
        self.course_cache.invalidate_all();
    }
}

pub async fn connect_pool(config: &ServerConfig) -> Result<SqlitePool, sqlx::Error> {
    if config.database_url == IN_MEMORY_DATABASE_URL {
        log::warn!("Using an in-memory database; data is lost on shutdown");
        return connect_in_memory().await;
    }

    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(900))
        .max_lifetime(Duration::from_secs(1800))
        .connect_with(options)
        .await
}

/// Every SQLite in-memory connection is its own database, so the pool is pinned
/// to a single connection that is never recycled.
pub async fn connect_in_memory() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(IN_MEMORY_DATABASE_URL)?.foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_schema_is_idempotent() {
        let pool = connect_in_memory().await.unwrap();
        let state = AppState::new_with_pool(pool, 20).await.unwrap();
        state.init_schema().await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&state.pool)
        .await
        .unwrap();
        let names: Vec<&str> = tables.iter().map(|(n,)| n.as_str()).collect();
        assert_eq!(names, vec!["course_students", "courses", "students"]);
    }

    #[tokio::test]
    async fn test_file_database_survives_reconnect() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("courses.db");
        let config = ServerConfig {
            database_url: format!("sqlite://{}", path.display()),
            ..ServerConfig::default()
        };

        let state = AppState::new(&config).await.unwrap();
        let created = state.insert_course("Rust", &[]).await.unwrap();
        state.pool.close().await;

        let reopened = AppState::new(&config).await.unwrap();
        let found = reopened.get_course_by_id(created.id).await.unwrap();
        assert_eq!(found.map(|c| c.name), Some("Rust".to_string()));
    }
}
