//! Student database operations

use super::AppState;
use crate::student::model::Student;
use chrono::NaiveDate;
use sqlx::{QueryBuilder, Sqlite};
use std::collections::HashSet;

impl AppState {
    pub async fn get_all_students(&self) -> Result<Vec<Student>, sqlx::Error> {
        sqlx::query_as("SELECT id, name, birth_date FROM students ORDER BY id")
            .fetch_all(&self.pool)
            .await
    }

    pub async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>, sqlx::Error> {
        sqlx::query_as("SELECT id, name, birth_date FROM students WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn count_students(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM students")
            .fetch_one(&self.pool)
            .await
    }

    pub async fn insert_student(
        &self,
        name: &str,
        birth_date: Option<NaiveDate>,
    ) -> Result<Student, sqlx::Error> {
        let id = sqlx::query("INSERT INTO students (name, birth_date) VALUES (?, ?)")
            .bind(name)
            .bind(birth_date)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        Ok(Student {
            id,
            name: name.to_string(),
            birth_date,
        })
    }

    /// Removing a student also drops every enrollment, so cached courses go stale.
    pub async fn delete_student(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM students WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() > 0 {
            self.invalidate_all_courses();
            return Ok(true);
        }
        Ok(false)
    }

    /// Returns the subset of `ids` with no matching student, ascending.
    pub async fn missing_student_ids(&self, ids: &[i64]) -> Result<Vec<i64>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::<Sqlite>::new("SELECT id FROM students WHERE id IN (");
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let found: HashSet<i64> = query
            .build_query_scalar::<i64>()
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .collect();

        let mut missing: Vec<i64> = ids.iter().copied().filter(|id| !found.contains(id)).collect();
        missing.sort_unstable();
        missing.dedup();
        Ok(missing)
    }
}
