//! Course database operations

use super::AppState;
use crate::course::model::{Course, CourseFilter};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use std::collections::HashMap;

#[derive(sqlx::FromRow)]
struct CourseRow {
    id: i64,
    name: String,
}

impl AppState {
    pub async fn get_all_courses(&self, filter: &CourseFilter) -> Result<Vec<Course>, sqlx::Error> {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT id, name FROM courses");
        let mut has_where = false;
        if let Some(id) = filter.id {
            query.push(" WHERE id = ").push_bind(id);
            has_where = true;
        }
        if let Some(name) = &filter.name {
            query.push(if has_where { " AND " } else { " WHERE " });
            query.push("name = ").push_bind(name.clone());
        }
        query.push(" ORDER BY id");

        let rows = query.build_query_as::<CourseRow>().fetch_all(&self.pool).await?;
        self.attach_students(rows).await
    }

    pub async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>, sqlx::Error> {
        if let Some(course) = self.course_cache.get(&id).await {
            log::debug!("Course cache hit for id {}", id);
            return Ok(Some(course));
        }
        log::debug!("Course cache miss for id {}", id);
        let generation = self.current_course_generation();

        let row: Option<CourseRow> = sqlx::query_as("SELECT id, name FROM courses WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let course = self.attach_students(vec![row]).await?.pop();
        if let Some(course) = &course {
            if self.current_course_generation() == generation {
                self.course_cache.insert(id, course.clone()).await;
                // a write that landed between the check and the insert may have
                // invalidated before our insert
                if self.current_course_generation() != generation {
                    self.course_cache.invalidate(&id).await;
                }
            } else {
                log::debug!("Course {} changed while loading, not caching", id);
            }
        }
        Ok(course)
    }

    pub async fn count_courses(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM courses")
            .fetch_one(&self.pool)
            .await
    }

    pub async fn course_exists(&self, id: i64) -> Result<bool, sqlx::Error> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM courses WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    /// `students` must already be validated: sorted, unique and existing.
    pub async fn insert_course(&self, name: &str, students: &[i64]) -> Result<Course, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let id = sqlx::query("INSERT INTO courses (name) VALUES (?)")
            .bind(name)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();
        insert_enrollments(&mut tx, id, students).await?;

        tx.commit().await?;

        Ok(Course {
            id,
            name: name.to_string(),
            students: students.to_vec(),
        })
    }

    /// Applies the supplied fields; `None` leaves a field untouched.
    /// Returns `Ok(None)` when the course does not exist.
    pub async fn update_course(
        &self,
        id: i64,
        name: Option<&str>,
        students: Option<&[i64]>,
    ) -> Result<Option<Course>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<CourseRow> = sqlx::query_as("SELECT id, name FROM courses WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if existing.is_none() {
            return Ok(None);
        }

        if let Some(name) = name {
            sqlx::query("UPDATE courses SET name = ? WHERE id = ?")
                .bind(name)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        if let Some(students) = students {
            sqlx::query("DELETE FROM course_students WHERE course_id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            insert_enrollments(&mut tx, id, students).await?;
        }

        tx.commit().await?;
        self.invalidate_course(id).await;

        self.get_course_by_id(id).await
    }

    pub async fn delete_course(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM courses WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        self.invalidate_course(id).await;
        Ok(result.rows_affected() > 0)
    }

    async fn attach_students(&self, rows: Vec<CourseRow>) -> Result<Vec<Course>, sqlx::Error> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::<Sqlite>::new(
            "SELECT course_id, student_id FROM course_students WHERE course_id IN (",
        );
        let mut ids = query.separated(", ");
        for row in &rows {
            ids.push_bind(row.id);
        }
        ids.push_unseparated(") ORDER BY course_id, student_id");

        let links = query
            .build_query_as::<(i64, i64)>()
            .fetch_all(&self.pool)
            .await?;
        let mut by_course: HashMap<i64, Vec<i64>> = HashMap::new();
        for (course_id, student_id) in links {
            by_course.entry(course_id).or_default().push(student_id);
        }

        Ok(rows
            .into_iter()
            .map(|row| Course {
                students: by_course.remove(&row.id).unwrap_or_default(),
                id: row.id,
                name: row.name,
            })
            .collect())
    }
}

async fn insert_enrollments(
    conn: &mut SqliteConnection,
    course_id: i64,
    students: &[i64],
) -> Result<(), sqlx::Error> {
    for &student_id in students {
        sqlx::query("INSERT OR IGNORE INTO course_students (course_id, student_id) VALUES (?, ?)")
            .bind(course_id)
            .bind(student_id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}
