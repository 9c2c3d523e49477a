//! Input rules shared by the course and student handlers.

use actix_web::HttpResponse;

use crate::ErrorResponse;

#[derive(Debug, thiserror::Error)]
pub enum CourseError {
    #[error("name must not be blank")]
    BlankName,
    #[error("a course can have at most {max} students (got {actual})")]
    TooManyStudents { max: usize, actual: usize },
    #[error("unknown student ids: {0:?}")]
    UnknownStudents(Vec<i64>),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CourseError {
    pub fn to_http_response(&self) -> HttpResponse {
        match self {
            CourseError::Database(e) => {
                log::error!("Database error: {:?}", e);
                HttpResponse::InternalServerError()
                    .json(ErrorResponse::internal_error("Database operation failed"))
            }
            other => HttpResponse::BadRequest().json(ErrorResponse::bad_request(&other.to_string())),
        }
    }
}

/// Trims surrounding whitespace; a name left empty is rejected.
pub fn clean_name(name: &str) -> Result<String, CourseError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CourseError::BlankName);
    }
    Ok(trimmed.to_string())
}

/// Sorts and de-duplicates student ids, then checks the enrollment limit.
pub fn normalize_students(ids: &[i64], max: usize) -> Result<Vec<i64>, CourseError> {
    let mut students = ids.to_vec();
    students.sort_unstable();
    students.dedup();
    if students.len() > max {
        return Err(CourseError::TooManyStudents {
            max,
            actual: students.len(),
        });
    }
    Ok(students)
}
