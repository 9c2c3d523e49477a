use crate::course::model::{Course, CourseFilter, CreateCourseRequest, UpdateCourseRequest};
use crate::course::validation::{clean_name, normalize_students, CourseError};
use crate::{AppState, ErrorResponse};
use actix_web::{web, HttpResponse, Responder};
use log;

fn course_not_found(id: i64) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::not_found(&format!("Course {} not found", id)))
}

/// Normalizes the requested ids and checks they all reference real students.
async fn resolve_students(state: &AppState, ids: &[i64]) -> Result<Vec<i64>, CourseError> {
    let students = normalize_students(ids, state.max_students_per_course)?;
    let missing = state.missing_student_ids(&students).await?;
    if !missing.is_empty() {
        return Err(CourseError::UnknownStudents(missing));
    }
    Ok(students)
}

async fn apply_update(
    state: &AppState,
    id: i64,
    name: Option<&str>,
    students: Option<&[i64]>,
) -> HttpResponse {
    let name = match name.map(clean_name).transpose() {
        Ok(name) => name,
        Err(e) => return e.to_http_response(),
    };
    let students = match students {
        Some(ids) => match resolve_students(state, ids).await {
            Ok(students) => Some(students),
            Err(e) => return e.to_http_response(),
        },
        None => None,
    };

    match state
        .update_course(id, name.as_deref(), students.as_deref())
        .await
    {
        Ok(Some(course)) => {
            log::info!("Course {} updated", id);
            HttpResponse::Ok().json(course)
        }
        Ok(None) => course_not_found(id),
        Err(e) => CourseError::from(e).to_http_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/courses/",
    tag = "Courses",
    params(CourseFilter),
    responses(
        (status = 200, description = "List courses, optionally filtered by id and name", body = Vec<Course>),
        (status = 400, description = "Invalid filter value")
    )
)]
pub async fn list_courses(
    state: web::Data<AppState>,
    filter: web::Query<CourseFilter>,
) -> impl Responder {
    match state.get_all_courses(&filter).await {
        Ok(courses) => HttpResponse::Ok().json(courses),
        Err(e) => CourseError::from(e).to_http_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/courses/{id}/",
    tag = "Courses",
    params(
        ("id" = i64, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Course found", body = Course),
        (status = 404, description = "Course not found", body = ErrorResponse)
    )
)]
pub async fn get_course(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let id = path.into_inner();
    match state.get_course_by_id(id).await {
        Ok(Some(course)) => HttpResponse::Ok().json(course),
        Ok(None) => course_not_found(id),
        Err(e) => CourseError::from(e).to_http_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/courses/",
    tag = "Courses",
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created successfully", body = Course),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
pub async fn create_course(
    state: web::Data<AppState>,
    item: web::Json<CreateCourseRequest>,
) -> impl Responder {
    let name = match clean_name(&item.name) {
        Ok(name) => name,
        Err(e) => return e.to_http_response(),
    };
    let students = match resolve_students(&state, &item.students).await {
        Ok(students) => students,
        Err(e) => return e.to_http_response(),
    };

    match state.insert_course(&name, &students).await {
        Ok(course) => {
            log::info!("Course {} created: {}", course.id, course.name);
            HttpResponse::Created().json(course)
        }
        Err(e) => CourseError::from(e).to_http_response(),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/courses/{id}/",
    tag = "Courses",
    params(
        ("id" = i64, Path, description = "Course ID")
    ),
    request_body = CreateCourseRequest,
    responses(
        (status = 200, description = "Course replaced successfully", body = Course),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    )
)]
pub async fn replace_course(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    item: web::Json<CreateCourseRequest>,
) -> impl Responder {
    apply_update(
        &state,
        path.into_inner(),
        Some(item.name.as_str()),
        Some(item.students.as_slice()),
    )
    .await
}

#[utoipa::path(
    patch,
    path = "/api/v1/courses/{id}/",
    tag = "Courses",
    params(
        ("id" = i64, Path, description = "Course ID")
    ),
    request_body = UpdateCourseRequest,
    responses(
        (status = 200, description = "Course updated successfully", body = Course),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    )
)]
pub async fn update_course(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    item: web::Json<UpdateCourseRequest>,
) -> impl Responder {
    apply_update(
        &state,
        path.into_inner(),
        item.name.as_deref(),
        item.students.as_deref(),
    )
    .await
}

#[utoipa::path(
    delete,
    path = "/api/v1/courses/{id}/",
    tag = "Courses",
    params(
        ("id" = i64, Path, description = "Course ID")
    ),
    responses(
        (status = 204, description = "Course deleted successfully"),
        (status = 404, description = "Course not found", body = ErrorResponse)
    )
)]
pub async fn delete_course(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let id = path.into_inner();
    match state.delete_course(id).await {
        Ok(true) => {
            log::info!("Course {} deleted", id);
            HttpResponse::NoContent().finish()
        }
        Ok(false) => course_not_found(id),
        Err(e) => CourseError::from(e).to_http_response(),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/courses/")
            .route(web::get().to(list_courses))
            .route(web::post().to(create_course)),
    )
    .service(
        web::resource("/courses/{id}/")
            .route(web::get().to(get_course))
            .route(web::put().to(replace_course))
            .route(web::patch().to(update_course))
            .route(web::delete().to(delete_course)),
    );
}
