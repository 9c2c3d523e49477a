use crate::course::validation::{clean_name, CourseError};
use crate::student::model::{CreateStudentRequest, Student};
use crate::{AppState, ErrorResponse};
use actix_web::{web, HttpResponse, Responder};
use log;

fn student_not_found(id: i64) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::not_found(&format!("Student {} not found", id)))
}

#[utoipa::path(
    get,
    path = "/api/v1/students/",
    tag = "Students",
    responses(
        (status = 200, description = "List all students", body = Vec<Student>)
    )
)]
pub async fn list_students(state: web::Data<AppState>) -> impl Responder {
    match state.get_all_students().await {
        Ok(students) => HttpResponse::Ok().json(students),
        Err(e) => CourseError::from(e).to_http_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/students/{id}/",
    tag = "Students",
    params(
        ("id" = i64, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student found", body = Student),
        (status = 404, description = "Student not found", body = ErrorResponse)
    )
)]
pub async fn get_student(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let id = path.into_inner();
    match state.get_student_by_id(id).await {
        Ok(Some(student)) => HttpResponse::Ok().json(student),
        Ok(None) => student_not_found(id),
        Err(e) => CourseError::from(e).to_http_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/students/",
    tag = "Students",
    request_body = CreateStudentRequest,
    responses(
        (status = 201, description = "Student created successfully", body = Student),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
pub async fn create_student(
    state: web::Data<AppState>,
    item: web::Json<CreateStudentRequest>,
) -> impl Responder {
    let name = match clean_name(&item.name) {
        Ok(name) => name,
        Err(e) => return e.to_http_response(),
    };

    match state.insert_student(&name, item.birth_date).await {
        Ok(student) => {
            log::info!("Student {} created", student.id);
            HttpResponse::Created().json(student)
        }
        Err(e) => CourseError::from(e).to_http_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/students/{id}/",
    tag = "Students",
    params(
        ("id" = i64, Path, description = "Student ID")
    ),
    responses(
        (status = 204, description = "Student deleted and unenrolled from all courses"),
        (status = 404, description = "Student not found", body = ErrorResponse)
    )
)]
pub async fn delete_student(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let id = path.into_inner();
    match state.delete_student(id).await {
        Ok(true) => {
            log::info!("Student {} deleted", id);
            HttpResponse::NoContent().finish()
        }
        Ok(false) => student_not_found(id),
        Err(e) => CourseError::from(e).to_http_response(),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/students/")
            .route(web::get().to(list_students))
            .route(web::post().to(create_student)),
    )
    .service(
        web::resource("/students/{id}/")
            .route(web::get().to(get_student))
            .route(web::delete().to(delete_student)),
    );
}
