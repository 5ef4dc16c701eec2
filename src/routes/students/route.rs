use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use super::dto::{
    CreateStudentRequest, StudentDataResponse, StudentListResponse, StudentResponse,
    UpdateStudentRequest,
};
use crate::error::AppResult;
use crate::extractor::AuthClaims;
use crate::routes::dto::MessageResponse;
use crate::services::student_service::StudentService;
use crate::state::AppState;

pub fn create_route() -> Router<AppState> {
    Router::new()
        .route("/api/students", get(get_all_students).post(create_student))
        .route(
            "/api/students/{id}",
            get(get_student)
                .put(update_student)
                .delete(delete_student),
        )
}

/// Students of the caller's department category
#[utoipa::path(
    get,
    path = "/api/students",
    responses(
        (status = 200, description = "Students retrieved", body = StudentListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
pub async fn get_all_students(
    State(state): State<AppState>,
    claims: AuthClaims,
) -> AppResult<Json<StudentListResponse>> {
    let scope = claims.scope(&state).await?;
    let students = StudentService::new(&state.db, &state.outbox)
        .list(&scope)
        .await?;

    Ok(Json(StudentListResponse {
        data: students.into_iter().map(StudentResponse::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/students/{id}",
    params(("id" = i32, Path, description = "Student id")),
    responses(
        (status = 200, description = "Student retrieved", body = StudentDataResponse),
        (status = 404, description = "Student not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
pub async fn get_student(
    State(state): State<AppState>,
    claims: AuthClaims,
    Path(id): Path<i32>,
) -> AppResult<Json<StudentDataResponse>> {
    let scope = claims.scope(&state).await?;
    let student = StudentService::new(&state.db, &state.outbox)
        .get(&scope, id)
        .await?;

    Ok(Json(StudentDataResponse {
        message: None,
        data: student.into(),
    }))
}

/// Enroll a student into one of the caller's departments
#[utoipa::path(
    post,
    path = "/api/students",
    request_body = CreateStudentRequest,
    responses(
        (status = 201, description = "Student created", body = StudentDataResponse),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Department outside the caller's category"),
        (status = 409, description = "Email already used"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
pub async fn create_student(
    State(state): State<AppState>,
    claims: AuthClaims,
    Json(payload): Json<CreateStudentRequest>,
) -> AppResult<(StatusCode, Json<StudentDataResponse>)> {
    payload.validate()?;
    let scope = claims.scope(&state).await?;

    let student = StudentService::new(&state.db, &state.outbox)
        .create(&scope, payload.into_new_student())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(StudentDataResponse {
            message: Some("student added successfully!".to_string()),
            data: student.into(),
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/students/{id}",
    params(("id" = i32, Path, description = "Student id")),
    request_body = UpdateStudentRequest,
    responses(
        (status = 200, description = "Student updated", body = StudentDataResponse),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Target department outside the caller's category"),
        (status = 404, description = "Student not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
pub async fn update_student(
    State(state): State<AppState>,
    claims: AuthClaims,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateStudentRequest>,
) -> AppResult<Json<StudentDataResponse>> {
    payload.validate()?;
    let scope = claims.scope(&state).await?;

    let student = StudentService::new(&state.db, &state.outbox)
        .update(&scope, id, payload.into_update())
        .await?;

    Ok(Json(StudentDataResponse {
        message: Some("student info updated successfully!".to_string()),
        data: student.into(),
    }))
}

/// Remove a student and their grades
#[utoipa::path(
    delete,
    path = "/api/students/{id}",
    params(("id" = i32, Path, description = "Student id")),
    responses(
        (status = 200, description = "Student deleted", body = MessageResponse),
        (status = 404, description = "Student not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
pub async fn delete_student(
    State(state): State<AppState>,
    claims: AuthClaims,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    let scope = claims.scope(&state).await?;
    StudentService::new(&state.db, &state.outbox)
        .delete(&scope, id)
        .await?;

    Ok(Json(MessageResponse::new("student deleted successfully!")))
}
