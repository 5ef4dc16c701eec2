use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use super::dto::{AddGradeRequest, GradeDataResponse, GradeListResponse, UpdateGradeRequest};
use crate::error::AppResult;
use crate::extractor::AuthClaims;
use crate::routes::dto::MessageResponse;
use crate::services::grade_aggregator::{GpaReport, GradeAggregator};
use crate::state::AppState;

pub fn create_route() -> Router<AppState> {
    Router::new()
        .route("/grades", get(get_department_grades).post(add_grade))
        .route("/grades/gpa/{student_id}", get(get_gpa))
        // GET takes a student id, PUT and DELETE a grade id
        .route(
            "/grades/{id}",
            get(get_student_grades).put(update_grade).delete(delete_grade),
        )
}

/// Grades of every student in the caller's department category
#[utoipa::path(
    get,
    path = "/grades",
    responses(
        (status = 200, description = "Grades retrieved", body = GradeListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Grades"
)]
pub async fn get_department_grades(
    State(state): State<AppState>,
    claims: AuthClaims,
) -> AppResult<Json<GradeListResponse>> {
    let scope = claims.scope(&state).await?;
    let data = GradeAggregator::new(&state.db, &state.outbox)
        .department_view(&scope)
        .await?;

    Ok(Json(GradeListResponse { data }))
}

#[utoipa::path(
    get,
    path = "/grades/{id}",
    params(("id" = i32, Path, description = "Student id")),
    responses(
        (status = 200, description = "Grades of the student", body = GradeListResponse),
        (status = 404, description = "Student not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Grades"
)]
pub async fn get_student_grades(
    State(state): State<AppState>,
    claims: AuthClaims,
    Path(student_id): Path<i32>,
) -> AppResult<Json<GradeListResponse>> {
    let scope = claims.scope(&state).await?;
    let data = GradeAggregator::new(&state.db, &state.outbox)
        .student_grades(&scope, student_id)
        .await?;

    Ok(Json(GradeListResponse { data }))
}

/// Record a grade; a passing grade (>= 1.0) adds the course's credit hours
#[utoipa::path(
    post,
    path = "/grades",
    request_body = AddGradeRequest,
    responses(
        (status = 201, description = "Grade added", body = GradeDataResponse),
        (status = 400, description = "Grade outside 0.00 - 4.00 or missing fields"),
        (status = 404, description = "Student or course not found"),
        (status = 409, description = "Grade already entered for this course"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Grades"
)]
pub async fn add_grade(
    State(state): State<AppState>,
    claims: AuthClaims,
    Json(payload): Json<AddGradeRequest>,
) -> AppResult<(StatusCode, Json<GradeDataResponse>)> {
    payload.validate()?;
    let scope = claims.scope(&state).await?;

    let data = GradeAggregator::new(&state.db, &state.outbox)
        .add_grade(&scope, payload.into_add_grade())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(GradeDataResponse {
            message: "Grade added successfully!".to_string(),
            data,
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/grades/{id}",
    params(("id" = Uuid, Path, description = "Grade id")),
    request_body = UpdateGradeRequest,
    responses(
        (status = 200, description = "Grade updated", body = GradeDataResponse),
        (status = 400, description = "Grade outside 0.00 - 4.00"),
        (status = 404, description = "Grade not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Grades"
)]
pub async fn update_grade(
    State(state): State<AppState>,
    claims: AuthClaims,
    Path(grade_id): Path<Uuid>,
    Json(payload): Json<UpdateGradeRequest>,
) -> AppResult<Json<GradeDataResponse>> {
    payload.validate()?;
    let scope = claims.scope(&state).await?;

    let data = GradeAggregator::new(&state.db, &state.outbox)
        .update_grade(&scope, grade_id, payload.into_change())
        .await?;

    Ok(Json(GradeDataResponse {
        message: "Grade info updated successfully!".to_string(),
        data,
    }))
}

/// Remove a grade; credits already earned stay on the student's total
#[utoipa::path(
    delete,
    path = "/grades/{id}",
    params(("id" = Uuid, Path, description = "Grade id")),
    responses(
        (status = 200, description = "Grade deleted", body = MessageResponse),
        (status = 404, description = "Grade not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Grades"
)]
pub async fn delete_grade(
    State(state): State<AppState>,
    claims: AuthClaims,
    Path(grade_id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    let scope = claims.scope(&state).await?;
    GradeAggregator::new(&state.db, &state.outbox)
        .delete_grade(&scope, grade_id)
        .await?;

    Ok(Json(MessageResponse::new("grade deleted successfully!")))
}

/// Credit-weighted GPA of one student
#[utoipa::path(
    get,
    path = "/grades/gpa/{student_id}",
    params(("student_id" = i32, Path, description = "Student id")),
    responses(
        (status = 200, description = "GPA computed", body = GpaReport),
        (status = 404, description = "Student not found, or no grades recorded"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Grades"
)]
pub async fn get_gpa(
    State(state): State<AppState>,
    claims: AuthClaims,
    Path(student_id): Path<i32>,
) -> AppResult<Json<GpaReport>> {
    let scope = claims.scope(&state).await?;
    let report = GradeAggregator::new(&state.db, &state.outbox)
        .compute_gpa(&scope, student_id)
        .await?;

    Ok(Json(report))
}
