use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use super::dto::{
    CourseDataResponse, CourseListResponse, CourseResponse, CreateCourseRequest,
    UpdateCourseRequest,
};
use crate::error::AppResult;
use crate::extractor::AuthClaims;
use crate::routes::dto::MessageResponse;
use crate::services::course_service::CourseService;
use crate::state::AppState;

pub fn create_route() -> Router<AppState> {
    Router::new()
        .route("/courses", get(get_all_courses).post(create_course))
        .route(
            "/courses/{code}",
            get(get_course).put(update_course).delete(delete_course),
        )
}

/// Courses offered by the caller's departments
#[utoipa::path(
    get,
    path = "/courses",
    responses(
        (status = 200, description = "Courses retrieved", body = CourseListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
pub async fn get_all_courses(
    State(state): State<AppState>,
    claims: AuthClaims,
) -> AppResult<Json<CourseListResponse>> {
    let scope = claims.scope(&state).await?;
    let courses = CourseService::new(&state.db, &state.outbox)
        .list(&scope)
        .await?;

    Ok(Json(CourseListResponse {
        data: courses.into_iter().map(CourseResponse::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/courses/{code}",
    params(("code" = String, Path, description = "Course catalog code")),
    responses(
        (status = 200, description = "Course retrieved", body = CourseDataResponse),
        (status = 404, description = "Course not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
pub async fn get_course(
    State(state): State<AppState>,
    claims: AuthClaims,
    Path(code): Path<String>,
) -> AppResult<Json<CourseDataResponse>> {
    let scope = claims.scope(&state).await?;
    let course = CourseService::new(&state.db, &state.outbox)
        .get_by_code(&scope, &code)
        .await?;

    Ok(Json(CourseDataResponse {
        message: None,
        data: course.into(),
    }))
}

#[utoipa::path(
    post,
    path = "/courses",
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created", body = CourseDataResponse),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Department outside the caller's category"),
        (status = 409, description = "Course code already exists"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
pub async fn create_course(
    State(state): State<AppState>,
    claims: AuthClaims,
    Json(payload): Json<CreateCourseRequest>,
) -> AppResult<(StatusCode, Json<CourseDataResponse>)> {
    payload.validate()?;
    let scope = claims.scope(&state).await?;

    let course = CourseService::new(&state.db, &state.outbox)
        .create(&scope, payload.into_new_course())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CourseDataResponse {
            message: Some("course added successfully!".to_string()),
            data: course.into(),
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/courses/{code}",
    params(("code" = String, Path, description = "Course catalog code")),
    request_body = UpdateCourseRequest,
    responses(
        (status = 200, description = "Course updated", body = CourseDataResponse),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Target department outside the caller's category"),
        (status = 404, description = "Course not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
pub async fn update_course(
    State(state): State<AppState>,
    claims: AuthClaims,
    Path(code): Path<String>,
    Json(payload): Json<UpdateCourseRequest>,
) -> AppResult<Json<CourseDataResponse>> {
    payload.validate()?;
    let scope = claims.scope(&state).await?;

    let course = CourseService::new(&state.db, &state.outbox)
        .update(&scope, &code, payload.into_update())
        .await?;

    Ok(Json(CourseDataResponse {
        message: Some("course info updated successfully!".to_string()),
        data: course.into(),
    }))
}

/// Remove a course and every grade recorded against it
#[utoipa::path(
    delete,
    path = "/courses/{code}",
    params(("code" = String, Path, description = "Course catalog code")),
    responses(
        (status = 200, description = "Course deleted", body = MessageResponse),
        (status = 404, description = "Course not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
pub async fn delete_course(
    State(state): State<AppState>,
    claims: AuthClaims,
    Path(code): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let scope = claims.scope(&state).await?;
    CourseService::new(&state.db, &state.outbox)
        .delete(&scope, &code)
        .await?;

    Ok(Json(MessageResponse::new("course deleted successfully!")))
}
