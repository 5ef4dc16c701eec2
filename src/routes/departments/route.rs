use axum::{Json, Router, extract::State, http::StatusCode, routing::get};

use super::dto::{CreateDepartmentRequest, DepartmentResponse};
use crate::error::AppResult;
use crate::extractor::AuthClaims;
use crate::repositories::DepartmentRepository;
use crate::state::AppState;

pub fn create_route() -> Router<AppState> {
    Router::new().route("/dept", get(get_departments).post(create_department))
}

/// Departments in the caller's category
#[utoipa::path(
    get,
    path = "/dept",
    responses(
        (status = 200, description = "Departments retrieved", body = Vec<DepartmentResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Departments"
)]
pub async fn get_departments(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
) -> AppResult<Json<Vec<DepartmentResponse>>> {
    let departments = DepartmentRepository::new(&state.db)
        .find_by_category(&claims.department_category)
        .await?;

    Ok(Json(
        departments.into_iter().map(DepartmentResponse::from).collect(),
    ))
}

/// Create a department (Admin only)
#[utoipa::path(
    post,
    path = "/dept",
    request_body = CreateDepartmentRequest,
    responses(
        (status = 201, description = "Department created", body = DepartmentResponse),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 409, description = "Name or code already used"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Departments"
)]
pub async fn create_department(
    State(state): State<AppState>,
    claims: AuthClaims,
    Json(payload): Json<CreateDepartmentRequest>,
) -> AppResult<(StatusCode, Json<DepartmentResponse>)> {
    claims.require_admin()?;
    payload.validate()?;

    let department = DepartmentRepository::new(&state.db)
        .create(
            payload.name.trim().to_string(),
            payload.code.trim().to_string(),
            payload.category.trim().to_string(),
        )
        .await?;

    tracing::info!(
        department_id = %department.department_id,
        category = %department.category,
        "Department created"
    );

    Ok((StatusCode::CREATED, Json(department.into())))
}
