use axum::{Json, Router, extract::State, routing::get};

use super::dto::NotificationResponse;
use crate::error::AppResult;
use crate::extractor::AuthClaims;
use crate::repositories::NotificationRepository;
use crate::state::AppState;

pub fn create_route() -> Router<AppState> {
    Router::new().route("/notify", get(get_notifications))
}

/// Notifications of the caller's departments, newest first
#[utoipa::path(
    get,
    path = "/notify",
    responses(
        (status = 200, description = "Notifications retrieved", body = Vec<NotificationResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
pub async fn get_notifications(
    State(state): State<AppState>,
    claims: AuthClaims,
) -> AppResult<Json<Vec<NotificationResponse>>> {
    let scope = claims.scope(&state).await?;
    let notifications = NotificationRepository::new(&state.db)
        .find_in_scope(&scope)
        .await?;

    Ok(Json(
        notifications
            .into_iter()
            .map(NotificationResponse::from)
            .collect(),
    ))
}
