use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::post,
};

use super::dto::SendEmailRequest;
use crate::error::AppResult;
use crate::extractor::AuthClaims;
use crate::routes::dto::MessageResponse;
use crate::services::student_service::StudentService;
use crate::state::AppState;

pub fn create_route() -> Router<AppState> {
    Router::new().route("/email/{student_id}", post(send_email))
}

/// Queue an email to a student for the mail worker
#[utoipa::path(
    post,
    path = "/email/{student_id}",
    params(("student_id" = i32, Path, description = "Student id")),
    request_body = SendEmailRequest,
    responses(
        (status = 202, description = "Email queued", body = MessageResponse),
        (status = 400, description = "Missing subject or body"),
        (status = 404, description = "Student not found"),
        (status = 503, description = "Mail queue unavailable"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Email"
)]
pub async fn send_email(
    State(state): State<AppState>,
    claims: AuthClaims,
    Path(student_id): Path<i32>,
    Json(payload): Json<SendEmailRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    payload.validate()?;
    let scope = claims.scope(&state).await?;

    let student = StudentService::new(&state.db, &state.outbox)
        .get(&scope, student_id)
        .await?;

    let Some(mail_queue) = state.mail_queue.as_ref() else {
        return Ok((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(MessageResponse::new(
                "mail service unavailable, try again later",
            )),
        ));
    };

    mail_queue
        .publish_email(&student.email, &payload.subject, &payload.body)
        .await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(MessageResponse::new(format!(
            "email sent to {} successfully!",
            student.name
        ))),
    ))
}
