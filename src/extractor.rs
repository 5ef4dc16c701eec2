use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;
use http::header::AUTHORIZATION;
use uuid::Uuid;

use crate::config::TOKEN_COOKIE_NAME;
use crate::entities::sea_orm_active_enums::RoleEnum;
use crate::error::{AppError, AppResult};
use crate::repositories::UserRepository;
use crate::services::access_filter::AccessScope;
use crate::state::AppState;
use crate::utils::jwt::TokenClaims;

/// Verified claims of the caller, read from the `token` cookie or a bearer header.
///
/// Role and department category come from the user's current row, not from the
/// token, so a deleted user loses access and a moved user gets the new scope.
pub struct AuthClaims(pub TokenClaims);

impl AuthClaims {
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.0.role != RoleEnum::Admin {
            return Err(AppError::Forbidden("Access denied".to_string()));
        }
        Ok(())
    }

    /// Departments the caller may read and write.
    pub async fn scope(&self, state: &AppState) -> AppResult<AccessScope> {
        AccessScope::resolve(&state.db, &self.0.department_category).await
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
}

impl FromRequestParts<AppState> for AuthClaims {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let cookie_token = CookieJar::from_headers(&parts.headers)
            .get(TOKEN_COOKIE_NAME)
            .map(|cookie| cookie.value().to_string());
        let candidates: Vec<String> = cookie_token.into_iter().chain(bearer_token(parts)).collect();

        if candidates.is_empty() {
            return Err(AppError::Auth("no token found!".to_string()));
        }

        // a stale cookie must not hide a valid bearer header
        let mut claims = candidates
            .iter()
            .find_map(|token| match state.jwt.verify_jwt(token) {
                Ok(claims) => Some(claims),
                Err(e) => {
                    tracing::debug!("token rejected: {}", e);
                    None
                }
            })
            .ok_or_else(|| AppError::Auth("invalid or expired token".to_string()))?;

        let user_id = Uuid::parse_str(&claims.user_id)
            .map_err(|_| AppError::Auth("invalid or expired token".to_string()))?;
        let user = UserRepository::new(&state.db)
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Auth("user no longer exists".to_string()))?;

        claims.name = user.name;
        claims.role = user.role;
        claims.department_category = user.department_category;

        Ok(AuthClaims(claims))
    }
}
