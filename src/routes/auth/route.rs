use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use super::dto::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UserResponse};
use crate::config::TOKEN_COOKIE_NAME;
use crate::entities::sea_orm_active_enums::RoleEnum;
use crate::error::{AppError, AppResult};
use crate::extractor::AuthClaims;
use crate::repositories::{NewUser, UserRepository};
use crate::routes::dto::MessageResponse;
use crate::state::AppState;

pub fn create_route() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/logout", get(logout))
        .route("/user", get(list_users))
}

fn token_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .build()
}

/// Login endpoint, sets the `token` cookie and returns the JWT
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Authentication"
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> AppResult<(CookieJar, Json<LoginResponse>)> {
    payload.validate()?;

    let user_info = UserRepository::new(&state.db)
        .find_by_email(payload.email.trim())
        .await?
        .ok_or_else(|| AppError::Auth("Invalid email or password.".to_string()))?;

    let password_valid = bcrypt::verify(&payload.password, &user_info.password)
        .map_err(|e| anyhow::anyhow!("Password verification error: {}", e))?;

    if !password_valid {
        return Err(AppError::Auth("Invalid email or password.".to_string()));
    }

    let token = state.jwt.create_jwt(
        &user_info.user_id.to_string(),
        &user_info.name,
        user_info.role,
        &user_info.department_category,
        state.jwt_expires_in,
    )?;

    tracing::info!(user_id = %user_info.user_id, "User logged in");

    let jar = jar.add(token_cookie(token.clone(), state.secure_cookies));
    let response = LoginResponse {
        message: "Login successful!".to_string(),
        user: user_info.into(),
        token,
    };

    Ok((jar, Json(response)))
}

/// Create a dashboard user (Admin only)
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = RegisterResponse),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 409, description = "Email already registered"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
pub async fn register(
    State(state): State<AppState>,
    claims: AuthClaims,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    claims.require_admin()?;
    payload.validate()?;

    let users = UserRepository::new(&state.db);
    if users.find_by_email(&payload.email).await?.is_some() {
        return Err(AppError::Duplicate("Email already registered.".to_string()));
    }

    let password_hash = bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;

    let created = users
        .create(NewUser {
            name: payload.name,
            email: payload.email,
            password_hash,
            department_category: payload.department_category,
            role: payload.role.unwrap_or(RoleEnum::Staff),
        })
        .await?;

    tracing::info!(user_id = %created.user_id, created_by = %claims.0.user_id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "signed up!".to_string(),
            user: created.into(),
        }),
    ))
}

/// Clears the `token` cookie
#[utoipa::path(
    get,
    path = "/logout",
    responses(
        (status = 200, description = "Logout successful", body = MessageResponse)
    ),
    tag = "Authentication"
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    let mut cookie = Cookie::from(TOKEN_COOKIE_NAME);
    cookie.set_path("/");
    cookie.make_removal();
    // added rather than removed so the expiry is sent even without a cookie on the request
    (jar.add(cookie), Json(MessageResponse::new("logged out")))
}

/// List every dashboard user (Admin only)
#[utoipa::path(
    get,
    path = "/user",
    responses(
        (status = 200, description = "Users retrieved", body = Vec<UserResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
pub async fn list_users(
    State(state): State<AppState>,
    claims: AuthClaims,
) -> AppResult<Json<Vec<UserResponse>>> {
    claims.require_admin()?;

    let users = UserRepository::new(&state.db).find_all().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}
