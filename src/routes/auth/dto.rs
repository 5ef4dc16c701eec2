use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::{sea_orm_active_enums::RoleEnum, user};
use crate::error::AppError;
use crate::routes::dto::{require_email, require_text};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "admin@uni.edu")]
    #[serde(default)]
    pub email: String,

    #[schema(example = "password123")]
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(AppError::Validation(
                "Email and password are required.".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: RoleEnum,
    pub department_category: String,
    pub created_at: NaiveDateTime,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.user_id,
            name: model.name,
            email: model.email,
            role: model.role,
            department_category: model.department_category,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub user: UserResponse,
    pub token: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "Dana Staff")]
    pub name: String,

    #[schema(example = "dana@uni.edu")]
    pub email: String,

    #[schema(example = "password123")]
    pub password: String,

    #[schema(example = "IT")]
    pub department_category: String,

    pub role: Option<RoleEnum>,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text(&self.name, "name")?;
        require_email(&self.email)?;
        require_text(&self.department_category, "departmentCategory")?;
        if self.password.len() < MIN_PASSWORD_LEN {
            return Err(AppError::Validation(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(password: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Dana".to_string(),
            email: "dana@uni.edu".to_string(),
            password: password.to_string(),
            department_category: "IT".to_string(),
            role: None,
        }
    }

    #[test]
    fn login_requires_both_fields() {
        let request: LoginRequest = serde_json::from_str(r#"{"email":"a@b.co"}"#).unwrap();
        assert!(matches!(request.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn short_passwords_are_rejected() {
        assert!(register("short").validate().is_err());
        assert!(register("long enough").validate().is_ok());
    }
}
