use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::routes::dto::require_text;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SendEmailRequest {
    #[schema(example = "Academic report")]
    pub subject: String,
    #[schema(example = "Your grades for Fall 2025 are available.")]
    pub body: String,
}

impl SendEmailRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text(&self.subject, "subject")?;
        require_text(&self.body, "body")
    }
}
