use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::department;
use crate::error::AppError;
use crate::routes::dto::require_text;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentResponse {
    pub department_id: Uuid,
    #[schema(example = "Computer Science")]
    pub name: String,
    #[schema(example = "CS")]
    pub code: String,
    #[schema(example = "IT")]
    pub category: String,
}

impl From<department::Model> for DepartmentResponse {
    fn from(model: department::Model) -> Self {
        Self {
            department_id: model.department_id,
            name: model.name,
            code: model.code,
            category: model.category,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepartmentRequest {
    pub name: String,
    pub code: String,
    pub category: String,
}

impl CreateDepartmentRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text(&self.name, "name")?;
        require_text(&self.code, "code")?;
        require_text(&self.category, "category")
    }
}
