use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::student;
use crate::error::AppError;
use crate::repositories::{NewStudent, StudentUpdate};
use crate::routes::dto::{require_email, require_text};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub department_id: Uuid,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub enrollment_date: NaiveDate,
    pub entry_date: Option<NaiveDate>,
    pub expected_graduation: Option<NaiveDate>,
    pub advisor: Option<String>,
    pub year_level: i32,
    pub total_credits: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<student::Model> for StudentResponse {
    fn from(model: student::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            department_id: model.department_id,
            phone: model.phone,
            address: model.address,
            enrollment_date: model.enrollment_date,
            entry_date: model.entry_date,
            expected_graduation: model.expected_graduation,
            advisor: model.advisor,
            year_level: model.year_level,
            total_credits: model.total_credits,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentListResponse {
    pub data: Vec<StudentResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentDataResponse {
    pub message: Option<String>,
    pub data: StudentResponse,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentRequest {
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "ada@uni.edu")]
    pub email: String,
    pub department_id: Uuid,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Defaults to today.
    pub enrollment_date: Option<NaiveDate>,
    pub entry_date: Option<NaiveDate>,
    pub expected_graduation: Option<NaiveDate>,
    pub advisor: Option<String>,
    #[schema(example = 1)]
    pub year_level: Option<i32>,
}

fn check_year_level(year_level: Option<i32>) -> Result<(), AppError> {
    match year_level {
        Some(level) if level < 1 => Err(AppError::Validation(
            "yearLevel must be at least 1".to_string(),
        )),
        _ => Ok(()),
    }
}

impl CreateStudentRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text(&self.name, "name")?;
        require_email(&self.email)?;
        check_year_level(self.year_level)
    }

    pub fn into_new_student(self) -> NewStudent {
        NewStudent {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            department_id: self.department_id,
            phone: self.phone,
            address: self.address,
            enrollment_date: self
                .enrollment_date
                .unwrap_or_else(|| Utc::now().date_naive()),
            entry_date: self.entry_date,
            expected_graduation: self.expected_graduation,
            advisor: self.advisor,
            year_level: self.year_level.unwrap_or(1),
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub department_id: Option<Uuid>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub entry_date: Option<NaiveDate>,
    pub expected_graduation: Option<NaiveDate>,
    pub advisor: Option<String>,
    pub year_level: Option<i32>,
}

impl UpdateStudentRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(name) = &self.name {
            require_text(name, "name")?;
        }
        if let Some(email) = &self.email {
            require_email(email)?;
        }
        check_year_level(self.year_level)
    }

    pub fn into_update(self) -> StudentUpdate {
        StudentUpdate {
            name: self.name.map(|name| name.trim().to_string()),
            email: self.email.map(|email| email.trim().to_lowercase()),
            department_id: self.department_id,
            phone: self.phone,
            address: self.address,
            entry_date: self.entry_date,
            expected_graduation: self.expected_graduation,
            advisor: self.advisor,
            year_level: self.year_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_defaults_year_level_and_enrollment_date() {
        let request: CreateStudentRequest = serde_json::from_value(serde_json::json!({
            "name": " Ada ",
            "email": "Ada@Uni.edu",
            "departmentId": Uuid::nil(),
        }))
        .unwrap();

        request.validate().unwrap();
        let new_student = request.into_new_student();
        assert_eq!(new_student.name, "Ada");
        assert_eq!(new_student.email, "ada@uni.edu");
        assert_eq!(new_student.year_level, 1);
        assert_eq!(new_student.enrollment_date, Utc::now().date_naive());
    }

    #[test]
    fn update_rejects_year_level_zero() {
        let request = UpdateStudentRequest {
            year_level: Some(0),
            ..Default::default()
        };
        assert!(matches!(request.validate(), Err(AppError::Validation(_))));
    }
}
