use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::course;
use crate::error::AppError;
use crate::repositories::{CourseUpdate, NewCourse};
use crate::routes::dto::require_text;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    pub course_id: Uuid,
    pub code: String,
    pub name: String,
    pub credit_hours: i32,
    pub instructor: String,
    pub department_id: Uuid,
    pub schedule: String,
    pub capacity: i32,
    pub enrolled: i32,
    pub semester: String,
    pub room: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<course::Model> for CourseResponse {
    fn from(model: course::Model) -> Self {
        Self {
            course_id: model.course_id,
            code: model.code,
            name: model.name,
            credit_hours: model.credit_hours,
            instructor: model.instructor,
            department_id: model.department_id,
            schedule: model.schedule,
            capacity: model.capacity,
            enrolled: model.enrolled,
            semester: model.semester,
            room: model.room,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseListResponse {
    pub data: Vec<CourseResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseDataResponse {
    pub message: Option<String>,
    pub data: CourseResponse,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    #[schema(example = "CS101")]
    pub code: String,
    #[schema(example = "Intro to Programming")]
    pub name: String,
    #[schema(example = 3)]
    pub credit_hours: i32,
    pub instructor: String,
    pub department_id: Uuid,
    #[serde(default)]
    pub schedule: String,
    #[serde(default)]
    pub capacity: i32,
    #[schema(example = "Fall 2025")]
    pub semester: String,
    #[serde(default)]
    pub room: String,
}

fn check_credit_hours(credit_hours: i32) -> Result<(), AppError> {
    if credit_hours <= 0 {
        return Err(AppError::Validation(
            "creditHours must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

fn check_capacity(capacity: i32) -> Result<(), AppError> {
    if capacity < 0 {
        return Err(AppError::Validation(
            "capacity cannot be negative".to_string(),
        ));
    }
    Ok(())
}

impl CreateCourseRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text(&self.code, "code")?;
        require_text(&self.name, "name")?;
        require_text(&self.instructor, "instructor")?;
        require_text(&self.semester, "semester")?;
        check_credit_hours(self.credit_hours)?;
        check_capacity(self.capacity)
    }

    pub fn into_new_course(self) -> NewCourse {
        NewCourse {
            code: self.code.trim().to_string(),
            name: self.name.trim().to_string(),
            credit_hours: self.credit_hours,
            instructor: self.instructor,
            department_id: self.department_id,
            schedule: self.schedule,
            capacity: self.capacity,
            semester: self.semester,
            room: self.room,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    pub name: Option<String>,
    pub credit_hours: Option<i32>,
    pub instructor: Option<String>,
    pub department_id: Option<Uuid>,
    pub schedule: Option<String>,
    pub capacity: Option<i32>,
    pub enrolled: Option<i32>,
    pub semester: Option<String>,
    pub room: Option<String>,
}

impl UpdateCourseRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(name) = &self.name {
            require_text(name, "name")?;
        }
        if let Some(credit_hours) = self.credit_hours {
            check_credit_hours(credit_hours)?;
        }
        if let Some(capacity) = self.capacity {
            check_capacity(capacity)?;
        }
        if self.enrolled.is_some_and(|enrolled| enrolled < 0) {
            return Err(AppError::Validation(
                "enrolled cannot be negative".to_string(),
            ));
        }
        Ok(())
    }

    pub fn into_update(self) -> CourseUpdate {
        CourseUpdate {
            name: self.name,
            credit_hours: self.credit_hours,
            instructor: self.instructor,
            department_id: self.department_id,
            schedule: self.schedule,
            capacity: self.capacity,
            enrolled: self.enrolled,
            semester: self.semester,
            room: self.room,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0)]
    #[case(-3)]
    fn non_positive_credit_hours_are_rejected(#[case] credit_hours: i32) {
        let request = UpdateCourseRequest {
            credit_hours: Some(credit_hours),
            ..Default::default()
        };
        assert!(matches!(request.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn create_requires_a_code() {
        let request: CreateCourseRequest = serde_json::from_value(serde_json::json!({
            "code": "",
            "name": "Databases",
            "creditHours": 3,
            "instructor": "Dr. Codd",
            "departmentId": Uuid::nil(),
            "semester": "Fall",
        }))
        .unwrap();
        assert!(request.validate().is_err());
    }
}
