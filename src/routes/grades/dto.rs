use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::routes::dto::require_text;
use crate::services::grade_aggregator::{AddGrade, GradeChange, GradeView};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddGradeRequest {
    /// Student id.
    #[schema(example = 1)]
    pub student: i32,
    /// Course catalog code.
    #[schema(example = "CS101")]
    pub course: String,
    #[schema(value_type = f64, example = 3.5)]
    pub grade: Decimal,
    #[schema(example = "Fall 2025")]
    pub semester: String,
}

impl AddGradeRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text(&self.course, "course")?;
        require_text(&self.semester, "semester")
    }

    pub fn into_add_grade(self) -> AddGrade {
        AddGrade {
            student_id: self.student,
            course_code: self.course.trim().to_string(),
            grade: self.grade,
            semester: self.semester.trim().to_string(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGradeRequest {
    #[schema(value_type = f64, example = 3.0)]
    pub grade: Decimal,
    pub semester: Option<String>,
}

impl UpdateGradeRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(semester) = &self.semester {
            require_text(semester, "semester")?;
        }
        Ok(())
    }

    pub fn into_change(self) -> GradeChange {
        GradeChange {
            grade: self.grade,
            semester: self.semester.map(|s| s.trim().to_string()),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GradeListResponse {
    pub data: Vec<GradeView>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GradeDataResponse {
    pub message: String,
    pub data: GradeView,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_numeric_and_string_grades() {
        let numeric: AddGradeRequest = serde_json::from_str(
            r#"{"student":1,"course":"CS101","grade":3.5,"semester":"Fall"}"#,
        )
        .unwrap();
        let text: AddGradeRequest = serde_json::from_str(
            r#"{"student":1,"course":"CS101","grade":"3.5","semester":"Fall"}"#,
        )
        .unwrap();

        assert_eq!(numeric.grade, Decimal::new(35, 1));
        assert_eq!(text.grade, Decimal::new(35, 1));
    }

    #[test]
    fn blank_semester_is_rejected() {
        let request = UpdateGradeRequest {
            grade: Decimal::ONE,
            semester: Some(" ".to_string()),
        };
        assert!(request.validate().is_err());
    }
}
