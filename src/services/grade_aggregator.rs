//! Grade recording and GPA aggregation.
//!
//! Credit accrual follows one rule everywhere: a grade of at least
//! [`PASSING_GRADE`] earns the course's credit hours, anything below earns
//! nothing. Adds and updates move `total_credits` by the difference between
//! what the grade earned before and after, so repeated updates never count a
//! course twice. Deleting a grade leaves the stored total untouched.

use rust_decimal::RoundingStrategy;
use sea_orm::{DatabaseConnection, TransactionTrait, prelude::Decimal};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::{course, grade, student};
use crate::error::{AppError, AppResult};
use crate::repositories::{CourseRepository, GradeRepository, StudentRepository};
use crate::services::access_filter::AccessScope;
use crate::services::notification_emitter::{self, NewNotification, OutboxSignal};

pub const PASSING_GRADE: Decimal = Decimal::ONE;
pub const MAX_GRADE: Decimal = Decimal::from_parts(4, 0, 0, false, 0);
/// Matches the precision of the `grade` column.
pub const GRADE_SCALE: u32 = 2;

pub fn validate_grade(value: Decimal) -> AppResult<()> {
    if value < Decimal::ZERO || value > MAX_GRADE {
        return Err(AppError::Validation(format!(
            "grade must be between 0.0 and 4.0, got {}",
            value
        )));
    }
    // The column keeps two decimals, so a rounded value could cross the passing line
    if value.normalize().scale() > GRADE_SCALE {
        return Err(AppError::Validation(format!(
            "grade allows at most {} decimal places, got {}",
            GRADE_SCALE, value
        )));
    }
    Ok(())
}

pub fn is_passing(value: Decimal) -> bool {
    value >= PASSING_GRADE
}

pub fn earned_credits(value: Decimal, credit_hours: i32) -> i32 {
    if is_passing(value) { credit_hours } else { 0 }
}

/// Change in earned credits when a grade moves from `previous` to `next`.
pub fn credit_delta(previous: Decimal, next: Decimal, credit_hours: i32) -> i32 {
    earned_credits(next, credit_hours) - earned_credits(previous, credit_hours)
}

/// Credit-weighted mean `Σ(grade × hours) / Σ(hours)`, zero when there are no hours.
///
/// Failing grades stay in both sums.
pub fn weighted_gpa<I>(entries: I) -> Decimal
where
    I: IntoIterator<Item = (Decimal, i32)>,
{
    let (points, hours) = entries
        .into_iter()
        .fold((Decimal::ZERO, Decimal::ZERO), |(points, hours), (value, credit_hours)| {
            let credit_hours = Decimal::from(credit_hours);
            (points + value * credit_hours, hours + credit_hours)
        });

    if hours.is_zero() {
        Decimal::ZERO
    } else {
        points / hours
    }
}

/// Two decimals, halves rounded away from zero.
pub fn format_gpa(gpa: Decimal) -> String {
    let mut rounded = gpa.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}

pub struct AddGrade {
    pub student_id: i32,
    pub course_code: String,
    pub grade: Decimal,
    pub semester: String,
}

pub struct GradeChange {
    pub grade: Decimal,
    pub semester: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GpaReport {
    pub student: String,
    pub student_id: i32,
    #[serde(rename = "GPA")]
    pub gpa: String,
    /// Stored running total.
    pub total_credits: i32,
    /// Recomputed from the current grade set.
    pub earned_credits: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentRef {
    pub name: String,
    pub student_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseRef {
    pub name: String,
    pub course_id: String,
    pub instructor: String,
    pub semester: String,
    pub credit_hours: i32,
}

/// Flattened grade row used by every grade listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GradeView {
    pub grade_id: Uuid,
    #[schema(value_type = String, example = "3.50")]
    pub grade: Decimal,
    pub semester: String,
    pub student: StudentRef,
    pub course: CourseRef,
}

impl GradeView {
    fn build(grade: &grade::Model, student: &student::Model, course: &course::Model) -> Self {
        Self {
            grade_id: grade.grade_id,
            grade: grade.grade,
            semester: grade.semester.clone(),
            student: StudentRef {
                name: student.name.clone(),
                student_id: student.id,
            },
            course: CourseRef {
                name: course.name.clone(),
                course_id: course.code.clone(),
                instructor: course.instructor.clone(),
                semester: course.semester.clone(),
                credit_hours: course.credit_hours,
            },
        }
    }
}

pub struct GradeAggregator<'a> {
    db: &'a DatabaseConnection,
    outbox: &'a OutboxSignal,
}

impl<'a> GradeAggregator<'a> {
    pub fn new(db: &'a DatabaseConnection, outbox: &'a OutboxSignal) -> Self {
        Self { db, outbox }
    }

    pub async fn add_grade(&self, scope: &AccessScope, input: AddGrade) -> AppResult<GradeView> {
        validate_grade(input.grade)?;
        if input.semester.trim().is_empty() {
            return Err(AppError::Validation("semester is required".to_string()));
        }

        let txn = self.db.begin().await?;

        let student = StudentRepository::new(&txn)
            .find_by_id_for_update(input.student_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;
        scope.ensure_visible(student.department_id, "Student")?;

        let course = CourseRepository::new(&txn)
            .find_by_code(&input.course_code)
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

        let grades = GradeRepository::new(&txn);
        if grades
            .find_by_student_and_course(student.id, course.course_id)
            .await?
            .is_some()
        {
            return Err(AppError::Duplicate(
                "This course was already entered!".to_string(),
            ));
        }

        let created = grades
            .create(student.id, course.course_id, input.grade, input.semester)
            .await?;

        let passing = is_passing(input.grade);
        if passing {
            StudentRepository::new(&txn)
                .add_total_credits(student.id, course.credit_hours)
                .await?;

            notification_emitter::record(
                &txn,
                NewNotification::new(
                    "Course Completed",
                    format!(
                        "Student {} has completed the course {} and their grade is {}.",
                        student.name, course.name, input.grade
                    ),
                    Some(student.department_id),
                ),
            )
            .await;
        }

        txn.commit().await?;
        if passing {
            self.outbox.wake();
        }

        tracing::info!(
            grade_id = %created.grade_id,
            student_id = student.id,
            course = %course.code,
            "Grade added"
        );

        Ok(GradeView::build(&created, &student, &course))
    }

    pub async fn update_grade(
        &self,
        scope: &AccessScope,
        grade_id: Uuid,
        change: GradeChange,
    ) -> AppResult<GradeView> {
        validate_grade(change.grade)?;

        let txn = self.db.begin().await?;

        let grades = GradeRepository::new(&txn);
        let existing = grades
            .find_by_id(grade_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Grade not found".to_string()))?;

        let students = StudentRepository::new(&txn);
        let student = students
            .find_by_id_for_update(existing.student_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Grade not found".to_string()))?;
        scope.ensure_visible(student.department_id, "Grade")?;

        let course = CourseRepository::new(&txn)
            .find_by_id(existing.course_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

        let delta = credit_delta(existing.grade, change.grade, course.credit_hours);
        let updated = grades
            .update_value(existing, change.grade, change.semester)
            .await?;

        if delta != 0 {
            students.add_total_credits(student.id, delta).await?;
        }

        notification_emitter::record(
            &txn,
            NewNotification::new(
                "Grade Updated",
                format!(
                    "Grade for student {} in course {} has been updated to {}.",
                    student.name, course.name, updated.grade
                ),
                Some(student.department_id),
            ),
        )
        .await;

        txn.commit().await?;
        self.outbox.wake();

        tracing::info!(grade_id = %grade_id, credit_delta = delta, "Grade updated");

        Ok(GradeView::build(&updated, &student, &course))
    }

    /// Removes the grade. Credits it earned stay on the student's total.
    pub async fn delete_grade(&self, scope: &AccessScope, grade_id: Uuid) -> AppResult<()> {
        let txn = self.db.begin().await?;

        let grades = GradeRepository::new(&txn);
        let existing = grades
            .find_by_id(grade_id)
            .await?
            .ok_or_else(|| AppError::NotFound("grade not found".to_string()))?;

        let student = StudentRepository::new(&txn)
            .find_by_id(existing.student_id)
            .await?
            .ok_or_else(|| AppError::NotFound("grade not found".to_string()))?;
        scope.ensure_visible(student.department_id, "grade")?;

        let course_name = CourseRepository::new(&txn)
            .find_by_id(existing.course_id)
            .await?
            .map(|course| course.name)
            .unwrap_or_default();

        grades.delete(grade_id).await?;

        notification_emitter::record(
            &txn,
            NewNotification::new(
                "Grade Deleted",
                format!(
                    "Grade for student {} in course {} has been deleted.",
                    student.name, course_name
                ),
                Some(student.department_id),
            ),
        )
        .await;

        txn.commit().await?;
        self.outbox.wake();

        tracing::info!(grade_id = %grade_id, "Grade deleted");
        Ok(())
    }

    pub async fn compute_gpa(&self, scope: &AccessScope, student_id: i32) -> AppResult<GpaReport> {
        let student = self.visible_student(scope, student_id).await?;

        let graded = GradeRepository::new(self.db)
            .find_with_course_for_students(vec![student.id])
            .await?;

        if graded.is_empty() {
            return Err(AppError::NoData(
                "No grades found for this student.".to_string(),
            ));
        }

        let entries: Vec<(Decimal, i32)> = graded
            .iter()
            .map(|(grade, course)| {
                (
                    grade.grade,
                    course.as_ref().map(|c| c.credit_hours).unwrap_or(0),
                )
            })
            .collect();

        let earned: i32 = entries
            .iter()
            .map(|(value, hours)| earned_credits(*value, *hours))
            .sum();

        Ok(GpaReport {
            student: student.name,
            student_id: student.id,
            gpa: format_gpa(weighted_gpa(entries)),
            total_credits: student.total_credits,
            earned_credits: earned,
        })
    }

    pub async fn student_grades(
        &self,
        scope: &AccessScope,
        student_id: i32,
    ) -> AppResult<Vec<GradeView>> {
        let student = self.visible_student(scope, student_id).await?;

        let graded = GradeRepository::new(self.db)
            .find_with_course_for_students(vec![student.id])
            .await?;

        Ok(graded
            .iter()
            .filter_map(|(grade, course)| {
                course
                    .as_ref()
                    .map(|course| GradeView::build(grade, &student, course))
            })
            .collect())
    }

    /// Grades of every student in the caller's department category.
    pub async fn department_view(&self, scope: &AccessScope) -> AppResult<Vec<GradeView>> {
        let students = StudentRepository::new(self.db).find_in_scope(scope).await?;
        if students.is_empty() {
            return Ok(Vec::new());
        }

        let graded = GradeRepository::new(self.db)
            .find_with_course_for_students(students.iter().map(|s| s.id).collect())
            .await?;

        Ok(graded
            .iter()
            .filter_map(|(grade, course)| {
                let student = students.iter().find(|s| s.id == grade.student_id)?;
                let course = course.as_ref()?;
                Some(GradeView::build(grade, student, course))
            })
            .collect())
    }

    async fn visible_student(
        &self,
        scope: &AccessScope,
        student_id: i32,
    ) -> AppResult<student::Model> {
        let student = StudentRepository::new(self.db)
            .find_by_id(student_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Student not found.".to_string()))?;
        scope.ensure_visible(student.department_id, "Student")?;
        Ok(student)
    }
}
