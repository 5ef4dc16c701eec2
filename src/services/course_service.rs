use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use uuid::Uuid;

use crate::entities::course;
use crate::error::{AppError, AppResult};
use crate::repositories::{
    CourseRepository, CourseUpdate, GradeRepository, NewCourse, StudentRepository,
};
use crate::services::access_filter::AccessScope;
use crate::services::grade_aggregator::is_passing;
use crate::services::notification_emitter::{self, NewNotification, OutboxSignal};

pub struct CourseService<'a> {
    db: &'a DatabaseConnection,
    outbox: &'a OutboxSignal,
}

impl<'a> CourseService<'a> {
    pub fn new(db: &'a DatabaseConnection, outbox: &'a OutboxSignal) -> Self {
        Self { db, outbox }
    }

    pub async fn list(&self, scope: &AccessScope) -> AppResult<Vec<course::Model>> {
        Ok(CourseRepository::new(self.db).find_in_scope(scope).await?)
    }

    pub async fn get_by_code(&self, scope: &AccessScope, code: &str) -> AppResult<course::Model> {
        let course = CourseRepository::new(self.db)
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::NotFound("no data found".to_string()))?;
        scope.ensure_visible(course.department_id, "Course")?;
        Ok(course)
    }

    pub async fn create(
        &self,
        scope: &AccessScope,
        new_course: NewCourse,
    ) -> AppResult<course::Model> {
        scope.ensure_writable(new_course.department_id)?;

        let txn = self.db.begin().await?;
        let courses = CourseRepository::new(&txn);
        if courses.find_by_code(&new_course.code).await?.is_some() {
            return Err(AppError::Duplicate(format!(
                "Course {} already exists",
                new_course.code
            )));
        }

        let created = courses.create(new_course).await?;

        notification_emitter::record(
            &txn,
            NewNotification::new(
                "New Course Added",
                format!("Course number {} has been added to the list.", created.code),
                Some(created.department_id),
            ),
        )
        .await;

        txn.commit().await?;
        self.outbox.wake();

        tracing::info!(course = %created.code, "Course added");
        Ok(created)
    }

    pub async fn update(
        &self,
        scope: &AccessScope,
        code: &str,
        updates: CourseUpdate,
    ) -> AppResult<course::Model> {
        if let Some(department_id) = updates.department_id {
            scope.ensure_writable(department_id)?;
        }

        let txn = self.db.begin().await?;
        let courses = CourseRepository::new(&txn);
        let existing = courses
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::NotFound("course not found".to_string()))?;
        scope.ensure_visible(existing.department_id, "course")?;

        let previous_hours = existing.credit_hours;
        let updated = courses.update(existing, updates).await?;

        let hours_delta = updated.credit_hours - previous_hours;
        if hours_delta != 0 {
            Self::shift_earned_credits(&txn, updated.course_id, hours_delta).await?;
        }

        notification_emitter::record(
            &txn,
            NewNotification::new(
                "Course Info Changed",
                format!("Course number {} has been updated.", updated.code),
                Some(updated.department_id),
            ),
        )
        .await;

        txn.commit().await?;
        self.outbox.wake();

        tracing::info!(course = %updated.code, "Course updated");
        Ok(updated)
    }

    /// Moves every passing student's total by the change in the course's hours,
    /// so later grade transitions subtract what was actually credited.
    async fn shift_earned_credits<C: ConnectionTrait>(
        txn: &C,
        course_id: Uuid,
        hours_delta: i32,
    ) -> AppResult<()> {
        let students = StudentRepository::new(txn);
        let passing = GradeRepository::new(txn)
            .find_by_course(course_id)
            .await?
            .into_iter()
            .filter(|grade| is_passing(grade.grade));

        let mut shifted = 0;
        for grade in passing {
            if students.find_by_id_for_update(grade.student_id).await?.is_some() {
                students.add_total_credits(grade.student_id, hours_delta).await?;
                shifted += 1;
            }
        }

        tracing::debug!(course_id = %course_id, hours_delta, shifted, "Shifted earned credits");
        Ok(())
    }

    /// Deletes the course together with every grade recorded against it.
    pub async fn delete(&self, scope: &AccessScope, code: &str) -> AppResult<()> {
        let txn = self.db.begin().await?;
        let courses = CourseRepository::new(&txn);
        let existing = courses
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::NotFound("course not found".to_string()))?;
        scope.ensure_visible(existing.department_id, "course")?;

        let removed_grades = GradeRepository::new(&txn)
            .delete_by_course(existing.course_id)
            .await?;
        courses.delete(existing.course_id).await?;

        notification_emitter::record(
            &txn,
            NewNotification::new(
                "Course Deleted",
                format!("Course number {} has been deleted.", existing.code),
                Some(existing.department_id),
            ),
        )
        .await;

        txn.commit().await?;
        self.outbox.wake();

        tracing::info!(course = %existing.code, removed_grades, "Course deleted");
        Ok(())
    }
}
