use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::entities::student;
use crate::error::{AppError, AppResult};
use crate::repositories::{GradeRepository, NewStudent, StudentRepository, StudentUpdate};
use crate::services::access_filter::AccessScope;
use crate::services::notification_emitter::{self, NewNotification, OutboxSignal};

pub struct StudentService<'a> {
    db: &'a DatabaseConnection,
    outbox: &'a OutboxSignal,
}

impl<'a> StudentService<'a> {
    pub fn new(db: &'a DatabaseConnection, outbox: &'a OutboxSignal) -> Self {
        Self { db, outbox }
    }

    pub async fn list(&self, scope: &AccessScope) -> AppResult<Vec<student::Model>> {
        Ok(StudentRepository::new(self.db).find_in_scope(scope).await?)
    }

    pub async fn get(&self, scope: &AccessScope, id: i32) -> AppResult<student::Model> {
        let student = StudentRepository::new(self.db)
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;
        scope.ensure_visible(student.department_id, "Student")?;
        Ok(student)
    }

    pub async fn create(
        &self,
        scope: &AccessScope,
        new_student: NewStudent,
    ) -> AppResult<student::Model> {
        scope.ensure_writable(new_student.department_id)?;

        let txn = self.db.begin().await?;
        let created = StudentRepository::new(&txn).create(new_student).await?;

        notification_emitter::record(
            &txn,
            NewNotification::new(
                "Student Added",
                format!("Student {} has been added to the system.", created.name),
                Some(created.department_id),
            ),
        )
        .await;

        txn.commit().await?;
        self.outbox.wake();

        tracing::info!(student_id = created.id, "Student added");
        Ok(created)
    }

    pub async fn update(
        &self,
        scope: &AccessScope,
        id: i32,
        updates: StudentUpdate,
    ) -> AppResult<student::Model> {
        if let Some(department_id) = updates.department_id {
            scope.ensure_writable(department_id)?;
        }

        let txn = self.db.begin().await?;
        let students = StudentRepository::new(&txn);
        let existing = students
            .find_by_id_for_update(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;
        scope.ensure_visible(existing.department_id, "Student")?;

        let updated = students.update(existing, updates).await?;

        notification_emitter::record(
            &txn,
            NewNotification::new(
                "Student Info Updated",
                format!("Information for student {} has been updated.", updated.name),
                Some(updated.department_id),
            ),
        )
        .await;

        txn.commit().await?;
        self.outbox.wake();

        tracing::info!(student_id = updated.id, "Student updated");
        Ok(updated)
    }

    /// Deletes the student together with their grades.
    pub async fn delete(&self, scope: &AccessScope, id: i32) -> AppResult<()> {
        let txn = self.db.begin().await?;
        let students = StudentRepository::new(&txn);
        let existing = students
            .find_by_id_for_update(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;
        scope.ensure_visible(existing.department_id, "Student")?;

        let removed_grades = GradeRepository::new(&txn).delete_by_student(id).await?;
        students.delete(id).await?;

        notification_emitter::record(
            &txn,
            NewNotification::new(
                "Student Deleted",
                format!("Student {} has been removed from the system.", existing.name),
                Some(existing.department_id),
            ),
        )
        .await;

        txn.commit().await?;
        self.outbox.wake();

        tracing::info!(student_id = id, removed_grades, "Student deleted");
        Ok(())
    }
}
