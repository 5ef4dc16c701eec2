use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, prelude::Decimal,
};
use uuid::Uuid;

use crate::entities::{course, grade};

pub struct GradeRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> GradeRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, grade_id: Uuid) -> Result<Option<grade::Model>, DbErr> {
        grade::Entity::find_by_id(grade_id).one(self.db).await
    }

    pub async fn find_by_student_and_course(
        &self,
        student_id: i32,
        course_id: Uuid,
    ) -> Result<Option<grade::Model>, DbErr> {
        grade::Entity::find()
            .filter(grade::Column::StudentId.eq(student_id))
            .filter(grade::Column::CourseId.eq(course_id))
            .one(self.db)
            .await
    }

    pub async fn find_by_course(&self, course_id: Uuid) -> Result<Vec<grade::Model>, DbErr> {
        grade::Entity::find()
            .filter(grade::Column::CourseId.eq(course_id))
            .order_by_asc(grade::Column::StudentId)
            .all(self.db)
            .await
    }

    /// Grades of the given students, each joined to its course.
    pub async fn find_with_course_for_students(
        &self,
        student_ids: Vec<i32>,
    ) -> Result<Vec<(grade::Model, Option<course::Model>)>, DbErr> {
        grade::Entity::find()
            .filter(grade::Column::StudentId.is_in(student_ids))
            .find_also_related(course::Entity)
            .order_by_asc(grade::Column::StudentId)
            .order_by_asc(grade::Column::CreatedAt)
            .all(self.db)
            .await
    }

    pub async fn create(
        &self,
        student_id: i32,
        course_id: Uuid,
        value: Decimal,
        semester: String,
    ) -> Result<grade::Model, DbErr> {
        let now = Utc::now().naive_utc();
        let grade_model = grade::ActiveModel {
            grade_id: Set(Uuid::new_v4()),
            student_id: Set(student_id),
            course_id: Set(course_id),
            grade: Set(value),
            semester: Set(semester),
            created_at: Set(now),
            updated_at: Set(now),
        };

        grade_model.insert(self.db).await
    }

    pub async fn update_value(
        &self,
        grade: grade::Model,
        value: Decimal,
        semester: Option<String>,
    ) -> Result<grade::Model, DbErr> {
        let mut active_model: grade::ActiveModel = grade.into();
        active_model.grade = Set(value);
        if let Some(semester) = semester {
            active_model.semester = Set(semester);
        }
        active_model.updated_at = Set(Utc::now().naive_utc());

        active_model.update(self.db).await
    }

    pub async fn delete(&self, grade_id: Uuid) -> Result<u64, DbErr> {
        let result = grade::Entity::delete_by_id(grade_id).exec(self.db).await?;
        Ok(result.rows_affected)
    }

    pub async fn delete_by_student(&self, student_id: i32) -> Result<u64, DbErr> {
        let result = grade::Entity::delete_many()
            .filter(grade::Column::StudentId.eq(student_id))
            .exec(self.db)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn delete_by_course(&self, course_id: Uuid) -> Result<u64, DbErr> {
        let result = grade::Entity::delete_many()
            .filter(grade::Column::CourseId.eq(course_id))
            .exec(self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
