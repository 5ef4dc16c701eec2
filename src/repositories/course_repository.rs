use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use crate::entities::course;
use crate::services::access_filter::AccessScope;

pub struct CourseRepository<'a, C> {
    db: &'a C,
}

pub struct NewCourse {
    pub code: String,
    pub name: String,
    pub credit_hours: i32,
    pub instructor: String,
    pub department_id: Uuid,
    pub schedule: String,
    pub capacity: i32,
    pub semester: String,
    pub room: String,
}

#[derive(Default)]
pub struct CourseUpdate {
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

impl<'a, C: ConnectionTrait> CourseRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_in_scope(&self, scope: &AccessScope) -> Result<Vec<course::Model>, DbErr> {
        course::Entity::find()
            .filter(course::Column::DepartmentId.is_in(scope.department_ids().to_vec()))
            .order_by_asc(course::Column::Code)
            .all(self.db)
            .await
    }

    pub async fn find_by_code(&self, code: &str) -> Result<Option<course::Model>, DbErr> {
        course::Entity::find()
            .filter(course::Column::Code.eq(code))
            .one(self.db)
            .await
    }

    pub async fn find_by_id(&self, course_id: Uuid) -> Result<Option<course::Model>, DbErr> {
        course::Entity::find_by_id(course_id).one(self.db).await
    }

    pub async fn create(&self, new_course: NewCourse) -> Result<course::Model, DbErr> {
        let now = Utc::now().naive_utc();
        let course_model = course::ActiveModel {
            course_id: Set(Uuid::new_v4()),
            code: Set(new_course.code),
            name: Set(new_course.name),
            credit_hours: Set(new_course.credit_hours),
            instructor: Set(new_course.instructor),
            department_id: Set(new_course.department_id),
            schedule: Set(new_course.schedule),
            capacity: Set(new_course.capacity),
            enrolled: Set(0),
            semester: Set(new_course.semester),
            room: Set(new_course.room),
            created_at: Set(now),
            updated_at: Set(now),
        };

        course_model.insert(self.db).await
    }

    pub async fn update(
        &self,
        course: course::Model,
        updates: CourseUpdate,
    ) -> Result<course::Model, DbErr> {
        let mut active_model: course::ActiveModel = course.into();

        if let Some(name) = updates.name {
            active_model.name = Set(name);
        }
        if let Some(credit_hours) = updates.credit_hours {
            active_model.credit_hours = Set(credit_hours);
        }
        if let Some(instructor) = updates.instructor {
            active_model.instructor = Set(instructor);
        }
        if let Some(department_id) = updates.department_id {
            active_model.department_id = Set(department_id);
        }
        if let Some(schedule) = updates.schedule {
            active_model.schedule = Set(schedule);
        }
        if let Some(capacity) = updates.capacity {
            active_model.capacity = Set(capacity);
        }
        if let Some(enrolled) = updates.enrolled {
            active_model.enrolled = Set(enrolled);
        }
        if let Some(semester) = updates.semester {
            active_model.semester = Set(semester);
        }
        if let Some(room) = updates.room {
            active_model.room = Set(room);
        }

        active_model.updated_at = Set(Utc::now().naive_utc());

        active_model.update(self.db).await
    }

    pub async fn delete(&self, course_id: Uuid) -> Result<u64, DbErr> {
        let result = course::Entity::delete_by_id(course_id).exec(self.db).await?;
        Ok(result.rows_affected)
    }
}
