use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, sea_query::Expr,
};
use uuid::Uuid;

use crate::entities::student;
use crate::services::access_filter::AccessScope;

pub struct StudentRepository<'a, C> {
    db: &'a C,
}

pub struct NewStudent {
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
}

#[derive(Default)]
pub struct StudentUpdate {
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

impl<'a, C: ConnectionTrait> StudentRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_in_scope(&self, scope: &AccessScope) -> Result<Vec<student::Model>, DbErr> {
        student::Entity::find()
            .filter(student::Column::DepartmentId.is_in(scope.department_ids().to_vec()))
            .order_by_asc(student::Column::Id)
            .all(self.db)
            .await
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<student::Model>, DbErr> {
        student::Entity::find_by_id(id).one(self.db).await
    }

    /// Row-locks the student for the rest of the surrounding transaction.
    pub async fn find_by_id_for_update(&self, id: i32) -> Result<Option<student::Model>, DbErr> {
        student::Entity::find_by_id(id)
            .lock_exclusive()
            .one(self.db)
            .await
    }

    pub async fn create(&self, new_student: NewStudent) -> Result<student::Model, DbErr> {
        let now = Utc::now().naive_utc();
        let student_model = student::ActiveModel {
            name: Set(new_student.name),
            email: Set(new_student.email),
            department_id: Set(new_student.department_id),
            phone: Set(new_student.phone),
            address: Set(new_student.address),
            enrollment_date: Set(new_student.enrollment_date),
            entry_date: Set(new_student.entry_date),
            expected_graduation: Set(new_student.expected_graduation),
            advisor: Set(new_student.advisor),
            year_level: Set(new_student.year_level),
            total_credits: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        student_model.insert(self.db).await
    }

    pub async fn update(
        &self,
        student: student::Model,
        updates: StudentUpdate,
    ) -> Result<student::Model, DbErr> {
        let mut active_model: student::ActiveModel = student.into();

        if let Some(name) = updates.name {
            active_model.name = Set(name);
        }
        if let Some(email) = updates.email {
            active_model.email = Set(email);
        }
        if let Some(department_id) = updates.department_id {
            active_model.department_id = Set(department_id);
        }
        if let Some(phone) = updates.phone {
            active_model.phone = Set(Some(phone));
        }
        if let Some(address) = updates.address {
            active_model.address = Set(Some(address));
        }
        if let Some(entry_date) = updates.entry_date {
            active_model.entry_date = Set(Some(entry_date));
        }
        if let Some(expected_graduation) = updates.expected_graduation {
            active_model.expected_graduation = Set(Some(expected_graduation));
        }
        if let Some(advisor) = updates.advisor {
            active_model.advisor = Set(Some(advisor));
        }
        if let Some(year_level) = updates.year_level {
            active_model.year_level = Set(year_level);
        }

        active_model.updated_at = Set(Utc::now().naive_utc());

        active_model.update(self.db).await
    }

    /// Adds `delta` (possibly negative) to the stored credit total in one statement.
    pub async fn add_total_credits(&self, id: i32, delta: i32) -> Result<(), DbErr> {
        student::Entity::update_many()
            .col_expr(
                student::Column::TotalCredits,
                Expr::col(student::Column::TotalCredits).add(delta),
            )
            .col_expr(
                student::Column::UpdatedAt,
                Expr::value(Utc::now().naive_utc()),
            )
            .filter(student::Column::Id.eq(id))
            .exec(self.db)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: i32) -> Result<u64, DbErr> {
        let result = student::Entity::delete_by_id(id).exec(self.db).await?;
        Ok(result.rows_affected)
    }
}
