use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use crate::entities::department;

pub struct DepartmentRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> DepartmentRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_category(&self, category: &str) -> Result<Vec<department::Model>, DbErr> {
        department::Entity::find()
            .filter(department::Column::Category.eq(category))
            .order_by_asc(department::Column::Name)
            .all(self.db)
            .await
    }

    pub async fn find_by_id(
        &self,
        department_id: Uuid,
    ) -> Result<Option<department::Model>, DbErr> {
        department::Entity::find_by_id(department_id)
            .one(self.db)
            .await
    }

    pub async fn create(
        &self,
        name: String,
        code: String,
        category: String,
    ) -> Result<department::Model, DbErr> {
        let department_model = department::ActiveModel {
            department_id: Set(Uuid::new_v4()),
            name: Set(name),
            code: Set(code),
            category: Set(category),
        };

        department_model.insert(self.db).await
    }
}
