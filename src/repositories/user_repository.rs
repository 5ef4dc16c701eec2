use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::RoleEnum;
use crate::entities::user;

pub struct UserRepository<'a, C> {
    db: &'a C,
}

pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub department_category: String,
    pub role: RoleEnum,
}

impl<'a, C: ConnectionTrait> UserRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, DbErr> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db)
            .await
    }

    pub async fn find_by_id(&self, user_id: Uuid) -> Result<Option<user::Model>, DbErr> {
        user::Entity::find_by_id(user_id).one(self.db).await
    }

    pub async fn find_all(&self) -> Result<Vec<user::Model>, DbErr> {
        user::Entity::find()
            .order_by_asc(user::Column::CreatedAt)
            .all(self.db)
            .await
    }

    pub async fn create(&self, new_user: NewUser) -> Result<user::Model, DbErr> {
        let now = Utc::now().naive_utc();
        let user_model = user::ActiveModel {
            user_id: Set(Uuid::new_v4()),
            name: Set(new_user.name),
            email: Set(new_user.email),
            password: Set(new_user.password_hash),
            department_category: Set(new_user.department_category),
            role: Set(new_user.role),
            created_at: Set(now),
            updated_at: Set(now),
        };

        user_model.insert(self.db).await
    }
}
