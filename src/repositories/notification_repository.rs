use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, sea_query::Expr,
};
use uuid::Uuid;

use crate::entities::notification;
use crate::services::access_filter::AccessScope;

pub struct NotificationRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> NotificationRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        title: String,
        description: String,
        department_id: Option<Uuid>,
    ) -> Result<notification::Model, DbErr> {
        let notification_model = notification::ActiveModel {
            notification_id: Set(Uuid::new_v4()),
            title: Set(title),
            description: Set(description),
            department_id: Set(department_id),
            created_at: Set(Utc::now().naive_utc()),
            dispatched_at: Set(None),
        };

        notification_model.insert(self.db).await
    }

    pub async fn find_in_scope(
        &self,
        scope: &AccessScope,
    ) -> Result<Vec<notification::Model>, DbErr> {
        notification::Entity::find()
            .filter(notification::Column::DepartmentId.is_in(scope.department_ids().to_vec()))
            .order_by_desc(notification::Column::CreatedAt)
            .all(self.db)
            .await
    }

    /// Oldest notifications not yet pushed to the socket channel.
    pub async fn find_undispatched(&self, limit: u64) -> Result<Vec<notification::Model>, DbErr> {
        notification::Entity::find()
            .filter(notification::Column::DispatchedAt.is_null())
            .order_by_asc(notification::Column::CreatedAt)
            .limit(limit)
            .all(self.db)
            .await
    }

    pub async fn mark_dispatched(&self, notification_id: Uuid) -> Result<(), DbErr> {
        notification::Entity::update_many()
            .col_expr(
                notification::Column::DispatchedAt,
                Expr::value(Utc::now().naive_utc()),
            )
            .filter(notification::Column::NotificationId.eq(notification_id))
            .exec(self.db)
            .await?;
        Ok(())
    }
}
