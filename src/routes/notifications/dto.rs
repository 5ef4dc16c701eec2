use chrono::NaiveDateTime;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::notification;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub department_id: Option<Uuid>,
    pub date: NaiveDateTime,
}

impl From<notification::Model> for NotificationResponse {
    fn from(model: notification::Model) -> Self {
        Self {
            id: model.notification_id,
            title: model.title,
            description: model.description,
            department_id: model.department_id,
            date: model.created_at,
        }
    }
}
