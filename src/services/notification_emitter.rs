//! Activity notifications.
//!
//! Mutations record their notification inside the same transaction (the
//! outbox). A single [`OutboxDispatcher`] task drains undispatched rows to
//! the socket.io channel and stamps them, so a push that fails is retried on
//! the next pass instead of being lost.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use serde::Serialize;
use tokio::sync::Notify;
use uuid::Uuid;

use crate::entities::notification;
use crate::repositories::NotificationRepository;

const DISPATCH_BATCH_SIZE: u64 = 100;

pub struct NewNotification {
    pub title: String,
    pub description: String,
    pub department_id: Option<Uuid>,
}

impl NewNotification {
    pub fn new(title: &str, description: String, department_id: Option<Uuid>) -> Self {
        Self {
            title: title.to_string(),
            description,
            department_id,
        }
    }
}

/// Payload pushed to dashboard sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationEvent {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: NaiveDateTime,
}

impl From<&notification::Model> for NotificationEvent {
    fn from(model: &notification::Model) -> Self {
        Self {
            id: model.notification_id,
            title: model.title.clone(),
            description: model.description.clone(),
            date: model.created_at,
        }
    }
}

/// Wakes the dispatcher after a commit so pushes do not wait for the next poll.
#[derive(Clone, Default)]
pub struct OutboxSignal(Arc<Notify>);

impl OutboxSignal {
    pub fn wake(&self) {
        self.0.notify_one();
    }

    pub async fn notified(&self) {
        self.0.notified().await;
    }
}

/// Records `notification` under a savepoint of `txn`.
///
/// A failed insert rolls back only the savepoint and is logged; the caller's
/// mutation carries on.
pub async fn record<C>(txn: &C, notification: NewNotification)
where
    C: ConnectionTrait + TransactionTrait,
{
    let savepoint = match txn.begin().await {
        Ok(savepoint) => savepoint,
        Err(e) => {
            tracing::warn!("Failed to open notification savepoint: {}", e);
            return;
        }
    };

    let title = notification.title.clone();
    let inserted = NotificationRepository::new(&savepoint)
        .create(
            notification.title,
            notification.description,
            notification.department_id,
        )
        .await;

    match inserted {
        Ok(_) => {
            if let Err(e) = savepoint.commit().await {
                tracing::warn!(title = %title, "Failed to release notification savepoint: {}", e);
            }
        }
        Err(e) => {
            tracing::warn!(title = %title, "Failed to record notification: {}", e);
            if let Err(e) = savepoint.rollback().await {
                tracing::warn!("Failed to roll back notification savepoint: {}", e);
            }
        }
    }
}

/// Where dispatched notifications go; `room` is a department id, `None` means everyone.
pub trait NotificationSink: Send + Sync {
    fn push(
        &self,
        room: Option<&str>,
        event: &NotificationEvent,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;
}

pub struct OutboxDispatcher<S> {
    db: DatabaseConnection,
    sink: S,
    signal: OutboxSignal,
    poll_interval: Duration,
}

impl<S: NotificationSink> OutboxDispatcher<S> {
    pub fn new(db: DatabaseConnection, sink: S, signal: OutboxSignal, poll_interval: Duration) -> Self {
        Self {
            db,
            sink,
            signal,
            poll_interval,
        }
    }

    /// Pushes every pending notification once, oldest first.
    ///
    /// Stops at the first failed push so ordering within a pass is kept;
    /// the failed row stays pending for the next pass.
    pub async fn drain_once(&self) -> anyhow::Result<usize> {
        let repo = NotificationRepository::new(&self.db);
        let mut dispatched = 0;

        loop {
            let pending = repo.find_undispatched(DISPATCH_BATCH_SIZE).await?;
            if pending.is_empty() {
                return Ok(dispatched);
            }

            for notification in &pending {
                let room = notification.department_id.map(|id| id.to_string());
                let event = NotificationEvent::from(notification);

                if let Err(e) = self.sink.push(room.as_deref(), &event).await {
                    tracing::warn!(
                        notification_id = %notification.notification_id,
                        "Failed to push notification, will retry: {}",
                        e
                    );
                    return Ok(dispatched);
                }

                repo.mark_dispatched(notification.notification_id).await?;
                dispatched += 1;
            }
        }
    }

    pub async fn run(self) {
        tracing::info!(
            poll_interval_secs = self.poll_interval.as_secs(),
            "Notification dispatcher started"
        );

        loop {
            match self.drain_once().await {
                Ok(0) => {}
                Ok(count) => tracing::debug!("Dispatched {} notifications", count),
                Err(e) => tracing::error!("Notification dispatch pass failed: {}", e),
            }

            tokio::select! {
                _ = self.signal.notified() => {}
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }
    }
}
