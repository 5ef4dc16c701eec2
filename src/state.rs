use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::rabbitmq_service::rabbitmq_service::MailQueue;
use crate::services::notification_emitter::OutboxSignal;
use crate::utils::jwt::JwtManager;

/// Shared handles every router receives.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt: JwtManager,
    pub jwt_expires_in: i64,
    pub outbox: OutboxSignal,
    pub mail_queue: Option<Arc<MailQueue>>,
    pub secure_cookies: bool,
}

impl AppState {
    pub fn new(db: DatabaseConnection, jwt: JwtManager, jwt_expires_in: i64) -> Self {
        Self {
            db,
            jwt,
            jwt_expires_in,
            outbox: OutboxSignal::default(),
            mail_queue: None,
            secure_cookies: false,
        }
    }

    pub fn with_mail_queue(mut self, mail_queue: MailQueue) -> Self {
        self.mail_queue = Some(Arc::new(mail_queue));
        self
    }

    pub fn with_outbox(mut self, outbox: OutboxSignal) -> Self {
        self.outbox = outbox;
        self
    }

    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = secure;
        self
    }
}
