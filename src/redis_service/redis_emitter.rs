use anyhow::Context;
use redis::{AsyncCommands, aio::ConnectionManager};
use socketioxide_emitter::{Driver, IoEmitter};
use tokio::sync::OnceCell;

use crate::config::NOTIFY_EVENT;
use crate::services::notification_emitter::{NotificationEvent, NotificationSink};

/// `ConnectionManager` reconnects on its own after Redis restarts.
pub struct RedisConnection(ConnectionManager);

impl Driver for RedisConnection {
    type Error = redis::RedisError;

    async fn emit(&self, channel: String, data: Vec<u8>) -> Result<(), Self::Error> {
        self.0
            .clone()
            .publish::<_, _, redis::Value>(channel, data)
            .await?;
        Ok(())
    }
}

/// Publishes dashboard events through the socket.io redis adapter.
///
/// The connection is opened on the first push. While Redis is unreachable every
/// push fails and the outbox keeps the rows for the next dispatcher pass.
pub struct RedisEmitter {
    client: redis::Client,
    conn: OnceCell<RedisConnection>,
}

impl RedisEmitter {
    /// Parses `redis_url` without connecting.
    pub fn new(redis_url: &str) -> anyhow::Result<Self> {
        let client = redis::Client::open(redis_url).context("Failed to create Redis client")?;

        Ok(Self {
            client,
            conn: OnceCell::new(),
        })
    }

    async fn connection(&self) -> anyhow::Result<&RedisConnection> {
        self.conn
            .get_or_try_init(|| async {
                let manager = self
                    .client
                    .get_connection_manager()
                    .await
                    .context("Failed to connect to Redis")?;
                tracing::info!("Redis emitter connected");
                Ok::<_, anyhow::Error>(RedisConnection(manager))
            })
            .await
    }
}

impl NotificationSink for RedisEmitter {
    async fn push(&self, room: Option<&str>, event: &NotificationEvent) -> anyhow::Result<()> {
        let conn = self.connection().await?;

        let emitter = match room {
            Some(room) => IoEmitter::new().to(room.to_string()),
            None => IoEmitter::new(),
        };

        emitter
            .emit(NOTIFY_EVENT, event, conn)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to emit redis: {:?}", e))?;
        Ok(())
    }
}
