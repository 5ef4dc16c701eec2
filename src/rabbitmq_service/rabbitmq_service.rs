use anyhow::Context;
use lapin::{BasicProperties, Connection, ConnectionProperties, options::*};
use serde::Serialize;
use serde_json::json;

/// Body the mail worker expects under `data`.
#[derive(Debug, Serialize)]
pub struct MailMessage<'a> {
    pub from: &'a str,
    pub to: &'a str,
    pub subject: &'a str,
    pub text: &'a str,
}

/// Envelope shared with the mail worker's message pattern.
pub fn mail_envelope(message: &MailMessage<'_>) -> serde_json::Value {
    json!({
        "pattern": "send-email",
        "data": message,
    })
}

pub struct MailQueue {
    connection: Connection,
    queue: String,
    from: String,
}

impl MailQueue {
    pub async fn connect(uri: &str, queue: &str, from: &str) -> anyhow::Result<Self> {
        let connection = Connection::connect(uri, ConnectionProperties::default())
            .await
            .context("Failed to connect to RabbitMQ")?;

        let mail_queue = Self {
            connection,
            queue: queue.to_string(),
            from: from.to_string(),
        };
        mail_queue.declare().await?;
        Ok(mail_queue)
    }

    async fn declare(&self) -> anyhow::Result<()> {
        let channel = self
            .connection
            .create_channel()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create RabbitMQ channel: {}", e))?;

        channel
            .queue_declare(
                &self.queue,
                QueueDeclareOptions::default(),
                Default::default(),
            )
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create RabbitMQ queue: {}", e))?;

        Ok(())
    }

    pub async fn publish_email(&self, to: &str, subject: &str, text: &str) -> anyhow::Result<()> {
        let standard_msg = mail_envelope(&MailMessage {
            from: &self.from,
            to,
            subject,
            text,
        });

        let channel = self.connection.create_channel().await?;

        channel
            .basic_publish(
                "",
                &self.queue,
                BasicPublishOptions::default(),
                standard_msg.to_string().as_bytes(),
                BasicProperties::default(),
            )
            .await?;

        tracing::info!(queue = %self.queue, to, "Queued email");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_matches_mail_worker_pattern() {
        let value = mail_envelope(&MailMessage {
            from: "registrar@uni.edu",
            to: "student@example.com",
            subject: "Grades",
            text: "Your grades were updated",
        });

        assert_eq!(value["pattern"], "send-email");
        assert_eq!(value["data"]["from"], "registrar@uni.edu");
        assert_eq!(value["data"]["to"], "student@example.com");
        assert_eq!(value["data"]["subject"], "Grades");
        assert_eq!(value["data"]["text"], "Your grades were updated");
    }
}
