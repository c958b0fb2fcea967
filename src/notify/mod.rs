//! Outbound notification boundary.
//!
//! The service only depends on the `publish` contract; the AMQP wiring
//! lives behind it so tests can swap in a recording fake.

use async_trait::async_trait;
use lapin::{
    options::{BasicPublishOptions, QueueDeclareOptions},
    types::FieldTable,
    BasicProperties, Channel, Connection, ConnectionProperties,
};
use tracing::info;

/// Durable, at-least-once publish primitive. Callers decide whether a
/// failure is fatal; the account service treats it as best-effort.
#[async_trait]
pub trait NotificationQueue: Send + Sync {
    async fn publish(&self, queue: &str, payload: &[u8]) -> anyhow::Result<()>;
}

pub struct AmqpQueue {
    channel: Channel,
}

impl AmqpQueue {
    /// Connects to the broker and declares the given queues as durable.
    pub async fn connect(uri: &str, queues: &[&str]) -> anyhow::Result<Self> {
        let connection = Connection::connect(uri, ConnectionProperties::default()).await?;
        let channel = connection.create_channel().await?;
        for name in queues {
            channel
                .queue_declare(
                    name,
                    QueueDeclareOptions {
                        durable: true,
                        ..QueueDeclareOptions::default()
                    },
                    FieldTable::default(),
                )
                .await?;
        }
        info!(queues = queues.len(), "amqp queues declared");
        Ok(Self { channel })
    }
}

#[async_trait]
impl NotificationQueue for AmqpQueue {
    async fn publish(&self, queue: &str, payload: &[u8]) -> anyhow::Result<()> {
        self.channel
            .basic_publish(
                "",
                queue,
                BasicPublishOptions::default(),
                payload,
                // persistent delivery
                BasicProperties::default().with_delivery_mode(2),
            )
            .await?
            .await?;
        Ok(())
    }
}

/// Body of the welcome email enqueued after a successful signup.
pub fn welcome_message(first_name: &str, last_name: &str) -> String {
    format!(
        "Dear {first_name} {last_name},\n\n\
         Thank you for opening a new account. We look forward to providing \
         you with solutions and support to help you reach your goals.\n\n\
         Thank you for being our customer."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn welcome_message_addresses_the_new_user() {
        let body = welcome_message("Yvan", "Moreau");
        assert!(body.starts_with("Dear Yvan Moreau,"));
        assert!(body.contains("new account"));
    }
}
