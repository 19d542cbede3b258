use anyhow::{Context, Result};
use async_nats::Client;
use tracing::info;

use super::messages::ClipMessage;
use super::{ClipEnvelope, Delivery};

/// Subject a recipient listens on for new clips
pub fn clip_subject(recipient_id: &str) -> String {
    format!("voice.clip.{}", recipient_id)
}

/// Delivers clips by publishing one JSON message per recipient
pub struct NatsDelivery {
    client: Client,
    sender_id: String,
}

impl NatsDelivery {
    /// Connect to NATS server
    pub async fn connect(url: &str, sender_id: String) -> Result<Self> {
        info!("Connecting to NATS at {}", url);

        let client = async_nats::connect(url)
            .await
            .context("Failed to connect to NATS")?;

        info!("Connected to NATS successfully");

        Ok(Self { client, sender_id })
    }

    /// Build the wire message for one recipient
    pub fn message_for(&self, clip: &ClipEnvelope, recipient_id: &str) -> ClipMessage {
        clip.to_message(&self.sender_id, recipient_id)
    }
}

#[async_trait::async_trait]
impl Delivery for NatsDelivery {
    async fn deliver(&self, clip: ClipEnvelope) -> Result<()> {
        for recipient in &clip.recipients {
            let subject = clip_subject(recipient);
            let payload = serde_json::to_vec(&self.message_for(&clip, recipient))?;

            self.client
                .publish(subject.clone(), payload.into())
                .await
                .context("Failed to publish clip")?;

            info!(
                "Published clip {} to {} ({}s)",
                clip.clip_id, subject, clip.duration_secs
            );
        }

        Ok(())
    }
}
