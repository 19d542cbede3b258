//! Handing finished clips to whoever carries them to recipients
//!
//! The coordinator only knows the [`Delivery`] trait. The sender's identity
//! is baked into each implementation by the program that builds it.

mod messages;
mod nats;

pub use messages::ClipMessage;
pub use nats::{clip_subject, NatsDelivery};

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

/// A clip ready to send: only its duration exists, no audio payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipEnvelope {
    pub clip_id: Uuid,
    pub duration_secs: u32,
    pub recipients: Vec<String>,
    pub sent_at: DateTime<Utc>,
}

impl ClipEnvelope {
    pub fn new(duration_secs: u32, recipients: Vec<String>) -> Self {
        Self {
            clip_id: Uuid::new_v4(),
            duration_secs,
            recipients,
            sent_at: Utc::now(),
        }
    }

    /// Wire form of this clip for a single recipient
    pub fn to_message(&self, sender_id: &str, recipient_id: &str) -> ClipMessage {
        ClipMessage {
            clip_id: self.clip_id.to_string(),
            sender_id: sender_id.to_string(),
            recipient_id: recipient_id.to_string(),
            duration_secs: self.duration_secs,
            sent_at: self.sent_at.to_rfc3339(),
        }
    }
}

/// Delivery collaborator
#[async_trait::async_trait]
pub trait Delivery: Send + Sync {
    /// Send `clip` to all of its recipients
    async fn deliver(&self, clip: ClipEnvelope) -> Result<()>;
}

/// Delivery that only logs; used when no transport is configured
pub struct LogDelivery {
    sender_id: String,
}

impl LogDelivery {
    pub fn new(sender_id: String) -> Self {
        Self { sender_id }
    }
}

#[async_trait::async_trait]
impl Delivery for LogDelivery {
    async fn deliver(&self, clip: ClipEnvelope) -> Result<()> {
        for recipient in &clip.recipients {
            let message = clip.to_message(&self.sender_id, recipient);
            info!("Delivered clip: {}", serde_json::to_string(&message)?);
        }
        Ok(())
    }
}
