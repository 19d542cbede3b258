use serde::{Deserialize, Serialize};

/// Clip notification published to one recipient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipMessage {
    pub clip_id: String,
    pub sender_id: String,
    pub recipient_id: String,
    pub duration_secs: u32,
    pub sent_at: String, // RFC3339 timestamp
}
