//! Error types for the capture/playback core
//!
//! Every variant here is a local, recoverable condition: a screen that hits
//! one logs it and keeps running.

use thiserror::Error;

/// Session and coordinator errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// An operation was requested from a state that does not allow it
    #[error("Cannot {action} while {from}")]
    InvalidTransition {
        from: &'static str,
        action: &'static str,
    },

    /// A playback session was requested for a zero-length clip
    #[error("Clip has no duration")]
    EmptyClip,

    /// Play was requested but there is no clip to play
    #[error("No clip available for playback")]
    PlaybackUnavailable,

    /// Send was requested with nobody selected
    #[error("No recipients selected")]
    NoRecipients,

    /// The audio backend refused a transition
    #[error("Audio backend error: {0}")]
    Backend(String),
}

impl SessionError {
    /// Short message suitable for a status line
    pub fn user_message(&self) -> String {
        match self {
            SessionError::InvalidTransition { .. } => "That action isn't available right now.".to_string(),
            SessionError::EmptyClip => "The recording is too short to play.".to_string(),
            SessionError::PlaybackUnavailable => "Nothing to play yet.".to_string(),
            SessionError::NoRecipients => "Pick at least one friend first.".to_string(),
            SessionError::Backend(_) => "Audio device error. Please try again.".to_string(),
        }
    }
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, SessionError>;
