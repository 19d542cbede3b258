use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::playback::PlaybackStatus;
use super::recording::RecordingStatus;

/// Point-in-time view of a recording session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingSnapshot {
    /// Current recording state
    pub status: RecordingStatus,

    /// Seconds captured in the current take
    pub elapsed_secs: u32,

    /// Elapsed time rendered as `MM:SS`
    pub timer: String,
}

/// Point-in-time view of a playback session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    /// Current playback state
    pub status: PlaybackStatus,

    /// Total clip length in seconds
    pub duration_secs: u32,

    /// Current position in seconds (0..=duration_secs)
    pub position_secs: u32,

    /// Position normalised to 0.0..=1.0
    pub progress: f32,

    /// Seek-bar animation for the current tick interval
    pub tween: ProgressTween,

    /// Whether the play control should be enabled
    pub can_play: bool,
}

/// Linear animation of the seek bar from the previous tick's fraction to
/// the current one, spread over one tick interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressTween {
    pub from: f32,
    pub to: f32,
}

impl ProgressTween {
    /// Interpolated fraction `elapsed` into an animation lasting `span`
    pub fn value_at(&self, elapsed: Duration, span: Duration) -> f32 {
        if span.is_zero() {
            return self.to;
        }

        let t = (elapsed.as_secs_f32() / span.as_secs_f32()).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * t
    }
}
