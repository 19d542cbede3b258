//! Capture and playback session state machines
//!
//! This module provides the two timed sessions behind the record screen:
//! - `RecordingSession`: Idle → Recording → Stopped, counting seconds
//! - `PlaybackSession`: Stopped ⇄ Playing over a fixed-length clip
//!
//! Neither session knows about the other; the coordinator hands a stopped
//! take's duration to a new playback session.

mod format;
mod playback;
mod recording;
mod snapshot;

pub use format::{format_clock, format_relative};
pub use playback::{progress_fraction, PlaybackSession, PlaybackStatus};
pub use recording::{RecordingSession, RecordingStatus};
pub use snapshot::{PlaybackSnapshot, ProgressTween, RecordingSnapshot};
