use serde::Serialize;

use crate::session::{PlaybackSnapshot, RecordingSnapshot};

/// Which part of the record screen is showing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenMode {
    /// Record button, timer at zero
    #[default]
    Entry,
    /// Take in progress
    Recording,
    /// Finished take: play, discard or send
    Preview,
}

impl std::fmt::Display for ScreenMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScreenMode::Entry => write!(f, "entry"),
            ScreenMode::Recording => write!(f, "recording"),
            ScreenMode::Preview => write!(f, "preview"),
        }
    }
}

/// Everything the presentation layer needs to draw the record screen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenState {
    pub mode: ScreenMode,

    /// Recording timer on the entry/recording views, playback position on preview
    pub timer: String,

    pub recording: RecordingSnapshot,

    /// Present on the preview view when the take is long enough to play
    pub playback: Option<PlaybackSnapshot>,

    pub can_play: bool,

    /// Bar magnitudes for the waveform currently shown
    pub bars: Vec<f32>,

    /// Generic visualizer bars, at the floor unless recording or playing
    pub visualizer: Vec<f32>,

    pub selected_recipients: usize,

    /// User-facing message for the last rejected intent
    pub last_error: Option<String>,
}
