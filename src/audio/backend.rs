use anyhow::Result;
use tracing::{debug, info};

/// Audio captured for one take
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CapturedClip {
    /// Length of the take in whole seconds, as counted by the recording session
    pub duration_secs: u32,
    /// Sample rate in Hz (0 when nothing was captured)
    pub sample_rate: u32,
    /// Raw audio samples (i16 PCM, mono); empty for simulated capture
    pub samples: Vec<i16>,
}

/// Audio I/O behind the record screen
///
/// The coordinator calls into the backend on every session transition;
/// the sessions themselves never touch it. A real implementation captures
/// from the microphone between `start_capture` and `stop_capture` and can
/// feed live levels to the waveform through `levels`.
#[async_trait::async_trait]
pub trait AudioBackend: Send + Sync {
    /// Begin capturing a new take
    async fn start_capture(&mut self) -> Result<()>;

    /// Finish the take; `duration_secs` is the recording session's count
    async fn stop_capture(&mut self, duration_secs: u32) -> Result<CapturedClip>;

    /// Begin or resume playing `clip` from `position_secs`
    async fn start_playback(&mut self, clip: &CapturedClip, position_secs: u32) -> Result<()>;

    /// Pause playback (also called when playback reaches the end)
    async fn pause_playback(&mut self) -> Result<()>;

    /// Check if the backend is currently capturing
    fn is_capturing(&self) -> bool;

    /// Live magnitudes for `bar_count` bars, if the backend measures them
    fn levels(&self, _bar_count: usize) -> Option<Vec<f32>> {
        None
    }

    /// Get backend name for logging
    fn name(&self) -> &str;
}

/// Backend without audio I/O: transitions are logged and clips carry only
/// their duration
#[derive(Debug, Default)]
pub struct SimulatedBackend {
    capturing: bool,
    playing: bool,
}

impl SimulatedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

#[async_trait::async_trait]
impl AudioBackend for SimulatedBackend {
    async fn start_capture(&mut self) -> Result<()> {
        info!("[{}] capture started", self.name());
        self.capturing = true;
        Ok(())
    }

    async fn stop_capture(&mut self, duration_secs: u32) -> Result<CapturedClip> {
        info!("[{}] capture stopped after {}s", self.name(), duration_secs);
        self.capturing = false;

        Ok(CapturedClip {
            duration_secs,
            ..Default::default()
        })
    }

    async fn start_playback(&mut self, clip: &CapturedClip, position_secs: u32) -> Result<()> {
        debug!(
            "[{}] playback of {}s clip from {}s",
            self.name(),
            clip.duration_secs,
            position_secs
        );
        self.playing = true;
        Ok(())
    }

    async fn pause_playback(&mut self) -> Result<()> {
        debug!("[{}] playback paused", self.name());
        self.playing = false;
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing
    }

    fn name(&self) -> &str {
        "simulated"
    }
}
