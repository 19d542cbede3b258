use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::format::format_clock;
use super::snapshot::RecordingSnapshot;
use crate::clock::{Clock, Ticker, TICK_INTERVAL};

/// Recording state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordingStatus {
    /// No take in progress and nothing captured
    #[default]
    Idle,
    /// Capturing; the clock is armed
    Recording,
    /// Take finished; `elapsed_secs` is frozen as the clip duration
    Stopped,
}

impl RecordingStatus {
    pub fn is_recording(&self) -> bool {
        matches!(self, RecordingStatus::Recording)
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, RecordingStatus::Idle)
    }
}

impl std::fmt::Display for RecordingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordingStatus::Idle => write!(f, "idle"),
            RecordingStatus::Recording => write!(f, "recording"),
            RecordingStatus::Stopped => write!(f, "stopped"),
        }
    }
}

/// Counts the length of a take, one clock tick per second
///
/// The session owns its [`Ticker`] while recording and drops it on every
/// exit path, so no tick is observed once the take has stopped.
pub struct RecordingSession {
    /// Clock armed on `start()`
    clock: Arc<dyn Clock>,

    /// Current state
    status: RecordingStatus,

    /// Seconds captured in the current take
    elapsed_secs: u32,

    /// Armed interval, present only while recording
    ticker: Option<Ticker>,
}

impl RecordingSession {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            status: RecordingStatus::Idle,
            elapsed_secs: 0,
            ticker: None,
        }
    }

    pub fn status(&self) -> RecordingStatus {
        self.status
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    /// Whether the clock is currently armed
    pub fn is_armed(&self) -> bool {
        self.ticker.is_some()
    }

    /// Begin a new take from Idle or Stopped
    ///
    /// A no-op while already recording.
    pub fn start(&mut self) -> bool {
        if self.status.is_recording() {
            warn!("Recording already started");
            return false;
        }

        info!("Starting recording (previous state: {})", self.status);

        self.status = RecordingStatus::Recording;
        self.elapsed_secs = 0;
        self.ticker = Some(self.clock.arm_interval(TICK_INTERVAL));

        true
    }

    /// Apply one clock tick
    ///
    /// Ignored unless recording, so a tick delivered by anything other
    /// than the session's own ticker cannot move a frozen duration.
    pub fn tick(&mut self) -> bool {
        if !self.status.is_recording() {
            debug!("Ignoring tick while {}", self.status);
            return false;
        }

        self.elapsed_secs = self.elapsed_secs.saturating_add(1);
        debug!("Recording tick: {}s", self.elapsed_secs);

        true
    }

    /// Wait for the session's own clock and apply the tick
    ///
    /// Never resolves while the clock is disarmed, which makes it safe to
    /// poll from a `select!` loop in every state.
    pub async fn next_tick(&mut self) -> bool {
        let Some(ticker) = self.ticker.as_mut() else {
            return std::future::pending().await;
        };

        let tick = ticker.tick().await;
        match tick {
            Some(()) => self.tick(),
            None => {
                warn!("Recording clock went away; disarming");
                self.disarm();
                false
            }
        }
    }

    /// Finish the take and freeze its duration
    pub fn stop(&mut self) -> bool {
        if !self.status.is_recording() {
            warn!("Recording not active");
            return false;
        }

        self.status = RecordingStatus::Stopped;
        self.disarm();

        info!("Recording stopped at {}", format_clock(self.elapsed_secs));

        true
    }

    /// Throw the finished take away and return to Idle
    ///
    /// Calling it again once Idle is a no-op.
    pub fn discard(&mut self) -> bool {
        match self.status {
            RecordingStatus::Stopped => {
                info!("Discarding {}s take", self.elapsed_secs);
                self.status = RecordingStatus::Idle;
                self.elapsed_secs = 0;
                self.disarm();
                true
            }
            RecordingStatus::Idle => {
                debug!("Nothing to discard");
                false
            }
            RecordingStatus::Recording => {
                warn!("Cannot discard while recording; stop first");
                false
            }
        }
    }

    pub fn snapshot(&self) -> RecordingSnapshot {
        RecordingSnapshot {
            status: self.status,
            elapsed_secs: self.elapsed_secs,
            timer: format_clock(self.elapsed_secs),
        }
    }

    fn disarm(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.disarm();
            debug!("Recording clock disarmed");
        }
    }
}
