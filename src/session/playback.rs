use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::format::format_clock;
use super::snapshot::{PlaybackSnapshot, ProgressTween};
use crate::clock::{Clock, Ticker, TICK_INTERVAL};
use crate::error::{Result, SessionError};

/// Playback state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackStatus {
    #[default]
    Stopped,
    Playing,
}

impl PlaybackStatus {
    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackStatus::Playing)
    }
}

impl std::fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackStatus::Stopped => write!(f, "stopped"),
            PlaybackStatus::Playing => write!(f, "playing"),
        }
    }
}

/// Position normalised to `0.0..=1.0`; zero for a zero-length clip
pub fn progress_fraction(position_secs: u32, duration_secs: u32) -> f32 {
    if duration_secs == 0 {
        return 0.0;
    }

    position_secs.min(duration_secs) as f32 / duration_secs as f32
}

/// Plays back one clip, advancing a second per clock tick
///
/// Reaching the end stops playback and leaves the position at the clip
/// duration; the next play rewinds to the start.
pub struct PlaybackSession {
    clock: Arc<dyn Clock>,
    status: PlaybackStatus,
    duration_secs: u32,
    position_secs: u32,

    /// Fraction shown before the latest tick (seek-bar animation origin)
    progress_from: f32,

    /// Armed interval, present only while playing
    ticker: Option<Ticker>,
}

impl PlaybackSession {
    /// Create a stopped session for a clip of `duration_secs`
    ///
    /// Zero-length clips are rejected so that play is never enabled for them.
    pub fn new(duration_secs: u32, clock: Arc<dyn Clock>) -> Result<Self> {
        if duration_secs == 0 {
            warn!("Refusing to create playback for an empty clip");
            return Err(SessionError::EmptyClip);
        }

        debug!("Playback session created for {}s clip", duration_secs);

        Ok(Self {
            clock,
            status: PlaybackStatus::Stopped,
            duration_secs,
            position_secs: 0,
            progress_from: 0.0,
            ticker: None,
        })
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn position_secs(&self) -> u32 {
        self.position_secs
    }

    pub fn progress(&self) -> f32 {
        progress_fraction(self.position_secs, self.duration_secs)
    }

    pub fn is_armed(&self) -> bool {
        self.ticker.is_some()
    }

    /// Whether the position sits at the end of the clip
    pub fn is_finished(&self) -> bool {
        self.position_secs >= self.duration_secs
    }

    /// Flip between Stopped and Playing; returns the new status
    pub fn toggle(&mut self) -> PlaybackStatus {
        match self.status {
            PlaybackStatus::Stopped => {
                self.play();
            }
            PlaybackStatus::Playing => {
                self.pause();
            }
        }

        self.status
    }

    /// Start playing, rewinding first if the clip already finished
    pub fn play(&mut self) -> bool {
        if self.status.is_playing() {
            return false;
        }

        if self.is_finished() {
            debug!("Replaying finished clip from the start");
            self.position_secs = 0;
            self.progress_from = 0.0;
        }

        info!(
            "Playback started at {}/{}",
            format_clock(self.position_secs),
            format_clock(self.duration_secs)
        );

        self.status = PlaybackStatus::Playing;
        self.ticker = Some(self.clock.arm_interval(TICK_INTERVAL));

        true
    }

    /// Stop playing, keeping the current position
    pub fn pause(&mut self) -> bool {
        if !self.status.is_playing() {
            return false;
        }

        info!("Playback paused at {}", format_clock(self.position_secs));

        self.status = PlaybackStatus::Stopped;
        self.progress_from = self.progress();
        self.disarm();

        true
    }

    /// Apply one clock tick
    ///
    /// Advances the position by one second; the tick that reaches the end
    /// clamps at the duration and stops playback. Ticks while stopped are
    /// ignored.
    pub fn tick(&mut self) -> bool {
        if !self.status.is_playing() {
            debug!("Ignoring playback tick while {}", self.status);
            return false;
        }

        self.progress_from = self.progress();
        self.position_secs = (self.position_secs + 1).min(self.duration_secs);
        debug!("Playback tick: {}/{}s", self.position_secs, self.duration_secs);

        if self.is_finished() {
            info!("Playback reached end of {}s clip", self.duration_secs);
            self.status = PlaybackStatus::Stopped;
            self.disarm();
        }

        true
    }

    /// Wait for the session's own clock and apply the tick
    ///
    /// Never resolves while stopped.
    pub async fn next_tick(&mut self) -> bool {
        let Some(ticker) = self.ticker.as_mut() else {
            return std::future::pending().await;
        };

        let tick = ticker.tick().await;
        match tick {
            Some(()) => self.tick(),
            None => {
                warn!("Playback clock went away; stopping");
                self.status = PlaybackStatus::Stopped;
                self.disarm();
                false
            }
        }
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        let progress = self.progress();

        PlaybackSnapshot {
            status: self.status,
            duration_secs: self.duration_secs,
            position_secs: self.position_secs,
            progress,
            tween: ProgressTween {
                from: self.progress_from,
                to: progress,
            },
            can_play: self.duration_secs > 0,
        }
    }

    fn disarm(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.disarm();
            debug!("Playback clock disarmed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_fraction_zero_duration() {
        assert_eq!(progress_fraction(0, 0), 0.0);
        assert_eq!(progress_fraction(3, 0), 0.0);
    }

    #[test]
    fn test_progress_fraction_bounds() {
        for position in 0..=7 {
            let fraction = progress_fraction(position, 7);
            assert!((0.0..=1.0).contains(&fraction));
        }
        assert_eq!(progress_fraction(7, 7), 1.0);
        assert_eq!(progress_fraction(9, 7), 1.0);
    }
}
