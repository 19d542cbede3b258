use chrono::{DateTime, Utc};
use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::PlaybackPolicy;
use crate::clock::Clock;
use crate::error::{Result, SessionError};
use crate::session::{
    format_clock, format_relative, PlaybackSession, PlaybackSnapshot, PlaybackStatus,
};
use crate::waveform::row_bars;

/// One received or sent clip in the list
struct MessageRow {
    id: String,
    sender: String,
    sent_at: DateTime<Utc>,
    session: PlaybackSession,
}

/// What a message row renders
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowSnapshot {
    pub id: String,
    pub sender: String,
    /// Relative timestamp, e.g. "5m ago"
    pub sent_label: String,
    /// Current position while playing, `00:00` otherwise
    pub timer: String,
    pub duration_label: String,
    pub playback: PlaybackSnapshot,
    pub bars: Vec<f32>,
}

/// Arena of message rows keyed by message id
pub struct Inbox {
    clock: Arc<dyn Clock>,
    policy: PlaybackPolicy,
    bar_count: usize,
    rows: Vec<MessageRow>,
}

impl Inbox {
    pub fn new(clock: Arc<dyn Clock>, policy: PlaybackPolicy, bar_count: usize) -> Self {
        Self {
            clock,
            policy,
            bar_count,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row ids in arrival order
    pub fn ids(&self) -> Vec<String> {
        self.rows.iter().map(|row| row.id.clone()).collect()
    }

    /// Playback session of a row
    pub fn get(&self, id: &str) -> Option<&PlaybackSession> {
        self.rows.iter().find(|row| row.id == id).map(|row| &row.session)
    }

    /// Ids of rows currently playing
    pub fn playing(&self) -> Vec<String> {
        self.rows
            .iter()
            .filter(|row| row.session.status().is_playing())
            .map(|row| row.id.clone())
            .collect()
    }

    /// Add a row; a row with the same id is replaced (and its clock dropped)
    pub fn insert(
        &mut self,
        id: impl Into<String>,
        sender: impl Into<String>,
        sent_at: DateTime<Utc>,
        duration_secs: u32,
    ) -> Result<()> {
        let id = id.into();
        let session = PlaybackSession::new(duration_secs, Arc::clone(&self.clock))?;

        let row = MessageRow {
            id: id.clone(),
            sender: sender.into(),
            sent_at,
            session,
        };

        match self.rows.iter_mut().find(|existing| existing.id == id) {
            Some(existing) => {
                warn!("Replacing message row {}", id);
                *existing = row;
            }
            None => {
                debug!("Added message row {} ({}s)", id, duration_secs);
                self.rows.push(row);
            }
        }

        Ok(())
    }

    /// Remove a row, stopping its clock
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.rows.len();
        self.rows.retain(|row| row.id != id);
        before != self.rows.len()
    }

    /// Play or pause one row
    ///
    /// Under [`PlaybackPolicy::Exclusive`] starting a row pauses every
    /// other row first.
    pub fn toggle(&mut self, id: &str) -> Result<PlaybackStatus> {
        let index = self
            .rows
            .iter()
            .position(|row| row.id == id)
            .ok_or(SessionError::PlaybackUnavailable)?;

        let starting = !self.rows[index].session.status().is_playing();

        if starting && self.policy == PlaybackPolicy::Exclusive {
            for (i, row) in self.rows.iter_mut().enumerate() {
                if i != index && row.session.pause() {
                    info!("Paused row {} (exclusive playback)", row.id);
                }
            }
        }

        Ok(self.rows[index].session.toggle())
    }

    /// Pause every row
    pub fn pause_all(&mut self) {
        for row in &mut self.rows {
            row.session.pause();
        }
    }

    /// Wait for whichever playing row ticks first and apply that tick
    ///
    /// Returns the id of the row that advanced. Never resolves while no
    /// row is playing.
    pub async fn next_tick(&mut self) -> String {
        let mut ticking: FuturesUnordered<_> = self
            .rows
            .iter_mut()
            .filter(|row| row.session.is_armed())
            .map(|row| async move {
                row.session.next_tick().await;
                row.id.clone()
            })
            .collect();

        match ticking.next().await {
            Some(id) => id,
            None => std::future::pending().await,
        }
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> Vec<RowSnapshot> {
        self.rows
            .iter()
            .map(|row| {
                let playback = row.session.snapshot();
                let timer = if playback.status.is_playing() {
                    format_clock(playback.position_secs)
                } else {
                    format_clock(0)
                };

                RowSnapshot {
                    id: row.id.clone(),
                    sender: row.sender.clone(),
                    sent_label: format_relative(row.sent_at, now),
                    timer,
                    duration_label: format_clock(playback.duration_secs),
                    playback,
                    bars: row_bars(self.bar_count),
                }
            })
            .collect()
    }
}
