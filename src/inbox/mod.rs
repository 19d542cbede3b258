//! Message rows, each with its own playback session and clock
//!
//! This module provides:
//! - `Inbox`: arena of rows keyed by message id, in arrival order
//! - `PlaybackPolicy`: whether rows may play at the same time
//! - `RowSnapshot`: what a message row renders

mod arena;

pub use arena::{Inbox, RowSnapshot};

use serde::{Deserialize, Serialize};

/// How playback on one row affects the others
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackPolicy {
    /// Every row plays independently; several may play at once
    #[default]
    Independent,
    /// Starting a row pauses every other playing row
    Exclusive,
}
