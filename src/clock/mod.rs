//! Tick source for recording and playback sessions
//!
//! A session arms the clock when it enters a timed state and owns the
//! returned [`Ticker`] until it leaves that state. Dropping the ticker is
//! the only way to disarm, so a tick can never reach a session that has
//! already let go of its timer.

mod ticker;

pub use ticker::{Clock, ManualClock, Ticker, TokioClock, TICK_INTERVAL};
