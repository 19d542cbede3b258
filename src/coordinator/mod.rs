//! Record-screen orchestration
//!
//! This module wires user intent to the capture and playback sessions:
//! - `SessionCoordinator`: applies intents, pumps clock ticks, builds screen state
//! - `Intent`: record tap, play/pause, discard, recipient toggle, send
//! - `ScreenState`: composite state read by the presentation layer
//! - `RecipientSelection`: friends picked for the next send

mod coordinator;
mod recipients;
mod screen;

pub use coordinator::{Intent, SessionCoordinator, TickSource};
pub use recipients::RecipientSelection;
pub use screen::{ScreenMode, ScreenState};
