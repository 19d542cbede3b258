pub mod audio;
pub mod clock;
pub mod config;
pub mod coordinator;
pub mod delivery;
pub mod error;
pub mod identity;
pub mod inbox;
pub mod session;
pub mod waveform;

pub use audio::{AudioBackend, CapturedClip, SimulatedBackend};
pub use clock::{Clock, ManualClock, Ticker, TokioClock, TICK_INTERVAL};
pub use config::Config;
pub use coordinator::{Intent, RecipientSelection, ScreenMode, ScreenState, SessionCoordinator};
pub use delivery::{ClipEnvelope, ClipMessage, Delivery, LogDelivery, NatsDelivery};
pub use error::SessionError;
pub use identity::{Identity, StaticIdentity};
pub use inbox::{Inbox, PlaybackPolicy, RowSnapshot};
pub use session::{
    PlaybackSession, PlaybackSnapshot, PlaybackStatus, RecordingSession, RecordingSnapshot,
    RecordingStatus,
};
pub use waveform::WaveformSampler;
