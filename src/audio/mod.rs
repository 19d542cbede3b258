pub mod backend;

pub use backend::{AudioBackend, CapturedClip, SimulatedBackend};
