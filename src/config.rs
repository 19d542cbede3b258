use anyhow::{Context, Result};
use serde::Deserialize;

use crate::inbox::PlaybackPolicy;

/// Default location of the configuration file (extension optional)
pub const DEFAULT_CONFIG_PATH: &str = "config/voxclip";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub app: AppConfig,
    pub waveform: WaveformConfig,
    pub playback: PlaybackConfig,
    pub delivery: DeliveryConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub name: String,
    /// Stand-in for the identity service's signed-in user
    pub user_id: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "voxclip".to_string(),
            user_id: "me".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WaveformConfig {
    pub record_bars: usize,
    pub preview_bars: usize,
    pub message_bars: usize,
    pub visualizer_bars: usize,
    /// Resting magnitude of inactive bars
    pub floor: f32,
}

impl Default for WaveformConfig {
    fn default() -> Self {
        Self {
            record_bars: 7,
            preview_bars: 7,
            message_bars: 20,
            visualizer_bars: 25,
            floor: crate::waveform::IDLE_FLOOR,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub policy: PlaybackPolicy,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryKind {
    #[default]
    Log,
    Nats,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    pub kind: DeliveryKind,
    pub nats_url: String,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            kind: DeliveryKind::Log,
            nats_url: "nats://localhost:4222".to_string(),
        }
    }
}

impl Config {
    /// Load `path` (if it exists) layered under `VOXCLIP_*` environment
    /// variables, e.g. `VOXCLIP_PLAYBACK__POLICY=exclusive`
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("VOXCLIP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .with_context(|| format!("Failed to load configuration from {}", path))?;

        Ok(settings.try_deserialize()?)
    }
}
