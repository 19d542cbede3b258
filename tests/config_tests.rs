// Integration tests for configuration loading

use anyhow::Result;
use std::fs;
use tempfile::TempDir;
use voxclip::config::{Config, DeliveryKind};
use voxclip::PlaybackPolicy;

fn write_config(dir: &TempDir, body: &str) -> Result<String> {
    let path = dir.path().join("voxclip.toml");
    fs::write(&path, body)?;
    Ok(path.to_string_lossy().into_owned())
}

#[test]
fn test_missing_file_uses_defaults() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("absent");

    let cfg = Config::load(&path.to_string_lossy())?;

    assert_eq!(cfg, Config::default());
    assert_eq!(cfg.app.user_id, "me");
    assert_eq!(cfg.playback.policy, PlaybackPolicy::Independent);
    assert_eq!(cfg.delivery.kind, DeliveryKind::Log);

    Ok(())
}

#[test]
fn test_partial_file_keeps_other_defaults() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_config(
        &dir,
        r#"
[app]
user_id = "sarah"

[playback]
policy = "exclusive"
"#,
    )?;

    let cfg = Config::load(&path)?;

    assert_eq!(cfg.app.user_id, "sarah");
    assert_eq!(cfg.app.name, "voxclip");
    assert_eq!(cfg.playback.policy, PlaybackPolicy::Exclusive);
    assert_eq!(cfg.waveform.record_bars, 7);
    assert_eq!(cfg.waveform.message_bars, 20);

    Ok(())
}

#[test]
fn test_full_file() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_config(
        &dir,
        r#"
[waveform]
record_bars = 9
preview_bars = 5
message_bars = 12
visualizer_bars = 30
floor = 0.05

[delivery]
kind = "nats"
nats_url = "nats://broker:4222"
"#,
    )?;

    let cfg = Config::load(&path)?;

    assert_eq!(cfg.waveform.record_bars, 9);
    assert_eq!(cfg.waveform.preview_bars, 5);
    assert_eq!(cfg.waveform.visualizer_bars, 30);
    assert!((cfg.waveform.floor - 0.05).abs() < f32::EPSILON);
    assert_eq!(cfg.delivery.kind, DeliveryKind::Nats);
    assert_eq!(cfg.delivery.nats_url, "nats://broker:4222");

    Ok(())
}

#[test]
fn test_bad_policy_is_rejected() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_config(&dir, "[playback]\npolicy = \"shuffle\"\n")?;

    assert!(Config::load(&path).is_err());

    Ok(())
}

#[test]
fn test_shipped_config_matches_defaults() -> Result<()> {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/voxclip.toml");

    let cfg = Config::load(path)?;

    assert_eq!(cfg, Config::default());

    Ok(())
}
