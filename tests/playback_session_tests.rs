// Integration tests for the playback session
//
// Covers the play/pause cycle, auto-stop at the end of a clip and replay
// from the end, using the manual clock.

use anyhow::Result;
use futures::FutureExt;
use std::sync::Arc;
use std::time::Duration;
use voxclip::clock::{ManualClock, TokioClock};
use voxclip::session::{PlaybackSession, PlaybackStatus, RecordingSession};
use voxclip::SessionError;

fn manual_playback(duration_secs: u32) -> (ManualClock, PlaybackSession) {
    let clock = ManualClock::new();
    let session = PlaybackSession::new(duration_secs, Arc::new(clock.clone()))
        .expect("non-empty clip");
    (clock, session)
}

async fn drive(clock: &ManualClock, session: &mut PlaybackSession, ticks: u32) {
    for _ in 0..ticks {
        assert_eq!(clock.fire(), 1);
        assert!(session.next_tick().await);
    }
}

#[test]
fn test_empty_clip_is_rejected() {
    let clock = ManualClock::new();
    let result = PlaybackSession::new(0, Arc::new(clock));

    assert!(matches!(result, Err(SessionError::EmptyClip)));
}

#[test]
fn test_new_session_is_stopped_at_start() {
    let (clock, session) = manual_playback(5);

    assert_eq!(session.status(), PlaybackStatus::Stopped);
    assert_eq!(session.position_secs(), 0);
    assert_eq!(session.progress(), 0.0);
    assert!(!session.is_armed());
    assert_eq!(clock.armed_count(), 0);
    assert!(session.snapshot().can_play);
}

#[tokio::test]
async fn test_auto_stop_at_end() {
    let (clock, mut session) = manual_playback(5);
    assert_eq!(session.toggle(), PlaybackStatus::Playing);

    for expected in 1..=4 {
        drive(&clock, &mut session, 1).await;
        assert_eq!(session.position_secs(), expected);
        assert_eq!(session.status(), PlaybackStatus::Playing);
    }

    drive(&clock, &mut session, 1).await;
    assert_eq!(session.position_secs(), 5);
    assert_eq!(session.status(), PlaybackStatus::Stopped);
    assert_eq!(session.progress(), 1.0);

    // Clock released at the end; a sixth tick changes nothing
    assert_eq!(clock.armed_count(), 0);
    assert_eq!(clock.fire(), 0);
    assert!(!session.tick());
    assert_eq!(session.position_secs(), 5);
    assert!(session.next_tick().now_or_never().is_none());
}

#[tokio::test]
async fn test_replay_from_end_rewinds() {
    let (clock, mut session) = manual_playback(2);
    session.toggle();
    drive(&clock, &mut session, 2).await;
    assert!(session.is_finished());

    assert_eq!(session.toggle(), PlaybackStatus::Playing);
    assert_eq!(session.position_secs(), 0);
    assert_eq!(session.progress(), 0.0);

    drive(&clock, &mut session, 1).await;
    assert_eq!(session.position_secs(), 1);
}

#[tokio::test]
async fn test_pause_keeps_position() {
    let (clock, mut session) = manual_playback(10);
    session.toggle();
    drive(&clock, &mut session, 4).await;

    assert_eq!(session.toggle(), PlaybackStatus::Stopped);
    assert_eq!(session.position_secs(), 4);
    assert_eq!(clock.armed_count(), 0);
    assert!(!session.tick());

    // Resume carries on from where it paused
    assert_eq!(session.toggle(), PlaybackStatus::Playing);
    drive(&clock, &mut session, 1).await;
    assert_eq!(session.position_secs(), 5);
}

#[tokio::test]
async fn test_progress_stays_in_bounds() {
    let (clock, mut session) = manual_playback(7);
    session.toggle();

    let mut last = session.progress();
    for _ in 0..7 {
        drive(&clock, &mut session, 1).await;
        let progress = session.progress();
        assert!((0.0..=1.0).contains(&progress));
        assert!(progress >= last);
        last = progress;
    }
    assert_eq!(last, 1.0);
}

#[tokio::test]
async fn test_snapshot_tween_follows_ticks() {
    let (clock, mut session) = manual_playback(4);
    session.toggle();
    drive(&clock, &mut session, 1).await;

    let snapshot = session.snapshot();
    assert_eq!(snapshot.tween.from, 0.0);
    assert_eq!(snapshot.tween.to, 0.25);

    let halfway = snapshot
        .tween
        .value_at(Duration::from_millis(500), Duration::from_secs(1));
    assert!((halfway - 0.125).abs() < 1e-6);

    drive(&clock, &mut session, 1).await;
    let snapshot = session.snapshot();
    assert_eq!(snapshot.tween.from, 0.25);
    assert_eq!(snapshot.tween.to, 0.5);
}

#[tokio::test]
async fn test_record_then_play_back() -> Result<()> {
    let clock = ManualClock::new();

    let mut recording = RecordingSession::new(Arc::new(clock.clone()));
    recording.start();
    for _ in 0..3 {
        clock.fire();
        recording.next_tick().await;
    }
    recording.stop();
    assert_eq!(recording.elapsed_secs(), 3);

    let mut playback = PlaybackSession::new(recording.elapsed_secs(), Arc::new(clock.clone()))?;
    assert_eq!(playback.toggle(), PlaybackStatus::Playing);
    for _ in 0..3 {
        clock.fire();
        playback.next_tick().await;
    }

    assert_eq!(playback.status(), PlaybackStatus::Stopped);
    assert_eq!(playback.position_secs(), 3);
    assert_eq!(playback.progress(), 1.0);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_playback_with_tokio_clock() {
    let mut session = PlaybackSession::new(3, Arc::new(TokioClock::new())).unwrap();
    session.toggle();

    while session.status().is_playing() {
        session.next_tick().await;
    }

    assert_eq!(session.position_secs(), 3);
    assert!(!session.is_armed());
}
