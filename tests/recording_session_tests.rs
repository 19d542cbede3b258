// Integration tests for the recording session
//
// These tests drive the session with a manual clock so every tick is
// explicit, plus one run against the tokio clock with paused time.

use futures::FutureExt;
use std::sync::Arc;
use std::time::Duration;
use voxclip::clock::{ManualClock, TokioClock};
use voxclip::session::{RecordingSession, RecordingStatus};

fn manual_session() -> (ManualClock, RecordingSession) {
    let clock = ManualClock::new();
    let session = RecordingSession::new(Arc::new(clock.clone()));
    (clock, session)
}

async fn drive(clock: &ManualClock, session: &mut RecordingSession, ticks: u32) {
    for _ in 0..ticks {
        assert_eq!(clock.fire(), 1, "Exactly one armed ticker expected");
        assert!(session.next_tick().await, "Tick should be applied");
    }
}

#[test]
fn test_new_session_is_idle() {
    let (clock, session) = manual_session();

    assert_eq!(session.status(), RecordingStatus::Idle);
    assert_eq!(session.elapsed_secs(), 0);
    assert!(!session.is_armed());
    assert_eq!(clock.armed_count(), 0);
}

#[tokio::test]
async fn test_elapsed_increases_by_one_per_tick() {
    let (clock, mut session) = manual_session();
    assert!(session.start());

    let mut previous = session.elapsed_secs();
    for _ in 0..10 {
        drive(&clock, &mut session, 1).await;
        assert_eq!(session.elapsed_secs(), previous + 1);
        previous = session.elapsed_secs();
    }
}

#[tokio::test]
async fn test_stop_freezes_elapsed() {
    let (clock, mut session) = manual_session();
    session.start();
    drive(&clock, &mut session, 3).await;

    assert!(session.stop());
    assert_eq!(session.status(), RecordingStatus::Stopped);
    assert_eq!(session.elapsed_secs(), 3);

    // The clock is disarmed: nothing is listening any more
    assert!(!session.is_armed());
    assert_eq!(clock.armed_count(), 0);
    assert_eq!(clock.fire(), 0);

    // A tick from a leaked timer is ignored
    assert!(!session.tick());
    assert_eq!(session.elapsed_secs(), 3);

    // Waiting for a tick never completes while stopped
    assert!(session.next_tick().now_or_never().is_none());
}

#[tokio::test]
async fn test_queued_tick_is_dropped_on_stop() {
    let (clock, mut session) = manual_session();
    session.start();
    drive(&clock, &mut session, 2).await;

    // Tick fired but not yet observed when the take stops
    assert_eq!(clock.fire(), 1);
    session.stop();

    assert!(session.next_tick().now_or_never().is_none());
    assert_eq!(session.elapsed_secs(), 2);
}

#[tokio::test]
async fn test_start_while_recording_is_noop() {
    let (clock, mut session) = manual_session();
    session.start();
    drive(&clock, &mut session, 2).await;

    assert!(!session.start());

    assert_eq!(session.status(), RecordingStatus::Recording);
    assert_eq!(session.elapsed_secs(), 2);
    assert_eq!(clock.armed_count(), 1, "Second start must not arm another clock");
}

#[tokio::test]
async fn test_new_take_from_stopped_resets_elapsed() {
    let (clock, mut session) = manual_session();
    session.start();
    drive(&clock, &mut session, 4).await;
    session.stop();

    assert!(session.start());
    assert_eq!(session.elapsed_secs(), 0);

    drive(&clock, &mut session, 1).await;
    assert_eq!(session.elapsed_secs(), 1);
}

#[test]
fn test_stop_when_not_recording_is_noop() {
    let (_clock, mut session) = manual_session();

    assert!(!session.stop());
    assert_eq!(session.status(), RecordingStatus::Idle);
}

#[tokio::test]
async fn test_discard_is_idempotent() {
    let (clock, mut session) = manual_session();
    session.start();
    drive(&clock, &mut session, 3).await;
    session.stop();

    assert!(session.discard());
    assert_eq!(session.status(), RecordingStatus::Idle);
    assert_eq!(session.elapsed_secs(), 0);

    assert!(!session.discard());
    assert_eq!(session.status(), RecordingStatus::Idle);
    assert_eq!(session.elapsed_secs(), 0);
}

#[tokio::test]
async fn test_discard_while_recording_is_rejected() {
    let (clock, mut session) = manual_session();
    session.start();
    drive(&clock, &mut session, 1).await;

    assert!(!session.discard());
    assert_eq!(session.status(), RecordingStatus::Recording);
    assert_eq!(session.elapsed_secs(), 1);
}

#[tokio::test]
async fn test_snapshot_renders_timer() {
    let (clock, mut session) = manual_session();
    session.start();
    drive(&clock, &mut session, 65).await;

    let snapshot = session.snapshot();
    assert_eq!(snapshot.status, RecordingStatus::Recording);
    assert_eq!(snapshot.elapsed_secs, 65);
    assert_eq!(snapshot.timer, "01:05");
}

#[test]
fn test_dropping_session_disarms_clock() {
    let (clock, mut session) = manual_session();
    session.start();
    assert_eq!(clock.armed_count(), 1);

    drop(session);

    assert_eq!(clock.armed_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_recording_with_tokio_clock() {
    let mut session = RecordingSession::new(Arc::new(TokioClock::new()));
    let started = tokio::time::Instant::now();

    session.start();
    for _ in 0..3 {
        session.next_tick().await;
    }
    session.stop();

    assert_eq!(session.elapsed_secs(), 3);
    assert!(started.elapsed() >= Duration::from_secs(3));

    // Paused time keeps advancing, but the stopped session sees nothing
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(session.elapsed_secs(), 3);
}
