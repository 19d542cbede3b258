use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use super::recipients::RecipientSelection;
use super::screen::{ScreenMode, ScreenState};
use crate::audio::{AudioBackend, CapturedClip};
use crate::clock::Clock;
use crate::config::WaveformConfig;
use crate::delivery::{ClipEnvelope, Delivery};
use crate::error::{Result, SessionError};
use crate::session::{format_clock, PlaybackSession, PlaybackStatus, RecordingSession};
use crate::waveform::{preview_bars, WaveformSampler};

/// User intent on the record screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    RecordTap,
    PlayPauseTap,
    Discard,
    ToggleRecipient(String),
    Send,
}

/// Which session a clock tick was applied to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickSource {
    Recording,
    Playback { finished: bool },
}

/// Screen-level orchestrator for one record screen
///
/// Owns the recording session and, while previewing, the playback session
/// built from the finished take. Intents are applied one at a time and
/// ticks are pumped through [`SessionCoordinator::wait_tick`], so all
/// state changes happen on the task that owns the coordinator.
pub struct SessionCoordinator {
    clock: Arc<dyn Clock>,
    backend: Box<dyn AudioBackend>,
    delivery: Arc<dyn Delivery>,
    waveform: WaveformConfig,

    mode: ScreenMode,
    recording: RecordingSession,
    playback: Option<PlaybackSession>,
    clip: Option<CapturedClip>,

    sampler: WaveformSampler,
    /// Generic visualizer, animated while anything records or plays
    visualizer: WaveformSampler,
    preview_bars: Vec<f32>,
    /// Time origin for waveform animation
    started_at: Instant,

    recipients: RecipientSelection,
    last_error: Option<String>,
}

impl SessionCoordinator {
    pub fn new(
        clock: Arc<dyn Clock>,
        backend: Box<dyn AudioBackend>,
        delivery: Arc<dyn Delivery>,
        waveform: WaveformConfig,
    ) -> Self {
        info!("Record screen ready (audio backend: {})", backend.name());

        let sampler = WaveformSampler::new(waveform.record_bars, waveform.floor);
        let visualizer = WaveformSampler::new(waveform.visualizer_bars, waveform.floor);

        Self {
            recording: RecordingSession::new(Arc::clone(&clock)),
            clock,
            backend,
            delivery,
            waveform,
            mode: ScreenMode::Entry,
            playback: None,
            clip: None,
            sampler,
            visualizer,
            preview_bars: Vec::new(),
            started_at: Instant::now(),
            recipients: RecipientSelection::new(),
            last_error: None,
        }
    }

    pub fn mode(&self) -> ScreenMode {
        self.mode
    }

    pub fn recording(&self) -> &RecordingSession {
        &self.recording
    }

    pub fn playback(&self) -> Option<&PlaybackSession> {
        self.playback.as_ref()
    }

    pub fn recipients(&self) -> &RecipientSelection {
        &self.recipients
    }

    /// Record button: start a take from the entry view, stop it while recording
    pub async fn on_record_tap(&mut self) -> Result<()> {
        match self.mode {
            ScreenMode::Entry => self.start_recording().await,
            ScreenMode::Recording => {
                self.stop_recording().await;
                Ok(())
            }
            ScreenMode::Preview => Err(SessionError::InvalidTransition {
                from: "previewing",
                action: "record",
            }),
        }
    }

    async fn start_recording(&mut self) -> Result<()> {
        self.backend
            .start_capture()
            .await
            .map_err(|e| SessionError::Backend(e.to_string()))?;

        self.recording.start();
        self.sampler.set_active(true, self.started_at.elapsed());
        self.mode = ScreenMode::Recording;
        self.sync_visualizer();

        Ok(())
    }

    async fn stop_recording(&mut self) {
        self.recording.stop();
        self.sampler.set_active(false, self.started_at.elapsed());

        let duration_secs = self.recording.elapsed_secs();

        let clip = match self.backend.stop_capture(duration_secs).await {
            Ok(clip) => clip,
            Err(e) => {
                error!("Failed to stop capture: {}", e);
                CapturedClip {
                    duration_secs,
                    ..Default::default()
                }
            }
        };

        self.playback = match PlaybackSession::new(duration_secs, Arc::clone(&self.clock)) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!("Preview without playback: {}", e);
                None
            }
        };
        self.clip = Some(clip);
        self.preview_bars = preview_bars(self.waveform.preview_bars, &mut rand::rng());
        self.mode = ScreenMode::Preview;
        self.sync_visualizer();

        info!("Previewing {} take", format_clock(duration_secs));
    }

    /// Play/pause on the preview card
    pub async fn on_play_pause_tap(&mut self) -> Result<PlaybackStatus> {
        if self.mode != ScreenMode::Preview {
            return Err(SessionError::InvalidTransition {
                from: self.mode_label(),
                action: "play",
            });
        }

        let playback = self
            .playback
            .as_mut()
            .ok_or(SessionError::PlaybackUnavailable)?;

        let result = match playback.toggle() {
            PlaybackStatus::Playing => {
                let position = playback.position_secs();
                let clip = self.clip.clone().unwrap_or_default();

                match self.backend.start_playback(&clip, position).await {
                    Ok(()) => Ok(PlaybackStatus::Playing),
                    Err(e) => {
                        playback.pause();
                        Err(SessionError::Backend(e.to_string()))
                    }
                }
            }
            PlaybackStatus::Stopped => {
                if let Err(e) = self.backend.pause_playback().await {
                    warn!("Failed to pause playback: {}", e);
                }
                Ok(PlaybackStatus::Stopped)
            }
        };

        self.sync_visualizer();
        result
    }

    /// Throw the previewed take away and go back to the entry view
    ///
    /// A no-op on the entry view.
    pub async fn on_discard(&mut self) -> Result<()> {
        match self.mode {
            ScreenMode::Preview => {
                self.teardown_preview().await;
                info!("Take discarded");
                Ok(())
            }
            ScreenMode::Entry => {
                debug!("Nothing to discard");
                Ok(())
            }
            ScreenMode::Recording => Err(SessionError::InvalidTransition {
                from: "recording",
                action: "discard",
            }),
        }
    }

    /// Pick or unpick a recipient for the previewed take
    pub fn toggle_recipient(&mut self, id: &str) -> bool {
        self.recipients.toggle(id)
    }

    /// Hand the previewed take to delivery and reset the screen
    ///
    /// Delivery runs in the background; its failures are logged only.
    pub async fn on_send_tap(&mut self) -> Result<ClipEnvelope> {
        if self.mode != ScreenMode::Preview {
            return Err(SessionError::InvalidTransition {
                from: self.mode_label(),
                action: "send",
            });
        }

        if self.playback.is_none() || self.recording.elapsed_secs() == 0 {
            warn!("Refusing to send an empty take");
            return Err(SessionError::EmptyClip);
        }

        if self.recipients.is_empty() {
            return Err(SessionError::NoRecipients);
        }

        let envelope = ClipEnvelope::new(self.recording.elapsed_secs(), self.recipients.ids());

        info!(
            "Sending clip {} ({}s) to {} recipient(s)",
            envelope.clip_id,
            envelope.duration_secs,
            envelope.recipients.len()
        );

        let delivery = Arc::clone(&self.delivery);
        let outgoing = envelope.clone();
        tokio::spawn(async move {
            let clip_id = outgoing.clip_id;
            if let Err(e) = delivery.deliver(outgoing).await {
                error!("Failed to deliver clip {}: {}", clip_id, e);
            }
        });

        self.teardown_preview().await;

        Ok(envelope)
    }

    /// Apply one intent
    pub async fn apply(&mut self, intent: Intent) -> Result<()> {
        debug!("Intent {:?} in {} view", intent, self.mode);

        let result = match intent {
            Intent::RecordTap => self.on_record_tap().await,
            Intent::PlayPauseTap => self.on_play_pause_tap().await.map(|_| ()),
            Intent::Discard => self.on_discard().await,
            Intent::ToggleRecipient(id) => {
                self.toggle_recipient(&id);
                Ok(())
            }
            Intent::Send => self.on_send_tap().await.map(|_| ()),
        };

        self.last_error = result.as_ref().err().map(|e| e.user_message());
        result
    }

    /// Wait for the armed session's clock and apply its tick
    ///
    /// Cancel safe: a tick is either fully applied or not observed. Never
    /// resolves while neither session is armed.
    pub async fn wait_tick(&mut self) -> TickSource {
        let playback = self.playback.as_mut();

        tokio::select! {
            _ = self.recording.next_tick() => TickSource::Recording,
            finished = async move {
                match playback {
                    Some(playback) => {
                        playback.next_tick().await;
                        !playback.status().is_playing()
                    }
                    None => std::future::pending().await,
                }
            } => TickSource::Playback { finished },
        }
    }

    /// Follow-up work for a tick, e.g. releasing audio at the end of a clip
    pub async fn after_tick(&mut self, source: TickSource) {
        if let TickSource::Playback { finished: true } = source {
            if let Err(e) = self.backend.pause_playback().await {
                warn!("Failed to stop playback at end of clip: {}", e);
            }
            self.sync_visualizer();
        }
    }

    /// Wait for and fully handle the next tick
    pub async fn next_tick(&mut self) -> TickSource {
        let source = self.wait_tick().await;
        self.after_tick(source).await;
        source
    }

    pub fn snapshot(&self) -> ScreenState {
        let now = self.started_at.elapsed();
        let playback = self.playback.as_ref().map(|p| p.snapshot());

        let (timer, bars) = match self.mode {
            ScreenMode::Entry => (format_clock(0), self.sampler.sample(now)),
            ScreenMode::Recording => (
                format_clock(self.recording.elapsed_secs()),
                self.backend
                    .levels(self.waveform.record_bars)
                    .unwrap_or_else(|| self.sampler.sample(now)),
            ),
            ScreenMode::Preview => (
                format_clock(playback.as_ref().map_or(0, |p| p.position_secs)),
                self.preview_bars.clone(),
            ),
        };

        ScreenState {
            mode: self.mode,
            timer,
            recording: self.recording.snapshot(),
            can_play: playback.as_ref().is_some_and(|p| p.can_play),
            playback,
            bars,
            visualizer: self.visualizer.sample(now),
            selected_recipients: self.recipients.len(),
            last_error: self.last_error.clone(),
        }
    }

    /// Stop everything the screen holds: capture, playback and both clocks
    pub async fn shutdown(&mut self) {
        if self.recording.status().is_recording() {
            self.recording.stop();
            if let Err(e) = self.backend.stop_capture(self.recording.elapsed_secs()).await {
                warn!("Failed to stop capture on shutdown: {}", e);
            }
        }

        self.teardown_preview().await;
        self.recording.discard();
        self.sampler.set_active(false, self.started_at.elapsed());
        self.sync_visualizer();

        info!("Record screen torn down");
    }

    /// Consume intents until the channel closes, publishing the screen
    /// state after every change
    pub async fn run(
        mut self,
        mut intents: mpsc::Receiver<Intent>,
        state: watch::Sender<ScreenState>,
    ) {
        state.send_replace(self.snapshot());

        loop {
            tokio::select! {
                intent = intents.recv() => match intent {
                    Some(intent) => {
                        if let Err(e) = self.apply(intent).await {
                            warn!("Intent rejected: {}", e);
                        }
                    }
                    None => break,
                },
                source = self.wait_tick() => self.after_tick(source).await,
            }

            state.send_replace(self.snapshot());
        }

        self.shutdown().await;
        state.send_replace(self.snapshot());
    }

    async fn teardown_preview(&mut self) {
        if let Some(playback) = self.playback.take() {
            if playback.status().is_playing() {
                if let Err(e) = self.backend.pause_playback().await {
                    warn!("Failed to pause playback: {}", e);
                }
            }
        }

        self.clip = None;
        self.preview_bars.clear();
        self.recipients.clear();
        self.recording.discard();
        self.mode = ScreenMode::Entry;
        self.sync_visualizer();
    }

    fn sync_visualizer(&mut self) {
        let playing = self
            .playback
            .as_ref()
            .is_some_and(|p| p.status().is_playing());
        let active = self.recording.status().is_recording() || playing;
        self.visualizer.set_active(active, self.started_at.elapsed());
    }

    fn mode_label(&self) -> &'static str {
        match self.mode {
            ScreenMode::Entry => "idle",
            ScreenMode::Recording => "recording",
            ScreenMode::Preview => "previewing",
        }
    }
}
