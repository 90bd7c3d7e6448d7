use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch, Mutex};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::capture::{CaptureDevice, CaptureError, CaptureEvent};
use crate::recognition::{RecognitionConfig, RecognitionEvent, SpeechEngine};

use super::config::{RecorderConfig, StartRequest};
use super::session::{AudioClip, CompletedRecording, RecorderSnapshot, SessionState, SessionStatus};

/// Message shown to the user when the capture device cannot be acquired
const MIC_ALERT: &str = "Could not access microphone";

/// Resolves with the session's output once it finalizes with audio
///
/// The sending side is dropped without firing when the session captured no
/// audio or was superseded by a newer start.
pub type Completion = oneshot::Receiver<CompletedRecording>;

/// Capability providers a recorder drives
#[derive(Clone)]
pub struct Capabilities {
    pub capture: Arc<dyn CaptureDevice>,

    /// Speech-to-text is optional; without it sessions record audio only
    pub speech: Option<Arc<dyn SpeechEngine>>,
}

/// Events from both providers, funneled into the session's pump task
enum SessionEvent {
    Chunk(Vec<u8>),
    CaptureEnded,
    Recognition(RecognitionEvent),
}

/// Owns the lifecycle of one recording session at a time
///
/// Both provider streams are forwarded into a single channel consumed by one
/// pump task per session, so every state mutation is serialized. Consumers
/// observe the recorder through a watch channel that receives a fresh
/// snapshot on each mutation. Starting a new session cancels the previous
/// session's pump, forwarders and settle timer through a per-session token,
/// so a stale timer can never finalize into the new session's state.
pub struct Recorder {
    capabilities: Capabilities,
    config: RecorderConfig,
    state: Arc<Mutex<SessionState>>,
    watch_tx: watch::Sender<RecorderSnapshot>,
}

impl Recorder {
    pub fn new(capabilities: Capabilities, config: RecorderConfig) -> Self {
        let (watch_tx, _) = watch::channel(RecorderSnapshot::default());
        Self {
            capabilities,
            config,
            state: Arc::new(Mutex::new(SessionState::new())),
            watch_tx,
        }
    }

    /// Subscribe to state snapshots; a fresh one is published on every change
    pub fn subscribe(&self) -> watch::Receiver<RecorderSnapshot> {
        self.watch_tx.subscribe()
    }

    /// Current state snapshot
    pub fn snapshot(&self) -> RecorderSnapshot {
        self.watch_tx.borrow().clone()
    }

    /// Start a recording session, superseding any session in progress
    ///
    /// Device acquisition happens before any session state is touched; if it
    /// fails, the only visible effects are a log line and the alert carried
    /// in the snapshot. A session already in progress keeps running.
    pub async fn start(&self, request: StartRequest) -> Result<Completion, CaptureError> {
        let mut capture = match self
            .capabilities
            .capture
            .acquire(&self.config.constraints)
            .await
        {
            Ok(handle) => handle,
            Err(e) => {
                error!("Audio capture acquisition failed: {}", e);
                let mut state = self.state.lock().await;
                state.alert = Some(MIC_ALERT.to_string());
                self.publish(&state);
                return Err(e);
            }
        };

        let capture_rx = match capture.start().await {
            Ok(rx) => rx,
            Err(e) => {
                error!("Audio capture failed to start: {}", e);
                capture.release_tracks();
                let mut state = self.state.lock().await;
                state.alert = Some(MIC_ALERT.to_string());
                self.publish(&state);
                return Err(e);
            }
        };

        // Recognition is created only once capture is live; without an
        // engine the session records audio only.
        let recognition_config = RecognitionConfig {
            language: request
                .language
                .unwrap_or_else(|| self.config.language.clone()),
            ..RecognitionConfig::default()
        };
        let mut recognition = None;
        let mut recognition_rx = None;
        if let Some(engine) = &self.capabilities.speech {
            let mut handle = engine.create(&recognition_config);
            recognition_rx = Some(handle.start().await);
            recognition = Some(handle);
            info!(
                "Recognition started ({}, lang={})",
                engine.name(),
                recognition_config.language
            );
        } else {
            info!("No speech engine configured; recording audio only");
        }
        let has_recognition = recognition_rx.is_some();

        let (completion_tx, completion_rx) = oneshot::channel();
        let cancel = CancellationToken::new();
        let (event_tx, event_rx) = mpsc::channel(256);

        {
            let mut state = self.state.lock().await;

            // Supersede whatever session was live. Its pump, forwarders and
            // any pending settle timer all watch the old token.
            state.cancel.cancel();
            Self::teardown(&mut state).await;

            *state = SessionState::new();
            state.mime_type = capture.mime_type().to_string();
            state.capture = Some(capture);
            state.recognition = recognition;
            state.completion = Some(completion_tx);
            state.cancel = cancel.clone();
            state.status = SessionStatus::Recording;
            self.publish(&state);
        }

        Self::spawn_capture_forwarder(capture_rx, event_tx.clone(), cancel.clone());
        if let Some(rx) = recognition_rx {
            Self::spawn_recognition_forwarder(rx, event_tx, cancel.clone());
        }
        self.spawn_pump(event_rx, cancel, has_recognition);

        info!("Recording session started");
        Ok(completion_rx)
    }

    /// Stop the session in progress
    ///
    /// Safe to call at any time, including when idle. Hardware is released
    /// immediately, but the clip is not assembled here: the recognition end
    /// event (or the capture end, for audio-only sessions) drives
    /// finalization once the providers have drained.
    pub async fn stop(&self) {
        let mut state = self.state.lock().await;

        if state.status == SessionStatus::Recording && !state.stop_requested {
            state.stop_requested = true;
            if let Some(capture) = state.capture.as_mut() {
                if let Err(e) = capture.stop().await {
                    warn!("Capture stop failed: {}", e);
                }
                capture.release_tracks();
            }
            info!("Recording stopped; waiting for recognition to drain");
            self.publish(&state);
        }

        // Re-requesting stop on the engine is harmless and makes sure its
        // end event is on the way.
        if let Some(recognition) = state.recognition.as_mut() {
            recognition.stop().await;
        }
    }

    fn publish(&self, state: &SessionState) {
        self.watch_tx.send_replace(state.snapshot());
    }

    fn publish_to(watch_tx: &watch::Sender<RecorderSnapshot>, state: &SessionState) {
        watch_tx.send_replace(state.snapshot());
    }

    /// Stop and release any provider handles still attached to the session
    async fn teardown(state: &mut SessionState) {
        if let Some(mut capture) = state.capture.take() {
            if let Err(e) = capture.stop().await {
                warn!("Capture stop failed: {}", e);
            }
            capture.release_tracks();
        }
        if let Some(mut recognition) = state.recognition.take() {
            recognition.stop().await;
        }
    }

    fn spawn_capture_forwarder(
        mut rx: mpsc::Receiver<CaptureEvent>,
        tx: mpsc::Sender<SessionEvent>,
        cancel: CancellationToken,
    ) {
        tokio::spawn(async move {
            loop {
                let event = tokio::select! {
                    _ = cancel.cancelled() => return,
                    event = rx.recv() => event,
                };
                let forwarded = match event {
                    Some(CaptureEvent::Chunk(data)) => SessionEvent::Chunk(data),
                    // A closed channel counts as the stream ending even if
                    // the device never said so.
                    Some(CaptureEvent::StreamEnded) | None => SessionEvent::CaptureEnded,
                };
                let ended = matches!(forwarded, SessionEvent::CaptureEnded);
                if tx.send(forwarded).await.is_err() || ended {
                    return;
                }
            }
        });
    }

    fn spawn_recognition_forwarder(
        mut rx: mpsc::Receiver<RecognitionEvent>,
        tx: mpsc::Sender<SessionEvent>,
        cancel: CancellationToken,
    ) {
        tokio::spawn(async move {
            loop {
                let event = tokio::select! {
                    _ = cancel.cancelled() => return,
                    event = rx.recv() => event.unwrap_or(RecognitionEvent::Ended),
                };
                let ended = matches!(event, RecognitionEvent::Ended);
                if tx.send(SessionEvent::Recognition(event)).await.is_err() || ended {
                    return;
                }
            }
        });
    }

    /// Consume session events one at a time, then finalize
    ///
    /// The settle timer is armed exactly once, when the session enters
    /// Finalizing; chunks that land while it runs still make the clip.
    fn spawn_pump(
        &self,
        mut events: mpsc::Receiver<SessionEvent>,
        cancel: CancellationToken,
        has_recognition: bool,
    ) {
        let state = Arc::clone(&self.state);
        let watch_tx = self.watch_tx.clone();
        let settle_delay = self.config.settle_delay;

        tokio::spawn(async move {
            let settle = tokio::time::sleep(Duration::ZERO);
            tokio::pin!(settle);
            let mut settle_armed = false;
            let mut events_done = false;

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => return,
                    _ = &mut settle, if settle_armed => {
                        Self::finalize(&state, &watch_tx, &cancel).await;
                        return;
                    }
                    event = events.recv(), if !events_done => {
                        match event {
                            None => events_done = true,
                            Some(event) => {
                                let enter_finalizing = Self::handle_event(
                                    &state,
                                    &watch_tx,
                                    &cancel,
                                    has_recognition,
                                    event,
                                )
                                .await;
                                if enter_finalizing && !settle_armed {
                                    settle_armed = true;
                                    settle.as_mut().reset(Instant::now() + settle_delay);
                                }
                            }
                        }
                    }
                }
            }
        });
    }

    /// Apply one provider event to session state
    ///
    /// Returns true when the session has just entered Finalizing.
    async fn handle_event(
        state: &Arc<Mutex<SessionState>>,
        watch_tx: &watch::Sender<RecorderSnapshot>,
        cancel: &CancellationToken,
        has_recognition: bool,
        event: SessionEvent,
    ) -> bool {
        let mut s = state.lock().await;
        if cancel.is_cancelled() {
            return false;
        }

        match event {
            SessionEvent::Chunk(data) => {
                if s.status != SessionStatus::Idle && !data.is_empty() {
                    s.audio_chunks.push(data);
                    Self::publish_to(watch_tx, &s);
                }
                false
            }
            SessionEvent::CaptureEnded => {
                if has_recognition {
                    // Mirror the capture stream's end into the engine so its
                    // end event drives finalization.
                    if let Some(recognition) = s.recognition.as_mut() {
                        recognition.stop().await;
                    }
                    false
                } else if s.status == SessionStatus::Recording {
                    info!("Capture ended; finalizing audio-only session");
                    s.status = SessionStatus::Finalizing;
                    Self::publish_to(watch_tx, &s);
                    true
                } else {
                    false
                }
            }
            SessionEvent::Recognition(RecognitionEvent::Results(update)) => {
                s.apply_recognition(update);
                Self::publish_to(watch_tx, &s);
                false
            }
            SessionEvent::Recognition(RecognitionEvent::Error { code }) => {
                // Engines recover from transient failures on their own; the
                // session keeps running either way.
                warn!("Speech recognition error: {}", code);
                false
            }
            SessionEvent::Recognition(RecognitionEvent::Ended) => {
                if s.status == SessionStatus::Recording {
                    info!("Recognition ended; finalizing session");
                    s.status = SessionStatus::Finalizing;
                    Self::publish_to(watch_tx, &s);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Assemble the clip, resolve the completion and return to idle
    async fn finalize(
        state: &Arc<Mutex<SessionState>>,
        watch_tx: &watch::Sender<RecorderSnapshot>,
        cancel: &CancellationToken,
    ) {
        let mut s = state.lock().await;
        if cancel.is_cancelled() || s.status != SessionStatus::Finalizing {
            return;
        }

        let completion = s.completion.take();
        if s.audio_chunks.is_empty() {
            info!("Session ended with no audio; nothing to assemble");
        } else {
            let total: usize = s.audio_chunks.iter().map(Vec::len).sum();
            let mut data = Vec::with_capacity(total);
            for chunk in &s.audio_chunks {
                data.extend_from_slice(chunk);
            }
            let clip = AudioClip {
                mime_type: s.mime_type.clone(),
                data,
            };
            info!(
                "Assembled audio clip: {} bytes from {} chunks ({})",
                total,
                s.audio_chunks.len(),
                clip.mime_type
            );
            s.audio = Some(clip.clone());
            if let Some(completion) = completion {
                let _ = completion.send(CompletedRecording {
                    transcript: s.final_text.clone(),
                    audio: clip,
                });
            }
        }

        Self::teardown(&mut s).await;
        // The session is over; let its forwarders wind down too.
        s.cancel.cancel();
        s.status = SessionStatus::Idle;
        s.stop_requested = false;
        Self::publish_to(watch_tx, &s);
    }
}
