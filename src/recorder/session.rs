use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::capture::CaptureHandle;
use crate::recognition::{RecognitionHandle, RecognitionUpdate};

/// Recording lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No session in progress
    Idle,

    /// Providers are live and their events are being merged
    Recording,

    /// Recognition has ended; waiting out the settle delay before assembly
    Finalizing,
}

/// Assembled audio from a completed session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    /// Container type as reported by the capture handle
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// Final output of a completed session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedRecording {
    /// Accumulated final transcript; empty for audio-only sessions
    pub transcript: String,
    pub audio: AudioClip,
}

/// Read-only view of the recorder, published on every state change
#[derive(Debug, Clone, Default)]
pub struct RecorderSnapshot {
    pub is_recording: bool,

    /// True only while the settle delay runs
    pub is_processing: bool,

    /// Final plus interim text, recomputed for every snapshot
    pub transcript: String,

    pub final_transcript: String,

    /// Clip from the last finalized session, if it produced one
    pub audio: Option<AudioClip>,

    /// User-facing message from the last failed start, cleared on restart
    pub alert: Option<String>,
}

/// Mutable state of one recording session
///
/// Owned by the recorder behind a mutex; the per-session pump task is the
/// only writer while the session is live.
pub(crate) struct SessionState {
    pub status: SessionStatus,
    pub stop_requested: bool,
    pub audio_chunks: Vec<Vec<u8>>,
    pub interim_text: String,
    pub final_text: String,
    pub audio: Option<AudioClip>,
    pub alert: Option<String>,
    pub mime_type: String,
    pub capture: Option<Box<dyn CaptureHandle>>,
    pub recognition: Option<Box<dyn RecognitionHandle>>,
    pub completion: Option<oneshot::Sender<CompletedRecording>>,
    pub cancel: CancellationToken,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            status: SessionStatus::Idle,
            stop_requested: false,
            audio_chunks: Vec::new(),
            interim_text: String::new(),
            final_text: String::new(),
            audio: None,
            alert: None,
            mime_type: String::new(),
            capture: None,
            recognition: None,
            completion: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Fold one recognition batch into the transcript
    ///
    /// Final entries append to the accumulated transcript; interim entries
    /// replace the provisional tail wholesale, because engines re-send the
    /// whole in-progress phrase on every update. A batch that finalizes
    /// anything also clears the preview, so finalized text is never shown as
    /// provisional again.
    pub fn apply_recognition(&mut self, update: RecognitionUpdate) {
        let mut final_part = String::new();
        let mut interim_part = String::new();

        for entry in update.entries {
            if entry.is_final {
                final_part.push_str(&entry.text);
            } else {
                interim_part.push_str(&entry.text);
            }
        }

        if !final_part.is_empty() {
            self.final_text.push_str(&final_part);
            self.interim_text.clear();
        } else {
            self.interim_text = interim_part;
        }
    }

    pub fn snapshot(&self) -> RecorderSnapshot {
        RecorderSnapshot {
            is_recording: self.status == SessionStatus::Recording && !self.stop_requested,
            is_processing: self.status == SessionStatus::Finalizing,
            transcript: format!("{}{}", self.final_text, self.interim_text),
            final_transcript: self.final_text.clone(),
            audio: self.audio.clone(),
            alert: self.alert.clone(),
        }
    }
}
