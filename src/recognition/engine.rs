use async_trait::async_trait;
use tokio::sync::mpsc;

/// Configuration for a recognition stream
#[derive(Debug, Clone)]
pub struct RecognitionConfig {
    /// BCP-47 language hint, e.g. "en-US"
    pub language: String,

    /// Deliver provisional results while speech is in progress
    pub interim_results: bool,

    /// Keep recognizing across pauses instead of ending after one utterance
    pub continuous: bool,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            interim_results: true,
            continuous: true,
        }
    }
}

/// One recognized alternative within an update batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionEntry {
    /// Final entries will not be revised; interim entries are provisional
    pub is_final: bool,
    pub text: String,
}

/// A batch of recognition results
///
/// Engines re-deliver the in-progress utterance on every update, so a batch
/// carries the index its results resume from; entries at and beyond that
/// index replace whatever the engine previously reported for them.
#[derive(Debug, Clone)]
pub struct RecognitionUpdate {
    /// Index of this batch's first entry within the engine's result list
    pub resume_index: usize,
    pub entries: Vec<RecognitionEntry>,
}

/// Event emitted by an active recognition stream
#[derive(Debug, Clone)]
pub enum RecognitionEvent {
    Results(RecognitionUpdate),

    /// Engine-reported failure, e.g. "network"; recognition may still recover
    Error { code: String },

    /// The engine will deliver no further results
    Ended,
}

/// Speech-to-text engine abstraction
///
/// Environments without a usable engine configure no engine at all, and
/// recording sessions then run audio-only.
pub trait SpeechEngine: Send + Sync {
    /// Create a recognition stream for one session
    fn create(&self, config: &RecognitionConfig) -> Box<dyn RecognitionHandle>;

    /// Engine name for logging
    fn name(&self) -> &str;
}

/// A live speech-to-text stream producing incremental results
#[async_trait]
pub trait RecognitionHandle: Send {
    /// Begin recognizing; events arrive on the returned channel
    async fn start(&mut self) -> mpsc::Receiver<RecognitionEvent>;

    /// Ask recognition to wind down and emit `Ended`
    ///
    /// Safe to call repeatedly; engines treat extra stops as no-ops.
    async fn stop(&mut self);
}
