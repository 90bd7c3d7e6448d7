use std::time::Duration;

use crate::capture::CaptureConstraints;

/// Configuration for the recorder
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Default recognition language when a start request does not name one
    pub language: String,

    /// Wait after recognition ends before assembling the audio clip, giving
    /// the capture device time to flush its last buffered chunk
    pub settle_delay: Duration,

    /// Constraints passed to the capture device on every start
    pub constraints: CaptureConstraints,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            settle_delay: Duration::from_millis(300),
            constraints: CaptureConstraints::default(),
        }
    }
}

/// Per-session options for `Recorder::start`
#[derive(Debug, Clone, Default)]
pub struct StartRequest {
    /// Recognition language for this session; None uses the configured default
    pub language: Option<String>,
}
