//! Recording session control
//!
//! Merges a capture device's chunk stream and a speech engine's result
//! stream into one recording session: a transcript assembled from final and
//! interim fragments, buffered audio chunks, and a finalized clip delivered
//! at most once per session.

mod config;
mod controller;
mod session;

pub use config::{RecorderConfig, StartRequest};
pub use controller::{Capabilities, Completion, Recorder};
pub use session::{AudioClip, CompletedRecording, RecorderSnapshot};
