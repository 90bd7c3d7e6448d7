pub mod capture;
pub mod config;
pub mod http;
pub mod memos;
pub mod recognition;
pub mod recorder;
pub mod storage;

pub use capture::{
    CaptureConstraints, CaptureDevice, CaptureError, CaptureEvent, CaptureHandle,
    WavCaptureConfig, WavFileCapture,
};
pub use config::Config;
pub use http::{create_router, AppState};
pub use memos::{Memo, MemoDraft, MemoError, MemoPatch, MemoService};
pub use recognition::{
    RecognitionConfig, RecognitionEntry, RecognitionEvent, RecognitionHandle, RecognitionUpdate,
    ScriptedRecognition, SpeechEngine,
};
pub use recorder::{
    AudioClip, Capabilities, CompletedRecording, Completion, Recorder, RecorderConfig,
    RecorderSnapshot, StartRequest,
};
pub use storage::{Entity, JsonFileRepository, Repository, RepositoryConfig, RepositoryError};
