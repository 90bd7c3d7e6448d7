//! Speech recognition
//!
//! A speech engine creates one recognition stream per recording session.
//! Streams deliver batches of interim and final results and always finish
//! with an `Ended` event, which is what drives session finalization.

mod engine;
mod scripted;

pub use engine::{
    RecognitionConfig, RecognitionEntry, RecognitionEvent, RecognitionHandle, RecognitionUpdate,
    SpeechEngine,
};
pub use scripted::ScriptedRecognition;
