//! Audio capture
//!
//! The capture device hands out one exclusive handle per recording stream;
//! the handle emits encoded chunks over a channel and finishes with a
//! `StreamEnded` marker. The bundled implementation replays a WAV file in
//! place of a live microphone.

mod device;
mod wav;

pub use device::{CaptureConstraints, CaptureDevice, CaptureError, CaptureEvent, CaptureHandle};
pub use wav::{WavCaptureConfig, WavFileCapture};
