use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors from acquiring or driving a capture device
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// The user or platform refused microphone access
    #[error("microphone permission denied")]
    PermissionDenied,

    /// No usable capture device is present
    #[error("no capture device available")]
    NoDevice,

    /// The device failed after acquisition
    #[error("capture device failed: {0}")]
    Device(String),
}

/// Requested properties for a capture stream
#[derive(Debug, Clone, Default)]
pub struct CaptureConstraints {
    /// Preferred input device label; None picks the platform default
    pub preferred_device: Option<String>,
}

/// Event emitted by an active capture handle
#[derive(Debug, Clone)]
pub enum CaptureEvent {
    /// A slice of encoded audio in the container the device produces
    Chunk(Vec<u8>),

    /// The device has flushed its last chunk and will emit nothing further
    StreamEnded,
}

/// Audio capture device abstraction
///
/// Implementations hand out exclusive handles for one recording stream each.
/// Acquisition is the only call that may wait on the user, for example a
/// permission prompt.
#[async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Request a capture handle honoring the given constraints
    async fn acquire(
        &self,
        constraints: &CaptureConstraints,
    ) -> Result<Box<dyn CaptureHandle>, CaptureError>;

    /// Device name for logging
    fn name(&self) -> &str;
}

/// An active microphone recording stream
#[async_trait]
pub trait CaptureHandle: Send {
    /// Begin capturing
    ///
    /// The returned channel delivers audio chunks followed by a final
    /// `StreamEnded` once the stream is stopped or runs out.
    async fn start(&mut self) -> Result<mpsc::Receiver<CaptureEvent>, CaptureError>;

    /// Stop capturing; the stream flushes any tail chunk and then ends
    ///
    /// Safe to call repeatedly.
    async fn stop(&mut self) -> Result<(), CaptureError>;

    /// Release the underlying hardware tracks immediately
    fn release_tracks(&mut self);

    /// MIME type of the container this handle emits, e.g. "audio/wav"
    fn mime_type(&self) -> &str;
}
