use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::device::{
    CaptureConstraints, CaptureDevice, CaptureError, CaptureEvent, CaptureHandle,
};

/// Configuration for the file-backed capture device
#[derive(Debug, Clone)]
pub struct WavCaptureConfig {
    /// WAV file whose bytes are replayed as the capture stream
    pub path: PathBuf,

    /// Amount of audio per emitted chunk
    pub chunk_duration_ms: u64,

    /// Pace emission in real time; false emits as fast as possible
    pub realtime: bool,
}

impl Default for WavCaptureConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("fixtures/sample-memo.wav"),
            chunk_duration_ms: 250,
            realtime: true,
        }
    }
}

/// Capture device backed by a WAV file
///
/// Replays the file's bytes as timed chunks, container header first, so that
/// the concatenation of all emitted chunks is the original playable file.
/// Stands in for a live microphone during development and testing.
pub struct WavFileCapture {
    config: WavCaptureConfig,
}

impl WavFileCapture {
    pub fn new(config: WavCaptureConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl CaptureDevice for WavFileCapture {
    async fn acquire(
        &self,
        _constraints: &CaptureConstraints,
    ) -> Result<Box<dyn CaptureHandle>, CaptureError> {
        let path = &self.config.path;
        if !path.exists() {
            return Err(CaptureError::NoDevice);
        }

        // Validate the container up front; a file we cannot parse behaves
        // like a broken device, not a missing one.
        let reader = hound::WavReader::open(path).map_err(|e| {
            CaptureError::Device(format!("unreadable WAV {}: {}", path.display(), e))
        })?;
        let spec = reader.spec();
        drop(reader);

        let bytes_per_second = spec.sample_rate as u64
            * spec.channels as u64
            * (spec.bits_per_sample as u64 / 8).max(1);
        let chunk_bytes =
            (bytes_per_second * self.config.chunk_duration_ms / 1000).max(1) as usize;

        let data = tokio::fs::read(path)
            .await
            .map_err(|e| CaptureError::Device(format!("read {}: {}", path.display(), e)))?;

        info!(
            "Acquired WAV capture: {} ({} bytes, {} Hz, {} ch)",
            path.display(),
            data.len(),
            spec.sample_rate,
            spec.channels
        );

        Ok(Box::new(WavCaptureHandle {
            data: Some(data),
            chunk_bytes,
            interval: if self.config.realtime {
                Duration::from_millis(self.config.chunk_duration_ms)
            } else {
                Duration::from_millis(1)
            },
            cancel: CancellationToken::new(),
        }))
    }

    fn name(&self) -> &str {
        "wav-file"
    }
}

struct WavCaptureHandle {
    data: Option<Vec<u8>>,
    chunk_bytes: usize,
    interval: Duration,
    cancel: CancellationToken,
}

#[async_trait]
impl CaptureHandle for WavCaptureHandle {
    async fn start(&mut self) -> Result<mpsc::Receiver<CaptureEvent>, CaptureError> {
        let data = self
            .data
            .take()
            .ok_or_else(|| CaptureError::Device("capture already started".to_string()))?;
        let (tx, rx) = mpsc::channel(64);
        let cancel = self.cancel.clone();
        let chunk_bytes = self.chunk_bytes;
        let interval = self.interval;

        tokio::spawn(async move {
            let mut offset = 0;
            while offset < data.len() {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {}
                }
                let end = (offset + chunk_bytes).min(data.len());
                if tx
                    .send(CaptureEvent::Chunk(data[offset..end].to_vec()))
                    .await
                    .is_err()
                {
                    return;
                }
                offset = end;
            }

            // Stopping flushes one partial buffer the way a real recorder
            // delivers its final chunk after stop. Audio past that point was
            // never captured.
            if offset < data.len() {
                let end = (offset + chunk_bytes).min(data.len());
                let _ = tx
                    .send(CaptureEvent::Chunk(data[offset..end].to_vec()))
                    .await;
                offset = end;
            }
            let _ = tx.send(CaptureEvent::StreamEnded).await;
            debug!("WAV capture stream ended ({} of {} bytes)", offset, data.len());
        });

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<(), CaptureError> {
        self.cancel.cancel();
        Ok(())
    }

    fn release_tracks(&mut self) {
        // For a file there is no hardware to give back; releasing and
        // stopping coincide.
        self.cancel.cancel();
    }

    fn mime_type(&self) -> &str {
        "audio/wav"
    }
}
