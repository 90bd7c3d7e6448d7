// Audio-Only Example: recording without a speech engine
//
// Environments with no usable speech service still record: the session
// finalizes off the capture stream ending instead of a recognition end
// event, and the completed recording carries an empty transcript.
//
// Run with: cargo run --example record_audio_only

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::time::sleep;
use tracing::info;

use voice_memos::capture::{WavCaptureConfig, WavFileCapture};
use voice_memos::recorder::{Capabilities, Recorder, RecorderConfig, StartRequest};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    info!("🎙️  Starting audio-only recording demo");

    let workdir = tempfile::TempDir::new()?;
    let wav_path = workdir.path().join("memo-input.wav");
    write_test_tone(&wav_path, 2)?;

    let capture = Arc::new(WavFileCapture::new(WavCaptureConfig {
        path: wav_path,
        chunk_duration_ms: 250,
        realtime: true,
    }));
    let recorder = Recorder::new(
        Capabilities {
            capture,
            speech: None,
        },
        RecorderConfig::default(),
    );

    // Record one second of the two-second input, then stop
    let completion = recorder
        .start(StartRequest::default())
        .await
        .context("Failed to start recording")?;
    sleep(Duration::from_secs(1)).await;
    recorder.stop().await;

    let completed = completion.await.context("Session produced no audio")?;
    assert!(completed.transcript.is_empty());
    info!(
        "✅ Finalized clip: {} bytes ({})",
        completed.audio.data.len(),
        completed.audio.mime_type
    );

    // The concatenated chunks are a playable WAV file
    let reader = hound::WavReader::new(Cursor::new(&completed.audio.data))?;
    info!(
        "✅ Clip parses as WAV: {} samples at {} Hz",
        reader.len(),
        reader.spec().sample_rate
    );

    let out_path = workdir.path().join("clip.wav");
    tokio::fs::write(&out_path, &completed.audio.data).await?;
    info!("✅ Saved clip to {}", out_path.display());

    Ok(())
}

fn write_test_tone(path: &Path, seconds: u32) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 16000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for n in 0..(seconds * spec.sample_rate) {
        let t = n as f32 / spec.sample_rate as f32;
        let sample = (t * 440.0 * 2.0 * std::f32::consts::PI).sin();
        writer.write_sample((sample * i16::MAX as f32 * 0.4) as i16)?;
    }
    writer.finalize()?;
    Ok(())
}
