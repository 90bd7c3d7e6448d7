// Live Session Example: full recording pipeline with scripted recognition
//
// This example demonstrates the complete recording flow:
// 1. A WAV file stands in for the microphone (timed chunk replay)
// 2. The scripted engine emits interim previews and final results
// 3. The recorder merges both streams into a live transcript
// 4. Stopping drains the providers and finalizes the audio clip
// 5. The transcript is saved as a memo in a JSON store
//
// Run with: cargo run --example live_session

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::time::sleep;
use tracing::info;

use voice_memos::capture::{WavCaptureConfig, WavFileCapture};
use voice_memos::memos::{Memo, MemoDraft, MemoService};
use voice_memos::recognition::{ScriptedRecognition, SpeechEngine};
use voice_memos::recorder::{Capabilities, Recorder, RecorderConfig, StartRequest};
use voice_memos::storage::{JsonFileRepository, RepositoryConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    info!("🎙️  Starting live session demo");

    let workdir = tempfile::TempDir::new()?;

    // 1. Synthesize five seconds of tone as the "microphone" input
    let wav_path = workdir.path().join("memo-input.wav");
    write_test_tone(&wav_path, 5)?;
    info!("✅ Wrote capture input: {}", wav_path.display());

    // 2. Wire the capture device and the scripted engine into a recorder
    let capture = Arc::new(WavFileCapture::new(WavCaptureConfig {
        path: wav_path,
        chunk_duration_ms: 250,
        realtime: true,
    }));
    let speech = Arc::new(ScriptedRecognition::new(
        vec![
            "this is a quick note".to_string(),
            "remember to send the summary".to_string(),
        ],
        Duration::from_millis(400),
    )) as Arc<dyn SpeechEngine>;
    let recorder = Recorder::new(
        Capabilities {
            capture,
            speech: Some(speech),
        },
        RecorderConfig::default(),
    );

    // 3. Watch the live transcript while the session runs
    let mut snapshots = recorder.subscribe();
    let listener = tokio::spawn(async move {
        while snapshots.changed().await.is_ok() {
            let snapshot = snapshots.borrow_and_update().clone();
            if !snapshot.transcript.is_empty() {
                info!("📝 transcript: {:?}", snapshot.transcript);
            }
        }
    });

    // 4. Record for three seconds, then stop and wait for the clip
    let completion = recorder
        .start(StartRequest::default())
        .await
        .context("Failed to start recording")?;
    sleep(Duration::from_secs(3)).await;
    recorder.stop().await;

    let completed = completion.await.context("Session produced no audio")?;
    listener.abort();
    info!(
        "✅ Finalized clip: {} bytes ({})",
        completed.audio.data.len(),
        completed.audio.mime_type
    );
    info!("✅ Final transcript: {:?}", completed.transcript);

    // 5. Save the transcript as a memo
    let repository: JsonFileRepository<Memo> = JsonFileRepository::open(RepositoryConfig {
        data_dir: workdir.path().join("data"),
        slot: "demo-memos".to_string(),
        version: "1.0.0".to_string(),
    })
    .await?;
    let store_path = repository.path().to_path_buf();
    let memos = MemoService::new(Arc::new(repository));
    let memo = memos
        .create_memo(MemoDraft {
            title: "Recorded memo".to_string(),
            description: completed.transcript,
        })
        .await?;
    info!("✅ Saved memo {} in {}", memo.id, store_path.display());

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
