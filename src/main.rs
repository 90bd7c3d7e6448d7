use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use voice_memos::capture::{WavCaptureConfig, WavFileCapture};
use voice_memos::recognition::{ScriptedRecognition, SpeechEngine};
use voice_memos::recorder::{Capabilities, Recorder, RecorderConfig};
use voice_memos::storage::{JsonFileRepository, RepositoryConfig};
use voice_memos::{create_router, AppState, Config, Memo, MemoService};

#[derive(Debug, Parser)]
#[command(name = "voice-memos", about = "Voice memo recording and storage service")]
struct Args {
    /// Path to the configuration file, without extension
    #[arg(long, default_value = "config/voice-memos")]
    config: String,

    /// Bind address, overriding the configuration file
    #[arg(long)]
    bind: Option<String>,

    /// Port, overriding the configuration file
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)
        .with_context(|| format!("Failed to load config {}", args.config))?;

    info!("{} starting", cfg.service.name);

    let repository: JsonFileRepository<Memo> = JsonFileRepository::open(RepositoryConfig {
        data_dir: cfg.storage.data_dir.clone().into(),
        slot: cfg.storage.slot.clone(),
        version: cfg.storage.version.clone(),
    })
    .await
    .context("Failed to open memo store")?;
    let memos = Arc::new(MemoService::new(Arc::new(repository)));

    if !Path::new(&cfg.recording.input_wav).exists() {
        warn!(
            "Capture input {} not found; recording will fail until it exists",
            cfg.recording.input_wav
        );
    }
    let capture = Arc::new(WavFileCapture::new(WavCaptureConfig {
        path: cfg.recording.input_wav.clone().into(),
        chunk_duration_ms: cfg.recording.chunk_duration_ms,
        realtime: true,
    }));

    let speech = if cfg.recording.script.is_empty() {
        info!("No recognition script configured; sessions will be audio-only");
        None
    } else {
        Some(Arc::new(ScriptedRecognition::new(
            cfg.recording.script.clone(),
            Duration::from_millis(400),
        )) as Arc<dyn SpeechEngine>)
    };

    let recorder = Arc::new(Recorder::new(
        Capabilities { capture, speech },
        RecorderConfig {
            language: cfg.recording.language.clone(),
            settle_delay: Duration::from_millis(cfg.recording.settle_delay_ms),
            ..RecorderConfig::default()
        },
    ));

    let state = AppState::new(recorder, memos);
    let router = create_router(state);

    let bind = args.bind.as_deref().unwrap_or(&cfg.service.http.bind);
    let port = args.port.unwrap_or(cfg.service.http.port);
    let addr = format!("{}:{}", bind, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
