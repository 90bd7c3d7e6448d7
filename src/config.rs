use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub recording: RecordingConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordingConfig {
    /// Default recognition language
    pub language: String,

    /// Wait between recognition end and clip assembly, in milliseconds
    pub settle_delay_ms: u64,

    /// WAV file replayed by the capture device
    pub input_wav: String,

    /// Milliseconds of audio per capture chunk
    pub chunk_duration_ms: u64,

    /// Utterances for the scripted recognition engine; when empty, no
    /// engine is configured and sessions record audio only
    #[serde(default)]
    pub script: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
    pub slot: String,
    pub version: String,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
