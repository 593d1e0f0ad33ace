use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub capture: CaptureConfig,
    pub speech: SpeechConfig,
    pub gemini: GeminiConfig,
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
pub struct CaptureConfig {
    /// Length of the signing window sampled per candidate turn
    pub window_ms: u64,
    /// Snapshot rate within the window
    pub frames_per_second: u32,
    /// A live frame older than this means the camera feed is gone
    pub frame_stale_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpeechConfig {
    /// Locale the external recognizer should be configured with
    pub locale: String,
    /// External text-to-speech command for candidate readback (e.g. "say").
    /// Readback is skipped when unset.
    pub synthesis_command: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    pub api_base: String,
    pub transcription_model: String,
    pub generation_model: String,
    /// Fixed backoff between generation polls. There is deliberately no
    /// overall polling timeout; the wait is bounded only by the remote side.
    pub poll_interval_secs: u64,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
