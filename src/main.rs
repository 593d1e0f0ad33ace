use anyhow::{Context, Result};
use clap::Parser;
use sign_bridge::{
    create_router, AppState, ChannelSpeechEngine, Config, CredentialGate, FrameSampler,
    GeminiGenerator, GeminiTranscriber, InterviewSession, LiveFrameSource, MediaStore,
    NullSynthesizer, ProcessSynthesizer, SessionConfig, SpeechCapture, SpeechSynthesizer,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "sign-bridge",
    about = "Interview bridge between a signing candidate and a text-speaking interviewer"
)]
struct Args {
    /// Configuration file, without extension
    #[arg(long, default_value = "config/sign-bridge")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)
        .with_context(|| format!("Failed to load config {}", args.config))?;

    info!("{} starting", cfg.service.name);

    let media = Arc::new(MediaStore::new());
    let credentials = Arc::new(CredentialGate::from_env());
    if credentials.is_ready().await {
        info!("Generation credential loaded from environment");
    } else {
        info!("No generation credential yet; select one via POST /credentials/select");
    }

    let http_client = reqwest::Client::new();
    let transcriber = Arc::new(GeminiTranscriber::new(
        http_client.clone(),
        cfg.gemini.clone(),
        Arc::clone(&credentials),
    ));
    let generator = Arc::new(GeminiGenerator::new(
        http_client,
        cfg.gemini.clone(),
        Arc::clone(&credentials),
        Arc::clone(&media),
    ));

    let frames = LiveFrameSource::new(Duration::from_millis(cfg.capture.frame_stale_ms));
    let sampler = FrameSampler::new(Arc::new(frames.clone()));

    let synthesizer: Arc<dyn SpeechSynthesizer> = match &cfg.speech.synthesis_command {
        Some(command) => Arc::new(ProcessSynthesizer::new(command)),
        None => Arc::new(NullSynthesizer),
    };

    let session_config = SessionConfig {
        capture_window_ms: cfg.capture.window_ms,
        frames_per_second: cfg.capture.frames_per_second,
        ..SessionConfig::default()
    };
    let session = Arc::new(InterviewSession::new(
        session_config,
        sampler,
        transcriber,
        generator,
        synthesizer,
        Arc::clone(&credentials),
    ));

    let (engine, speech_events) = ChannelSpeechEngine::new();
    let speech = Arc::new(SpeechCapture::new(
        Arc::new(engine),
        cfg.speech.locale.clone(),
    ));

    let state = AppState {
        session,
        media,
        credentials,
        frames,
        speech,
        speech_events,
    };
    let router = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .context("HTTP server failed")?;

    Ok(())
}
