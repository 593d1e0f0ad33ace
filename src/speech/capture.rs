use super::engine::{SpeechEngine, SpeechEvent};
use anyhow::{Context, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Supervised continuous speech capture
///
/// Wraps a `SpeechEngine` with an explicit listening/idle state machine.
/// While listening is intended, an engine that terminates on its own is
/// restarted transparently, so callers never observe a gap. An engine error
/// transitions to idle and stops restart attempts.
///
/// Every result event recomputes the full best-effort transcript so far:
/// previously finalized text, plus the newest finalized and interim
/// segments. Interim text is revised on the next event and only committed
/// once finalized.
pub struct SpeechCapture {
    engine: Arc<dyn SpeechEngine>,
    listening: Arc<AtomicBool>,
    transcript_tx: watch::Sender<String>,
    task: Mutex<Option<JoinHandle<()>>>,
    locale: String,
}

impl SpeechCapture {
    pub fn new(engine: Arc<dyn SpeechEngine>, locale: impl Into<String>) -> Self {
        let (transcript_tx, _) = watch::channel(String::new());
        Self {
            engine,
            listening: Arc::new(AtomicBool::new(false)),
            transcript_tx,
            task: Mutex::new(None),
            locale: locale.into(),
        }
    }

    /// Locale the external recognizer should use
    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }

    /// Current best-effort transcript
    pub fn transcript(&self) -> String {
        self.transcript_tx.borrow().clone()
    }

    /// Start listening; no-op when already listening
    pub async fn start(&self) -> Result<()> {
        if self.listening.swap(true, Ordering::SeqCst) {
            warn!("Speech capture already listening");
            return Ok(());
        }

        // Fresh capture starts from an empty transcript
        self.transcript_tx.send_replace(String::new());

        let rx = match self.engine.start().await {
            Ok(rx) => rx,
            Err(e) => {
                self.listening.store(false, Ordering::SeqCst);
                return Err(e).context("Failed to start speech engine");
            }
        };

        info!("Speech capture started ({} engine)", self.engine.name());

        let engine = Arc::clone(&self.engine);
        let listening = Arc::clone(&self.listening);
        let transcript_tx = self.transcript_tx.clone();

        let task = tokio::spawn(async move {
            let mut rx = rx;
            let mut finalized = String::new();

            loop {
                match rx.recv().await {
                    Some(SpeechEvent::Results(segments)) => {
                        let mut finals = String::new();
                        let mut interims = String::new();
                        for segment in &segments {
                            if segment.is_final {
                                finals.push_str(&segment.text);
                            } else {
                                interims.push_str(&segment.text);
                            }
                        }

                        // Committed text only ever grows; the published
                        // transcript is exactly the committed text plus the
                        // current interim revision
                        if !finals.is_empty() {
                            if !finalized.is_empty() {
                                finalized.push(' ');
                            }
                            finalized.push_str(&finals);
                        }

                        let full = format!("{} {}", finalized, interims).trim().to_string();

                        transcript_tx.send_replace(full);
                    }
                    Some(SpeechEvent::Ended) | None => {
                        if !listening.load(Ordering::SeqCst) {
                            break;
                        }
                        // Engine stopped on its own while we still want to
                        // listen: restart it without surfacing a gap
                        match engine.start().await {
                            Ok(new_rx) => {
                                info!("Speech engine ended unexpectedly, restarted");
                                rx = new_rx;
                            }
                            Err(e) => {
                                warn!("Failed to restart speech engine: {}", e);
                                listening.store(false, Ordering::SeqCst);
                                break;
                            }
                        }
                    }
                    Some(SpeechEvent::Error(e)) => {
                        warn!("Speech recognition error: {}", e);
                        listening.store(false, Ordering::SeqCst);
                        if let Err(stop_err) = engine.stop().await {
                            warn!("Failed to stop speech engine: {}", stop_err);
                        }
                        break;
                    }
                }
            }

            info!("Speech capture task stopped");
        });

        {
            let mut handle = self.task.lock().await;
            *handle = Some(task);
        }

        Ok(())
    }

    /// Stop listening and shut the engine down; idempotent
    pub async fn stop(&self) -> Result<()> {
        self.listening.store(false, Ordering::SeqCst);

        self.engine
            .stop()
            .await
            .context("Failed to stop speech engine")?;

        if let Some(task) = self.task.lock().await.take() {
            if let Err(e) = task.await {
                warn!("Speech capture task panicked: {}", e);
            }
        }

        Ok(())
    }
}
