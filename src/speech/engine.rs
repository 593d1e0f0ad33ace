use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::debug;

/// One recognizer result segment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechSegment {
    pub text: String,
    /// Finalized segments are committed to the transcript; interim ones are
    /// revised or replaced by the next event
    pub is_final: bool,
}

/// Events delivered by a speech recognition engine
#[derive(Debug, Clone)]
pub enum SpeechEvent {
    /// A batch of result segments (finalized and/or interim)
    Results(Vec<SpeechSegment>),
    /// The engine terminated on its own (not user requested)
    Ended,
    /// The engine hit an unrecoverable error
    Error(String),
}

/// Continuous speech recognition engine
///
/// Each `start` call opens a fresh event stream; dropping or replacing the
/// stream is how an engine signals termination.
#[async_trait::async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Start recognizing
    ///
    /// Returns a channel receiver that will receive recognizer events
    async fn start(&self) -> Result<mpsc::Receiver<SpeechEvent>>;

    /// Stop recognizing
    async fn stop(&self) -> Result<()>;

    /// Engine name for logging
    fn name(&self) -> &str;
}

const EVENT_BUFFER: usize = 64;

/// Engine whose events arrive from an external recognizer
///
/// The actual recognition runs in the capture frontend (the browser's
/// continuous, interim-results recognizer); its callbacks are forwarded into
/// this engine through a `SpeechEventSink`. Events pushed while the engine
/// is not started are dropped.
pub struct ChannelSpeechEngine {
    sender: Arc<Mutex<Option<mpsc::Sender<SpeechEvent>>>>,
}

impl ChannelSpeechEngine {
    pub fn new() -> (Self, SpeechEventSink) {
        let sender = Arc::new(Mutex::new(None));
        let engine = Self {
            sender: Arc::clone(&sender),
        };
        (engine, SpeechEventSink { sender })
    }
}

#[async_trait::async_trait]
impl SpeechEngine for ChannelSpeechEngine {
    async fn start(&self) -> Result<mpsc::Receiver<SpeechEvent>> {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);

        // Replacing the sender drops the previous one, closing any stream
        // handed out by an earlier start
        let mut sender = self.sender.lock().await;
        *sender = Some(tx);

        Ok(rx)
    }

    async fn stop(&self) -> Result<()> {
        let mut sender = self.sender.lock().await;
        *sender = None;
        Ok(())
    }

    fn name(&self) -> &str {
        "channel"
    }
}

/// Handle for pushing recognizer events into a `ChannelSpeechEngine`
#[derive(Clone)]
pub struct SpeechEventSink {
    sender: Arc<Mutex<Option<mpsc::Sender<SpeechEvent>>>>,
}

impl SpeechEventSink {
    /// Deliver an event to the engine; returns whether it was accepted
    pub async fn push(&self, event: SpeechEvent) -> bool {
        let sender = self.sender.lock().await;
        match sender.as_ref() {
            Some(tx) => tx.send(event).await.is_ok(),
            None => {
                debug!("Dropping speech event: engine not started");
                false
            }
        }
    }
}
