use tokio::process::Command;
use tracing::{debug, warn};

/// Fire-and-forget text-to-speech readback
///
/// Readback is a side effect of a successful candidate turn; its failure
/// never affects conversation state, so `speak` has no result.
pub trait SpeechSynthesizer: Send + Sync {
    fn speak(&self, text: &str);
}

/// Synthesizer that shells out to an external TTS command (e.g. `say` or
/// `espeak`), passing the sentence as the single argument
pub struct ProcessSynthesizer {
    command: String,
}

impl ProcessSynthesizer {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl SpeechSynthesizer for ProcessSynthesizer {
    fn speak(&self, text: &str) {
        let command = self.command.clone();
        let text = text.to_string();

        tokio::spawn(async move {
            match Command::new(&command).arg(&text).status().await {
                Ok(status) if status.success() => {}
                Ok(status) => warn!("TTS command {} exited with {}", command, status),
                Err(e) => warn!("Failed to run TTS command {}: {}", command, e),
            }
        });
    }
}

/// Synthesizer that does nothing (readback disabled)
pub struct NullSynthesizer;

impl SpeechSynthesizer for NullSynthesizer {
    fn speak(&self, text: &str) {
        debug!("Readback disabled, skipping utterance of {} chars", text.len());
    }
}
