use super::config::SessionConfig;
use super::error::TurnError;
use super::log::{ConversationEntry, ConversationLog, Speaker};
use crate::capture::FrameSampler;
use crate::gemini::{CredentialGate, GeminiError, SignTranscriber, VideoGenerator};
use crate::media::MediaRef;
use crate::speech::SpeechSynthesizer;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tracing::{error, info};

/// Tri-state exclusive turn flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BusyState {
    #[serde(rename = "idle")]
    Idle,
    #[serde(rename = "candidate-turn-active")]
    CandidateTurn,
    #[serde(rename = "interviewer-turn-active")]
    InterviewerTurn,
}

const IDLE: u8 = 0;
const CANDIDATE_TURN: u8 = 1;
const INTERVIEWER_TURN: u8 = 2;

/// The session's only mutual-exclusion primitive
///
/// The check-then-set is a single compare-and-swap, so it can never be split
/// across a suspension point; the drop guard makes the release unconditional
/// whether the turn succeeds, fails, or panics.
struct BusyFlag(AtomicU8);

impl BusyFlag {
    fn new() -> Self {
        Self(AtomicU8::new(IDLE))
    }

    fn state(&self) -> BusyState {
        match self.0.load(Ordering::SeqCst) {
            CANDIDATE_TURN => BusyState::CandidateTurn,
            INTERVIEWER_TURN => BusyState::InterviewerTurn,
            _ => BusyState::Idle,
        }
    }

    fn begin(&self, turn: BusyState) -> Result<TurnGuard<'_>, TurnError> {
        let encoded = match turn {
            BusyState::CandidateTurn => CANDIDATE_TURN,
            BusyState::InterviewerTurn => INTERVIEWER_TURN,
            BusyState::Idle => return Err(TurnError::SessionBusy),
        };

        self.0
            .compare_exchange(IDLE, encoded, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| TurnError::SessionBusy)?;

        Ok(TurnGuard { flag: &self.0 })
    }
}

struct TurnGuard<'a> {
    flag: &'a AtomicU8,
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(IDLE, Ordering::SeqCst);
    }
}

/// Coordinating core of the interview
///
/// Owns the conversation log, the busy flag and the credential gate, and
/// sequences the two turn types between the signing candidate and the
/// text-speaking interviewer. All collaborators sit behind trait seams.
pub struct InterviewSession {
    config: SessionConfig,
    log: ConversationLog,
    busy: BusyFlag,
    sampler: FrameSampler,
    transcriber: Arc<dyn SignTranscriber>,
    generator: Arc<dyn VideoGenerator>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    credentials: Arc<CredentialGate>,
}

impl InterviewSession {
    pub fn new(
        config: SessionConfig,
        sampler: FrameSampler,
        transcriber: Arc<dyn SignTranscriber>,
        generator: Arc<dyn VideoGenerator>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        credentials: Arc<CredentialGate>,
    ) -> Self {
        let log = ConversationLog::with_banner(&config.welcome_banner);
        Self {
            config,
            log,
            busy: BusyFlag::new(),
            sampler,
            transcriber,
            generator,
            synthesizer,
            credentials,
        }
    }

    pub fn busy_state(&self) -> BusyState {
        self.busy.state()
    }

    pub async fn log_snapshot(&self) -> Vec<ConversationEntry> {
        self.log.snapshot().await
    }

    pub async fn latest_video(&self) -> Option<MediaRef> {
        self.log.latest_video().await
    }

    /// Candidate turn: sign → text
    ///
    /// Samples the configured signing window, transcribes it, appends the
    /// sentence as a candidate entry and triggers best-effort readback. Any
    /// failure is converted into one system entry; the busy flag is released
    /// either way.
    pub async fn candidate_turn(&self) -> Result<String, TurnError> {
        let _guard = self.busy.begin(BusyState::CandidateTurn)?;

        info!("Candidate turn started");

        match self.interpret_signing().await {
            Ok(text) => {
                self.log
                    .append(ConversationEntry::spoken(Speaker::Candidate, &text))
                    .await;

                // Readback is a side effect; its failure never touches
                // conversation state
                if !text.is_empty() {
                    self.synthesizer.speak(&text);
                }

                info!("Candidate turn completed: {} chars", text.len());
                Ok(text)
            }
            Err(e) => {
                error!("Candidate turn failed: {}", e);
                self.log
                    .append(ConversationEntry::system(format!(
                        "Error: Could not transcribe sign. {}",
                        e
                    )))
                    .await;
                Err(e)
            }
        }
    }

    async fn interpret_signing(&self) -> Result<String, TurnError> {
        let frames = self
            .sampler
            .capture(self.config.capture_window_ms, self.config.frames_per_second)
            .await
            .map_err(|e| TurnError::DeviceUnavailable(e.to_string()))?;

        let text = self.transcriber.transcribe(&frames).await?;
        Ok(text)
    }

    /// Interviewer turn: text → video
    ///
    /// Empty input and a missing credential are rejected before anything is
    /// mutated. The raw text is appended immediately; a successful
    /// generation appends a second, video-only entry. A credential-invalid
    /// failure additionally demotes the gate.
    pub async fn interviewer_turn(&self, text: &str) -> Result<MediaRef, TurnError> {
        if text.trim().is_empty() {
            return Err(TurnError::EmptyInput);
        }

        // Fresh readiness check; it may have changed since the last render
        if !self.credentials.is_ready().await {
            return Err(TurnError::MissingCredential);
        }

        let _guard = self.busy.begin(BusyState::InterviewerTurn)?;

        info!("Interviewer turn started");

        // The text entry is visible immediately, before the video exists
        self.log
            .append(ConversationEntry::spoken(Speaker::Interviewer, text))
            .await;

        match self.generator.generate(text).await {
            Ok(media_ref) => {
                self.log.append(ConversationEntry::video(media_ref)).await;
                info!("Interviewer turn completed: video {}", media_ref);
                Ok(media_ref)
            }
            Err(GeminiError::InvalidKey(detail)) => {
                error!("Video generation rejected the API key: {}", detail);
                self.credentials.demote();
                self.log
                    .append(ConversationEntry::system(
                        "Error: API Key is invalid. Please re-select your key.",
                    ))
                    .await;
                Err(TurnError::CredentialInvalid(detail))
            }
            Err(e) => {
                error!("Interviewer turn failed: {}", e);
                self.log
                    .append(ConversationEntry::system(format!(
                        "Error: Could not generate video. {}",
                        e
                    )))
                    .await;
                Err(e.into())
            }
        }
    }
}
