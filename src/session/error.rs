use crate::gemini::GeminiError;
use thiserror::Error;

/// Failures surfaced at the boundary of a turn
///
/// Every variant is caught at the turn boundary and converted into a
/// user-visible banner; none is fatal to the session.
#[derive(Debug, Clone, Error)]
pub enum TurnError {
    /// Interviewer message was empty or whitespace-only
    #[error("Message text is empty.")]
    EmptyInput,

    /// No usable generation credential is selected
    #[error("Please select an API key to generate sign language videos.")]
    MissingCredential,

    /// The remote side rejected the selected credential
    #[error("API Key not found or invalid. Please select a valid key.")]
    CredentialInvalid(String),

    /// A remote call failed (transport or model error)
    #[error("{0}")]
    Transport(String),

    /// No usable video source for frame capture
    #[error("Could not capture video frames: {0}")]
    DeviceUnavailable(String),

    /// Another turn is already in flight
    #[error("Another turn is already in progress.")]
    SessionBusy,
}

impl From<GeminiError> for TurnError {
    fn from(e: GeminiError) -> Self {
        match e {
            GeminiError::MissingKey => TurnError::MissingCredential,
            GeminiError::InvalidKey(detail) => TurnError::CredentialInvalid(detail),
            GeminiError::Api(msg) | GeminiError::Transport(msg) => TurnError::Transport(msg),
        }
    }
}
