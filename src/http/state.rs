use crate::capture::LiveFrameSource;
use crate::gemini::CredentialGate;
use crate::media::MediaStore;
use crate::session::InterviewSession;
use crate::speech::{SpeechCapture, SpeechEventSink};
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The one interview session this process coordinates
    pub session: Arc<InterviewSession>,

    /// Locally stored generated media
    pub media: Arc<MediaStore>,

    /// Generation credential gate
    pub credentials: Arc<CredentialGate>,

    /// Latest-frame mailbox fed by the camera frontend
    pub frames: LiveFrameSource,

    /// Supervised speech capture
    pub speech: Arc<SpeechCapture>,

    /// Sink the recognizer frontend pushes events into
    pub speech_events: SpeechEventSink,
}
