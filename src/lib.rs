pub mod capture;
pub mod config;
pub mod gemini;
pub mod http;
pub mod media;
pub mod session;
pub mod speech;

pub use capture::{EncodedFrame, FrameSampler, FrameSource, LiveFrameSource};
pub use config::Config;
pub use gemini::{
    CredentialGate, GeminiError, GeminiGenerator, GeminiTranscriber, SignTranscriber,
    VideoGenerator,
};
pub use http::{create_router, AppState};
pub use media::{MediaRef, MediaStore};
pub use session::{
    BusyState, ConversationEntry, ConversationLog, InterviewSession, SessionConfig, Speaker,
    TurnError,
};
pub use speech::{
    ChannelSpeechEngine, NullSynthesizer, ProcessSynthesizer, SpeechCapture, SpeechEngine,
    SpeechEvent, SpeechEventSink, SpeechSegment, SpeechSynthesizer,
};
