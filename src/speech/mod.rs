//! Speech capture and readback
//!
//! This module provides:
//! - The `SpeechEngine` abstraction over an external continuous speech
//!   recognizer, plus the channel-fed engine used by the HTTP frontend
//! - `SpeechCapture`, the supervisor that keeps a live transcript and
//!   transparently restarts the engine when it ends on its own
//! - The `SpeechSynthesizer` used for best-effort readback of transcribed
//!   candidate sentences

mod capture;
mod engine;
mod synth;

pub use capture::SpeechCapture;
pub use engine::{ChannelSpeechEngine, SpeechEngine, SpeechEvent, SpeechEventSink, SpeechSegment};
pub use synth::{NullSynthesizer, ProcessSynthesizer, SpeechSynthesizer};
