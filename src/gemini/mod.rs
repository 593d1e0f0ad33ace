//! Clients for the two remote Gemini capabilities
//!
//! - `transcribe`: frame sequence → one English sentence
//! - `generate`: sentence → sign-language video, long-running and polled
//!
//! Both capabilities are gated by the `CredentialGate`. Only generation
//! failures are classified: a rejected key demotes the gate so the next
//! interviewer turn fails fast.

mod credentials;
mod error;
mod generate;
mod transcribe;
pub mod types;

pub use credentials::CredentialGate;
pub use error::GeminiError;
pub use generate::{GeminiGenerator, VideoGenerator};
pub use transcribe::{GeminiTranscriber, SignTranscriber};
