//! Interview session coordination
//!
//! This module owns the conversation core:
//! - The append-only `ConversationLog` and its entries
//! - The tri-state busy flag serializing candidate and interviewer turns
//! - `InterviewSession`, which sequences capture, transcription, generation
//!   and readback between the two participants

mod config;
mod error;
mod log;
mod session;

pub use config::SessionConfig;
pub use error::TurnError;
pub use log::{ConversationEntry, ConversationLog, Speaker};
pub use session::{BusyState, InterviewSession};
