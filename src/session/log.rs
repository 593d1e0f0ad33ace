use crate::media::MediaRef;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

/// Who contributed a conversation entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Interviewer,
    Candidate,
    System,
}

/// One immutable entry in the conversation log
///
/// An entry carries text, a media reference, or neither (system banners).
/// Entries are fixed at creation; the log never edits or removes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub speaker: Speaker,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_ref: Option<MediaRef>,
    pub timestamp: DateTime<Utc>,
}

impl ConversationEntry {
    pub fn spoken(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: Some(text.into()),
            media_ref: None,
            timestamp: Utc::now(),
        }
    }

    /// Video-only interviewer entry
    pub fn video(media_ref: MediaRef) -> Self {
        Self {
            speaker: Speaker::Interviewer,
            text: None,
            media_ref: Some(media_ref),
            timestamp: Utc::now(),
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::spoken(Speaker::System, text)
    }
}

/// Append-only conversation log
///
/// Insertion order is display order is chronological order. Owned by the
/// session; everyone else gets read-only snapshots.
pub struct ConversationLog {
    entries: RwLock<Vec<ConversationEntry>>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Log seeded with a system welcome banner
    pub fn with_banner(banner: impl Into<String>) -> Self {
        Self {
            entries: RwLock::new(vec![ConversationEntry::system(banner)]),
        }
    }

    pub async fn append(&self, entry: ConversationEntry) {
        info!(
            "Conversation entry appended: {:?} (text: {}, media: {})",
            entry.speaker,
            entry.text.is_some(),
            entry.media_ref.is_some()
        );

        let mut entries = self.entries.write().await;
        entries.push(entry);
    }

    pub async fn snapshot(&self) -> Vec<ConversationEntry> {
        self.entries.read().await.clone()
    }

    /// Most recent interviewer entry carrying a video reference
    ///
    /// Entries are never removed, so the newest one by reverse scan is
    /// always the latest generated video.
    pub async fn latest_video(&self) -> Option<MediaRef> {
        let entries = self.entries.read().await;
        entries
            .iter()
            .rev()
            .find(|e| e.speaker == Speaker::Interviewer && e.media_ref.is_some())
            .and_then(|e| e.media_ref)
    }
}

impl Default for ConversationLog {
    fn default() -> Self {
        Self::new()
    }
}
