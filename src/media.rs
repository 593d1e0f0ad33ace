//! Local store for generated media
//!
//! Generated videos are fetched from the remote side exactly once and kept in
//! memory; the presentation layer dereferences them through `/media/{id}`
//! without further network calls or credentials. References stay valid for
//! the lifetime of the process and are never revoked.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Opaque reference to a locally stored media resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaRef(Uuid);

impl MediaRef {
    pub fn id(&self) -> Uuid {
        self.0
    }

    /// Path the presentation layer fetches the bytes from
    pub fn url(&self) -> String {
        format!("/media/{}", self.0)
    }
}

impl std::fmt::Display for MediaRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored media resource
#[derive(Debug)]
pub struct StoredMedia {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// In-memory media store (media id → bytes)
#[derive(Default)]
pub struct MediaStore {
    items: RwLock<HashMap<Uuid, Arc<StoredMedia>>>,
}

impl MediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, bytes: Vec<u8>, mime_type: impl Into<String>) -> MediaRef {
        let id = Uuid::new_v4();
        let media = Arc::new(StoredMedia {
            bytes,
            mime_type: mime_type.into(),
        });

        let mut items = self.items.write().await;
        items.insert(id, media);

        MediaRef(id)
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<StoredMedia>> {
        let items = self.items.read().await;
        items.get(&id).cloned()
    }
}
