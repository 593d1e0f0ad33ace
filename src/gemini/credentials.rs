use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Session-scoped gate over the generation credential
///
/// Readiness is checked fresh before every interviewer turn. Selection is
/// optimistic: a newly selected key is assumed usable without
/// re-verification (the remote side is the only authority, and it will say
/// so on the next call). The generation client demotes readiness when the
/// remote side rejects the key.
pub struct CredentialGate {
    key: RwLock<Option<String>>,
    ready: AtomicBool,
}

impl CredentialGate {
    pub fn new(initial: Option<String>) -> Self {
        let ready = initial.is_some();
        Self {
            key: RwLock::new(initial),
            ready: AtomicBool::new(ready),
        }
    }

    /// Seed the gate from `GEMINI_API_KEY`
    pub fn from_env() -> Self {
        let key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty());
        Self::new(key)
    }

    /// Fresh readiness check
    pub async fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst) && self.key.read().await.is_some()
    }

    /// Current key, if one has been selected
    pub async fn key(&self) -> Option<String> {
        self.key.read().await.clone()
    }

    /// User selected a key; assumed usable until proven otherwise
    pub async fn select(&self, key: String) {
        info!("Generation credential selected");
        let mut stored = self.key.write().await;
        *stored = Some(key);
        self.ready.store(true, Ordering::SeqCst);
    }

    /// The remote side rejected the key; require a re-selection
    pub fn demote(&self) {
        warn!("Generation credential demoted; re-selection required");
        self.ready.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn gate_starts_ready_only_with_a_key() {
        assert!(!CredentialGate::new(None).is_ready().await);
        assert!(CredentialGate::new(Some("k".into())).is_ready().await);
    }

    #[tokio::test]
    async fn selection_is_optimistic_and_demotion_sticks() {
        let gate = CredentialGate::new(None);
        gate.select("k".into()).await;
        assert!(gate.is_ready().await);

        gate.demote();
        assert!(!gate.is_ready().await);
        // The key itself is retained; only readiness dropped
        assert_eq!(gate.key().await.as_deref(), Some("k"));

        gate.select("k2".into()).await;
        assert!(gate.is_ready().await);
    }
}
