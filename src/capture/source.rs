use anyhow::{bail, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// A single encoded still image snapshotted from the video feed
#[derive(Debug, Clone)]
pub struct EncodedFrame {
    /// Encoded image bytes (JPEG from the capture frontend)
    pub data: Vec<u8>,
    /// MIME type of the encoded bytes
    pub mime_type: String,
}

impl EncodedFrame {
    pub fn jpeg(data: Vec<u8>) -> Self {
        Self {
            data,
            mime_type: "image/jpeg".to_string(),
        }
    }
}

/// Source of still frames from a live video feed
///
/// `Err` means no usable video source is attached and the whole capture
/// should be aborted. `Ok(None)` means this particular snapshot failed to
/// encode; the sampler drops it silently and keeps going.
#[async_trait::async_trait]
pub trait FrameSource: Send + Sync {
    /// Snapshot the current frame
    async fn grab(&self) -> Result<Option<EncodedFrame>>;

    /// Source name for logging
    fn name(&self) -> &str;
}

struct LatestFrame {
    frame: EncodedFrame,
    received_at: Instant,
}

/// Frame source fed by an external capture frontend
///
/// The frontend (a browser shell holding the actual webcam stream) pushes
/// its current still through `attach_frame`; `grab` snapshots whatever is
/// newest. The feed counts as unavailable until the first frame arrives or
/// once the newest frame is older than the staleness window.
#[derive(Clone)]
pub struct LiveFrameSource {
    latest: Arc<RwLock<Option<LatestFrame>>>,
    stale_after: Duration,
}

impl LiveFrameSource {
    pub fn new(stale_after: Duration) -> Self {
        Self {
            latest: Arc::new(RwLock::new(None)),
            stale_after,
        }
    }

    /// Replace the current frame with a newer one from the frontend
    pub async fn attach_frame(&self, frame: EncodedFrame) {
        let mut latest = self.latest.write().await;
        *latest = Some(LatestFrame {
            frame,
            received_at: Instant::now(),
        });
    }

    /// Whether a fresh frame is currently available
    pub async fn is_attached(&self) -> bool {
        let latest = self.latest.read().await;
        match latest.as_ref() {
            Some(l) => l.received_at.elapsed() <= self.stale_after,
            None => false,
        }
    }
}

#[async_trait::async_trait]
impl FrameSource for LiveFrameSource {
    async fn grab(&self) -> Result<Option<EncodedFrame>> {
        let latest = self.latest.read().await;
        match latest.as_ref() {
            Some(l) if l.received_at.elapsed() <= self.stale_after => {
                Ok(Some(l.frame.clone()))
            }
            Some(_) => bail!("video feed is stale; camera frontend stopped sending frames"),
            None => bail!("no video source attached"),
        }
    }

    fn name(&self) -> &str {
        "live"
    }
}
