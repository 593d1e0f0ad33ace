use super::source::{EncodedFrame, FrameSource};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Samples a fixed-duration, fixed-rate burst of still images from a frame
/// source.
///
/// The sampler makes exactly `round(duration_ms / 1000 * fps)` snapshot
/// attempts at `1000 / fps` ms intervals. A snapshot that fails to encode is
/// dropped silently, so the returned sequence can be shorter than the target
/// count; that is accepted, not corrected. Nothing is retained once the
/// capture resolves.
pub struct FrameSampler {
    source: Arc<dyn FrameSource>,
}

impl FrameSampler {
    pub fn new(source: Arc<dyn FrameSource>) -> Self {
        Self { source }
    }

    /// Capture a burst of frames in capture order
    pub async fn capture(&self, duration_ms: u64, fps: u32) -> Result<Vec<EncodedFrame>> {
        let target = ((duration_ms as f64 / 1000.0) * fps as f64).round() as usize;
        let tick = Duration::from_millis(1000 / fps.max(1) as u64);

        info!(
            "Capturing {} frames over {}ms from {} source",
            target,
            duration_ms,
            self.source.name()
        );

        let mut interval = tokio::time::interval(tick);
        let mut frames = Vec::with_capacity(target);

        for attempt in 0..target {
            interval.tick().await;

            let grabbed = self
                .source
                .grab()
                .await
                .context("Failed to snapshot video frame")?;

            match grabbed {
                Some(frame) => frames.push(frame),
                None => debug!("Frame {} failed to encode, dropping", attempt),
            }
        }

        info!("Captured {}/{} frames", frames.len(), target);

        Ok(frames)
    }
}
