//! Webcam frame capture
//!
//! This module provides the `FrameSource` abstraction over a live camera
//! feed and the `FrameSampler` that turns it into a fixed-duration,
//! fixed-rate sequence of encoded still images for sign transcription.

mod sampler;
mod source;

pub use sampler::FrameSampler;
pub use source::{EncodedFrame, FrameSource, LiveFrameSource};
