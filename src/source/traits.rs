use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;

use crate::config::VideoSettings;

/// One captured video frame.
///
/// The pixel buffer is shared read-only across all sessions during a tick;
/// cloning a frame clones the `Bytes` handle, not the pixels.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Monotonic capture sequence number.
    pub seq: u64,
    pub width: u32,
    pub height: u32,
    pub data: Bytes,
}

#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Acquire the capture resource. Fails if the device or stream is
    /// unavailable.
    async fn initialize(&self, settings: &VideoSettings) -> Result<()>;

    /// Return the current frame. Cheap; valid for the duration of the tick.
    fn get_image(&self) -> Frame;

    /// Release the capture resource.
    async fn destroy(&self);
}
