// Synthetic video source — deterministic generated frames for demos and tests.

use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;
use tracing::debug;

use super::traits::{Frame, VideoSource};
use crate::config::VideoSettings;

struct SyntheticState {
    width: u32,
    height: u32,
    data: Bytes,
}

/// A video source that serves one generated grayscale frame buffer.
///
/// Every `get_image` call returns the same pixel data under a fresh
/// sequence number. Before `initialize` (or after `destroy`) it serves an
/// empty 0x0 frame rather than failing, since `get_image` is infallible.
#[derive(Default)]
pub struct SyntheticVideoSource {
    seq: AtomicU64,
    state: RwLock<Option<SyntheticState>>,
}

impl SyntheticVideoSource {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VideoSource for SyntheticVideoSource {
    async fn initialize(&self, settings: &VideoSettings) -> Result<()> {
        let len = settings.width as usize * settings.height as usize;
        let buf: Vec<u8> = (0..len).map(|i| (i % 256) as u8).collect();

        *self.state.write() = Some(SyntheticState {
            width: settings.width,
            height: settings.height,
            data: Bytes::from(buf),
        });

        debug!(
            "synthetic video source initialized {}x{}",
            settings.width, settings.height
        );
        Ok(())
    }

    fn get_image(&self) -> Frame {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        match self.state.read().as_ref() {
            Some(state) => Frame {
                seq,
                width: state.width,
                height: state.height,
                data: state.data.clone(),
            },
            None => Frame {
                seq,
                width: 0,
                height: 0,
                data: Bytes::new(),
            },
        }
    }

    async fn destroy(&self) {
        *self.state.write() = None;
        debug!("synthetic video source destroyed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_frames_after_initialize() {
        let source = SyntheticVideoSource::new();
        let settings = VideoSettings {
            width: 8,
            height: 4,
            facing_mode: None,
        };
        source.initialize(&settings).await.unwrap();

        let a = source.get_image();
        let b = source.get_image();
        assert_eq!(a.width, 8);
        assert_eq!(a.height, 4);
        assert_eq!(a.data.len(), 32);
        assert_eq!(a.data, b.data);
        assert!(b.seq > a.seq);

        source.destroy().await;
        let after = source.get_image();
        assert_eq!(after.width, 0);
        assert!(after.data.is_empty());
    }

    #[test]
    fn test_empty_frame_before_initialize() {
        let source = SyntheticVideoSource::new();
        let frame = source.get_image();
        assert_eq!(frame.width, 0);
        assert_eq!(frame.height, 0);
        assert!(frame.data.is_empty());
    }
}
