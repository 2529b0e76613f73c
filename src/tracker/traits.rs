use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::source::traits::Frame;

/// Telemetry hook invoked by a tracker around its tick boundaries.
pub type TickFn = Arc<dyn Fn() + Send + Sync>;

/// A tick callback that does nothing. Used when overlays are not requested.
pub fn noop_tick() -> TickFn {
    Arc::new(|| {})
}

/// Identifying data for one trackable target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerDescriptor {
    /// Unique within one engine run (caller contract, not enforced).
    pub name: String,
    /// Opaque locator for the marker's trained feature data, no extension.
    pub marker_source: String,
}

impl MarkerDescriptor {
    pub fn new(name: impl Into<String>, marker_source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            marker_source: marker_source.into(),
        }
    }
}

/// One background tracking context bound to exactly one marker.
///
/// Heavy per-frame tracking work belongs on the tracker's own execution
/// context; `process` must return without blocking the frame loop.
#[async_trait]
pub trait MarkerTracker: Send + Sync {
    /// Establish the background tracking context. Called once per session.
    ///
    /// `on_main_tick` and `on_worker_tick` are invoked by the tracker at
    /// its discretion as telemetry hooks.
    async fn initialize(
        &self,
        camera_para: &str,
        initial_frame: &Frame,
        on_main_tick: TickFn,
        on_worker_tick: TickFn,
    ) -> Result<()>;

    /// Submit one frame for tracking. Non-blocking; the frame buffer is
    /// shared and must not be mutated.
    fn process(&self, frame: &Frame);

    /// Halt the background tracking context.
    async fn stop(&self);
}

/// Creates one tracker per marker descriptor. Creation performs no I/O;
/// the expensive work happens in [`MarkerTracker::initialize`].
pub trait TrackerFactory: Send + Sync {
    fn create(
        &self,
        descriptor: &MarkerDescriptor,
        width: u32,
        height: u32,
        owner_id: &str,
    ) -> Result<Box<dyn MarkerTracker>>;
}
