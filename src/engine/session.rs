// Per-marker tracker session — initialization, priming, and the cancellable frame loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::source::traits::VideoSource;
use crate::tracker::traits::{MarkerDescriptor, MarkerTracker, TickFn};

/// One running tracking context bound to exactly one marker descriptor.
///
/// Owns the tracker, the frame-loop task, and that task's cancellation
/// token. Lifecycle: initialize, prime with one `process` call, loop until
/// stopped.
pub struct TrackerSession {
    descriptor: MarkerDescriptor,
    tracker: Arc<dyn MarkerTracker>,
    cancel: CancellationToken,
    stopped: AtomicBool,
}

impl TrackerSession {
    /// Initialize the tracker against the current video frame, issue the
    /// priming `process` call, and spawn the continuous frame loop.
    #[allow(clippy::too_many_arguments)]
    pub async fn start(
        tracker: Box<dyn MarkerTracker>,
        descriptor: MarkerDescriptor,
        camera_para: &str,
        video: Arc<dyn VideoSource>,
        period_rx: watch::Receiver<Duration>,
        parent: &CancellationToken,
        on_main_tick: TickFn,
        on_worker_tick: TickFn,
    ) -> Result<Self> {
        let tracker: Arc<dyn MarkerTracker> = Arc::from(tracker);

        let initial = video.get_image();
        tracker
            .initialize(camera_para, &initial, on_main_tick, on_worker_tick)
            .await?;

        // Priming call before the continuous loop takes over.
        tracker.process(&initial);

        let cancel = parent.child_token();
        tokio::spawn(Self::frame_loop(
            descriptor.name.clone(),
            Arc::clone(&tracker),
            video,
            period_rx,
            cancel.clone(),
        ));

        Ok(Self {
            descriptor,
            tracker,
            cancel,
            stopped: AtomicBool::new(false),
        })
    }

    /// The continuous per-session loop: one non-blocking `process` call per
    /// tick at the current frame period, until cancelled. Ticks for one
    /// session are strictly sequential; sessions never share a loop.
    async fn frame_loop(
        name: String,
        tracker: Arc<dyn MarkerTracker>,
        video: Arc<dyn VideoSource>,
        mut period_rx: watch::Receiver<Duration>,
        cancel: CancellationToken,
    ) {
        let mut period = *period_rx.borrow();
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        debug!(
            "session '{}' frame loop started (period {}ms)",
            name,
            period.as_millis()
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("session '{}' frame loop cancelled", name);
                    return;
                }
                changed = period_rx.changed() => {
                    match changed {
                        Ok(()) => {
                            period = *period_rx.borrow();
                            ticker = tokio::time::interval(period);
                            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
                            debug!(
                                "session '{}' period updated to {}ms",
                                name,
                                period.as_millis()
                            );
                        }
                        // Sender gone: the engine was dropped.
                        Err(_) => return,
                    }
                }
                _ = ticker.tick() => {
                    let frame = video.get_image();
                    tracker.process(&frame);
                }
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn descriptor(&self) -> &MarkerDescriptor {
        &self.descriptor
    }

    /// Cancel the frame loop and stop the underlying tracker. Idempotent;
    /// the tracker's `stop` is issued exactly once.
    pub async fn stop(&self) {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return;
        }
        self.cancel.cancel();
        self.tracker.stop().await;
        debug!("session '{}' stopped", self.descriptor.name);
    }
}
