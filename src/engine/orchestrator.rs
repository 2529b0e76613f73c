// Session engine — owns the video source and tracker sessions, drives
// initialization, frame scheduling, and teardown.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::events::{EngineEvent, EventBus};
use super::session::TrackerSession;
use super::stats::{PerfMonitor, PerfSnapshot};
use crate::config::{default_frame_period, AppConfig, EVENT_CHANNEL_CAPACITY};
use crate::error::EngineError;
use crate::loader::traits::ConfigLoader;
use crate::source::traits::VideoSource;
use crate::tracker::traits::{noop_tick, MarkerDescriptor, TrackerFactory};

/// External collaborators the engine coordinates. All are shared handles;
/// the engine never outlives its interest in them.
#[derive(Clone)]
pub struct Collaborators {
    pub loader: Arc<dyn ConfigLoader>,
    pub video: Arc<dyn VideoSource>,
    pub trackers: Arc<dyn TrackerFactory>,
}

/// The session orchestrator: one engine per AR scene.
///
/// Construction is cheap (identity allocation and a default frame rate,
/// no I/O). The asynchronous initialization sequence runs once, either
/// through [`SessionEngine::initialize`] on a constructed engine or through
/// the [`SessionEngine::init`] / [`SessionEngine::init_with_entities`]
/// entry points which construct and initialize in one call.
pub struct SessionEngine {
    session_id: String,
    width: u32,
    height: u32,
    config_locator: String,
    config: Option<AppConfig>,
    entities: Vec<MarkerDescriptor>,
    sessions: Vec<TrackerSession>,
    video: Option<Arc<dyn VideoSource>>,
    perf: Option<Arc<PerfMonitor>>,
    events: EventBus,
    period_tx: watch::Sender<Duration>,
    shutdown: CancellationToken,
    initialized: AtomicBool,
    video_destroyed: AtomicBool,
    disposed: AtomicBool,
}

impl SessionEngine {
    /// Create an engine bound to target frame dimensions and a
    /// configuration locator. Performs no I/O.
    pub fn new(width: u32, height: u32, config_locator: impl Into<String>) -> Self {
        let (period_tx, _) = watch::channel(default_frame_period());
        Self {
            session_id: Uuid::new_v4().to_string(),
            width,
            height,
            config_locator: config_locator.into(),
            config: None,
            entities: Vec::new(),
            sessions: Vec::new(),
            video: None,
            perf: None,
            events: EventBus::new(EVENT_CHANNEL_CAPACITY),
            period_tx,
            shutdown: CancellationToken::new(),
            initialized: AtomicBool::new(false),
            video_destroyed: AtomicBool::new(false),
            disposed: AtomicBool::new(false),
        }
    }

    /// Construct and initialize an engine from parallel marker-locator and
    /// name lists. The lists must be index-aligned and of equal length.
    pub async fn init(
        width: u32,
        height: u32,
        marker_locators: Vec<String>,
        names: Vec<String>,
        config_locator: impl Into<String>,
        show_stats: bool,
        collab: &Collaborators,
    ) -> Result<Self, EngineError> {
        if marker_locators.len() != names.len() {
            return Err(EngineError::DescriptorMismatch {
                locators: marker_locators.len(),
                names: names.len(),
            });
        }

        let entities = names
            .into_iter()
            .zip(marker_locators)
            .map(|(name, marker_source)| MarkerDescriptor { name, marker_source })
            .collect();

        Self::init_with_entities(width, height, entities, config_locator, show_stats, collab)
            .await
    }

    /// Construct and initialize an engine from combined marker descriptors.
    pub async fn init_with_entities(
        width: u32,
        height: u32,
        entities: Vec<MarkerDescriptor>,
        config_locator: impl Into<String>,
        show_stats: bool,
        collab: &Collaborators,
    ) -> Result<Self, EngineError> {
        let mut engine = Self::new(width, height, config_locator);
        engine.initialize(entities, show_stats, collab).await?;
        Ok(engine)
    }

    /// Run the initialization sequence: load configuration, acquire the
    /// video source, then create and start one tracker session per marker
    /// descriptor in input order.
    ///
    /// Runs at most once per engine. On failure everything started so far
    /// is torn down before the error is returned, and the engine is left
    /// disposed.
    pub async fn initialize(
        &mut self,
        entities: Vec<MarkerDescriptor>,
        show_stats: bool,
        collab: &Collaborators,
    ) -> Result<(), EngineError> {
        if self.initialized.swap(true, Ordering::SeqCst) {
            return Err(EngineError::AlreadyInitialized);
        }

        match self.run_init(entities, show_stats, collab).await {
            Ok(()) => Ok(()),
            Err(e) => {
                error!("engine {} initialization failed: {:#}", self.session_id, e);
                self.dispose().await;
                Err(e)
            }
        }
    }

    async fn run_init(
        &mut self,
        entities: Vec<MarkerDescriptor>,
        show_stats: bool,
        collab: &Collaborators,
    ) -> Result<(), EngineError> {
        info!(
            "engine {} initializing: {}x{}, {} markers, config '{}'",
            self.session_id,
            self.width,
            self.height,
            entities.len(),
            self.config_locator
        );
        self.events.emit(EngineEvent::InitStarted {
            session_id: self.session_id.clone(),
        });

        let config = collab
            .loader
            .load(&self.config_locator)
            .await
            .map_err(EngineError::Config)?;
        self.events.emit(EngineEvent::ConfigReady);

        if show_stats || config.stats.create_html {
            self.perf = Some(Arc::new(PerfMonitor::new()));
            self.events.emit(EngineEvent::StatsReady);
        }

        collab
            .video
            .initialize(&config.video_settings)
            .await
            .map_err(EngineError::Camera)?;
        self.video = Some(Arc::clone(&collab.video));
        self.events.emit(EngineEvent::VideoReady);

        let (on_main_tick, on_worker_tick) = match &self.perf {
            Some(perf) => (perf.main_tick_fn(), perf.worker_tick_fn()),
            None => (noop_tick(), noop_tick()),
        };

        for descriptor in &entities {
            let tracker = collab
                .trackers
                .create(descriptor, self.width, self.height, &self.session_id)
                .map_err(|e| EngineError::Tracker {
                    name: descriptor.name.clone(),
                    reason: e,
                })?;

            let session = TrackerSession::start(
                tracker,
                descriptor.clone(),
                &config.camera_para,
                Arc::clone(&collab.video),
                self.period_tx.subscribe(),
                &self.shutdown,
                on_main_tick.clone(),
                on_worker_tick.clone(),
            )
            .await
            .map_err(|e| EngineError::Tracker {
                name: descriptor.name.clone(),
                reason: e,
            })?;

            debug!(
                "engine {} session '{}' started (marker '{}')",
                self.session_id, descriptor.name, descriptor.marker_source
            );
            self.events.emit(EngineEvent::SessionStarted {
                name: descriptor.name.clone(),
            });
            self.sessions.push(session);
        }

        self.entities = entities;
        self.config = Some(config);
        info!(
            "engine {} running with {} sessions",
            self.session_id,
            self.sessions.len()
        );
        Ok(())
    }

    /// Set the frame-loop cadence in frames per second. Live session loops
    /// pick the new period up on their next tick. Non-positive or
    /// non-finite values are ignored.
    pub fn set_fps(&self, fps: f64) {
        if !fps.is_finite() || fps <= 0.0 {
            warn!("ignoring invalid fps value: {}", fps);
            return;
        }
        let period = Duration::from_secs_f64(1.0 / fps);
        // send_replace updates the value even when no loop is subscribed yet.
        let _ = self.period_tx.send_replace(period);
        debug!("frame period set to {}ms", period.as_millis());
    }

    /// The current frame period (1000/fps milliseconds).
    pub fn period(&self) -> Duration {
        *self.period_tx.borrow()
    }

    /// Subscribe to lifecycle events. Each receiver sees events emitted
    /// after it subscribed.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }

    /// The marker descriptors this engine was initialized with, in input
    /// order. Empty before initialization.
    pub fn entities(&self) -> &[MarkerDescriptor] {
        &self.entities
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn sessions(&self) -> &[TrackerSession] {
        &self.sessions
    }

    /// Process-unique engine identity, bound at construction.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    /// The loaded configuration, available once initialization succeeded.
    pub fn config(&self) -> Option<&AppConfig> {
        self.config.as_ref()
    }

    /// Current performance counters, when overlays were requested.
    pub fn stats(&self) -> Option<PerfSnapshot> {
        self.perf.as_ref().map(|perf| perf.snapshot())
    }

    /// Tear down all tracker sessions and the video source. Idempotent:
    /// repeated calls are no-ops, each tracker is stopped exactly once and
    /// the video source destroyed exactly once. Safe before initialization.
    pub async fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.shutdown.cancel();
        for session in &self.sessions {
            session.stop().await;
        }
        self.destroy_video().await;
        self.events.emit(EngineEvent::Disposed);
        info!("engine {} disposed", self.session_id);
    }

    /// Stop every tracker session owned by this engine, leaving the video
    /// source untouched.
    pub async fn dispose_trackers(&self) {
        for session in &self.sessions {
            session.stop().await;
        }
    }

    /// Destroy only the video source. Idempotent.
    pub async fn dispose_video(&self) {
        self.destroy_video().await;
    }

    async fn destroy_video(&self) {
        if self.video_destroyed.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(video) = &self.video {
            video.destroy().await;
            debug!("engine {} video source destroyed", self.session_id);
        }
    }
}

impl std::fmt::Debug for SessionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionEngine")
            .field("session_id", &self.session_id)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("config_locator", &self.config_locator)
            .field("entities", &self.entities)
            .field("session_count", &self.sessions.len())
            .finish_non_exhaustive()
    }
}

impl Drop for SessionEngine {
    fn drop(&mut self) {
        // Frame loops hold child tokens; cancelling here guarantees they
        // exit even when the host never called dispose().
        self.shutdown.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_cheap_and_identified() {
        let a = SessionEngine::new(640, 480, "config.json");
        let b = SessionEngine::new(640, 480, "config.json");
        assert_ne!(a.session_id(), b.session_id());
        assert_eq!(a.version(), env!("CARGO_PKG_VERSION"));
        assert!(a.entities().is_empty());
        assert_eq!(a.session_count(), 0);
    }

    #[test]
    fn test_set_fps_period() {
        let engine = SessionEngine::new(640, 480, "config.json");
        engine.set_fps(50.0);
        assert_eq!(engine.period(), Duration::from_millis(20));

        // Invalid values leave the period unchanged and do not panic.
        engine.set_fps(0.0);
        engine.set_fps(-30.0);
        engine.set_fps(f64::NAN);
        engine.set_fps(f64::INFINITY);
        assert_eq!(engine.period(), Duration::from_millis(20));
    }
}
