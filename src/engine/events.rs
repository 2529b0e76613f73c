// Engine event bus — per-instance lifecycle notifications for the host.

use tokio::sync::broadcast;

/// Lifecycle notifications emitted by the engine.
///
/// Events are advisory: emission is fire-and-forget and a host that never
/// subscribes loses nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The initialization sequence has begun.
    InitStarted { session_id: String },
    /// The application configuration has been loaded.
    ConfigReady,
    /// Performance counters were created (overlays requested).
    StatsReady,
    /// The video source is acquired and producing frames.
    VideoReady,
    /// One tracker session is initialized, primed, and looping.
    SessionStarted { name: String },
    /// Full teardown completed. Emitted at most once per engine.
    Disposed,
}

/// Per-engine event target backed by a broadcast channel.
pub struct EventBus {
    tx: broadcast::Sender<EngineEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.tx.subscribe()
    }

    /// Emit an event. Having no subscribers is not an error.
    pub fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_emit_without_subscribers_is_fine() {
        let bus = EventBus::new(4);
        bus.emit(EngineEvent::ConfigReady);

        let mut rx = bus.subscribe();
        bus.emit(EngineEvent::Disposed);
        assert_eq!(rx.recv().await.unwrap(), EngineEvent::Disposed);
    }
}
