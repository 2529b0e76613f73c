// Multi-marker AR session engine — tracker lifecycle, frame scheduling, and teardown.

pub mod config;
pub mod engine;
pub mod error;
pub mod loader;
pub mod source;
pub mod tracker;

pub use engine::orchestrator::{Collaborators, SessionEngine};
pub use error::EngineError;

use std::sync::Once;

use tracing::info;
use tracing_subscriber::EnvFilter;

static INIT_TRACING: Once = Once::new();

/// Install the global tracing subscriber. Safe to call more than once;
/// only the first call has any effect.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,hyper=warn,reqwest=warn"));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init();

        info!("marker session engine tracing initialized");
    });
}
