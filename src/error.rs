use thiserror::Error;

/// Typed initialization and lifecycle failures surfaced to the host.
///
/// Each variant names the stage that failed so callers can distinguish a
/// bad configuration from a missing camera from a broken tracker.
#[derive(Debug, Error)]
pub enum EngineError {
    /// `init` was given parallel marker/name lists of different lengths.
    #[error("marker locator list ({locators}) and name list ({names}) differ in length")]
    DescriptorMismatch { locators: usize, names: usize },

    /// The initialization sequence was already run on this engine.
    #[error("engine already initialized")]
    AlreadyInitialized,

    /// Configuration could not be loaded or parsed.
    #[error("configuration load failed: {0:#}")]
    Config(anyhow::Error),

    /// Video source acquisition failed. No sessions were created.
    #[error("video source initialization failed: {0:#}")]
    Camera(anyhow::Error),

    /// A tracker session failed to initialize. Already-started sessions
    /// and the video source were torn down before this was returned.
    #[error("tracker session '{name}' failed to initialize: {reason:#}")]
    Tracker { name: String, reason: anyhow::Error },
}
