use std::time::Duration;

use serde::Deserialize;

/// Default cadence for session frame loops, in frames per second.
pub const DEFAULT_FPS: f64 = 60.0;

/// Capacity of the engine event broadcast channel.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Frame period corresponding to [`DEFAULT_FPS`].
pub fn default_frame_period() -> Duration {
    Duration::from_secs_f64(1.0 / DEFAULT_FPS)
}

/// Resolved application configuration consumed by the engine.
///
/// Produced by a [`crate::loader::traits::ConfigLoader`]; the engine reads
/// it and never mutates it. Unknown JSON fields are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Capture settings handed to the video source.
    pub video_settings: VideoSettings,
    /// Locator for the camera calibration data handed to each tracker.
    pub camera_para: String,
    /// Performance overlay toggles.
    #[serde(default)]
    pub stats: StatsConfig,
}

/// Video capture settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSettings {
    pub width: u32,
    pub height: u32,
    /// Which camera to prefer on multi-camera devices ("environment", "user").
    #[serde(default)]
    pub facing_mode: Option<String>,
}

/// Stats widget toggles.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsConfig {
    /// Whether the host wants performance counters created for it.
    #[serde(default)]
    pub create_html: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let raw = r#"{
            "videoSettings": { "width": 640, "height": 480, "facingMode": "environment" },
            "cameraPara": "camera_para.dat",
            "stats": { "createHtml": true },
            "somethingUnknown": 42
        }"#;

        let config: AppConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.video_settings.width, 640);
        assert_eq!(config.video_settings.height, 480);
        assert_eq!(
            config.video_settings.facing_mode.as_deref(),
            Some("environment")
        );
        assert_eq!(config.camera_para, "camera_para.dat");
        assert!(config.stats.create_html);
    }

    #[test]
    fn test_parse_minimal_config() {
        let raw = r#"{
            "videoSettings": { "width": 1280, "height": 720 },
            "cameraPara": "camera_para.dat"
        }"#;

        let config: AppConfig = serde_json::from_str(raw).unwrap();
        assert!(config.video_settings.facing_mode.is_none());
        assert!(!config.stats.create_html);
    }
}
