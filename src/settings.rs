use crate::playback::PlaybackConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Persistent runner settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Route data file (JSON or CSV)
    pub route_path: PathBuf,
    pub tick_interval_ms: u64,
    pub follow_zoom: u8,
    pub autoplay: bool,
    /// Label shown next to the vehicle
    pub vehicle_id: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            route_path: PathBuf::from("dummyRoutes.json"),
            tick_interval_ms: 2000,
            follow_zoom: 13,
            autoplay: true,
            vehicle_id: "KA-01-AB-1234".to_string(),
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("vehicle-replay").join("settings.json"))
    }

    /// Settings from the user config dir, or defaults
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }

        Self::load_from(&path).unwrap_or_else(|e| {
            warn!("Ignoring settings at {}: {:#}", path.display(), e);
            Self::default()
        })
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&contents).context("Failed to parse settings JSON")
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path().context("No config directory on this platform")?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
    }

    pub fn playback_config(&self) -> PlaybackConfig {
        PlaybackConfig {
            tick_interval: Duration::from_millis(self.tick_interval_ms),
            follow_zoom: self.follow_zoom,
            autoplay: self.autoplay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_fill_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"tick_interval_ms": 500, "autoplay": false}"#).unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.tick_interval_ms, 500);
        assert!(!settings.autoplay);
        assert_eq!(settings.route_path, PathBuf::from("dummyRoutes.json"));
        assert_eq!(settings.follow_zoom, 13);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            vehicle_id: "TN-09-XY-4321".to_string(),
            ..Settings::default()
        };

        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn test_invalid_settings_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();

        assert!(Settings::load_from(&path).is_err());
    }

    #[test]
    fn test_playback_config() {
        let config = Settings::default().playback_config();

        assert_eq!(config.tick_interval, Duration::from_secs(2));
        assert_eq!(config.follow_zoom, 13);
        assert!(config.autoplay);

        let zero = Settings {
            tick_interval_ms: 0,
            ..Settings::default()
        };
        assert!(zero.playback_config().effective_tick_interval() > Duration::ZERO);
    }
}
