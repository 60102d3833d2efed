//! Hub configuration loaded from a TOML file.
//!
//! Every field has a default, so a partial file (or no file at all) is
//! valid. Secrets can be left out of the file and supplied through the
//! environment instead.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "WEATHER_HUB_CONFIG";

/// Used when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "weather-hub.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    pub aemet: AemetConfig,
    pub sheet: SheetConfig,
    pub sensor: SensorConfig,
    pub display: DisplayConfig,
    pub storage: StorageConfig,
}

/// AEMET OpenData settings (forecast and radar).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AemetConfig {
    pub base_url: String,
    pub api_key: String,
    pub municipality_id: String,
    pub radar_id: String,
    pub forecast_period_secs: u64,
    pub radar_period_secs: u64,
    pub max_radar_frames: usize,
    pub request_timeout_secs: u64,
}

impl Default for AemetConfig {
    fn default() -> Self {
        Self {
            base_url: "https://opendata.aemet.es/opendata/api".to_string(),
            api_key: String::new(),
            municipality_id: "29067".to_string(),
            radar_id: "ml".to_string(),
            forecast_period_secs: 10 * 60,
            radar_period_secs: 10 * 60,
            max_radar_frames: 12,
            request_timeout_secs: 30,
        }
    }
}

impl AemetConfig {
    pub fn forecast_period(&self) -> Duration {
        Duration::from_secs(self.forecast_period_secs)
    }

    pub fn radar_period(&self) -> Duration {
        Duration::from_secs(self.radar_period_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Google Sheets settings for the outdoor station spreadsheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    pub enabled: bool,
    pub base_url: String,
    pub spreadsheet_id: String,
    pub range: String,
    pub api_key: String,
    pub access_token: String,
    pub period_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://sheets.googleapis.com".to_string(),
            spreadsheet_id: String::new(),
            range: "Procesamiento!A2:D".to_string(),
            api_key: String::new(),
            access_token: String::new(),
            period_secs: 5 * 60,
            request_timeout_secs: 30,
        }
    }
}

impl SheetConfig {
    pub fn period(&self) -> Duration {
        Duration::from_secs(self.period_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Local SHT31-D sensor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    pub enabled: bool,
    pub i2c_bus: String,
    pub address: u8,
    pub history_path: PathBuf,
    pub period_secs: u64,
    pub retention_days: i64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            i2c_bus: "/dev/i2c-1".to_string(),
            address: 0x44,
            history_path: PathBuf::from("resources/local_measurements.csv"),
            period_secs: 10 * 60,
            retention_days: 7,
        }
    }
}

impl SensorConfig {
    pub fn period(&self) -> Duration {
        Duration::from_secs(self.period_secs)
    }
}

/// Window and animation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub fullscreen: bool,
    pub width: f32,
    pub height: f32,
    pub animation_frame_ms: u64,
    pub animation_loops: u32,
    pub visible_hours: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            fullscreen: true,
            width: 800.0,
            height: 480.0,
            animation_frame_ms: 500,
            animation_loops: 5,
            visible_hours: 12,
        }
    }
}

impl DisplayConfig {
    pub fn animation_frame(&self) -> Duration {
        Duration::from_millis(self.animation_frame_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub resources_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            resources_dir: PathBuf::from("resources"),
        }
    }
}

impl StorageConfig {
    pub fn regional_radar_dir(&self) -> PathBuf {
        self.resources_dir.join("regional_radar")
    }

    pub fn national_radar_dir(&self) -> PathBuf {
        self.resources_dir.join("national_radar")
    }
}

impl HubConfig {
    /// Load the configuration from the path in `WEATHER_HUB_CONFIG`, or the
    /// default path, then apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut config = Self::from_file(&path)?;
        config.apply_env(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Read a configuration file. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let config = Self::from_toml(&text, &display)?;
                log::info!("Loaded configuration from {}", display);
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("No configuration at {}, using defaults", display);
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read {
                path: display,
                source,
            }),
        }
    }

    pub fn from_toml(text: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_string(),
            source,
        })
    }

    /// Secrets from the environment take precedence over the file.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("AEMET_API_KEY") {
            self.aemet.api_key = key;
        }
        if let Some(key) = non_empty("SHEETS_API_KEY") {
            self.sheet.api_key = key;
        }
        if let Some(token) = non_empty("SHEETS_ACCESS_TOKEN") {
            self.sheet.access_token = token;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let periods = [
            ("aemet.forecast_period_secs", self.aemet.forecast_period_secs),
            ("aemet.radar_period_secs", self.aemet.radar_period_secs),
            ("sheet.period_secs", self.sheet.period_secs),
            ("sensor.period_secs", self.sensor.period_secs),
        ];
        for (name, value) in periods {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{} must be positive", name)));
            }
        }

        if self.aemet.max_radar_frames == 0 {
            return Err(ConfigError::Invalid(
                "aemet.max_radar_frames must be at least 1".to_string(),
            ));
        }
        if self.display.visible_hours == 0 {
            return Err(ConfigError::Invalid(
                "display.visible_hours must be at least 1".to_string(),
            ));
        }
        if self.sensor.retention_days <= 0 {
            return Err(ConfigError::Invalid(
                "sensor.retention_days must be positive".to_string(),
            ));
        }

        if self.aemet.api_key.is_empty() {
            log::warn!("No AEMET API key configured; forecast and radar requests will fail");
        }
        if self.sheet.enabled && self.sheet.spreadsheet_id.is_empty() {
            log::warn!("Sheet source enabled without a spreadsheet_id");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = HubConfig::from_toml(
            r#"
            [aemet]
            municipality_id = "28079"

            [display]
            fullscreen = false
            "#,
            "inline",
        )
        .unwrap();

        assert_eq!(config.aemet.municipality_id, "28079");
        assert_eq!(config.aemet.radar_id, "ml");
        assert_eq!(config.aemet.max_radar_frames, 12);
        assert!(!config.display.fullscreen);
        assert_eq!(config.display.visible_hours, 12);
        assert_eq!(config.sheet.range, "Procesamiento!A2:D");
        assert_eq!(config.sensor.address, 0x44);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = HubConfig::from_file(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.aemet.forecast_period_secs, 600);
        assert_eq!(config.sheet.period_secs, 300);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let result = HubConfig::from_toml("[aemet\nbase_url = 1", "broken.toml");
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_env_overrides_secrets() {
        let mut config = HubConfig::default();
        config.aemet.api_key = "from-file".to_string();

        config.apply_env(|name| match name {
            "AEMET_API_KEY" => Some("from-env".to_string()),
            "SHEETS_API_KEY" => Some("   ".to_string()),
            _ => None,
        });

        assert_eq!(config.aemet.api_key, "from-env");
        assert!(config.sheet.api_key.is_empty());
    }

    #[test]
    fn test_zero_period_rejected() {
        let mut config = HubConfig::default();
        config.sheet.period_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_radar_dirs_under_resources() {
        let storage = StorageConfig {
            resources_dir: PathBuf::from("/tmp/hub"),
        };
        assert_eq!(
            storage.regional_radar_dir(),
            PathBuf::from("/tmp/hub/regional_radar")
        );
        assert_eq!(
            storage.national_radar_dir(),
            PathBuf::from("/tmp/hub/national_radar")
        );
    }
}
