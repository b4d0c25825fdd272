use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}, time::Duration};

use crate::{dashboard::Theme, model::Coordinates, units::TemperatureUnit};

/// Environment variable that overrides the API key stored on disk.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Coordinates used when the dashboard is asked for "current location".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HomeLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<HomeLocation> for Coordinates {
    fn from(home: HomeLocation) -> Self {
        Coordinates::new(home.latitude, home.longitude)
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// units = "fahrenheit"
/// theme = "dark"
///
/// [home]
/// latitude = 40.71
/// longitude = -74.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OpenWeather key. Without one the dashboard runs on demo data only.
    pub api_key: Option<String>,
    pub units: TemperatureUnit,
    pub theme: Theme,
    pub geolocation_timeout_secs: u64,
    /// Override for the OpenWeather host, mostly for testing against a local server.
    pub base_url: Option<String>,
    pub home: Option<HomeLocation>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            units: TemperatureUnit::default(),
            theme: Theme::default(),
            geolocation_timeout_secs: 10,
            base_url: None,
            home: None,
        }
    }
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weatherdash", "weatherdash")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Store an API key; blank input clears it.
    pub fn set_api_key(&mut self, api_key: String) {
        let trimmed = api_key.trim();
        self.api_key = (!trimmed.is_empty()).then(|| trimmed.to_string());
    }

    /// The key to use: `OPENWEATHER_API_KEY` if set and non-empty, else the stored one.
    pub fn effective_api_key(&self) -> Option<String> {
        pick_api_key(std::env::var(API_KEY_ENV).ok(), self.api_key.as_deref())
    }

    pub fn geolocation_timeout(&self) -> Duration {
        Duration::from_secs(self.geolocation_timeout_secs)
    }
}

fn pick_api_key(env: Option<String>, stored: Option<&str>) -> Option<String> {
    env.filter(|k| !k.trim().is_empty())
        .or_else(|| stored.filter(|k| !k.trim().is_empty()).map(str::to_owned))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_demo_mode_in_celsius() {
        let cfg = Config::default();
        assert!(cfg.api_key.is_none());
        assert_eq!(cfg.units, TemperatureUnit::Celsius);
        assert_eq!(cfg.theme, Theme::Light);
        assert_eq!(cfg.geolocation_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn parses_full_toml() {
        let cfg: Config = toml::from_str(
            r#"
            api_key = "abc"
            units = "fahrenheit"
            theme = "dark"
            geolocation_timeout_secs = 3

            [home]
            latitude = 40.71
            longitude = -74.0
            "#,
        )
        .unwrap();

        assert_eq!(cfg.api_key.as_deref(), Some("abc"));
        assert_eq!(cfg.units, TemperatureUnit::Fahrenheit);
        assert_eq!(cfg.theme, Theme::Dark);
        assert_eq!(cfg.geolocation_timeout_secs, 3);
        assert_eq!(
            cfg.home.map(Coordinates::from),
            Some(Coordinates::new(40.71, -74.0))
        );
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: Config = toml::from_str("units = \"fahrenheit\"").unwrap();
        assert_eq!(cfg.units, TemperatureUnit::Fahrenheit);
        assert_eq!(cfg.geolocation_timeout_secs, 10);
        assert!(cfg.home.is_none());
    }

    #[test]
    fn set_api_key_trims_and_clears() {
        let mut cfg = Config::default();
        cfg.set_api_key("  KEY  ".into());
        assert_eq!(cfg.api_key.as_deref(), Some("KEY"));

        cfg.set_api_key("   ".into());
        assert!(cfg.api_key.is_none());
    }

    #[test]
    fn env_key_overrides_stored_key() {
        assert_eq!(
            pick_api_key(Some("ENV".into()), Some("FILE")).as_deref(),
            Some("ENV")
        );
        assert_eq!(pick_api_key(Some("".into()), Some("FILE")).as_deref(), Some("FILE"));
        assert_eq!(pick_api_key(None, Some("FILE")).as_deref(), Some("FILE"));
        assert_eq!(pick_api_key(None, Some(" ")), None);
        assert_eq!(pick_api_key(None, None), None);
    }

    #[test]
    fn save_and_load_roundtrip_through_disk() {
        let dir = std::env::temp_dir().join(format!("weatherdash-config-{}", std::process::id()));
        let path = dir.join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.theme = Theme::Dark;
        cfg.home = Some(HomeLocation {
            latitude: 1.5,
            longitude: 2.5,
        });
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.api_key.as_deref(), Some("KEY"));
        assert_eq!(loaded.theme, Theme::Dark);
        assert_eq!(loaded.home, cfg.home);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_file_loads_default() {
        let path = std::env::temp_dir().join("weatherdash-definitely-missing.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert!(cfg.api_key.is_none());
    }
}
