use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::model::Coordinate;

pub const DEFAULT_ENDPOINT: &str = "https://api.open-meteo.com/v1/forecast";

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "open-meteo-weather";
const APPLICATION: &str = "weather-now";

/// Open-Meteo accepts at most this many past days.
pub const MAX_PAST_DAYS: u8 = 92;

/// How the forecast request is shaped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastOptions {
    /// Forecast endpoint; overridable for tests or a self-hosted instance.
    pub endpoint: String,

    /// Request the hourly series and derive UV index and forecast temperature
    /// from its first entry.
    pub include_hourly: bool,

    pub past_days: u8,
}

impl Default for ForecastOptions {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            include_hourly: true,
            past_days: 0,
        }
    }
}

impl ForecastOptions {
    /// Only current conditions, no hourly series.
    pub fn current_only() -> Self {
        Self {
            include_hourly: false,
            ..Self::default()
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.past_days > MAX_PAST_DAYS {
            bail!(
                "past_days must be between 0 and {MAX_PAST_DAYS}, got {}",
                self.past_days
            );
        }

        let url = Url::parse(&self.endpoint)
            .with_context(|| format!("Invalid forecast endpoint: {}", self.endpoint))?;

        if !matches!(url.scheme(), "http" | "https") {
            bail!("Forecast endpoint must be an http(s) URL, got {}", self.endpoint);
        }

        Ok(())
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [forecast]
/// include_hourly = true
/// past_days = 0
///
/// [location]
/// latitude = 37.7749
/// longitude = -122.4194
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub forecast: ForecastOptions,

    /// Fallback position for hosts without a location service.
    pub location: Option<Coordinate>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        cfg.forecast.validate()?;
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.forecast.validate()?;

        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_location(&mut self, coordinate: Coordinate) {
        self.location = Some(coordinate);
    }

    /// Resolve the coordinate to use, preferring an explicit one over the stored default.
    pub fn resolve_location(&self, explicit: Option<Coordinate>) -> Result<Coordinate> {
        let coordinate = explicit.or(self.location).ok_or_else(|| {
            anyhow!(
                "No location available.\n\
                 Hint: pass --lat/--lon or run `weather configure` first."
            )
        })?;

        if !coordinate.is_valid() {
            bail!("Coordinate out of range: {coordinate}");
        }

        Ok(coordinate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_request_hourly_for_today() {
        let cfg = Config::default();

        assert_eq!(cfg.forecast.endpoint, DEFAULT_ENDPOINT);
        assert!(cfg.forecast.include_hourly);
        assert_eq!(cfg.forecast.past_days, 0);
        assert!(cfg.location.is_none());
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let cfg = Config::from_toml("[forecast]\npast_days = 1\n").expect("valid config");

        assert_eq!(cfg.forecast.past_days, 1);
        assert!(cfg.forecast.include_hourly);
        assert_eq!(cfg.forecast.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn toml_roundtrip_keeps_location() {
        let mut cfg = Config::default();
        cfg.set_location(Coordinate::new(37.7749, -122.4194));
        cfg.forecast.include_hourly = false;

        let text = toml::to_string_pretty(&cfg).expect("serializable");
        let parsed = Config::from_toml(&text).expect("roundtrip");

        assert_eq!(parsed, cfg);
    }

    #[test]
    fn rejects_past_days_over_limit() {
        let err = Config::from_toml("[forecast]\npast_days = 93\n").unwrap_err();
        assert!(err.to_string().contains("past_days"));
    }

    #[test]
    fn rejects_non_http_endpoint() {
        let options = ForecastOptions::default().with_endpoint("ftp://example.com/forecast");
        assert!(options.validate().is_err());

        let options = ForecastOptions::default().with_endpoint("not a url");
        assert!(options.validate().is_err());
    }

    #[test]
    fn explicit_location_wins_over_stored() {
        let mut cfg = Config::default();
        cfg.set_location(Coordinate::new(1.0, 2.0));

        let explicit = Coordinate::new(3.0, 4.0);
        assert_eq!(cfg.resolve_location(Some(explicit)).unwrap(), explicit);
        assert_eq!(cfg.resolve_location(None).unwrap(), Coordinate::new(1.0, 2.0));
    }

    #[test]
    fn out_of_range_location_is_rejected() {
        let err = Config::default()
            .resolve_location(Some(Coordinate::new(120.0, 0.0)))
            .unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn config_file_lives_under_this_application() {
        // Hosts without a home directory have no config dir at all.
        let Ok(path) = Config::config_file_path() else {
            return;
        };

        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("config.toml"));
        assert!(path.to_string_lossy().contains(APPLICATION));
        assert!(!path.to_string_lossy().contains("weather-task"));
    }

    #[test]
    fn missing_location_has_hint() {
        let err = Config::default().resolve_location(None).unwrap_err();
        assert!(err.to_string().contains("weather configure"));
    }
}
