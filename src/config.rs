/// Service configuration.
///
/// Endpoints and tuning live in a TOML file (`floodrisk.toml` by default);
/// secrets live in the environment, optionally loaded from `.env`. Every
/// field has a default, so a missing file or section is fine.

use crate::logging::LogLevel;
use crate::model::FloodRiskError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "./floodrisk.toml";

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub weather: WeatherConfig,
    pub backend: BackendConfig,
    pub river: RiverConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub base_url: String,
    /// Forecast length requested from the provider.
    pub days: u32,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: crate::ingest::weather::WEATHER_API_BASE.to_string(),
            days: 7,
            api_key_env: "WEATHER_API_KEY".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub analyze_url: String,
    /// Base of the weekly report endpoints (`/latest`, `/week/..`, `/province/..`).
    pub reports_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            analyze_url: "http://localhost:8080/api/ai/analyze".to_string(),
            reports_url: "http://localhost:8080/api/weekly-reports".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct RiverConfig {
    /// Absent: run without a river signal.
    pub dataset_url: Option<String>,
    /// Warn when the newest reading is older than this many days.
    pub max_reading_age_days: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            timestamps: false,
        }
    }
}

/// Loads configuration from `path`. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<ServiceConfig, FloodRiskError> {
    if !path.exists() {
        return Ok(ServiceConfig::default());
    }
    let text = std::fs::read_to_string(path)
        .map_err(|e| FloodRiskError::Config(format!("cannot read {}: {}", path.display(), e)))?;
    parse_config(&text)
}

pub fn parse_config(text: &str) -> Result<ServiceConfig, FloodRiskError> {
    let config: ServiceConfig =
        toml::from_str(text).map_err(|e| FloodRiskError::Config(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<(), FloodRiskError> {
        if self.weather.days == 0 || self.weather.days > 14 {
            return Err(FloodRiskError::Config(format!(
                "weather.days must be between 1 and 14, got {}",
                self.weather.days
            )));
        }
        self.log_level()?;
        Ok(())
    }

    pub fn log_level(&self) -> Result<LogLevel, FloodRiskError> {
        self.logging.level.parse().map_err(FloodRiskError::Config)
    }

    /// Blocking HTTP client shared by all outbound calls.
    pub fn http_client(&self) -> Result<reqwest::blocking::Client, FloodRiskError> {
        reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(self.http.timeout_secs))
            .build()
            .map_err(|e| FloodRiskError::Config(format!("cannot build HTTP client: {}", e)))
    }

    /// Weather API key from the environment (after loading `.env`).
    pub fn weather_api_key(&self) -> Result<String, FloodRiskError> {
        dotenv::dotenv().ok();
        std::env::var(&self.weather.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                FloodRiskError::Config(format!("{} must be set", self.weather.api_key_env))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.weather.days, 7);
        assert!(config.river.dataset_url.is_none());
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = parse_config(
            r#"
            [river]
            dataset_url = "https://example.org/river.json"
            max_reading_age_days = 2

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.river.dataset_url.as_deref(), Some("https://example.org/river.json"));
        assert_eq!(config.river.max_reading_age_days, Some(2));
        assert_eq!(config.log_level().unwrap(), LogLevel::Debug);
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.weather.api_key_env, "WEATHER_API_KEY");
        assert_eq!(config.backend.reports_url, "http://localhost:8080/api/weekly-reports");
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        assert!(matches!(parse_config("[weather\ndays = 7"), Err(FloodRiskError::Config(_))));
    }

    #[test]
    fn test_out_of_range_days_rejected() {
        assert!(parse_config("[weather]\ndays = 0").is_err());
        assert!(parse_config("[weather]\ndays = 30").is_err());
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        assert!(parse_config("[logging]\nlevel = \"loud\"").is_err());
    }

    #[test]
    fn test_missing_config_file_gives_defaults() {
        let config = load_config(Path::new("/nonexistent/floodrisk.toml")).unwrap();
        assert_eq!(config, ServiceConfig::default());
    }

    #[test]
    fn test_unset_api_key_is_config_error() {
        let mut config = ServiceConfig::default();
        config.weather.api_key_env = "FLOODRISK_TEST_KEY_THAT_IS_NEVER_SET".to_string();
        assert!(matches!(config.weather_api_key(), Err(FloodRiskError::Config(_))));
    }
}
