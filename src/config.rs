//! Configuration management for the collection pipeline
//!
//! Handles loading configuration from an optional TOML file and environment
//! variables, and validates every tunable before a run starts.

use crate::CollectorError;
use crate::collector::WeatherFailurePolicy;
use crate::models::BoundingBox;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Default configuration file, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "aircollect.toml";

/// Environment variable that points at an alternative configuration file
pub const CONFIG_PATH_ENV: &str = "AIRCOLLECT_CONFIG";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// Sampling and pacing settings
    #[serde(default)]
    pub collection: CollectionConfig,
    /// Region the coordinates are drawn from
    #[serde(default)]
    pub bbox: BoundingBoxConfig,
    /// Air-quality API settings
    #[serde(default)]
    pub air_quality: AirQualityConfig,
    /// Weather API settings
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Sampling, pacing and output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Number of coordinates to sample
    #[serde(default = "default_point_count")]
    pub point_count: usize,
    /// Seed for the coordinate sampler
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Pause after each coordinate with an air-quality reading
    #[serde(default = "default_request_delay")]
    pub request_delay_seconds: f64,
    /// Where the CSV dataset is written
    #[serde(default = "default_output_path")]
    pub output_path: String,
    /// Rows shown in the summary preview
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
    /// What to do when the weather fetch fails for a location
    #[serde(default)]
    pub weather_failure: WeatherFailurePolicy,
}

/// Bounding box as written in configuration; validated into [`BoundingBox`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundingBoxConfig {
    #[serde(default = "default_lat_min")]
    pub lat_min: f64,
    #[serde(default = "default_lat_max")]
    pub lat_max: f64,
    #[serde(default = "default_lon_min")]
    pub lon_min: f64,
    #[serde(default = "default_lon_max")]
    pub lon_max: f64,
}

/// Air-quality API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirQualityConfig {
    /// Base URL for the air-quality API
    #[serde(default = "default_air_quality_base_url")]
    pub base_url: String,
    /// Environment variable holding the API token
    #[serde(default = "default_token_env")]
    pub token_env: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Base URL for the weather API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_point_count() -> usize {
    250
}

fn default_seed() -> u64 {
    42
}

fn default_request_delay() -> f64 {
    1.0
}

fn default_output_path() -> String {
    "air_quality_dataset.csv".to_string()
}

fn default_preview_rows() -> usize {
    5
}

fn default_lat_min() -> f64 {
    25.0
}

fn default_lat_max() -> f64 {
    49.0
}

fn default_lon_min() -> f64 {
    -124.0
}

fn default_lon_max() -> f64 {
    -66.0
}

fn default_air_quality_base_url() -> String {
    "https://api.waqi.info".to_string()
}

fn default_token_env() -> String {
    "AQI_TOKEN".to_string()
}

fn default_weather_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            point_count: default_point_count(),
            seed: default_seed(),
            request_delay_seconds: default_request_delay(),
            output_path: default_output_path(),
            preview_rows: default_preview_rows(),
            weather_failure: WeatherFailurePolicy::default(),
        }
    }
}

impl Default for BoundingBoxConfig {
    fn default() -> Self {
        Self {
            lat_min: default_lat_min(),
            lat_max: default_lat_max(),
            lon_min: default_lon_min(),
            lon_max: default_lon_max(),
        }
    }
}

impl Default for AirQualityConfig {
    fn default() -> Self {
        Self {
            base_url: default_air_quality_base_url(),
            token_env: default_token_env(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl CollectorConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        let path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
        Self::load_from_path(path)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // AIRCOLLECT__COLLECTION__POINT_COUNT=20 style overrides
        builder = builder.add_source(
            Environment::with_prefix("AIRCOLLECT")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: CollectorConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.bounding_box()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// The validated sampling region
    pub fn bounding_box(&self) -> Result<BoundingBox, CollectorError> {
        BoundingBox::new(
            self.bbox.lat_min,
            self.bbox.lat_max,
            self.bbox.lon_min,
            self.bbox.lon_max,
        )
    }

    /// Pause applied after each coordinate with an air-quality reading
    #[must_use]
    pub fn request_delay(&self) -> Duration {
        Duration::from_secs_f64(self.collection.request_delay_seconds.max(0.0))
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        let delay = self.collection.request_delay_seconds;
        if !delay.is_finite() || !(0.0..=60.0).contains(&delay) {
            return Err(
                CollectorError::config("Request delay must be between 0 and 60 seconds").into(),
            );
        }

        if self.collection.point_count > 100_000 {
            return Err(CollectorError::config("Point count cannot exceed 100000").into());
        }

        for (name, timeout) in [
            ("Air-quality", self.air_quality.timeout_seconds),
            ("Weather", self.weather.timeout_seconds),
        ] {
            if timeout == 0 || timeout > 300 {
                return Err(CollectorError::config(format!(
                    "{name} API timeout must be between 1 and 300 seconds"
                ))
                .into());
            }
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(CollectorError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(CollectorError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("Air-quality", &self.air_quality.base_url),
            ("Weather", &self.weather.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(CollectorError::config(format!(
                    "{name} API base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        if self.collection.output_path.trim().is_empty() {
            return Err(CollectorError::config("Output path cannot be empty").into());
        }

        if self.air_quality.token_env.trim().is_empty() {
            return Err(CollectorError::config("Token variable name cannot be empty").into());
        }

        Ok(())
    }
}

/// Air-quality API token
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Read the token from the named environment variable.
    pub fn from_env(var: &str) -> Result<Self, CollectorError> {
        match std::env::var(var) {
            Ok(token) if !token.trim().is_empty() => Ok(Self(token)),
            _ => Err(CollectorError::credential(format!(
                "Missing {var}.\nSet it with:\n\n    export {var}='your_key_here'\n"
            ))),
        }
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_default_config() {
        let config = CollectorConfig::default();
        assert_eq!(config.collection.point_count, 250);
        assert_eq!(config.collection.seed, 42);
        assert_eq!(config.collection.output_path, "air_quality_dataset.csv");
        assert_eq!(config.weather.base_url, "https://api.open-meteo.com/v1");
        assert_eq!(config.air_quality.token_env, "AQI_TOKEN");
        assert_eq!(config.collection.weather_failure, WeatherFailurePolicy::Skip);
        assert_eq!(config.request_delay(), Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_bounding_box() {
        let bbox = CollectorConfig::default().bounding_box().unwrap();
        assert_eq!(bbox.lat_min(), 25.0);
        assert_eq!(bbox.lat_max(), 49.0);
        assert_eq!(bbox.lon_min(), -124.0);
        assert_eq!(bbox.lon_max(), -66.0);
    }

    #[test]
    fn test_config_validation_inverted_bbox() {
        let mut config = CollectorConfig::default();
        config.bbox.lat_min = 50.0;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("latitude"));
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = CollectorConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = CollectorConfig::default();
        config.collection.request_delay_seconds = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = CollectorConfig::default();
        config.weather.timeout_seconds = 0;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout"));
    }

    #[test]
    fn test_config_validation_base_url() {
        let mut config = CollectorConfig::default();
        config.air_quality.base_url = "api.waqi.info".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = env::temp_dir().join(format!("aircollect-test-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[collection]\npoint_count = 12\nweather_failure = \"keep_row\"\n\n[bbox]\nlat_min = 30.0\n",
        )
        .unwrap();

        let config = CollectorConfig::load_from_path(Some(path.clone()));
        std::fs::remove_file(&path).unwrap();

        let config = config.unwrap();
        assert_eq!(config.collection.point_count, 12);
        assert_eq!(config.collection.weather_failure, WeatherFailurePolicy::KeepRow);
        assert_eq!(config.bbox.lat_min, 30.0);
        assert_eq!(config.bbox.lat_max, 49.0);
        assert_eq!(config.collection.seed, 42);
    }

    #[test]
    fn test_token_from_env() {
        // SAFETY: Test environment, variable name is unique to this test
        unsafe {
            env::set_var("AIRCOLLECT_TEST_TOKEN_PRESENT", "secret-token");
        }
        let token = ApiToken::from_env("AIRCOLLECT_TEST_TOKEN_PRESENT").unwrap();
        // SAFETY: Test cleanup
        unsafe {
            env::remove_var("AIRCOLLECT_TEST_TOKEN_PRESENT");
        }

        assert_eq!(token.expose(), "secret-token");
        assert_eq!(format!("{token:?}"), "ApiToken(***)");
    }

    #[test]
    fn test_missing_token_has_remediation() {
        let err = ApiToken::from_env("AIRCOLLECT_TEST_TOKEN_ABSENT").unwrap_err();
        assert!(matches!(err, CollectorError::Credential { .. }));
        assert!(
            err.user_message()
                .contains("export AIRCOLLECT_TEST_TOKEN_ABSENT='your_key_here'")
        );
    }
}
