//! Weather client for the Open-Meteo forecast API

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::WeatherConfig;
use crate::models::{Coordinate, WeatherReading, WeatherVariable};
use crate::{CollectorError, FetchError};

/// Source of current weather conditions for a coordinate
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn fetch(&self, coordinate: Coordinate) -> Result<WeatherReading, FetchError>;
}

/// Open-Meteo forecast client requesting the `current` block only
pub struct OpenMeteoClient {
    client: Client,
    base_url: String,
}

impl OpenMeteoClient {
    /// Create a new client
    pub fn new(config: &WeatherConfig) -> Result<Self, CollectorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("aircollect/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CollectorError::general(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn forecast_url(&self) -> String {
        format!("{}/forecast", self.base_url)
    }

    fn query(coordinate: Coordinate) -> [(&'static str, String); 3] {
        [
            ("latitude", coordinate.lat.to_string()),
            ("longitude", coordinate.lon.to_string()),
            ("current", WeatherVariable::query_list()),
        ]
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoClient {
    #[instrument(skip(self))]
    async fn fetch(&self, coordinate: Coordinate) -> Result<WeatherReading, FetchError> {
        let start_time = Instant::now();

        let response = self
            .client
            .get(self.forecast_url())
            .query(&Self::query(coordinate))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body: Value = response.json().await?;
        debug!(
            "Weather response received in {:.3}s",
            start_time.elapsed().as_secs_f64()
        );

        Ok(WeatherReading::from_forecast(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forecast_url() {
        let client = OpenMeteoClient::new(&WeatherConfig::default()).unwrap();
        assert_eq!(client.forecast_url(), "https://api.open-meteo.com/v1/forecast");
    }

    #[test]
    fn test_query_parameters() {
        let query = OpenMeteoClient::query(Coordinate::new(40.5, -75.25));
        assert_eq!(query[0], ("latitude", "40.5".to_string()));
        assert_eq!(query[1], ("longitude", "-75.25".to_string()));
        assert_eq!(query[2].0, "current");
        assert!(query[2].1.contains("wind_speed_10m"));
    }
}
