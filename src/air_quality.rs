//! Air-quality client for the WAQI geo feed
//!
//! One request per coordinate against `/feed/geo:{lat};{lon}/`. Transport
//! errors, HTTP failures and API-level refusals all come back as a
//! [`FetchError`]; field-level gaps come back as absent values.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::{AirQualityConfig, ApiToken};
use crate::models::{AirQualityReading, Coordinate};
use crate::{CollectorError, FetchError};

/// Source of air-quality readings for a coordinate
#[async_trait]
pub trait AirQualitySource: Send + Sync {
    async fn fetch(&self, coordinate: Coordinate) -> Result<AirQualityReading, FetchError>;
}

/// WAQI geo feed client
pub struct WaqiClient {
    client: Client,
    base_url: String,
    token: ApiToken,
}

impl WaqiClient {
    /// Create a new client
    pub fn new(config: &AirQualityConfig, token: ApiToken) -> Result<Self, CollectorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("aircollect/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CollectorError::general(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Feed URL for a coordinate, without the token
    #[must_use]
    pub fn feed_url(&self, coordinate: Coordinate) -> String {
        format!(
            "{}/feed/geo:{:.4};{:.4}/",
            self.base_url, coordinate.lat, coordinate.lon
        )
    }
}

#[async_trait]
impl AirQualitySource for WaqiClient {
    #[instrument(skip(self))]
    async fn fetch(&self, coordinate: Coordinate) -> Result<AirQualityReading, FetchError> {
        let start_time = Instant::now();

        let response = self
            .client
            .get(self.feed_url(coordinate))
            .query(&[("token", self.token.expose())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body: Value = response.json().await?;
        debug!(
            "Air-quality response received in {:.3}s",
            start_time.elapsed().as_secs_f64()
        );

        AirQualityReading::from_feed(coordinate, &body)
    }
}
