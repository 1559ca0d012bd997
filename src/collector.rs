//! Collection orchestrator
//!
//! Walks the sampled coordinates in order, fetches air quality and then
//! weather for each one, and accumulates merged rows. Per-location failures
//! are absorbed according to a uniform skip policy; only
//! [`WeatherFailurePolicy::Abort`] can end a run early.

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::air_quality::AirQualitySource;
use crate::models::{Coordinate, MergedRow};
use crate::pacing::Pacer;
use crate::weather::WeatherSource;
use crate::{CollectorError, Result};

/// What to do with a location whose air-quality reading succeeded but whose
/// weather fetch failed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherFailurePolicy {
    /// Drop the location and continue
    #[default]
    Skip,
    /// Emit the row with missing weather columns
    KeepRow,
    /// Fail the whole run, discarding collected rows
    Abort,
}

/// Counters for one collection run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollectionSummary {
    pub attempted: usize,
    pub collected: usize,
    pub air_quality_failures: usize,
    pub weather_failures: usize,
}

/// Rows collected in sampling order, plus run counters
#[derive(Debug, Clone, Default)]
pub struct Collection {
    pub rows: Vec<MergedRow>,
    pub summary: CollectionSummary,
}

pub struct Collector<A, W, P> {
    air_quality: A,
    weather: W,
    pacer: P,
    weather_failure: WeatherFailurePolicy,
}

impl<A, W, P> Collector<A, W, P>
where
    A: AirQualitySource,
    W: WeatherSource,
    P: Pacer,
{
    pub fn new(air_quality: A, weather: W, pacer: P) -> Self {
        Self {
            air_quality,
            weather,
            pacer,
            weather_failure: WeatherFailurePolicy::default(),
        }
    }

    #[must_use]
    pub fn with_weather_failure(mut self, policy: WeatherFailurePolicy) -> Self {
        self.weather_failure = policy;
        self
    }

    pub fn pacer(&self) -> &P {
        &self.pacer
    }

    /// Collect one row per coordinate whose air-quality reading is obtainable.
    pub async fn collect(&mut self, coordinates: &[Coordinate]) -> Result<Collection> {
        let total = coordinates.len();
        let mut collection = Collection::default();

        for (index, &coordinate) in coordinates.iter().enumerate() {
            collection.summary.attempted += 1;
            info!(
                "Collecting {}/{}: {}",
                index + 1,
                total,
                coordinate.format_short()
            );

            let air_quality = match self.air_quality.fetch(coordinate).await {
                Ok(reading) => reading,
                Err(e) => {
                    if e.is_reportable() {
                        warn!(
                            "Air-quality request failed for {}: {}",
                            coordinate.format_short(),
                            e
                        );
                    } else {
                        debug!(
                            "No air-quality reading for {}: {}",
                            coordinate.format_short(),
                            e
                        );
                    }
                    collection.summary.air_quality_failures += 1;
                    continue;
                }
            };

            match self.weather.fetch(coordinate).await {
                Ok(weather) => collection.rows.push(MergedRow::merge(air_quality, weather)),
                Err(e) => {
                    collection.summary.weather_failures += 1;
                    match self.weather_failure {
                        WeatherFailurePolicy::Skip => {
                            warn!(
                                "Weather request failed for {}, skipping: {}",
                                coordinate.format_short(),
                                e
                            );
                        }
                        WeatherFailurePolicy::KeepRow => {
                            warn!(
                                "Weather request failed for {}, keeping row without weather: {}",
                                coordinate.format_short(),
                                e
                            );
                            collection.rows.push(MergedRow::without_weather(air_quality));
                        }
                        WeatherFailurePolicy::Abort => {
                            error!(
                                "Weather request failed for {}, aborting run: {}",
                                coordinate.format_short(),
                                e
                            );
                            return Err(CollectorError::WeatherAborted {
                                lat: coordinate.lat,
                                lon: coordinate.lon,
                                source: e,
                            });
                        }
                    }
                }
            }

            self.pacer.pause().await;
        }

        collection.summary.collected = collection.rows.len();
        info!(
            collected = collection.summary.collected,
            attempted = collection.summary.attempted,
            "Collection finished"
        );
        Ok(collection)
    }
}
