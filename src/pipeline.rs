//! End-to-end collection run: sample, collect, assemble

use tracing::info;

use crate::Result;
use crate::air_quality::{AirQualitySource, WaqiClient};
use crate::collector::{CollectionSummary, Collector};
use crate::config::{ApiToken, CollectorConfig};
use crate::pacing::{IntervalPacer, Pacer};
use crate::sampler::CoordinateSampler;
use crate::table::{Dataset, TableAssembler};
use crate::weather::{OpenMeteoClient, WeatherSource};

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub dataset: Dataset,
    pub summary: CollectionSummary,
}

pub struct Pipeline<A, W, P> {
    sampler: CoordinateSampler,
    point_count: usize,
    collector: Collector<A, W, P>,
}

impl Pipeline<WaqiClient, OpenMeteoClient, IntervalPacer> {
    /// Wire the HTTP clients and pacer from configuration
    pub fn from_config(config: &CollectorConfig, token: ApiToken) -> Result<Self> {
        let sampler = CoordinateSampler::new(config.bounding_box()?, config.collection.seed);
        let collector = Collector::new(
            WaqiClient::new(&config.air_quality, token)?,
            OpenMeteoClient::new(&config.weather)?,
            IntervalPacer::new(config.request_delay()),
        )
        .with_weather_failure(config.collection.weather_failure);

        Ok(Self::new(sampler, config.collection.point_count, collector))
    }
}

impl<A, W, P> Pipeline<A, W, P>
where
    A: AirQualitySource,
    W: WeatherSource,
    P: Pacer,
{
    pub fn new(sampler: CoordinateSampler, point_count: usize, collector: Collector<A, W, P>) -> Self {
        Self {
            sampler,
            point_count,
            collector,
        }
    }

    pub async fn run(&mut self) -> Result<RunOutput> {
        let coordinates = self.sampler.sample(self.point_count);
        info!("Sampled {} coordinates", coordinates.len());

        let collection = self.collector.collect(&coordinates).await?;
        let dataset = TableAssembler::assemble(&collection.rows);

        Ok(RunOutput {
            dataset,
            summary: collection.summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_rejects_invalid_bbox() {
        let mut config = CollectorConfig::default();
        config.bbox.lon_min = 0.0;
        config.bbox.lon_max = 0.0;
        assert!(Pipeline::from_config(&config, ApiToken::new("token")).is_err());
    }

    #[tokio::test]
    async fn test_zero_points_runs_without_requests() {
        let mut config = CollectorConfig::default();
        config.collection.point_count = 0;
        // Nothing listens here, so any request would be counted as a failure
        config.air_quality.base_url = "http://127.0.0.1:9".to_string();
        config.weather.base_url = "http://127.0.0.1:9".to_string();
        config.collection.weather_failure = crate::collector::WeatherFailurePolicy::Abort;

        let mut pipeline = Pipeline::from_config(&config, ApiToken::new("token")).unwrap();
        let output = pipeline.run().await.unwrap();

        assert!(output.dataset.is_empty());
        assert_eq!(output.summary, CollectionSummary::default());
    }
}
