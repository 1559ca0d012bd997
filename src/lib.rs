//! `aircollect` - geographically sampled air-quality and weather dataset
//!
//! This library samples coordinates over a bounding region, queries an
//! air-quality API and a weather API for each one, and assembles the merged
//! readings into a table ready for CSV export.

pub mod air_quality;
pub mod collector;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod pacing;
pub mod pipeline;
pub mod sampler;
pub mod table;
pub mod weather;

// Re-export core types for public API
pub use air_quality::{AirQualitySource, WaqiClient};
pub use collector::{Collection, CollectionSummary, Collector, WeatherFailurePolicy};
pub use config::{ApiToken, CollectorConfig};
pub use error::{CollectorError, FetchError};
pub use models::{AirQualityReading, BoundingBox, Coordinate, MergedRow, WeatherReading};
pub use pacing::{IntervalPacer, Pacer, Sleeper};
pub use pipeline::{Pipeline, RunOutput};
pub use sampler::CoordinateSampler;
pub use table::{Cell, Dataset, TableAssembler};
pub use weather::{OpenMeteoClient, WeatherSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, CollectorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
