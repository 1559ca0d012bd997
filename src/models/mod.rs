//! Data models for the collection pipeline
//!
//! This module contains the core domain models organized by concern:
//! - Coordinate: sampled positions and the region they are drawn from
//! - Reading: per-API results for one coordinate
//! - Row: the merged record for one successfully collected coordinate

pub mod coordinate;
pub mod reading;
pub mod row;

// Re-export all public types for convenient access
pub use coordinate::{BoundingBox, Coordinate};
pub use reading::{AirQualityReading, Pollutant, WeatherReading, WeatherVariable};
pub use row::{COLUMNS, MergedRow};
