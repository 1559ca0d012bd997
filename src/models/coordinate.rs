//! Coordinate and bounding box models

use serde::{Deserialize, Serialize};

use crate::CollectorError;

/// A sampled (latitude, longitude) pair
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lon: f64,
}

impl Coordinate {
    #[must_use]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Format coordinates with three decimals, as used in progress output
    #[must_use]
    pub fn format_short(&self) -> String {
        format!("lat={:.3}, lon={:.3}", self.lat, self.lon)
    }
}

/// Rectangular sampling region, validated so that `min < max` on both axes
#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    lat_min: f64,
    lat_max: f64,
    lon_min: f64,
    lon_max: f64,
}

impl BoundingBox {
    /// Create a bounding box, rejecting empty, inverted or out-of-range extents.
    pub fn new(
        lat_min: f64,
        lat_max: f64,
        lon_min: f64,
        lon_max: f64,
    ) -> Result<Self, CollectorError> {
        let in_range = |v: f64, limit: f64| v.is_finite() && (-limit..=limit).contains(&v);

        if !in_range(lat_min, 90.0) || !in_range(lat_max, 90.0) || lat_min >= lat_max {
            return Err(CollectorError::config(format!(
                "Invalid latitude range [{lat_min}, {lat_max}]: bounds must lie in [-90, 90] with min < max"
            )));
        }
        if !in_range(lon_min, 180.0) || !in_range(lon_max, 180.0) || lon_min >= lon_max {
            return Err(CollectorError::config(format!(
                "Invalid longitude range [{lon_min}, {lon_max}]: bounds must lie in [-180, 180] with min < max"
            )));
        }

        Ok(Self {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        })
    }

    /// Contiguous United States
    #[must_use]
    pub fn contiguous_us() -> Self {
        Self {
            lat_min: 25.0,
            lat_max: 49.0,
            lon_min: -124.0,
            lon_max: -66.0,
        }
    }

    #[must_use]
    pub fn lat_min(&self) -> f64 {
        self.lat_min
    }

    #[must_use]
    pub fn lat_max(&self) -> f64 {
        self.lat_max
    }

    #[must_use]
    pub fn lon_min(&self) -> f64 {
        self.lon_min
    }

    #[must_use]
    pub fn lon_max(&self) -> f64 {
        self.lon_max
    }

    #[must_use]
    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        (self.lat_min..=self.lat_max).contains(&coordinate.lat)
            && (self.lon_min..=self.lon_max).contains(&coordinate.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_format_short() {
        let coordinate = Coordinate::new(40.123_456, -75.987_654);
        assert_eq!(coordinate.format_short(), "lat=40.123, lon=-75.988");
    }

    #[test]
    fn test_contiguous_us_matches_validated_box() {
        let bbox = BoundingBox::new(25.0, 49.0, -124.0, -66.0).unwrap();
        assert_eq!(bbox, BoundingBox::contiguous_us());
    }

    #[test]
    fn test_contains_is_inclusive() {
        let bbox = BoundingBox::contiguous_us();
        assert!(bbox.contains(&Coordinate::new(25.0, -124.0)));
        assert!(bbox.contains(&Coordinate::new(49.0, -66.0)));
        assert!(!bbox.contains(&Coordinate::new(24.999, -100.0)));
        assert!(!bbox.contains(&Coordinate::new(30.0, -65.0)));
    }

    #[rstest]
    #[case(49.0, 25.0, -124.0, -66.0)]
    #[case(25.0, 25.0, -124.0, -66.0)]
    #[case(25.0, 49.0, -66.0, -124.0)]
    #[case(-91.0, 49.0, -124.0, -66.0)]
    #[case(25.0, 49.0, -181.0, -66.0)]
    #[case(f64::NAN, 49.0, -124.0, -66.0)]
    fn test_rejects_invalid_boxes(
        #[case] lat_min: f64,
        #[case] lat_max: f64,
        #[case] lon_min: f64,
        #[case] lon_max: f64,
    ) {
        assert!(BoundingBox::new(lat_min, lat_max, lon_min, lon_max).is_err());
    }
}
