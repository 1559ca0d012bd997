//! Merged record for one collected coordinate

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{AirQualityReading, Coordinate, WeatherReading};

/// Column names in output order
pub const COLUMNS: [&str; 15] = [
    "lat",
    "lon",
    "station",
    "timestamp",
    "aqi",
    "pm25",
    "pm10",
    "o3",
    "no2",
    "so2",
    "co",
    "temp",
    "humidity",
    "pressure",
    "wind",
];

/// Air-quality and weather readings for the same coordinate
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MergedRow {
    pub air_quality: AirQualityReading,
    pub weather: WeatherReading,
}

impl MergedRow {
    #[must_use]
    pub fn merge(air_quality: AirQualityReading, weather: WeatherReading) -> Self {
        Self {
            air_quality,
            weather,
        }
    }

    /// Row whose weather fetch failed; weather columns stay missing
    #[must_use]
    pub fn without_weather(air_quality: AirQualityReading) -> Self {
        Self::merge(air_quality, WeatherReading::default())
    }

    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        self.air_quality.coordinate()
    }

    /// Raw value of a column, `Value::Null` when absent or unknown
    #[must_use]
    pub fn value(&self, column: &str) -> Value {
        let aq = &self.air_quality;
        let wx = &self.weather;
        let number = |v: Option<f64>| v.map_or(Value::Null, Value::from);
        let raw = |v: &Option<Value>| v.clone().unwrap_or(Value::Null);
        let text = |v: &Option<String>| v.clone().map_or(Value::Null, Value::String);

        match column {
            "lat" => Value::from(aq.lat),
            "lon" => Value::from(aq.lon),
            "station" => text(&aq.station),
            "timestamp" => text(&aq.timestamp),
            "aqi" => raw(&aq.aqi),
            "pm25" => raw(&aq.pm25),
            "pm10" => raw(&aq.pm10),
            "o3" => raw(&aq.o3),
            "no2" => raw(&aq.no2),
            "so2" => raw(&aq.so2),
            "co" => raw(&aq.co),
            "temp" => number(wx.temp),
            "humidity" => number(wx.humidity),
            "pressure" => number(wx.pressure),
            "wind" => number(wx.wind),
            _ => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_values_cover_every_column() {
        let mut aq = AirQualityReading::empty(Coordinate::new(40.0, -75.0));
        aq.station = Some("Station".into());
        aq.aqi = Some(json!("-"));
        let wx = WeatherReading {
            temp: Some(20.5),
            ..WeatherReading::default()
        };

        let row = MergedRow::merge(aq, wx);
        assert_eq!(row.value("lat"), json!(40.0));
        assert_eq!(row.value("station"), json!("Station"));
        assert_eq!(row.value("aqi"), json!("-"));
        assert_eq!(row.value("pm25"), Value::Null);
        assert_eq!(row.value("temp"), json!(20.5));
        assert_eq!(row.value("wind"), Value::Null);
        assert_eq!(row.value("unknown"), Value::Null);
    }

    #[test]
    fn test_without_weather_keeps_air_quality() {
        let aq = AirQualityReading::empty(Coordinate::new(30.0, -100.0));
        let row = MergedRow::without_weather(aq.clone());
        assert_eq!(row.air_quality, aq);
        assert_eq!(row.coordinate(), Coordinate::new(30.0, -100.0));
        for column in ["temp", "humidity", "pressure", "wind"] {
            assert_eq!(row.value(column), Value::Null);
        }
    }
}
