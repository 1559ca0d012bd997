//! Per-API readings for a single coordinate

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Coordinate;
use crate::FetchError;

/// Pollutant sub-indices reported in the air-quality feed's `iaqi` block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pollutant {
    Pm25,
    Pm10,
    O3,
    No2,
    So2,
    Co,
}

impl Pollutant {
    pub const ALL: [Pollutant; 6] = [
        Pollutant::Pm25,
        Pollutant::Pm10,
        Pollutant::O3,
        Pollutant::No2,
        Pollutant::So2,
        Pollutant::Co,
    ];

    /// Key used both in the upstream `iaqi` block and as the column name
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Pollutant::Pm25 => "pm25",
            Pollutant::Pm10 => "pm10",
            Pollutant::O3 => "o3",
            Pollutant::No2 => "no2",
            Pollutant::So2 => "so2",
            Pollutant::Co => "co",
        }
    }
}

/// Air-quality observation for one coordinate.
///
/// The index and pollutant values are kept as the raw JSON the API returned.
/// The feed occasionally reports `"-"` instead of a number; numeric coercion
/// happens once, in the table assembler.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AirQualityReading {
    pub lat: f64,
    pub lon: f64,
    /// Monitoring station name (`data.city.name`)
    pub station: Option<String>,
    /// Observation time as reported (`data.time.s`)
    pub timestamp: Option<String>,
    pub aqi: Option<Value>,
    pub pm25: Option<Value>,
    pub pm10: Option<Value>,
    pub o3: Option<Value>,
    pub no2: Option<Value>,
    pub so2: Option<Value>,
    pub co: Option<Value>,
}

impl AirQualityReading {
    /// Reading with every observed field absent
    #[must_use]
    pub fn empty(coordinate: Coordinate) -> Self {
        Self {
            lat: coordinate.lat,
            lon: coordinate.lon,
            station: None,
            timestamp: None,
            aqi: None,
            pm25: None,
            pm10: None,
            o3: None,
            no2: None,
            so2: None,
            co: None,
        }
    }

    /// Extract a reading from a geo feed response envelope.
    ///
    /// Returns [`FetchError::Rejected`] unless the envelope's `status` is `"ok"`.
    /// Missing or malformed nested fields become `None`.
    pub fn from_feed(coordinate: Coordinate, feed: &Value) -> Result<Self, FetchError> {
        let status = feed.get("status").and_then(Value::as_str);
        if status != Some("ok") {
            let reason = match feed.get("data") {
                Some(Value::String(message)) => message.clone(),
                _ => format!("status {}", status.unwrap_or("missing")),
            };
            return Err(FetchError::Rejected(reason));
        }

        let data = feed.get("data").unwrap_or(&Value::Null);
        let mut reading = Self::empty(coordinate);
        reading.station = text_at(data, "/city/name");
        reading.timestamp = text_at(data, "/time/s");
        reading.aqi = value_at(data, "/aqi");
        for pollutant in Pollutant::ALL {
            let value = value_at(data, &format!("/iaqi/{}/v", pollutant.key()));
            *reading.pollutant_mut(pollutant) = value;
        }

        Ok(reading)
    }

    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }

    #[must_use]
    pub fn pollutant(&self, pollutant: Pollutant) -> Option<&Value> {
        match pollutant {
            Pollutant::Pm25 => self.pm25.as_ref(),
            Pollutant::Pm10 => self.pm10.as_ref(),
            Pollutant::O3 => self.o3.as_ref(),
            Pollutant::No2 => self.no2.as_ref(),
            Pollutant::So2 => self.so2.as_ref(),
            Pollutant::Co => self.co.as_ref(),
        }
    }

    fn pollutant_mut(&mut self, pollutant: Pollutant) -> &mut Option<Value> {
        match pollutant {
            Pollutant::Pm25 => &mut self.pm25,
            Pollutant::Pm10 => &mut self.pm10,
            Pollutant::O3 => &mut self.o3,
            Pollutant::No2 => &mut self.no2,
            Pollutant::So2 => &mut self.so2,
            Pollutant::Co => &mut self.co,
        }
    }
}

fn value_at(data: &Value, pointer: &str) -> Option<Value> {
    data.pointer(pointer).filter(|v| !v.is_null()).cloned()
}

fn text_at(data: &Value, pointer: &str) -> Option<String> {
    value_at(data, pointer).map(|v| match v {
        Value::String(s) => s,
        other => other.to_string(),
    })
}

/// Variables requested from the weather API's `current` block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherVariable {
    Temperature,
    RelativeHumidity,
    SurfacePressure,
    WindSpeed,
}

impl WeatherVariable {
    pub const ALL: [WeatherVariable; 4] = [
        WeatherVariable::Temperature,
        WeatherVariable::RelativeHumidity,
        WeatherVariable::SurfacePressure,
        WeatherVariable::WindSpeed,
    ];

    /// Upstream variable name
    #[must_use]
    pub fn api_name(self) -> &'static str {
        match self {
            WeatherVariable::Temperature => "temperature_2m",
            WeatherVariable::RelativeHumidity => "relative_humidity_2m",
            WeatherVariable::SurfacePressure => "surface_pressure",
            WeatherVariable::WindSpeed => "wind_speed_10m",
        }
    }

    /// Comma-separated list for the `current` query parameter
    #[must_use]
    pub fn query_list() -> String {
        Self::ALL
            .iter()
            .map(|v| v.api_name())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Current weather conditions for one coordinate
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct WeatherReading {
    /// Air temperature at 2 m in °C
    pub temp: Option<f64>,
    /// Relative humidity at 2 m in %
    pub humidity: Option<f64>,
    /// Surface pressure in hPa
    pub pressure: Option<f64>,
    /// Wind speed at 10 m in km/h
    pub wind: Option<f64>,
}

impl WeatherReading {
    /// Extract the four variables from a forecast response's `current` block.
    #[must_use]
    pub fn from_forecast(forecast: &Value) -> Self {
        let current = forecast.get("current");
        let field = |variable: WeatherVariable| {
            current
                .and_then(|block| block.get(variable.api_name()))
                .and_then(Value::as_f64)
        };

        Self {
            temp: field(WeatherVariable::Temperature),
            humidity: field(WeatherVariable::RelativeHumidity),
            pressure: field(WeatherVariable::SurfacePressure),
            wind: field(WeatherVariable::WindSpeed),
        }
    }
}
