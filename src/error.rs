//! Error types and handling for the collection pipeline

use thiserror::Error;

/// Main error type for the `aircollect` application
#[derive(Error, Debug)]
pub enum CollectorError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Missing or unusable API credential
    #[error("Credential error: {message}")]
    Credential { message: String },

    /// A weather fetch failed while the abort policy was active
    #[error("Weather fetch failed at ({lat:.4}, {lon:.4}): {source}")]
    WeatherAborted {
        lat: f64,
        lon: f64,
        #[source]
        source: FetchError,
    },

    /// CSV serialization errors
    #[error("CSV error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl CollectorError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new credential error
    pub fn credential<S: Into<String>>(message: S) -> Self {
        Self::Credential {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            CollectorError::Config { message } => {
                format!(
                    "Configuration error: {message}. Please check aircollect.toml and AIRCOLLECT__* variables."
                )
            }
            CollectorError::Credential { message } => message.clone(),
            CollectorError::WeatherAborted { lat, lon, .. } => format!(
                "Weather data could not be fetched for ({lat:.4}, {lon:.4}); the run was aborted and no rows were saved."
            ),
            CollectorError::Csv { .. } | CollectorError::Io { .. } => {
                "Writing the dataset failed. Please check the output path and file permissions."
                    .to_string()
            }
            CollectorError::General { message } => message.clone(),
        }
    }
}

/// Failure of a single upstream request for one coordinate
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("API rejected request: {0}")]
    Rejected(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl FetchError {
    /// Transport and HTTP failures are worth a warning; API-level refusals are routine.
    #[must_use]
    pub fn is_reportable(&self) -> bool {
        !matches!(self, FetchError::Rejected(_))
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        // The air-quality URL carries the token
        let err = err.without_url();
        if err.is_decode() {
            FetchError::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = CollectorError::config("bad bbox");
        assert!(matches!(config_err, CollectorError::Config { .. }));

        let credential_err = CollectorError::credential("missing token");
        assert!(matches!(credential_err, CollectorError::Credential { .. }));
    }

    #[test]
    fn test_user_messages() {
        let credential_err = CollectorError::credential("Missing AQI_TOKEN.");
        assert_eq!(credential_err.user_message(), "Missing AQI_TOKEN.");

        let aborted = CollectorError::WeatherAborted {
            lat: 40.0,
            lon: -75.0,
            source: FetchError::Status(500),
        };
        assert!(aborted.user_message().contains("40.0000, -75.0000"));
        assert!(aborted.to_string().contains("HTTP status 500"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CollectorError = io_err.into();
        assert!(matches!(err, CollectorError::Io { .. }));
    }

    #[test]
    fn test_rejections_are_not_reportable() {
        assert!(!FetchError::Rejected("Unknown station".into()).is_reportable());
        assert!(FetchError::Status(503).is_reportable());
        assert!(FetchError::Network("connection refused".into()).is_reportable());
    }
}
