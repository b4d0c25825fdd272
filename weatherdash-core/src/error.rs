use reqwest::StatusCode;
use thiserror::Error;

/// Failures while turning a location request into coordinates.
#[derive(Debug, Error)]
pub enum LocationError {
    /// Position denied, timed out, or not supported on this platform.
    #[error("Current location unavailable: {0}")]
    LocationUnavailable(String),

    /// The search text was empty after trimming.
    #[error("No search query given")]
    NoMatch,

    /// Geocoding errored or found nothing.
    #[error("Location lookup failed for '{query}': {reason}")]
    LookupFailed { query: String, reason: String },
}

/// Any HTTP, status or parse failure from the weather API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("No API key configured; live weather is disabled")]
    NotConfigured,

    #[error("Failed to send request to OpenWeather ({endpoint}): {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("OpenWeather {endpoint} request failed with status {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("Failed to parse OpenWeather {endpoint} response: {message}")]
    Parse {
        endpoint: &'static str,
        message: String,
    },
}

impl UpstreamError {
    pub fn parse(endpoint: &'static str, message: impl Into<String>) -> Self {
        UpstreamError::Parse {
            endpoint,
            message: message.into(),
        }
    }
}
