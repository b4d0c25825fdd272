use crate::{
    Config,
    error::UpstreamError,
    model::Coordinates,
    provider::openweather::{
        DEFAULT_BASE_URL, OpenWeatherClient, OwCurrentResponse, OwForecastResponse,
        OwGeocodeResult,
    },
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// Current conditions and forecast for a coordinate pair.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn current(&self, at: Coordinates) -> Result<OwCurrentResponse, UpstreamError>;
    async fn forecast(&self, at: Coordinates) -> Result<OwForecastResponse, UpstreamError>;
}

/// Free-text place name to coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    async fn geocode(&self, query: &str, limit: u8) -> Result<Vec<OwGeocodeResult>, UpstreamError>;
}

/// Stand-in used when no API key is configured; every call fails without touching the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct Offline;

#[async_trait]
impl WeatherSource for Offline {
    async fn current(&self, _at: Coordinates) -> Result<OwCurrentResponse, UpstreamError> {
        Err(UpstreamError::NotConfigured)
    }

    async fn forecast(&self, _at: Coordinates) -> Result<OwForecastResponse, UpstreamError> {
        Err(UpstreamError::NotConfigured)
    }
}

#[async_trait]
impl Geocoder for Offline {
    async fn geocode(&self, _query: &str, _limit: u8) -> Result<Vec<OwGeocodeResult>, UpstreamError> {
        Err(UpstreamError::NotConfigured)
    }
}

/// Weather and geocoding backends selected from config.
#[derive(Debug, Clone)]
pub struct Sources {
    pub weather: Arc<dyn WeatherSource>,
    pub geocoder: Arc<dyn Geocoder>,
}

/// Build the OpenWeather client when an API key is available, otherwise the offline stand-in.
///
/// Running without a key is a supported mode: the dashboard then always shows demo data.
pub fn sources_from_config(config: &Config) -> Sources {
    sources_for_key(config.effective_api_key(), config.base_url.as_deref())
}

pub fn sources_for_key(api_key: Option<String>, base_url: Option<&str>) -> Sources {
    match api_key {
        Some(api_key) => {
            let base_url = base_url.unwrap_or(DEFAULT_BASE_URL);
            let client = Arc::new(OpenWeatherClient::with_base_url(api_key, base_url));
            Sources {
                weather: client.clone(),
                geocoder: client,
            }
        }
        None => {
            tracing::info!("No OpenWeather API key configured; using demo data only");
            Sources {
                weather: Arc::new(Offline),
                geocoder: Arc::new(Offline),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn offline_source_always_fails_with_not_configured() {
        let at = Coordinates::new(0.0, 0.0);
        assert!(matches!(
            Offline.current(at).await,
            Err(UpstreamError::NotConfigured)
        ));
        assert!(matches!(
            Offline.geocode("Paris", 1).await,
            Err(UpstreamError::NotConfigured)
        ));
    }

    #[test]
    fn sources_without_key_are_offline() {
        let sources = sources_for_key(None, None);
        assert!(format!("{:?}", sources.weather).contains("Offline"));
    }

    #[test]
    fn sources_with_key_use_openweather() {
        let sources = sources_for_key(Some("KEY".to_string()), Some("http://localhost:9"));
        assert!(format!("{:?}", sources.weather).contains("OpenWeatherClient"));
    }
}
