use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, instrument};

use crate::{error::UpstreamError, model::Coordinates};

use super::{Geocoder, WeatherSource};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// Client for the free OpenWeatherMap endpoints (current, 5-day forecast, direct geocoding).
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, UpstreamError> {
        let url = format!("{}{}", self.base_url, path);

        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|source| UpstreamError::Transport { endpoint, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| UpstreamError::Transport { endpoint, source })?;

        if !status.is_success() {
            return Err(UpstreamError::Status {
                endpoint,
                status,
                body: truncate_body(&body),
            });
        }

        debug!(endpoint, bytes = body.len(), "OpenWeather response received");

        serde_json::from_str(&body).map_err(|e| UpstreamError::parse(endpoint, e.to_string()))
    }
}

fn coordinate_query(at: Coordinates) -> [(&'static str, String); 3] {
    [
        ("lat", at.latitude.to_string()),
        ("lon", at.longitude.to_string()),
        ("units", "metric".to_string()),
    ]
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    #[instrument(skip(self), level = "debug")]
    async fn current(&self, at: Coordinates) -> Result<OwCurrentResponse, UpstreamError> {
        self.get_json("current", "/data/2.5/weather", &coordinate_query(at))
            .await
    }

    #[instrument(skip(self), level = "debug")]
    async fn forecast(&self, at: Coordinates) -> Result<OwForecastResponse, UpstreamError> {
        self.get_json("forecast", "/data/2.5/forecast", &coordinate_query(at))
            .await
    }
}

#[async_trait]
impl Geocoder for OpenWeatherClient {
    #[instrument(skip(self), level = "debug")]
    async fn geocode(&self, query: &str, limit: u8) -> Result<Vec<OwGeocodeResult>, UpstreamError> {
        self.get_json(
            "geocoding",
            "/geo/1.0/direct",
            &[("q", query.to_string()), ("limit", limit.to_string())],
        )
        .await
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwMain {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: u32,
    pub humidity: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwWeather {
    pub main: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwWind {
    pub speed: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwSys {
    #[serde(default)]
    pub country: String,
    pub sunrise: i64,
    pub sunset: i64,
}

fn default_visibility() -> u32 {
    // OpenWeather caps visibility at 10 km and omits the field in some responses.
    10_000
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwCurrentResponse {
    pub name: String,
    pub main: OwMain,
    pub weather: Vec<OwWeather>,
    pub wind: OwWind,
    #[serde(default = "default_visibility")]
    pub visibility: u32,
    pub sys: OwSys,
    pub timezone: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwForecastEntry {
    pub dt: i64,
    pub main: OwMain,
    pub weather: Vec<OwWeather>,
    pub wind: OwWind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwForecastResponse {
    pub list: Vec<OwForecastEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwGeocodeResult {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub country: String,
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
