use serde::{Deserialize, Serialize};
use std::fmt;

/// A point on the globe, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Coarse weather category used for display.
///
/// Anything the upstream reports that is not one of these (mist, haze, smoke, ...)
/// is shown as `Clear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    #[default]
    Clear,
    Clouds,
    Rain,
    Snow,
    Drizzle,
    Thunderstorm,
}

impl Condition {
    /// Categories the synthetic generator draws from.
    pub const SYNTHETIC: [Condition; 4] =
        [Condition::Clear, Condition::Clouds, Condition::Rain, Condition::Snow];

    /// Parse an upstream keyword (`"Rain"`, `"clouds"`, `"sunny"`...), case-insensitively.
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword.trim().to_lowercase().as_str() {
            "clear" | "sunny" => Condition::Clear,
            "clouds" | "cloudy" => Condition::Clouds,
            "rain" | "rainy" => Condition::Rain,
            "snow" | "snowy" => Condition::Snow,
            "drizzle" => Condition::Drizzle,
            "thunderstorm" => Condition::Thunderstorm,
            _ => Condition::Clear,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Clear => "clear",
            Condition::Clouds => "clouds",
            Condition::Rain => "rain",
            Condition::Snow => "snow",
            Condition::Drizzle => "drizzle",
            Condition::Thunderstorm => "thunderstorm",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a snapshot's numbers came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Live,
    Synthetic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Severe,
    Warning,
    Advisory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub severity: AlertSeverity,
    pub title: String,
    pub description: String,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyPoint {
    pub time: String,
    pub temperature: i32,
    pub condition: Condition,
    /// km/h
    pub wind_speed: u32,
    pub humidity: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: String,
    pub max_temp: i32,
    pub min_temp: i32,
    pub condition: Condition,
    pub humidity: u8,
    /// km/h
    pub wind_speed: u32,
}

/// One fully-resolved weather state for a location. Temperatures are whole °C.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location: String,
    pub country: String,
    /// Where the snapshot was fetched for; `None` when no position could be resolved.
    pub coordinates: Option<Coordinates>,
    pub temperature: i32,
    pub feels_like: i32,
    pub condition: Condition,
    pub description: String,
    pub humidity: u8,
    /// km/h
    pub wind_speed: u32,
    /// km
    pub visibility: u32,
    /// hPa
    pub pressure: u32,
    pub uv_index: u8,
    pub sunrise: String,
    pub sunset: String,
    pub hourly: Vec<HourlyPoint>,
    pub daily: Vec<DailyPoint>,
    pub alerts: Option<Vec<Alert>>,
    /// Offset from UTC in seconds.
    pub timezone: i32,
    pub source: DataSource,
}

impl WeatherSnapshot {
    pub fn is_synthetic(&self) -> bool {
        self.source == DataSource::Synthetic
    }
}

/// An in-memory shortcut to re-fetch a known place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedLocation {
    pub id: String,
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl SavedLocation {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}
