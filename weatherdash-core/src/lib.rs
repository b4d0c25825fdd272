//! Core library for the `weatherdash` terminal dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Location resolution (device position, place search, saved places)
//! - OpenWeather acquisition, normalization, and the synthetic fallback
//! - Dashboard state with a pure reducer, and a session that drives it
//!
//! It is used by `weatherdash-cli`, but can also back other front-ends.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod fetch;
pub mod location;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod session;
pub mod synthetic;
pub mod units;

pub use config::{Config, HomeLocation};
pub use dashboard::{ActiveLocation, BackgroundBand, DashboardState, Theme, ViewMode};
pub use error::{LocationError, UpstreamError};
pub use fetch::WeatherFetcher;
pub use location::{LocationRequest, LocationResolver, ResolvedLocation};
pub use model::{
    Alert, AlertSeverity, Condition, Coordinates, DailyPoint, DataSource, HourlyPoint,
    SavedLocation, WeatherSnapshot,
};
pub use session::DashboardSession;
pub use units::{TemperatureUnit, convert_temp};
