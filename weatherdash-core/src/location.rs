//! Turning "where am I / where is X / that saved place" into coordinates.

use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc, time::Duration};
use tracing::debug;

use crate::{
    error::LocationError,
    model::{Coordinates, SavedLocation},
    provider::Geocoder,
};

pub const DEFAULT_POSITION_TIMEOUT: Duration = Duration::from_secs(10);

/// Platform hook for the device's own position.
#[async_trait]
pub trait PositionSource: Send + Sync + Debug {
    async fn current_position(&self) -> Result<Coordinates, LocationError>;
}

/// No positioning on this platform.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedPosition;

#[async_trait]
impl PositionSource for UnsupportedPosition {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        Err(LocationError::LocationUnavailable(
            "positioning is not supported; set a home location with `weatherdash configure`"
                .to_string(),
        ))
    }
}

/// A position configured ahead of time (the `[home]` table).
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Coordinates);

#[async_trait]
impl PositionSource for FixedPosition {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        Ok(self.0)
    }
}

#[derive(Debug, Clone)]
pub enum LocationRequest {
    CurrentPosition,
    Query(String),
    Saved(SavedLocation),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    pub coordinates: Coordinates,
    /// `None` for the device position; the caller picks a label.
    pub display_name: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LocationResolver {
    position: Arc<dyn PositionSource>,
    geocoder: Arc<dyn Geocoder>,
    position_timeout: Duration,
}

impl LocationResolver {
    pub fn new(position: Arc<dyn PositionSource>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self {
            position,
            geocoder,
            position_timeout: DEFAULT_POSITION_TIMEOUT,
        }
    }

    pub fn with_position_timeout(mut self, timeout: Duration) -> Self {
        self.position_timeout = timeout;
        self
    }

    pub async fn resolve(&self, request: LocationRequest) -> Result<ResolvedLocation, LocationError> {
        debug!("Resolving location request: {:?}", request);

        match request {
            LocationRequest::CurrentPosition => self.resolve_position().await,
            LocationRequest::Query(query) => self.resolve_query(&query).await,
            LocationRequest::Saved(saved) => Ok(ResolvedLocation {
                coordinates: saved.coordinates(),
                display_name: Some(saved.name),
                country: Some(saved.country),
            }),
        }
    }

    async fn resolve_position(&self) -> Result<ResolvedLocation, LocationError> {
        let coordinates = tokio::time::timeout(self.position_timeout, self.position.current_position())
            .await
            .map_err(|_| {
                LocationError::LocationUnavailable(format!(
                    "position request timed out after {}s",
                    self.position_timeout.as_secs()
                ))
            })??;

        debug!("Current position: {}", coordinates);

        Ok(ResolvedLocation {
            coordinates,
            display_name: None,
            country: None,
        })
    }

    async fn resolve_query(&self, query: &str) -> Result<ResolvedLocation, LocationError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(LocationError::NoMatch);
        }

        debug!("Geocoding location name: {}", query);

        let results = self
            .geocoder
            .geocode(query, 1)
            .await
            .map_err(|e| LocationError::LookupFailed {
                query: query.to_string(),
                reason: e.to_string(),
            })?;

        let first = results
            .into_iter()
            .next()
            .ok_or_else(|| LocationError::LookupFailed {
                query: query.to_string(),
                reason: "no matching places".to_string(),
            })?;

        debug!(
            "Found location: {} ({:.4}, {:.4})",
            first.name, first.lat, first.lon
        );

        Ok(ResolvedLocation {
            coordinates: Coordinates::new(first.lat, first.lon),
            display_name: Some(first.name),
            country: Some(first.country).filter(|c| !c.is_empty()),
        })
    }
}
