//! Drives the dashboard: turns UI events into resolver/fetcher calls and reducer actions.

use chrono::{DateTime, Local};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::{
    Config,
    dashboard::{self, Action, ActiveLocation, DashboardState, RequestToken, ViewMode},
    location::{FixedPosition, LocationRequest, LocationResolver, PositionSource, UnsupportedPosition},
    model::{Coordinates, WeatherSnapshot},
    provider::sources_from_config,
    fetch::WeatherFetcher,
};

pub const CURRENT_LOCATION_LABEL: &str = "Current Location";

pub struct DashboardSession {
    resolver: LocationResolver,
    fetcher: WeatherFetcher,
    state: DashboardState,
    next_token: u64,
    last_saved_id: i64,
}

impl DashboardSession {
    pub fn new(resolver: LocationResolver, fetcher: WeatherFetcher, state: DashboardState) -> Self {
        Self {
            resolver,
            fetcher,
            state,
            next_token: 0,
            last_saved_id: 0,
        }
    }

    /// Wire up OpenWeather (or demo mode), the configured home position and preferences.
    pub fn from_config(config: &Config) -> Self {
        let sources = sources_from_config(config);
        let position: Arc<dyn PositionSource> = match config.home {
            Some(home) => Arc::new(FixedPosition(home.into())),
            None => Arc::new(UnsupportedPosition),
        };

        let resolver = LocationResolver::new(position, sources.geocoder)
            .with_position_timeout(config.geolocation_timeout());
        let fetcher = WeatherFetcher::new(sources.weather);
        let state = DashboardState::new(config.units, config.theme, Local::now());

        Self::new(resolver, fetcher, state)
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    fn dispatch(&mut self, action: Action) {
        let state = std::mem::take(&mut self.state);
        self.state = dashboard::reduce(state, action);
    }

    /// Mark a fetch as in flight. Only the most recent token's completion will be applied.
    pub fn begin_request(&mut self, notice: impl Into<String>) -> RequestToken {
        self.next_token += 1;
        let token = RequestToken(self.next_token);
        self.dispatch(Action::FetchStarted {
            token,
            notice: notice.into(),
        });
        token
    }

    /// Apply a finished fetch, stamped with the time it arrived.
    pub fn complete_request(
        &mut self,
        token: RequestToken,
        snapshot: WeatherSnapshot,
        active: ActiveLocation,
        notice: impl Into<String>,
        clear_search: bool,
    ) {
        self.dispatch(Action::FetchCompleted {
            token,
            now: Local::now(),
            snapshot,
            active,
            notice: notice.into(),
            clear_search,
        });
    }

    pub fn tick(&mut self, now: DateTime<Local>) {
        self.dispatch(Action::Tick(now));
    }

    pub async fn use_current_location(&mut self) {
        self.tick(Local::now());
        let token = self.begin_request("Getting your location...");

        let (snapshot, notice) = match self.resolver.resolve(LocationRequest::CurrentPosition).await {
            Ok(resolved) => {
                let name = resolved.display_name.as_deref();
                let snapshot = self
                    .fetcher
                    .fetch_or_label(
                        resolved.coordinates,
                        name,
                        name.or(Some(CURRENT_LOCATION_LABEL)),
                    )
                    .await;
                let notice = if snapshot.is_synthetic() {
                    "Using demo weather data"
                } else {
                    "Location detected successfully!"
                };
                (snapshot, notice)
            }
            Err(err) => {
                warn!(error = %err, "Current location unavailable");
                (
                    self.fetcher.synthesize(None, Some(CURRENT_LOCATION_LABEL)),
                    "Using demo location data",
                )
            }
        };

        self.complete_request(token, snapshot, ActiveLocation::Current, notice, false);
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.dispatch(Action::SetSearchQuery(query.into()));
    }

    /// Search for the text in `state().search_query`. Blank queries do nothing at all.
    pub async fn search(&mut self) {
        let query = self.state.search_query.trim().to_string();
        if query.is_empty() {
            debug!("Ignoring empty search");
            return;
        }

        self.tick(Local::now());
        let token = self.begin_request("Searching for location...");

        let (snapshot, notice) = match self.resolver.resolve(LocationRequest::Query(query.clone())).await {
            Ok(resolved) => {
                let name = resolved.display_name.unwrap_or_else(|| query.clone());
                let snapshot = self.fetcher.fetch(resolved.coordinates, Some(&name)).await;
                let notice = if snapshot.is_synthetic() {
                    format!("Showing demo data for {name}")
                } else {
                    format!("Weather data loaded for {name}")
                };
                (snapshot, notice)
            }
            Err(err) => {
                warn!(error = %err, "Search failed");
                (
                    self.fetcher.synthesize(None, Some(&query)),
                    format!("Showing demo data for {query}"),
                )
            }
        };

        self.complete_request(token, snapshot, ActiveLocation::Search, notice, true);
    }

    /// Show weather for explicit coordinates, as a search result.
    pub async fn load_coordinates(&mut self, at: Coordinates, name: Option<&str>) {
        self.tick(Local::now());
        let token = self.begin_request(format!("Loading weather for {at}..."));

        let snapshot = self.fetcher.fetch(at, name).await;
        let notice = if snapshot.is_synthetic() {
            "Using demo weather data".to_string()
        } else {
            format!("Weather data loaded for {}", snapshot.location)
        };

        self.complete_request(token, snapshot, ActiveLocation::Search, notice, false);
    }

    /// Re-fetch a saved location. Returns `false` if no saved location has that id.
    pub async fn select_saved(&mut self, id: &str) -> bool {
        let Some(saved) = self.state.saved_location(id).cloned() else {
            return false;
        };

        self.tick(Local::now());
        let token = self.begin_request(format!("Loading weather for {}...", saved.name));

        let active = ActiveLocation::Saved(saved.id.clone());
        let name = saved.name.clone();
        let snapshot = match self.resolver.resolve(LocationRequest::Saved(saved)).await {
            Ok(resolved) => {
                self.fetcher
                    .fetch(resolved.coordinates, resolved.display_name.as_deref())
                    .await
            }
            Err(err) => {
                warn!(error = %err, "Saved location could not be resolved");
                self.fetcher.synthesize(None, Some(&name))
            }
        };

        let notice = if snapshot.is_synthetic() {
            "Using demo weather data".to_string()
        } else {
            format!("Weather data loaded for {name}")
        };

        self.complete_request(token, snapshot, active, notice, false);
        true
    }

    pub fn save_current(&mut self) {
        self.tick(Local::now());
        let id = self.next_saved_id(Local::now().timestamp_millis());
        self.dispatch(Action::SaveCurrent { id });
    }

    pub fn remove_saved(&mut self, id: &str) {
        self.tick(Local::now());
        self.dispatch(Action::RemoveSaved { id: id.to_string() });
    }

    pub fn toggle_theme(&mut self) {
        self.tick(Local::now());
        self.dispatch(Action::ToggleTheme);
    }

    pub fn toggle_units(&mut self) {
        self.tick(Local::now());
        self.dispatch(Action::ToggleUnits);
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.dispatch(Action::SetViewMode(mode));
    }

    /// Creation-time id, bumped so two saves in the same millisecond stay distinct.
    fn next_saved_id(&mut self, now_millis: i64) -> String {
        let id = now_millis.max(self.last_saved_id + 1);
        self.last_saved_id = id;
        id.to_string()
    }
}
