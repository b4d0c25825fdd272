//! Dashboard view state and the reducer that evolves it.
//!
//! State is replaced wholesale by [`reduce`]; nothing mutates a `DashboardState` in place.
//! Every fetch carries a [`RequestToken`] and a completion is only applied if its token
//! is the most recently issued one, so a slow response can never overwrite a newer one.

use chrono::{DateTime, Local, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::{
    model::{SavedLocation, WeatherSnapshot},
    units::TemperatureUnit,
};

/// How long a notification stays visible, in seconds.
pub const NOTIFICATION_TTL_SECS: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Hourly,
    Daily,
}

/// Which kind of place the current snapshot belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActiveLocation {
    #[default]
    Current,
    Search,
    Saved(String),
}

/// Decorative background picked from the hour of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundBand {
    Dawn,
    Morning,
    Afternoon,
    Evening,
    Dusk,
    Night,
}

impl BackgroundBand {
    pub fn for_hour(hour: u32) -> Self {
        match hour {
            5..=6 => BackgroundBand::Dawn,
            7..=11 => BackgroundBand::Morning,
            12..=16 => BackgroundBand::Afternoon,
            17..=18 => BackgroundBand::Evening,
            19..=20 => BackgroundBand::Dusk,
            _ => BackgroundBand::Night,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestToken(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub expires_at: DateTime<Local>,
}

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub current: Option<WeatherSnapshot>,
    pub loading: bool,
    pub error: Option<String>,
    pub search_query: String,
    pub saved: Vec<SavedLocation>,
    pub active_location: ActiveLocation,
    pub theme: Theme,
    pub units: TemperatureUnit,
    pub view_mode: ViewMode,
    pub notification: Option<Notification>,
    /// Minute-granularity wall clock, advanced by [`Action::Tick`].
    pub clock: DateTime<Local>,
    pub latest_request: RequestToken,
}

impl DashboardState {
    pub fn new(units: TemperatureUnit, theme: Theme, now: DateTime<Local>) -> Self {
        Self {
            units,
            theme,
            clock: now,
            ..Default::default()
        }
    }

    pub fn background(&self) -> BackgroundBand {
        BackgroundBand::for_hour(self.clock.hour())
    }

    /// The notification text, if it has not yet expired.
    pub fn visible_notification(&self) -> Option<&str> {
        self.notification
            .as_ref()
            .filter(|n| self.clock < n.expires_at)
            .map(|n| n.message.as_str())
    }

    pub fn saved_location(&self, id: &str) -> Option<&SavedLocation> {
        self.saved.iter().find(|loc| loc.id == id)
    }

    fn notify(self, message: impl Into<String>) -> Self {
        let notification = Notification {
            message: message.into(),
            expires_at: self.clock + TimeDelta::seconds(NOTIFICATION_TTL_SECS),
        };
        Self {
            notification: Some(notification),
            ..self
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    /// Advance the clock and drop an expired notification.
    Tick(DateTime<Local>),
    SetSearchQuery(String),
    FetchStarted {
        token: RequestToken,
        notice: String,
    },
    /// `now` is when the response landed; its notice is timed from there.
    FetchCompleted {
        token: RequestToken,
        now: DateTime<Local>,
        snapshot: WeatherSnapshot,
        active: ActiveLocation,
        notice: String,
        clear_search: bool,
    },
    SaveCurrent {
        id: String,
    },
    RemoveSaved {
        id: String,
    },
    ToggleTheme,
    ToggleUnits,
    SetViewMode(ViewMode),
    Notify(String),
}

pub fn reduce(state: DashboardState, action: Action) -> DashboardState {
    match action {
        Action::Tick(now) => {
            let notification = state.notification.filter(|n| now < n.expires_at);
            DashboardState {
                clock: now,
                notification,
                ..state
            }
        }

        Action::SetSearchQuery(search_query) => DashboardState {
            search_query,
            ..state
        },

        Action::FetchStarted { token, notice } => DashboardState {
            loading: true,
            error: None,
            latest_request: token,
            ..state
        }
        .notify(notice),

        Action::FetchCompleted {
            token,
            now,
            snapshot,
            active,
            notice,
            clear_search,
        } => {
            if token != state.latest_request {
                debug!(
                    stale = token.0,
                    latest = state.latest_request.0,
                    "Discarding stale weather response"
                );
                return state;
            }

            let search_query = if clear_search {
                String::new()
            } else {
                state.search_query.clone()
            };

            DashboardState {
                current: Some(snapshot),
                active_location: active,
                loading: false,
                search_query,
                clock: now,
                ..state
            }
            .notify(notice)
        }

        Action::SaveCurrent { id } => {
            let Some(snapshot) = state.current.as_ref() else {
                return state;
            };
            let Some(at) = snapshot.coordinates else {
                let message = format!("Cannot save {}: its position is unknown", snapshot.location);
                return state.notify(message);
            };

            let location = SavedLocation {
                id,
                name: snapshot.location.clone(),
                country: snapshot.country.clone(),
                latitude: at.latitude,
                longitude: at.longitude,
            };
            let message = format!("{} saved!", location.name);

            let mut saved = state.saved.clone();
            saved.push(location);
            DashboardState { saved, ..state }.notify(message)
        }

        Action::RemoveSaved { id } => {
            let saved = state
                .saved
                .iter()
                .filter(|loc| loc.id != id)
                .cloned()
                .collect();
            DashboardState { saved, ..state }.notify("Location removed")
        }

        Action::ToggleTheme => {
            let theme = state.theme.toggled();
            DashboardState { theme, ..state }.notify(format!("Switched to {theme} theme"))
        }

        Action::ToggleUnits => {
            let units = state.units.toggled();
            DashboardState { units, ..state }.notify(format!("Units changed to {units}"))
        }

        Action::SetViewMode(view_mode) => DashboardState { view_mode, ..state },

        Action::Notify(message) => state.notify(message),
    }
}
