//! Randomized stand-in data for when live weather is unavailable.

use chrono::{DateTime, TimeDelta, TimeZone};
use rand::Rng;
use std::fmt::Display;

use crate::{
    model::{Condition, Coordinates, DailyPoint, DataSource, HourlyPoint, WeatherSnapshot},
    normalize::{HOURLY_POINTS, MAX_DAILY_POINTS},
    units::format_day_label,
};

pub const DEFAULT_LOCATION_NAME: &str = "New York";
pub const PLACEHOLDER_COUNTRY: &str = "US";
pub const PLACEHOLDER_TIMEZONE: i32 = -14_400;
const SUNRISE: &str = "06:30";
const SUNSET: &str = "19:45";

fn pick_condition<R: Rng + ?Sized>(rng: &mut R) -> Condition {
    Condition::SYNTHETIC[rng.random_range(0..Condition::SYNTHETIC.len())]
}

/// Generate a complete snapshot. Every call draws fresh values from `rng`;
/// hourly labels start at `now` and step one hour, daily labels start today.
pub fn synthesize<R, Tz>(
    rng: &mut R,
    at: Option<Coordinates>,
    display_name: Option<&str>,
    now: &DateTime<Tz>,
) -> WeatherSnapshot
where
    R: Rng + ?Sized,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let hourly = (0..HOURLY_POINTS as i64)
        .map(|i| HourlyPoint {
            time: (now.clone() + TimeDelta::hours(i)).format("%H:%M").to_string(),
            temperature: rng.random_range(15..=34),
            condition: pick_condition(rng),
            wind_speed: rng.random_range(5..=24),
            humidity: rng.random_range(40..=79),
        })
        .collect();

    let today = now.date_naive();
    let daily = (0..MAX_DAILY_POINTS as u64)
        .map(|i| DailyPoint {
            date: format_day_label(today + chrono::Days::new(i)),
            max_temp: rng.random_range(25..=39),
            min_temp: rng.random_range(15..=24),
            condition: pick_condition(rng),
            humidity: rng.random_range(40..=79),
            wind_speed: rng.random_range(5..=24),
        })
        .collect();

    let condition = pick_condition(rng);

    WeatherSnapshot {
        location: display_name.unwrap_or(DEFAULT_LOCATION_NAME).to_string(),
        country: PLACEHOLDER_COUNTRY.to_string(),
        coordinates: at,
        temperature: rng.random_range(20..=44),
        feels_like: rng.random_range(22..=46),
        condition,
        description: format!("{condition} skies"),
        humidity: rng.random_range(40..=79),
        wind_speed: rng.random_range(5..=24),
        visibility: rng.random_range(5..=14),
        pressure: rng.random_range(1000..=1099),
        uv_index: rng.random_range(0..=10),
        sunrise: SUNRISE.to_string(),
        sunset: SUNSET.to_string(),
        hourly,
        daily,
        alerts: None,
        timezone: PLACEHOLDER_TIMEZONE,
        source: DataSource::Synthetic,
    }
}
