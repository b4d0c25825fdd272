//! Pure mapping from OpenWeather payloads to a [`WeatherSnapshot`].

use chrono::{NaiveDate, TimeZone};
use std::fmt::Display;

use crate::{
    error::UpstreamError,
    model::{Condition, Coordinates, DailyPoint, DataSource, HourlyPoint, WeatherSnapshot},
    provider::openweather::{OwCurrentResponse, OwForecastEntry, OwForecastResponse, OwWeather},
    units::{format_clock, format_day_label, local_date, metres_to_km, ms_to_kmh, round_temp},
};

pub const HOURLY_POINTS: usize = 8;
pub const MAX_DAILY_POINTS: usize = 7;

/// Build a live snapshot from the two upstream payloads.
///
/// `display_name` wins over the upstream city name. Times and calendar days are rendered
/// in `tz`. The current-conditions endpoint carries no UV data, so the caller supplies it.
pub fn normalize<Tz>(
    at: Coordinates,
    display_name: Option<&str>,
    current: &OwCurrentResponse,
    forecast: &OwForecastResponse,
    tz: &Tz,
    uv_index: u8,
) -> Result<WeatherSnapshot, UpstreamError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let primary = primary_weather(&current.weather, "current")?;

    let hourly = forecast
        .list
        .iter()
        .take(HOURLY_POINTS)
        .map(|entry| hourly_point(entry, tz))
        .collect::<Result<Vec<_>, _>>()?;

    if hourly.len() < HOURLY_POINTS {
        return Err(UpstreamError::parse(
            "forecast",
            format!(
                "expected at least {HOURLY_POINTS} entries, got {}",
                forecast.list.len()
            ),
        ));
    }

    let daily = aggregate_daily(&forecast.list, tz)?;

    let sunrise = format_clock(current.sys.sunrise, tz)
        .ok_or_else(|| UpstreamError::parse("current", "sunrise out of range"))?;
    let sunset = format_clock(current.sys.sunset, tz)
        .ok_or_else(|| UpstreamError::parse("current", "sunset out of range"))?;

    let location = display_name
        .map(str::to_owned)
        .unwrap_or_else(|| current.name.clone());

    Ok(WeatherSnapshot {
        location,
        country: current.sys.country.clone(),
        coordinates: Some(at),
        temperature: round_temp(current.main.temp),
        feels_like: round_temp(current.main.feels_like),
        condition: Condition::from_keyword(&primary.main),
        description: primary.description.clone(),
        humidity: current.main.humidity.min(100),
        wind_speed: ms_to_kmh(current.wind.speed),
        visibility: metres_to_km(current.visibility),
        pressure: current.main.pressure,
        uv_index: uv_index.min(10),
        sunrise,
        sunset,
        hourly,
        daily,
        alerts: None,
        timezone: current.timezone,
        source: DataSource::Live,
    })
}

fn primary_weather<'a>(
    weather: &'a [OwWeather],
    endpoint: &'static str,
) -> Result<&'a OwWeather, UpstreamError> {
    weather
        .first()
        .ok_or_else(|| UpstreamError::parse(endpoint, "entry has no weather condition"))
}

fn hourly_point<Tz>(entry: &OwForecastEntry, tz: &Tz) -> Result<HourlyPoint, UpstreamError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let primary = primary_weather(&entry.weather, "forecast")?;
    let time = format_clock(entry.dt, tz)
        .ok_or_else(|| UpstreamError::parse("forecast", format!("timestamp {} out of range", entry.dt)))?;

    Ok(HourlyPoint {
        time,
        temperature: round_temp(entry.main.temp),
        condition: Condition::from_keyword(&primary.main),
        wind_speed: ms_to_kmh(entry.wind.speed),
        humidity: entry.main.humidity.min(100),
    })
}

/// Running aggregate for one calendar day.
///
/// Only the temperature extremes move after the first entry of the day; condition,
/// humidity and wind stay as seeded.
#[derive(Debug)]
struct DayAccumulator {
    date: NaiveDate,
    max_temp: f64,
    min_temp: f64,
    condition: Condition,
    humidity: u8,
    wind_speed: u32,
}

impl From<DayAccumulator> for DailyPoint {
    fn from(day: DayAccumulator) -> Self {
        DailyPoint {
            date: format_day_label(day.date),
            max_temp: round_temp(day.max_temp),
            min_temp: round_temp(day.min_temp),
            condition: day.condition,
            humidity: day.humidity,
            wind_speed: day.wind_speed,
        }
    }
}

/// Group forecast entries by local calendar date, in the order dates are first seen,
/// keeping at most [`MAX_DAILY_POINTS`] days.
pub fn aggregate_daily<Tz: TimeZone>(
    entries: &[OwForecastEntry],
    tz: &Tz,
) -> Result<Vec<DailyPoint>, UpstreamError> {
    let mut days: Vec<DayAccumulator> = Vec::new();

    for entry in entries {
        let date = local_date(entry.dt, tz).ok_or_else(|| {
            UpstreamError::parse("forecast", format!("timestamp {} out of range", entry.dt))
        })?;

        match days.iter_mut().find(|day| day.date == date) {
            Some(day) => {
                day.max_temp = day.max_temp.max(entry.main.temp_max);
                day.min_temp = day.min_temp.min(entry.main.temp_min);
            }
            None => {
                let primary = primary_weather(&entry.weather, "forecast")?;
                days.push(DayAccumulator {
                    date,
                    max_temp: entry.main.temp_max,
                    min_temp: entry.main.temp_min,
                    condition: Condition::from_keyword(&primary.main),
                    humidity: entry.main.humidity.min(100),
                    wind_speed: ms_to_kmh(entry.wind.speed),
                });
            }
        }
    }

    Ok(days
        .into_iter()
        .take(MAX_DAILY_POINTS)
        .map(DailyPoint::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::openweather::fixtures;
    use chrono::{FixedOffset, Utc};

    fn payloads(entries: usize) -> (OwCurrentResponse, OwForecastResponse) {
        let current = serde_json::from_value(fixtures::current_json()).unwrap();
        let forecast = serde_json::from_value(fixtures::forecast_json(entries)).unwrap();
        (current, forecast)
    }

    fn entry(dt: i64, max: f64, min: f64, main: &str, humidity: u8, wind: f64) -> OwForecastEntry {
        serde_json::from_value(serde_json::json!({
            "dt": dt,
            "main": {
                "temp": (max + min) / 2.0,
                "feels_like": min,
                "temp_min": min,
                "temp_max": max,
                "pressure": 1010,
                "humidity": humidity
            },
            "weather": [{"main": main, "description": main.to_lowercase()}],
            "wind": {"speed": wind}
        }))
        .unwrap()
    }

    fn lisbon() -> Coordinates {
        Coordinates::new(38.72, -9.14)
    }

    #[test]
    fn normalizes_current_conditions() {
        let (current, forecast) = payloads(16);
        let snap = normalize(lisbon(), None, &current, &forecast, &Utc, 4).unwrap();

        assert_eq!(snap.location, "Lisbon");
        assert_eq!(snap.country, "PT");
        assert_eq!(snap.temperature, 22);
        assert_eq!(snap.feels_like, 21);
        assert_eq!(snap.condition, Condition::Clouds);
        assert_eq!(snap.description, "scattered clouds");
        assert_eq!(snap.humidity, 64);
        // 4.1 m/s = 14.76 km/h
        assert_eq!(snap.wind_speed, 15);
        // 9500 m, integer division
        assert_eq!(snap.visibility, 9);
        assert_eq!(snap.pressure, 1015);
        assert_eq!(snap.uv_index, 4);
        assert_eq!(snap.sunrise, "04:30");
        assert_eq!(snap.sunset, "19:10");
        assert_eq!(snap.timezone, 3600);
        assert_eq!(snap.coordinates, Some(lisbon()));
        assert_eq!(snap.source, DataSource::Live);
        assert!(snap.alerts.is_none());
    }

    #[test]
    fn display_name_overrides_upstream_name() {
        let (current, forecast) = payloads(8);
        let snap = normalize(lisbon(), Some("Home"), &current, &forecast, &Utc, 0).unwrap();
        assert_eq!(snap.location, "Home");
    }

    #[test]
    fn sunrise_uses_display_timezone() {
        let (current, forecast) = payloads(8);
        let tz = FixedOffset::east_opt(3600).unwrap();
        let snap = normalize(lisbon(), None, &current, &forecast, &tz, 0).unwrap();
        assert_eq!(snap.sunrise, "05:30");
    }

    #[test]
    fn hourly_takes_first_eight_entries() {
        let (current, forecast) = payloads(40);
        let snap = normalize(lisbon(), None, &current, &forecast, &Utc, 0).unwrap();

        assert_eq!(snap.hourly.len(), HOURLY_POINTS);
        assert_eq!(snap.hourly[0].time, "00:00");
        assert_eq!(snap.hourly[1].time, "03:00");
        assert_eq!(snap.hourly[7].time, "21:00");
        assert_eq!(snap.hourly[0].temperature, 15);
        assert_eq!(snap.hourly[0].condition, Condition::Rain);
        assert_eq!(snap.hourly[0].wind_speed, 9);
    }

    #[test]
    fn short_forecast_is_rejected() {
        let (current, forecast) = payloads(5);
        let err = normalize(lisbon(), None, &current, &forecast, &Utc, 0).unwrap_err();
        assert!(matches!(err, UpstreamError::Parse { endpoint: "forecast", .. }));
    }

    #[test]
    fn current_without_weather_is_rejected() {
        let (mut current, forecast) = payloads(8);
        current.weather.clear();
        assert!(normalize(lisbon(), None, &current, &forecast, &Utc, 0).is_err());
    }

    #[test]
    fn daily_widens_extremes_within_a_day() {
        let day = 1_717_200_000;
        let entries = vec![
            entry(day, 20.0, 12.0, "Clear", 50, 2.0),
            entry(day + 3 * 3600, 28.0, 14.0, "Rain", 90, 8.0),
            entry(day + 6 * 3600, 24.0, 9.0, "Snow", 30, 1.0),
        ];

        let daily = aggregate_daily(&entries, &Utc).unwrap();

        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].max_temp, 28);
        assert_eq!(daily[0].min_temp, 9);
        assert_eq!(daily[0].date, "Sat, Jun 1");
    }

    #[test]
    fn daily_keeps_seed_condition_humidity_and_wind() {
        let day = 1_717_200_000;
        let entries = vec![
            entry(day, 20.0, 12.0, "Clear", 50, 2.0),
            entry(day + 3 * 3600, 28.0, 14.0, "Rain", 90, 8.0),
        ];

        let daily = aggregate_daily(&entries, &Utc).unwrap();

        assert_eq!(daily[0].condition, Condition::Clear);
        assert_eq!(daily[0].humidity, 50);
        assert_eq!(daily[0].wind_speed, 7);
    }

    #[test]
    fn daily_is_capped_at_seven_days_in_encounter_order() {
        let start = 1_717_200_000;
        let entries: Vec<_> = (0..9)
            .map(|d| entry(start + d * 86_400, 20.0 + d as f64, 10.0, "Clouds", 60, 3.0))
            .collect();

        let daily = aggregate_daily(&entries, &Utc).unwrap();

        assert_eq!(daily.len(), MAX_DAILY_POINTS);
        assert_eq!(daily[0].date, "Sat, Jun 1");
        assert_eq!(daily[6].date, "Fri, Jun 7");
        assert_eq!(daily[6].max_temp, 26);
    }

    #[test]
    fn daily_grouping_follows_timezone() {
        // 22:00Z and 23:00Z on Jun 1 fall on Jun 2 at +03:00
        let entries = vec![
            entry(1_717_200_000 + 12 * 3600, 20.0, 10.0, "Clear", 50, 1.0),
            entry(1_717_200_000 + 22 * 3600, 25.0, 11.0, "Clear", 50, 1.0),
        ];
        let tz = FixedOffset::east_opt(3 * 3600).unwrap();

        assert_eq!(aggregate_daily(&entries, &Utc).unwrap().len(), 1);
        assert_eq!(aggregate_daily(&entries, &tz).unwrap().len(), 2);
    }
}
