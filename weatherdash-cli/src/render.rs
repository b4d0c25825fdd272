//! Plain-text rendering of the dashboard state.

use std::fmt::{self, Write};
use weatherdash_core::{
    ActiveLocation, BackgroundBand, DashboardState, ViewMode, WeatherSnapshot, convert_temp,
};

fn band_label(band: BackgroundBand) -> &'static str {
    match band {
        BackgroundBand::Dawn => "dawn",
        BackgroundBand::Morning => "morning",
        BackgroundBand::Afternoon => "afternoon",
        BackgroundBand::Evening => "evening",
        BackgroundBand::Dusk => "dusk",
        BackgroundBand::Night => "night",
    }
}

pub fn dashboard(state: &DashboardState) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_dashboard(&mut out, state);
    out
}

fn write_dashboard(out: &mut impl Write, state: &DashboardState) -> fmt::Result {
    writeln!(
        out,
        "weatherdash · {} theme · {}",
        state.theme,
        band_label(state.background())
    )?;

    match &state.current {
        Some(snapshot) => write_snapshot(out, state, snapshot)?,
        None if state.loading => writeln!(out, "\nLoading weather...")?,
        None => {
            let msg = state.error.as_deref().unwrap_or("No weather loaded yet.");
            writeln!(out, "\n{msg}")?;
        }
    }

    if !state.saved.is_empty() {
        writeln!(out, "\nSaved locations")?;
        for loc in &state.saved {
            let marker = match &state.active_location {
                ActiveLocation::Saved(id) if *id == loc.id => '>',
                _ => ' ',
            };
            writeln!(out, " {marker} {}, {}", loc.name, loc.country)?;
        }
    }

    if let Some(message) = state.visible_notification() {
        writeln!(out, "\n[{message}]")?;
    }

    Ok(())
}

fn write_snapshot(
    out: &mut impl Write,
    state: &DashboardState,
    snap: &WeatherSnapshot,
) -> fmt::Result {
    let unit = state.units;
    let temp = |c: i32| format!("{}{}", convert_temp(c, unit), unit.symbol());

    let source = if snap.is_synthetic() { " (demo data)" } else { "" };
    writeln!(out, "\n{}, {}{}", snap.location, snap.country, source)?;
    writeln!(
        out,
        "  {}  {} - {}",
        temp(snap.temperature),
        snap.condition,
        snap.description
    )?;
    writeln!(
        out,
        "  Feels like {}  Humidity {}%  Wind {} km/h",
        temp(snap.feels_like),
        snap.humidity,
        snap.wind_speed
    )?;
    writeln!(
        out,
        "  Visibility {} km  Pressure {} hPa  UV {}",
        snap.visibility, snap.pressure, snap.uv_index
    )?;
    writeln!(out, "  Sunrise {}  Sunset {}", snap.sunrise, snap.sunset)?;

    match state.view_mode {
        ViewMode::Hourly => {
            writeln!(out, "\nHourly")?;
            for point in &snap.hourly {
                writeln!(
                    out,
                    "  {:>5}  {:>5}  {:<12} {:>3} km/h  {:>3}%",
                    point.time,
                    temp(point.temperature),
                    point.condition.as_str(),
                    point.wind_speed,
                    point.humidity
                )?;
            }
        }
        ViewMode::Daily => {
            writeln!(out, "\nDaily")?;
            for day in &snap.daily {
                writeln!(
                    out,
                    "  {:<12} {:>5} / {:<5}  {:<12} {:>3} km/h  {:>3}%",
                    day.date,
                    temp(day.max_temp),
                    temp(day.min_temp),
                    day.condition.as_str(),
                    day.wind_speed,
                    day.humidity
                )?;
            }
        }
    }

    if let Some(alerts) = snap.alerts.as_ref().filter(|a| !a.is_empty()) {
        writeln!(out, "\nWeather alerts")?;
        for alert in alerts {
            writeln!(
                out,
                "  [{:?}] {} ({})\n    {}",
                alert.severity, alert.title, alert.time, alert.description
            )?;
        }
    }

    Ok(())
}
