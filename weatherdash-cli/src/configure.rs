//! `weatherdash configure`: interactive setup written to the config file.

use anyhow::{Result, bail};
use inquire::{Confirm, CustomType, Password, PasswordDisplayMode, Select};
use weatherdash_core::{Config, HomeLocation, TemperatureUnit, Theme};

pub fn run() -> Result<()> {
    let mut config = Config::load()?;

    let key = Password::new("OpenWeather API key (blank keeps the current one):")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;
    if !key.trim().is_empty() {
        config.set_api_key(key);
    } else if config.api_key.is_some()
        && Confirm::new("Remove the stored API key and use demo data only?")
            .with_default(false)
            .prompt()?
    {
        config.api_key = None;
    }

    let units = [TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit];
    let cursor = units.iter().position(|u| *u == config.units).unwrap_or(0);
    config.units = Select::new("Temperature unit:", units.to_vec())
        .with_starting_cursor(cursor)
        .prompt()?;

    let themes = [Theme::Light, Theme::Dark];
    let cursor = themes.iter().position(|t| *t == config.theme).unwrap_or(0);
    config.theme = Select::new("Theme:", themes.to_vec())
        .with_starting_cursor(cursor)
        .prompt()?;

    if Confirm::new("Set a home location for `weatherdash here`?")
        .with_default(config.home.is_none())
        .prompt()?
    {
        let latitude = CustomType::<f64>::new("Latitude:")
            .with_error_message("Please type a number, e.g. 40.71")
            .prompt()?;
        let longitude = CustomType::<f64>::new("Longitude:")
            .with_error_message("Please type a number, e.g. -74.0")
            .prompt()?;
        config.home = Some(validate_home(latitude, longitude)?);
    }

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    if config.effective_api_key().is_none() {
        println!("No API key set: weatherdash will show demo data.");
    }

    Ok(())
}

fn validate_home(latitude: f64, longitude: f64) -> Result<HomeLocation> {
    if !(-90.0..=90.0).contains(&latitude) {
        bail!("Latitude must be between -90 and 90, got {latitude}");
    }
    if !(-180.0..=180.0).contains(&longitude) {
        bail!("Longitude must be between -180 and 180, got {longitude}");
    }
    Ok(HomeLocation {
        latitude,
        longitude,
    })
}
