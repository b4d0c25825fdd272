use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use weatherdash_core::{Config, Coordinates, DashboardSession, TemperatureUnit, ViewMode};

use crate::{configure, interactive, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherdash", version, about = "Terminal weather dashboard")]
pub struct Cli {
    /// Temperature unit for this run, e.g. "celsius" or "fahrenheit".
    #[arg(long, global = true)]
    pub units: Option<TemperatureUnit>,

    /// Show the 7-day forecast instead of the hourly one.
    #[arg(long, global = true)]
    pub daily: bool,

    /// Print the weather snapshot as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the API key, preferred units, theme and home location.
    Configure,

    /// Show weather for your current (home) location.
    Here,

    /// Search for a place by name and show its weather.
    Search {
        /// City or place name.
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Show weather for explicit coordinates.
    At {
        #[arg(allow_hyphen_values = true)]
        latitude: f64,

        #[arg(allow_hyphen_values = true)]
        longitude: f64,

        /// Label to show instead of the upstream place name.
        #[arg(long)]
        name: Option<String>,
    },

    /// Browse, search and save locations interactively.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let Cli {
            units,
            daily,
            json,
            command,
        } = self;

        let session = match command {
            Command::Configure => return configure::run(),
            Command::Interactive => {
                let mut session = open_session(units, daily)?;
                return interactive::run(&mut session).await;
            }
            Command::Here => {
                let mut session = open_session(units, daily)?;
                session.use_current_location().await;
                session
            }
            Command::Search { query } => {
                let mut session = open_session(units, daily)?;
                session.set_search_query(query.join(" "));
                session.search().await;
                session
            }
            Command::At {
                latitude,
                longitude,
                name,
            } => {
                if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
                    bail!("Coordinates out of range: {latitude}, {longitude}");
                }
                let mut session = open_session(units, daily)?;
                session
                    .load_coordinates(Coordinates::new(latitude, longitude), name.as_deref())
                    .await;
                session
            }
        };

        if json {
            let snapshot = session
                .state()
                .current
                .as_ref()
                .context("No weather snapshot was produced")?;
            println!("{}", serde_json::to_string_pretty(snapshot)?);
        } else {
            println!("{}", render::dashboard(session.state()));
        }

        Ok(())
    }
}

/// Load config, apply per-run overrides and build the session.
fn open_session(units: Option<TemperatureUnit>, daily: bool) -> anyhow::Result<DashboardSession> {
    let mut config = Config::load()?;
    if let Some(units) = units {
        config.units = units;
    }

    let mut session = DashboardSession::from_config(&config);
    if daily {
        session.set_view_mode(ViewMode::Daily);
    }
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_search_with_multiple_words() {
        let cli = Cli::try_parse_from(["weatherdash", "search", "New", "York"]).unwrap();
        match cli.command {
            Command::Search { query } => assert_eq!(query.join(" "), "New York"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_negative_coordinates_and_globals() {
        let cli = Cli::try_parse_from([
            "weatherdash",
            "at",
            "-33.87",
            "151.21",
            "--units",
            "fahrenheit",
            "--daily",
        ])
        .unwrap();

        assert_eq!(cli.units, Some(TemperatureUnit::Fahrenheit));
        assert!(cli.daily);
        match cli.command {
            Command::At {
                latitude,
                longitude,
                name,
            } => {
                assert_eq!(latitude, -33.87);
                assert_eq!(longitude, 151.21);
                assert!(name.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn search_requires_a_query() {
        assert!(Cli::try_parse_from(["weatherdash", "search"]).is_err());
    }

    #[test]
    fn rejects_unknown_units() {
        assert!(Cli::try_parse_from(["weatherdash", "here", "--units", "kelvin"]).is_err());
    }
}
