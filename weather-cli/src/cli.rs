use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{CustomType, Select, Text};
use std::path::PathBuf;
use tracing::debug;
use weather_dash_core::{Config, Dashboard, TemperatureUnit, UPCOMING_HOURS, WindSpeedUnit};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-dash", version, about = "Terminal weather dashboard")]
pub struct Cli {
    /// Read and write configuration at this path instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively set display units, language and timeout.
    Configure,

    /// Show the dashboard for a city.
    Show {
        /// City name, e.g. "Springfield".
        city: String,

        /// Also print the full hourly and daily tables.
        #[arg(long)]
        raw: bool,

        /// Print the normalized tables as JSON.
        #[arg(long, conflicts_with = "raw")]
        json: bool,

        /// How many upcoming hours to show.
        #[arg(long, default_value_t = UPCOMING_HOURS)]
        hours: usize,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        match self.command {
            Command::Configure => {
                let path = match self.config {
                    Some(path) => path,
                    None => Config::config_file_path()?,
                };
                configure(config, &path)
            }
            Command::Show {
                city,
                raw,
                json,
                hours,
            } => show(&config, &city, raw, json, hours).await,
        }
    }
}

async fn show(
    config: &Config,
    city: &str,
    raw: bool,
    json: bool,
    hours: usize,
) -> anyhow::Result<()> {
    let city = city.trim();
    if city.is_empty() {
        bail!("Please enter a city name.");
    }

    let dashboard = Dashboard::from_config(config)?;
    let data = match dashboard.load(city).await {
        Ok(data) => data,
        Err(err) => {
            let message = err.user_message();
            return Err(anyhow::Error::new(err).context(message));
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    let now = data.location.local_now();
    debug!("Rendering at local time {now}");

    print!("{}", render::dashboard(&data, now, hours)?);
    if raw {
        println!();
        print!("{}", render::raw_tables(&data)?);
    }

    Ok(())
}

fn configure(mut config: Config, path: &std::path::Path) -> anyhow::Result<()> {
    let display = config.units.display;
    config.units.display.temperature =
        Select::new("Temperature unit:", TemperatureUnit::ALL.to_vec())
            .with_starting_cursor(position(&TemperatureUnit::ALL, display.temperature))
            .prompt()
            .context("Failed to read temperature unit")?;

    config.units.display.wind_speed =
        Select::new("Wind speed unit:", WindSpeedUnit::ALL.to_vec())
            .with_starting_cursor(position(&WindSpeedUnit::ALL, display.wind_speed))
            .prompt()
            .context("Failed to read wind speed unit")?;

    let language = config.api.language.clone();
    config.api.language = Text::new("Language for place names:")
        .with_default(&language)
        .prompt()
        .context("Failed to read language")?;

    config.api.timeout_secs = CustomType::<u64>::new("Request timeout (seconds):")
        .with_default(config.api.timeout_secs)
        .with_error_message("Please enter a whole number of seconds")
        .prompt()
        .context("Failed to read timeout")?;

    config.validate()?;
    config.save_to(path)?;

    println!("Saved configuration to {}", path.display());
    Ok(())
}

fn position<T: PartialEq>(all: &[T], current: T) -> usize {
    all.iter().position(|u| *u == current).unwrap_or(0)
}
