use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use tracing::debug;

use skylight_core::{
    CwbClient, Moment, WeatherAggregator, determine_moment,
    location::{AVAILABLE_LOCATIONS, Location, find_location},
    store::{FileStore, SelectionStore},
};

const DEFAULT_CITY: &str = "臺北市";

/// Open-data authorization key the dashboard ships with; override via
/// the CWB_API_KEY environment variable.
const DEMO_API_KEY: &str = "CWB-507B37E0-0383-4D8C-878D-628B54EC3536";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skylight", version, about = "Terminal weather dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the weather card for a city.
    ///
    /// Without an argument, uses the saved selection (or 臺北市).
    Show {
        /// Display name, e.g. "臺北市".
        city: Option<String>,
    },

    /// Pick a city interactively and save it as the default.
    Select,

    /// List the recognized cities.
    Cities,

    /// Print whether it is currently day or night in a city.
    Moment {
        /// Display name; defaults to the saved selection.
        city: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Show { city } => show(city).await,
            Command::Select => select(),
            Command::Cities => {
                for location in AVAILABLE_LOCATIONS {
                    println!("{}", location.city_name);
                }
                Ok(())
            }
            Command::Moment { city } => {
                let location = resolve_city(city)?;
                match determine_moment(location.sunrise_city_name) {
                    Some(moment) => println!("{moment}"),
                    None => println!("unknown"),
                }
                Ok(())
            }
        }
    }
}

/// Argument beats the saved selection beats the default city.
fn resolve_city(city: Option<String>) -> Result<&'static Location> {
    let store = FileStore::open_default()?;
    let name = city
        .or_else(|| store.get())
        .unwrap_or_else(|| DEFAULT_CITY.to_string());

    find_location(&name).ok_or_else(|| {
        anyhow!(
            "Unknown city '{name}'.\n\
             Hint: run `skylight cities` for the recognized names."
        )
    })
}

async fn show(city: Option<String>) -> Result<()> {
    let location = resolve_city(city)?;
    debug!(city = location.city_name, "resolved location");

    let api_key = std::env::var("CWB_API_KEY").unwrap_or_else(|_| DEMO_API_KEY.to_string());
    let aggregator = WeatherAggregator::new(CwbClient::new(api_key));

    aggregator
        .fetch_data(location)
        .await
        .context("Failed to fetch weather data")?;

    let state = aggregator.state();
    let weather = state.weather;

    let moment = match determine_moment(location.sunrise_city_name) {
        Some(Moment::Day) => "☀ day",
        Some(Moment::Night) => "☾ night",
        None => "",
    };

    println!("{}  {moment}", location.city_name);
    println!("{} {}", weather.description, weather.comfortability);
    println!("  temperature  {} °C", weather.temperature);
    println!("  humidity     {}", weather.humid);
    println!("  wind speed   {} m/s", weather.wind_speed);
    println!("  rain         {} %", weather.rain_possibility);
    println!(
        "observed {} · fetched {}",
        weather.observation_time,
        chrono::Local::now().format("%Y-%m-%d %H:%M")
    );

    Ok(())
}

fn select() -> Result<()> {
    let options: Vec<&str> = AVAILABLE_LOCATIONS.iter().map(|l| l.city_name).collect();

    let choice = inquire::Select::new("City:", options)
        .prompt()
        .context("City selection cancelled")?;

    let mut store = FileStore::open_default()?;
    store.set(choice)?;
    println!("Saved {choice} as the default city.");

    Ok(())
}
