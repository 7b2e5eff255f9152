use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use inquire::{Confirm, CustomType};
use tracing::debug;
use weather_core::{
    Config, Coordinate, FetchOutcome, FixedLocationSource, ForecastOptions, WeatherPipeline,
    config::MAX_PAST_DAYS,
    provider::{openmeteo::build_request_url, provider_from_options},
};

use crate::display;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather for your location")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store a default location and request options.
    Configure {
        #[command(flatten)]
        location: LocationArgs,

        /// Number of past days to include in the hourly series.
        #[arg(long)]
        past_days: Option<u8>,

        /// Request the hourly series (UV index, forecast temperature).
        #[arg(long, conflicts_with = "current_only")]
        hourly: bool,

        /// Request current conditions only.
        #[arg(long)]
        current_only: bool,
    },

    /// Show the weather for the current location.
    Show {
        #[command(flatten)]
        location: LocationArgs,

        #[command(flatten)]
        request: RequestArgs,
    },

    /// Print the forecast request URL without sending it.
    Url {
        #[command(flatten)]
        location: LocationArgs,

        #[command(flatten)]
        request: RequestArgs,
    },
}

#[derive(Debug, Args)]
pub struct LocationArgs {
    /// Latitude in decimal degrees; defaults to the configured location.
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude in decimal degrees; defaults to the configured location.
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,
}

impl LocationArgs {
    fn coordinate(&self) -> Option<Coordinate> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
            _ => None,
        }
    }
}

#[derive(Debug, Args)]
pub struct RequestArgs {
    /// Request current conditions only, without the hourly series.
    #[arg(long)]
    pub current_only: bool,

    /// Override the configured number of past days.
    #[arg(long)]
    pub past_days: Option<u8>,
}

impl RequestArgs {
    fn apply(&self, mut options: ForecastOptions) -> anyhow::Result<ForecastOptions> {
        if self.current_only {
            options.include_hourly = false;
        }
        if let Some(days) = self.past_days {
            options.past_days = days;
        }
        options.validate()?;
        Ok(options)
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure {
                location,
                past_days,
                hourly,
                current_only,
            } => configure(location, past_days, hourly, current_only),
            Command::Show { location, request } => show(location, request).await,
            Command::Url { location, request } => {
                let config = Config::load()?;
                let coordinate = config.resolve_location(location.coordinate())?;
                let options = request.apply(config.forecast)?;

                println!("{}", build_request_url(&options, coordinate)?);
                Ok(())
            }
        }
    }
}

fn configure(
    location: LocationArgs,
    past_days: Option<u8>,
    hourly: bool,
    current_only: bool,
) -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let coordinate = match location.coordinate() {
        Some(coordinate) => config.resolve_location(Some(coordinate))?,
        None => prompt_location(config.location)?,
    };
    config.set_location(coordinate);

    config.forecast.include_hourly = if hourly || current_only {
        hourly
    } else {
        Confirm::new("Request hourly UV index and forecast temperature?")
            .with_default(config.forecast.include_hourly)
            .prompt()?
    };

    config.forecast.past_days = match past_days {
        Some(days) => days,
        None => CustomType::<u8>::new("Past days to include:")
            .with_default(config.forecast.past_days)
            .with_help_message(&format!("0 to {MAX_PAST_DAYS}"))
            .prompt()?,
    };

    config.save()?;

    println!(
        "Saved configuration to {}",
        Config::config_file_path()?.display()
    );
    Ok(())
}

fn prompt_location(current: Option<Coordinate>) -> anyhow::Result<Coordinate> {
    let mut latitude = CustomType::<f64>::new("Latitude:");
    let mut longitude = CustomType::<f64>::new("Longitude:");
    if let Some(current) = current {
        latitude = latitude.with_default(current.latitude);
        longitude = longitude.with_default(current.longitude);
    }

    let coordinate = Coordinate::new(latitude.prompt()?, longitude.prompt()?);
    if !coordinate.is_valid() {
        bail!("Coordinate out of range: {coordinate}");
    }

    Ok(coordinate)
}

async fn show(location: LocationArgs, request: RequestArgs) -> anyhow::Result<()> {
    let config = Config::load()?;
    let coordinate = config.resolve_location(location.coordinate())?;
    let options = request.apply(config.forecast)?;
    debug!(%coordinate, ?options, "showing weather");

    let pipeline = WeatherPipeline::new(
        Arc::new(FixedLocationSource::new(coordinate)),
        Arc::from(provider_from_options(&options)?),
    );

    pipeline
        .start()
        .await
        .context("Failed to find current location")?;

    match pipeline.refresh().await {
        FetchOutcome::Success(weather) => {
            print!("{}", display::render(&weather));
            Ok(())
        }
        FetchOutcome::Failure(err) => Err(err).context("Failed to fetch weather"),
        FetchOutcome::Pending => bail!("Fetching location..."),
    }
}
