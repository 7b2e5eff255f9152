//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - One-shot location acquisition over a platform location source
//! - The Open-Meteo forecast request and its decoded weather record
//! - A fetcher that publishes fetch outcomes to observers
//! - Configuration stored on disk
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod location;
pub mod model;
pub mod pipeline;
pub mod provider;

pub use config::{Config, ForecastOptions};
pub use error::{FetchError, LocationError};
pub use fetcher::WeatherFetcher;
pub use location::{
    FixedLocationSource, LocationEvent, LocationProvider, LocationSource, LocationState,
};
pub use model::{Coordinate, FetchOutcome, Weather, WeatherResponse};
pub use pipeline::WeatherPipeline;
pub use provider::{WeatherProvider, openmeteo::OpenMeteoProvider};
