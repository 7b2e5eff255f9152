use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    config::ForecastOptions,
    error::FetchError,
    model::{Coordinate, Weather},
    provider::openmeteo::OpenMeteoProvider,
};

pub mod openmeteo;

/// A source of current weather for a coordinate.
///
/// Implementations perform exactly one request per call; retries are left to
/// the caller.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn get_weather(&self, coordinate: Coordinate) -> Result<Weather, FetchError>;
}

/// Construct the forecast provider described by `options`.
pub fn provider_from_options(options: &ForecastOptions) -> anyhow::Result<Box<dyn WeatherProvider>> {
    options.validate()?;
    Ok(Box::new(OpenMeteoProvider::new(options.clone())))
}
