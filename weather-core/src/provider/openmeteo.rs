use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::{debug, warn};

use crate::{
    config::ForecastOptions,
    error::FetchError,
    model::{Coordinate, Weather, WeatherResponse},
};

use super::WeatherProvider;

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature";
const HOURLY_FIELDS: &str =
    "temperature_2m,relative_humidity_2m,dew_point_2m,apparent_temperature,uv_index";

const TEMPERATURE_UNIT: &str = "fahrenheit";
const WIND_SPEED_UNIT: &str = "mph";
const PRECIPITATION_UNIT: &str = "inch";

#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    options: ForecastOptions,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new(options: ForecastOptions) -> Self {
        Self {
            options,
            http: Client::new(),
        }
    }

    pub fn options(&self) -> &ForecastOptions {
        &self.options
    }

    pub fn request_url(&self, coordinate: Coordinate) -> Result<Url, FetchError> {
        build_request_url(&self.options, coordinate)
    }
}

/// Build the forecast URL for `coordinate`. Units are fixed to
/// Fahrenheit, mph and inches.
pub fn build_request_url(
    options: &ForecastOptions,
    coordinate: Coordinate,
) -> Result<Url, FetchError> {
    let mut params = vec![
        ("latitude", coordinate.latitude.to_string()),
        ("longitude", coordinate.longitude.to_string()),
        ("current", CURRENT_FIELDS.to_string()),
    ];

    if options.include_hourly {
        params.push(("hourly", HOURLY_FIELDS.to_string()));
    }

    params.extend([
        ("temperature_unit", TEMPERATURE_UNIT.to_string()),
        ("wind_speed_unit", WIND_SPEED_UNIT.to_string()),
        ("precipitation_unit", PRECIPITATION_UNIT.to_string()),
        ("past_days", options.past_days.to_string()),
    ]);

    Url::parse_with_params(&options.endpoint, &params)
        .map_err(|err| FetchError::InvalidUrl(format!("{}: {err}", options.endpoint)))
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn get_weather(&self, coordinate: Coordinate) -> Result<Weather, FetchError> {
        let url = self.request_url(coordinate)?;
        debug!(%url, "requesting forecast");

        let res = self.http.get(url).send().await.map_err(|err| {
            warn!(error = %err, "forecast request failed");
            FetchError::from(err)
        })?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            warn!(%status, "forecast request rejected");
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: WeatherResponse = serde_json::from_str(&body).map_err(|err| {
            warn!(error = %err, "forecast response did not match schema");
            FetchError::from(err)
        })?;

        if self.options.include_hourly && parsed.hourly.is_none() {
            return Err(FetchError::Decode(
                "hourly series requested but missing from response".to_string(),
            ));
        }

        Weather::try_from(parsed)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        let head: String = body.chars().take(MAX).collect();
        format!("{head}...")
    } else {
        body.to_string()
    }
}
