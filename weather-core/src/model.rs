use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// Open-Meteo reports local times without seconds or offset.
const OPEN_METEO_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// A device position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Whether both components are within their geographic ranges.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// Wire schema of a forecast response. Fields we don't use are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherResponse {
    pub current: CurrentConditions,
    #[serde(default)]
    pub hourly: Option<HourlySeries>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentConditions {
    #[serde(default)]
    pub time: Option<String>,
    pub temperature_2m: f64,
    pub relative_humidity_2m: f64,
    pub apparent_temperature: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HourlySeries {
    pub temperature_2m: Vec<f64>,
    pub uv_index: Vec<f64>,
}

/// Derived record handed to whoever displays the weather.
///
/// Values are passed through from the response unmodified; rounding is left
/// to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    pub temp: f64,
    pub humidity: f64,
    pub feels_like: f64,
    pub uv: Option<f64>,
    pub temp_forecast: Option<f64>,
    pub observed_at: Option<NaiveDateTime>,
}

impl TryFrom<WeatherResponse> for Weather {
    type Error = FetchError;

    fn try_from(response: WeatherResponse) -> Result<Self, Self::Error> {
        let (uv, temp_forecast) = match response.hourly {
            Some(hourly) => {
                let uv = hourly.uv_index.first().copied().ok_or_else(|| {
                    FetchError::Decode("hourly.uv_index is empty".to_string())
                })?;
                let temp = hourly.temperature_2m.first().copied().ok_or_else(|| {
                    FetchError::Decode("hourly.temperature_2m is empty".to_string())
                })?;
                (Some(uv), Some(temp))
            }
            None => (None, None),
        };

        let observed_at = response
            .current
            .time
            .as_deref()
            .and_then(|t| NaiveDateTime::parse_from_str(t, OPEN_METEO_TIME_FORMAT).ok());

        Ok(Weather {
            temp: response.current.temperature_2m,
            humidity: response.current.relative_humidity_2m,
            feels_like: response.current.apparent_temperature,
            uv,
            temp_forecast,
            observed_at,
        })
    }
}

/// Decode a response body straight into a [`Weather`] record.
pub fn decode_weather(body: &str) -> Result<Weather, FetchError> {
    let response: WeatherResponse = serde_json::from_str(body)?;
    Weather::try_from(response)
}

/// Result of the most recent fetch as seen by observers.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchOutcome {
    /// Nothing has completed yet, or a fetch is in flight.
    #[default]
    Pending,
    Success(Weather),
    Failure(FetchError),
}

impl FetchOutcome {
    pub fn weather(&self) -> Option<&Weather> {
        match self {
            FetchOutcome::Success(weather) => Some(weather),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, FetchOutcome::Pending)
    }
}

impl From<Result<Weather, FetchError>> for FetchOutcome {
    fn from(result: Result<Weather, FetchError>) -> Self {
        match result {
            Ok(weather) => FetchOutcome::Success(weather),
            Err(err) => FetchOutcome::Failure(err),
        }
    }
}
