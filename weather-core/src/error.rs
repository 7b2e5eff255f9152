use thiserror::Error;

/// Why a location acquisition produced no coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    Denied,
    #[error("Location service unavailable")]
    Unavailable,
    #[error("Location error: {0}")]
    Platform(String),
}

/// Why a forecast fetch produced no weather record.
///
/// Errors carry rendered messages rather than the underlying `reqwest` or
/// `serde_json` values so outcomes can be cloned out of a `watch` channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Invalid forecast request URL: {0}")]
    InvalidUrl(String),
    #[error("Failed to reach forecast API: {0}")]
    Transport(String),
    #[error("Forecast request failed with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Failed to decode forecast response: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transport(err.to_string())
    }
}
