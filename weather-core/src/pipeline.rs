use std::sync::Arc;

use crate::{
    error::LocationError,
    fetcher::WeatherFetcher,
    location::{LocationProvider, LocationSource},
    model::{Coordinate, FetchOutcome},
    provider::WeatherProvider,
};

/// Location acquisition followed by a weather fetch for that location.
#[derive(Debug)]
pub struct WeatherPipeline {
    location: LocationProvider,
    fetcher: WeatherFetcher,
}

impl WeatherPipeline {
    pub fn new(source: Arc<dyn LocationSource>, provider: Arc<dyn WeatherProvider>) -> Self {
        Self {
            location: LocationProvider::new(source),
            fetcher: WeatherFetcher::new(provider),
        }
    }

    /// Request authorization and acquire a coordinate.
    pub async fn start(&self) -> Result<Coordinate, LocationError> {
        self.location.request_authorization().await;
        self.location.start().await
    }

    /// Fetch weather for the acquired coordinate.
    ///
    /// Without a coordinate there is nothing to fetch, and the result stays
    /// [`FetchOutcome::Pending`]. That includes the case where acquisition
    /// failed, since it is never retried automatically.
    pub async fn refresh(&self) -> FetchOutcome {
        match self.location.coordinate() {
            Some(coordinate) => self.fetcher.fetch(coordinate).await,
            None => FetchOutcome::Pending,
        }
    }

    pub fn location(&self) -> &LocationProvider {
        &self.location
    }

    pub fn fetcher(&self) -> &WeatherFetcher {
        &self.fetcher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::FetchError,
        location::{FixedLocationSource, LocationEvent},
        model::Weather,
    };
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use tokio::sync::mpsc;

    #[derive(Debug, Default)]
    struct RecordingProvider {
        seen: Mutex<Vec<Coordinate>>,
    }

    #[async_trait]
    impl WeatherProvider for RecordingProvider {
        async fn get_weather(&self, coordinate: Coordinate) -> Result<Weather, FetchError> {
            self.seen.lock().push(coordinate);
            Ok(Weather {
                temp: 72.4,
                humidity: 55.0,
                feels_like: 70.1,
                uv: Some(3.2),
                temp_forecast: Some(68.0),
                observed_at: None,
            })
        }
    }

    #[derive(Debug)]
    struct DeniedSource;

    #[async_trait]
    impl LocationSource for DeniedSource {
        async fn request_authorization(&self) {}

        fn start_updates(&self) -> mpsc::Receiver<LocationEvent> {
            let (tx, rx) = mpsc::channel(1);
            let _ = tx.try_send(LocationEvent::Failed(LocationError::Denied));
            rx
        }

        fn stop_updates(&self) {}
    }

    #[tokio::test]
    async fn refresh_before_start_is_pending() {
        let provider = Arc::new(RecordingProvider::default());
        let pipeline = WeatherPipeline::new(
            Arc::new(FixedLocationSource::new(Coordinate::new(1.0, 2.0))),
            provider.clone(),
        );

        assert!(pipeline.refresh().await.is_pending());
        assert!(provider.seen.lock().is_empty());
    }

    #[tokio::test]
    async fn refresh_fetches_for_acquired_coordinate() {
        let here = Coordinate::new(37.7749, -122.4194);
        let provider = Arc::new(RecordingProvider::default());
        let pipeline =
            WeatherPipeline::new(Arc::new(FixedLocationSource::new(here)), provider.clone());

        assert_eq!(pipeline.start().await, Ok(here));
        let outcome = pipeline.refresh().await;

        assert_eq!(outcome.weather().map(|w| w.temp), Some(72.4));
        assert_eq!(*provider.seen.lock(), vec![here]);
        assert_eq!(pipeline.fetcher().latest(), outcome.weather().cloned());
    }

    #[tokio::test]
    async fn denied_location_never_fetches() {
        let provider = Arc::new(RecordingProvider::default());
        let pipeline = WeatherPipeline::new(Arc::new(DeniedSource), provider.clone());

        assert_eq!(pipeline.start().await, Err(LocationError::Denied));
        assert!(pipeline.refresh().await.is_pending());
        assert!(provider.seen.lock().is_empty());
    }
}
