//! Runs forecast requests in the background and publishes their outcome.
//!
//! Two `watch` channels carry results to observers: one with the outcome of
//! the most recent fetch (pending, success or failure), one with the latest
//! successfully decoded [`Weather`]. A failed fetch only touches the first, so
//! a previously published record survives it.
//!
//! Overlapping fetches are not coordinated: whichever completes last wins.

use std::sync::Arc;
use tokio::{sync::watch, task::JoinHandle};
use tracing::warn;

use crate::{
    model::{Coordinate, FetchOutcome, Weather},
    provider::WeatherProvider,
};

#[derive(Debug, Clone)]
pub struct WeatherFetcher {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    provider: Arc<dyn WeatherProvider>,
    outcome: watch::Sender<FetchOutcome>,
    weather: watch::Sender<Option<Weather>>,
}

impl WeatherFetcher {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        let (outcome, _) = watch::channel(FetchOutcome::Pending);
        let (weather, _) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                provider,
                outcome,
                weather,
            }),
        }
    }

    /// Fetch weather for `coordinate`, publish the outcome and return it.
    pub async fn fetch(&self, coordinate: Coordinate) -> FetchOutcome {
        self.inner.outcome.send_replace(FetchOutcome::Pending);
        self.inner.run(coordinate).await
    }

    /// Like [`fetch`](Self::fetch), but on a background task. Must be called
    /// from within a tokio runtime.
    pub fn spawn_fetch(&self, coordinate: Coordinate) -> JoinHandle<FetchOutcome> {
        self.inner.outcome.send_replace(FetchOutcome::Pending);
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move { inner.run(coordinate).await })
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchOutcome> {
        self.inner.outcome.subscribe()
    }

    pub fn subscribe_weather(&self) -> watch::Receiver<Option<Weather>> {
        self.inner.weather.subscribe()
    }

    pub fn outcome(&self) -> FetchOutcome {
        self.inner.outcome.borrow().clone()
    }

    pub fn latest(&self) -> Option<Weather> {
        self.inner.weather.borrow().clone()
    }
}

impl Inner {
    async fn run(&self, coordinate: Coordinate) -> FetchOutcome {
        let outcome = match self.provider.get_weather(coordinate).await {
            Ok(weather) => {
                self.weather.send_replace(Some(weather.clone()));
                FetchOutcome::Success(weather)
            }
            Err(err) => {
                warn!(error = %err, %coordinate, "weather fetch produced no update");
                FetchOutcome::Failure(err)
            }
        };

        self.outcome.send_replace(outcome.clone());
        outcome
    }
}
