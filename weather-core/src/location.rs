//! One-shot location acquisition over a platform location service.
//!
//! The platform side is a [`LocationSource`]: it is asked for "while in use"
//! authorization, then streams [`LocationEvent`]s once updates are started.
//! [`LocationProvider`] keeps only the first fix of each acquisition and
//! stops the source as soon as it has one.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::{fmt::Debug, sync::Arc};
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use crate::{error::LocationError, model::Coordinate};

/// What a location source reports after updates are started.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationEvent {
    /// One or more fixes, oldest first.
    Updated(Vec<Coordinate>),
    Failed(LocationError),
}

#[async_trait]
pub trait LocationSource: Send + Sync + Debug {
    /// Ask for "while in use" permission. Denial surfaces later as a
    /// [`LocationEvent::Failed`] or as no events at all.
    async fn request_authorization(&self);

    /// Begin continuous updates. The stream ends when the source gives up.
    fn start_updates(&self) -> mpsc::Receiver<LocationEvent>;

    fn stop_updates(&self);
}

#[derive(Debug, Clone, PartialEq)]
pub enum LocationState {
    Idle,
    Requesting,
    HaveCoordinate(Coordinate),
    Failed(LocationError),
}

#[derive(Debug)]
pub struct LocationProvider {
    source: Arc<dyn LocationSource>,
    state: Mutex<LocationState>,
    coordinate: watch::Sender<Option<Coordinate>>,
}

impl LocationProvider {
    pub fn new(source: Arc<dyn LocationSource>) -> Self {
        let (coordinate, _) = watch::channel(None);
        Self {
            source,
            state: Mutex::new(LocationState::Idle),
            coordinate,
        }
    }

    pub async fn request_authorization(&self) {
        self.source.request_authorization().await;
    }

    /// Start updates and resolve with the first fix.
    ///
    /// Updates are stopped as soon as a fix arrives; any further coordinates in
    /// the same batch, or later batches, are dropped. A failure also stops
    /// updates, and is logged and returned without retrying.
    pub async fn start(&self) -> Result<Coordinate, LocationError> {
        *self.state.lock() = LocationState::Requesting;
        let mut events = self.source.start_updates();

        let result = loop {
            match events.recv().await {
                Some(LocationEvent::Updated(batch)) => {
                    // Sources may deliver an empty batch before the first fix.
                    if let Some(first) = batch.first().copied() {
                        break Ok(first);
                    }
                }
                Some(LocationEvent::Failed(err)) => break Err(err),
                None => break Err(LocationError::Unavailable),
            }
        };
        drop(events);
        self.source.stop_updates();

        match result {
            Ok(coordinate) => {
                debug!(%coordinate, "location acquired");
                *self.state.lock() = LocationState::HaveCoordinate(coordinate);
                self.coordinate.send_replace(Some(coordinate));
                Ok(coordinate)
            }
            Err(err) => {
                warn!(error = %err, "failed to find current location");
                *self.state.lock() = LocationState::Failed(err.clone());
                Err(err)
            }
        }
    }

    pub fn state(&self) -> LocationState {
        self.state.lock().clone()
    }

    pub fn coordinate(&self) -> Option<Coordinate> {
        *self.coordinate.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Coordinate>> {
        self.coordinate.subscribe()
    }
}

/// A source that always reports the same position, for hosts without a
/// location service.
#[derive(Debug, Clone)]
pub struct FixedLocationSource {
    coordinate: Coordinate,
}

impl FixedLocationSource {
    pub fn new(coordinate: Coordinate) -> Self {
        Self { coordinate }
    }
}

#[async_trait]
impl LocationSource for FixedLocationSource {
    async fn request_authorization(&self) {}

    fn start_updates(&self) -> mpsc::Receiver<LocationEvent> {
        let (tx, rx) = mpsc::channel(1);
        // Capacity is one and the channel is fresh, so this cannot be full.
        let _ = tx.try_send(LocationEvent::Updated(vec![self.coordinate]));
        rx
    }

    fn stop_updates(&self) {}
}
