use super::heading::MagneticSample;
use async_trait::async_trait;
use std::time::Duration;
use strum_macros::Display;
use tokio::sync::mpsc;

/// An item of the magnetometer stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorEvent {
    Sample(MagneticSample),
    /// The sensor explicitly reported that it cannot deliver readings.
    Unavailable,
}

#[derive(Debug, Display)]
pub enum SensorError {
    /// The platform has no magnetometer.
    NotPresent,
    /// Subscribing failed.
    Subscription(String),
}

impl std::error::Error for SensorError {}

/// A magnetometer that can be subscribed to.
///
/// Dropping the returned receiver is the unsubscription; implementations must
/// stop producing once their sender fails.
#[async_trait]
pub trait SensorSource: Send + Sync {
    async fn subscribe(
        &self,
        interval: Duration,
    ) -> Result<mpsc::Receiver<SensorEvent>, SensorError>;
}
