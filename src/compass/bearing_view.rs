use super::{
    bearing::{Bearing, BearingState, align},
    heading::{Heading, HeadingFusion, MagneticSample},
    sensor::{SensorEvent, SensorSource},
};
use crate::config::LocationFix;
use crate::provider::{BearingProvider, ProviderError};
use crate::{error, event, info, warn};
use std::{sync::Arc, time::Duration};
use strum_macros::Display;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

/// Availability of the magnetometer as seen by the bearing view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompassStatus {
    /// Subscribed, no sample received yet.
    Pending,
    Active,
    /// The sensor reported unavailable or could not be subscribed.
    Unavailable,
}

/// Snapshot of the bearing view, replaced as a whole on every update.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct BearingOutput {
    pub bearing: Option<Bearing>,
    pub heading: Option<Heading>,
    #[serde(flatten)]
    pub state: Option<BearingState>,
    pub compass: CompassStatus,
}

impl BearingOutput {
    const INITIAL: BearingOutput =
        BearingOutput { bearing: None, heading: None, state: None, compass: CompassStatus::Pending };
}

/// Handle of a running bearing view. Dropping it (or calling
/// [`BearingView::shutdown`]) cancels the monitor, which drops the sensor
/// subscription.
pub struct BearingView {
    output: watch::Receiver<BearingOutput>,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl BearingView {
    pub fn subscribe(&self) -> watch::Receiver<BearingOutput> { self.output.clone() }

    pub fn current(&self) -> BearingOutput { self.output.borrow().clone() }

    /// Stops the monitor and waits until the subscription is released.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                error!("Bearing monitor ended abnormally: {e}");
            }
        }
    }
}

impl Drop for BearingView {
    fn drop(&mut self) { self.cancel.cancel(); }
}

/// Fuses the magnetometer stream into a heading and compares it against the
/// qibla bearing of the current location fix.
pub struct BearingMonitor {
    fusion: HeadingFusion,
    bearing: Option<Bearing>,
    compass: CompassStatus,
    output: watch::Sender<BearingOutput>,
}

impl BearingMonitor {
    /// Spawns the monitor task and returns its view handle.
    ///
    /// # Arguments
    /// * `fix` – The location the bearing is resolved for.
    /// * `fusion` – Heading fusion configured with the device's axis convention.
    /// * `provider` – The bearing source.
    /// * `sensor` – The magnetometer.
    /// * `sample_interval` – Requested magnetometer update interval.
    pub fn start(
        fix: LocationFix,
        fusion: HeadingFusion,
        provider: Arc<dyn BearingProvider>,
        sensor: Arc<dyn SensorSource>,
        sample_interval: Duration,
    ) -> BearingView {
        let (output_tx, output_rx) = watch::channel(BearingOutput::INITIAL);
        let cancel = CancellationToken::new();
        let monitor =
            Self { fusion, bearing: None, compass: CompassStatus::Pending, output: output_tx };
        let handle =
            tokio::spawn(monitor.run(fix, provider, sensor, sample_interval, cancel.clone()));
        BearingView { output: output_rx, cancel, handle: Some(handle) }
    }

    async fn run(
        mut self,
        fix: LocationFix,
        provider: Arc<dyn BearingProvider>,
        sensor: Arc<dyn SensorSource>,
        sample_interval: Duration,
        cancel: CancellationToken,
    ) {
        let mut bearing_fetch = tokio::spawn(async move { provider.fetch_bearing(&fix).await });
        let mut bearing_pending = true;

        let mut samples = tokio::select! {
            () = cancel.cancelled() => return,
            subscription = sensor.subscribe(sample_interval) => match subscription {
                Ok(rx) => Some(rx),
                Err(e) => {
                    warn!("Compass unavailable: {e:?}");
                    self.set_unavailable();
                    None
                }
            },
        };

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                joined = &mut bearing_fetch, if bearing_pending => {
                    bearing_pending = false;
                    match joined {
                        Ok(result) => self.apply_bearing(result),
                        Err(e) => error!("Bearing fetch task failed: {e}"),
                    }
                }
                sensor_event = next_sensor_event(&mut samples) => match sensor_event {
                    Some(SensorEvent::Sample(sample)) => self.on_sample(sample),
                    Some(SensorEvent::Unavailable) => {
                        warn!("Magnetometer reported unavailable");
                        self.set_unavailable();
                    }
                    None => {
                        warn!("Magnetometer stream closed");
                        samples = None;
                        self.set_unavailable();
                    }
                },
            }
        }
        // `samples` is dropped here, ending the subscription
        info!("Bearing monitor stopped");
    }

    fn apply_bearing(&mut self, result: Result<f64, ProviderError>) {
        match result {
            Ok(raw) => match Bearing::new(raw) {
                Ok(bearing) => {
                    info!("Qibla bearing is {bearing}");
                    self.bearing = Some(bearing);
                    self.publish();
                }
                Err(e) => error!("Rejecting bearing {raw}: {e:?}"),
            },
            Err(e) => warn!("Bearing unavailable: {e:?}"),
        }
    }

    fn on_sample(&mut self, sample: MagneticSample) {
        if self.compass == CompassStatus::Unavailable {
            info!("Magnetometer available again");
        }
        self.compass = CompassStatus::Active;
        match self.fusion.fuse(sample) {
            Some(heading) => event!("Sample ({}, {}) fused to {heading}", sample.x(), sample.y()),
            None => event!("Sample ({}, {}) has no defined angle", sample.x(), sample.y()),
        }
        self.publish();
    }

    fn set_unavailable(&mut self) {
        self.compass = CompassStatus::Unavailable;
        self.fusion.reset();
        self.publish();
    }

    fn publish(&self) {
        let heading = match self.compass {
            CompassStatus::Active => self.fusion.heading(),
            CompassStatus::Pending | CompassStatus::Unavailable => None,
        };
        let state = self.bearing.and_then(|bearing| align(bearing, heading));
        self.output.send_replace(BearingOutput {
            bearing: self.bearing,
            heading,
            state,
            compass: self.compass,
        });
    }
}

/// Next event of the subscription; never resolves without one.
async fn next_sensor_event(
    samples: &mut Option<mpsc::Receiver<SensorEvent>>,
) -> Option<SensorEvent> {
    match samples {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
