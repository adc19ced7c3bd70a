#![allow(dead_code, clippy::similar_names)]
#![warn(clippy::shadow_reuse, clippy::shadow_same, clippy::builtin_type_shadow)]
mod compass;
mod config;
mod console_sensor;
mod http_handler;
mod logger;
mod provider;
mod timing;

use crate::compass::{BearingMonitor, HeadingFusion};
use crate::config::{AppConfig, ConfigError};
use crate::console_sensor::ConsoleSensor;
use crate::http_handler::{AladhanProvider, HTTPClient};
use crate::timing::{LocalClock, ScheduleMonitor};
use itertools::Itertools;
use std::sync::Arc;

/// One line on stdout: the name of the view and its latest output.
#[derive(serde::Serialize)]
struct OutputLine<'a, T: serde::Serialize> {
    view: &'static str,
    output: &'a T,
}

fn emit<T: serde::Serialize>(view: &'static str, output: &T) {
    match serde_json::to_string(&OutputLine { view, output }) {
        Ok(line) => println!("{line}"),
        Err(e) => error!("Failed to encode the {view} output: {e}"),
    }
}

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() {
    let config = AppConfig::from_env().unwrap_or_else(|e| match e {
        ConfigError::NoLocation => {
            fatal!("No location fix, set MIQAT_LATITUDE and MIQAT_LONGITUDE")
        }
        ConfigError::Invalid(key, value) => fatal!("Invalid value {value:?} for {key}"),
    });
    let client = HTTPClient::new(config.base_url())
        .unwrap_or_else(|e| fatal!("Failed to set up the HTTP client: {e}"));
    let provider = Arc::new(AladhanProvider::new(client));

    let fix = config.location().clone();
    let place = [fix.city(), fix.country()].into_iter().flatten().join(", ");
    info!(
        "Location {:.4}, {:.4} {place}, {} ({} madhhab)",
        fix.latitude(),
        fix.longitude(),
        config.method().name(),
        config.madhhab().name()
    );

    let schedule = ScheduleMonitor::start(
        config.timings_query(),
        config.language(),
        provider.clone(),
        Arc::new(LocalClock),
    );
    let fusion = match config.smoothing() {
        Some(alpha) => HeadingFusion::new(config.axis()).with_smoothing(alpha),
        None => HeadingFusion::new(config.axis()),
    };
    let bearing = BearingMonitor::start(
        fix,
        fusion,
        provider,
        Arc::new(ConsoleSensor),
        config.sensor_interval(),
    );
    info!("Compass axis convention is {}", config.axis());

    let mut schedule_rx = schedule.subscribe();
    let mut bearing_rx = bearing.subscribe();
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Interrupted, shutting down");
                break;
            }
            changed = schedule_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let output = schedule_rx.borrow_and_update().clone();
                emit("schedule", &output);
            }
            changed = bearing_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let output = bearing_rx.borrow_and_update().clone();
                emit("bearing", &output);
            }
        }
    }
    schedule.shutdown().await;
    bearing.shutdown().await;
}
