use crate::compass::{MagneticSample, SensorEvent, SensorSource, sensor::SensorError};
use crate::{info, warn};
use async_trait::async_trait;
use std::time::Duration;
use strum_macros::Display;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, BufReader},
    sync::mpsc,
};

#[derive(Debug, Display, PartialEq, Eq)]
pub enum SampleParseError {
    /// Not two whitespace separated numbers.
    Shape(String),
    NotANumber(String),
}

impl std::error::Error for SampleParseError {}

/// Parses one line of the magnetometer feed.
///
/// Accepted lines are `"<x> <y>"` (commas are allowed as separators) and
/// `"unavailable"`.
///
/// # Returns
/// - `Ok(None)` for blank lines and `#` comments.
pub fn parse_line(line: &str) -> Result<Option<SensorEvent>, SampleParseError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    if line.eq_ignore_ascii_case("unavailable") {
        return Ok(Some(SensorEvent::Unavailable));
    }
    let fields: Vec<&str> =
        line.split(|c: char| c.is_whitespace() || c == ',').filter(|f| !f.is_empty()).collect();
    let [x, y] = fields.as_slice() else {
        return Err(SampleParseError::Shape(line.to_string()));
    };
    let parse = |v: &str| v.parse::<f64>().map_err(|_| SampleParseError::NotANumber(v.to_string()));
    Ok(Some(SensorEvent::Sample(MagneticSample::new(parse(*x)?, parse(*y)?))))
}

/// A magnetometer fed line by line through standard input.
///
/// Samples are forwarded no faster than the subscription interval, so a
/// recorded feed piped in replays at sensor rate. The end of input closes the
/// stream.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSensor;

#[async_trait]
impl SensorSource for ConsoleSensor {
    async fn subscribe(
        &self,
        interval: Duration,
    ) -> Result<mpsc::Receiver<SensorEvent>, SensorError> {
        let (tx, rx) = mpsc::channel(1);
        tokio::spawn(pump(BufReader::new(tokio::io::stdin()), tx, interval));
        info!("Reading magnetometer samples from stdin");
        Ok(rx)
    }
}

/// Forwards parsed lines of `reader` into `tx` until the input ends or the
/// subscriber goes away.
pub async fn pump<R>(reader: R, tx: mpsc::Sender<SensorEvent>, interval: Duration)
where R: AsyncBufRead + Unpin {
    let mut lines = reader.lines();
    loop {
        let line = tokio::select! {
            () = tx.closed() => break,
            line = lines.next_line() => line,
        };
        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => {
                info!("Magnetometer feed ended");
                break;
            }
            Err(e) => {
                warn!("Reading the magnetometer feed failed: {e}");
                break;
            }
        };
        let event = match parse_line(&line) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(e) => {
                warn!("Skipping magnetometer line {line:?}: {e:?}");
                continue;
            }
        };
        if tx.send(event).await.is_err() {
            break;
        }
        if matches!(event, SensorEvent::Sample(_)) {
            tokio::time::sleep(interval).await;
        }
    }
}
