use crate::config::LocationFix;
use crate::http_handler::HTTPError;
use crate::timing::{hijri::HijriDate, prayer::Prayer};
use async_trait::async_trait;
use strum_macros::Display;

/// Parameters of a timings lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingsQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub method: u8,
    pub madhhab: u8,
}

/// One raw row of a timings table: the event and its `"HH:MM"` local time
/// exactly as delivered. Parsing happens in the schedule monitor so that a
/// single bad row rejects the whole table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingsRow {
    pub prayer: Prayer,
    pub time: String,
}

/// The day's timings in canonical [`Prayer`] order.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingsTable {
    rows: Vec<TimingsRow>,
    hijri: Option<HijriDate>,
}

impl TimingsTable {
    pub fn new(rows: Vec<TimingsRow>, hijri: Option<HijriDate>) -> Self { Self { rows, hijri } }
    pub fn rows(&self) -> &[TimingsRow] { &self.rows }
    pub fn hijri(&self) -> Option<&HijriDate> { self.hijri.as_ref() }
}

#[derive(Debug, Display)]
pub enum ProviderError {
    /// The transport failed even after the provider's own retries.
    Transport(HTTPError),
    /// The provider answered, but an expected event was missing.
    MissingEvent(Prayer),
}

impl std::error::Error for ProviderError {}

impl From<HTTPError> for ProviderError {
    fn from(value: HTTPError) -> Self { ProviderError::Transport(value) }
}

/// Source of the day's prayer timings for a location.
#[async_trait]
pub trait TimingsProvider: Send + Sync {
    async fn fetch_timings(&self, query: &TimingsQuery) -> Result<TimingsTable, ProviderError>;
}

/// Source of the qibla bearing (degrees from true north) for a location.
#[async_trait]
pub trait BearingProvider: Send + Sync {
    async fn fetch_bearing(&self, fix: &LocationFix) -> Result<f64, ProviderError>;
}
