use crate::provider::{ProviderError, TimingsRow, TimingsTable};
use crate::timing::{hijri::HijriDate, prayer::Prayer};
use std::collections::HashMap;
use strum::IntoEnumIterator;

#[derive(serde::Deserialize, Debug)]
pub struct TimingsResponse {
    /// Event name to local `"HH:MM"`, including events we do not display
    /// (Imsak, Sunset, Midnight, ...).
    timings: HashMap<String, String>,
    date: TimingsDate,
}

#[derive(serde::Deserialize, Debug)]
struct TimingsDate {
    readable: String,
    #[serde(default)]
    hijri: Option<HijriDate>,
}

impl TimingsResponse {
    pub fn timings(&self) -> &HashMap<String, String> { &self.timings }
    pub fn readable_date(&self) -> &str { &self.date.readable }
    pub fn hijri(&self) -> Option<&HijriDate> { self.date.hijri.as_ref() }

    /// Picks the displayed prayers out of the response, in canonical order.
    ///
    /// # Returns
    /// - `ProviderError::MissingEvent` for the first prayer the response lacks.
    pub fn into_table(self) -> Result<TimingsTable, ProviderError> {
        let rows = Prayer::iter()
            .map(|prayer| {
                self.timings
                    .get(prayer.name_en())
                    .map(|time| TimingsRow { prayer, time: time.clone() })
                    .ok_or(ProviderError::MissingEvent(prayer))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TimingsTable::new(rows, self.date.hijri))
    }
}
