use super::time_of_day::TimeOfDay;

/// A single named daily event inside a [`Schedule`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ScheduleEntry {
    label: String,
    time: TimeOfDay,
    is_next: bool,
}

impl ScheduleEntry {
    pub fn label(&self) -> &str { &self.label }
    pub fn time(&self) -> TimeOfDay { self.time }
    pub fn is_next(&self) -> bool { self.is_next }
}

/// The day's ordered list of events, with exactly one entry flagged as next
/// whenever the list is non-empty.
///
/// A [`Schedule`] is only ever produced by [`select`] and is replaced as a
/// whole when new timings arrive.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize)]
pub struct Schedule {
    entries: Vec<ScheduleEntry>,
}

impl Schedule {
    pub fn entries(&self) -> &[ScheduleEntry] { &self.entries }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
    pub fn len(&self) -> usize { self.entries.len() }

    /// Returns the entry flagged as next, `None` for an empty schedule.
    pub fn next(&self) -> Option<&ScheduleEntry> { self.entries.iter().find(|e| e.is_next) }

    /// Index of the entry flagged as next.
    pub fn next_index(&self) -> Option<usize> { self.entries.iter().position(|e| e.is_next) }
}

/// Picks the upcoming event of `table` relative to `now`.
///
/// For every entry the forward distance `(time - now) mod 1440` is computed.
/// The entry with the smallest strictly positive distance becomes next, the
/// earliest declared entry winning ties. If no distance is positive (every
/// entry coincides with `now`) the first entry is next, it rolls over on the
/// following tick.
///
/// # Arguments
/// * `table` – The events in canonical daily order.
/// * `now` – The current local time.
///
/// # Returns
/// A [`Schedule`] mirroring `table` with exactly one `is_next` entry, or an
/// empty schedule for an empty table.
pub fn select<L: AsRef<str>>(table: &[(L, TimeOfDay)], now: TimeOfDay) -> Schedule {
    let next_idx = table
        .iter()
        .map(|(_, time)| *time - now)
        .enumerate()
        .filter(|(_, delta)| !delta.is_zero())
        .min_by_key(|(i, delta)| (*delta, *i))
        .map_or(0, |(i, _)| i);

    let entries = table
        .iter()
        .enumerate()
        .map(|(i, (label, time))| ScheduleEntry {
            label: label.as_ref().to_string(),
            time: *time,
            is_next: i == next_idx,
        })
        .collect();
    Schedule { entries }
}
