use super::{
    next_event::{Schedule, ScheduleEntry},
    time_of_day::TimeOfDay,
};

/// Remaining time from `now` until `entry` happens, wrapping over midnight.
pub fn remaining(entry: &ScheduleEntry, now: TimeOfDay) -> TimeOfDay { entry.time() - now }

/// Read-only snapshot of the upcoming event and the time left until it.
/// Recreated on every tick and on every schedule replacement.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct NextEventView {
    entry: ScheduleEntry,
    remaining: TimeOfDay,
}

impl NextEventView {
    /// Builds the view for the `is_next` entry of `schedule`.
    ///
    /// # Returns
    /// - `None` if the schedule is empty.
    pub fn of(schedule: &Schedule, now: TimeOfDay) -> Option<Self> {
        let entry = schedule.next()?;
        Some(Self { entry: entry.clone(), remaining: remaining(entry, now) })
    }

    pub fn entry(&self) -> &ScheduleEntry { &self.entry }
    pub fn label(&self) -> &str { self.entry.label() }
    pub fn remaining(&self) -> TimeOfDay { self.remaining }
}

/// Signals that the previously upcoming event has arrived and the schedule
/// must be re-resolved from a fresh timings fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshDue {
    label: String,
    at: TimeOfDay,
}

impl RefreshDue {
    pub fn label(&self) -> &str { &self.label }
    pub fn at(&self) -> TimeOfDay { self.at }
}

/// Result of one [`CountdownClock::tick`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    view: NextEventView,
    refresh_due: Option<RefreshDue>,
}

impl Countdown {
    pub fn view(&self) -> &NextEventView { &self.view }
    pub fn refresh_due(&self) -> Option<&RefreshDue> { self.refresh_due.as_ref() }
    pub fn into_parts(self) -> (NextEventView, Option<RefreshDue>) { (self.view, self.refresh_due) }
}

/// The upcoming event and its remaining time as seen on the previous tick.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Observation {
    label: String,
    at: TimeOfDay,
    remaining: TimeOfDay,
}

impl Observation {
    fn of(view: &NextEventView) -> Self {
        Self {
            label: view.label().to_string(),
            at: view.entry().time(),
            remaining: view.remaining(),
        }
    }

    fn same_event(&self, other: &Observation) -> bool {
        self.label == other.label && self.at == other.at
    }
}

/// Recomputes the remaining time on every tick and raises a [`RefreshDue`]
/// on the tick where the upcoming event is crossed.
///
/// A crossing is either the remaining time *becoming* zero, or the remaining
/// time of the same event growing between two ticks, which means the clock
/// jumped over the event minute (late timer, suspended device).
/// The trigger is edge based: consecutive zero observations fire only once.
/// The edge state is kept when the schedule is swapped, so a refetch that
/// lands within the same minute does not fire a second time.
#[derive(Debug, Default)]
pub struct CountdownClock {
    last: Option<Observation>,
}

impl CountdownClock {
    pub fn new() -> Self { Self::default() }

    /// Advances the clock to `now`.
    ///
    /// # Arguments
    /// * `schedule` – The current schedule, `None` if nothing was loaded yet.
    /// * `now` – The current local time.
    ///
    /// # Returns
    /// - `None` if there is no schedule or it is empty (the tick is a no-op).
    /// - `Some(Countdown)` with the recomputed view otherwise.
    pub fn tick(&mut self, schedule: Option<&Schedule>, now: TimeOfDay) -> Option<Countdown> {
        let view = NextEventView::of(schedule?, now)?;
        let observed = Observation::of(&view);
        let crossed = match self.last.as_ref() {
            Some(last) if last.remaining.is_zero() => false,
            Some(last) => {
                observed.remaining.is_zero()
                    || (last.same_event(&observed) && observed.remaining > last.remaining)
            }
            None => observed.remaining.is_zero(),
        };
        let refresh_due =
            crossed.then(|| RefreshDue { label: observed.label.clone(), at: observed.at });
        self.last = Some(observed);
        Some(Countdown { view, refresh_due })
    }

    /// Records the upcoming event of a freshly loaded schedule without
    /// raising anything, so that the next tick can tell whether it was crossed.
    pub fn prime(&mut self, schedule: &Schedule, now: TimeOfDay) {
        if let Some(view) = NextEventView::of(schedule, now) {
            self.last = Some(Observation::of(&view));
        }
    }
}
