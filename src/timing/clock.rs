use super::time_of_day::TimeOfDay;
#[cfg(test)]
use std::sync::atomic::{AtomicU16, Ordering};

/// Source of the current local wall clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> TimeOfDay;
}

/// The device's local time zone, via `chrono::Local`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> TimeOfDay { TimeOfDay::from(chrono::Local::now().time()) }
}

/// A manually driven clock.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ManualClock(AtomicU16);

#[cfg(test)]
impl ManualClock {
    pub fn new(start: TimeOfDay) -> Self { Self(AtomicU16::new(start.minutes())) }

    pub fn set(&self, time: TimeOfDay) { self.0.store(time.minutes(), Ordering::SeqCst); }

    pub fn advance(&self, minutes: u16) {
        let next = TimeOfDay::from_minutes(u32::from(self.0.load(Ordering::SeqCst)) + u32::from(minutes));
        self.set(next);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> TimeOfDay { TimeOfDay::from_minutes(u32::from(self.0.load(Ordering::SeqCst))) }
}
