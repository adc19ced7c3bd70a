pub mod clock;
pub mod countdown;
pub mod hijri;
pub mod next_event;
pub mod prayer;
pub mod schedule_view;
pub mod time_of_day;
#[cfg(test)]
mod tests;

pub use clock::{Clock, LocalClock};
pub use countdown::{CountdownClock, NextEventView};
pub use next_event::{Schedule, ScheduleEntry, select};
pub use schedule_view::{ScheduleMonitor, ScheduleOutput, ScheduleView};
pub use time_of_day::TimeOfDay;
