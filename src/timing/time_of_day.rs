use regex::Regex;
use std::{
    fmt::{Display, Formatter},
    ops::{Add, Sub},
    sync::LazyLock,
};
use strum_macros::Display;

/// Leading `HH:MM` token of a provider time string. Anything after the first
/// whitespace (e.g. a `(WIB)` timezone marker) is ignored.
static HH_MM_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d{1,2}):(\d{2})(?:\s|$)").unwrap());

/// A wall clock time (or a duration shorter than a day) measured in minutes
/// since local midnight.
///
/// The value is always reduced modulo [`TimeOfDay::MINUTES_PER_DAY`], so
/// subtraction wraps across midnight: `00:10 - 23:50 == 00:20`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TimeOfDay(u16);

#[derive(Debug, Display, PartialEq, Eq)]
pub enum TimeParseError {
    /// The string does not start with an `HH:MM` token.
    Malformed(String),
    /// Hours or minutes are out of range (`24:00`, `12:60`).
    OutOfRange(String),
}

impl std::error::Error for TimeParseError {}

impl TimeOfDay {
    pub const MINUTES_PER_DAY: u16 = 1440;
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);

    /// Creates a [`TimeOfDay`] from a minute count, reducing it modulo one day.
    pub const fn from_minutes(minutes: u32) -> Self {
        Self((minutes % Self::MINUTES_PER_DAY as u32) as u16)
    }

    /// Creates a [`TimeOfDay`] from hours and minutes.
    ///
    /// # Returns
    /// - `None` if `hour > 23` or `minute > 59`.
    pub const fn from_hm(hour: u8, minute: u8) -> Option<Self> {
        if hour > 23 || minute > 59 {
            None
        } else {
            Some(Self(hour as u16 * 60 + minute as u16))
        }
    }

    /// Parses a 24 hour `"HH:MM"` string as delivered by the timings provider.
    ///
    /// # Arguments
    /// * `value` – The raw string, optionally followed by a whitespace separated suffix.
    ///
    /// # Returns
    /// The parsed [`TimeOfDay`] or a [`TimeParseError`].
    pub fn parse_hh_mm(value: &str) -> Result<Self, TimeParseError> {
        let captures = HH_MM_REGEX
            .captures(value)
            .ok_or_else(|| TimeParseError::Malformed(value.to_string()))?;
        let (Some(h), Some(m)) = (captures.get(1), captures.get(2)) else {
            return Err(TimeParseError::Malformed(value.to_string()));
        };
        let hour: u8 =
            h.as_str().parse().map_err(|_| TimeParseError::Malformed(value.to_string()))?;
        let minute: u8 =
            m.as_str().parse().map_err(|_| TimeParseError::Malformed(value.to_string()))?;
        Self::from_hm(hour, minute).ok_or_else(|| TimeParseError::OutOfRange(value.to_string()))
    }

    /// Minutes since midnight.
    pub const fn minutes(self) -> u16 { self.0 }
    pub const fn hour(self) -> u16 { self.0 / 60 }
    pub const fn minute(self) -> u16 { self.0 % 60 }
    pub const fn is_zero(self) -> bool { self.0 == 0 }

    /// Forward distance from `earlier` to `self`, wrapping over midnight.
    pub const fn since(self, earlier: TimeOfDay) -> TimeOfDay {
        TimeOfDay((self.0 + Self::MINUTES_PER_DAY - earlier.0) % Self::MINUTES_PER_DAY)
    }

    /// Renders the value as a 12 hour clock time, e.g. `"5:07 AM"`, `"12:30 PM"`.
    pub fn to_12h(self) -> String {
        let hour = self.hour();
        let am_pm = if hour >= 12 { "PM" } else { "AM" };
        let display_hour = match hour % 12 {
            0 => 12,
            h => h,
        };
        format!("{display_hour}:{:02} {am_pm}", self.minute())
    }
}

impl From<chrono::NaiveTime> for TimeOfDay {
    fn from(value: chrono::NaiveTime) -> Self {
        use chrono::Timelike;
        Self::from_minutes(value.hour() * 60 + value.minute())
    }
}

impl Sub for TimeOfDay {
    type Output = TimeOfDay;

    fn sub(self, rhs: Self) -> Self::Output { self.since(rhs) }
}

impl Add for TimeOfDay {
    type Output = TimeOfDay;

    fn add(self, rhs: Self) -> Self::Output {
        TimeOfDay((self.0 + rhs.0) % Self::MINUTES_PER_DAY)
    }
}

/// Zero padded `HH:MM`, used for both clock times and remaining durations.
impl Display for TimeOfDay {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl serde::Serialize for TimeOfDay {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
