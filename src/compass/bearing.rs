use super::heading::{Heading, normalize_degrees};
use std::fmt::{Display, Formatter};
use strum_macros::Display;

/// Fixed target direction in degrees clockwise from true north, in `[0, 360)`.
/// Constant for the lifetime of a location fix.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, serde::Serialize)]
#[serde(transparent)]
pub struct Bearing(f64);

#[derive(Debug, Display, PartialEq)]
pub enum BearingRangeError {
    NotFinite,
    OutOfRange(f64),
}

impl std::error::Error for BearingRangeError {}

impl Bearing {
    /// Validates a provider supplied bearing. `360.0` is accepted and stored as `0.0`.
    pub fn new(degrees: f64) -> Result<Self, BearingRangeError> {
        if !degrees.is_finite() {
            return Err(BearingRangeError::NotFinite);
        }
        if !(0.0..=360.0).contains(&degrees) {
            return Err(BearingRangeError::OutOfRange(degrees));
        }
        Ok(Self(normalize_degrees(degrees)))
    }

    pub fn degrees(self) -> f64 { self.0 }
}

impl Display for Bearing {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { write!(f, "{:.1}°", self.0) }
}

/// Relation between the device heading and the target bearing.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct BearingState {
    relative_angle: f64,
    angular_distance: f64,
    aligned: bool,
}

impl BearingState {
    /// Clockwise rotation from the heading to the bearing, in `[0, 360)`.
    pub fn relative_angle(&self) -> f64 { self.relative_angle }
    /// Shortest angular distance in `[0, 180]`.
    pub fn angular_distance(&self) -> f64 { self.angular_distance }
    pub fn aligned(&self) -> bool { self.aligned }
}

/// Half-width of the alignment window in degrees (exclusive).
pub const ALIGNMENT_TOLERANCE: f64 = 5.0;

/// Compares the target bearing with the current heading.
///
/// # Arguments
/// * `bearing` – The fixed target bearing.
/// * `heading` – The fused device heading, `None` if the compass is unavailable.
///
/// # Returns
/// - `None` if there is no heading.
/// - The [`BearingState`] otherwise; `aligned` holds if the shortest distance
///   (measured across the 0/360 seam) is below [`ALIGNMENT_TOLERANCE`].
pub fn align(bearing: Bearing, heading: Option<Heading>) -> Option<BearingState> {
    let heading = heading?;
    let relative_angle = normalize_degrees(bearing.degrees() - heading.degrees());
    let angular_distance = relative_angle.min(360.0 - relative_angle);
    Some(BearingState {
        relative_angle,
        angular_distance,
        aligned: angular_distance < ALIGNMENT_TOLERANCE,
    })
}
