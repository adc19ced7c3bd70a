use std::fmt::{Display, Formatter};
use strum_macros::{Display, EnumString};

/// Reduces any finite angle to `[0, 360)`.
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid may round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// One raw 2-axis magnetometer reading in the sensor's own axis frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagneticSample {
    x: f64,
    y: f64,
}

impl MagneticSample {
    pub const fn new(x: f64, y: f64) -> Self { Self { x, y } }
    pub const fn x(&self) -> f64 { self.x }
    pub const fn y(&self) -> f64 { self.y }

    /// `atan2(y, x)` in degrees, normalized to `[0, 360)`.
    ///
    /// # Returns
    /// - `None` for the zero vector and for non-finite components, whose
    ///   angle is undefined.
    pub fn raw_angle(&self) -> Option<f64> {
        let defined = self.x.is_finite() && self.y.is_finite() && (self.x != 0.0 || self.y != 0.0);
        defined.then(|| normalize_degrees(self.y.atan2(self.x).to_degrees()))
    }
}

/// Axis convention reported by the magnetometer, selecting the calibration
/// applied to the raw angle.
///
/// The offsets are empirical device-axis corrections, not a tilt or
/// declination model. Replace them if the sensor API reports a different
/// axis layout.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Display, EnumString)]
pub enum AxisConvention {
    /// Clockwise-positive frame (historically iOS): `heading = 360 - raw`.
    #[strum(serialize = "inverted", serialize = "ios")]
    Inverted,
    /// Frame rotated by a quarter turn (historically Android): `heading = raw + 90`.
    #[default]
    #[strum(serialize = "quarter-turn", serialize = "android")]
    QuarterTurn,
}

impl AxisConvention {
    /// Maps a normalized raw angle into a compass heading.
    pub fn calibrate(self, raw: f64) -> f64 {
        match self {
            AxisConvention::Inverted => normalize_degrees(360.0 - raw),
            AxisConvention::QuarterTurn => normalize_degrees(raw + 90.0),
        }
    }
}

/// Device facing direction in degrees clockwise from north, always in `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, serde::Serialize)]
#[serde(transparent)]
pub struct Heading(f64);

impl Heading {
    /// Creates a heading from any finite angle, normalizing it.
    pub fn from_degrees(angle: f64) -> Option<Self> {
        angle.is_finite().then(|| Self(normalize_degrees(angle)))
    }

    pub fn degrees(self) -> f64 { self.0 }
}

impl Display for Heading {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { write!(f, "{:.1}°", self.0) }
}

/// Fuses a single sample without any filtering.
///
/// # Returns
/// - `None` if the sample's angle is undefined.
pub fn fuse(sample: MagneticSample, axis: AxisConvention) -> Option<Heading> {
    Heading::from_degrees(axis.calibrate(sample.raw_angle()?))
}

/// Turns raw magnetometer samples into headings.
///
/// Without smoothing every accepted sample replaces the previous heading.
/// With smoothing an exponential moving average is applied to the heading's
/// unit vector, so 359° and 1° average to 0° instead of 180°.
#[derive(Debug, Clone)]
pub struct HeadingFusion {
    axis: AxisConvention,
    smoothing: Option<f64>,
    /// Smoothed (cos, sin) of the heading
    filtered: Option<(f64, f64)>,
    current: Option<Heading>,
}

impl HeadingFusion {
    pub fn new(axis: AxisConvention) -> Self {
        Self { axis, smoothing: None, filtered: None, current: None }
    }

    /// Enables the low-pass filter.
    ///
    /// # Arguments
    /// * `alpha` – Weight of the newest sample in `(0, 1]`; `1.0` disables filtering.
    ///   Values outside the range are clamped into it.
    pub fn with_smoothing(mut self, alpha: f64) -> Self {
        let alpha = if alpha.is_finite() { alpha.clamp(f64::EPSILON, 1.0) } else { 1.0 };
        self.smoothing = Some(alpha);
        self
    }

    pub fn axis(&self) -> AxisConvention { self.axis }

    /// The last fused heading, `None` until the first valid sample.
    pub fn heading(&self) -> Option<Heading> { self.current }

    /// Fuses a sample into the current heading.
    ///
    /// # Returns
    /// - The new heading, or `None` if the sample has no defined angle (the
    ///   previous heading is kept in that case).
    pub fn fuse(&mut self, sample: MagneticSample) -> Option<Heading> {
        let calibrated = fuse(sample, self.axis)?;
        let heading = match self.smoothing {
            None => calibrated.degrees(),
            Some(alpha) => {
                let rad = calibrated.degrees().to_radians();
                let (c, s) = (rad.cos(), rad.sin());
                let (fc, fs) = match self.filtered {
                    Some((pc, ps)) => (pc + alpha * (c - pc), ps + alpha * (s - ps)),
                    None => (c, s),
                };
                self.filtered = Some((fc, fs));
                if fc == 0.0 && fs == 0.0 {
                    calibrated.degrees()
                } else {
                    fs.atan2(fc).to_degrees()
                }
            }
        };
        self.current = Heading::from_degrees(heading);
        self.current
    }

    /// Forgets all state, e.g. after the sensor became unavailable.
    pub fn reset(&mut self) {
        self.filtered = None;
        self.current = None;
    }
}
