use crate::compass::heading::AxisConvention;
use crate::provider::TimingsQuery;
use crate::timing::prayer::{CalculationMethod, Language, Madhhab};
use std::{str::FromStr, time::Duration};
use strum_macros::Display;

/// A resolved device location. There is no implicit `(0, 0)` fallback: a
/// missing fix is reported as [`ConfigError::NoLocation`].
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct LocationFix {
    latitude: f64,
    longitude: f64,
    city: Option<String>,
    country: Option<String>,
}

impl LocationFix {
    /// Creates a new fix, validating the coordinate ranges.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ConfigError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ConfigError::Invalid("latitude", latitude.to_string()));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ConfigError::Invalid("longitude", longitude.to_string()));
        }
        Ok(Self { latitude, longitude, city: None, country: None })
    }

    pub fn with_place(mut self, city: Option<String>, country: Option<String>) -> Self {
        self.city = city;
        self.country = country;
        self
    }

    pub fn latitude(&self) -> f64 { self.latitude }
    pub fn longitude(&self) -> f64 { self.longitude }
    pub fn city(&self) -> Option<&str> { self.city.as_deref() }
    pub fn country(&self) -> Option<&str> { self.country.as_deref() }
}

#[derive(Debug, Display, PartialEq)]
pub enum ConfigError {
    /// No coordinates were configured.
    NoLocation,
    /// A variable was set but could not be interpreted.
    Invalid(&'static str, String),
}

impl std::error::Error for ConfigError {}

/// Immutable settings handed to both monitors at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    base_url: String,
    location: LocationFix,
    method: CalculationMethod,
    madhhab: Madhhab,
    language: Language,
    axis: AxisConvention,
    smoothing: Option<f64>,
    sensor_interval: Duration,
}

impl AppConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.aladhan.com/v1";
    pub const DEFAULT_SENSOR_INTERVAL: Duration = Duration::from_millis(100);

    /// Reads the configuration from `MIQAT_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// # Arguments
    /// * `lookup` – Returns the raw value of a variable, `None` if unset.
    ///
    /// # Returns
    /// The parsed [`AppConfig`] or the first [`ConfigError`] encountered.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where F: Fn(&str) -> Option<String> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let (Some(lat), Some(lon)) = (get("MIQAT_LATITUDE"), get("MIQAT_LONGITUDE")) else {
            return Err(ConfigError::NoLocation);
        };
        let latitude = parse_var::<f64>("MIQAT_LATITUDE", &lat)?;
        let longitude = parse_var::<f64>("MIQAT_LONGITUDE", &lon)?;
        let location = LocationFix::new(latitude, longitude)?
            .with_place(get("MIQAT_CITY"), get("MIQAT_COUNTRY"));

        let method = match get("MIQAT_METHOD") {
            Some(raw) => {
                let id = parse_var::<u8>("MIQAT_METHOD", &raw)?;
                CalculationMethod::from_id(id).ok_or(ConfigError::Invalid("MIQAT_METHOD", raw))?
            }
            None => CalculationMethod::default(),
        };
        let madhhab = match get("MIQAT_MADHHAB") {
            Some(raw) => {
                let id = parse_var::<u8>("MIQAT_MADHHAB", &raw)?;
                Madhhab::from_id(id).ok_or(ConfigError::Invalid("MIQAT_MADHHAB", raw))?
            }
            None => Madhhab::default(),
        };
        let language = match get("MIQAT_LANGUAGE") {
            Some(raw) => parse_var::<Language>("MIQAT_LANGUAGE", &raw.to_lowercase())?,
            None => Language::default(),
        };
        let axis = match get("MIQAT_AXIS") {
            Some(raw) => parse_var::<AxisConvention>("MIQAT_AXIS", &raw.to_lowercase())?,
            None => AxisConvention::default(),
        };
        let smoothing = match get("MIQAT_SMOOTHING") {
            Some(raw) => {
                let alpha = parse_var::<f64>("MIQAT_SMOOTHING", &raw)?;
                if !(alpha > 0.0 && alpha <= 1.0) {
                    return Err(ConfigError::Invalid("MIQAT_SMOOTHING", raw));
                }
                Some(alpha)
            }
            None => None,
        };
        let sensor_interval = match get("MIQAT_SENSOR_INTERVAL_MS") {
            Some(raw) => match parse_var::<u64>("MIQAT_SENSOR_INTERVAL_MS", &raw)? {
                0 => return Err(ConfigError::Invalid("MIQAT_SENSOR_INTERVAL_MS", raw)),
                ms => Duration::from_millis(ms),
            },
            None => Self::DEFAULT_SENSOR_INTERVAL,
        };

        Ok(Self {
            base_url: get("MIQAT_BASE_URL").unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string()),
            location,
            method,
            madhhab,
            language,
            axis,
            smoothing,
            sensor_interval,
        })
    }

    pub fn base_url(&self) -> &str { &self.base_url }
    pub fn location(&self) -> &LocationFix { &self.location }
    pub fn method(&self) -> CalculationMethod { self.method }
    pub fn madhhab(&self) -> Madhhab { self.madhhab }
    pub fn language(&self) -> Language { self.language }
    pub fn axis(&self) -> AxisConvention { self.axis }
    pub fn smoothing(&self) -> Option<f64> { self.smoothing }
    pub fn sensor_interval(&self) -> Duration { self.sensor_interval }

    /// The timings lookup matching this configuration.
    pub fn timings_query(&self) -> TimingsQuery {
        TimingsQuery {
            latitude: self.location.latitude,
            longitude: self.location.longitude,
            method: self.method.id(),
            madhhab: self.madhhab.id(),
        }
    }
}

fn parse_var<T: FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.parse::<T>().map_err(|_| ConfigError::Invalid(key, raw.to_string()))
}
