#[derive(serde::Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct QiblaResponse {
    latitude: f64,
    longitude: f64,
    direction: f64,
}

impl QiblaResponse {
    pub fn latitude(&self) -> f64 { self.latitude }
    pub fn longitude(&self) -> f64 { self.longitude }
    /// Degrees clockwise from true north.
    pub fn direction(&self) -> f64 { self.direction }
}
