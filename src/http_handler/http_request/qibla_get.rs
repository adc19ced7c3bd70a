use super::super::http_response::qibla::QiblaResponse;
use super::request_common::{HTTPRequestMethod, HTTPRequestType, NoBodyHTTPRequestType};

/// `GET /qibla/{latitude}/{longitude}`
#[derive(Debug)]
pub struct QiblaRequest {
    pub latitude: f64,
    pub longitude: f64,
}

impl NoBodyHTTPRequestType for QiblaRequest {}

impl HTTPRequestType for QiblaRequest {
    type Response = QiblaResponse;
    fn endpoint(&self) -> String { format!("/qibla/{}/{}", self.latitude, self.longitude) }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Get }
}
