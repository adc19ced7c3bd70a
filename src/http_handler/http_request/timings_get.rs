use super::super::http_response::timings::TimingsResponse;
use super::request_common::{HTTPRequestMethod, HTTPRequestType, NoBodyHTTPRequestType};
use crate::provider::TimingsQuery;

/// `GET /timings` for today at the given location.
#[derive(Debug)]
pub struct TimingsRequest {
    pub query: TimingsQuery,
}

impl NoBodyHTTPRequestType for TimingsRequest {}

impl HTTPRequestType for TimingsRequest {
    type Response = TimingsResponse;
    fn endpoint(&self) -> String { String::from("/timings") }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Get }
    fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", self.query.latitude.to_string()),
            ("longitude", self.query.longitude.to_string()),
            ("method", self.query.method.to_string()),
            ("school", self.query.madhhab.to_string()),
        ]
    }
}
