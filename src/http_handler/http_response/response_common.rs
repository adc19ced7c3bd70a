use serde::de::DeserializeOwned;
use strum_macros::Display;

/// The `{code, status, data}` wrapper around every provider response.
#[derive(Debug, serde::Deserialize)]
pub struct ApiEnvelope<T> {
    code: u16,
    status: String,
    data: T,
}

impl<T> ApiEnvelope<T> {
    /// Unwraps the payload of a successful envelope.
    ///
    /// # Returns
    /// - `ResponseError::BadRequest` if the envelope carries a non-200 code
    ///   despite a successful HTTP status.
    pub fn into_data(self) -> Result<T, ResponseError> {
        if self.code == 200 {
            Ok(self.data)
        } else {
            Err(ResponseError::BadRequest(format!("{} {}", self.code, self.status)))
        }
    }
}

/// Decodes a response body into the payload of its envelope.
///
/// The envelope is checked before the payload, since error envelopes carry a
/// plain message in `data`.
pub fn decode_envelope<T: DeserializeOwned>(body: &str) -> Result<T, ResponseError> {
    let data = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(body)
        .map_err(|e| ResponseError::InvalidBody(e.to_string()))?
        .into_data()?;
    serde_json::from_value(data).map_err(|e| ResponseError::InvalidBody(e.to_string()))
}

pub(crate) async fn read_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ResponseError> {
    let body = unwrap_return_code(response).await?.text().await?;
    decode_envelope(&body)
}

pub(crate) async fn unwrap_return_code(
    response: reqwest::Response,
) -> Result<reqwest::Response, ResponseError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else if status.is_server_error() {
        Err(ResponseError::InternalServer)
    } else if status.is_client_error() {
        // the provider explains client errors in the envelope's data member
        let detail = match response.json::<ApiEnvelope<serde_json::Value>>().await {
            Ok(envelope) => match envelope.data {
                serde_json::Value::String(message) => message,
                other => other.to_string(),
            },
            Err(_) => status.to_string(),
        };
        Err(ResponseError::BadRequest(detail))
    } else {
        Err(ResponseError::Unknown)
    }
}

#[derive(Debug, Display)]
pub enum ResponseError {
    InternalServer,
    BadRequest(String),
    NoConnection,
    InvalidBody(String),
    Unknown,
}

impl std::error::Error for ResponseError {}
impl From<reqwest::Error> for ResponseError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() || value.is_connect() {
            ResponseError::NoConnection
        } else if value.is_decode() || value.is_body() {
            ResponseError::InvalidBody(value.to_string())
        } else if value.is_status() {
            match value.status() {
                Some(status) if status.is_server_error() => ResponseError::InternalServer,
                _ => ResponseError::Unknown,
            }
        } else {
            ResponseError::Unknown
        }
    }
}
