use super::super::{
    HTTPClient, HTTPError,
    http_response::response_common::read_response,
};
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HTTPRequestMethod {
    Get,
}

pub trait HTTPRequestType {
    type Response: serde::de::DeserializeOwned + Send;
    /// Path below the client's base URL, starting with `/`.
    fn endpoint(&self) -> String;
    fn request_method(&self) -> HTTPRequestMethod;
    fn query_params(&self) -> Vec<(&'static str, String)> { Vec::new() }

    fn get_request_base(&self, client: &HTTPClient) -> reqwest::RequestBuilder {
        let url = format!("{}{}", client.url(), self.endpoint());
        let builder = match self.request_method() {
            HTTPRequestMethod::Get => client.client().get(url),
        };
        builder.query(&self.query_params())
    }
}

pub trait NoBodyHTTPRequestType: HTTPRequestType + Sync {
    /// Sends the request and decodes the `data` member of the response envelope.
    fn send_request(
        &self,
        client: &HTTPClient,
    ) -> impl Future<Output = Result<Self::Response, HTTPError>> + Send {
        async move {
            let response = self.get_request_base(client).send().await?;
            Ok(read_response::<Self::Response>(response).await?)
        }
    }
}

#[derive(Debug, Display)]
pub enum RequestError {
    /// The request could not be built, e.g. because of an invalid URL.
    Builder(String),
}

impl std::error::Error for RequestError {}

impl From<reqwest::Error> for RequestError {
    fn from(value: reqwest::Error) -> Self { RequestError::Builder(value.to_string()) }
}
