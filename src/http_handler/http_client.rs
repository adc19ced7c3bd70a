use std::time::Duration;

/// A simple wrapper around `reqwest::Client` used to manage HTTP requests
/// with a preconfigured base URL and default settings.
///
/// This client is used for making REST API calls to the timings provider.
/// It sets a fixed timeout and allows easy reuse of the HTTP client infrastructure.
#[derive(Debug, Clone)]
pub struct HTTPClient {
    /// The underlying `reqwest::Client` used to perform HTTP requests.
    client: reqwest::Client,
    /// Base URL for the API without a trailing slash, prepended to all endpoint paths.
    base_url: String,
}

impl HTTPClient {
    /// Per request timeout.
    const TIMEOUT: Duration = Duration::from_secs(10);

    /// Constructs a new `HTTPClient` with the given base URL.
    ///
    /// # Arguments
    /// * `base_url` – The root URL for all HTTP requests (e.g., `"https://api.aladhan.com/v1"`).
    ///
    /// # Returns
    /// A configured `HTTPClient` instance, or the `reqwest::Error` if the TLS
    /// backend could not be initialized.
    pub fn new(base_url: &str) -> Result<HTTPClient, reqwest::Error> {
        Ok(HTTPClient {
            client: reqwest::Client::builder()
                .timeout(Self::TIMEOUT)
                .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
                .build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Returns a reference to the internal `reqwest::Client`.
    pub(super) fn client(&self) -> &reqwest::Client { &self.client }
    /// Returns the base URL that the client was initialized with.
    pub fn url(&self) -> &str { self.base_url.as_str() }
}
