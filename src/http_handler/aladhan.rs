use super::{
    HTTPClient, HTTPError,
    http_request::{
        qibla_get::QiblaRequest,
        request_common::{HTTPRequestType, NoBodyHTTPRequestType},
        timings_get::TimingsRequest,
    },
};
use crate::config::LocationFix;
use crate::provider::{BearingProvider, ProviderError, TimingsProvider, TimingsQuery, TimingsTable};
use crate::{event, warn};
use async_trait::async_trait;
use std::time::Duration;

/// Timings and qibla bearing from the Aladhan REST API.
///
/// Transient failures (no connection, server errors) are retried a bounded
/// number of times with a fixed back-off before they are reported.
#[derive(Debug, Clone)]
pub struct AladhanProvider {
    client: HTTPClient,
    max_attempts: u8,
    retry_backoff: Duration,
}

impl AladhanProvider {
    pub const MAX_ATTEMPTS: u8 = 3;
    pub const RETRY_BACKOFF: Duration = Duration::from_secs(2);

    pub fn new(client: HTTPClient) -> Self {
        Self { client, max_attempts: Self::MAX_ATTEMPTS, retry_backoff: Self::RETRY_BACKOFF }
    }

    /// Overrides the retry policy.
    ///
    /// # Arguments
    /// * `max_attempts` – Total attempts per request, at least one.
    /// * `retry_backoff` – Pause between two attempts.
    pub fn with_retries(mut self, max_attempts: u8, retry_backoff: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.retry_backoff = retry_backoff;
        self
    }

    async fn send_with_retries<R>(&self, request: &R) -> Result<R::Response, HTTPError>
    where R: NoBodyHTTPRequestType {
        let mut attempt = 1;
        loop {
            match request.send_request(&self.client).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_transient() && attempt < self.max_attempts => {
                    warn!(
                        "{} failed on attempt {attempt}/{}: {e:?}. Retrying in {}s.",
                        request.endpoint(),
                        self.max_attempts,
                        self.retry_backoff.as_secs_f32()
                    );
                    tokio::time::sleep(self.retry_backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl TimingsProvider for AladhanProvider {
    async fn fetch_timings(&self, query: &TimingsQuery) -> Result<TimingsTable, ProviderError> {
        let response = self.send_with_retries(&TimingsRequest { query: *query }).await?;
        event!("Received timings for {}", response.readable_date());
        response.into_table()
    }
}

#[async_trait]
impl BearingProvider for AladhanProvider {
    async fn fetch_bearing(&self, fix: &LocationFix) -> Result<f64, ProviderError> {
        let request = QiblaRequest { latitude: fix.latitude(), longitude: fix.longitude() };
        let response = self.send_with_retries(&request).await?;
        Ok(response.direction())
    }
}
