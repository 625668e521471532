//! HTTP request executor for the scoring endpoint
//!
//! One call to [`RequestExecutor::execute`] performs exactly one POST for one
//! identifier. There is no retry: a transport error or timeout becomes a
//! `Failure` outcome, and any response that arrives becomes a `Success`,
//! whatever its status code.

use chrono::Utc;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT},
    Client,
};
use std::time::{Duration, Instant};
use url::Url;

use crate::config::Config;
use crate::models::{FetchFailure, RequestOutcome, ScoringResponse};
use crate::scoring::ScoringRequest;
use crate::utils::error::FetchError;

const APPLICATION_JSON: &str = "application/json";

/// Executes scoring requests against one endpoint
///
/// The underlying `reqwest::Client` pools connections and is safe to share;
/// wrap the executor in an `Arc` to use it from many tasks.
pub struct RequestExecutor {
    /// HTTP client with the connection-establishment timeout applied
    client: Client,

    /// Endpoint every identifier is POSTed to
    endpoint: String,

    /// Per-request timeout, covering the exchange including the body
    request_timeout: Duration,
}

impl RequestExecutor {
    /// Create an executor from configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` for a malformed endpoint and
    /// `FetchError::ClientBuild` if the HTTP client cannot be created
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        Self::with_timeouts(
            &config.scoring.endpoint_uri,
            config.request_timeout(),
            config.connect_timeout(),
        )
    }

    /// Create an executor with explicit timeouts
    pub fn with_timeouts(
        endpoint: &str,
        request_timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, FetchError> {
        Url::parse(endpoint).map_err(|e| FetchError::InvalidUrl(format!("{endpoint}: {e}")))?;

        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .gzip(true)
            .build()
            .map_err(FetchError::ClientBuild)?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            request_timeout,
        })
    }

    /// Endpoint this executor posts to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Perform one scoring exchange for `identifier`
    pub async fn execute(&self, identifier: &str) -> RequestOutcome {
        let request_start = Utc::now();
        let started = Instant::now();

        match self.exchange(identifier).await {
            Ok((status_code, body)) => RequestOutcome::Success(ScoringResponse {
                status_code,
                body,
                request_start,
                duration_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            }),
            Err(e) => RequestOutcome::Failure(FetchFailure::from(&e)),
        }
    }

    async fn exchange(&self, identifier: &str) -> Result<(u16, String), FetchError> {
        let payload = serde_json::to_vec(&ScoringRequest {
            guid: identifier,
            url: &self.endpoint,
        })?;

        tracing::debug!(
            guid = %identifier,
            endpoint = %self.endpoint,
            "Sending request to API"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .headers(Self::build_headers())
            .timeout(self.request_timeout)
            .body(payload)
            .send()
            .await?;

        let status_code = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(e)
            } else {
                FetchError::Body(e)
            }
        })?;

        Ok((status_code, body))
    }

    /// Build HTTP headers for scoring requests
    fn build_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("guid-bench/", env!("CARGO_PKG_VERSION"))),
        );

        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers() {
        let headers = RequestExecutor::build_headers();

        assert_eq!(headers.get(ACCEPT).unwrap(), APPLICATION_JSON);
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), APPLICATION_JSON);
        assert!(headers
            .get(USER_AGENT)
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("guid-bench/"));
    }

    #[test]
    fn test_executor_creation() {
        let executor = RequestExecutor::new(&Config::default());
        assert!(executor.is_ok());
        assert_eq!(
            executor.unwrap().endpoint(),
            crate::config::DEFAULT_ENDPOINT
        );
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let executor = RequestExecutor::with_timeouts(
            "not a url",
            Duration::from_secs(1),
            Duration::from_secs(1),
        );
        assert!(matches!(executor, Err(FetchError::InvalidUrl(_))));
    }
}
