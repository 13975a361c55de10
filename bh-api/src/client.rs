//! HTTP client for the Bullhorn REST API.
//!
//! Handles token injection, per-attempt timeouts, exponential backoff retry,
//! failure classification, and response validation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, ACCEPT, RETRY_AFTER, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use bh_core::config::{AppConfig, BullhornConfig, RetrySettings};
use bh_core::constants;
use bh_core::error::{BhError, BhResult};
use bh_core::platform;

use crate::credentials::Credentials;
use crate::response::{parse_body, ErrorBody};
use crate::route::Route;

/// Retry configuration for HTTP requests.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts per call, including the first. Zero is treated as one.
    pub max_attempts: u32,
    /// Delay before the first retry (doubles each further retry).
    pub base_delay: Duration,
    /// Maximum delay cap.
    pub max_delay: Duration,
    /// Randomize each delay by up to ±25%.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::from(&RetrySettings::default())
    }
}

impl From<&RetrySettings> for RetryConfig {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_attempts: settings.max_attempts,
            base_delay: Duration::from_millis(settings.base_delay_ms),
            max_delay: Duration::from_millis(settings.max_delay_ms),
            jitter: settings.jitter,
        }
    }
}

impl RetryConfig {
    /// A policy that makes exactly one attempt.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay before retry number `retry` (0-indexed), capped at `max_delay`.
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let base_ms = self.base_delay.as_millis() as u64;
        let delay_ms = base_ms.saturating_mul(1u64.checked_shl(retry).unwrap_or(u64::MAX));
        let max_ms = self.max_delay.as_millis() as u64;
        let capped = delay_ms.min(max_ms);

        if self.jitter {
            let spread = capped as f64 * 0.25;
            let offset = (rand::random::<f64>() - 0.5) * 2.0 * spread;
            Duration::from_millis((capped as f64 + offset).max(0.0) as u64)
        } else {
            Duration::from_millis(capped)
        }
    }
}

/// A failed attempt plus the server's `Retry-After` hint, if any.
struct AttemptError {
    error: BhError,
    retry_after: Option<Duration>,
}

impl From<BhError> for AttemptError {
    fn from(error: BhError) -> Self {
        Self { error, retry_after: None }
    }
}

/// HTTP client for the Bullhorn REST API.
///
/// Cloning is cheap: clones share the connection pool and the credentials.
/// Credentials are fixed at construction and cannot be replaced.
#[derive(Clone)]
pub struct ApiClient {
    inner: Client,
    credentials: Arc<Credentials>,
    /// User agent sent with every request.
    user_agent: String,
    /// Per-attempt request timeout.
    timeout: Duration,
    /// Retry configuration.
    retry_config: RetryConfig,
}

impl ApiClient {
    /// Create a new ApiClient from the `[bullhorn]` config section.
    pub fn new(config: &BullhornConfig) -> BhResult<Self> {
        let credentials = Credentials::from_config(config)?;
        Self::with_credentials(credentials, config)
    }

    /// Create a client from a full config, including its retry policy.
    pub fn from_app_config(config: &AppConfig) -> BhResult<Self> {
        Ok(Self::new(&config.bullhorn)?.with_retry_config(RetryConfig::from(&config.retry)))
    }

    /// Create a client from `BULLHORN_SESSION_TOKEN` / `BULLHORN_REST_URL`
    /// with default timeouts and retry policy.
    pub fn from_env() -> BhResult<Self> {
        Self::with_credentials(Credentials::from_env()?, &BullhornConfig::default())
    }

    /// Create a client from already validated credentials.
    ///
    /// Only the timeout fields of `config` are read.
    pub fn with_credentials(credentials: Credentials, config: &BullhornConfig) -> BhResult<Self> {
        let timeout = Duration::from_millis(config.api_timeout_ms);
        let inner = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .pool_max_idle_per_host(5)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(30))
            .build()
            .map_err(|e| BhError::Http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            inner,
            credentials: Arc::new(credentials),
            user_agent: build_user_agent(),
            timeout,
            retry_config: RetryConfig::default(),
        })
    }

    /// Set custom retry configuration.
    pub fn with_retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// The credentials this client was built with.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// The user agent sent with every request.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// The active retry configuration.
    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry_config
    }

    /// Build a GET route relative to the REST URL.
    pub(crate) fn route(&self, segments: &[&str], query: &[(&str, String)]) -> BhResult<Route> {
        Route::get(self.credentials.rest_url(), segments, query)
    }

    /// Execute a route with exponential backoff retry and return the body
    /// of the first 2xx response.
    pub async fn execute(&self, route: &Route) -> BhResult<String> {
        let max_attempts = self.retry_config.attempts();
        debug!("{}", route.key());

        let mut attempt = 1;
        loop {
            let failure = match self.send_once(route).await {
                Ok(body) => return Ok(body),
                Err(failure) => failure,
            };

            if !failure.error.is_transient() {
                return Err(failure.error);
            }
            if attempt >= max_attempts {
                warn!("{} failed after {attempt} attempts: {}", route.key(), failure.error);
                return Err(BhError::RetryExhausted {
                    attempts: attempt,
                    last: Box::new(failure.error),
                });
            }

            let delay = match failure.retry_after {
                Some(hint) => hint.min(self.retry_config.max_delay),
                None => self.retry_config.delay_for_retry(attempt - 1),
            };
            warn!(
                "retrying {} (attempt {}/{}) after {:.1}s: {}",
                route.key(),
                attempt + 1,
                max_attempts,
                delay.as_secs_f64(),
                failure.error
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// Make a single attempt.
    async fn send_once(&self, route: &Route) -> Result<String, AttemptError> {
        let response = self
            .inner
            .request(route.method.clone(), route.url.clone())
            .timeout(self.timeout)
            .header(USER_AGENT, self.user_agent.as_str())
            .header(ACCEPT, "application/json")
            .header(constants::REST_TOKEN_HEADER, self.credentials.header_value().clone())
            .send()
            .await
            .map_err(Self::classify_error)?;

        let status = response.status();
        let retry_after = parse_retry_after(response.headers());
        let body = response.text().await.map_err(Self::classify_error)?;
        debug!("{} returned {}", route.key(), status.as_u16());

        if status.is_success() {
            return Ok(body);
        }

        Err(AttemptError {
            error: Self::status_error(status, &body),
            retry_after,
        })
    }

    /// GET a route and deserialize the validated body.
    pub async fn get_json<T: DeserializeOwned>(&self, route: &Route) -> BhResult<T> {
        let body = self.execute(route).await?;
        parse_body(&body)
    }

    /// Convert a non-2xx status into the matching error variant.
    ///
    /// A body that is present but not JSON is a `Validation` failure on any
    /// status and is never retried.
    fn status_error(status: StatusCode, body: &str) -> BhError {
        let parsed = match ErrorBody::parse(body) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("status {} with malformed body: {e}", status.as_u16());
                return e;
            }
        };
        let message = {
            let text = parsed.text();
            if text.is_empty() {
                status.canonical_reason().unwrap_or("unknown status").to_string()
            } else {
                text
            }
        };

        match status {
            StatusCode::UNAUTHORIZED => BhError::AuthFailed(message),
            StatusCode::TOO_MANY_REQUESTS => BhError::RateLimited(message),
            s if s.is_server_error() => BhError::ServerError {
                status: s.as_u16(),
                message,
            },
            s => BhError::ClientError {
                status: s.as_u16(),
                code: parsed.code(),
                message,
            },
        }
    }

    /// Classify a reqwest error into a BhError variant.
    fn classify_error(e: reqwest::Error) -> AttemptError {
        let error = if e.is_timeout() {
            BhError::Timeout(e.to_string())
        } else if e.is_connect() {
            BhError::Http(format!("connection failed: {e}"))
        } else if e.is_builder() {
            BhError::Config(format!("invalid request: {e}"))
        } else {
            BhError::Http(e.to_string())
        };
        error.into()
    }
}

/// Parse a `Retry-After` header given in whole seconds.
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// User agent identifying the library, its version and the host platform.
fn build_user_agent() -> String {
    [
        "Rust client for Bullhorn API".to_string(),
        format!("({} {})", constants::PROJECT_URL, constants::APP_VERSION),
        platform::host_description(),
        "reqwest".to_string(),
    ]
    .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> BullhornConfig {
        BullhornConfig {
            rest_url: "https://rest123.bullhornstaffing.com/rest-services/1234/".into(),
            session_token: "12345_1234567_a12345bc-123a-45bc-67de-12345678910a".into(),
            ..BullhornConfig::default()
        }
    }

    fn fixed(base_ms: u64, max_ms: u64) -> RetryConfig {
        RetryConfig {
            max_attempts: 5,
            base_delay: Duration::from_millis(base_ms),
            max_delay: Duration::from_millis(max_ms),
            jitter: false,
        }
    }

    #[test]
    fn test_client_user_agent() {
        let client = ApiClient::new(&test_config()).unwrap();
        assert!(client.user_agent().contains("Rust client for Bullhorn API"));
        assert!(client.user_agent().contains(constants::APP_VERSION));
    }

    #[test]
    fn test_retry_delay_calculation() {
        let config = fixed(1000, 8000);
        assert_eq!(config.delay_for_retry(0), Duration::from_secs(1));
        assert_eq!(config.delay_for_retry(1), Duration::from_secs(2));
        assert_eq!(config.delay_for_retry(2), Duration::from_secs(4));
        assert_eq!(config.delay_for_retry(3), Duration::from_secs(8));
    }

    #[test]
    fn test_retry_delay_capped() {
        let config = fixed(1000, 4000);
        assert_eq!(config.delay_for_retry(10), Duration::from_secs(4));
        assert_eq!(config.delay_for_retry(200), Duration::from_secs(4));
    }

    #[test]
    fn test_retry_delay_jitter_stays_in_range() {
        let config = RetryConfig { jitter: true, ..fixed(1000, 8000) };
        for _ in 0..50 {
            let d = config.delay_for_retry(1);
            assert!(d >= Duration::from_millis(1500) && d <= Duration::from_millis(2500));
        }
    }

    #[test]
    fn test_zero_attempts_means_one() {
        let config = RetryConfig { max_attempts: 0, ..RetryConfig::default() };
        assert_eq!(config.attempts(), 1);
    }

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            ApiClient::status_error(StatusCode::UNAUTHORIZED, ""),
            BhError::AuthFailed(_)
        ));
        assert!(matches!(
            ApiClient::status_error(StatusCode::TOO_MANY_REQUESTS, ""),
            BhError::RateLimited(_)
        ));
        assert!(matches!(
            ApiClient::status_error(StatusCode::from_u16(524).unwrap(), ""),
            BhError::ServerError { status: 524, .. }
        ));
        match ApiClient::status_error(
            StatusCode::BAD_REQUEST,
            r#"{"errorMessage":"bad query","errorCode":400}"#,
        ) {
            BhError::ClientError { status, code, message } => {
                assert_eq!(status, 400);
                assert_eq!(code, 400);
                assert_eq!(message, "bad query");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_error_body_is_validation_on_any_status() {
        for status in [400, 401, 429, 503] {
            let err = ApiClient::status_error(
                StatusCode::from_u16(status).unwrap(),
                "<html>not json</html>",
            );
            assert!(matches!(err, BhError::Validation(_)), "status {status}: {err:?}");
            assert!(!err.is_transient());
        }
        assert!(matches!(
            ApiClient::status_error(StatusCode::SERVICE_UNAVAILABLE, ""),
            BhError::ServerError { status: 503, .. }
        ));
    }

    #[test]
    fn test_parse_retry_after() {
        let mut headers = HeaderMap::new();
        assert_eq!(parse_retry_after(&headers), None);
        headers.insert(RETRY_AFTER, "3".parse().unwrap());
        assert_eq!(parse_retry_after(&headers), Some(Duration::from_secs(3)));
        headers.insert(RETRY_AFTER, "Wed, 21 Oct 2015 07:28:00 GMT".parse().unwrap());
        assert_eq!(parse_retry_after(&headers), None);
    }

    #[test]
    fn test_from_app_config_applies_retry() {
        let mut config = AppConfig::default();
        config.bullhorn = test_config();
        config.retry.max_attempts = 2;
        let client = ApiClient::from_app_config(&config).unwrap();
        assert_eq!(client.retry_config().max_attempts, 2);
    }
}
