use std::time::Duration;

/// Public Open Trivia DB endpoint.
pub const DEFAULT_API_URL: &str = "https://opentdb.com";

/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Pause before the retried fetch against the public endpoint, which allows
/// one question request per client every five seconds.
pub const PUBLIC_RETRY_DELAY: Duration = Duration::from_secs(5);

/// How long an answered question stays revealed before moving on.
pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_millis(1000);

/// Connection settings for the trivia API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// Wait before the single retry of a refused fetch.
    pub retry_delay: Duration,
}

impl ApiConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        let retry_delay = if base_url.trim_end_matches('/') == DEFAULT_API_URL {
            PUBLIC_RETRY_DELAY
        } else {
            Duration::ZERO
        };

        Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
            retry_delay,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}
