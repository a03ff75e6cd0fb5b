//! Client configuration

use std::time::Duration;

use crate::cache::RetryPolicy;

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Client configuration for connecting to the storefront API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL (e.g., "http://localhost:8080/api")
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// How long a cached read is served without refetching
    pub stale_time: Duration,

    /// Retry policy for failed reads
    pub retry: RetryPolicy,

    /// Capacity of the cache event channel
    pub event_capacity: usize,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: 30,
            stale_time: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            event_capacity: 256,
        }
    }

    /// Load configuration from the environment
    ///
    /// - `STOREFRONT_API_URL`: base URL
    /// - `STOREFRONT_TIMEOUT_SECS`: request timeout
    /// - `STOREFRONT_STALE_SECS`: stale time of cached reads
    /// - `STOREFRONT_RETRY_ATTEMPTS`: total attempts per read
    ///
    /// Unset or unparsable values keep their defaults.
    pub fn from_env() -> Self {
        let mut config = Self::new(
            std::env::var("STOREFRONT_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
        );
        if let Some(timeout) = env_parse::<u64>("STOREFRONT_TIMEOUT_SECS") {
            config.timeout = timeout;
        }
        if let Some(stale) = env_parse::<u64>("STOREFRONT_STALE_SECS") {
            config.stale_time = Duration::from_secs(stale);
        }
        if let Some(attempts) = env_parse::<u32>("STOREFRONT_RETRY_ATTEMPTS") {
            config.retry = config.retry.with_max_attempts(attempts);
        }
        config
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set how long cached reads stay fresh
    pub fn with_stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }

    /// Set the read retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the cache event channel capacity
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
