use std::env;
use std::time::Duration;

use tracing::warn;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the counseling service lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL including the `/api` prefix, without a trailing slash.
    pub api_base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read `MINDCARE_API_URL` and `MINDCARE_TIMEOUT_SECS`, falling back to
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let api_base_url =
            env::var("MINDCARE_API_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());

        let timeout = match env::var("MINDCARE_TIMEOUT_SECS") {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    warn!(value = %raw, "ignoring invalid MINDCARE_TIMEOUT_SECS");
                    DEFAULT_TIMEOUT
                }
            },
            Err(_) => DEFAULT_TIMEOUT,
        };

        Self::new(api_base_url).with_timeout(timeout)
    }

    /// Full URL for an API path such as `"assess"`.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
