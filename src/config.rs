use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_BASE_URL: &str = "https://vlrggapi.vercel.app";
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;
pub const DEFAULT_STALE_TIME_SECS: u64 = 300;
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

/// Settings for [`VlrClient`](crate::VlrClient).
///
/// # Environment Variables
/// - `VLR_API_BASE_URL` - API root, without trailing slash
/// - `VLR_API_MAX_RETRIES` - retries after the first failed attempt
/// - `VLR_API_RETRY_DELAY_MS` - fixed wait between attempts
/// - `VLR_API_STALE_TIME` - seconds a fetched feed is served from cache
/// - `VLR_API_HTTP_TIMEOUT` - per-request timeout in seconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub stale_time_secs: u64,
    pub http_timeout_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            stale_time_secs: DEFAULT_STALE_TIME_SECS,
            http_timeout_seconds: DEFAULT_HTTP_TIMEOUT_SECONDS,
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by whatever `VLR_API_*` variables are set.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`. Unparsable values are logged and ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(base_url) = lookup("VLR_API_BASE_URL") {
            self.base_url = base_url.trim_end_matches('/').to_owned();
        }
        override_number(&lookup, "VLR_API_MAX_RETRIES", &mut self.max_retries);
        override_number(&lookup, "VLR_API_RETRY_DELAY_MS", &mut self.retry_delay_ms);
        override_number(&lookup, "VLR_API_STALE_TIME", &mut self.stale_time_secs);
        override_number(&lookup, "VLR_API_HTTP_TIMEOUT", &mut self.http_timeout_seconds);
        self
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn stale_time(&self) -> Duration {
        Duration::from_secs(self.stale_time_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }

    /// URL of the match feed for `query`.
    pub fn match_url(&self, query: crate::model::SegmentQuery) -> String {
        format!("{}/match?q={query}", self.base_url)
    }
}

fn override_number<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    target: &mut T,
) {
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse() {
        Ok(value) => *target = value,
        Err(_) => warn!(key, value = %raw, "ignoring unparsable config override"),
    }
}
