use std::env;
use std::time::Duration;

/// Public ViaCEP host
pub const DEFAULT_SERVICE_URL: &str = "https://viacep.com.br";

/// Configuration for [`AddressResolver`](crate::AddressResolver)
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Base URL of the lookup service, without the `/ws/...` path
    pub service_url: String,
    /// Per-request timeout. `None` waits until the transport gives up.
    pub request_timeout: Option<Duration>,
    /// Drop responses from lookups that were superseded by a newer one
    pub discard_stale_responses: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            request_timeout: None,
            discard_stale_responses: false,
        }
    }
}

impl ResolverConfig {
    /// Read `VIACEP_URL`, `VIACEP_TIMEOUT_SECS` and `VIACEP_DISCARD_STALE`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            service_url: get("VIACEP_URL")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.service_url),
            request_timeout: get("VIACEP_TIMEOUT_SECS")
                .and_then(|s| s.trim().parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            discard_stale_responses: get("VIACEP_DISCARD_STALE")
                .map(|s| parse_flag(&s))
                .unwrap_or(defaults.discard_stale_responses),
        }
    }

    /// Point the resolver at another service host (mock servers, mirrors)
    pub fn with_service_url(mut self, url: impl Into<String>) -> Self {
        self.service_url = url.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn with_discard_stale_responses(mut self, discard: bool) -> Self {
        self.discard_stale_responses = discard;
        self
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
