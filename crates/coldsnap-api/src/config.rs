//! Session configuration and defaults.
//!
//! # Design
//! - Tokens are issued out-of-band and never transmitted; `Debug` redacts them.
//! - Defaults are centralised here so the CLI and tests agree on them.

use std::fmt::{self, Debug, Formatter};
use std::time::Duration;

use url::Url;

/// Host every versioned endpoint is joined onto.
pub const DEFAULT_API_BASE: &str = "https://api.snapchat.com/";
/// User agent sent until the caller overrides it.
pub const DEFAULT_USER_AGENT: &str = "Snapchat/8.0.0 (Nexus 4; Android 21; gzip)";
/// Request timeout applied by the shared HTTP client.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Inputs needed to build an [`ApiSession`](crate::ApiSession).
#[derive(Clone)]
pub struct SessionConfig {
    /// Static token used as the session token before login.
    pub static_token: String,
    /// Secret mixed into every request token.
    pub secret_token: String,
    /// API host; endpoint versions are joined beneath it, so keep the trailing `/`.
    pub api_base: Url,
    /// Initial user agent shared by every endpoint.
    pub user_agent: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl SessionConfig {
    /// Configuration with default host, user agent, and timeout.
    ///
    /// # Panics
    ///
    /// Panics only if [`DEFAULT_API_BASE`] is edited into an invalid URL.
    #[must_use]
    pub fn new(static_token: impl Into<String>, secret_token: impl Into<String>) -> Self {
        Self {
            static_token: static_token.into(),
            secret_token: secret_token.into(),
            api_base: default_api_base(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Override the API host.
    #[must_use]
    pub fn with_api_base(mut self, api_base: Url) -> Self {
        self.api_base = api_base;
        self
    }

    /// Override the initial user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Override the request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl Debug for SessionConfig {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SessionConfig")
            .field("static_token", &"<redacted>")
            .field("secret_token", &"<redacted>")
            .field("api_base", &self.api_base.as_str())
            .field("user_agent", &self.user_agent)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

fn default_api_base() -> Url {
    Url::parse(DEFAULT_API_BASE).expect("default API base is a valid URL")
}
