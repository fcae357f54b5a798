//! Shared session wiring, error types, and argument helpers for the CLI.

use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use coldsnap_api::{ApiError, ApiSession, EndpointVersion, SessionConfig};
use url::Url;

use crate::cli::Cli;

/// Shown instead of transport or protocol detail; the detail goes to the log.
pub(crate) const GENERIC_FAILURE_MESSAGE: &str =
    "something went wrong; rerun with RUST_LOG=debug for details";

/// CLI-level error type separating user mistakes, rejections, and failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Rejected(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Rejected(_) => 1,
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Rejected(_) => "rejected",
            Self::Failure(_) => "failure",
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) | Self::Rejected(message) => message.clone(),
            Self::Failure(_) => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }

    /// Record diagnostic detail that is deliberately kept off the terminal.
    pub(crate) fn log(&self) {
        if let Self::Failure(error) = self {
            tracing::error!(error = %format!("{error:#}"), "command failed");
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<ApiError> for CliError {
    fn from(error: ApiError) -> Self {
        Self::failure(error)
    }
}

/// Application context passed to command handlers.
#[derive(Clone)]
pub(crate) struct AppContext {
    pub(crate) session: ApiSession,
    pub(crate) config: SessionConfig,
}

impl AppContext {
    /// Build the session described by the global CLI flags.
    pub(crate) fn from_cli(cli: &Cli) -> CliResult<Self> {
        let static_token = required_token(
            cli.static_token.as_deref(),
            "static token",
            "COLDSNAP_STATIC_TOKEN",
        )?;
        let secret_token = required_token(
            cli.secret_token.as_deref(),
            "secret token",
            "COLDSNAP_SECRET_TOKEN",
        )?;

        if cli.timeout == 0 {
            return Err(CliError::validation("timeout must be at least one second"));
        }

        let config = SessionConfig::new(static_token, secret_token)
            .with_api_base(cli.api_url.clone())
            .with_user_agent(cli.user_agent.clone())
            .with_request_timeout(Duration::from_secs(cli.timeout));
        Self::new(config)
    }

    pub(crate) fn new(config: SessionConfig) -> CliResult<Self> {
        let session = ApiSession::new(&config).map_err(|err| {
            CliError::failure(anyhow::Error::new(err).context("failed to build API session"))
        })?;
        Ok(Self { session, config })
    }
}

fn required_token(value: Option<&str>, label: &str, env_var: &str) -> CliResult<String> {
    value
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            CliError::validation(format!(
                "{label} is required (flag --{} or {env_var})",
                label.replace(' ', "-")
            ))
        })
}

/// Parse the API URL provided to the CLI, ensuring its path ends with `/`.
pub(crate) fn parse_url(input: &str) -> Result<Url, String> {
    let mut url = input
        .parse::<Url>()
        .map_err(|err| format!("invalid URL '{input}': {err}"))?;
    if url.cannot_be_a_base() {
        return Err(format!("invalid URL '{input}': not usable as a base"));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Parse an endpoint version tag.
pub(crate) fn parse_endpoint(input: &str) -> Result<EndpointVersion, String> {
    EndpointVersion::parse(input).ok_or_else(|| {
        let known: Vec<_> = EndpointVersion::ALL
            .iter()
            .map(|version| version.as_str())
            .collect();
        format!("unknown endpoint '{input}' (expected one of {})", known.join(", "))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn parse_url_appends_trailing_slash() -> Result<(), String> {
        assert_eq!(parse_url("http://127.0.0.1:7070")?.as_str(), "http://127.0.0.1:7070/");
        assert_eq!(parse_url("https://api.example.com/")?.as_str(), "https://api.example.com/");
        assert_eq!(
            parse_url("http://h/base?x=1")?.as_str(),
            "http://h/base/?x=1"
        );
        assert!(parse_url("not a url").is_err());
        assert!(parse_url("mailto:someone@example.com").is_err());
        Ok(())
    }

    #[test]
    fn parse_endpoint_lists_known_versions() {
        assert_eq!(parse_endpoint("ph"), Ok(EndpointVersion::Ph));
        let err = parse_endpoint("v2").err().unwrap_or_default();
        assert!(err.contains("bq, ph, loq"), "{err}");
    }

    #[test]
    fn required_token_rejects_blank_values() {
        assert!(matches!(
            required_token(Some("  "), "secret token", "COLDSNAP_SECRET_TOKEN"),
            Err(CliError::Validation(message)) if message.contains("--secret-token")
        ));
        assert!(matches!(
            required_token(Some(" abc "), "secret token", "COLDSNAP_SECRET_TOKEN"),
            Ok(token) if token == "abc"
        ));
    }

    #[test]
    fn failures_hide_detail_from_users() {
        let err = CliError::failure(anyhow!("connection refused at 10.0.0.1"));
        assert_eq!(err.exit_code(), 3);
        assert_eq!(err.display_message(), GENERIC_FAILURE_MESSAGE);

        let rejected = CliError::rejected("bad creds");
        assert_eq!(rejected.exit_code(), 1);
        assert_eq!(rejected.display_message(), "bad creds");
        assert_eq!(rejected.kind(), "rejected");
    }
}
