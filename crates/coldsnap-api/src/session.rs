//! Session facade owning one endpoint client per API version.

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use reqwest::Client;

use crate::config::SessionConfig;
use crate::endpoint::{EndpointClient, UserAgentSlot};
use crate::error::{ApiError, ApiResult};
use crate::models::LogInOutcome;
use crate::params::RequestParameters;

const LOGIN_FUNCTION: &str = "login";
const FEATURES_MAP: &str = r#"{"all_updates_friends_response":true}"#;

/// API versions exposed by the service, each under its own base path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EndpointVersion {
    /// `bq` endpoint.
    Bq,
    /// `ph` endpoint.
    Ph,
    /// `loq` endpoint; hosts login.
    Loq,
}

impl EndpointVersion {
    /// Every supported version.
    pub const ALL: [Self; 3] = [Self::Bq, Self::Ph, Self::Loq];

    /// Path segment for the version.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bq => "bq",
            Self::Ph => "ph",
            Self::Loq => "loq",
        }
    }

    /// Parse a version tag.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|version| version.as_str().eq_ignore_ascii_case(tag.trim()))
    }
}

impl Display for EndpointVersion {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Entry point for authentication and endpoint access.
#[derive(Clone)]
pub struct ApiSession {
    endpoints: BTreeMap<EndpointVersion, EndpointClient>,
    user_agent: UserAgentSlot,
}

impl ApiSession {
    /// Build a session with one endpoint client per [`EndpointVersion`].
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or a version path
    /// cannot be joined onto the configured API base.
    pub fn new(config: &SessionConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|source| ApiError::ClientBuild { source })?;
        let user_agent = UserAgentSlot::new(config.user_agent.clone());

        let mut endpoints = BTreeMap::new();
        for version in EndpointVersion::ALL {
            let path = format!("{}/", version.as_str());
            let base_url = config
                .api_base
                .join(&path)
                .map_err(|source| ApiError::InvalidUrl {
                    function: path.clone(),
                    source,
                })?;
            endpoints.insert(
                version,
                EndpointClient::new(
                    client.clone(),
                    base_url,
                    config.static_token.clone(),
                    config.secret_token.clone(),
                    user_agent.clone(),
                ),
            );
        }

        Ok(Self {
            endpoints,
            user_agent,
        })
    }

    /// Client for one API version.
    #[must_use]
    pub fn endpoint(&self, version: EndpointVersion) -> &EndpointClient {
        &self.endpoints[&version]
    }

    /// All endpoint clients, keyed by version.
    pub fn endpoints(&self) -> impl Iterator<Item = (EndpointVersion, &EndpointClient)> {
        self.endpoints
            .iter()
            .map(|(version, client)| (*version, client))
    }

    /// User agent shared by every endpoint.
    #[must_use]
    pub fn user_agent(&self) -> String {
        self.user_agent.get()
    }

    /// Change the user agent of every endpoint.
    pub fn set_user_agent(&self, value: impl Into<String>) {
        self.user_agent.set(value);
    }

    /// Log in with the given credentials.
    ///
    /// A rejection is `Ok(LogInOutcome::Failure { .. })`; `Err` is reserved for
    /// transport failures and malformed responses.
    ///
    /// # Errors
    ///
    /// Returns an error when the request cannot be delivered, the server
    /// answers with a non-success status, or the body cannot be parsed.
    pub async fn authenticate(&self, username: &str, password: &str) -> ApiResult<LogInOutcome> {
        let params = login_parameters(username, password);
        let body = self
            .endpoint(EndpointVersion::Loq)
            .post_signed(LOGIN_FUNCTION, Some(&params), None)
            .await?;

        let outcome = String::from_utf8(body)
            .map_err(|_| ApiError::MalformedResponse {
                field: "$",
                reason: "not utf-8",
            })
            .and_then(|text| LogInOutcome::from_login_json(&text))
            .inspect_err(|err| {
                tracing::error!(error = %err, "login response did not match the expected shape");
            })?;
        match &outcome {
            LogInOutcome::Success(account) => {
                tracing::info!(username = account.username(), "login accepted");
            }
            LogInOutcome::Failure { message } => {
                tracing::info!(reason = %message, "login rejected");
            }
        }
        Ok(outcome)
    }
}

fn login_parameters(username: &str, password: &str) -> RequestParameters {
    let mut params = RequestParameters::new();
    params.insert("username", username);
    params.insert("password", password);
    params.insert("features_map", FEATURES_MAP);
    params
}
