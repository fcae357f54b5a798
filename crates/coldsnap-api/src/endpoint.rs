//! HTTP plumbing for one versioned API endpoint.
//!
//! # Design
//! - POST requests are signed: `timestamp` and `req_token` are appended after
//!   the caller's parameters. GET requests are never signed.
//! - `User-Agent`, `Accept`, and `Accept-Encoding` are always sent; caller
//!   headers can add to them but not replace them.
//! - The user agent lives in a [`UserAgentSlot`] shared by every endpoint of a
//!   session, so one write is observed by all of them.
//! - Failed requests are surfaced immediately; nothing is retried here.
//! - Bodies are returned as raw bytes after content decoding. Function names
//!   must resolve beneath the endpoint base URL.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use reqwest::header::{
    ACCEPT, ACCEPT_ENCODING, CONTENT_ENCODING, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue,
    USER_AGENT,
};
use reqwest::{Client, Response};
use url::Url;

use crate::error::{ApiError, ApiResult};
use crate::gzip;
use crate::params::RequestParameters;
use crate::timestamps;
use crate::token::generate_request_token;

/// Additional headers supplied by a caller.
pub type HeaderValues = BTreeMap<String, String>;

const ACCEPT_ANY: &str = "*/*";
const ACCEPT_COMPRESSED: &str = "gzip,deflate";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const TIMESTAMP_PARAM: &str = "timestamp";
const REQ_TOKEN_PARAM: &str = "req_token";

/// Shared, mutable user-agent value.
#[derive(Debug, Clone)]
pub struct UserAgentSlot {
    value: Arc<RwLock<String>>,
}

impl UserAgentSlot {
    /// Create a slot holding `value`.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: Arc::new(RwLock::new(value.into())),
        }
    }

    /// Current user agent.
    #[must_use]
    pub fn get(&self) -> String {
        self.value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the user agent for every holder of this slot.
    pub fn set(&self, value: impl Into<String>) {
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = value.into();
    }
}

/// Sends requests to a single versioned endpoint.
#[derive(Clone)]
pub struct EndpointClient {
    client: Client,
    base_url: Url,
    static_token: String,
    secret_token: String,
    user_agent: UserAgentSlot,
}

impl EndpointClient {
    /// Create a client rooted at `base_url`.
    ///
    /// `base_url` should end with `/` so function names resolve beneath it.
    #[must_use]
    pub fn new(
        client: Client,
        base_url: Url,
        static_token: impl Into<String>,
        secret_token: impl Into<String>,
        user_agent: UserAgentSlot,
    ) -> Self {
        Self {
            client,
            base_url,
            static_token: static_token.into(),
            secret_token: secret_token.into(),
            user_agent,
        }
    }

    /// Base URL of the endpoint.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// User agent sent with the next request.
    #[must_use]
    pub fn user_agent(&self) -> String {
        self.user_agent.get()
    }

    /// Change the user agent for subsequent requests.
    ///
    /// The slot is shared, so every endpoint of the owning session observes
    /// the new value.
    pub fn set_user_agent(&self, value: impl Into<String>) {
        self.user_agent.set(value);
    }

    /// POST to `function`, signed with the static token.
    ///
    /// # Errors
    ///
    /// See [`EndpointClient::post`].
    pub async fn post_signed(
        &self,
        function: &str,
        parameters: Option<&RequestParameters>,
        headers: Option<&HeaderValues>,
    ) -> ApiResult<Vec<u8>> {
        self.post(function, parameters, &self.static_token, headers)
            .await
    }

    /// POST to `function`, signed with a session token obtained after login.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] when the request cannot be delivered,
    /// [`ApiError::Status`] for non-success responses, and
    /// [`ApiError::InvalidHeader`] for unusable caller headers. A function
    /// name that resolves outside the base URL is refused with
    /// [`ApiError::OutsideEndpoint`] before anything is sent.
    pub async fn post(
        &self,
        function: &str,
        parameters: Option<&RequestParameters>,
        session_token: &str,
        headers: Option<&HeaderValues>,
    ) -> ApiResult<Vec<u8>> {
        self.post_at(
            function,
            parameters,
            session_token,
            headers,
            timestamps::now_millis(),
        )
        .await
    }

    /// GET `function`. No request token is attached.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`EndpointClient::post`].
    pub async fn get(&self, function: &str, headers: Option<&HeaderValues>) -> ApiResult<Vec<u8>> {
        let url = self.function_url(function)?;
        let headers = self.request_headers(headers, None)?;

        tracing::debug!(function, url = %url, "sending GET request");
        let response = self
            .client
            .get(url)
            .headers(headers)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                function: function.to_string(),
                source,
            })?;

        read_body(function, response).await
    }

    async fn post_at(
        &self,
        function: &str,
        parameters: Option<&RequestParameters>,
        session_token: &str,
        headers: Option<&HeaderValues>,
        timestamp_ms: i64,
    ) -> ApiResult<Vec<u8>> {
        let url = self.function_url(function)?;
        let headers = self.request_headers(headers, Some(FORM_CONTENT_TYPE))?;
        let body = self
            .signed_parameters(parameters, session_token, timestamp_ms)
            .encode();

        tracing::debug!(function, url = %url, "sending signed POST request");
        let response = self
            .client
            .post(url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                function: function.to_string(),
                source,
            })?;

        read_body(function, response).await
    }

    fn signed_parameters(
        &self,
        parameters: Option<&RequestParameters>,
        session_token: &str,
        timestamp_ms: i64,
    ) -> RequestParameters {
        let mut signed = parameters.cloned().unwrap_or_default();
        signed.remove(TIMESTAMP_PARAM);
        signed.remove(REQ_TOKEN_PARAM);

        let timestamp = timestamp_ms.to_string();
        let req_token = generate_request_token(&self.secret_token, session_token, &timestamp);
        signed.insert(TIMESTAMP_PARAM, timestamp);
        signed.insert(REQ_TOKEN_PARAM, req_token);
        signed
    }

    fn function_url(&self, function: &str) -> ApiResult<Url> {
        let url = self
            .base_url
            .join(function.trim_start_matches('/'))
            .map_err(|source| ApiError::InvalidUrl {
                function: function.to_string(),
                source,
            })?;

        if url.origin() != self.base_url.origin() || !url.path().starts_with(self.base_url.path())
        {
            return Err(ApiError::OutsideEndpoint {
                function: function.to_string(),
            });
        }
        Ok(url)
    }

    fn request_headers(
        &self,
        extra: Option<&HeaderValues>,
        content_type: Option<&'static str>,
    ) -> ApiResult<HeaderMap> {
        let user_agent = self.user_agent();
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&user_agent).map_err(|_| ApiError::InvalidHeader {
                name: USER_AGENT.as_str().to_string(),
            })?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_ANY));
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static(ACCEPT_COMPRESSED));
        if let Some(content_type) = content_type {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }

        for (name, value) in extra.into_iter().flatten() {
            let invalid = || ApiError::InvalidHeader { name: name.clone() };
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
            if headers.contains_key(&header_name) {
                tracing::debug!(header = %header_name, "ignoring caller override of a default header");
                continue;
            }
            let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;
            headers.append(header_name, header_value);
        }

        Ok(headers)
    }
}

async fn read_body(function: &str, response: Response) -> ApiResult<Vec<u8>> {
    let status = response.status();
    if !status.is_success() {
        tracing::warn!(function, status = %status, "endpoint returned non-success status");
        return Err(ApiError::Status {
            function: function.to_string(),
            status,
        });
    }

    let encoding = response
        .headers()
        .get(CONTENT_ENCODING)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().to_ascii_lowercase());

    let bytes = response
        .bytes()
        .await
        .map_err(|source| ApiError::Transport {
            function: function.to_string(),
            source,
        })?;

    match encoding.as_deref() {
        Some("gzip" | "x-gzip") => gzip::decompress(&bytes),
        Some("deflate") => gzip::inflate(&bytes),
        _ => Ok(bytes.to_vec()),
    }
}
