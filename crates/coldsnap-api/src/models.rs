//! Account data and login outcome discrimination.
//!
//! # Design
//! - The login endpoint signals rejection by the *presence* of a top-level
//!   `logged` key, whatever its value. `{"logged": null}` is a rejection.
//! - A success-shaped body that lacks `updates_response.username` is a
//!   protocol mismatch (`ApiError::MalformedResponse`), never a `Failure`.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ApiError, ApiResult};

/// Message substituted when a rejection carries no usable text.
pub const GENERIC_LOGIN_FAILURE: &str = "Unable to log in. Please try again.";

const LOGGED_FIELD: &str = "logged";
const MESSAGE_FIELD: &str = "message";
const UPDATES_FIELD: &str = "updates_response";
const USERNAME_FIELD: &str = "username";

/// An authenticated account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    username: String,
}

impl Account {
    /// Deserialize the account from a raw login response.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidJson`] or [`ApiError::MalformedResponse`]
    /// when the body lacks `updates_response.username`.
    pub fn from_login_json(raw: &str) -> ApiResult<Self> {
        let document = parse_object(raw)?;
        Self::from_document(&document)
    }

    /// Username associated with the account.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    fn from_document(document: &Map<String, Value>) -> ApiResult<Self> {
        let updates = document
            .get(UPDATES_FIELD)
            .ok_or(ApiError::MalformedResponse {
                field: "updates_response",
                reason: "missing",
            })?
            .as_object()
            .ok_or(ApiError::MalformedResponse {
                field: "updates_response",
                reason: "not an object",
            })?;

        let username = updates
            .get(USERNAME_FIELD)
            .ok_or(ApiError::MalformedResponse {
                field: "updates_response.username",
                reason: "missing",
            })?
            .as_str()
            .ok_or(ApiError::MalformedResponse {
                field: "updates_response.username",
                reason: "not a string",
            })?;

        Ok(Self {
            username: username.to_string(),
        })
    }
}

/// Result of a login attempt the server answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogInOutcome {
    /// Credentials were accepted.
    Success(Account),
    /// Credentials were rejected.
    Failure {
        /// Server-supplied text, or [`GENERIC_LOGIN_FAILURE`].
        message: String,
    },
}

impl LogInOutcome {
    /// Discriminate a raw login response.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidJson`] or [`ApiError::MalformedResponse`]
    /// when the body is neither a rejection nor a usable account.
    pub fn from_login_json(raw: &str) -> ApiResult<Self> {
        let document = parse_object(raw)?;

        if document.contains_key(LOGGED_FIELD) {
            let message = document
                .get(MESSAGE_FIELD)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .unwrap_or(GENERIC_LOGIN_FAILURE)
                .to_string();
            return Ok(Self::Failure { message });
        }

        Account::from_document(&document).map(Self::Success)
    }

    /// Whether the login succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The account, when the login succeeded.
    #[must_use]
    pub const fn account(&self) -> Option<&Account> {
        match self {
            Self::Success(account) => Some(account),
            Self::Failure { .. } => None,
        }
    }

    /// The failure message, when the login was rejected.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure { message } => Some(message),
        }
    }

    /// Consume the outcome, keeping only the account.
    #[must_use]
    pub fn into_account(self) -> Option<Account> {
        match self {
            Self::Success(account) => Some(account),
            Self::Failure { .. } => None,
        }
    }
}

fn parse_object(raw: &str) -> ApiResult<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ApiError::MalformedResponse {
            field: "$",
            reason: "not an object",
        }),
        Err(source) => Err(ApiError::InvalidJson { source }),
    }
}
