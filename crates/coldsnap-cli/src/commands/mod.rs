//! Command handlers grouped by concern.

pub(crate) mod fetch;
pub(crate) mod login;
pub(crate) mod token;
