#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]

//! Client for the private API's login protocol.
//!
//! Layout:
//! - `token.rs`: request token derivation (`req_token`)
//! - `params.rs`: ordered, percent-encoded request parameters
//! - `endpoint.rs`: one versioned endpoint; signed POST and plain GET
//! - `session.rs`: owns every endpoint client and exposes `authenticate`
//! - `models.rs`: login response discrimination and account data
//! - `config.rs`: session configuration and defaults
//! - `gzip.rs`, `timestamps.rs`: byte-stream and time helpers
//! - `error.rs`: error taxonomy shared by the above

pub mod config;
pub mod endpoint;
pub mod error;
pub mod gzip;
pub mod models;
pub mod params;
pub mod session;
pub mod timestamps;
pub mod token;

pub use config::{DEFAULT_API_BASE, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, SessionConfig};
pub use endpoint::{EndpointClient, HeaderValues, UserAgentSlot};
pub use error::{ApiError, ApiResult};
pub use models::{Account, GENERIC_LOGIN_FAILURE, LogInOutcome};
pub use params::RequestParameters;
pub use session::{ApiSession, EndpointVersion};
pub use token::generate_request_token;
