//! REST client for the makerlog API server.
//!
//! [`ApiClient`](api::ApiClient) exposes one typed method per server
//! operation (auth, projects, tasks, log entries, today). Every call goes
//! through a single request primitive that attaches the session cookie
//! store, sets JSON headers and normalizes error and empty responses.

pub mod api;
pub mod config;
pub mod error;

pub use api::{ApiClient, RequestOptions};
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};
