//! Data contracts shared by the makerlog API client and its front-ends.
//!
//! Entities mirror the records owned by the remote API server; payload
//! types carry exactly the fields a caller may supply on create/update.

pub mod error;
pub mod log_date;
pub mod models;
pub mod types;
