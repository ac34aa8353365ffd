//! mindcare-client
//!
//! Client side of the MindCare counseling service: explicit session state,
//! its on-disk store, a blocking HTTP client for the service's JSON API,
//! and the submission flows that fall back to local scoring when the
//! service is unavailable.

pub mod api;
pub mod config;
pub mod error;
pub mod flow;
pub mod session;
pub mod store;
