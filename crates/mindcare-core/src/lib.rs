//! mindcare-core
//!
//! Pure domain types and the JSON wire contract shared with the MindCare
//! counseling service. No HTTP or filesystem dependency.

pub mod error;
pub mod models;
