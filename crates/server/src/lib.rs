//! Issuetrack REST API Server Library
//!
//! Provides the HTTP API for the issuetrack issue tracker: CRUD over issue
//! records plus filtered listing, pagination, and owner/status summaries.

pub mod routes;

// Re-export for convenience
pub use routes::create_routes;
