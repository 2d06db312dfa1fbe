//! Issuetrack Core Library
//!
//! This library provides the domain model, record validation, query shaping,
//! and storage abstraction for the issuetrack REST service. The HTTP layer
//! lives in the companion server crate.

pub mod domain;
pub mod query;
pub mod storage;
pub mod validation;

// Re-export commonly used types
pub use domain::{Issue, NewIssue, Status};
pub use query::{IssueFilter, Page};
pub use storage::{InMemoryStorage, IssueStore, JsonFileStorage};
