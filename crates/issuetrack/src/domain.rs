//! Core domain types for the issue tracker.
//!
//! This module defines the issue record as it travels over the wire and into
//! the record store, along with its closed status set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Issue lifecycle status.
///
/// The set is closed: any value outside it is rejected by validation before
/// a record reaches the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Status {
    /// Freshly reported, not yet triaged (default for new records)
    #[default]
    New,
    /// Confirmed and awaiting an owner
    Open,
    /// Being worked on
    Assigned,
    /// Fix landed, awaiting verification
    Fixed,
    /// Fix verified
    Verified,
    /// No further work expected
    Closed,
}

impl Status {
    /// Every member of the valid-status set, in lifecycle order.
    pub const ALL: [Status; 6] = [
        Status::New,
        Status::Open,
        Status::Assigned,
        Status::Fixed,
        Status::Verified,
        Status::Closed,
    ];

    /// Wire spelling of the status, identical to its serde form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::New => "New",
            Status::Open => "Open",
            Status::Assigned => "Assigned",
            Status::Fixed => "Fixed",
            Status::Verified => "Verified",
            Status::Closed => "Closed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tracked issue as persisted by the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Store-assigned identifier (UUID text), immutable once set
    pub id: String,
    /// Current lifecycle status
    pub status: Status,
    /// Who the issue belongs to
    pub owner: String,
    /// Estimated effort units
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effort: Option<i64>,
    /// When the issue was created (set server-side)
    pub created: DateTime<Utc>,
    /// When the issue was resolved, absent until then
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<DateTime<Utc>>,
    /// Short summary of the issue
    pub title: String,
}

/// Field set for an issue about to be inserted, or to replace an existing
/// record. Identical to [`Issue`] minus the store-assigned id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIssue {
    /// Current lifecycle status
    pub status: Status,
    /// Who the issue belongs to
    pub owner: String,
    /// Estimated effort units
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effort: Option<i64>,
    /// When the issue was created
    pub created: DateTime<Utc>,
    /// When the issue was resolved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<DateTime<Utc>>,
    /// Short summary of the issue
    pub title: String,
}

impl NewIssue {
    /// Create a minimal record with default status and a current timestamp.
    pub fn new(title: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            status: Status::New,
            owner: owner.into(),
            effort: None,
            created: Utc::now(),
            completion_date: None,
            title: title.into(),
        }
    }

    /// Attach a store-assigned id, producing the persisted record.
    pub fn into_issue(self, id: String) -> Issue {
        Issue {
            id,
            status: self.status,
            owner: self.owner,
            effort: self.effort,
            created: self.created,
            completion_date: self.completion_date,
            title: self.title,
        }
    }
}
