//! Pure query shaping over issue collections.
//!
//! This module translates list-request parameters into a store filter and
//! provides the pagination and aggregation steps that run over the filtered
//! result set. Everything here is a pure function over issue slices; the
//! store only ever sees the filter.

use std::collections::BTreeMap;

use crate::domain::Issue;

/// Page size applied when the request names none.
pub const DEFAULT_LIMIT: usize = 10;
/// Hard ceiling on the page size, whatever the request asks for.
pub const MAX_LIMIT: usize = 50;

/// Predicate over stored issues derived from query parameters.
///
/// The status filter compares raw strings, so an unknown status value
/// matches nothing rather than erroring. Effort bounds are inclusive and
/// only match records that carry an effort at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueFilter {
    /// Equality filter on the status wire spelling
    pub status: Option<String>,
    /// Upper bound on effort (inclusive)
    pub effort_lte: Option<i64>,
    /// Lower bound on effort (inclusive)
    pub effort_gte: Option<i64>,
}

impl IssueFilter {
    /// True when no constraint is set and every record matches.
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.effort_lte.is_none() && self.effort_gte.is_none()
    }

    /// Whether a stored issue satisfies every constraint.
    pub fn matches(&self, issue: &Issue) -> bool {
        if let Some(status) = &self.status {
            if issue.status.as_str() != status {
                return false;
            }
        }
        if self.effort_lte.is_some() || self.effort_gte.is_some() {
            let Some(effort) = issue.effort else {
                return false;
            };
            if self.effort_lte.is_some_and(|lte| effort > lte) {
                return false;
            }
            if self.effort_gte.is_some_and(|gte| effort < gte) {
                return false;
            }
        }
        true
    }
}

/// Offset/limit pair for slicing a filtered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Records to skip from the start of the result set
    pub offset: usize,
    /// Records to return, already clamped to [`MAX_LIMIT`]
    pub limit: usize,
}

impl Page {
    /// Apply defaults and the limit clamp to raw request values.
    pub fn new(offset: Option<usize>, limit: Option<usize>) -> Self {
        Self {
            offset: offset.unwrap_or(0),
            limit: limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Slice one page out of a filtered result set.
///
/// The input is already in insertion order; this only skips and takes.
pub fn paginate(issues: &[Issue], page: Page) -> Vec<Issue> {
    issues
        .iter()
        .skip(page.offset)
        .take(page.limit)
        .cloned()
        .collect()
}

/// Count issues grouped by (owner, status).
///
/// Produces the nested summary map `{ owner: { status: count } }`.
pub fn summarize(issues: &[Issue]) -> BTreeMap<String, BTreeMap<String, u64>> {
    let mut counts: BTreeMap<String, BTreeMap<String, u64>> = BTreeMap::new();
    for issue in issues {
        *counts
            .entry(issue.owner.clone())
            .or_default()
            .entry(issue.status.as_str().to_string())
            .or_insert(0) += 1;
    }
    counts
}
