//! Storage abstraction layer for persisting issues.
//!
//! This module defines the `IssueStore` trait that abstracts the record
//! store, allowing different backends (JSON files, in-memory, etc.) to be
//! used interchangeably. The HTTP layer receives a store by injection and
//! never touches a backend directly.

use crate::domain::{Issue, NewIssue};
use crate::query::IssueFilter;
use anyhow::Result;

pub mod json;
pub mod memory;

// Re-export for convenience
pub use json::JsonFileStorage;
pub use memory::InMemoryStorage;

/// Trait for record stores that persist issues.
///
/// Implementations must be `Clone` to support shared access patterns; clones
/// observe the same underlying data. Not-found outcomes are reported in-band
/// (`Option`/`bool`) so callers can distinguish them from backend failures,
/// which come back as errors.
///
/// # Examples
///
/// ```
/// use issuetrack::domain::NewIssue;
/// use issuetrack::storage::{InMemoryStorage, IssueStore};
///
/// let storage = InMemoryStorage::new();
/// storage.init().unwrap();
///
/// let issue = storage
///     .insert_issue(NewIssue::new("Fix bug", "alice"))
///     .unwrap();
/// let loaded = storage.load_issue(&issue.id).unwrap();
/// assert_eq!(loaded.unwrap().title, "Fix bug");
/// ```
pub trait IssueStore: Clone {
    /// Initialize the storage backend (idempotent).
    ///
    /// Creates necessary directories or files. Runs once at startup, before
    /// the listener accepts connections.
    fn init(&self) -> Result<()>;

    /// Insert a new issue, assigning it a fresh id.
    ///
    /// The id is chosen by the store and never changes afterwards. Returns
    /// the record as persisted.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be serialized or persisted.
    fn insert_issue(&self, new: NewIssue) -> Result<Issue>;

    /// Find all issues matching a filter, in insertion order ascending.
    ///
    /// # Errors
    ///
    /// Returns an error if records cannot be loaded.
    fn find_issues(&self, filter: &IssueFilter) -> Result<Vec<Issue>>;

    /// Load an issue by id, or `None` if no such record exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the record exists but cannot be read.
    fn load_issue(&self, id: &str) -> Result<Option<Issue>>;

    /// Replace every mutable field of an existing issue, keeping its id and
    /// insertion position. Returns the updated record, or `None` if no such
    /// record exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be persisted.
    fn replace_issue(&self, id: &str, fields: NewIssue) -> Result<Option<Issue>>;

    /// Delete an issue by id. Returns `false` if no such record exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the record exists but cannot be removed.
    fn delete_issue(&self, id: &str) -> Result<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Status;

    fn new_issue(title: &str, owner: &str, status: Status, effort: Option<i64>) -> NewIssue {
        let mut new = NewIssue::new(title, owner);
        new.status = status;
        new.effort = effort;
        new
    }

    #[test]
    fn test_trait_insert_and_load() {
        fn test_with_storage<S: IssueStore>(storage: S) {
            storage.init().unwrap();

            let issue = storage
                .insert_issue(new_issue("First", "alice", Status::Open, Some(3)))
                .unwrap();
            assert!(!issue.id.is_empty());

            let loaded = storage.load_issue(&issue.id).unwrap().unwrap();
            assert_eq!(loaded, issue);

            // Ids are distinct across inserts
            let other = storage.insert_issue(NewIssue::new("Second", "o")).unwrap();
            assert_ne!(other.id, issue.id);
        }

        // Test with both backends
        let temp_dir = tempfile::tempdir().unwrap();
        test_with_storage(JsonFileStorage::new(temp_dir.path()));
        test_with_storage(InMemoryStorage::new());
    }

    #[test]
    fn test_trait_find_preserves_insertion_order() {
        fn test_with_storage<S: IssueStore>(storage: S) {
            storage.init().unwrap();

            for title in ["one", "two", "three"] {
                storage.insert_issue(NewIssue::new(title, "o")).unwrap();
            }

            let issues = storage.find_issues(&IssueFilter::default()).unwrap();
            let titles: Vec<_> = issues.iter().map(|i| i.title.as_str()).collect();
            assert_eq!(titles, ["one", "two", "three"]);
        }

        // Test with both backends
        let temp_dir = tempfile::tempdir().unwrap();
        test_with_storage(JsonFileStorage::new(temp_dir.path()));
        test_with_storage(InMemoryStorage::new());
    }

    #[test]
    fn test_trait_find_applies_filter() {
        fn test_with_storage<S: IssueStore>(storage: S) {
            storage.init().unwrap();

            storage
                .insert_issue(new_issue("a", "o", Status::Open, Some(5)))
                .unwrap();
            storage
                .insert_issue(new_issue("b", "o", Status::Closed, Some(10)))
                .unwrap();

            let filter = IssueFilter {
                status: Some("Closed".to_string()),
                ..Default::default()
            };
            let issues = storage.find_issues(&filter).unwrap();
            assert_eq!(issues.len(), 1);
            assert_eq!(issues[0].title, "b");

            let filter = IssueFilter {
                effort_lte: Some(5),
                ..Default::default()
            };
            let issues = storage.find_issues(&filter).unwrap();
            assert_eq!(issues.len(), 1);
            assert_eq!(issues[0].title, "a");
        }

        // Test with both backends
        let temp_dir = tempfile::tempdir().unwrap();
        test_with_storage(JsonFileStorage::new(temp_dir.path()));
        test_with_storage(InMemoryStorage::new());
    }

    #[test]
    fn test_trait_load_missing_is_none() {
        fn test_with_storage<S: IssueStore>(storage: S) {
            storage.init().unwrap();
            assert!(storage.load_issue("nonexistent").unwrap().is_none());
        }

        // Test with both backends
        let temp_dir = tempfile::tempdir().unwrap();
        test_with_storage(JsonFileStorage::new(temp_dir.path()));
        test_with_storage(InMemoryStorage::new());
    }

    #[test]
    fn test_trait_replace_keeps_id_and_position() {
        fn test_with_storage<S: IssueStore>(storage: S) {
            storage.init().unwrap();

            let first = storage.insert_issue(NewIssue::new("first", "o")).unwrap();
            storage.insert_issue(NewIssue::new("second", "o")).unwrap();

            let replaced = storage
                .replace_issue(&first.id, new_issue("first v2", "p", Status::Fixed, None))
                .unwrap()
                .unwrap();
            assert_eq!(replaced.id, first.id);
            assert_eq!(replaced.title, "first v2");
            assert_eq!(replaced.status, Status::Fixed);

            let issues = storage.find_issues(&IssueFilter::default()).unwrap();
            let titles: Vec<_> = issues.iter().map(|i| i.title.as_str()).collect();
            assert_eq!(titles, ["first v2", "second"]);
        }

        // Test with both backends
        let temp_dir = tempfile::tempdir().unwrap();
        test_with_storage(JsonFileStorage::new(temp_dir.path()));
        test_with_storage(InMemoryStorage::new());
    }

    #[test]
    fn test_trait_replace_missing_is_none() {
        fn test_with_storage<S: IssueStore>(storage: S) {
            storage.init().unwrap();
            let result = storage
                .replace_issue("nonexistent", NewIssue::new("t", "o"))
                .unwrap();
            assert!(result.is_none());
        }

        // Test with both backends
        let temp_dir = tempfile::tempdir().unwrap();
        test_with_storage(JsonFileStorage::new(temp_dir.path()));
        test_with_storage(InMemoryStorage::new());
    }

    #[test]
    fn test_trait_delete_issue() {
        fn test_with_storage<S: IssueStore>(storage: S) {
            storage.init().unwrap();

            let issue = storage.insert_issue(NewIssue::new("t", "o")).unwrap();
            assert!(storage.delete_issue(&issue.id).unwrap());
            assert!(storage.load_issue(&issue.id).unwrap().is_none());

            // Second delete of the same id reports the absence
            assert!(!storage.delete_issue(&issue.id).unwrap());
        }

        // Test with both backends
        let temp_dir = tempfile::tempdir().unwrap();
        test_with_storage(JsonFileStorage::new(temp_dir.path()));
        test_with_storage(InMemoryStorage::new());
    }
}
