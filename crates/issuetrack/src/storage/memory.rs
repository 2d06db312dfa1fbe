//! In-memory storage implementation for testing.
//!
//! All records live in a shared vector, which doubles as the insertion
//! order. Each instance is isolated, making it ideal for parallel test
//! execution; clones share the same data.

use crate::domain::{Issue, NewIssue};
use crate::query::IssueFilter;
use crate::storage::IssueStore;
use anyhow::{anyhow, Result};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// In-memory record store backed by a shared vector.
///
/// Uses `Arc<RwLock<...>>` so clones share data and the store satisfies the
/// `Send + Sync` bounds the HTTP layer requires. All data is lost when the
/// last clone is dropped.
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    issues: Arc<RwLock<Vec<Issue>>>,
}

impl InMemoryStorage {
    /// Create a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Issue>>> {
        self.issues
            .read()
            .map_err(|_| anyhow!("issue store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Issue>>> {
        self.issues
            .write()
            .map_err(|_| anyhow!("issue store lock poisoned"))
    }
}

impl IssueStore for InMemoryStorage {
    fn init(&self) -> Result<()> {
        // No initialization needed for in-memory storage
        Ok(())
    }

    fn insert_issue(&self, new: NewIssue) -> Result<Issue> {
        let issue = new.into_issue(Uuid::new_v4().to_string());
        self.write()?.push(issue.clone());
        Ok(issue)
    }

    fn find_issues(&self, filter: &IssueFilter) -> Result<Vec<Issue>> {
        Ok(self
            .read()?
            .iter()
            .filter(|issue| filter.matches(issue))
            .cloned()
            .collect())
    }

    fn load_issue(&self, id: &str) -> Result<Option<Issue>> {
        Ok(self.read()?.iter().find(|issue| issue.id == id).cloned())
    }

    fn replace_issue(&self, id: &str, fields: NewIssue) -> Result<Option<Issue>> {
        let mut issues = self.write()?;
        match issues.iter().position(|issue| issue.id == id) {
            Some(index) => {
                let issue = fields.into_issue(id.to_string());
                issues[index] = issue.clone();
                Ok(Some(issue))
            }
            None => Ok(None),
        }
    }

    fn delete_issue(&self, id: &str) -> Result<bool> {
        let mut issues = self.write()?;
        let before = issues.len();
        issues.retain(|issue| issue.id != id);
        Ok(issues.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Status;

    #[test]
    fn test_init_is_noop() {
        let storage = InMemoryStorage::new();
        storage.init().unwrap();
        storage.init().unwrap(); // Should be idempotent
    }

    #[test]
    fn test_insert_assigns_uuid() {
        let storage = InMemoryStorage::new();
        storage.init().unwrap();

        let issue = storage.insert_issue(NewIssue::new("Test", "o")).unwrap();
        assert!(Uuid::parse_str(&issue.id).is_ok());
    }

    #[test]
    fn test_clone_shares_storage() {
        let storage1 = InMemoryStorage::new();
        storage1.init().unwrap();

        let issue1 = storage1
            .insert_issue(NewIssue::new("Issue 1", "o"))
            .unwrap();

        // Clone shares the same underlying storage
        let storage2 = storage1.clone();
        let loaded = storage2.load_issue(&issue1.id).unwrap().unwrap();
        assert_eq!(loaded.title, "Issue 1");

        storage2.insert_issue(NewIssue::new("Issue 2", "o")).unwrap();

        // Both see the same data because they share the lock
        let issues1 = storage1.find_issues(&IssueFilter::default()).unwrap();
        let issues2 = storage2.find_issues(&IssueFilter::default()).unwrap();
        assert_eq!(issues1.len(), 2);
        assert_eq!(issues2.len(), 2);
    }

    #[test]
    fn test_replace_does_not_reorder() {
        let storage = InMemoryStorage::new();
        storage.init().unwrap();

        let a = storage.insert_issue(NewIssue::new("a", "o")).unwrap();
        storage.insert_issue(NewIssue::new("b", "o")).unwrap();

        let mut fields = NewIssue::new("a v2", "o");
        fields.status = Status::Fixed;
        storage.replace_issue(&a.id, fields).unwrap().unwrap();

        let issues = storage.find_issues(&IssueFilter::default()).unwrap();
        assert_eq!(issues[0].title, "a v2");
        assert_eq!(issues[1].title, "b");
    }

    #[test]
    fn test_delete_missing_reports_false() {
        let storage = InMemoryStorage::new();
        storage.init().unwrap();
        assert!(!storage.delete_issue("nonexistent").unwrap());
    }
}
