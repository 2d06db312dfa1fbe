//! JSON file-based storage implementation.
//!
//! Each issue is stored as its own JSON file in a `data/` directory with
//! atomic writes. An index file carries the id list in insertion order,
//! which is what `find_issues` walks to return records oldest-first.

use crate::domain::{Issue, NewIssue};
use crate::query::IssueFilter;
use crate::storage::IssueStore;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const ISSUES_DIR: &str = "data/issues";
const INDEX_FILE: &str = "data/index.json";

/// Index of all issues in the store, ids in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Index {
    /// Schema version for future migrations
    schema_version: u32,
    /// All issue ids, oldest first
    all_ids: Vec<String>,
}

impl Default for Index {
    fn default() -> Self {
        Self {
            schema_version: 1,
            all_ids: Vec::new(),
        }
    }
}

/// JSON file-based record store.
///
/// Each issue lives in `data/issues/{id}.json`; `data/index.json` holds the
/// insertion-ordered id list. All file writes are atomic (write to temp
/// file, then rename).
#[derive(Clone)]
pub struct JsonFileStorage {
    root: PathBuf,
}

impl JsonFileStorage {
    /// Create a new JSON file storage instance at the given root path
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn issue_path(&self, id: &str) -> PathBuf {
        self.root.join(ISSUES_DIR).join(format!("{}.json", id))
    }

    fn write_json<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(data).context("Failed to serialize data")?;

        // Atomic write: write to temp file, then rename
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, json).context("Failed to write temporary file")?;
        fs::rename(&temp_path, path).context("Failed to rename temporary file")?;

        Ok(())
    }

    fn read_json<T: for<'de> Deserialize<'de>>(&self, path: &Path) -> Result<T> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        serde_json::from_str(&contents).context("Failed to deserialize data")
    }

    fn load_index(&self) -> Result<Index> {
        let index_path = self.root.join(INDEX_FILE);
        self.read_json(&index_path)
    }

    fn save_index(&self, index: &Index) -> Result<()> {
        let index_path = self.root.join(INDEX_FILE);
        self.write_json(&index_path, index)
    }
}

impl IssueStore for JsonFileStorage {
    fn init(&self) -> Result<()> {
        let issues_dir = self.root.join(ISSUES_DIR);

        fs::create_dir_all(&issues_dir).context("Failed to create issues directory")?;

        // Create index.json if it doesn't exist
        let index_path = self.root.join(INDEX_FILE);
        if !index_path.exists() {
            let index = Index::default();
            self.write_json(&index_path, &index)?;
        }

        Ok(())
    }

    fn insert_issue(&self, new: NewIssue) -> Result<Issue> {
        let issue = new.into_issue(Uuid::new_v4().to_string());
        self.write_json(&self.issue_path(&issue.id), &issue)?;

        // Record insertion order
        let mut index = self.load_index()?;
        index.all_ids.push(issue.id.clone());
        self.save_index(&index)?;

        Ok(issue)
    }

    fn find_issues(&self, filter: &IssueFilter) -> Result<Vec<Issue>> {
        let index = self.load_index()?;
        let mut issues = Vec::new();

        for id in &index.all_ids {
            let issue: Issue = self.read_json(&self.issue_path(id))?;
            if filter.matches(&issue) {
                issues.push(issue);
            }
        }

        Ok(issues)
    }

    fn load_issue(&self, id: &str) -> Result<Option<Issue>> {
        let issue_path = self.issue_path(id);
        if !issue_path.exists() {
            return Ok(None);
        }
        self.read_json(&issue_path).map(Some)
    }

    fn replace_issue(&self, id: &str, fields: NewIssue) -> Result<Option<Issue>> {
        let issue_path = self.issue_path(id);
        if !issue_path.exists() {
            return Ok(None);
        }

        let issue = fields.into_issue(id.to_string());
        self.write_json(&issue_path, &issue)?;
        Ok(Some(issue))
    }

    fn delete_issue(&self, id: &str) -> Result<bool> {
        let issue_path = self.issue_path(id);
        if !issue_path.exists() {
            return Ok(false);
        }

        fs::remove_file(&issue_path).context("Failed to delete issue file")?;

        // Update index
        let mut index = self.load_index()?;
        index.all_ids.retain(|i| i != id);
        self.save_index(&index)?;

        Ok(true)
    }
}
