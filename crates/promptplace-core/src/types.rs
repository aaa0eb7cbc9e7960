use serde::{Deserialize, Serialize};
use std::fmt;

/// A hosted repository, identified by owner and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    /// User or organization.
    pub owner: String,
    /// Repository name.
    pub name: String,
}

impl RepoRef {
    /// Reference `owner/name`.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Web form endpoint that opens a new issue in this repository.
    pub fn new_issue_url(&self) -> String {
        format!("https://github.com/{}/{}/issues/new", self.owner, self.name)
    }

    /// Web page of commit `sha`.
    pub fn commit_url(&self, sha: &str) -> String {
        format!("https://github.com/{}/{}/commit/{sha}", self.owner, self.name)
    }

    /// Published site for the repository's pages branch.
    pub fn site_url(&self) -> String {
        format!("https://{}.github.io/{}/", self.owner, self.name)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A change request filed against the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Issue number within the repository.
    pub number: u64,
    /// Issue title.
    pub title: String,
    /// Free-form instructions. Issues may be filed with no body at all.
    pub body: Option<String>,
}

impl Issue {
    /// The issue body, or an empty string when none was given.
    pub fn instructions(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }
}

/// File content together with the version token required to overwrite it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    /// Decoded file content.
    pub content: String,
    /// Opaque token (a blob sha for GitHub) the next write must present.
    pub version: String,
}

/// Outcome of a successful write to the document store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    /// Commit id.
    pub sha: String,
}
