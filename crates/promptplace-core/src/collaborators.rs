//! Boundaries between the pipeline and the outside world.
//!
//! The pipeline only talks to these traits, so the whole edit loop can run
//! against in-memory fakes. [`crate::github::GitHubClient`] implements the
//! repository-side traits and [`crate::model::GeminiClient`] the model.

use crate::Result;
use crate::types::{CommitInfo, Issue, StoredDocument};

/// Supplies the change request.
#[async_trait::async_trait]
pub trait IssueSource: Send + Sync {
    /// Fetch issue `number`.
    async fn get_issue(&self, number: u64) -> Result<Issue>;
}

/// Versioned file storage.
///
/// Writes are guarded by the version token returned from the matching read;
/// rejecting a stale token is the store's job.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read `path` together with its current version token.
    async fn get_document(&self, path: &str) -> Result<StoredDocument>;

    /// Replace `path` with `content`, provided it is still at `version`.
    async fn put_document(
        &self,
        path: &str,
        content: &str,
        version: &str,
        message: &str,
    ) -> Result<CommitInfo>;
}

/// Text completion.
#[async_trait::async_trait]
pub trait LanguageModel: Send + Sync {
    /// Complete `prompt`. An empty completion is an error.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Reports back on the originating issue.
#[async_trait::async_trait]
pub trait IssueNotifier: Send + Sync {
    /// Post `body` as a comment on issue `number`.
    async fn comment(&self, number: u64, body: &str) -> Result<()>;

    /// Close issue `number`.
    async fn close(&self, number: u64) -> Result<()>;
}
