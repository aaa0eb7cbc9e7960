//! The edit-by-issue loop.
//!
//! ```text
//! issue ──► page ──► extract_form ──► build_prompt ──► model
//!                          │                              │
//!                      form block                   extract_html
//!                          │                              │
//!                          └──────► reinsert_form ◄───────┘
//!                                        │
//!                                  commit, comment, close
//! ```
//!
//! Collaborator errors abort the run. A model response without recoverable
//! markup does not: the raw response is used as the new page instead.
//! Comments and closing the issue are best-effort and only logged on failure.

use crate::collaborators::{DocumentStore, IssueNotifier, IssueSource, LanguageModel};
use crate::config::Config;
use crate::form::{FormOrigin, Placement, extract_form, reinsert_form_with_placement};
use crate::github::GitHubClient;
use crate::model::GeminiClient;
use crate::prompt::build_prompt;
use crate::response::extract_html;
use crate::types::RepoRef;
use crate::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};

/// The four external services a run talks to.
#[derive(Clone)]
pub struct Collaborators {
    /// Where the change request is read from.
    pub issues: Arc<dyn IssueSource>,
    /// Where the page lives.
    pub store: Arc<dyn DocumentStore>,
    /// Rewrites the page.
    pub model: Arc<dyn LanguageModel>,
    /// Reports back on the issue.
    pub notifier: Arc<dyn IssueNotifier>,
}

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Commit that wrote the new page.
    pub commit_sha: String,
    /// Whether the form came from the page or the built-in block.
    pub form_origin: FormOrigin,
    /// How the form was placed into the rewritten page.
    pub placement: Placement,
    /// The model response had no recoverable markup and was used verbatim.
    pub used_raw_response: bool,
}

/// One configured run against one issue.
pub struct Pipeline {
    repo: RepoRef,
    issue_number: u64,
    page_path: String,
    collaborators: Collaborators,
}

impl Pipeline {
    /// Run issue `issue_number` against `page_path` in `repo`.
    pub fn new(
        repo: RepoRef,
        issue_number: u64,
        page_path: impl Into<String>,
        collaborators: Collaborators,
    ) -> Self {
        Self {
            repo,
            issue_number,
            page_path: page_path.into(),
            collaborators,
        }
    }

    /// Wire the HTTP clients described by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let github = Arc::new(GitHubClient::new(&config.github)?);
        let model = Arc::new(GeminiClient::new(&config.model)?);
        let collaborators = Collaborators {
            issues: github.clone(),
            store: github.clone(),
            model,
            notifier: github,
        };
        Ok(Self::new(
            config.repo(),
            config.issue_number,
            config.page_path.clone(),
            collaborators,
        ))
    }

    /// Apply the issue's change request to the page and report back.
    pub async fn run(&self) -> Result<RunReport> {
        let Collaborators {
            issues,
            store,
            model,
            ..
        } = &self.collaborators;

        let issue = issues.get_issue(self.issue_number).await?;
        info!(issue = issue.number, title = %issue.title, "Processing issue");

        let document = store.get_document(&self.page_path).await?;
        info!(path = %self.page_path, "Retrieved current page");

        let extraction = extract_form(&document.content, &self.repo);
        info!(origin = ?extraction.origin, "Extracted form from page");

        let prompt = build_prompt(&extraction.remainder, issue.instructions());
        let response = model.complete(&prompt).await?;
        info!("Received model response");

        let (candidate, used_raw_response) = match extract_html(&response) {
            Ok(html) => (html, false),
            Err(Error::Extraction(reason)) => {
                warn!(%reason, "HTML extraction failed, using raw model response");
                (response, true)
            },
            Err(err) => return Err(err),
        };

        let reinsertion = reinsert_form_with_placement(&extraction.form_block, &candidate);
        info!(placement = ?reinsertion.placement, "Added form back to the page");

        let message = format!(
            "Update {} based on issue #{}",
            self.page_path, self.issue_number
        );
        let commit = store
            .put_document(&self.page_path, &reinsertion.page, &document.version, &message)
            .await?;
        info!(sha = %commit.sha, "Committed changes");

        self.notify(&success_comment(&self.repo, &commit.sha)).await;
        self.close_issue().await;

        Ok(RunReport {
            commit_sha: commit.sha,
            form_origin: extraction.origin,
            placement: reinsertion.placement,
            used_raw_response,
        })
    }

    /// Run once and map the outcome to a process exit code.
    ///
    /// On failure the error is posted to the issue (best-effort) and `1` is
    /// returned.
    pub async fn execute(&self) -> i32 {
        match self.run().await {
            Ok(report) => {
                info!(
                    commit = %report.commit_sha,
                    used_raw_response = report.used_raw_response,
                    "Page updated"
                );
                0
            },
            Err(err) => {
                error!(error = %err, category = err.category(), "Failed to update page");
                self.notify(&failure_comment(&err)).await;
                1
            },
        }
    }

    async fn notify(&self, body: &str) {
        if let Err(err) = self
            .collaborators
            .notifier
            .comment(self.issue_number, body)
            .await
        {
            warn!(error = %err, "Failed to add comment to issue");
        }
    }

    async fn close_issue(&self) {
        match self.collaborators.notifier.close(self.issue_number).await {
            Ok(()) => info!(issue = self.issue_number, "Closed issue"),
            Err(err) => warn!(error = %err, "Failed to close issue"),
        }
    }
}

/// Comment posted after a successful commit.
pub fn success_comment(repo: &RepoRef, commit_sha: &str) -> String {
    format!(
        "
## Website Updated! 🎉

Your changes have been applied to the website based on your instructions.

### 🔗 Links
- [View Commit]({commit})
- [View Website]({site})

If you need further adjustments, please create a new issue with the 'prompt' label.
",
        commit = repo.commit_url(commit_sha),
        site = repo.site_url(),
    )
}

/// Comment posted when a run fails.
pub fn failure_comment(err: &impl fmt::Display) -> String {
    format!(
        "
## ❌ Error Updating Website

Sorry, an error occurred while processing your request:

```
{err}
```

Please check your instructions and try again. If the problem persists, contact the repository maintainer.
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_comment_links() {
        let comment = success_comment(&RepoRef::new("octo", "site"), "c0ffee");
        assert!(comment.contains("- [View Commit](https://github.com/octo/site/commit/c0ffee)"));
        assert!(comment.contains("- [View Website](https://octo.github.io/site/)"));
        assert!(comment.contains("'prompt' label"));
    }

    #[test]
    fn test_failure_comment_fences_error() {
        let err = Error::GitHub("GET issues/7 returned 404 Not Found".to_string());
        let comment = failure_comment(&err);
        assert!(comment.contains(
            "```\nGitHub API request failed: GET issues/7 returned 404 Not Found\n```"
        ));
        assert!(comment.contains("contact the repository maintainer"));
    }
}
