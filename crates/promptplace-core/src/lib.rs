//! # promptplace-core
//!
//! Core of promptplace: apply a natural-language change request, filed as an
//! issue, to a hosted web page through a language model, without losing the
//! page's own request form.
//!
//! ## Architecture
//!
//! - **Markup arena** ([`html`]): lenient parser and index-based tree with
//!   explicit detach and cross-document import
//! - **Form transform** ([`style`], [`form`], [`response`]): index form-related
//!   style rules, locate and inline the form, detach it before the page goes
//!   to the model, recover markup from the model's reply and put the form back
//! - **Collaborators** ([`collaborators`], [`github`], [`model`]): async traits
//!   for the repository host and the model, with HTTP implementations
//! - **Orchestration** ([`pipeline`], [`config`]): one run per issue
//!
//! The transform performs no I/O and never fails; only collaborators do.
//!
//! ## Quick Start
//!
//! ```rust
//! use promptplace_core::{RepoRef, extract_form, extract_html, reinsert_form};
//!
//! let repo = RepoRef::new("octo", "site");
//! let page = "<html><body><form><input type=\"text\"></form><h1>Old</h1></body></html>";
//!
//! let extraction = extract_form(page, &repo);
//! assert_eq!(extraction.remainder, "<html><body><h1>Old</h1></body></html>");
//!
//! let reply = "Sure!\n```html\n<html><body><h1>New</h1></body></html>\n```";
//! let candidate = extract_html(reply)?;
//! let updated = reinsert_form(&extraction.form_block, &candidate);
//!
//! assert_eq!(
//!     updated,
//!     "<html><body><form><input type=\"text\"></form><h1>New</h1></body></html>"
//! );
//! # Ok::<(), promptplace_core::Error>(())
//! ```

/// Collaborator traits consumed by the pipeline
pub mod collaborators;
/// Runtime configuration
pub mod config;
/// Error types and result aliases
pub mod error;
/// Request-form locate, inline, extract and reinsert
pub mod form;
/// GitHub REST client
pub mod github;
/// Markup arena, parser and serializer
pub mod html;
/// Gemini client
pub mod model;
/// Orchestration of one edit run
pub mod pipeline;
/// Prompt template
pub mod prompt;
/// Markup recovery from model output
pub mod response;
/// Form-related style rule index
pub mod style;
/// Shared data types
pub mod types;

pub use collaborators::{DocumentStore, IssueNotifier, IssueSource, LanguageModel};
pub use config::{Config, GitHubConfig, ModelConfig};
pub use error::{Error, Result};
pub use form::{
    Extraction, FormLocation, FormOrigin, Placement, extract_form, fallback_form_block,
    locate_form, reinsert_form,
};
pub use github::GitHubClient;
pub use html::{Document, NodeId};
pub use model::GeminiClient;
pub use pipeline::{Collaborators, Pipeline, RunReport};
pub use prompt::build_prompt;
pub use response::extract_html;
pub use style::StyleIndex;
pub use types::{CommitInfo, Issue, RepoRef, StoredDocument};
