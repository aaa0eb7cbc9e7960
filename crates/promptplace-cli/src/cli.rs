//! Command-line interface definition.
//!
//! `promptplace` takes no arguments: everything it needs comes from the
//! environment (see `promptplace_core::config`). It is meant to run inside a
//! workflow triggered by a newly labeled issue.
//!
//! ```bash
//! REPO_OWNER=octo REPO_NAME=site ISSUE_NUMBER=42 \
//! GITHUB_TOKEN=... GEMINI_API_KEY=... promptplace
//! ```

use clap::Parser;

/// Apply an issue's change request to the hosted page.
#[derive(Parser, Clone, Debug)]
#[command(name = "promptplace", version, about, long_about = None)]
#[command(after_help = "Configuration is read from REPO_OWNER, REPO_NAME, GITHUB_TOKEN, \
ISSUE_NUMBER and GEMINI_API_KEY, optionally layered over the TOML file named by \
PROMPTPLACE_CONFIG. Set PROMPTPLACE_DEBUG for debug logging.")]
pub struct Cli {}
