//! Runtime configuration for one pipeline run.
//!
//! Configuration is resolved once at startup and passed explicitly into
//! [`crate::Pipeline::from_config`]; nothing below the entry point reads the
//! process environment.
//!
//! ## Sources
//!
//! 1. **Defaults**: public GitHub and Gemini endpoints, `main` branch, `index.html`
//! 2. **TOML file**: named by `PROMPTPLACE_CONFIG`, if set
//! 3. **Environment variables**: override any value from the file
//!
//! | Variable          | Field                 | Required |
//! |-------------------|-----------------------|----------|
//! | `REPO_OWNER`      | `github.owner`        | yes      |
//! | `REPO_NAME`       | `github.repo`         | yes      |
//! | `GITHUB_TOKEN`    | `github.token`        | yes      |
//! | `ISSUE_NUMBER`    | `issue_number`        | yes      |
//! | `GEMINI_API_KEY`  | `model.api_key`       | yes      |
//! | `GITHUB_API_URL`  | `github.api_url`      | no       |
//! | `GITHUB_BRANCH`   | `github.branch`       | no       |
//! | `PAGE_PATH`       | `page_path`           | no       |
//! | `GEMINI_API_URL`  | `model.api_url`       | no       |
//! | `GEMINI_MODEL`    | `model.model`         | no       |
//!
//! ## Example
//!
//! ```rust
//! use promptplace_core::Config;
//! use std::collections::HashMap;
//!
//! let env: HashMap<&str, &str> = HashMap::from([
//!     ("REPO_OWNER", "octo"),
//!     ("REPO_NAME", "site"),
//!     ("GITHUB_TOKEN", "ghp_example"),
//!     ("ISSUE_NUMBER", "42"),
//!     ("GEMINI_API_KEY", "key"),
//! ]);
//! let config = Config::from_lookup(|name| env.get(name).map(ToString::to_string))?;
//!
//! assert_eq!(config.issue_number, 42);
//! assert_eq!(config.page_path, "index.html");
//! assert_eq!(config.model.model, "gemini-2.0-flash");
//! # Ok::<(), promptplace_core::Error>(())
//! ```

use crate::types::RepoRef;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use url::Url;

/// Environment variable naming an optional TOML configuration file.
pub const CONFIG_PATH_VAR: &str = "PROMPTPLACE_CONFIG";

const DEFAULT_GITHUB_API: &str = "https://api.github.com";
const DEFAULT_BRANCH: &str = "main";
const DEFAULT_PAGE_PATH: &str = "index.html";
const DEFAULT_GEMINI_API: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Everything one run needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Repository host settings.
    pub github: GitHubConfig,
    /// Language model settings.
    pub model: ModelConfig,
    /// Issue carrying the change request.
    pub issue_number: u64,
    /// Page to rewrite, relative to the repository root.
    pub page_path: String,
}

/// Repository host settings.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Token with contents and issues write access.
    pub token: String,
    /// REST API base URL.
    pub api_url: String,
    /// Branch commits are written to.
    pub branch: String,
}

/// Language model settings.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// API key sent as the `key` query parameter.
    pub api_key: String,
    /// API base URL, up to but excluding `/models`.
    pub api_url: String,
    /// Model name.
    pub model: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github: GitHubConfig::default(),
            model: ModelConfig::default(),
            issue_number: 0,
            page_path: DEFAULT_PAGE_PATH.to_string(),
        }
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            owner: String::new(),
            repo: String::new(),
            token: String::new(),
            api_url: DEFAULT_GITHUB_API.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: DEFAULT_GEMINI_API.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
        }
    }
}

impl fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("token", &redacted(&self.token))
            .field("api_url", &self.api_url)
            .field("branch", &self.branch)
            .finish()
    }
}

impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("api_key", &redacted(&self.api_key))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .finish()
    }
}

const fn redacted(secret: &str) -> &'static str {
    if secret.is_empty() { "<unset>" } else { "<redacted>" }
}

impl Config {
    /// Resolve configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration file cannot be read or
    /// parsed, an override is malformed, or validation fails.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve configuration from an arbitrary variable lookup.
    ///
    /// Loads the file named by [`CONFIG_PATH_VAR`] when present, applies
    /// variable overrides, then validates.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = match non_empty(&lookup, CONFIG_PATH_VAR) {
            Some(path) => Self::load(Path::new(&path))?,
            None => Self::default(),
        };
        let config = base.with_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Read configuration from a TOML file without validating it.
    ///
    /// Secrets are usually left out of the file and supplied through the
    /// environment afterwards.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {e}", path.display()))
        })?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config {}: {e}", path.display())))
    }

    /// Apply variable overrides. Unset and empty variables leave values as is.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let string_fields: [(&str, &mut String); 9] = [
            ("REPO_OWNER", &mut self.github.owner),
            ("REPO_NAME", &mut self.github.repo),
            ("GITHUB_TOKEN", &mut self.github.token),
            ("GITHUB_API_URL", &mut self.github.api_url),
            ("GITHUB_BRANCH", &mut self.github.branch),
            ("PAGE_PATH", &mut self.page_path),
            ("GEMINI_API_KEY", &mut self.model.api_key),
            ("GEMINI_API_URL", &mut self.model.api_url),
            ("GEMINI_MODEL", &mut self.model.model),
        ];
        for (name, field) in string_fields {
            if let Some(value) = non_empty(&lookup, name) {
                *field = value;
            }
        }

        if let Some(raw) = non_empty(&lookup, "ISSUE_NUMBER") {
            self.issue_number = raw.trim().parse().map_err(|_| {
                Error::Config(format!("ISSUE_NUMBER must be a positive integer, got '{raw}'"))
            })?;
        }

        Ok(self)
    }

    /// Check that every required value is present and well-formed.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("REPO_OWNER", &self.github.owner),
            ("REPO_NAME", &self.github.repo),
            ("GITHUB_TOKEN", &self.github.token),
            ("GEMINI_API_KEY", &self.model.api_key),
            ("PAGE_PATH", &self.page_path),
            ("GEMINI_MODEL", &self.model.model),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(Error::Config(format!(
                "Missing required settings: {}",
                missing.join(", ")
            )));
        }

        if self.issue_number == 0 {
            return Err(Error::Config(
                "ISSUE_NUMBER must be a positive integer".to_string(),
            ));
        }

        for (name, value) in [
            ("GITHUB_API_URL", &self.github.api_url),
            ("GEMINI_API_URL", &self.model.api_url),
        ] {
            Url::parse(value)
                .map_err(|e| Error::Config(format!("{name} is not a valid URL '{value}': {e}")))?;
        }

        Ok(())
    }

    /// Repository the run operates on.
    pub fn repo(&self) -> RepoRef {
        RepoRef::new(&self.github.owner, &self.github.repo)
    }
}

fn non_empty<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn required_env() -> HashMap<String, String> {
        [
            ("REPO_OWNER", "octo"),
            ("REPO_NAME", "site"),
            ("GITHUB_TOKEN", "ghp_secret"),
            ("ISSUE_NUMBER", "7"),
            ("GEMINI_API_KEY", "gm_secret"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    fn resolve(env: &HashMap<String, String>) -> Result<Config> {
        Config::from_lookup(|name| env.get(name).cloned())
    }

    #[test]
    fn test_required_variables_with_defaults() -> Result<()> {
        let config = resolve(&required_env())?;
        assert_eq!(config.repo(), RepoRef::new("octo", "site"));
        assert_eq!(config.github.token, "ghp_secret");
        assert_eq!(config.github.api_url, DEFAULT_GITHUB_API);
        assert_eq!(config.github.branch, "main");
        assert_eq!(config.issue_number, 7);
        assert_eq!(config.page_path, "index.html");
        assert_eq!(config.model.api_key, "gm_secret");
        assert_eq!(config.model.model, "gemini-2.0-flash");
        Ok(())
    }

    #[test]
    fn test_optional_overrides() -> Result<()> {
        let mut env = required_env();
        env.insert("GITHUB_API_URL".into(), "http://127.0.0.1:9000".into());
        env.insert("GITHUB_BRANCH".into(), "gh-pages".into());
        env.insert("PAGE_PATH".into(), "docs/index.html".into());
        env.insert("GEMINI_MODEL".into(), "gemini-1.5-pro".into());
        let config = resolve(&env)?;
        assert_eq!(config.github.api_url, "http://127.0.0.1:9000");
        assert_eq!(config.github.branch, "gh-pages");
        assert_eq!(config.page_path, "docs/index.html");
        assert_eq!(config.model.model, "gemini-1.5-pro");
        Ok(())
    }

    #[test]
    fn test_missing_required_lists_every_name() {
        let mut env = required_env();
        env.remove("GITHUB_TOKEN");
        env.insert("GEMINI_API_KEY".into(), "   ".into());
        let err = resolve(&env).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        let message = err.to_string();
        assert!(message.contains("GITHUB_TOKEN"));
        assert!(message.contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_non_numeric_issue_number_rejected() {
        let mut env = required_env();
        env.insert("ISSUE_NUMBER".into(), "seven".into());
        let err = resolve(&env).unwrap_err();
        assert!(err.to_string().contains("ISSUE_NUMBER"));
    }

    #[test]
    fn test_missing_issue_number_rejected() {
        let mut env = required_env();
        env.remove("ISSUE_NUMBER");
        assert!(matches!(resolve(&env), Err(Error::Config(_))));
    }

    #[test]
    fn test_invalid_api_url_rejected() {
        let mut env = required_env();
        env.insert("GEMINI_API_URL".into(), "not a url".into());
        let err = resolve(&env).unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_URL"));
    }

    #[test]
    fn test_file_then_environment_overrides() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("promptplace.toml");
        fs::write(
            &path,
            r#"
issue_number = 3
page_path = "site/index.html"

[github]
owner = "from-file"
repo = "pages"
branch = "gh-pages"

[model]
model = "gemini-1.5-flash"
"#,
        )?;

        let path = path.to_string_lossy().into_owned();
        let env: HashMap<String, String> = [
            (CONFIG_PATH_VAR, path.as_str()),
            ("REPO_OWNER", "from-env"),
            ("GITHUB_TOKEN", "t"),
            ("GEMINI_API_KEY", "k"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let config = resolve(&env)?;
        assert_eq!(config.github.owner, "from-env");
        assert_eq!(config.github.repo, "pages");
        assert_eq!(config.github.branch, "gh-pages");
        assert_eq!(config.github.api_url, DEFAULT_GITHUB_API);
        assert_eq!(config.issue_number, 3);
        assert_eq!(config.page_path, "site/index.html");
        assert_eq!(config.model.model, "gemini-1.5-flash");
        Ok(())
    }

    #[test]
    fn test_unreadable_and_malformed_files() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let missing = temp_dir.path().join("absent.toml");
        assert!(matches!(Config::load(&missing), Err(Error::Config(_))));

        let broken = temp_dir.path().join("broken.toml");
        fs::write(&broken, "issue_number = \"many\"\n[github\n")?;
        let err = Config::load(&broken).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
        Ok(())
    }

    #[test]
    fn test_debug_output_redacts_secrets() -> Result<()> {
        let config = resolve(&required_env())?;
        let debug = format!("{config:?}");
        assert!(!debug.contains("ghp_secret"));
        assert!(!debug.contains("gm_secret"));
        assert!(debug.contains("<redacted>"));
        Ok(())
    }
}
