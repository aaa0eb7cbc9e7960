//! Form-related rule lookup over a page's embedded `<style>` blocks.
//!
//! This is a textual heuristic, not a CSS parser. Each style block is split on
//! `}` into rule fragments; a fragment is kept when the text before its first
//! `{` contains one of [`FORM_SELECTORS`] as a substring. The trimmed text before
//! the brace becomes the selector key and the trimmed text after it becomes the
//! declarations. The first rule seen for a given key wins and later duplicates
//! are ignored.
//!
//! ```rust
//! use promptplace_core::html::Document;
//! use promptplace_core::style::StyleIndex;
//!
//! let page = Document::parse(
//!     "<style>form { margin: 0 } .note { color: gray } form { margin: 9px }</style>",
//! );
//! let index = StyleIndex::from_document(&page);
//! assert_eq!(index.get("form"), Some("margin: 0"));
//! assert_eq!(index.get(".note"), Some("color: gray"));
//! assert_eq!(index.len(), 2);
//! ```

use crate::html::Document;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Selector tokens that mark a rule as form-related.
pub const FORM_SELECTORS: [&str; 7] = [
    "form",
    "#prompt-form",
    ".prompt-form",
    r#"input[type="text"]"#,
    r#"button[type="submit"]"#,
    ".note",
    "button",
];

/// One indexed rule: raw selector text and its raw declaration block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleRule {
    /// Selector text before the opening brace, trimmed.
    pub selector: String,
    /// Declaration text after the opening brace, trimmed.
    pub declarations: String,
}

/// Form-related rules in first-seen order, unique by selector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleIndex {
    rules: Vec<StyleRule>,
}

impl StyleIndex {
    /// Scan every `<style>` element of `doc`.
    pub fn from_document(doc: &Document) -> Self {
        let mut index = Self::default();
        for style in doc.find_all(doc.root(), "style") {
            let css = doc.text_content(style);
            if css.is_empty() {
                continue;
            }
            index.scan(&css);
        }
        debug!(
            selectors = ?index.rules.iter().map(|r| r.selector.as_str()).collect::<Vec<_>>(),
            "Indexed form-related style rules"
        );
        index
    }

    /// Index the rules of one stylesheet body.
    pub fn scan(&mut self, css: &str) {
        for fragment in css.split('}') {
            let mut parts = fragment.split('{');
            let (Some(head), Some(body)) = (parts.next(), parts.next()) else {
                continue;
            };
            if !FORM_SELECTORS.iter().any(|token| head.contains(token)) {
                continue;
            }
            self.insert(head.trim(), body.trim());
        }
    }

    /// Record a rule unless its selector is already present.
    ///
    /// Returns whether the rule was stored.
    pub fn insert(&mut self, selector: &str, declarations: &str) -> bool {
        if self.get(selector).is_some() {
            return false;
        }
        self.rules.push(StyleRule {
            selector: selector.to_string(),
            declarations: declarations.to_string(),
        });
        true
    }

    /// Declarations recorded for an exact selector key.
    pub fn get(&self, selector: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.selector == selector)
            .map(|rule| rule.declarations.as_str())
    }

    /// Rules in the order they were first seen.
    pub fn rules(&self) -> &[StyleRule] {
        &self.rules
    }

    /// Number of indexed selectors.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether nothing was indexed.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
