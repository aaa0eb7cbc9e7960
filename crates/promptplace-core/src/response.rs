//! Recover an HTML document from free-form model output.
//!
//! ```rust
//! use promptplace_core::response::extract_html;
//!
//! let html = extract_html("Here you go:\n```html\n<p>hi</p>\n```\nEnjoy!")?;
//! assert_eq!(html, "<p>hi</p>");
//! # Ok::<(), promptplace_core::Error>(())
//! ```

use crate::html::Document;
use crate::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Fenced block with an optional `html` tag.
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static FENCED_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:html)?\s*([\s\S]*?)\s*```").unwrap());

/// Tags whose presence marks unfenced output as markup.
const STRUCTURAL_TAGS: [&str; 13] = [
    "html", "body", "div", "section", "header", "footer", "p", "h1", "h2", "h3", "h4", "h5", "h6",
];

/// Pull the intended HTML out of a model response.
///
/// The first fenced block wins and is returned trimmed. Without a fence, the
/// whole response is returned trimmed if it contains any structural tag.
///
/// # Errors
///
/// Returns [`Error::Extraction`] when there is neither a fenced block nor a
/// structural tag.
pub fn extract_html(response: &str) -> Result<String> {
    if let Some(block) = FENCED_BLOCK_RE
        .captures(response)
        .and_then(|captures| captures.get(1))
    {
        debug!(bytes = block.len(), "Using first fenced block of model response");
        return Ok(block.as_str().trim().to_string());
    }

    let doc = Document::parse(response);
    let has_structure = doc.descendants(doc.root()).into_iter().any(|node| {
        doc.tag_name(node)
            .is_some_and(|tag| STRUCTURAL_TAGS.contains(&tag))
    });
    if has_structure {
        debug!("Model response is unfenced markup");
        return Ok(response.trim().to_string());
    }

    Err(Error::Extraction(
        "Could not extract HTML from model response".to_string(),
    ))
}
