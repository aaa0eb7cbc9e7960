//! Split a page into its inlined form block and the form-free remainder.

use super::inline::inline_styles;
use super::locate::{FormLocation, locate_form};
use crate::html::Document;
use crate::style::StyleIndex;
use crate::types::RepoRef;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Where the form block of an [`Extraction`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormOrigin {
    /// Detached from the page.
    Extracted,
    /// No form was found; the built-in block was used and the page left as is.
    Fallback,
}

/// A form block and the page it was taken from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Serialized form block with inlined styles.
    pub form_block: String,
    /// The page without the form block.
    pub remainder: String,
    /// Whether `form_block` came from the page.
    pub origin: FormOrigin,
}

/// Extract the request form from `page`.
///
/// The page's form-related style rules are inlined into the located target,
/// which is then serialized and detached. When nothing can be located the
/// built-in [`fallback_form_block`] is returned together with the page text,
/// unmodified.
///
/// ```rust
/// use promptplace_core::form::{FormOrigin, extract_form};
/// use promptplace_core::RepoRef;
///
/// let repo = RepoRef::new("octo", "site");
/// let page = "<style>form { gap: 4px }</style><body><form></form><p>hi</p></body>";
/// let extraction = extract_form(page, &repo);
///
/// assert_eq!(extraction.origin, FormOrigin::Extracted);
/// assert_eq!(extraction.form_block, r#"<form style="gap: 4px"></form>"#);
/// assert_eq!(
///     extraction.remainder,
///     "<style>form { gap: 4px }</style><body><p>hi</p></body>"
/// );
/// ```
pub fn extract_form(page: &str, repo: &RepoRef) -> Extraction {
    let mut doc = Document::parse(page);
    let index = StyleIndex::from_document(&doc);

    let FormLocation::Found { target, .. } = locate_form(&doc) else {
        info!(repo = %repo, "No form found in page, using built-in form block");
        return Extraction {
            form_block: fallback_form_block(repo),
            remainder: page.to_string(),
            origin: FormOrigin::Fallback,
        };
    };

    inline_styles(&mut doc, target, &index);
    let form_block = doc.outer_html(target);
    doc.detach(target);
    let remainder = doc.to_html();

    debug!(
        form_bytes = form_block.len(),
        remainder_bytes = remainder.len(),
        "Detached form block"
    );

    Extraction {
        form_block,
        remainder,
        origin: FormOrigin::Extracted,
    }
}

/// The built-in form block, posting new issues to `repo`.
pub fn fallback_form_block(repo: &RepoRef) -> String {
    let action = repo.new_issue_url();
    format!(
        r#"
        <div style="margin: 20px 0; padding: 15px; background-color: #f8f9fa; border-radius: 5px; box-shadow: 0 2px 5px rgba(0,0,0,0.1); border: 1px solid #e9ecef;">
            <h3 style="margin-top: 0; color: #0366d6;">Modify This Webpage</h3>
            <form action="{action}" method="get" target="_blank">
                <input type="hidden" name="labels" value="prompt">
                <input type="text" name="body" placeholder="Enter your instructions..." style="width: 75%; padding: 10px; margin-right: 10px; border: 1px solid #ced4da; border-radius: 4px; font-size: 16px;" required>
                <button type="submit" style="padding: 10px 15px; background-color: #0366d6; color: white; border: none; border-radius: 4px; font-size: 16px; cursor: pointer; transition: background-color 0.2s;">Submit</button>
            </form>
            <p style="font-size: 14px; color: #6c757d; margin-top: 10px;">Your request will be processed through GitHub Issues and applied automatically.</p>
        </div>
        "#
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn repo() -> RepoRef {
        RepoRef::new("octo", "site")
    }

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
<style>
#prompt-form { padding: 15px; }
input[type="text"] { width: 75%; }
button { color: white; }
.note { font-size: 14px; }
</style>
</head>
<body>
<h1>Hello</h1>
<div id="prompt-form"><form action="x"><input type="text" name="body"><button type="submit">Submit</button></form><p class="note">Processed via issues.</p></div>
<p>Content</p>
</body>
</html>"#;

    #[test]
    fn test_extracts_container_with_inlined_styles() {
        let extraction = extract_form(PAGE, &repo());
        assert_eq!(extraction.origin, FormOrigin::Extracted);
        assert_eq!(
            extraction.form_block,
            concat!(
                r#"<div id="prompt-form" style="padding: 15px;"><form action="x">"#,
                r#"<input type="text" name="body" style="width: 75%;">"#,
                r#"<button type="submit" style="color: white;">Submit</button></form>"#,
                r#"<p class="note" style="font-size: 14px;">Processed via issues.</p></div>"#,
            )
        );
    }

    #[test]
    fn test_remainder_keeps_everything_else_verbatim() {
        let extraction = extract_form(PAGE, &repo());
        let expected = PAGE.replace(
            concat!(
                r#"<div id="prompt-form"><form action="x"><input type="text" name="body">"#,
                r#"<button type="submit">Submit</button></form><p class="note">Processed via issues.</p></div>"#,
            ),
            "",
        );
        assert_eq!(extraction.remainder, expected);
        assert!(!extraction.remainder.contains("<form"));
        assert!(extraction.remainder.contains("#prompt-form { padding: 15px; }"));
    }

    #[test]
    fn test_input_button_pairing_extracted() {
        let page = r#"<body><section><input type="text"><button>Go</button></section><p>x</p></body>"#;
        let extraction = extract_form(page, &repo());
        assert_eq!(
            extraction.form_block,
            r#"<section><input type="text"><button>Go</button></section>"#
        );
        assert_eq!(extraction.remainder, "<body><p>x</p></body>");
    }

    #[test]
    fn test_fallback_leaves_page_untouched() {
        let page = "<html><body>  <h1>No form &amp; no inputs</h1></body></html>";
        let extraction = extract_form(page, &repo());
        assert_eq!(extraction.origin, FormOrigin::Fallback);
        assert_eq!(extraction.remainder, page);
        assert_eq!(extraction.form_block, fallback_form_block(&repo()));
    }

    #[test]
    fn test_fallback_block_targets_repository() {
        let block = fallback_form_block(&repo());
        assert!(block.contains(r#"action="https://github.com/octo/site/issues/new""#));
        assert!(block.contains(r#"name="labels" value="prompt""#));

        let doc = Document::parse(&block);
        let form = doc.find_first(doc.root(), "form").unwrap();
        assert_eq!(doc.attr(form, "method"), Some("get"));
        assert_eq!(doc.find_all(form, "input").len(), 2);
        assert_eq!(doc.find_all(form, "button").len(), 1);
        let root = doc.first_element(doc.root()).unwrap();
        assert!(doc.is_element(root, "div"));
    }
}
