//! Copy indexed style declarations onto a form subtree as inline styles.

use crate::html::{Document, NodeId};
use crate::style::StyleIndex;
use tracing::debug;

const TARGET_SELECTORS: [&str; 3] = ["#prompt-form", ".prompt-form", "form"];
const TEXT_INPUT_SELECTORS: [&str; 2] = [r#"input[type="text"]"#, "input"];
const BUTTON_SELECTORS: [&str; 2] = ["button", r#"button[type="submit"]"#];
const NOTE_SELECTORS: [&str; 2] = [".note", "p.note"];

/// Inline the declarations of `index` into `target` and its descendants.
///
/// Appends are additive: an existing `style` attribute is kept and the new
/// declarations follow it after `"; "`. Nothing is replaced or deduplicated,
/// so every matching rule of the index contributes once per element, in index
/// order.
///
/// Returns the number of style attributes written.
pub fn inline_styles(doc: &mut Document, target: NodeId, index: &StyleIndex) -> usize {
    if index.is_empty() {
        return 0;
    }

    let mut writes = apply(doc, target, index, &TARGET_SELECTORS);

    let descendants = doc.descendants(target);
    for node in descendants {
        let selectors: &[&str] = match doc.tag_name(node) {
            Some("input") if doc.attr(node, "type") == Some("text") => &TEXT_INPUT_SELECTORS,
            Some("button") => &BUTTON_SELECTORS,
            Some("p") if doc.attr(node, "class").is_some_and(|class| class.contains("note")) => {
                &NOTE_SELECTORS
            },
            _ => continue,
        };
        writes += apply(doc, node, index, selectors);
    }

    debug!(writes, "Inlined form styles");
    writes
}

fn apply(doc: &mut Document, node: NodeId, index: &StyleIndex, selectors: &[&str]) -> usize {
    let mut writes = 0;
    for rule in index.rules() {
        if !selectors.contains(&rule.selector.as_str()) {
            continue;
        }
        append_style(doc, node, &rule.declarations);
        writes += 1;
    }
    writes
}

fn append_style(doc: &mut Document, node: NodeId, declarations: &str) {
    let style = match doc.attr(node, "style") {
        Some(existing) if !existing.is_empty() => format!("{existing}; {declarations}"),
        _ => declarations.to_string(),
    };
    doc.set_attr(node, "style", style);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn index_of(css: &str) -> StyleIndex {
        let mut index = StyleIndex::default();
        index.scan(css);
        index
    }

    #[test]
    fn test_target_rules_applied_in_index_order() {
        let mut doc = Document::parse(r#"<div id="prompt-form"><form></form></div>"#);
        let target = doc.find_first(doc.root(), "div").unwrap();
        let index = index_of("form { a: 1 } #prompt-form { b: 2 }");

        assert_eq!(inline_styles(&mut doc, target, &index), 2);
        assert_eq!(doc.attr(target, "style"), Some("a: 1; b: 2"));
    }

    #[test]
    fn test_existing_style_preserved_and_appended() {
        let mut doc = Document::parse(r#"<form style="color: red"></form>"#);
        let target = doc.find_first(doc.root(), "form").unwrap();
        inline_styles(&mut doc, target, &index_of("form { margin: 0; }"));
        assert_eq!(doc.attr(target, "style"), Some("color: red; margin: 0;"));
    }

    #[test]
    fn test_text_inputs_buttons_and_notes() {
        let mut doc = Document::parse(
            r#"<div><form><input type="text"><input type="hidden"><button>Go</button></form><p class="note small">n</p><p>plain</p></div>"#,
        );
        let target = doc.find_first(doc.root(), "div").unwrap();
        let index = index_of(
            r#"input[type="text"] { width: 75%; } button { color: white; } button[type="submit"] { cursor: pointer; } .note { font-size: 14px; }"#,
        );
        inline_styles(&mut doc, target, &index);

        assert_eq!(
            doc.to_html(),
            concat!(
                r#"<div><form><input type="text" style="width: 75%;"><input type="hidden">"#,
                r#"<button style="color: white;; cursor: pointer;">Go</button></form>"#,
                r#"<p class="note small" style="font-size: 14px;">n</p><p>plain</p></div>"#,
            )
        );
    }

    #[test]
    fn test_target_itself_not_treated_as_button() {
        let mut doc = Document::parse("<button>Go</button>");
        let target = doc.find_first(doc.root(), "button").unwrap();
        assert_eq!(inline_styles(&mut doc, target, &index_of("button { x: 1 }")), 0);
        assert_eq!(doc.attr(target, "style"), None);
    }

    #[test]
    fn test_compound_selectors_not_inlined() {
        let mut doc = Document::parse(r#"<form><input type="text"></form>"#);
        let target = doc.find_first(doc.root(), "form").unwrap();
        let index = index_of(r#"form input[type="text"] { width: 1px }"#);
        assert_eq!(index.len(), 1);
        assert_eq!(inline_styles(&mut doc, target, &index), 0);
    }

    #[test]
    fn test_repeated_inlining_is_additive() {
        let mut doc = Document::parse("<form></form>");
        let target = doc.find_first(doc.root(), "form").unwrap();
        let index = index_of("form { m: 0 }");
        inline_styles(&mut doc, target, &index);
        inline_styles(&mut doc, target, &index);
        assert_eq!(doc.attr(target, "style"), Some("m: 0; m: 0"));
    }
}
