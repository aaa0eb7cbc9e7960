//! Put a previously extracted form block back into a rewritten page.
//!
//! The rewritten page comes from a model and may be a full document, a
//! document without `<body>`, or a loose fragment. Placement rules:
//!
//! | candidate has         | form goes                                          |
//! |-----------------------|----------------------------------------------------|
//! | a `<body>`            | first child of the first `<body>`                  |
//! | `<html>` but no body  | into a new `<body>` appended to the `<html>`       |
//! | neither               | into a fresh `<html><body>` skeleton, followed by  |
//! |                       | the candidate's top-level content elements         |

use crate::html::{Document, NodeId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Top-level candidate elements carried into a skeleton document.
const SKELETON_CONTENT_TAGS: [&str; 8] = ["div", "section", "p", "h1", "h2", "h3", "script", "style"];

/// Which placement rule was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Inserted at the top of an existing body.
    Body,
    /// Wrapped in a new body under an existing html element.
    NewBody,
    /// Built a minimal html/body skeleton around the form and content.
    Skeleton,
}

/// Final page plus how the form was placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reinsertion {
    /// Serialized final page.
    pub page: String,
    /// Rule that placed the form.
    pub placement: Placement,
}

/// Reinsert `form_block` into `candidate` and serialize the result.
///
/// ```rust
/// use promptplace_core::form::reinsert_form;
///
/// let page = reinsert_form("<form></form>", "<div>content</div>");
/// assert_eq!(page, "<html><body><form></form><div>content</div></body></html>");
/// ```
pub fn reinsert_form(form_block: &str, candidate: &str) -> String {
    reinsert_form_with_placement(form_block, candidate).page
}

/// Like [`reinsert_form`], also reporting which placement rule applied.
pub fn reinsert_form_with_placement(form_block: &str, candidate: &str) -> Reinsertion {
    let fragment = Document::parse(form_block);
    let form_nodes = form_roots(&fragment);

    let mut doc = Document::parse(candidate);
    let placement = if let Some(body) = doc.find_first(doc.root(), "body") {
        for (offset, &node) in form_nodes.iter().enumerate() {
            let imported = doc.import_subtree(&fragment, node);
            doc.insert_child(body, offset, imported);
        }
        Placement::Body
    } else if let Some(html) = doc.find_first(doc.root(), "html") {
        let body = doc.create_element("body");
        append_imported(&mut doc, body, &fragment, &form_nodes);
        doc.append_child(html, body);
        Placement::NewBody
    } else {
        doc = skeleton(&fragment, &form_nodes, candidate);
        Placement::Skeleton
    };

    debug!(?placement, "Reinserted form block");

    Reinsertion {
        page: doc.to_html(),
        placement,
    }
}

/// The form block's first element, or all of its top-level nodes when it has
/// no element at all.
fn form_roots(fragment: &Document) -> Vec<NodeId> {
    fragment
        .first_element(fragment.root())
        .map_or_else(|| fragment.children(fragment.root()).to_vec(), |root| vec![root])
}

fn append_imported(doc: &mut Document, parent: NodeId, source: &Document, nodes: &[NodeId]) {
    for &node in nodes {
        let imported = doc.import_subtree(source, node);
        doc.append_child(parent, imported);
    }
}

fn skeleton(fragment: &Document, form_nodes: &[NodeId], candidate: &str) -> Document {
    let mut doc = Document::new();
    let html = doc.create_element("html");
    let body = doc.create_element("body");
    doc.append_child(doc.root(), html);
    doc.append_child(html, body);
    append_imported(&mut doc, body, fragment, form_nodes);

    let content = Document::parse(candidate);
    let carried: Vec<NodeId> = content
        .element_children(content.root())
        .into_iter()
        .filter(|node| {
            content
                .tag_name(*node)
                .is_some_and(|tag| SKELETON_CONTENT_TAGS.contains(&tag))
        })
        .collect();
    debug!(carried = carried.len(), "Built skeleton document");
    append_imported(&mut doc, body, &content, &carried);

    doc
}
