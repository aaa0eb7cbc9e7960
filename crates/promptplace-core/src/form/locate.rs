//! Heuristic search for the request form inside a page.
//!
//! Search order:
//!
//! 1. the first `<form>` element anywhere in the document
//! 2. otherwise, the immediate parent of the first `input[type="text"]` (in
//!    document order) whose parent also contains a `<button>` somewhere below it
//! 3. container promotion: when the located node's parent is a `<div>`, that
//!    parent becomes the extraction target
//!
//! Promotion happens for every `<div>` parent. Whether the container carries an
//! identifying `id="prompt-form"` or a `prompt` class is recorded in
//! [`ContainerMatch`] for diagnostics only and never changes the target.

use crate::html::{Document, NodeId};
use tracing::debug;

/// Which rule located the form node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocateStrategy {
    /// A literal `<form>` element.
    FormTag,
    /// The shared parent of a text input and a button.
    InputButtonPair,
}

/// How the extraction target relates to the located form node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerMatch {
    /// No container; the form node itself is the target.
    None,
    /// Promoted to a `<div>` parent with `id="prompt-form"` or a `prompt` class.
    Identified,
    /// Promoted to a plain `<div>` parent.
    Plain,
}

/// Result of searching a page for its form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormLocation {
    /// A form was located.
    Found {
        /// The node the heuristics identified as the form.
        form: NodeId,
        /// The node to inline and detach (the form or its container).
        target: NodeId,
        /// Which rule located `form`.
        strategy: LocateStrategy,
        /// Whether and how `target` was promoted.
        container: ContainerMatch,
    },
    /// Neither a `<form>` nor an input/button pairing exists.
    Missing,
}

impl FormLocation {
    /// The extraction target, if any.
    pub const fn target(&self) -> Option<NodeId> {
        match self {
            Self::Found { target, .. } => Some(*target),
            Self::Missing => None,
        }
    }
}

/// Locate the page's form and its extraction target.
pub fn locate_form(doc: &Document) -> FormLocation {
    let located = doc
        .find_first(doc.root(), "form")
        .map(|form| (form, LocateStrategy::FormTag))
        .or_else(|| find_input_button_pair(doc).map(|form| (form, LocateStrategy::InputButtonPair)));

    let Some((form, strategy)) = located else {
        debug!("No form or input/button pairing found");
        return FormLocation::Missing;
    };

    let (target, container) = promote_to_container(doc, form);
    debug!(?strategy, ?container, "Located form");

    FormLocation::Found {
        form,
        target,
        strategy,
        container,
    }
}

fn find_input_button_pair(doc: &Document) -> Option<NodeId> {
    let inputs: Vec<NodeId> = doc
        .find_all(doc.root(), "input")
        .into_iter()
        .filter(|input| doc.attr(*input, "type") == Some("text"))
        .collect();
    if inputs.is_empty() || doc.find_first(doc.root(), "button").is_none() {
        return None;
    }

    inputs.into_iter().find_map(|input| {
        // An input sitting directly under the document root has no parent
        // element that could stand in for a form.
        let parent = doc.parent(input).filter(|parent| doc.element(*parent).is_some())?;
        doc.find_first(parent, "button").map(|_| parent)
    })
}

fn promote_to_container(doc: &Document, form: NodeId) -> (NodeId, ContainerMatch) {
    let Some(parent) = doc.parent(form).filter(|parent| doc.is_element(*parent, "div")) else {
        return (form, ContainerMatch::None);
    };

    let identified = doc.attr(parent, "id") == Some("prompt-form")
        || doc.attr(parent, "class").is_some_and(|class| class.contains("prompt"));

    if identified {
        (parent, ContainerMatch::Identified)
    } else {
        (parent, ContainerMatch::Plain)
    }
}
