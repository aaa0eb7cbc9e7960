//! Arena-backed markup tree used by every page transform.
//!
//! Nodes live in a single `Vec` owned by a [`Document`] and refer to each other
//! through [`NodeId`] indices. Searches return ids, and removing a subtree is an
//! explicit [`Document::detach`] that unlinks it from its parent; the detached
//! nodes stay in the arena but are no longer reachable from the root, so no id
//! ever dangles.
//!
//! The parser is lenient and non-normalizing (see [`parser`]): it
//! never synthesizes `<html>` or `<body>`, which is what lets callers tell a
//! structurally complete page apart from a bare fragment.
//!
//! ```rust
//! use promptplace_core::html::Document;
//!
//! let mut doc = Document::parse("<div><p>one</p><p>two</p></div>");
//! let first_p = doc.find_first(doc.root(), "p").unwrap();
//! doc.detach(first_p);
//! assert_eq!(doc.to_html(), "<div><p>two</p></div>");
//! ```

pub mod parser;
mod serialize;

/// Index of a node inside its owning [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// A single attribute as written in the source.
///
/// `value` is `None` for bare attributes such as `required`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Lower-cased attribute name.
    pub name: String,
    /// Raw attribute value, entity references left untouched.
    pub value: Option<String>,
}

/// Element payload: tag name plus ordered attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lower-cased tag name.
    pub tag_name: String,
    /// Attributes in source order.
    pub attrs: Vec<Attribute>,
}

impl Element {
    /// Look up an attribute value; bare attributes read as `""`.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_deref().unwrap_or(""))
    }
}

/// What a node holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The synthetic root every document has.
    Document,
    /// An element with its tag and attributes.
    Element(Element),
    /// Character data, kept exactly as written.
    Text(String),
    /// Comment body (without `<!--` / `-->`).
    Comment(String),
    /// A `<!...>` or `<?...>` construct stored verbatim, e.g. `<!DOCTYPE html>`.
    Declaration(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

/// A parsed page or fragment.
///
/// Owned by exactly one operation at a time; nothing here is shared or
/// synchronized.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document containing only the root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Document,
            }],
            root: NodeId(0),
        }
    }

    /// Parse markup into a new document. Never fails; see [`parser`] for the
    /// recovery rules applied to malformed input.
    pub fn parse(html: &str) -> Self {
        let mut doc = Self::new();
        parser::parse_into(&mut doc, html);
        doc
    }

    /// The document root.
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Node payload.
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    /// Element payload, if `id` is an element.
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes[id.0].kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Tag name, if `id` is an element.
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|element| element.tag_name.as_str())
    }

    /// Whether `id` is an element with the given (lower-case) tag.
    pub fn is_element(&self, id: NodeId, tag: &str) -> bool {
        self.tag_name(id) == Some(tag)
    }

    /// Attribute value of an element; bare attributes read as `""`.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|element| element.attr(name))
    }

    /// Parent of `id`, `None` for the root and for detached subtrees.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Direct children in order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Direct children that are elements.
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|child| self.element(*child).is_some())
            .collect()
    }

    /// All descendants of `id` in document (pre-)order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Every descendant element of `scope` with the given tag, in document order.
    pub fn find_all(&self, scope: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|id| self.is_element(*id, tag))
            .collect()
    }

    /// First descendant element of `scope` with the given tag.
    pub fn find_first(&self, scope: NodeId, tag: &str) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|id| self.is_element(*id, tag))
    }

    /// First descendant element of `scope`, whatever its tag.
    pub fn first_element(&self, scope: NodeId) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|id| self.element(*id).is_some())
    }

    /// Concatenated text of every text node below `id`.
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .into_iter()
            .filter_map(|node| match self.kind(node) {
                NodeKind::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Whether `id` is still reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == self.root {
                return true;
            }
            match self.parent(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    fn push_node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            kind,
        });
        id
    }

    /// Create an unattached element with no attributes.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push_node(NodeKind::Element(Element {
            tag_name: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
        }))
    }

    /// Create an unattached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push_node(NodeKind::Text(text.into()))
    }

    /// Set an attribute, keeping its position when it already exists.
    ///
    /// Does nothing when `id` is not an element.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        let value = value.into();
        if let NodeKind::Element(element) = &mut self.nodes[id.0].kind {
            if let Some(existing) = element.attrs.iter_mut().find(|attr| attr.name == name) {
                existing.value = Some(value);
            } else {
                element.attrs.push(Attribute {
                    name: name.to_string(),
                    value: Some(value),
                });
            }
        }
    }

    /// Unlink `id` from its parent. The subtree stays intact but unreachable.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|child| *child != id);
        }
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let index = self.children(parent).len();
        self.insert_child(parent, index, child);
    }

    /// Insert `child` at `index` among `parent`'s children (clamped to the end),
    /// detaching it from any previous parent first.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.detach(child);
        let children = &mut self.nodes[parent.0].children;
        let index = index.min(children.len());
        children.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Append character data to `parent`, merging with a trailing text child.
    pub(crate) fn append_text(&mut self, parent: NodeId, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(&last) = self.nodes[parent.0].children.last() {
            if let NodeKind::Text(existing) = &mut self.nodes[last.0].kind {
                existing.push_str(text);
                return;
            }
        }
        let node = self.create_text(text);
        self.append_child(parent, node);
    }

    /// Deep-copy `id` and its subtree out of `source` into this arena.
    ///
    /// Returns the id of the unattached copy.
    pub fn import_subtree(&mut self, source: &Self, id: NodeId) -> NodeId {
        let copy = self.push_node(source.kind(id).clone());
        for &child in source.children(id) {
            let child_copy = self.import_subtree(source, child);
            self.append_child(copy, child_copy);
        }
        copy
    }
}
