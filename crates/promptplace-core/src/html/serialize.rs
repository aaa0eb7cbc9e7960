//! Markup serialization for [`Document`] trees.

use super::parser::is_void_tag;
use super::{Document, Element, NodeId, NodeKind};

impl Document {
    /// Serialize the whole document.
    pub fn to_html(&self) -> String {
        self.outer_html(self.root())
    }

    /// Serialize `id` and its subtree. For the root this is the concatenation
    /// of its children.
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        match self.kind(id) {
            NodeKind::Document => self.write_children(id, out),
            NodeKind::Element(element) => {
                write_start_tag(element, out);
                if is_void_tag(&element.tag_name) {
                    return;
                }
                self.write_children(id, out);
                out.push_str("</");
                out.push_str(&element.tag_name);
                out.push('>');
            },
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Comment(body) => {
                out.push_str("<!--");
                out.push_str(body);
                out.push_str("-->");
            },
            NodeKind::Declaration(raw) => out.push_str(raw),
        }
    }

    fn write_children(&self, id: NodeId, out: &mut String) {
        for &child in self.children(id) {
            self.write_node(child, out);
        }
    }
}

fn write_start_tag(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.tag_name);
    for attr in &element.attrs {
        out.push(' ');
        out.push_str(&attr.name);
        if let Some(value) = &attr.value {
            out.push_str("=\"");
            out.push_str(&value.replace('"', "&quot;"));
            out.push('"');
        }
    }
    out.push('>');
}
