//! Lenient, non-normalizing markup parser.
//!
//! The tree is built exactly as the tags are written:
//!
//! - no `<html>`, `<head>` or `<body>` is ever synthesized
//! - void elements (`input`, `br`, ...) and `<tag/>` never take children
//! - an end tag closes the nearest open element with the same name; a stray
//!   end tag with no matching open element is dropped
//! - `script`, `style`, `textarea` and `title` contents are raw text up to the
//!   matching end tag
//! - an unterminated comment swallows the rest of the input, and an
//!   unterminated tag degrades to text
//!
//! Text and attribute values are stored as written (entities are not decoded),
//! so untouched regions serialize back byte-for-byte.

use super::{Attribute, Document, Element, NodeId, NodeKind};

/// Elements that never have content or an end tag.
pub fn is_void_tag(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Elements whose content is taken verbatim up to the matching end tag.
pub fn is_raw_text_tag(tag: &str) -> bool {
    matches!(tag, "script" | "style" | "textarea" | "title")
}

struct StartTag {
    name: String,
    attrs: Vec<Attribute>,
    self_closing: bool,
    end: usize,
}

pub(super) fn parse_into(doc: &mut Document, html: &str) {
    let bytes = html.as_bytes();
    let mut stack: Vec<NodeId> = vec![doc.root()];
    let mut i = 0usize;

    while i < bytes.len() {
        let parent = current(&stack, doc.root());

        if bytes[i] != b'<' {
            let next = find_byte(bytes, i + 1, b'<').unwrap_or(bytes.len());
            doc.append_text(parent, &html[i..next]);
            i = next;
            continue;
        }

        if starts_with_at(bytes, i, b"<!--") {
            let (body, next) = match find_subslice(bytes, i + 4, b"-->") {
                Some(end) => (&html[i + 4..end], end + 3),
                None => (&html[i + 4..], bytes.len()),
            };
            let comment = doc.push_node(NodeKind::Comment(body.to_string()));
            doc.append_child(parent, comment);
            i = next;
            continue;
        }

        if starts_with_at(bytes, i, b"</") && bytes.get(i + 2).is_some_and(u8::is_ascii_alphabetic)
        {
            let Some(close) = find_byte(bytes, i + 2, b'>') else {
                doc.append_text(parent, &html[i..]);
                break;
            };
            let name = read_tag_name(html, i + 2).to_ascii_lowercase();
            close_element(doc, &mut stack, &name);
            i = close + 1;
            continue;
        }

        if starts_with_at(bytes, i, b"<!") || starts_with_at(bytes, i, b"<?") {
            let Some(close) = find_byte(bytes, i + 2, b'>') else {
                doc.append_text(parent, &html[i..]);
                break;
            };
            let decl = doc.push_node(NodeKind::Declaration(html[i..=close].to_string()));
            doc.append_child(parent, decl);
            i = close + 1;
            continue;
        }

        if !bytes.get(i + 1).is_some_and(u8::is_ascii_alphabetic) {
            // A lone '<' is ordinary text.
            let next = find_byte(bytes, i + 1, b'<').unwrap_or(bytes.len());
            doc.append_text(parent, &html[i..next]);
            i = next;
            continue;
        }

        let Some(tag) = parse_start_tag(html, i) else {
            doc.append_text(parent, &html[i..]);
            break;
        };

        let node = doc.push_node(NodeKind::Element(Element {
            tag_name: tag.name.clone(),
            attrs: tag.attrs,
        }));
        doc.append_child(parent, node);
        i = tag.end;

        if tag.self_closing || is_void_tag(&tag.name) {
            continue;
        }

        if is_raw_text_tag(&tag.name) {
            let (body_end, next) = match find_raw_end_tag(bytes, i, tag.name.as_bytes()) {
                Some(start) => {
                    let after = find_byte(bytes, start, b'>').map_or(bytes.len(), |gt| gt + 1);
                    (start, after)
                },
                None => (bytes.len(), bytes.len()),
            };
            doc.append_text(node, &html[i..body_end]);
            i = next;
            continue;
        }

        stack.push(node);
    }
}

fn current(stack: &[NodeId], root: NodeId) -> NodeId {
    stack.last().copied().unwrap_or(root)
}

fn close_element(doc: &Document, stack: &mut Vec<NodeId>, name: &str) {
    // Index 0 is the document root and is never closed.
    if let Some(pos) = stack
        .iter()
        .rposition(|open| doc.tag_name(*open) == Some(name))
        .filter(|pos| *pos > 0)
    {
        stack.truncate(pos);
    }
}

fn parse_start_tag(html: &str, at: usize) -> Option<StartTag> {
    let bytes = html.as_bytes();
    let name = read_tag_name(html, at + 1).to_ascii_lowercase();
    let mut i = at + 1 + name.len();
    let mut attrs: Vec<Attribute> = Vec::new();

    loop {
        skip_ws(bytes, &mut i);
        match *bytes.get(i)? {
            b'>' => {
                return Some(StartTag {
                    name,
                    attrs,
                    self_closing: false,
                    end: i + 1,
                });
            },
            b'/' if bytes.get(i + 1) == Some(&b'>') => {
                return Some(StartTag {
                    name,
                    attrs,
                    self_closing: true,
                    end: i + 2,
                });
            },
            b'/' | b'"' | b'\'' | b'=' => {
                // Junk between attributes; skip it like a browser would.
                i += 1;
                continue;
            },
            _ => {},
        }

        let name_start = i;
        while i < bytes.len() && is_attr_name_char(bytes[i]) {
            i += 1;
        }
        let attr_name = html[name_start..i].to_ascii_lowercase();

        skip_ws(bytes, &mut i);
        let value = if bytes.get(i) == Some(&b'=') {
            i += 1;
            skip_ws(bytes, &mut i);
            Some(parse_attr_value(html, &mut i)?)
        } else {
            None
        };

        if !attrs.iter().any(|attr| attr.name == attr_name) {
            attrs.push(Attribute {
                name: attr_name,
                value,
            });
        }
    }
}

fn parse_attr_value(html: &str, i: &mut usize) -> Option<String> {
    let bytes = html.as_bytes();
    match bytes.get(*i) {
        Some(&quote @ (b'"' | b'\'')) => {
            let start = *i + 1;
            let end = find_byte(bytes, start, quote)?;
            *i = end + 1;
            Some(html[start..end].to_string())
        },
        Some(_) => {
            let start = *i;
            while *i < bytes.len() && !bytes[*i].is_ascii_whitespace() && bytes[*i] != b'>' {
                *i += 1;
            }
            Some(html[start..*i].to_string())
        },
        None => None,
    }
}

fn read_tag_name(html: &str, at: usize) -> &str {
    let bytes = html.as_bytes();
    let mut end = at;
    while end < bytes.len() && is_tag_char(bytes[end]) {
        end += 1;
    }
    &html[at..end]
}

fn is_tag_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

fn is_attr_name_char(b: u8) -> bool {
    !b.is_ascii_whitespace() && !matches!(b, b'=' | b'>' | b'/' | b'"' | b'\'')
}

fn skip_ws(bytes: &[u8], i: &mut usize) {
    while *i < bytes.len() && bytes[*i].is_ascii_whitespace() {
        *i += 1;
    }
}

fn starts_with_at(bytes: &[u8], at: usize, needle: &[u8]) -> bool {
    bytes.get(at..at + needle.len()) == Some(needle)
}

fn find_byte(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
    bytes
        .get(from..)?
        .iter()
        .position(|b| *b == needle)
        .map(|pos| from + pos)
}

fn find_subslice(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| from + pos)
}

/// Position of the `<` of the first `</tag` (case-insensitive) at or after `from`
/// that is followed by a tag delimiter.
fn find_raw_end_tag(bytes: &[u8], from: usize, tag: &[u8]) -> Option<usize> {
    let mut i = from;
    while let Some(lt) = find_subslice(bytes, i, b"</") {
        let name_start = lt + 2;
        let name_end = name_start + tag.len();
        let matches_name = bytes
            .get(name_start..name_end)
            .is_some_and(|name| name.eq_ignore_ascii_case(tag));
        let delimited = bytes
            .get(name_end)
            .is_none_or(|b| b.is_ascii_whitespace() || *b == b'>' || *b == b'/');
        if matches_name && delimited {
            return Some(lt);
        }
        i = lt + 2;
    }
    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::Document;
    use super::*;

    #[test]
    fn test_roundtrip_well_formed_page() {
        let html = "<!DOCTYPE html>\n<html lang=\"en\">\n<head><title>T &amp; U</title></head>\n<body>\n<p class=\"lead\">Hi &lt;there&gt;</p>\n<!-- note -->\n</body>\n</html>";
        assert_eq!(Document::parse(html).to_html(), html);
    }

    #[test]
    fn test_no_implicit_html_or_body() {
        let doc = Document::parse("<div>content</div>");
        assert!(doc.find_first(doc.root(), "html").is_none());
        assert!(doc.find_first(doc.root(), "body").is_none());
        assert_eq!(doc.to_html(), "<div>content</div>");
    }

    #[test]
    fn test_void_elements_take_no_children() {
        let doc = Document::parse(r#"<form><input type="text"><button>Go</button></form>"#);
        let form = doc.find_first(doc.root(), "form").unwrap();
        let input = doc.find_first(form, "input").unwrap();
        let button = doc.find_first(form, "button").unwrap();
        assert!(doc.children(input).is_empty());
        assert_eq!(doc.parent(button), Some(form));
    }

    #[test]
    fn test_self_closing_syntax() {
        let doc = Document::parse("<div/><p>after</p>");
        let div = doc.find_first(doc.root(), "div").unwrap();
        assert!(doc.children(div).is_empty());
        assert_eq!(doc.element_children(doc.root()).len(), 2);
    }

    #[test]
    fn test_stray_end_tag_is_ignored() {
        let doc = Document::parse("<div><p>a</span></p></div>");
        let p = doc.find_first(doc.root(), "p").unwrap();
        assert_eq!(doc.text_content(p), "a");
        assert_eq!(doc.to_html(), "<div><p>a</p></div>");
    }

    #[test]
    fn test_end_tag_closes_nearest_match() {
        let doc = Document::parse("<div><span>a</div>b");
        let div = doc.find_first(doc.root(), "div").unwrap();
        // `b` is a sibling of the div, not inside the unclosed span
        assert_eq!(doc.text_content(div), "a");
        assert_eq!(doc.children(doc.root()).len(), 2);
    }

    #[test]
    fn test_unclosed_elements_extend_to_end() {
        let doc = Document::parse("<section><p>one<p>two");
        let section = doc.find_first(doc.root(), "section").unwrap();
        assert_eq!(doc.find_all(section, "p").len(), 2);
        assert_eq!(doc.to_html(), "<section><p>one<p>two</p></p></section>");
    }

    #[test]
    fn test_raw_text_elements() {
        let html = "<style>form { color: red; } a > b {}</style><script>if (a < b && c > d) {}</script>";
        let doc = Document::parse(html);
        let style = doc.find_first(doc.root(), "style").unwrap();
        assert_eq!(doc.text_content(style), "form { color: red; } a > b {}");
        let script = doc.find_first(doc.root(), "script").unwrap();
        assert_eq!(doc.text_content(script), "if (a < b && c > d) {}");
        assert!(doc.find_first(doc.root(), "b").is_none());
        assert_eq!(doc.to_html(), html);
    }

    #[test]
    fn test_unterminated_script_takes_rest() {
        let doc = Document::parse("<script>var x = '<div>';");
        let script = doc.find_first(doc.root(), "script").unwrap();
        assert_eq!(doc.text_content(script), "var x = '<div>';");
        assert!(doc.find_first(doc.root(), "div").is_none());
    }

    #[test]
    fn test_lone_less_than_is_text() {
        let doc = Document::parse("<p>1 < 2</p>");
        let p = doc.find_first(doc.root(), "p").unwrap();
        assert_eq!(doc.text_content(p), "1 < 2");
    }

    #[test]
    fn test_unterminated_tag_degrades_to_text() {
        let doc = Document::parse("<p>ok</p><div class=\"broken");
        assert!(doc.find_first(doc.root(), "div").is_none());
        assert_eq!(doc.to_html(), "<p>ok</p><div class=\"broken");
    }

    #[test]
    fn test_unterminated_comment() {
        let doc = Document::parse("<p>a</p><!-- trailing");
        assert!(matches!(
            doc.kind(doc.children(doc.root())[1]),
            NodeKind::Comment(body) if body == " trailing"
        ));
    }

    #[test]
    fn test_attribute_forms() {
        let doc = Document::parse(
            "<input type=text name='body' placeholder=\"Enter your instructions...\" required>",
        );
        let input = doc.find_first(doc.root(), "input").unwrap();
        assert_eq!(doc.attr(input, "type"), Some("text"));
        assert_eq!(doc.attr(input, "name"), Some("body"));
        assert_eq!(
            doc.attr(input, "placeholder"),
            Some("Enter your instructions...")
        );
        assert_eq!(doc.attr(input, "required"), Some(""));
    }

    #[test]
    fn test_tag_and_attribute_names_lowercased() {
        let doc = Document::parse("<DIV ID=\"Main\"><P>x</P></DIV>");
        let div = doc.find_first(doc.root(), "div").unwrap();
        assert_eq!(doc.attr(div, "id"), Some("Main"));
        assert!(doc.find_first(div, "p").is_some());
    }

    #[test]
    fn test_duplicate_attribute_keeps_first() {
        let doc = Document::parse(r#"<div class="a" class="b"></div>"#);
        let div = doc.find_first(doc.root(), "div").unwrap();
        assert_eq!(doc.attr(div, "class"), Some("a"));
    }
}
