//! Document serialization.
//!
//! Renders the arena document back to markup. Void elements are emitted
//! XML-style (`<br />`) so serialized output round-trips through the
//! break-collapsing regexes, and non-breaking spaces are written as
//! `&nbsp;` for the same reason.

use crate::dom::{Document, NodeData, NodeId};
use crate::error::{PerlegoError, Result};

/// XHTML 1.0 Transitional preamble emitted when a doctype is requested.
const DOCTYPE: &str = "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Transitional//EN\" \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd\">\n";

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Tags whose text children are emitted without entity escaping.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Controls for [`serialize_document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SerializationConfig {
    /// Indent the output instead of emitting it on one line.
    pub pretty_print: bool,
    /// Insert a `Content-Type` meta tag as the first child of `<head>`.
    pub include_content_type_meta: bool,
    /// Prepend an XHTML 1.0 Transitional doctype.
    pub include_doctype: bool,
    /// Append `HandheldFriendly` and `viewport` meta tags to `<head>`.
    pub include_mobile_meta: bool,
}

impl Default for SerializationConfig {
    fn default() -> Self {
        SerializationConfig {
            pretty_print: false,
            include_content_type_meta: true,
            include_doctype: true,
            include_mobile_meta: false,
        }
    }
}

/// Serializes the whole document, applying the config's meta-tag insertions
/// first.
///
/// Fails with [`PerlegoError::MalformedDocument`] when meta insertion is
/// requested but the root element is not `html`.
pub fn serialize_document(doc: &mut Document, config: &SerializationConfig) -> Result<String> {
    if config.include_content_type_meta {
        let head = ensure_head(doc)?;
        let stale: Vec<NodeId> = doc
            .children_by_tag_name(head, "meta")
            .into_iter()
            .filter(|&m| {
                doc.attr(m, "http-equiv")
                    .is_some_and(|v| v.eq_ignore_ascii_case("content-type"))
            })
            .collect();
        for meta in stale {
            doc.detach(meta);
        }
        let meta = doc.create_element("meta");
        doc.set_attr(meta, "http-equiv", Some("Content-Type"));
        doc.set_attr(meta, "content", Some("text/html; charset=utf-8"));
        doc.insert_first(head, meta);
    }
    if config.include_mobile_meta {
        let head = ensure_head(doc)?;
        let handheld = doc.create_element("meta");
        doc.set_attr(handheld, "name", Some("HandheldFriendly"));
        doc.set_attr(handheld, "content", Some("true"));
        doc.append_child(head, handheld);
        let viewport = doc.create_element("meta");
        doc.set_attr(viewport, "name", Some("viewport"));
        doc.set_attr(viewport, "content", Some("width=device-width, initial-scale=1.0"));
        doc.append_child(head, viewport);
    }

    let mut out = String::new();
    if config.include_doctype {
        out.push_str(DOCTYPE);
    }
    if config.pretty_print {
        write_pretty(doc, doc.root(), 0, false, &mut out);
    } else {
        write_compact(doc, doc.root(), false, &mut out);
    }
    Ok(out)
}

fn ensure_head(doc: &mut Document) -> Result<NodeId> {
    let root = doc.root();
    if !doc
        .tag_name(root)
        .is_some_and(|t| t.eq_ignore_ascii_case("html"))
    {
        return Err(PerlegoError::MalformedDocument(
            "the root element must be html to insert meta tags".to_string(),
        ));
    }
    if let Some(head) = doc.children_by_tag_name(root, "head").into_iter().next() {
        return Ok(head);
    }
    let head = doc.create_element("head");
    doc.append_child(root, head);
    Ok(head)
}

impl Document {
    /// Markup of the element's children, compact.
    pub fn inner_markup(&self, id: NodeId) -> String {
        let mut out = String::new();
        let raw = self.is_raw_text_element(id);
        for &child in self.children(id) {
            write_compact(self, child, raw, &mut out);
        }
        out
    }

    /// Markup of the node itself including its subtree, compact.
    pub fn outer_markup(&self, id: NodeId) -> String {
        let mut out = String::new();
        write_compact(self, id, false, &mut out);
        out
    }

    fn is_raw_text_element(&self, id: NodeId) -> bool {
        self.tag_name(id)
            .is_some_and(|t| RAW_TEXT_ELEMENTS.iter().any(|r| t.eq_ignore_ascii_case(r)))
    }
}

fn write_compact(doc: &Document, id: NodeId, raw_text: bool, out: &mut String) {
    match doc.data(id) {
        NodeData::Text(value) => {
            if raw_text {
                out.push_str(value);
            } else {
                escape_text(value, out);
            }
        }
        NodeData::Comment(value) => {
            out.push_str("<!--");
            out.push_str(value);
            out.push_str("-->");
        }
        NodeData::Element { tag, attrs } => {
            out.push('<');
            out.push_str(tag);
            for (name, value) in attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape_attr(value, out);
                out.push('"');
            }
            if is_void(tag) && doc.children(id).is_empty() {
                out.push_str(" />");
                return;
            }
            out.push('>');
            let raw = doc.is_raw_text_element(id);
            for &child in doc.children(id) {
                write_compact(doc, child, raw, out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

fn write_pretty(doc: &Document, id: NodeId, depth: usize, raw_text: bool, out: &mut String) {
    let indent = "  ".repeat(depth);
    match doc.data(id) {
        NodeData::Text(value) => {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                out.push_str(&indent);
                if raw_text {
                    out.push_str(trimmed);
                } else {
                    escape_text(trimmed, out);
                }
                out.push('\n');
            }
        }
        NodeData::Comment(value) => {
            out.push_str(&indent);
            out.push_str("<!--");
            out.push_str(value);
            out.push_str("-->\n");
        }
        NodeData::Element { tag, attrs } => {
            out.push_str(&indent);
            out.push('<');
            out.push_str(tag);
            for (name, value) in attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape_attr(value, out);
                out.push('"');
            }
            let children = doc.children(id);
            if is_void(tag) && children.is_empty() {
                out.push_str(" />\n");
                return;
            }
            // elements with only text children stay on one line
            if children.iter().all(|&c| doc.is_text(c)) {
                out.push('>');
                let raw = doc.is_raw_text_element(id);
                for &child in children {
                    if let Some(value) = doc.text_value(child) {
                        if raw {
                            out.push_str(value);
                        } else {
                            escape_text(value, out);
                        }
                    }
                }
                out.push_str("</");
                out.push_str(tag);
                out.push_str(">\n");
                return;
            }
            out.push_str(">\n");
            let raw = doc.is_raw_text_element(id);
            for &child in children {
                write_pretty(doc, child, depth + 1, raw, out);
            }
            out.push_str(&indent);
            out.push_str("</");
            out.push_str(tag);
            out.push_str(">\n");
        }
    }
}

fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| tag.eq_ignore_ascii_case(v))
}

fn escape_text(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_document;

    fn no_extras() -> SerializationConfig {
        SerializationConfig {
            pretty_print: false,
            include_content_type_meta: false,
            include_doctype: false,
            include_mobile_meta: false,
        }
    }

    #[test]
    fn test_round_trip_simple() {
        let mut doc = parse_document("<html><body><p>Hi</p></body></html>");
        let out = serialize_document(&mut doc, &no_extras()).unwrap();
        assert!(out.contains("<p>Hi</p>"));
        assert!(out.starts_with("<html>"));
    }

    #[test]
    fn test_void_elements_self_close() {
        let mut doc = parse_document("<html><body><p>a<br>b</p></body></html>");
        let out = serialize_document(&mut doc, &no_extras()).unwrap();
        assert!(out.contains("<br />"));
    }

    #[test]
    fn test_nbsp_round_trips_as_entity() {
        let mut doc = parse_document("<html><body><p>a&nbsp;b</p></body></html>");
        let out = serialize_document(&mut doc, &no_extras()).unwrap();
        assert!(out.contains("a&nbsp;b"));
    }

    #[test]
    fn test_text_escaping() {
        let mut doc = Document::new();
        let body = doc.get_or_create_body();
        let p = doc.create_element("p");
        doc.append_child(body, p);
        let text = doc.create_text("a < b & c > d");
        doc.append_child(p, text);
        let out = serialize_document(&mut doc, &no_extras()).unwrap();
        assert!(out.contains("a &lt; b &amp; c &gt; d"));
    }

    #[test]
    fn test_style_text_not_escaped() {
        let mut doc = Document::new();
        let style = doc.create_element("style");
        doc.append_child(doc.root(), style);
        let css = doc.create_text("div > p { color: red; }");
        doc.append_child(style, css);
        let out = serialize_document(&mut doc, &no_extras()).unwrap();
        assert!(out.contains("div > p { color: red; }"));
    }

    #[test]
    fn test_doctype_prepended() {
        let mut doc = parse_document("<html><body></body></html>");
        let config = SerializationConfig {
            include_doctype: true,
            ..no_extras()
        };
        let out = serialize_document(&mut doc, &config).unwrap();
        assert!(out.starts_with("<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Transitional//EN\""));
    }

    #[test]
    fn test_content_type_meta_is_first_head_child() {
        let mut doc =
            parse_document("<html><head><title>T</title></head><body></body></html>");
        let config = SerializationConfig {
            include_content_type_meta: true,
            ..no_extras()
        };
        let out = serialize_document(&mut doc, &config).unwrap();
        let head_pos = out.find("<head>").unwrap();
        let meta_pos = out.find("http-equiv=\"Content-Type\"").unwrap();
        let title_pos = out.find("<title>").unwrap();
        assert!(head_pos < meta_pos && meta_pos < title_pos);
    }

    #[test]
    fn test_content_type_meta_replaces_existing() {
        let mut doc = parse_document(
            "<html><head><meta http-equiv=\"content-type\" content=\"text/html; charset=latin1\"></head><body></body></html>",
        );
        let config = SerializationConfig {
            include_content_type_meta: true,
            ..no_extras()
        };
        let out = serialize_document(&mut doc, &config).unwrap();
        assert!(!out.contains("latin1"));
        assert!(out.contains("charset=utf-8"));
        assert_eq!(out.matches("http-equiv").count(), 1);
    }

    #[test]
    fn test_content_type_meta_creates_head() {
        let mut doc = Document::new();
        doc.get_or_create_body();
        let config = SerializationConfig {
            include_content_type_meta: true,
            ..no_extras()
        };
        let out = serialize_document(&mut doc, &config).unwrap();
        assert!(out.contains("<head>"));
        assert!(out.contains("Content-Type"));
    }

    #[test]
    fn test_meta_insertion_requires_html_root() {
        let mut doc = Document::new();
        doc.rename(doc.root(), "section");
        let config = SerializationConfig {
            include_content_type_meta: true,
            ..no_extras()
        };
        let err = serialize_document(&mut doc, &config).unwrap_err();
        assert!(matches!(err, PerlegoError::MalformedDocument(_)));
    }

    #[test]
    fn test_mobile_meta() {
        let mut doc = parse_document("<html><head></head><body></body></html>");
        let config = SerializationConfig {
            include_mobile_meta: true,
            ..no_extras()
        };
        let out = serialize_document(&mut doc, &config).unwrap();
        assert!(out.contains("HandheldFriendly"));
        assert!(out.contains("viewport"));
    }

    #[test]
    fn test_pretty_print_indents() {
        let mut doc = parse_document("<html><body><div><p>Hi</p></div></body></html>");
        let config = SerializationConfig {
            pretty_print: true,
            ..no_extras()
        };
        let out = serialize_document(&mut doc, &config).unwrap();
        assert!(out.contains("\n"));
        assert!(out.contains("    <div>"));
    }

    #[test]
    fn test_inner_markup() {
        let doc = parse_document("<html><body><div id=\"x\"><p>a</p><p>b</p></div></body></html>");
        let div = doc.element_by_id("x").unwrap();
        assert_eq!(doc.inner_markup(div), "<p>a</p><p>b</p>");
    }

    #[test]
    fn test_default_config() {
        let config = SerializationConfig::default();
        assert!(!config.pretty_print);
        assert!(config.include_content_type_meta);
        assert!(config.include_doctype);
        assert!(!config.include_mobile_meta);
    }
}
