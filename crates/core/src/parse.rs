//! HTML parsing via scraper (html5ever).
//!
//! The parser output is converted into the mutable arena in [`crate::dom`];
//! scraper's tree is immutable and the pipeline rewrites the document in
//! place. Fragment parsing backs [`Document::set_inner_markup`], so malformed
//! fragments are repaired by html5ever the same way full documents are.

use ego_tree::NodeRef;
use scraper::{Html, Node as ScraperNode};

use crate::dom::{Document, NodeId};

/// Parses a full HTML document into an arena [`Document`].
///
/// html5ever tolerates arbitrarily broken markup and always produces an
/// `html` root, so this never fails. Attributes of the input's `html`
/// element are carried over onto the arena root.
pub fn parse_document(html: &str) -> Document {
    let parsed = Html::parse_document(html);
    let mut doc = Document::new();
    let root_ref = parsed.root_element();
    let root = doc.root();
    for (name, value) in root_ref.value().attrs() {
        doc.set_attr(root, name, Some(value));
    }
    for child in root_ref.children() {
        convert_into(&mut doc, root, child);
    }
    doc
}

/// Parses `markup` as a fragment and appends the resulting nodes as children
/// of `parent`.
pub(crate) fn parse_fragment_into(doc: &mut Document, parent: NodeId, markup: &str) {
    if markup.is_empty() {
        return;
    }
    let parsed = Html::parse_fragment(markup);
    // parse_fragment wraps the parsed nodes in a synthetic html element
    for child in parsed.root_element().children() {
        convert_into(doc, parent, child);
    }
}

fn convert_into(doc: &mut Document, parent: NodeId, node: NodeRef<'_, ScraperNode>) {
    match node.value() {
        ScraperNode::Element(element) => {
            let id = doc.create_element(element.name());
            for (name, value) in element.attrs() {
                doc.set_attr(id, name, Some(value));
            }
            doc.append_child(parent, id);
            for child in node.children() {
                convert_into(doc, id, child);
            }
        }
        ScraperNode::Text(text) => {
            let id = doc.create_text(&**text);
            doc.append_child(parent, id);
        }
        ScraperNode::Comment(comment) => {
            let id = doc.create_comment(&**comment);
            doc.append_child(parent, id);
        }
        // doctype and processing instructions are dropped; the serializer
        // re-emits a doctype when configured to
        _ => {}
    }
}

impl Document {
    /// Replaces the children of `element` with nodes parsed from `markup`.
    pub fn set_inner_markup(&mut self, element: NodeId, markup: &str) {
        self.remove_children(element);
        parse_fragment_into(self, element, markup);
    }
}
