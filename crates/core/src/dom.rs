//! Mutable arena-backed HTML document.
//!
//! The extraction pipeline rewrites the tree heavily (detaching subtrees,
//! renaming elements, moving children between parents), so parsed input is
//! converted into this arena rather than kept in the parser's immutable tree.
//! Nodes live in a `Vec` and are addressed by [`NodeId`]; parents own their
//! child lists and children carry a non-owning parent index. Detached nodes
//! stay in the arena and are simply unreachable from the root.

/// Index of a node inside a [`Document`] arena.
///
/// Ids are never invalidated: removal only unlinks a node from its parent.
/// An id is only meaningful for the document that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Payload of a single node.
#[derive(Debug, Clone)]
pub enum NodeData {
    /// An element with a tag name and its attributes in document order.
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
    },
    /// A text node.
    Text(String),
    /// A comment node.
    Comment(String),
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An HTML document whose root is always an `html` element.
///
/// The parser guarantees an `html` root even for empty input, and
/// [`Document::new`] creates one, so operations never have to handle a
/// rootless tree.
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
    /// Creates a document containing a bare `<html>` root element.
    pub fn new() -> Self {
        let root_node = Node {
            data: NodeData::Element {
                tag: "html".to_string(),
                attrs: Vec::new(),
            },
            parent: None,
            children: Vec::new(),
        };
        Document {
            nodes: vec![root_node],
            root: NodeId(0),
        }
    }

    /// Returns the root `html` element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Creates a detached element node.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeData::Element {
            tag: tag.to_string(),
            attrs: Vec::new(),
        })
    }

    /// Creates a detached text node.
    pub fn create_text(&mut self, value: &str) -> NodeId {
        self.alloc(NodeData::Text(value.to_string()))
    }

    /// Creates a detached comment node.
    pub fn create_comment(&mut self, value: &str) -> NodeId {
        self.alloc(NodeData::Comment(value.to_string()))
    }

    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.node(id).data
    }

    /// Tag name of an element node, `None` for text and comment nodes.
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).data {
            NodeData::Element { tag, .. } => Some(tag.as_str()),
            _ => None,
        }
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.node(id).data, NodeData::Element { .. })
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.node(id).data, NodeData::Text(_))
    }

    /// Value of a text node, `None` for elements and comments.
    pub fn text_value(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).data {
            NodeData::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Renames an element in place. No-op for non-element nodes.
    pub fn rename(&mut self, id: NodeId, tag: &str) {
        if let NodeData::Element { tag: current, .. } = &mut self.node_mut(id).data {
            *current = tag.to_string();
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).children.first().copied()
    }

    /// The node immediately after `id` in its parent's child list.
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.node(id).parent?;
        let siblings = &self.node(parent).children;
        let pos = siblings.iter().position(|&c| c == id)?;
        siblings.get(pos + 1).copied()
    }

    /// Direct element children, materialized so the tree can be mutated while
    /// iterating the result.
    pub fn child_elements(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id)
            .children
            .iter()
            .copied()
            .filter(|&c| self.is_element(c))
            .collect()
    }

    /// Unlinks `id` from its parent. The node (and its subtree) stays in the
    /// arena but becomes unreachable from the root.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.node(id).parent {
            self.node_mut(parent).children.retain(|&c| c != id);
            self.node_mut(id).parent = None;
        }
    }

    /// Appends `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
    }

    /// Inserts `child` as the first child of `parent`.
    pub fn insert_first(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.insert(0, child);
    }

    /// Inserts `new_node` immediately before `reference` in the reference's
    /// parent. No-op when the reference is detached.
    pub fn insert_before(&mut self, new_node: NodeId, reference: NodeId) {
        let Some(parent) = self.node(reference).parent else {
            return;
        };
        self.detach(new_node);
        let pos = self
            .node(parent)
            .children
            .iter()
            .position(|&c| c == reference)
            .unwrap_or(self.node(parent).children.len());
        self.node_mut(new_node).parent = Some(parent);
        self.node_mut(parent).children.insert(pos, new_node);
    }

    /// Replaces `old` with `new_node` at the same position; `old` is
    /// detached.
    pub fn replace_node(&mut self, old: NodeId, new_node: NodeId) {
        self.insert_before(new_node, old);
        self.detach(old);
    }

    /// Detaches every child of `id`.
    pub fn remove_children(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.node_mut(id).children);
        for child in children {
            self.node_mut(child).parent = None;
        }
    }

    /// Moves all children of `from` to the end of `to`'s child list,
    /// preserving order.
    pub fn move_children(&mut self, from: NodeId, to: NodeId) {
        let children = std::mem::take(&mut self.node_mut(from).children);
        for &child in &children {
            self.node_mut(child).parent = Some(to);
        }
        self.node_mut(to).children.extend(children);
    }

    /// Attribute value by case-insensitive name.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.node(id).data {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|(n, _)| n.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    /// Sets an attribute; `None` removes it.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: Option<&str>) {
        let NodeData::Element { attrs, .. } = &mut self.node_mut(id).data else {
            return;
        };
        match value {
            Some(value) => {
                if let Some(entry) = attrs.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
                    entry.1 = value.to_string();
                } else {
                    attrs.push((name.to_string(), value.to_string()));
                }
            }
            None => attrs.retain(|(n, _)| !n.eq_ignore_ascii_case(name)),
        }
    }

    /// The `id` attribute, empty string when absent.
    pub fn element_id(&self, id: NodeId) -> String {
        self.attr(id, "id").unwrap_or("").trim().to_string()
    }

    pub fn set_element_id(&mut self, id: NodeId, value: Option<&str>) {
        self.set_attr(id, "id", value);
    }

    /// The `class` attribute, empty string when absent.
    pub fn class(&self, id: NodeId) -> String {
        self.attr(id, "class").unwrap_or("").trim().to_string()
    }

    pub fn set_class(&mut self, id: NodeId, value: Option<&str>) {
        self.set_attr(id, "class", value);
    }

    /// The `style` attribute, empty string when absent.
    pub fn style(&self, id: NodeId) -> String {
        self.attr(id, "style").unwrap_or("").trim().to_string()
    }

    pub fn set_style(&mut self, id: NodeId, value: Option<&str>) {
        self.set_attr(id, "style", value);
    }

    /// All attribute values joined with `separator`, in document order,
    /// skipping empty values. The separator may be empty.
    pub fn attributes_joined(&self, id: NodeId, separator: &str) -> String {
        let NodeData::Element { attrs, .. } = &self.node(id).data else {
            return String::new();
        };
        let mut result = String::new();
        for (_, value) in attrs {
            if value.is_empty() {
                continue;
            }
            if !result.is_empty() {
                result.push_str(separator);
            }
            result.push_str(value);
        }
        result
    }

    /// All descendants of `id` in pre-order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack: Vec<NodeId> = self.node(id).children.iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            result.push(current);
            stack.extend(self.node(current).children.iter().rev().copied());
        }
        result
    }

    /// Descendant elements of `scope` with the given tag name,
    /// case-insensitive, in document order. `scope` itself is excluded.
    ///
    /// Panics on an empty tag name; that is a programmer error.
    pub fn elements_by_tag_name(&self, scope: NodeId, tag: &str) -> Vec<NodeId> {
        assert!(!tag.is_empty(), "tag name must not be empty");
        self.descendants(scope)
            .into_iter()
            .filter(|&d| {
                self.tag_name(d)
                    .is_some_and(|t| t.eq_ignore_ascii_case(tag))
            })
            .collect()
    }

    /// Direct element children of `scope` with the given tag name,
    /// case-insensitive.
    pub fn children_by_tag_name(&self, scope: NodeId, tag: &str) -> Vec<NodeId> {
        assert!(!tag.is_empty(), "tag name must not be empty");
        self.node(scope)
            .children
            .iter()
            .copied()
            .filter(|&c| {
                self.tag_name(c)
                    .is_some_and(|t| t.eq_ignore_ascii_case(tag))
            })
            .collect()
    }

    /// First element (in document order) whose `id` attribute equals `value`.
    pub fn element_by_id(&self, value: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|&d| self.is_element(d) && self.attr(d, "id") == Some(value))
    }

    /// Concatenated text of all descendant text nodes (and of `id` itself if
    /// it is a text node). Comments contribute nothing.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut result = String::new();
        if let Some(value) = self.text_value(id) {
            result.push_str(value);
        }
        for d in self.descendants(id) {
            if let Some(value) = self.text_value(d) {
                result.push_str(value);
            }
        }
        result
    }

    /// The document's `<body>` element, created under the root when the
    /// input had none.
    pub fn get_or_create_body(&mut self) -> NodeId {
        if let Some(body) = self.elements_by_tag_name(self.root, "body").into_iter().next() {
            return body;
        }
        let body = self.create_element("body");
        self.append_child(self.root, body);
        body
    }

    /// The `<title>` text from `<head>`, trimmed; empty when missing.
    pub fn title_text(&self) -> String {
        let Some(head) = self
            .elements_by_tag_name(self.root, "head")
            .into_iter()
            .next()
        else {
            return String::new();
        };
        let Some(title) = self.children_by_tag_name(head, "title").into_iter().next() else {
            return String::new();
        };
        self.text_content(title).trim().to_string()
    }
}
