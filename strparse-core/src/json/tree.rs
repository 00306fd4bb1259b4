//! Navigable document tree built from relaxed JSON events.
//!
//! The tree uses an index-based arena, so nodes can point at their parent
//! without reference cycles. Array elements are stored directly as children
//! of the array; a property node has exactly one child, its value.
//!
//! # Example
//!
//! ```
//! use strparse_core::json::tree::Document;
//!
//! let doc = Document::parse("{ name: Amy, tags: [a, b] }");
//! let root = doc.root().first_child().unwrap();
//! assert_eq!(root.get("name").and_then(|n| n.as_str()), Some("Amy"));
//! assert_eq!(root.get("tags").and_then(|t| t.index(1)).and_then(|n| n.as_str()), Some("b"));
//! assert_eq!(doc.to_string(), "{name:'Amy',tags:['a','b']}");
//! ```

use std::fmt;

use super::{parse_str, JsonListener, JsonSerializer};

/// Index into the document's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    const ROOT: NodeId = NodeId(0);

    fn new(index: usize) -> Self {
        NodeId(index as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
struct NodeData {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

/// The kind of node in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Root container. Holds the top-level value, if any.
    Document,
    Object,
    Array,
    /// A named member of an object.
    Property(String),
    /// Scalar value; `None` is null.
    Value(Option<String>),
}

// ============================================================================
// Document
// ============================================================================

/// A relaxed JSON document as a tree.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<NodeData>,
}

impl Default for Document {
    fn default() -> Self {
        Self { nodes: vec![NodeData { parent: None, children: Vec::new(), kind: NodeKind::Document }] }
    }
}

impl Document {
    /// Parse the first object in `input`. Parsing never fails; an input
    /// without an object yields an empty document.
    pub fn parse(input: &str) -> Self {
        let mut tree = JsonTree::new();
        parse_str(input, &mut tree);
        tree.finish()
    }

    pub fn root(&self) -> Node<'_> {
        Node { doc: self, id: NodeId::ROOT }
    }

    pub fn get(&self, id: NodeId) -> Option<Node<'_>> {
        (id.index() < self.nodes.len()).then_some(Node { doc: self, id })
    }

    /// Number of nodes, the root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes[NodeId::ROOT.index()].children.is_empty()
    }

    /// Emit the events that would rebuild this document.
    pub fn replay<L: JsonListener + ?Sized>(&self, listener: &mut L) {
        for child in self.root().children() {
            child.replay(listener);
        }
    }

    fn node_data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }
}

/// Canonical text form.
impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = JsonSerializer::with_writer(f);
        self.replay(&mut out);
        out.finish().map(|_| ())
    }
}

// ============================================================================
// Node (navigation handle)
// ============================================================================

/// A lightweight handle borrowing from the document.
#[derive(Clone, Copy)]
pub struct Node<'doc> {
    doc: &'doc Document,
    id: NodeId,
}

impl<'doc> Node<'doc> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> &'doc NodeKind {
        &self.doc.node_data(self.id).kind
    }

    pub fn parent(&self) -> Option<Node<'doc>> {
        self.doc.node_data(self.id).parent.map(|id| Node { doc: self.doc, id })
    }

    pub fn children(&self) -> impl Iterator<Item = Node<'doc>> + 'doc {
        let doc = self.doc;
        doc.node_data(self.id).children.iter().map(move |&id| Node { doc, id })
    }

    pub fn first_child(&self) -> Option<Node<'doc>> {
        self.doc.node_data(self.id).children.first().map(|&id| Node { doc: self.doc, id })
    }

    pub fn next_sibling(&self) -> Option<Node<'doc>> {
        let parent_id = self.doc.node_data(self.id).parent?;
        let siblings = &self.doc.node_data(parent_id).children;
        let pos = siblings.iter().position(|&id| id == self.id)?;
        siblings.get(pos + 1).map(|&id| Node { doc: self.doc, id })
    }

    pub fn is_object(&self) -> bool {
        matches!(self.kind(), NodeKind::Object)
    }

    pub fn is_array(&self) -> bool {
        matches!(self.kind(), NodeKind::Array)
    }

    pub fn is_null(&self) -> bool {
        matches!(self.kind(), NodeKind::Value(None))
    }

    /// The property name, for property nodes.
    pub fn name(&self) -> Option<&'doc str> {
        match self.kind() {
            NodeKind::Property(name) => Some(name.as_str()),
            _ => None,
        }
    }

    /// The text of a non-null scalar.
    pub fn as_str(&self) -> Option<&'doc str> {
        match self.kind() {
            NodeKind::Value(Some(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Value of the first property called `name`, for object nodes.
    pub fn get(&self, name: &str) -> Option<Node<'doc>> {
        if !self.is_object() {
            return None;
        }
        self.children().find(|p| p.name() == Some(name))?.first_child()
    }

    /// The `i`-th element, for array nodes.
    pub fn index(&self, i: usize) -> Option<Node<'doc>> {
        if !self.is_array() {
            return None;
        }
        self.children().nth(i)
    }

    /// Emit the events for this subtree.
    pub fn replay<L: JsonListener + ?Sized>(&self, listener: &mut L) {
        match self.kind() {
            NodeKind::Document => self.doc.replay(listener),
            NodeKind::Object => {
                listener.begin_object();
                for child in self.children() {
                    child.replay(listener);
                }
                listener.end_object();
            }
            NodeKind::Array => {
                listener.begin_array();
                for child in self.children() {
                    listener.begin_element();
                    child.replay(listener);
                    listener.end_element();
                }
                listener.end_array();
            }
            NodeKind::Property(name) => {
                listener.begin_property(name);
                match self.first_child() {
                    Some(value) => value.replay(listener),
                    None => listener.on_value(None),
                }
                listener.end_property(name);
            }
            NodeKind::Value(value) => listener.on_value(value.as_deref()),
        }
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node").field("id", &self.id).field("kind", self.kind()).finish()
    }
}

// ============================================================================
// JsonTree (event consumer)
// ============================================================================

/// Listener building a [`Document`] from events.
///
/// Unbalanced end events are ignored; the root is never popped.
#[derive(Debug, Default)]
pub struct JsonTree {
    doc: Document,
    /// Open containers and properties.
    stack: Vec<NodeId>,
}

impl JsonTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> Document {
        self.doc
    }

    fn current(&self) -> NodeId {
        self.stack.last().copied().unwrap_or(NodeId::ROOT)
    }

    fn push_node(&mut self, kind: NodeKind) -> NodeId {
        let parent = self.current();
        let id = NodeId::new(self.doc.nodes.len());
        self.doc.nodes.push(NodeData { parent: Some(parent), children: Vec::new(), kind });
        self.doc.nodes[parent.index()].children.push(id);
        id
    }

    fn open(&mut self, kind: NodeKind) {
        let id = self.push_node(kind);
        self.stack.push(id);
    }
}

impl JsonListener for JsonTree {
    fn begin_object(&mut self) {
        self.open(NodeKind::Object);
    }
    fn end_object(&mut self) {
        self.stack.pop();
    }
    fn begin_property(&mut self, name: &str) {
        self.open(NodeKind::Property(name.to_string()));
    }
    fn end_property(&mut self, _name: &str) {
        self.stack.pop();
    }
    fn begin_array(&mut self) {
        self.open(NodeKind::Array);
    }
    fn end_array(&mut self) {
        self.stack.pop();
    }
    fn on_value(&mut self, value: Option<&str>) {
        self.push_node(NodeKind::Value(value.map(str::to_string)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::{EventRecorder, JsonBuilder};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_navigation() {
        let doc = Document::parse("{ a: { b: [x, null, { c: 'd' }] }, e }");
        let root = doc.root().first_child().unwrap();
        assert!(root.is_object());
        let b = root.get("a").and_then(|a| a.get("b")).unwrap();
        assert!(b.is_array());
        assert_eq!(b.index(0).and_then(|n| n.as_str()), Some("x"));
        assert!(b.index(1).unwrap().is_null());
        assert_eq!(b.index(2).and_then(|o| o.get("c")).and_then(|n| n.as_str()), Some("d"));
        assert_eq!(b.index(3).map(|n| n.id()), None);
        assert!(root.get("e").unwrap().is_null());
        assert_eq!(root.get("missing").map(|n| n.id()), None);
    }

    #[test]
    fn test_parents_and_siblings() {
        let doc = Document::parse("{a:1, b:2}");
        let root = doc.root().first_child().unwrap();
        let a = root.first_child().unwrap();
        assert_eq!(a.name(), Some("a"));
        assert_eq!(a.next_sibling().and_then(|n| n.name()), Some("b"));
        assert_eq!(a.parent().map(|n| n.id()), Some(root.id()));
        assert_eq!(root.parent().map(|n| n.kind().clone()), Some(NodeKind::Document));
    }

    #[test]
    fn test_replay_matches_parser() {
        let input = "{ x: [ {}, [a], b ], y: 'z' }";
        let mut parsed = EventRecorder::new();
        crate::json::parse_str(input, &mut parsed);
        let mut replayed = EventRecorder::new();
        Document::parse(input).replay(&mut replayed);
        assert_eq!(replayed, parsed);
    }

    #[test]
    fn test_empty_document() {
        let doc = Document::parse("no object here");
        assert!(doc.is_empty());
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.to_string(), "");
    }

    #[test]
    fn test_from_builder() {
        let mut b = JsonBuilder::new(JsonTree::new());
        b.begin_array().and_then(|b| b.add_array_values(["1", "2"])).and_then(|b| b.end()).unwrap();
        let doc = b.into_inner().finish();
        let array = doc.root().first_child().unwrap();
        assert_eq!(array.children().filter_map(|n| n.as_str()).collect::<Vec<_>>(), vec!["1", "2"]);
        assert_eq!(doc.to_string(), "['1','2']");
    }
}
