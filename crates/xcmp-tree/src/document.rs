//! The [`Document`] arena.

use std::str::FromStr;

use crate::builder;
use crate::error::{ParseError, ParseResult};
use crate::node::{Node, NodeData, NodeId};
use crate::walk;

/// A parsed XML document: owns every element node.
///
/// Nodes are stored in document pre-order, so the root is always the first
/// entry. Once built, the tree is immutable apart from each node's lazily
/// filled fingerprint slot. The root fingerprint is computed during
/// [`Document::parse`], so a returned document is fully annotated and can be
/// shared across threads.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<NodeData>,
}

impl Document {
    /// Parse XML text into an annotated tree.
    pub fn parse(text: &str) -> ParseResult<Self> {
        builder::build(text)
    }

    /// Parse UTF-8 encoded XML bytes.
    pub fn parse_bytes(bytes: &[u8]) -> ParseResult<Self> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| ParseError::at(bytes, e.valid_up_to(), "input is not valid UTF-8"))?;
        Self::parse(text)
    }

    /// Wrap already-linked nodes. `nodes` must be non-empty, in pre-order.
    pub(crate) fn from_nodes(nodes: Vec<NodeData>) -> Self {
        Self { nodes }
    }

    pub(crate) fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    pub(crate) fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.0]
    }

    /// The root element.
    pub fn root(&self) -> Node<'_> {
        Node::new(self, NodeId(0))
    }

    /// Look up a node by id.
    pub fn get(&self, id: NodeId) -> Option<Node<'_>> {
        (id.0 < self.nodes.len()).then(|| Node::new(self, id))
    }

    /// Number of element nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: a document has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in document pre-order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Node<'_>> + '_ {
        (0..self.nodes.len()).map(move |i| Node::new(self, NodeId(i)))
    }

    /// Walk the whole tree from the root. See [`walk::walk`].
    pub fn walk<'a, F>(&'a self, visitor: F) -> bool
    where
        F: FnMut(Node<'a>) -> bool,
    {
        walk::walk(self.root(), visitor)
    }
}

impl FromStr for Document {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iter_is_document_preorder() {
        let doc = Document::parse("<r><a><b/></a><c/></r>").unwrap();
        let names: Vec<&str> = doc.iter().map(|n| n.name()).collect();
        assert_eq!(names, vec!["r", "a", "b", "c"]);

        let mut walked = Vec::new();
        doc.walk(|n| {
            walked.push(n.name());
            true
        });
        assert_eq!(names, walked);
    }

    #[test]
    fn get_by_id() {
        let doc = Document::parse("<r><a/></r>").unwrap();
        let a = doc.root().children().next().unwrap();
        assert_eq!(doc.get(a.id()), Some(a));
        assert!(doc.get(NodeId(5)).is_none());
    }

    #[test]
    fn parse_bytes_rejects_invalid_utf8() {
        let err = Document::parse_bytes(b"<r>\xff</r>").unwrap_err();
        assert_eq!((err.line, err.column), (1, 4));
    }

    #[test]
    fn from_str_parses() {
        let doc: Document = "<r/>".parse().unwrap();
        assert_eq!(doc.len(), 1);
        assert!(!doc.is_empty());
    }

    #[test]
    fn documents_are_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Document>();

        let doc = Document::parse("<r><a>1</a><b>2</b></r>").unwrap();
        let expected = doc.root().fingerprint();
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| assert_eq!(doc.root().fingerprint(), expected));
            }
        });
    }
}
