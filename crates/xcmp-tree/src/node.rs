//! Node model: element records stored in a [`Document`] arena and the
//! [`Node`] handle used to read them.
//!
//! Ownership is strictly top-down: a node's `children` list is the owning
//! edge, while `parent` is a plain index used only to walk upward.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::fingerprint::{self, Fingerprint};
use crate::path::{self, Disambiguation};
use crate::walk;

/// Name (or prefix namespace) marking a namespace-declaration attribute.
pub const XMLNS: &str = "xmlns";

/// Index of a node inside its [`Document`].
///
/// Indices follow document pre-order: the root is always index 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in the document's pre-order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// An attribute as written on an element, in document order.
///
/// A namespace declaration `xmlns="..."` is stored with name `xmlns` and an
/// empty namespace; `xmlns:p="..."` is stored with name `p` and namespace
/// `xmlns`. Any other attribute carries the resolved URI of its prefix, or
/// an empty namespace when unprefixed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub namespace: String,
    pub value: String,
}

impl Attribute {
    /// Create an attribute.
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            value: value.into(),
        }
    }

    /// Returns `true` for `xmlns` and `xmlns:*` declarations.
    ///
    /// Declarations are kept on the node but excluded from fingerprints and
    /// attribute comparisons.
    pub fn is_namespace_declaration(&self) -> bool {
        self.namespace == XMLNS || self.name == XMLNS
    }
}

/// Storage for one element.
#[derive(Debug, Default)]
pub(crate) struct NodeData {
    pub(crate) name: String,
    pub(crate) namespace: String,
    pub(crate) attributes: Vec<Attribute>,
    pub(crate) raw_content: String,
    pub(crate) text: String,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) fingerprint: OnceLock<Fingerprint>,
}

/// Read-only handle to an element of a [`Document`].
///
/// Cheap to copy. Two handles are equal when they point at the same node of
/// the same document.
#[derive(Clone, Copy)]
pub struct Node<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl<'a> Node<'a> {
    pub(crate) fn new(doc: &'a Document, id: NodeId) -> Self {
        Self { doc, id }
    }

    pub(crate) fn data(&self) -> &'a NodeData {
        self.doc.data(self.id)
    }

    /// The node's index in its document.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The document that owns this node.
    pub fn document(&self) -> &'a Document {
        self.doc
    }

    /// Local name of the element.
    pub fn name(&self) -> &'a str {
        &self.data().name
    }

    /// Resolved namespace URI of the element, empty when unbound.
    pub fn namespace(&self) -> &'a str {
        &self.data().namespace
    }

    /// All attributes in document order, namespace declarations included.
    pub fn attributes(&self) -> &'a [Attribute] {
        &self.data().attributes
    }

    /// Value of the first non-namespace attribute with local name `name`.
    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.attributes()
            .iter()
            .find(|attr| !attr.is_namespace_declaration() && attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Non-namespace attributes keyed by local name.
    ///
    /// This is the order-independent view used for attribute comparison. If a
    /// local name repeats under different namespaces, the last one wins.
    pub fn attribute_map(&self) -> BTreeMap<String, String> {
        self.attributes()
            .iter()
            .filter(|attr| !attr.is_namespace_declaration())
            .map(|attr| (attr.name.clone(), attr.value.clone()))
            .collect()
    }

    /// Unparsed inner markup, exactly as it appeared in the source.
    pub fn raw_content(&self) -> &'a str {
        &self.data().raw_content
    }

    /// Trimmed character data directly under this element.
    pub fn text(&self) -> &'a str {
        &self.data().text
    }

    /// Child elements in document order.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = Node<'a>> + ExactSizeIterator + 'a {
        let doc = self.doc;
        self.data().children.iter().map(move |&id| Node::new(doc, id))
    }

    /// Number of child elements.
    pub fn child_count(&self) -> usize {
        self.data().children.len()
    }

    /// Returns `true` if the element has child elements.
    pub fn has_children(&self) -> bool {
        !self.data().children.is_empty()
    }

    /// The enclosing element, or `None` for the root.
    pub fn parent(&self) -> Option<Node<'a>> {
        self.data().parent.map(|id| Node::new(self.doc, id))
    }

    /// Returns `true` if this is the document root.
    pub fn is_root(&self) -> bool {
        self.data().parent.is_none()
    }

    /// Index of this node among its parent's children, by identity.
    ///
    /// Unlike the index shown by [`Node::path_by_fingerprint`], this always
    /// designates this very occurrence, even among identical siblings.
    pub fn position(&self) -> Option<usize> {
        let parent = self.parent()?;
        parent.data().children.iter().position(|&id| id == self.id)
    }

    /// Memoized structural fingerprint of this subtree.
    pub fn fingerprint(&self) -> Fingerprint {
        fingerprint::fingerprint_of(*self)
    }

    /// Root-relative path such as `/root/item[1]/name`.
    ///
    /// Repeated siblings are indexed by their own position, so every node of
    /// a document has a distinct path.
    pub fn path(&self) -> String {
        path::path_with(*self, Disambiguation::Position)
    }

    /// Path whose sibling indices point at the first sibling with the same
    /// fingerprint.
    ///
    /// Structurally identical siblings share one path under this rule.
    pub fn path_by_fingerprint(&self) -> String {
        path::path_with(*self, Disambiguation::Fingerprint)
    }

    /// Visit this node and its descendants in pre-order.
    ///
    /// See [`walk::walk`].
    pub fn walk<F>(&self, visitor: F) -> bool
    where
        F: FnMut(Node<'a>) -> bool,
    {
        walk::walk(*self, visitor)
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id.0)
            .field("name", &self.name())
            .finish()
    }
}

/// Diagnostic rendering: `name[attr=value, ...]`, followed by
/// ` = <raw content>` for nodes without children.
impl fmt::Display for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", self.name())?;
        for (i, attr) in self.attributes().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", attr.name, attr.value)?;
        }
        f.write_str("]")?;
        if !self.has_children() {
            write!(f, " = {}", self.raw_content())?;
        }
        Ok(())
    }
}
