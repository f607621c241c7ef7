//! In-memory XML trees annotated for comparison.
//!
//! Every element of a parsed document becomes a [`Node`] carrying two derived
//! artifacts:
//!
//! - a [`Fingerprint`]: a 32-bit structural hash over the element name, its
//!   trimmed character data, its non-namespace attributes and, in document
//!   order, the fingerprints of its children;
//! - a path such as `/root/item[2]/name` locating the node from the root.
//!
//! Two subtrees with equal fingerprints are treated as equal, which lets a
//! downstream diff skip identical branches and report the rest by path.
//!
//! # Key Types
//!
//! - [`Document`] -- Arena owning every node; built with [`Document::parse`]
//! - [`Node`] -- Copyable handle for read access, fingerprint, path and display
//! - [`Attribute`] -- `(name, namespace, value)` triple in document order
//! - [`ParseError`] -- The input text was not well-formed XML
//!
//! # Example
//!
//! ```
//! use xcmp_tree::Document;
//!
//! let doc = Document::parse("<root><a/><a>x</a></root>").unwrap();
//! let second = doc.root().children().nth(1).unwrap();
//! assert_eq!(second.path(), "/root/a[1]");
//! assert_eq!(second.to_string(), "a[] = x");
//! ```

pub mod builder;
pub mod document;
pub mod error;
pub mod fingerprint;
pub mod node;
pub mod path;
pub mod walk;

pub use document::Document;
pub use error::{ParseError, ParseResult};
pub use fingerprint::Fingerprint;
pub use node::{Attribute, Node, NodeId, XMLNS};
pub use path::Disambiguation;
pub use walk::walk;
