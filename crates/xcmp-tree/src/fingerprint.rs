//! Structural fingerprints of XML subtrees.
//!
//! A node's fingerprint is seeded with the CRC-32 of its name, then the
//! checksum is continued over its trimmed text and over each non-namespace
//! attribute (name, then value). Attributes are folded in `(name, value)`
//! order, so reordering attributes never changes the result. Child
//! fingerprints are then mixed in document order with `running * 31 + child`,
//! which keeps sibling order significant.
//!
//! Fingerprints are computed post-order and memoized per node; once set, a
//! node's fingerprint is never recomputed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::node::{Attribute, Node};

/// Multiplier used to mix child fingerprints into their parent's.
const CHILD_MULTIPLIER: u32 = 31;

/// A 32-bit structural hash of a node and its subtree.
///
/// Equal subtrees always produce equal fingerprints. Unequal subtrees may
/// collide: a fingerprint is suitable for short-circuiting equality checks,
/// not as a security-sensitive digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fingerprint(u32);

impl Fingerprint {
    /// Wrap a raw 32-bit value.
    pub const fn from_value(value: u32) -> Self {
        Self(value)
    }

    /// The raw 32-bit value.
    pub const fn value(&self) -> u32 {
        self.0
    }

    /// Hex-encoded big-endian representation (8 characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0.to_be_bytes())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.to_hex())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<u32> for Fingerprint {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<Fingerprint> for u32 {
    fn from(fingerprint: Fingerprint) -> Self {
        fingerprint.0
    }
}

/// Return the memoized fingerprint of `node`, computing every missing
/// fingerprint in its subtree first.
pub(crate) fn fingerprint_of(node: Node<'_>) -> Fingerprint {
    if let Some(cached) = node.data().fingerprint.get() {
        return *cached;
    }

    // Post-order with an explicit stack.
    let mut stack = vec![(node, false)];
    while let Some((current, children_done)) = stack.pop() {
        let slot = &current.data().fingerprint;
        if slot.get().is_some() {
            continue;
        }
        if children_done {
            slot.get_or_init(|| combine(current));
        } else {
            stack.push((current, true));
            stack.extend(
                current
                    .children()
                    .filter(|child| child.data().fingerprint.get().is_none())
                    .map(|child| (child, false)),
            );
        }
    }

    *node.data().fingerprint.get_or_init(|| combine(node))
}

/// Fold the node's own content and its children's fingerprints.
///
/// Children must already carry their fingerprints.
fn combine(node: Node<'_>) -> Fingerprint {
    let mut running = crc32fast::hash(node.name().as_bytes());
    running = fold(running, node.text().trim().as_bytes());

    let mut attributes: Vec<&Attribute> = node
        .attributes()
        .iter()
        .filter(|attr| !attr.is_namespace_declaration())
        .collect();
    attributes.sort_by(|a, b| (&a.name, &a.value).cmp(&(&b.name, &b.value)));
    for attr in attributes {
        running = fold(running, attr.name.as_bytes());
        running = fold(running, attr.value.as_bytes());
    }

    for child in node.children() {
        running = running
            .wrapping_mul(CHILD_MULTIPLIER)
            .wrapping_add(child.fingerprint().value());
    }

    Fingerprint(running)
}

/// Continue a CRC-32 over more bytes.
fn fold(crc: u32, bytes: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new_with_initial(crc);
    hasher.update(bytes);
    hasher.finalize()
}
