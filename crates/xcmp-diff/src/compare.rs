//! Node-by-node comparison of two documents.
//!
//! Nodes are compared pairwise starting from the roots. A pair with equal
//! fingerprints is identical and skipped. Otherwise the pair's names, text
//! and attributes are checked, then their children are paired: identical
//! subtrees first, in order, then remaining children with the same name.
//! Unpaired children are reported as added or removed; paired ones are
//! compared in turn.

use std::fmt;

use serde::Serialize;
use tracing::debug;
use xcmp_tree::{Document, Fingerprint, Node};

use crate::config::CompareConfig;

/// The result of comparing two documents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Comparison {
    /// Fingerprint of the left root.
    pub left_fingerprint: Fingerprint,
    /// Fingerprint of the right root.
    pub right_fingerprint: Fingerprint,
    /// Differences in discovery order.
    pub differences: Vec<Difference>,
    /// `true` if the comparison stopped at `max_differences`.
    pub truncated: bool,
}

impl Comparison {
    /// Returns `true` if no difference was found.
    pub fn is_equal(&self) -> bool {
        self.differences.is_empty()
    }

    /// Returns `true` if there are no differences.
    pub fn is_empty(&self) -> bool {
        self.differences.is_empty()
    }

    /// Number of differences.
    pub fn len(&self) -> usize {
        self.differences.len()
    }
}

/// A single difference between two documents.
///
/// Paths are those of [`Node::path`] in the respective document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Difference {
    /// Paired elements have different local names.
    NameMismatch {
        left_path: String,
        right_path: String,
        left: String,
        right: String,
    },
    /// Paired elements live in different namespaces.
    NamespaceMismatch {
        left_path: String,
        right_path: String,
        left: String,
        right: String,
    },
    /// Paired elements have different trimmed text.
    TextMismatch {
        left_path: String,
        right_path: String,
        left: String,
        right: String,
    },
    /// An attribute exists only on the right element.
    AttributeAdded {
        path: String,
        name: String,
        value: String,
    },
    /// An attribute exists only on the left element.
    AttributeRemoved {
        path: String,
        name: String,
        value: String,
    },
    /// An attribute has different values.
    AttributeChanged {
        left_path: String,
        right_path: String,
        name: String,
        left: String,
        right: String,
    },
    /// A child element exists only on the right.
    ChildAdded {
        parent_path: String,
        path: String,
        node: String,
    },
    /// A child element exists only on the left.
    ChildRemoved {
        parent_path: String,
        path: String,
        node: String,
    },
    /// Paired children appear in a different order.
    ChildrenReordered { left_path: String, right_path: String },
}

impl Difference {
    /// The path the difference is reported at.
    pub fn path(&self) -> &str {
        match self {
            Self::NameMismatch { left_path, .. }
            | Self::NamespaceMismatch { left_path, .. }
            | Self::TextMismatch { left_path, .. }
            | Self::AttributeChanged { left_path, .. }
            | Self::ChildrenReordered { left_path, .. } => left_path,
            Self::AttributeAdded { path, .. }
            | Self::AttributeRemoved { path, .. }
            | Self::ChildAdded { path, .. }
            | Self::ChildRemoved { path, .. } => path,
        }
    }
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NameMismatch { left_path, left, right, .. } => {
                write!(f, "{left_path}: element name differs: {left} vs {right}")
            }
            Self::NamespaceMismatch { left_path, left, right, .. } => {
                write!(f, "{left_path}: namespace differs: {left:?} vs {right:?}")
            }
            Self::TextMismatch { left_path, left, right, .. } => {
                write!(f, "{left_path}: text differs: {left:?} vs {right:?}")
            }
            Self::AttributeAdded { path, name, value } => {
                write!(f, "{path}: attribute added: {name}={value}")
            }
            Self::AttributeRemoved { path, name, value } => {
                write!(f, "{path}: attribute removed: {name}={value}")
            }
            Self::AttributeChanged { left_path, name, left, right, .. } => {
                write!(f, "{left_path}: attribute {name} differs: {left:?} vs {right:?}")
            }
            Self::ChildAdded { path, node, .. } => write!(f, "{path}: element added: {node}"),
            Self::ChildRemoved { path, node, .. } => write!(f, "{path}: element removed: {node}"),
            Self::ChildrenReordered { left_path, .. } => {
                write!(f, "{left_path}: children reordered")
            }
        }
    }
}

/// Compare two documents.
pub fn compare(left: &Document, right: &Document, config: &CompareConfig) -> Comparison {
    let mut out = Collector::new(config.max_differences);
    let mut pending = vec![(left.root(), right.root())];

    while let Some((l, r)) = pending.pop() {
        if out.truncated {
            break;
        }
        let children = compare_pair(l, r, config, &mut out);
        pending.extend(children.into_iter().rev());
    }

    let comparison = Comparison {
        left_fingerprint: left.root().fingerprint(),
        right_fingerprint: right.root().fingerprint(),
        differences: out.differences,
        truncated: out.truncated,
    };
    debug!(
        left = %comparison.left_fingerprint,
        right = %comparison.right_fingerprint,
        differences = comparison.len(),
        truncated = comparison.truncated,
        "compared documents"
    );
    comparison
}

/// Differences gathered so far, bounded by `limit` (0 = unbounded).
struct Collector {
    differences: Vec<Difference>,
    limit: usize,
    truncated: bool,
}

impl Collector {
    fn new(limit: usize) -> Self {
        Self {
            differences: Vec::new(),
            limit,
            truncated: false,
        }
    }

    fn push(&mut self, difference: Difference) {
        if self.limit != 0 && self.differences.len() >= self.limit {
            self.truncated = true;
            return;
        }
        self.differences.push(difference);
    }
}

/// Compare one pair and return the child pairs still to visit.
fn compare_pair<'a>(
    left: Node<'a>,
    right: Node<'a>,
    config: &CompareConfig,
    out: &mut Collector,
) -> Vec<(Node<'a>, Node<'a>)> {
    if left.fingerprint() == right.fingerprint() && !config.compare_namespaces {
        return Vec::new();
    }

    let left_path = left.path();
    let right_path = right.path();

    if left.name() != right.name() {
        out.push(Difference::NameMismatch {
            left_path,
            right_path,
            left: left.name().to_string(),
            right: right.name().to_string(),
        });
        return Vec::new();
    }

    if config.compare_namespaces && left.namespace() != right.namespace() {
        out.push(Difference::NamespaceMismatch {
            left_path: left_path.clone(),
            right_path: right_path.clone(),
            left: left.namespace().to_string(),
            right: right.namespace().to_string(),
        });
    }

    if left.text() != right.text() {
        out.push(Difference::TextMismatch {
            left_path: left_path.clone(),
            right_path: right_path.clone(),
            left: left.text().to_string(),
            right: right.text().to_string(),
        });
    }

    compare_attributes(left, right, &left_path, &right_path, out);
    pair_children(left, right, &left_path, &right_path, config, out)
}

fn compare_attributes(
    left: Node<'_>,
    right: Node<'_>,
    left_path: &str,
    right_path: &str,
    out: &mut Collector,
) {
    let old = left.attribute_map();
    let new = right.attribute_map();

    for (name, old_value) in &old {
        match new.get(name) {
            Some(new_value) if new_value != old_value => {
                out.push(Difference::AttributeChanged {
                    left_path: left_path.to_string(),
                    right_path: right_path.to_string(),
                    name: name.clone(),
                    left: old_value.clone(),
                    right: new_value.clone(),
                });
            }
            Some(_) => {}
            None => out.push(Difference::AttributeRemoved {
                path: left_path.to_string(),
                name: name.clone(),
                value: old_value.clone(),
            }),
        }
    }

    for (name, value) in &new {
        if !old.contains_key(name) {
            out.push(Difference::AttributeAdded {
                path: right_path.to_string(),
                name: name.clone(),
                value: value.clone(),
            });
        }
    }
}

/// Pair the children of two compared nodes, reporting unpaired ones.
fn pair_children<'a>(
    left: Node<'a>,
    right: Node<'a>,
    left_path: &str,
    right_path: &str,
    config: &CompareConfig,
    out: &mut Collector,
) -> Vec<(Node<'a>, Node<'a>)> {
    let lefts: Vec<Node<'a>> = left.children().collect();
    let rights: Vec<Node<'a>> = right.children().collect();
    let mut taken = vec![false; rights.len()];
    let mut partner: Vec<Option<usize>> = vec![None; lefts.len()];

    // Identical subtrees first, then same-named leftovers, both in order.
    for (li, l) in lefts.iter().enumerate() {
        let fingerprint = l.fingerprint();
        if let Some(ri) = (0..rights.len()).find(|&ri| !taken[ri] && rights[ri].fingerprint() == fingerprint) {
            taken[ri] = true;
            partner[li] = Some(ri);
        }
    }
    for (li, l) in lefts.iter().enumerate() {
        if partner[li].is_some() {
            continue;
        }
        if let Some(ri) = (0..rights.len()).find(|&ri| !taken[ri] && rights[ri].name() == l.name()) {
            taken[ri] = true;
            partner[li] = Some(ri);
        }
    }

    if config.ordered_children {
        let order: Vec<usize> = partner.iter().flatten().copied().collect();
        if order.windows(2).any(|w| w[0] > w[1]) {
            out.push(Difference::ChildrenReordered {
                left_path: left_path.to_string(),
                right_path: right_path.to_string(),
            });
        }
    }

    for (l, _) in lefts.iter().zip(&partner).filter(|(_, p)| p.is_none()) {
        out.push(Difference::ChildRemoved {
            parent_path: left_path.to_string(),
            path: l.path(),
            node: l.to_string(),
        });
    }
    for (r, _) in rights.iter().zip(&taken).filter(|(_, t)| !**t) {
        out.push(Difference::ChildAdded {
            parent_path: right_path.to_string(),
            path: r.path(),
            node: r.to_string(),
        });
    }

    lefts
        .iter()
        .zip(&partner)
        .filter_map(|(l, p)| p.map(|ri| (*l, rights[ri])))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(left: &str, right: &str, config: &CompareConfig) -> Comparison {
        let l = Document::parse(left).unwrap();
        let r = Document::parse(right).unwrap();
        compare(&l, &r, config)
    }

    fn diff(left: &str, right: &str) -> Comparison {
        run(left, right, &CompareConfig::default())
    }

    #[test]
    fn identical_documents_are_equal() {
        let c = diff("<r><a x=\"1\">t</a></r>", "<r><a x=\"1\">t</a></r>");
        assert!(c.is_equal());
        assert_eq!(c.left_fingerprint, c.right_fingerprint);
    }

    #[test]
    fn insignificant_differences_are_ignored() {
        let c = diff(
            r#"<r a="1" b="2"><t>  hi </t></r>"#,
            r#"<r xmlns:n="urn:n" b="2" a="1"><t>hi</t></r>"#,
        );
        assert!(c.is_equal(), "unexpected: {:?}", c.differences);
    }

    #[test]
    fn reordered_children_are_equal_by_default() {
        let c = diff("<r><a>1</a><b>2</b></r>", "<r><b>2</b><a>1</a></r>");
        assert_ne!(c.left_fingerprint, c.right_fingerprint);
        assert!(c.is_equal());
    }

    #[test]
    fn reordered_children_reported_when_order_matters() {
        let config = CompareConfig {
            ordered_children: true,
            ..Default::default()
        };
        let c = run("<r><a>1</a><b>2</b></r>", "<r><b>2</b><a>1</a></r>", &config);
        assert_eq!(
            c.differences,
            vec![Difference::ChildrenReordered {
                left_path: "/r".into(),
                right_path: "/r".into(),
            }]
        );
    }

    #[test]
    fn text_change_is_reported_at_the_node_path() {
        let c = diff(
            "<r><item>1</item><item>2</item></r>",
            "<r><item>1</item><item>3</item></r>",
        );
        assert_eq!(
            c.differences,
            vec![Difference::TextMismatch {
                left_path: "/r/item[1]".into(),
                right_path: "/r/item[1]".into(),
                left: "2".into(),
                right: "3".into(),
            }]
        );
    }

    #[test]
    fn attribute_changes() {
        let c = diff(r#"<e keep="1" old="x" mod="a"/>"#, r#"<e keep="1" mod="b" new="y"/>"#);
        assert_eq!(c.len(), 3);
        assert!(c.differences.contains(&Difference::AttributeChanged {
            left_path: "/e".into(),
            right_path: "/e".into(),
            name: "mod".into(),
            left: "a".into(),
            right: "b".into(),
        }));
        assert!(c.differences.contains(&Difference::AttributeRemoved {
            path: "/e".into(),
            name: "old".into(),
            value: "x".into(),
        }));
        assert!(c.differences.contains(&Difference::AttributeAdded {
            path: "/e".into(),
            name: "new".into(),
            value: "y".into(),
        }));
    }

    #[test]
    fn added_and_removed_children() {
        let c = diff("<r><a/><gone>1</gone></r>", "<r><a/><fresh k=\"v\"/></r>");
        assert_eq!(
            c.differences,
            vec![
                Difference::ChildRemoved {
                    parent_path: "/r".into(),
                    path: "/r/gone[1]".into(),
                    node: "gone[] = 1".into(),
                },
                Difference::ChildAdded {
                    parent_path: "/r".into(),
                    path: "/r/fresh[1]".into(),
                    node: "fresh[k=v] = ".into(),
                },
            ]
        );
    }

    #[test]
    fn root_name_mismatch_stops_descent() {
        let c = diff("<a><x/></a>", "<b><y/></b>");
        assert_eq!(c.len(), 1);
        assert!(matches!(&c.differences[0], Difference::NameMismatch { left, right, .. } if left == "a" && right == "b"));
    }

    #[test]
    fn namespaces_only_compared_when_enabled() {
        let left = r#"<r xmlns="urn:one"><a/></r>"#;
        let right = r#"<r xmlns="urn:two"><a/></r>"#;
        assert!(diff(left, right).is_equal());

        let config = CompareConfig {
            compare_namespaces: true,
            ..Default::default()
        };
        let c = run(left, right, &config);
        let paths: Vec<&str> = c.differences.iter().map(Difference::path).collect();
        assert_eq!(paths, ["/r", "/r/a"]);
        assert!(c
            .differences
            .iter()
            .all(|d| matches!(d, Difference::NamespaceMismatch { .. })));
    }

    #[test]
    fn deep_change_reports_full_path() {
        let c = diff(
            "<r><g><item><name>x</name></item><item><name>y</name></item></g></r>",
            "<r><g><item><name>x</name></item><item><name>z</name></item></g></r>",
        );
        assert_eq!(c.len(), 1);
        assert_eq!(c.differences[0].path(), "/r/g/item[1]/name");
    }

    #[test]
    fn max_differences_truncates() {
        let config = CompareConfig {
            max_differences: 2,
            ..Default::default()
        };
        let c = run(
            "<r><a>1</a><b>1</b><c>1</c></r>",
            "<r><a>2</a><b>2</b><c>2</c></r>",
            &config,
        );
        assert_eq!(c.len(), 2);
        assert!(c.truncated);
    }

    #[test]
    fn display_is_human_readable() {
        let c = diff("<r><a>1</a><a>2</a></r>", "<r><a>1</a><a>3</a></r>");
        assert_eq!(c.differences[0].to_string(), r#"/r/a[1]: text differs: "2" vs "3""#);
    }

    #[test]
    fn serializes_with_kind_tag() {
        let c = diff("<r>1</r>", "<r>2</r>");
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["differences"][0]["kind"], "text_mismatch");
        assert_eq!(json["differences"][0]["left_path"], "/r");
        assert_eq!(json["truncated"], false);
    }
}
