//! Root-relative node paths.
//!
//! A path is built by walking parent links up to the root and reversing the
//! collected segments. The root contributes `/name`. A node that is its
//! parent's only child also gets a plain `/name` segment; otherwise the
//! segment is `/name[i]` with `i` a zero-based index among all siblings.
//!
//! Two rules choose `i`:
//!
//! - [`Disambiguation::Position`] (used by [`Node::path`]): the node's own
//!   position among its siblings.
//! - [`Disambiguation::Fingerprint`] (used by [`Node::path_by_fingerprint`]):
//!   the index of the first sibling whose fingerprint equals the node's.
//!   Structurally identical siblings, or colliding ones, all report the first
//!   such index, so this form can be ambiguous.
//!
//! Both rules agree whenever siblings have distinct fingerprints.

use crate::node::Node;

/// How same-parent siblings are told apart in a path segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disambiguation {
    /// Index of the node itself among its siblings.
    Position,
    /// Index of the first sibling with an equal fingerprint.
    Fingerprint,
}

/// Path of `node` using the given sibling rule.
pub fn path_with(node: Node<'_>, rule: Disambiguation) -> String {
    let mut segments = Vec::new();
    let mut current = node;

    while let Some(parent) = current.parent() {
        if parent.child_count() == 1 {
            segments.push(format!("/{}", current.name()));
        } else if let Some(index) = sibling_index(current, parent, rule) {
            segments.push(format!("/{}[{}]", current.name(), index));
        }
        current = parent;
    }
    segments.push(format!("/{}", current.name()));

    segments.reverse();
    segments.concat()
}

fn sibling_index(node: Node<'_>, parent: Node<'_>, rule: Disambiguation) -> Option<usize> {
    match rule {
        Disambiguation::Position => parent.children().position(|sibling| sibling == node),
        Disambiguation::Fingerprint => {
            let fingerprint = node.fingerprint();
            parent
                .children()
                .position(|sibling| sibling.fingerprint() == fingerprint)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Document;

    fn paths(xml: &str) -> Vec<String> {
        Document::parse(xml)
            .unwrap()
            .iter()
            .map(|n| n.path())
            .collect()
    }

    fn fingerprint_paths(xml: &str) -> Vec<String> {
        Document::parse(xml)
            .unwrap()
            .iter()
            .map(|n| n.path_by_fingerprint())
            .collect()
    }

    #[test]
    fn root_has_no_index() {
        assert_eq!(paths("<root/>"), ["/root"]);
    }

    #[test]
    fn only_child_has_no_index() {
        assert_eq!(paths("<root><a/></root>"), ["/root", "/root/a"]);
    }

    #[test]
    fn repeated_siblings_are_indexed_by_position() {
        assert_eq!(
            paths("<root><a/><a/></root>"),
            ["/root", "/root/a[0]", "/root/a[1]"],
        );
    }

    #[test]
    fn index_counts_all_siblings_not_just_same_name() {
        assert_eq!(
            paths("<root><x/><item>1</item><item>2</item></root>"),
            ["/root", "/root/x[0]", "/root/item[1]", "/root/item[2]"],
        );
    }

    #[test]
    fn nested_paths_mix_indexed_and_plain_segments() {
        let doc = Document::parse(
            "<root><item><name>x</name></item><item><name>y</name></item></root>",
        )
        .unwrap();
        let names: Vec<String> = doc
            .iter()
            .filter(|n| n.name() == "name")
            .map(|n| n.path())
            .collect();
        assert_eq!(names, ["/root/item[0]/name", "/root/item[1]/name"]);
    }

    #[test]
    fn single_child_never_indexed_even_if_name_repeats_elsewhere() {
        assert_eq!(
            paths("<r><g><a/></g><h><a/><b/></h></r>"),
            ["/r", "/r/g[0]", "/r/g[0]/a", "/r/h[1]", "/r/h[1]/a[0]", "/r/h[1]/b[1]"],
        );
    }

    #[test]
    fn namespace_prefix_is_not_part_of_the_path() {
        assert_eq!(
            paths(r#"<p:root xmlns:p="urn:p"><p:a/></p:root>"#),
            ["/root", "/root/a"],
        );
    }

    #[test]
    fn fingerprint_rule_matches_position_for_distinct_siblings() {
        let xml = "<root><a>1</a><a>2</a><b><c/></b></root>";
        assert_eq!(paths(xml), fingerprint_paths(xml));
    }

    #[test]
    fn fingerprint_rule_reports_first_identical_sibling() {
        assert_eq!(
            fingerprint_paths("<root><a/><b/><a/></root>"),
            ["/root", "/root/a[0]", "/root/b[1]", "/root/a[0]"],
        );
    }

    #[test]
    fn path_with_selects_rule() {
        let doc = Document::parse("<r><a/><a/></r>").unwrap();
        let second = doc.root().children().nth(1).unwrap();
        assert_eq!(path_with(second, Disambiguation::Position), "/r/a[1]");
        assert_eq!(path_with(second, Disambiguation::Fingerprint), "/r/a[0]");
    }
}
