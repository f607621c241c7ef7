//! Depth-first, pre-order traversal.

use crate::node::Node;

/// Visit `node`, then each of its descendants in document order.
///
/// The visitor returns `true` to continue. Returning `false` ends the whole
/// traversal at once: no sibling or descendant that has not been visited yet
/// will be. Returns `true` if every node was visited.
pub fn walk<'a, F>(node: Node<'a>, mut visitor: F) -> bool
where
    F: FnMut(Node<'a>) -> bool,
{
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        if !visitor(current) {
            return false;
        }
        stack.extend(current.children().rev());
    }
    true
}
