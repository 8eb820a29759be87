//! Mutation-tolerant tree traversal.
//!
//! Visitors are allowed to detach or replace the node they are handed. Both
//! walkers capture the next-sibling id before visiting a child, so removing
//! the current node never derails the walk; nodes inserted behind the cursor
//! are not revisited.

use crate::dom::{Document, NodeId};

/// Pre-order walk over `root` and its descendants, invoking `visitor` for
/// every element node (text and comments are walked through but not
/// visited).
pub fn traverse_elements<F>(doc: &mut Document, root: NodeId, visitor: &mut F)
where
    F: FnMut(&mut Document, NodeId),
{
    if doc.is_element(root) {
        visitor(doc, root);
    }
    let mut child = doc.first_child(root);
    while let Some(current) = child {
        // captured before the visit so removal of `current` is safe
        let next = doc.next_sibling(current);
        traverse_elements(doc, current, visitor);
        child = next;
    }
}

/// Visits the direct children of `parent` (all node kinds), tolerating
/// removal or replacement of the visited child.
pub fn traverse_child_nodes<F>(doc: &mut Document, parent: NodeId, visitor: &mut F)
where
    F: FnMut(&mut Document, NodeId),
{
    let mut child = doc.first_child(parent);
    while let Some(current) = child {
        let next = doc.next_sibling(current);
        visitor(doc, current);
        child = next;
    }
}
