use crate::dom::Document;
use crate::types::NodeId;

/// Pre-order walk over the descendants of a node (the node itself excluded), in document order.
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl<'a> Descendants<'a> {
    pub(crate) fn new(doc: &'a Document, from: NodeId) -> Self {
        let mut stack: Vec<NodeId> = doc.children(from).to_vec();
        stack.reverse();
        Self { doc, stack }
    }
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        // Children are pushed reversed so the first child is visited next.
        self.stack.extend(self.doc.children(id).iter().rev().copied());
        Some(id)
    }
}

/// Walk from a node's parent element up towards the root, stopping before the document node.
pub struct AncestorElements<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl<'a> AncestorElements<'a> {
    pub(crate) fn new(doc: &'a Document, from: NodeId) -> Self {
        Self {
            doc,
            next: doc.parent_element(from),
        }
    }
}

impl Iterator for AncestorElements<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.doc.parent_element(id);
        Some(id)
    }
}
