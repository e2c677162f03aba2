//! Lookups over the descendants of a node.

use crate::node::NodeId;
use crate::tree::NodeTree;
use crate::widget::Widget;

/// Depth-first, pre-order iterator over the nodes below a root.
///
/// The root itself is not yielded. Siblings come out in child order.
pub struct Descendants<'a, W> {
    tree: &'a NodeTree<W>,
    stack: Vec<NodeId>,
}

impl<W> Iterator for Descendants<'_, W> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let Some(children) = self.tree.children(node) {
            self.stack.extend(children.iter_rev());
        }
        Some(node)
    }
}

/// Iterate over every node below `root`.
pub fn descendants<W>(tree: &NodeTree<W>, root: NodeId) -> Descendants<'_, W> {
    let stack = tree
        .children(root)
        .map(|children| children.iter_rev().collect())
        .unwrap_or_default();
    Descendants { tree, stack }
}

/// Find the first node below `root` whose identifier is `id`.
///
/// Each level is checked through its id index before the search descends
/// into the children of that level.
pub fn query_id<W>(tree: &NodeTree<W>, root: NodeId, id: &str) -> Option<NodeId> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        let Some(children) = tree.children(node) else {
            continue;
        };
        if let Some(found) = children.get_by_id(id) {
            return Some(found);
        }
        stack.extend(children.iter_rev());
    }
    None
}

/// All nodes below `root` whose widget has the given type name.
pub fn query_name<W: Widget>(tree: &NodeTree<W>, root: NodeId, name: &str) -> Vec<NodeId> {
    descendants(tree, root)
        .filter(|&node| tree.widget(node).is_some_and(|widget| widget.name() == name))
        .collect()
}
