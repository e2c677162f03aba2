//! Resolution of node handles for change propagation.

use crate::node::NodeId;

/// Resolves handles on behalf of a [`NodeList`](crate::NodeList).
///
/// A list only stores handles. Whenever it needs to know something about a
/// node (who its parent is, what its sort key is, whether it still exists)
/// or needs to bump another list's version, it asks the registry that owns
/// the nodes.
pub trait Registry {
    /// Whether `node` still resolves to a live node.
    fn is_alive(&self, node: NodeId) -> bool;

    /// Parent of `node`. `None` at the root or when `node` is gone.
    fn parent_of(&self, node: NodeId) -> Option<NodeId>;

    /// Default sort key of `node`.
    fn sort_order(&self, node: NodeId) -> i64;

    /// Bump the version of the child list owned by `node`.
    fn mark_updated(&mut self, node: NodeId);
}

/// A registry that knows no nodes.
///
/// Lists mutated through `Detached` only bump their own version, and
/// default-key sorts see every child with key `0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Detached;

impl Registry for Detached {
    fn is_alive(&self, _node: NodeId) -> bool {
        false
    }

    fn parent_of(&self, _node: NodeId) -> Option<NodeId> {
        None
    }

    fn sort_order(&self, _node: NodeId) -> i64 {
        0
    }

    fn mark_updated(&mut self, _node: NodeId) {}
}
