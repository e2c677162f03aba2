//! Error types for node lists and trees.

use thiserror::Error;

use crate::node::NodeId;

/// Errors raised by [`NodeList`](crate::NodeList) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeListError {
    /// Two children of the same parent would share an identifier.
    #[error(
        "tried to insert a node with ID '{id}', but node {existing} already exists with that ID \
         in this list of children; the children of a node must have unique IDs"
    )]
    DuplicateId {
        /// The contested identifier.
        id: String,
        /// The child already registered under that identifier.
        existing: NodeId,
    },

    /// The node is not in the searched range.
    #[error("node {node} is not in the list")]
    NotFound {
        /// The node that was looked up.
        node: NodeId,
    },

    /// Positional access outside `[0, len)`.
    #[error("index {index} out of range for list of length {len}")]
    IndexOutOfRange {
        /// The requested position.
        index: usize,
        /// Length of the list at the time of access.
        len: usize,
    },
}

/// Errors raised by [`NodeTree`](crate::NodeTree) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The handle does not resolve to a live node.
    #[error("stale node handle: {0}")]
    StaleNode(NodeId),

    /// The child already belongs to another parent.
    #[error("node {child} is already attached to {parent}")]
    AlreadyAttached {
        /// The node being attached.
        child: NodeId,
        /// Its current parent.
        parent: NodeId,
    },

    /// Attaching would make a node its own ancestor.
    #[error("attaching {child} under {parent} would create a cycle")]
    Cycle {
        /// The intended parent.
        parent: NodeId,
        /// The node being attached.
        child: NodeId,
    },

    /// Attaching would nest deeper than the configured limit.
    #[error("maximum tree depth ({max_depth}) exceeded")]
    TooDeep {
        /// The configured limit.
        max_depth: usize,
    },

    /// The parent's child list rejected the operation.
    #[error(transparent)]
    List(#[from] NodeListError),
}

/// Result alias for tree operations.
pub type Result<T, E = TreeError> = std::result::Result<T, E>;
