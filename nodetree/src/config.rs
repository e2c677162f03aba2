//! Tree configuration.

/// Construction-time settings for a [`NodeTree`](crate::NodeTree).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeConfig {
    /// Node slots to allocate up front.
    pub capacity: usize,

    /// Deepest level a node may be attached at (the root is depth 0).
    /// None = unlimited.
    pub max_depth: Option<usize>,
}

impl TreeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preallocate room for `capacity` nodes.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Reject attachments that would place a node deeper than `max_depth`.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}
