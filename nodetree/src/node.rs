//! Node handles.

/// Handle to a node stored in a [`NodeTree`](crate::NodeTree).
///
/// A handle is a slot index plus the generation of that slot. Slots are
/// reused after a node is destroyed, but the generation moves forward on
/// every reuse, so a handle to a destroyed node never resolves to the node
/// that took its place.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index of this handle.
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Generation of the slot when this handle was issued.
    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}:{}", self.index, self.generation)
    }
}
