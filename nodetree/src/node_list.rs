//! The ordered child list owned by every node.

use std::collections::{HashMap, HashSet};
use std::ops::{Bound, RangeBounds};

use crate::error::NodeListError;
use crate::node::NodeId;
use crate::registry::Registry;

/// The direct children of one node.
///
/// Children keep their insertion order (until sorted), but each node can
/// appear at most once, which makes the list behave like an ordered set.
/// Children that declare an identifier are also indexed by it, and no two
/// children may share one.
///
/// Every structural change bumps [`version`](Self::version) and the
/// versions of all lists owned by the ancestors of this list's owner, so
/// caches further up the tree can tell that something below them moved.
#[derive(Debug, Default)]
pub struct NodeList {
    /// The node that owns this list. Never kept alive by the list.
    parent: Option<NodeId>,
    nodes: Vec<NodeId>,
    nodes_set: HashSet<NodeId>,
    /// Only children that declare an identifier are in here.
    nodes_by_id: HashMap<String, NodeId>,
    updates: u64,
}

impl NodeList {
    /// Create an empty list owned by `parent`.
    pub fn new(parent: Option<NodeId>) -> Self {
        Self {
            parent,
            ..Default::default()
        }
    }

    /// The node owning this list.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Number of structural changes made to this list or below it.
    pub fn version(&self) -> u64 {
        self.updates
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes_set.contains(&node)
    }

    /// Position of `node` within `[start, stop)`.
    ///
    /// Bounds past the end are clamped to the length of the list.
    pub fn index_of(
        &self,
        node: NodeId,
        start: usize,
        stop: usize,
    ) -> Result<usize, NodeListError> {
        let stop = stop.min(self.nodes.len());
        let start = start.min(stop);
        if !self.contains(node) {
            return Err(NodeListError::NotFound { node });
        }
        self.nodes[start..stop]
            .iter()
            .position(|&n| n == node)
            .map(|i| i + start)
            .ok_or(NodeListError::NotFound { node })
    }

    /// Position of `node` anywhere in the list.
    pub fn position(&self, node: NodeId) -> Result<usize, NodeListError> {
        self.index_of(node, 0, usize::MAX)
    }

    /// The child registered under `id`, if any.
    pub fn get_by_id(&self, id: &str) -> Option<NodeId> {
        self.nodes_by_id.get(id).copied()
    }

    pub fn get(&self, index: usize) -> Result<NodeId, NodeListError> {
        self.nodes
            .get(index)
            .copied()
            .ok_or(NodeListError::IndexOutOfRange {
                index,
                len: self.nodes.len(),
            })
    }

    /// Copy the children in `range` into a new vector.
    ///
    /// Like list slicing, out-of-range bounds are clamped and an inverted
    /// range yields an empty vector.
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Vec<NodeId> {
        let len = self.nodes.len();
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.saturating_add(1),
            Bound::Unbounded => 0,
        }
        .min(len);
        let end = match range.end_bound() {
            Bound::Included(&e) => e.saturating_add(1),
            Bound::Excluded(&e) => e,
            Bound::Unbounded => len,
        }
        .min(len);
        if start >= end {
            return Vec::new();
        }
        self.nodes[start..end].to_vec()
    }

    pub fn first(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    pub fn last(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }

    /// Iterate over the children in order.
    ///
    /// The iterator borrows the list, so the order cannot change while it
    /// is alive. Use [`to_vec`](Self::to_vec) to walk the children while
    /// mutating the list.
    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, NodeId>> {
        self.nodes.iter().copied()
    }

    /// Iterate over the children in reverse order.
    pub fn iter_rev(&self) -> std::iter::Rev<std::iter::Copied<std::slice::Iter<'_, NodeId>>> {
        self.iter().rev()
    }

    /// Snapshot of the children in their current order.
    pub fn to_vec(&self) -> Vec<NodeId> {
        self.nodes.clone()
    }

    /// Append `node` at the end of the list.
    ///
    /// Returns `Ok(false)` without changing anything if `node` is already a
    /// child. If `widget_id` is taken by another child the list is left
    /// untouched and [`NodeListError::DuplicateId`] is returned.
    pub fn append<R: Registry>(
        &mut self,
        node: NodeId,
        widget_id: Option<&str>,
        registry: &mut R,
    ) -> Result<bool, NodeListError> {
        self.link(self.nodes.len(), node, widget_id, registry)
    }

    /// Insert `node` before position `index`.
    ///
    /// An index past the end appends. Otherwise behaves like
    /// [`append`](Self::append).
    pub fn insert<R: Registry>(
        &mut self,
        index: usize,
        node: NodeId,
        widget_id: Option<&str>,
        registry: &mut R,
    ) -> Result<bool, NodeListError> {
        self.link(index, node, widget_id, registry)
    }

    fn link<R: Registry>(
        &mut self,
        index: usize,
        node: NodeId,
        widget_id: Option<&str>,
        registry: &mut R,
    ) -> Result<bool, NodeListError> {
        if self.nodes_set.contains(&node) {
            return Ok(false);
        }
        // Nothing is linked until the id is known to be free.
        if let Some(id) = widget_id {
            self.ensure_unique_id(id)?;
        }

        let index = index.min(self.nodes.len());
        self.nodes.insert(index, node);
        self.nodes_set.insert(node);
        if let Some(id) = widget_id {
            self.nodes_by_id.insert(id.to_string(), node);
        }
        self.updated(registry);
        Ok(true)
    }

    fn ensure_unique_id(&self, id: &str) -> Result<(), NodeListError> {
        match self.nodes_by_id.get(id) {
            Some(&existing) => Err(NodeListError::DuplicateId {
                id: id.to_string(),
                existing,
            }),
            None => Ok(()),
        }
    }

    /// Re-register `node` under a new identifier.
    ///
    /// Returns `Ok(false)` if `node` is not a child. A new identifier held
    /// by another child is refused with [`NodeListError::DuplicateId`] and
    /// nothing changes. A successful rename counts as an update.
    pub fn rename<R: Registry>(
        &mut self,
        node: NodeId,
        widget_id: Option<&str>,
        registry: &mut R,
    ) -> Result<bool, NodeListError> {
        if !self.nodes_set.contains(&node) {
            return Ok(false);
        }
        match widget_id {
            Some(id) if self.nodes_by_id.get(id) == Some(&node) => return Ok(false),
            Some(id) => self.ensure_unique_id(id)?,
            None if !self.nodes_by_id.values().any(|&n| n == node) => return Ok(false),
            None => {}
        }

        self.nodes_by_id.retain(|_, n| *n != node);
        if let Some(id) = widget_id {
            self.nodes_by_id.insert(id.to_string(), node);
        }
        self.updated(registry);
        Ok(true)
    }

    /// Remove `node` from the list.
    ///
    /// Removing a node that is not a child does nothing and returns false.
    pub fn remove<R: Registry>(&mut self, node: NodeId, registry: &mut R) -> bool {
        if !self.nodes_set.remove(&node) {
            return false;
        }
        if let Some(index) = self.nodes.iter().position(|&n| n == node) {
            self.nodes.remove(index);
        }
        self.nodes_by_id.retain(|_, n| *n != node);
        self.updated(registry);
        true
    }

    /// Remove every child. Returns false if the list was already empty.
    pub fn clear<R: Registry>(&mut self, registry: &mut R) -> bool {
        if self.nodes.is_empty() {
            return false;
        }
        self.nodes.clear();
        self.nodes_set.clear();
        self.nodes_by_id.clear();
        self.updated(registry);
        true
    }

    /// Stable sort by each child's [`Registry::sort_order`].
    pub fn sort<R: Registry>(&mut self, registry: &mut R, reverse: bool) {
        self.sort_by_key(registry, |registry, node| registry.sort_order(node), reverse);
    }

    /// Stable sort by a key computed once per child.
    ///
    /// Children with equal keys keep their relative order, in both
    /// directions. The list counts as updated even if nothing moved.
    pub fn sort_by_key<R, K, F>(&mut self, registry: &mut R, mut key: F, reverse: bool)
    where
        R: Registry,
        K: Ord,
        F: FnMut(&R, NodeId) -> K,
    {
        let view: &R = registry;
        let mut keyed: Vec<(K, NodeId)> = self
            .nodes
            .iter()
            .map(|&node| (key(view, node), node))
            .collect();
        if reverse {
            keyed.sort_by(|a, b| b.0.cmp(&a.0));
        } else {
            keyed.sort_by(|a, b| a.0.cmp(&b.0));
        }
        self.nodes = keyed.into_iter().map(|(_, node)| node).collect();
        self.updated(registry);
    }

    /// Bump the version without walking up. Used for ancestors reached by
    /// another list's propagation.
    pub(crate) fn mark_updated(&mut self) {
        self.updates += 1;
    }

    /// Record a structural change here and in every ancestor's list.
    pub fn updated<R: Registry>(&mut self, registry: &mut R) {
        self.updates += 1;

        let Some(owner) = self.parent.filter(|&p| registry.is_alive(p)) else {
            return;
        };
        let mut touched = 0usize;
        let mut node = registry.parent_of(owner);
        while let Some(ancestor) = node {
            registry.mark_updated(ancestor);
            touched += 1;
            node = registry.parent_of(ancestor);
        }
        log::trace!(
            "children of {owner} updated (version {}), {touched} ancestors marked",
            self.updates
        );
    }
}

impl<'a> IntoIterator for &'a NodeList {
    type Item = NodeId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, NodeId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Detached;

    /// Parent links and versions kept in plain maps.
    #[derive(Default)]
    struct Links {
        parents: HashMap<NodeId, NodeId>,
        alive: HashSet<NodeId>,
        marked: HashMap<NodeId, u64>,
    }

    impl Registry for Links {
        fn is_alive(&self, node: NodeId) -> bool {
            self.alive.contains(&node)
        }

        fn parent_of(&self, node: NodeId) -> Option<NodeId> {
            self.parents.get(&node).copied().filter(|p| self.alive.contains(p))
        }

        fn sort_order(&self, node: NodeId) -> i64 {
            -(node.index() as i64)
        }

        fn mark_updated(&mut self, node: NodeId) {
            *self.marked.entry(node).or_default() += 1;
        }
    }

    fn id(index: u32) -> NodeId {
        NodeId::new(index, 1)
    }

    #[test]
    fn test_indexes_stay_in_sync() {
        let mut list = NodeList::new(None);
        list.append(id(1), Some("a"), &mut Detached).unwrap();
        list.append(id(2), None, &mut Detached).unwrap();
        list.insert(0, id(3), Some("c"), &mut Detached).unwrap();
        list.remove(id(1), &mut Detached);

        assert_eq!(list.nodes.len(), list.nodes_set.len());
        assert!(list.nodes.iter().all(|n| list.nodes_set.contains(n)));
        assert_eq!(list.nodes_by_id.len(), 1);
        assert_eq!(list.nodes_by_id.get("c"), Some(&id(3)));
    }

    #[test]
    fn test_failed_append_leaves_no_trace() {
        let mut list = NodeList::new(None);
        list.append(id(1), Some("x"), &mut Detached).unwrap();

        let err = list.append(id(2), Some("x"), &mut Detached).unwrap_err();
        assert_eq!(
            err,
            NodeListError::DuplicateId {
                id: "x".to_string(),
                existing: id(1),
            }
        );
        assert!(!list.nodes_set.contains(&id(2)));
        assert_eq!(list.nodes, vec![id(1)]);
        assert_eq!(list.version(), 1);
    }

    #[test]
    fn test_rename_swaps_index_entry() {
        let mut list = NodeList::new(None);
        list.append(id(1), Some("a"), &mut Detached).unwrap();
        list.append(id(2), Some("b"), &mut Detached).unwrap();

        assert_eq!(list.rename(id(1), Some("c"), &mut Detached), Ok(true));
        assert_eq!(list.nodes_by_id.len(), 2);
        assert_eq!(list.nodes_by_id.get("c"), Some(&id(1)));
        assert!(!list.nodes_by_id.contains_key("a"));
        assert_eq!(list.version(), 3);

        let err = list.rename(id(1), Some("b"), &mut Detached).unwrap_err();
        assert!(matches!(err, NodeListError::DuplicateId { .. }));
        assert_eq!(list.nodes_by_id.get("c"), Some(&id(1)));
        assert_eq!(list.version(), 3);

        assert_eq!(list.rename(id(1), None, &mut Detached), Ok(true));
        assert_eq!(list.nodes_by_id.len(), 1);
        assert_eq!(list.rename(id(9), Some("z"), &mut Detached), Ok(false));
    }

    #[test]
    fn test_propagation_walks_registry_chain() {
        let mut links = Links::default();
        // 10 -> 20 -> 30, list owned by 30
        links.alive.extend([id(10), id(20), id(30)]);
        links.parents.insert(id(30), id(20));
        links.parents.insert(id(20), id(10));

        let mut list = NodeList::new(Some(id(30)));
        list.append(id(40), None, &mut links).unwrap();

        assert_eq!(list.version(), 1);
        assert_eq!(links.marked.get(&id(20)), Some(&1));
        assert_eq!(links.marked.get(&id(10)), Some(&1));
        assert_eq!(links.marked.get(&id(30)), None);
    }

    #[test]
    fn test_dead_owner_stops_propagation() {
        let mut links = Links::default();
        links.alive.insert(id(10));
        links.parents.insert(id(30), id(10));

        let mut list = NodeList::new(Some(id(30)));
        list.append(id(40), None, &mut links).unwrap();

        assert_eq!(list.version(), 1);
        assert!(links.marked.is_empty());
    }

    #[test]
    fn test_sort_uses_registry_sort_order() {
        let mut links = Links::default();
        let mut list = NodeList::new(None);
        for i in 1..=3 {
            list.append(id(i), None, &mut links).unwrap();
        }
        list.sort(&mut links, false);
        assert_eq!(list.to_vec(), vec![id(3), id(2), id(1)]);
    }
}
