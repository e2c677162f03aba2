//! Arena owning every node of a widget tree.

use crate::config::TreeConfig;
use crate::error::{Result, TreeError};
use crate::node::NodeId;
use crate::node_list::NodeList;
use crate::registry::Registry;
use crate::widget::Widget;

#[derive(Debug)]
struct Entry<W> {
    widget: W,
    parent: Option<NodeId>,
    children: NodeList,
}

#[derive(Debug)]
struct Slot<W> {
    generation: u32,
    entry: Option<Entry<W>>,
}

/// A tree of widgets addressed by [`NodeId`].
///
/// Nodes live in slots owned by the tree. Each node owns a [`NodeList`] of
/// its children and refers to its parent by handle only, so parent links
/// never keep anything alive and a destroyed parent simply stops resolving.
///
/// All child-management goes through the tree; it checks the handles and
/// then hands the work to the parent's list, passing itself along as the
/// [`Registry`] used for change propagation.
#[derive(Debug)]
pub struct NodeTree<W> {
    slots: Vec<Slot<W>>,
    free: Vec<u32>,
    len: usize,
    config: TreeConfig,
}

impl<W> Default for NodeTree<W> {
    fn default() -> Self {
        Self::with_config(TreeConfig::default())
    }
}

impl<W> NodeTree<W> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            slots: Vec::with_capacity(config.capacity),
            free: Vec::new(),
            len: 0,
            config,
        }
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether `node` resolves to a live node.
    pub fn contains(&self, node: NodeId) -> bool {
        self.entry(node).is_some()
    }

    fn entry(&self, node: NodeId) -> Option<&Entry<W>> {
        self.slots
            .get(node.index() as usize)
            .filter(|slot| slot.generation == node.generation())
            .and_then(|slot| slot.entry.as_ref())
    }

    fn entry_mut(&mut self, node: NodeId) -> Option<&mut Entry<W>> {
        self.slots
            .get_mut(node.index() as usize)
            .filter(|slot| slot.generation == node.generation())
            .and_then(|slot| slot.entry.as_mut())
    }

    fn resolve(&self, node: NodeId) -> Result<&Entry<W>> {
        self.entry(node).ok_or(TreeError::StaleNode(node))
    }

    pub fn widget(&self, node: NodeId) -> Option<&W> {
        self.entry(node).map(|entry| &entry.widget)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.entry(node).and_then(|entry| entry.parent)
    }

    pub fn children(&self, node: NodeId) -> Option<&NodeList> {
        self.entry(node).map(|entry| &entry.children)
    }

    /// Version of the child list owned by `node`.
    pub fn version(&self, node: NodeId) -> Option<u64> {
        self.children(node).map(NodeList::version)
    }

    /// Walk from the parent of `node` up to its root.
    pub fn ancestors(&self, node: NodeId) -> Ancestors<'_, W> {
        Ancestors {
            tree: self,
            next: self.parent(node),
        }
    }

    /// Number of ancestors of `node`. Roots are at depth 0.
    pub fn depth(&self, node: NodeId) -> usize {
        self.ancestors(node).count()
    }

    /// Levels below `node` in its deepest branch. Leaves have height 0.
    pub fn height(&self, node: NodeId) -> usize {
        let mut height = 0;
        let mut stack = vec![(node, 0usize)];
        while let Some((next, level)) = stack.pop() {
            height = height.max(level);
            if let Some(children) = self.children(next) {
                stack.extend(children.iter().map(|child| (child, level + 1)));
            }
        }
        height
    }

    /// Live nodes without a parent.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.entry
                .as_ref()
                .filter(|entry| entry.parent.is_none())
                .map(|_| NodeId::new(index as u32, slot.generation))
        })
    }

    /// Add a detached node to the tree.
    pub fn insert(&mut self, widget: W) -> NodeId {
        let index = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.generation = slot.generation.wrapping_add(1);
                index
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    entry: None,
                });
                (self.slots.len() - 1) as u32
            }
        };
        let slot = &mut self.slots[index as usize];
        let id = NodeId::new(index, slot.generation);
        slot.entry = Some(Entry {
            widget,
            parent: None,
            children: NodeList::new(Some(id)),
        });
        self.len += 1;
        log::debug!("inserted node {id}");
        id
    }

    /// Run `f` on the child list of `parent` with the tree free for use as
    /// the list's registry.
    ///
    /// The list is moved out of its slot for the duration of `f`. The owner
    /// itself is never reached by its own list's propagation, so nothing
    /// observes the placeholder.
    fn with_children<T>(
        &mut self,
        parent: NodeId,
        f: impl FnOnce(&mut NodeList, &mut Self) -> T,
    ) -> Result<T> {
        let entry = self.entry_mut(parent).ok_or(TreeError::StaleNode(parent))?;
        let mut children = std::mem::take(&mut entry.children);
        let out = f(&mut children, self);
        if let Some(entry) = self.entry_mut(parent) {
            entry.children = children;
        }
        Ok(out)
    }
}

impl<W: Widget> NodeTree<W> {
    /// Attach `child` as the last child of `parent`.
    ///
    /// Returns `Ok(false)` if `child` is already a child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<bool> {
        self.attach(parent, None, child)
    }

    /// Attach `child` before position `index` of `parent`'s children.
    ///
    /// An index past the end appends.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) -> Result<bool> {
        self.attach(parent, Some(index), child)
    }

    fn attach(&mut self, parent: NodeId, index: Option<usize>, child: NodeId) -> Result<bool> {
        self.resolve(parent)?;
        let entry = self.resolve(child)?;

        if entry.parent == Some(parent) {
            return Ok(false);
        }
        if let Some(current) = entry.parent {
            log::warn!("refusing to attach {child} to {parent}: already under {current}");
            return Err(TreeError::AlreadyAttached {
                child,
                parent: current,
            });
        }
        if child == parent || self.ancestors(parent).any(|ancestor| ancestor == child) {
            log::warn!("refusing to attach {child} to {parent}: cycle");
            return Err(TreeError::Cycle { parent, child });
        }
        let too_deep = |max: usize| self.depth(parent) + 1 + self.height(child) > max;
        if let Some(max_depth) = self.config.max_depth.filter(|&max| too_deep(max)) {
            log::warn!("refusing to attach {child} to {parent}: deeper than {max_depth}");
            return Err(TreeError::TooDeep { max_depth });
        }

        let widget_id = entry.widget.id().map(str::to_owned);
        let linked = self
            .with_children(parent, |children, tree| match index {
                Some(index) => children.insert(index, child, widget_id.as_deref(), tree),
                None => children.append(child, widget_id.as_deref(), tree),
            })?
            .inspect_err(|err| log::warn!("refusing to attach {child} to {parent}: {err}"))?;

        if linked {
            if let Some(entry) = self.entry_mut(child) {
                entry.parent = Some(parent);
            }
            log::debug!("attached {child} to {parent}");
        }
        Ok(linked)
    }

    /// Edit a widget in place.
    ///
    /// If `f` changes the identifier of an attached widget, the parent's id
    /// index follows it. When the new identifier is already taken by a
    /// sibling the old identifier is put back (other edits made by `f`
    /// stay) and [`NodeListError::DuplicateId`](crate::NodeListError) is
    /// returned.
    pub fn update_widget<T>(&mut self, node: NodeId, f: impl FnOnce(&mut W) -> T) -> Result<T> {
        let entry = self.entry_mut(node).ok_or(TreeError::StaleNode(node))?;
        let before = entry.widget.id().map(str::to_owned);
        let out = f(&mut entry.widget);
        let after = entry.widget.id().map(str::to_owned);
        let Some(parent) = entry.parent.filter(|_| before != after) else {
            return Ok(out);
        };

        let renamed = self.with_children(parent, |children, tree| {
            children.rename(node, after.as_deref(), tree)
        })?;
        if let Err(err) = renamed {
            if let Some(entry) = self.entry_mut(node) {
                entry.widget.set_id(before);
            }
            log::warn!("refusing to rename {node} under {parent}: {err}");
            return Err(err.into());
        }
        log::debug!("renamed {node} under {parent}");
        Ok(out)
    }

    /// Change the identifier of `node`, keeping its parent's index in step.
    pub fn set_id(&mut self, node: NodeId, id: Option<String>) -> Result<()> {
        self.update_widget(node, |widget| widget.set_id(id))
    }

    /// Detach `child` from `parent`.
    ///
    /// Returns `Ok(false)` if `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<bool> {
        let removed = self.with_children(parent, |children, tree| children.remove(child, tree))?;
        if removed {
            if let Some(entry) = self.entry_mut(child) {
                entry.parent = None;
            }
            log::debug!("detached {child} from {parent}");
        }
        Ok(removed)
    }

    /// Detach `node` from whatever parent it has.
    pub fn detach(&mut self, node: NodeId) -> Result<bool> {
        match self.resolve(node)?.parent {
            Some(parent) => self.remove_child(parent, node),
            None => Ok(false),
        }
    }

    /// Detach every child of `parent` in one step.
    pub fn clear_children(&mut self, parent: NodeId) -> Result<bool> {
        let former = self.resolve(parent)?.children.to_vec();
        let cleared = self.with_children(parent, |children, tree| children.clear(tree))?;
        for child in former {
            if let Some(entry) = self.entry_mut(child) {
                entry.parent = None;
            }
        }
        if cleared {
            log::debug!("cleared children of {parent}");
        }
        Ok(cleared)
    }

    /// Stable sort of `parent`'s children by [`Widget::sort_order`].
    pub fn sort_children(&mut self, parent: NodeId, reverse: bool) -> Result<()> {
        self.with_children(parent, |children, tree| children.sort(tree, reverse))
    }

    /// Stable sort of `parent`'s children by a key read from each widget.
    pub fn sort_children_by_key<K, F>(
        &mut self,
        parent: NodeId,
        mut key: F,
        reverse: bool,
    ) -> Result<()>
    where
        K: Ord,
        F: FnMut(&W) -> K,
    {
        self.with_children(parent, |children, tree| {
            children.sort_by_key(tree, |tree, node| tree.widget(node).map(&mut key), reverse)
        })
    }

    /// Detach `node` and free it along with its whole subtree.
    ///
    /// Handles to any of the freed nodes stop resolving.
    pub fn destroy(&mut self, node: NodeId) -> Result<()> {
        self.detach(node)?;

        let mut doomed = vec![node];
        let mut freed = 0usize;
        while let Some(next) = doomed.pop() {
            if !self.contains(next) {
                continue;
            }
            let Some(entry) = self
                .slots
                .get_mut(next.index() as usize)
                .and_then(|slot| slot.entry.take())
            else {
                continue;
            };
            doomed.extend(entry.children.iter());
            self.free.push(next.index());
            self.len -= 1;
            freed += 1;
        }
        log::debug!("destroyed {node} ({freed} nodes freed)");
        Ok(())
    }
}

impl<W: Widget> Registry for NodeTree<W> {
    fn is_alive(&self, node: NodeId) -> bool {
        self.contains(node)
    }

    fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.parent(node)
    }

    fn sort_order(&self, node: NodeId) -> i64 {
        self.widget(node).map_or(0, Widget::sort_order)
    }

    fn mark_updated(&mut self, node: NodeId) {
        if let Some(entry) = self.entry_mut(node) {
            entry.children.mark_updated();
        }
    }
}

/// Iterator over the ancestors of a node, nearest first.
pub struct Ancestors<'a, W> {
    tree: &'a NodeTree<W>,
    next: Option<NodeId>,
}

impl<W> Iterator for Ancestors<'_, W> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = self.tree.parent(node);
        Some(node)
    }
}
