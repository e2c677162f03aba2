//! The widget side of a node: the attributes a child list needs.

/// What a node list reads from the widgets it holds.
///
/// Only the identifier and the sort key matter to the tree. Everything
/// else about a widget (styling, layout, rendering) lives elsewhere.
pub trait Widget {
    /// Identifier unique among siblings, if the widget declares one.
    fn id(&self) -> Option<&str>;

    /// Replace the identifier. The tree calls this to roll back a rename
    /// that the parent's list refused.
    fn set_id(&mut self, id: Option<String>);

    /// Default sort key used by [`NodeTree::sort_children`](crate::NodeTree::sort_children).
    fn sort_order(&self) -> i64 {
        0
    }

    /// Type name used by name queries.
    fn name(&self) -> &str {
        "widget"
    }
}

/// A plain widget carrying just the attributes the tree cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub id: Option<String>,
    pub sort_order: i64,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    // Identity
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn sort_order(mut self, sort_order: i64) -> Self {
        self.sort_order = sort_order;
        self
    }
}

impl Widget for Element {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: Option<String>) {
        self.id = id;
    }

    fn sort_order(&self) -> i64 {
        self.sort_order
    }

    fn name(&self) -> &str {
        &self.name
    }
}
