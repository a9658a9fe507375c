//! The [`ListDom`] trait and node handles.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::DomResult;

/// Handle to an element in a render tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Creates a handle from a raw index.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw index.
    #[must_use]
    pub const fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Maps a dataset key to its attribute name (`itemId` -> `data-item-id`).
#[must_use]
pub fn dataset_attribute(key: &str) -> String {
    let mut name = String::with_capacity(key.len() + 8);
    name.push_str("data-");
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            name.push('-');
            name.push(c.to_ascii_lowercase());
        } else {
            name.push(c);
        }
    }
    name
}

/// The slice of a render tree the reordering engine is allowed to touch.
pub trait ListDom {
    /// Returns true if the handle belongs to this tree (attached or not).
    fn contains(&self, node: NodeId) -> bool;

    /// Returns the node's children in order.
    fn children(&self, parent: NodeId) -> Vec<NodeId>;

    /// Returns the node's parent, if attached.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Reads an attribute.
    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    /// Writes an attribute.
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> DomResult<()>;

    /// Removes an attribute. Missing attributes are ignored.
    fn remove_attribute(&mut self, node: NodeId, name: &str) -> DomResult<()>;

    /// Returns true if the node carries the class.
    fn has_class(&self, node: NodeId, class: &str) -> bool;

    /// Adds a class. Adding a class twice is a no-op.
    fn add_class(&mut self, node: NodeId, class: &str) -> DomResult<()>;

    /// Removes a class. Missing classes are ignored.
    fn remove_class(&mut self, node: NodeId, class: &str) -> DomResult<()>;

    /// Reads an inline style property.
    fn style(&self, node: NodeId, property: &str) -> Option<String>;

    /// Writes an inline style property. An empty value clears it.
    fn set_style(&mut self, node: NodeId, property: &str, value: &str) -> DomResult<()>;

    /// The node's natural content height in pixels.
    fn scroll_height(&self, node: NodeId) -> u32;

    /// Returns every descendant of `root` whose `id` attribute starts with
    /// `prefix`, in document order.
    fn query_id_prefix(&self, root: NodeId, prefix: &str) -> Vec<NodeId>;

    /// Inserts `node` under `parent` before `reference`, or at the end when
    /// `reference` is `None`. An attached node is moved, not copied.
    fn insert_before(
        &mut self,
        parent: NodeId,
        node: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<()>;

    /// Detaches a node from its parent.
    fn remove(&mut self, node: NodeId) -> DomResult<()>;

    /// Appends `node` as the last child of `parent`.
    fn append_child(&mut self, parent: NodeId, node: NodeId) -> DomResult<()> {
        self.insert_before(parent, node, None)
    }

    /// Reads a dataset entry by its camelCase key.
    fn dataset(&self, node: NodeId, key: &str) -> Option<String> {
        self.attribute(node, &dataset_attribute(key))
    }

    /// Returns the node's position among its parent's children.
    fn index_in_parent(&self, node: NodeId) -> Option<usize> {
        let parent = self.parent(node)?;
        self.children(parent).iter().position(|&c| c == node)
    }
}
