//! Arena-backed in-memory render tree.

use std::collections::BTreeMap;
use tracing::trace;

use crate::tree::dataset_attribute;
use crate::{DomError, DomResult, ListDom, NodeId};

/// A single element in the arena.
#[derive(Debug, Clone, Default)]
struct Element {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attributes: BTreeMap<String, String>,
    /// Kept in insertion order, like `classList`.
    classes: Vec<String>,
    style: BTreeMap<String, String>,
    scroll_height: u32,
}

/// In-memory [`ListDom`] implementation.
///
/// Nodes are never freed; `remove` only detaches them, matching how a browser
/// element object outlives its removal from the document.
#[derive(Debug, Clone, Default)]
pub struct MemoryDom {
    nodes: Vec<Element>,
}

impl MemoryDom {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a detached element.
    pub fn create_element(&mut self, tag: impl Into<String>) -> NodeId {
        let id = NodeId::from_raw(self.nodes.len() as u32);
        self.nodes.push(Element {
            tag: tag.into(),
            ..Element::default()
        });
        id
    }

    /// Creates an element and appends it to `parent`.
    pub fn create_child(&mut self, parent: NodeId, tag: impl Into<String>) -> DomResult<NodeId> {
        let node = self.create_element(tag);
        self.append_child(parent, node)?;
        Ok(node)
    }

    /// Builds a container element holding one item per id, each carrying the
    /// id under the given dataset key. Returns the container and its items.
    pub fn build_list<S: AsRef<str>>(
        &mut self,
        dataset_key: &str,
        ids: &[S],
    ) -> DomResult<(NodeId, Vec<NodeId>)> {
        let container = self.create_element("ul");
        let mut items = Vec::with_capacity(ids.len());
        for id in ids {
            let item = self.create_child(container, "li")?;
            self.set_dataset(item, dataset_key, id.as_ref())?;
            items.push(item);
        }
        Ok((container, items))
    }

    /// Writes a dataset entry by its camelCase key.
    pub fn set_dataset(&mut self, node: NodeId, key: &str, value: &str) -> DomResult<()> {
        self.set_attribute(node, &dataset_attribute(key), value)
    }

    /// Sets the natural content height reported by `scroll_height`.
    pub fn set_scroll_height(&mut self, node: NodeId, height: u32) -> DomResult<()> {
        self.element_mut(node)?.scroll_height = height;
        Ok(())
    }

    /// Returns the element's tag name.
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node.raw() as usize).map(|e| e.tag.as_str())
    }

    /// Returns the dataset values of `parent`'s children, in order. Children
    /// without the key are skipped.
    pub fn dataset_order(&self, parent: NodeId, key: &str) -> Vec<String> {
        self.children(parent)
            .into_iter()
            .filter_map(|c| self.dataset(c, key))
            .collect()
    }

    /// Returns the element's classes in insertion order.
    pub fn classes(&self, node: NodeId) -> Vec<String> {
        self.element(node)
            .map(|e| e.classes.clone())
            .unwrap_or_default()
    }

    /// Number of elements ever created.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if no element was ever created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn element(&self, node: NodeId) -> DomResult<&Element> {
        self.nodes
            .get(node.raw() as usize)
            .ok_or(DomError::UnknownNode(node))
    }

    fn element_mut(&mut self, node: NodeId) -> DomResult<&mut Element> {
        self.nodes
            .get_mut(node.raw() as usize)
            .ok_or(DomError::UnknownNode(node))
    }

    fn is_ancestor_or_self(&self, candidate: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == candidate {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    fn detach(&mut self, node: NodeId) -> DomResult<()> {
        if let Some(parent) = self.element(node)?.parent {
            let siblings = &mut self.element_mut(parent)?.children;
            siblings.retain(|&c| c != node);
            self.element_mut(node)?.parent = None;
        }
        Ok(())
    }

    fn collect_id_prefix(&self, node: NodeId, prefix: &str, out: &mut Vec<NodeId>) {
        let Ok(element) = self.element(node) else {
            return;
        };
        for &child in &element.children {
            if self
                .attribute(child, "id")
                .is_some_and(|id| id.starts_with(prefix))
            {
                out.push(child);
            }
            self.collect_id_prefix(child, prefix, out);
        }
    }
}

impl ListDom for MemoryDom {
    fn contains(&self, node: NodeId) -> bool {
        (node.raw() as usize) < self.nodes.len()
    }

    fn children(&self, parent: NodeId) -> Vec<NodeId> {
        self.element(parent)
            .map(|e| e.children.clone())
            .unwrap_or_default()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.element(node).ok().and_then(|e| e.parent)
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.element(node).ok()?.attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> DomResult<()> {
        self.element_mut(node)?
            .attributes
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) -> DomResult<()> {
        self.element_mut(node)?.attributes.remove(name);
        Ok(())
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .map(|e| e.classes.iter().any(|c| c == class))
            .unwrap_or(false)
    }

    fn add_class(&mut self, node: NodeId, class: &str) -> DomResult<()> {
        let element = self.element_mut(node)?;
        if !element.classes.iter().any(|c| c == class) {
            element.classes.push(class.to_string());
        }
        Ok(())
    }

    fn remove_class(&mut self, node: NodeId, class: &str) -> DomResult<()> {
        self.element_mut(node)?.classes.retain(|c| c != class);
        Ok(())
    }

    fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.element(node).ok()?.style.get(property).cloned()
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) -> DomResult<()> {
        let style = &mut self.element_mut(node)?.style;
        if value.is_empty() {
            style.remove(property);
        } else {
            style.insert(property.to_string(), value.to_string());
        }
        Ok(())
    }

    fn scroll_height(&self, node: NodeId) -> u32 {
        self.element(node).map(|e| e.scroll_height).unwrap_or(0)
    }

    fn query_id_prefix(&self, root: NodeId, prefix: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_id_prefix(root, prefix, &mut out);
        out
    }

    fn insert_before(
        &mut self,
        parent: NodeId,
        node: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<()> {
        self.element(parent)?;
        self.element(node)?;
        if self.is_ancestor_or_self(node, parent) {
            return Err(DomError::WouldCycle { parent, node });
        }
        if let Some(reference) = reference {
            if self.parent(reference) != Some(parent) {
                return Err(DomError::NotAChild {
                    parent,
                    node: reference,
                });
            }
            if reference == node {
                return Ok(());
            }
        }

        self.detach(node)?;
        let siblings = &mut self.element_mut(parent)?.children;
        let at = match reference {
            Some(reference) => siblings
                .iter()
                .position(|&c| c == reference)
                .unwrap_or(siblings.len()),
            None => siblings.len(),
        };
        siblings.insert(at, node);
        self.element_mut(node)?.parent = Some(parent);
        trace!("inserted {} under {} at {}", node, parent, at);
        Ok(())
    }

    fn remove(&mut self, node: NodeId) -> DomResult<()> {
        self.detach(node)
    }
}
