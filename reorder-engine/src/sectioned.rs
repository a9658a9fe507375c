//! Sectioned list: collapses every section while a drag is in progress.
//!
//! Collapsing is purely visual. The wrapped variant computes neighbors,
//! payloads and lock state exactly as it would without sections.

use reorder_dom::{DomResult, ListDom, NodeId};
use tracing::{debug, warn};

use crate::behavior::{Base, ReorderBehavior};
use crate::config::{CollapseMode, SectionConfig};
use crate::drag::{DragEnd, DragStart};
use crate::engine::{ReorderEngine, RequestShape};
use crate::protocol::ReorderRequest;
use crate::state::PendingMove;
use crate::timer::TimerId;

/// Attribute holding a section's natural height while it is collapsed.
pub const ORIGINAL_HEIGHT_ATTR: &str = "data-original-height";

/// Wraps a variant with section collapse/expand around each drag.
pub struct Sectioned<B = Base> {
    inner: B,
    sections: SectionConfig,
    cleanup: Vec<TimerId>,
    // Nodes collapsed by the current drag; they may have left the root.
    collapsed: Vec<NodeId>,
    rotated: Vec<NodeId>,
}

impl Sectioned<Base> {
    /// Sectioned flat list.
    pub fn new(sections: SectionConfig) -> Self {
        Self::wrap(Base, sections)
    }
}

impl<B: ReorderBehavior> Sectioned<B> {
    /// Wraps `inner`.
    pub fn wrap(inner: B, sections: SectionConfig) -> Self {
        Self {
            inner,
            sections,
            cleanup: Vec::new(),
            collapsed: Vec::new(),
            rotated: Vec::new(),
        }
    }

    pub fn sections(&self) -> &SectionConfig {
        &self.sections
    }

    fn collapse_all(&mut self, engine: &mut ReorderEngine, dom: &mut dyn ListDom) {
        // A restore still waiting to clean up would wipe the new collapse.
        for id in self.cleanup.drain(..) {
            engine.timers_mut().cancel(id);
        }
        let root = engine.root();
        let contents = dom.query_id_prefix(root, &self.sections.content_prefix);
        for &content in &contents {
            if let Err(e) = self.collapse(dom, content) {
                warn!("Failed to collapse section {}: {}", content, e);
            }
        }
        let icons = dom.query_id_prefix(root, &self.sections.icon_prefix);
        for &icon in &icons {
            if let Err(e) = self.rotate_icon(dom, icon) {
                warn!("Failed to rotate toggle icon {}: {}", icon, e);
            }
        }
        debug!("Collapsed {} sections in {}", contents.len(), root);
        self.collapsed = contents;
        self.rotated = icons;
    }

    fn collapse(&self, dom: &mut dyn ListDom, content: NodeId) -> DomResult<()> {
        match self.sections.mode {
            CollapseMode::Animated => {
                let height = dom.scroll_height(content);
                dom.set_attribute(content, ORIGINAL_HEIGHT_ATTR, &height.to_string())?;
                dom.set_style(content, "transition", &self.transition("max-height, opacity"))?;
                dom.set_style(content, "overflow", "hidden")?;
                // Pin the start height so the transition runs from it.
                dom.set_style(content, "max-height", &format!("{height}px"))?;
                dom.set_style(content, "max-height", "0px")?;
                dom.set_style(content, "opacity", "0")
            }
            CollapseMode::Instant => dom.set_style(content, "display", "none"),
        }
    }

    fn rotate_icon(&self, dom: &mut dyn ListDom, icon: NodeId) -> DomResult<()> {
        if self.sections.mode == CollapseMode::Animated {
            dom.set_style(icon, "transition", &self.transition("transform"))?;
        }
        dom.add_class(icon, &self.sections.collapsed_icon_class)
    }

    fn expand_all(&mut self, engine: &mut ReorderEngine, dom: &mut dyn ListDom) {
        let root = engine.root();
        let contents = with_current(
            std::mem::take(&mut self.collapsed),
            dom.query_id_prefix(root, &self.sections.content_prefix),
        );
        let icons = with_current(
            std::mem::take(&mut self.rotated),
            dom.query_id_prefix(root, &self.sections.icon_prefix),
        );

        for &content in &contents {
            if let Err(e) = self.expand(dom, content) {
                warn!("Failed to expand section {}: {}", content, e);
            }
        }
        for &icon in &icons {
            if let Err(e) = dom.remove_class(icon, &self.sections.collapsed_icon_class) {
                warn!("Failed to reset toggle icon {}: {}", icon, e);
            }
        }
        debug!("Expanded {} sections in {}", contents.len(), root);

        if self.sections.mode == CollapseMode::Instant {
            return;
        }
        let id = engine.timers_mut().schedule(
            self.sections.transition,
            Box::new(move |dom: &mut dyn ListDom| {
                for &content in &contents {
                    if let Err(e) = clear_section(dom, content) {
                        warn!("Failed to clean up section {}: {}", content, e);
                    }
                }
                for &icon in &icons {
                    if let Err(e) = dom.set_style(icon, "transition", "") {
                        warn!("Failed to clean up toggle icon {}: {}", icon, e);
                    }
                }
                Ok(())
            }),
        );
        self.cleanup.push(id);
    }

    fn expand(&self, dom: &mut dyn ListDom, content: NodeId) -> DomResult<()> {
        match self.sections.mode {
            CollapseMode::Animated => {
                let max_height = dom
                    .attribute(content, ORIGINAL_HEIGHT_ATTR)
                    .map_or_else(|| "none".to_string(), |h| format!("{h}px"));
                dom.set_style(content, "max-height", &max_height)?;
                dom.set_style(content, "opacity", "1")
            }
            CollapseMode::Instant => dom.set_style(content, "display", ""),
        }
    }

    fn transition(&self, properties: &str) -> String {
        let ms = self.sections.transition.as_millis();
        properties
            .split(", ")
            .map(|p| format!("{p} {ms}ms ease-in-out"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Nodes collapsed at drag start plus any now under the root.
fn with_current(mut recorded: Vec<NodeId>, current: Vec<NodeId>) -> Vec<NodeId> {
    for node in current {
        if !recorded.contains(&node) {
            recorded.push(node);
        }
    }
    recorded
}

/// Drops the inline styles and stored height left by a collapse.
fn clear_section(dom: &mut dyn ListDom, content: NodeId) -> DomResult<()> {
    for property in ["transition", "overflow", "max-height", "opacity"] {
        dom.set_style(content, property, "")?;
    }
    dom.remove_attribute(content, ORIGINAL_HEIGHT_ATTR)
}

impl<B: ReorderBehavior> ReorderBehavior for Sectioned<B> {
    fn mount(&mut self, engine: &mut ReorderEngine, dom: &mut dyn ListDom) {
        self.inner.mount(engine, dom);
    }

    fn request_shape(&self) -> RequestShape {
        self.inner.request_shape()
    }

    fn start(&mut self, engine: &mut ReorderEngine, dom: &mut dyn ListDom, evt: &DragStart) {
        self.inner.start(engine, dom, evt);
        self.collapse_all(engine, dom);
    }

    fn end(
        &mut self,
        engine: &mut ReorderEngine,
        dom: &mut dyn ListDom,
        evt: &DragEnd,
        shape: RequestShape,
    ) -> Option<ReorderRequest> {
        let request = self.inner.end(engine, dom, evt, shape);
        self.expand_all(engine, dom);
        request
    }

    fn revert(
        &mut self,
        engine: &mut ReorderEngine,
        dom: &mut dyn ListDom,
        pending: &PendingMove,
    ) -> bool {
        self.inner.revert(engine, dom, pending)
    }

    fn teardown(&mut self, engine: &mut ReorderEngine, dom: &mut dyn ListDom) {
        self.cleanup.clear();
        self.collapsed.clear();
        self.rotated.clear();
        self.inner.teardown(engine, dom);
    }
}
