//! Cross-container list: items may be dropped into sibling containers.
//!
//! Each container runs its own hook. The hook of the container an item was
//! picked up from handles the end of the gesture, describes the drop relative
//! to the destination container and, on rejection, moves the item back home.

use reorder_dom::ListDom;
use tracing::{debug, warn};

use crate::behavior::{Base, ReorderBehavior};
use crate::drag::{DragEnd, DragGroup, DragStart};
use crate::engine::{ReorderEngine, RequestShape};
use crate::protocol::ReorderRequest;
use crate::state::PendingMove;

/// Default name of the transfer group shared by sibling containers.
pub const DEFAULT_GROUP: &str = "envelopes";

/// Wraps a variant with drag transfer between sibling containers.
pub struct CrossContainer<B = Base> {
    inner: B,
    group: DragGroup,
}

impl CrossContainer<Base> {
    /// Cross-container flat list in `group`.
    pub fn new(group: DragGroup) -> Self {
        Self::wrap(Base, group)
    }
}

impl Default for CrossContainer<Base> {
    fn default() -> Self {
        Self::new(DragGroup::shared(DEFAULT_GROUP))
    }
}

impl<B: ReorderBehavior> CrossContainer<B> {
    /// Wraps `inner`.
    pub fn wrap(inner: B, group: DragGroup) -> Self {
        Self { inner, group }
    }

    pub fn group(&self) -> &DragGroup {
        &self.group
    }
}

impl<B: ReorderBehavior> ReorderBehavior for CrossContainer<B> {
    fn mount(&mut self, engine: &mut ReorderEngine, dom: &mut dyn ListDom) {
        self.inner.mount(engine, dom);
        engine.drag_mut().set_group(self.group.clone());
        debug!("Container {} joined group {:?}", engine.root(), self.group.name);
    }

    fn request_shape(&self) -> RequestShape {
        RequestShape::CROSS_CONTAINER
    }

    fn start(&mut self, engine: &mut ReorderEngine, dom: &mut dyn ListDom, evt: &DragStart) {
        self.inner.start(engine, dom, evt);
    }

    fn end(
        &mut self,
        engine: &mut ReorderEngine,
        dom: &mut dyn ListDom,
        evt: &DragEnd,
        shape: RequestShape,
    ) -> Option<ReorderRequest> {
        self.inner.end(engine, dom, evt, shape)
    }

    fn revert(
        &mut self,
        engine: &mut ReorderEngine,
        dom: &mut dyn ListDom,
        pending: &PendingMove,
    ) -> bool {
        if !pending.crossed() {
            return self.inner.revert(engine, dom, pending);
        }
        match engine.revert_across(
            dom,
            pending.item,
            pending.from,
            pending.to,
            pending.original_index,
        ) {
            Ok(_) => true,
            Err(e) => {
                warn!("Cross-container revert of {} skipped: {}", pending.id, e);
                false
            }
        }
    }

    fn teardown(&mut self, engine: &mut ReorderEngine, dom: &mut dyn ListDom) {
        self.inner.teardown(engine, dom);
    }
}
