//! The strategy seam between the engine and its list variants.
//!
//! A variant decides what happens at each lifecycle step and may wrap another
//! variant, calling through to it. The flat list is [`Base`]; the sectioned and
//! cross-container variants wrap a `Base` by default.

use reorder_dom::ListDom;
use tracing::warn;

use crate::drag::{DragEnd, DragStart};
use crate::engine::{ReorderEngine, RequestShape};
use crate::protocol::ReorderRequest;
use crate::state::PendingMove;

/// Lifecycle capabilities every list variant provides.
pub trait ReorderBehavior: Send {
    /// Called once when the hook is mounted.
    fn mount(&mut self, _engine: &mut ReorderEngine, _dom: &mut dyn ListDom) {}

    /// How this variant describes committed moves on the wire. Wrappers that
    /// do not change the description forward their inner variant's shape.
    fn request_shape(&self) -> RequestShape {
        RequestShape::IN_PLACE
    }

    /// A gesture started.
    fn start(&mut self, engine: &mut ReorderEngine, dom: &mut dyn ListDom, evt: &DragStart);

    /// A gesture ended. Returns the request to send, if the move needs one.
    ///
    /// `shape` is the outermost variant's [`request_shape`]; wrappers pass it
    /// through unchanged so every layer sees the end of the gesture.
    ///
    /// [`request_shape`]: ReorderBehavior::request_shape
    fn end(
        &mut self,
        engine: &mut ReorderEngine,
        dom: &mut dyn ListDom,
        evt: &DragEnd,
        shape: RequestShape,
    ) -> Option<ReorderRequest>;

    /// Restores a rejected move. Returns false if the item could not be put
    /// back at its origin.
    fn revert(
        &mut self,
        engine: &mut ReorderEngine,
        dom: &mut dyn ListDom,
        pending: &PendingMove,
    ) -> bool;

    /// Releases everything the variant holds.
    fn teardown(&mut self, engine: &mut ReorderEngine, dom: &mut dyn ListDom);
}

/// The flat, single-container list.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base;

impl ReorderBehavior for Base {
    fn start(&mut self, engine: &mut ReorderEngine, dom: &mut dyn ListDom, evt: &DragStart) {
        engine.begin(dom, evt);
    }

    fn end(
        &mut self,
        engine: &mut ReorderEngine,
        dom: &mut dyn ListDom,
        evt: &DragEnd,
        shape: RequestShape,
    ) -> Option<ReorderRequest> {
        let original_index = engine.conclude(dom, evt)?;
        if evt.crossed() {
            // A transfer can only be described relative to its destination.
            if !shape.with_destination {
                warn!("List {} received a drop from another container", engine.root());
                engine.snap_back(dom, evt, original_index);
                return None;
            }
        } else if evt.new_index == original_index {
            return None;
        }
        engine.commit(dom, evt, original_index, shape)
    }

    fn revert(
        &mut self,
        engine: &mut ReorderEngine,
        dom: &mut dyn ListDom,
        pending: &PendingMove,
    ) -> bool {
        match engine.revert_within(dom, pending.item, pending.from, pending.original_index) {
            Ok(_) => true,
            Err(e) => {
                warn!("Revert of {} skipped: {}", pending.id, e);
                false
            }
        }
    }

    fn teardown(&mut self, engine: &mut ReorderEngine, _dom: &mut dyn ListDom) {
        engine.release();
    }
}
