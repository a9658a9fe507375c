//! Reordering engine: the reconciliation state machine for one container.
//!
//! The engine performs no I/O. A finished gesture becomes a
//! [`ReorderRequest`]; the host delivers it and hands the reply back through
//! [`ReorderEngine::settle`]. Between the two the container is locked and the
//! moved item carries a pending marker.

use reorder_dom::{ListDom, NodeId};
use reorder_types::{ContainerId, ItemId, MoveId, NeighborRef};
use tracing::{debug, info, warn};

use crate::config::{DragOptions, HookConfig, Markers};
use crate::drag::{DragControl, DragEnd, DragStart};
use crate::error::{HookError, HookResult};
use crate::protocol::{PushTarget, ReorderRequest};
use crate::state::{ContainerState, DragOrigin, DragPhase, PendingMove};
use crate::timer::TimerQueue;

/// How a committed move is described on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestShape {
    /// Carry the destination container's id in the payload.
    pub with_destination: bool,
    pub target: PushTarget,
}

impl RequestShape {
    /// Moves inside the hook's own container.
    pub const IN_PLACE: Self = Self {
        with_destination: false,
        target: PushTarget::Element,
    };

    /// Moves that may land in a sibling container.
    pub const CROSS_CONTAINER: Self = Self {
        with_destination: true,
        target: PushTarget::View,
    };
}

/// Drag lifecycle, pending move and lock state of one container.
pub struct ReorderEngine {
    root: NodeId,
    config: HookConfig,
    markers: Markers,
    drag: Box<dyn DragControl>,
    state: ContainerState,
    timers: TimerQueue,
    released: bool,
}

impl ReorderEngine {
    /// Attaches an engine to `root`, configuring the drag engine with
    /// `options`.
    pub fn new(
        root: NodeId,
        config: HookConfig,
        markers: Markers,
        options: &DragOptions,
        mut drag: Box<dyn DragControl>,
    ) -> Self {
        drag.configure(options);
        Self {
            root,
            config,
            markers,
            drag,
            state: ContainerState::new(),
            timers: TimerQueue::new(),
            released: false,
        }
    }

    /// The hook element (the engine's own container).
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn config(&self) -> &HookConfig {
        &self.config
    }

    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    pub fn state(&self) -> &ContainerState {
        &self.state
    }

    pub fn is_locked(&self) -> bool {
        self.state.is_locked()
    }

    pub fn drag_mut(&mut self) -> &mut dyn DragControl {
        self.drag.as_mut()
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    pub fn timers_mut(&mut self) -> &mut TimerQueue {
        &mut self.timers
    }

    // ── Gesture lifecycle ────────────────────────────────────────

    /// Records the restore point for a gesture.
    pub fn begin(&mut self, dom: &mut dyn ListDom, evt: &DragStart) {
        if self.state.is_locked() {
            debug!("Drag started on locked container {}", self.root);
        }
        let item_id = dom
            .dataset(evt.item, &self.config.item_id_attribute)
            .and_then(|raw| ItemId::parse(raw).ok());
        if let Err(e) = dom.add_class(evt.item, &self.markers.dragging) {
            warn!("Failed to mark {} as dragging: {}", evt.item, e);
        }
        debug!(
            "Drag of {} ({:?}) started at index {}",
            evt.item, item_id, evt.old_index
        );
        self.state.set_phase(DragPhase::Dragging(DragOrigin {
            item: evt.item,
            item_id,
            container: evt.from,
            original_index: evt.old_index,
        }));
    }

    /// Closes the gesture and returns the index to reconcile against, or
    /// `None` if the gesture was cancelled by a deletion.
    pub fn conclude(&mut self, dom: &mut dyn ListDom, evt: &DragEnd) -> Option<usize> {
        if let Err(e) = dom.remove_class(evt.item, &self.markers.dragging) {
            debug!("Dragging marker on {} not cleared: {}", evt.item, e);
        }
        match self.state.take_phase() {
            DragPhase::Cancelled { item } if item == evt.item => {
                debug!("Ignoring end of cancelled drag of {}", item);
                None
            }
            DragPhase::Dragging(origin) if origin.item == evt.item => Some(origin.original_index),
            _ => Some(evt.old_index),
        }
    }

    /// Turns a finished gesture into a reorder request.
    ///
    /// Nothing is issued while the container is locked; the item is snapped
    /// back to `original_index` instead, as it is when the page cannot be
    /// described (missing ids, index out of sync).
    pub fn commit(
        &mut self,
        dom: &mut dyn ListDom,
        evt: &DragEnd,
        original_index: usize,
        shape: RequestShape,
    ) -> Option<ReorderRequest> {
        if self.state.is_locked() {
            warn!(
                "Reordering disabled on {}; dropping move of {}",
                self.root, evt.item
            );
            self.snap_back(dom, evt, original_index);
            return None;
        }
        match self.prepare(dom, evt, original_index, shape) {
            Ok(request) => Some(request),
            Err(e) => {
                warn!("Cannot describe move of {}: {}", evt.item, e);
                self.snap_back(dom, evt, original_index);
                None
            }
        }
    }

    fn prepare(
        &mut self,
        dom: &mut dyn ListDom,
        evt: &DragEnd,
        original_index: usize,
        shape: RequestShape,
    ) -> HookResult<ReorderRequest> {
        let children = dom.children(evt.to);
        if children.get(evt.new_index) != Some(&evt.item) {
            return Err(HookError::IndexOutOfSync {
                node: evt.item,
                container: evt.to,
                index: evt.new_index,
            });
        }
        let order = children
            .iter()
            .map(|&child| self.item_id(&*dom, child))
            .collect::<HookResult<Vec<_>>>()?;
        let item_id = order[evt.new_index].clone();
        let neighbors = NeighborRef::at(&order, evt.new_index).unwrap_or_default();
        let destination = if shape.with_destination {
            Some(self.container_id(dom, evt.to)?)
        } else {
            None
        };

        for class in &self.markers.pending {
            dom.add_class(evt.item, class)?;
        }

        let move_id = MoveId::new();
        let request = ReorderRequest::new(
            move_id,
            &self.config,
            shape.target,
            &item_id,
            &neighbors,
            destination.as_ref(),
        );
        info!(
            "Reorder {} issued: {} to index {} of {}",
            move_id, item_id, evt.new_index, evt.to
        );
        self.state.begin_pending(PendingMove {
            id: move_id,
            item: evt.item,
            item_id,
            from: evt.from,
            to: evt.to,
            original_index,
            new_index: evt.new_index,
            neighbors,
        });
        self.drag.set_disabled(true);
        Ok(request)
    }

    fn item_id(&self, dom: &dyn ListDom, node: NodeId) -> HookResult<ItemId> {
        let key = &self.config.item_id_attribute;
        let raw = dom.dataset(node, key).ok_or_else(|| HookError::MissingItemId {
            node,
            key: key.clone(),
        })?;
        Ok(ItemId::parse(raw)?)
    }

    fn container_id(&self, dom: &dyn ListDom, node: NodeId) -> HookResult<ContainerId> {
        let key = &self.config.container_id_attribute;
        let raw = dom
            .dataset(node, key)
            .ok_or_else(|| HookError::MissingContainerId {
                node,
                key: key.clone(),
            })?;
        Ok(ContainerId::parse(raw)?)
    }

    // ── Replies ──────────────────────────────────────────────────

    /// Ends the pending move `move_id`: clears its marker and unlocks.
    ///
    /// Returns `None` for a stale reply (the move was cancelled or superseded),
    /// in which case nothing is touched.
    pub fn settle(&mut self, dom: &mut dyn ListDom, move_id: MoveId) -> Option<PendingMove> {
        let Some(pending) = self.state.take_pending_if(move_id) else {
            debug!("Ignoring stale reply for {}", move_id);
            return None;
        };
        for class in &self.markers.pending {
            if let Err(e) = dom.remove_class(pending.item, class) {
                warn!("Failed to clear pending marker on {}: {}", pending.item, e);
            }
        }
        self.sync_drag_lock();
        Some(pending)
    }

    fn sync_drag_lock(&mut self) {
        let locked = self.state.is_locked();
        self.drag.set_disabled(locked);
    }

    // ── Reversion ────────────────────────────────────────────────

    /// Moves `item` back to `original_index` inside `container`.
    ///
    /// Works whether the item moved forward or backward; returns `false` when
    /// it is already in place.
    pub fn revert_within(
        &self,
        dom: &mut dyn ListDom,
        item: NodeId,
        container: NodeId,
        original_index: usize,
    ) -> HookResult<bool> {
        let children = dom.children(container);
        let current = children
            .iter()
            .position(|&c| c == item)
            .ok_or(HookError::NotInContainer { item, container })?;
        if current == original_index {
            return Ok(false);
        }
        if original_index >= children.len() {
            dom.append_child(container, item)?;
        } else if current < original_index {
            // Moving down: land just after the node now at the target index.
            dom.insert_before(container, item, children.get(original_index + 1).copied())?;
        } else {
            dom.insert_before(container, item, Some(children[original_index]))?;
        }
        debug!(
            "Reverted {} from index {} to {} in {}",
            item, current, original_index, container
        );
        Ok(true)
    }

    /// Moves `item` from `to` back into `from` at `original_index`.
    ///
    /// Refuses if the item is no longer in `to`.
    pub fn revert_across(
        &self,
        dom: &mut dyn ListDom,
        item: NodeId,
        from: NodeId,
        to: NodeId,
        original_index: usize,
    ) -> HookResult<bool> {
        if dom.parent(item) != Some(to) {
            return Err(HookError::NotInContainer {
                item,
                container: to,
            });
        }
        match dom.children(from).get(original_index) {
            Some(&reference) => dom.insert_before(from, item, Some(reference))?,
            None => dom.append_child(from, item)?,
        }
        debug!(
            "Reverted {} from {} back to index {} of {}",
            item, to, original_index, from
        );
        Ok(true)
    }

    /// Restores the gesture's origin without a pending move.
    pub fn snap_back(&self, dom: &mut dyn ListDom, evt: &DragEnd, original_index: usize) {
        let result = if evt.crossed() {
            self.revert_across(dom, evt.item, evt.from, evt.to, original_index)
        } else {
            self.revert_within(dom, evt.item, evt.from, original_index)
        };
        if let Err(e) = result {
            warn!("Snap back of {} failed: {}", evt.item, e);
        }
    }

    // ── Signals ──────────────────────────────────────────────────

    /// Abandons the gesture or pending move of a deleted item.
    ///
    /// The item is gone, so nothing is moved; in-flight references are
    /// dropped and a later reply for the move becomes stale. Returns false if
    /// `deleted` is not the item being dragged.
    pub fn force_cancel(&mut self, deleted: &ItemId) -> bool {
        let dragging = match self.state.phase() {
            DragPhase::Dragging(origin) if origin.item_id.as_ref() == Some(deleted) => {
                Some(origin.item)
            }
            _ => None,
        };
        let pending = self
            .state
            .pending()
            .is_some_and(|pending| &pending.item_id == deleted);
        if dragging.is_none() && !pending {
            return false;
        }

        if let Some(item) = dragging {
            self.state.set_phase(DragPhase::Cancelled { item });
        }
        if pending {
            self.state.discard_pending();
        }
        if !self.drag.cancel() {
            self.drag.set_disabled(true);
        }
        self.sync_drag_lock();
        info!("Cancelled drag of deleted item {} in {}", deleted, self.root);
        true
    }

    /// Applies a connectivity change.
    pub fn set_online(&mut self, dom: &mut dyn ListDom, online: bool) {
        self.state.set_offline(!online);
        self.sync_drag_lock();
        let marker = &self.markers.offline;
        let result = if online {
            dom.remove_class(self.root, marker)
        } else {
            dom.add_class(self.root, marker)
        };
        if let Err(e) = result {
            warn!("Failed to update offline marker on {}: {}", self.root, e);
        }
        info!(
            "Container {} is {}",
            self.root,
            if online { "online" } else { "offline" }
        );
    }

    // ── Teardown ─────────────────────────────────────────────────

    /// Releases the drag engine and drops pending timers and moves.
    pub fn release(&mut self) {
        self.timers.clear();
        self.state.set_phase(DragPhase::Idle);
        self.state.discard_pending();
        if !self.released {
            self.drag.destroy();
            self.released = true;
            debug!("Released drag engine on {}", self.root);
        }
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}
