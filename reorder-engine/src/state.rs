//! Per-container reorder state.
//!
//! A container is in at most one drag phase and holds at most one pending
//! move. Both are explicit values created and destroyed at well-defined
//! transitions rather than loose fields.

use reorder_dom::NodeId;
use reorder_types::{ItemId, MoveId, NeighborRef};

/// Restore point recorded when a gesture starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragOrigin {
    pub item: NodeId,
    /// Read at start so a later deletion can be matched even if the element is
    /// already gone from the page.
    pub item_id: Option<ItemId>,
    pub container: NodeId,
    pub original_index: usize,
}

/// Where the active gesture stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging(DragOrigin),
    /// The dragged item was deleted mid-gesture; its end event is swallowed.
    Cancelled { item: NodeId },
}

/// An unconfirmed reorder awaiting the server's reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMove {
    pub id: MoveId,
    pub item: NodeId,
    pub item_id: ItemId,
    /// Originating container.
    pub from: NodeId,
    /// Destination container (equal to `from` for in-place moves).
    pub to: NodeId,
    pub original_index: usize,
    pub new_index: usize,
    pub neighbors: NeighborRef,
}

impl PendingMove {
    /// Returns true if the move changed container.
    #[must_use]
    pub fn crossed(&self) -> bool {
        self.from != self.to
    }
}

/// Reorder state of one container.
#[derive(Debug, Clone, Default)]
pub struct ContainerState {
    phase: DragPhase,
    pending: Option<PendingMove>,
    offline: bool,
}

impl ContainerState {
    /// Creates idle, online state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether reordering is disabled: while a move is pending, or while
    /// connectivity is lost.
    pub fn is_locked(&self) -> bool {
        self.pending.is_some() || self.offline
    }

    pub fn is_offline(&self) -> bool {
        self.offline
    }

    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    pub fn phase(&self) -> &DragPhase {
        &self.phase
    }

    pub fn set_phase(&mut self, phase: DragPhase) {
        self.phase = phase;
    }

    /// Ends the gesture, returning the phase it was in.
    pub fn take_phase(&mut self) -> DragPhase {
        std::mem::take(&mut self.phase)
    }

    pub fn pending(&self) -> Option<&PendingMove> {
        self.pending.as_ref()
    }

    /// Records a new pending move. Callers must check `is_locked` first.
    pub fn begin_pending(&mut self, pending: PendingMove) {
        debug_assert!(self.pending.is_none(), "second pending move in one container");
        self.pending = Some(pending);
    }

    /// Removes the pending move if `id` is still the current one.
    pub fn take_pending_if(&mut self, id: MoveId) -> Option<PendingMove> {
        match &self.pending {
            Some(pending) if pending.id == id => self.pending.take(),
            _ => None,
        }
    }

    /// Drops the pending move unconditionally.
    pub fn discard_pending(&mut self) -> Option<PendingMove> {
        self.pending.take()
    }
}
