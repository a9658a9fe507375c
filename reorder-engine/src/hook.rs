//! The hook attached to one mounted list element.
//!
//! [`ReorderHook`] is what a host talks to: it forwards gesture boundaries to
//! the list variant, hands replies and inbound events to the engine, runs
//! deferred work and tears everything down when the element goes away.

use reorder_dom::{ListDom, NodeId};
use reorder_types::MoveId;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::behavior::{Base, ReorderBehavior};
use crate::config::{DragOptions, HookConfig, Markers, SectionConfig};
use crate::cross_container::CrossContainer;
use crate::drag::{DragControl, DragEnd, DragStart};
use crate::engine::ReorderEngine;
use crate::error::HookResult;
use crate::protocol::{ReorderRequest, Reply, Signal};
use crate::sectioned::Sectioned;
use crate::state::{ContainerState, PendingMove};

/// What a reply did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleOutcome {
    /// The move was accepted and stays.
    Committed(MoveId),
    /// The move was rejected and the item was put back.
    Reverted(MoveId),
    /// The move was rejected but the item was no longer where the move left
    /// it, so it was not touched.
    RevertSkipped(MoveId),
    /// The reply no longer matched the pending move and was ignored.
    Stale(MoveId),
}

/// A flat list.
pub type FlatHook = ReorderHook<Base>;
/// A list whose items are grouped under collapsible sections.
pub type SectionedHook = ReorderHook<Sectioned>;
/// A list that exchanges items with sibling containers.
pub type CrossContainerHook = ReorderHook<CrossContainer>;

/// A reorder hook mounted on one container.
pub struct ReorderHook<B: ReorderBehavior = Base> {
    engine: ReorderEngine,
    behavior: B,
    destroyed: bool,
}

impl FlatHook {
    /// Mounts a flat list hook, reading overrides from the element.
    pub fn flat(
        dom: &mut dyn ListDom,
        root: NodeId,
        drag: Box<dyn DragControl>,
    ) -> HookResult<Self> {
        Self::mount(dom, root, HookConfig::flat(), drag, Base)
    }
}

impl SectionedHook {
    /// Mounts a sectioned list hook.
    pub fn sectioned(
        dom: &mut dyn ListDom,
        root: NodeId,
        drag: Box<dyn DragControl>,
        sections: SectionConfig,
    ) -> HookResult<Self> {
        Self::mount(dom, root, HookConfig::flat(), drag, Sectioned::new(sections))
    }
}

impl CrossContainerHook {
    /// Mounts a cross-container hook in the default transfer group.
    pub fn cross_container(
        dom: &mut dyn ListDom,
        root: NodeId,
        drag: Box<dyn DragControl>,
    ) -> HookResult<Self> {
        Self::mount(
            dom,
            root,
            HookConfig::cross_container(),
            drag,
            CrossContainer::default(),
        )
    }
}

impl<B: ReorderBehavior> ReorderHook<B> {
    /// Mounts `behavior` on `root` with default markers and drag options.
    /// `defaults` is overlaid with the element's dataset.
    pub fn mount(
        dom: &mut dyn ListDom,
        root: NodeId,
        defaults: HookConfig,
        drag: Box<dyn DragControl>,
        behavior: B,
    ) -> HookResult<Self> {
        Self::mount_with(
            dom,
            root,
            defaults,
            Markers::default(),
            &DragOptions::default(),
            drag,
            behavior,
        )
    }

    /// Mounts with explicit markers and drag options.
    pub fn mount_with(
        dom: &mut dyn ListDom,
        root: NodeId,
        defaults: HookConfig,
        markers: Markers,
        options: &DragOptions,
        drag: Box<dyn DragControl>,
        mut behavior: B,
    ) -> HookResult<Self> {
        let config = defaults.read_from(dom, root)?;
        let mut engine = ReorderEngine::new(root, config, markers, options, drag);
        behavior.mount(&mut engine, dom);
        info!("Mounted reorder hook on {}", root);
        Ok(Self {
            engine,
            behavior,
            destroyed: false,
        })
    }

    // ── Accessors ────────────────────────────────────────────────

    pub fn root(&self) -> NodeId {
        self.engine.root()
    }

    pub fn config(&self) -> &HookConfig {
        self.engine.config()
    }

    pub fn behavior(&self) -> &B {
        &self.behavior
    }

    pub fn state(&self) -> &ContainerState {
        self.engine.state()
    }

    /// Whether reordering is currently disabled for the container.
    pub fn is_locked(&self) -> bool {
        self.engine.is_locked()
    }

    pub fn is_offline(&self) -> bool {
        self.engine.state().is_offline()
    }

    /// The in-flight move, if any.
    pub fn pending(&self) -> Option<&PendingMove> {
        self.engine.state().pending()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    // ── Gestures ─────────────────────────────────────────────────

    /// The drag engine reported a gesture start.
    pub fn drag_started(&mut self, dom: &mut dyn ListDom, evt: &DragStart) {
        if self.destroyed {
            debug!("Drag start on destroyed hook {}", self.root());
            return;
        }
        self.behavior.start(&mut self.engine, dom, evt);
    }

    /// The drag engine reported a gesture end. Returns the request to deliver,
    /// if any.
    pub fn drag_ended(&mut self, dom: &mut dyn ListDom, evt: &DragEnd) -> Option<ReorderRequest> {
        if self.destroyed {
            debug!("Drag end on destroyed hook {}", self.root());
            return None;
        }
        let shape = self.behavior.request_shape();
        self.behavior.end(&mut self.engine, dom, evt, shape)
    }

    // ── Replies ──────────────────────────────────────────────────

    /// Processes the reply to request `move_id`.
    pub fn settle(&mut self, dom: &mut dyn ListDom, move_id: MoveId, reply: &Reply) -> SettleOutcome {
        let Some(pending) = self.engine.settle(dom, move_id) else {
            return SettleOutcome::Stale(move_id);
        };
        match reply {
            Reply::Ok => {
                info!("Reorder {} committed", move_id);
                SettleOutcome::Committed(move_id)
            }
            Reply::Error(error) => {
                warn!("Reorder {} rejected: {}", move_id, error);
                if self.behavior.revert(&mut self.engine, dom, &pending) {
                    SettleOutcome::Reverted(move_id)
                } else {
                    SettleOutcome::RevertSkipped(move_id)
                }
            }
        }
    }

    /// Processes a raw reply value.
    pub fn settle_value(&mut self, dom: &mut dyn ListDom, move_id: MoveId, reply: &Value) -> SettleOutcome {
        self.settle(dom, move_id, &Reply::from_value(reply))
    }

    // ── Inbound events ───────────────────────────────────────────

    /// Handles a named inbound event. Returns the signal it carried, if the
    /// hook recognised one.
    pub fn handle_event(&mut self, dom: &mut dyn ListDom, name: &str, payload: &Value) -> Option<Signal> {
        let signal = Signal::from_event(self.engine.config(), name, payload)?;
        self.apply_signal(dom, &signal);
        Some(signal)
    }

    /// Applies a signal. Returns false for a deletion that did not concern
    /// the dragged item.
    pub fn apply_signal(&mut self, dom: &mut dyn ListDom, signal: &Signal) -> bool {
        if self.destroyed {
            return false;
        }
        match signal {
            Signal::Disconnected => {
                self.engine.set_online(dom, false);
                true
            }
            Signal::Reconnected => {
                self.engine.set_online(dom, true);
                true
            }
            Signal::ItemDeleted(id) => self.engine.force_cancel(id),
        }
    }

    // ── Timers ───────────────────────────────────────────────────

    /// Advances the hook's clock, running deferred work that became due.
    pub fn advance(&mut self, dom: &mut dyn ListDom, elapsed: Duration) {
        for task in self.engine.timers_mut().advance(elapsed) {
            if let Err(e) = task(&mut *dom) {
                warn!("Deferred task on {} failed: {}", self.engine.root(), e);
            }
        }
    }

    /// Time until deferred work is next due.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.engine.timers().next_deadline()
    }

    // ── Teardown ─────────────────────────────────────────────────

    /// Releases the drag engine and pending timers. Safe to call more than
    /// once and before any drag.
    pub fn destroy(&mut self, dom: &mut dyn ListDom) {
        if self.destroyed {
            return;
        }
        self.behavior.teardown(&mut self.engine, dom);
        self.destroyed = true;
        info!("Destroyed reorder hook on {}", self.engine.root());
    }
}
