//! Optimistic reorder reconciliation for drag-sortable lists.
//!
//! A user drags an item to a new position; the page shows the new order at
//! once, while an authoritative server decides whether it stands. This crate
//! is the client half of that exchange.
//!
//! # Architecture
//!
//! - **Engine**: owns the drag lifecycle, the single pending move and the lock
//!   of one container. Pure state machine, no I/O.
//! - **Behaviors**: list variants as a strategy trait. [`Base`] is the flat
//!   list; [`Sectioned`] collapses sections during a drag; [`CrossContainer`]
//!   lets items move between sibling containers.
//! - **Hook**: the facade a host talks to, one per mounted container.
//! - **Driver**: runs a hook on a tokio task against a [`ReorderTransport`].
//!
//! ## Move lifecycle
//!
//! 1. **Start**: the drag engine reports a gesture; the origin is recorded.
//! 2. **End**: the new position is described by its neighbors, the container
//!    is locked and a request is issued.
//! 3. **Settle**: the reply unlocks the container. An error reply moves the
//!    item back to its origin.
//!
//! Deletion of the dragged item by another actor cancels the gesture without
//! moving anything; a reply that arrives afterwards is ignored.
//!
//! # Example
//!
//! ```
//! use reorder_dom::{ListDom, MemoryDom};
//! use reorder_engine::drag::mock::MockDrag;
//! use reorder_engine::{DragEnd, DragStart, FlatHook, Reply, SettleOutcome};
//!
//! let mut dom = MemoryDom::new();
//! let (list, items) = dom.build_list("itemId", &["a", "b", "c"]).unwrap();
//! let mut hook = FlatHook::flat(&mut dom, list, MockDrag::new().boxed()).unwrap();
//!
//! hook.drag_started(&mut dom, &DragStart { item: items[0], from: list, old_index: 0 });
//! dom.append_child(list, items[0]).unwrap(); // the drag engine's preview
//! let request = hook
//!     .drag_ended(&mut dom, &DragEnd::within(list, items[0], 0, 2))
//!     .unwrap();
//! assert!(hook.is_locked());
//!
//! let outcome = hook.settle(&mut dom, request.move_id, &Reply::error("stale order"));
//! assert_eq!(outcome, SettleOutcome::Reverted(request.move_id));
//! assert_eq!(dom.dataset_order(list, "itemId"), vec!["a", "b", "c"]);
//! ```

pub mod behavior;
pub mod config;
pub mod cross_container;
pub mod drag;
pub mod driver;
mod engine;
mod error;
mod hook;
pub mod protocol;
pub mod sectioned;
pub mod state;
pub mod timer;
pub mod transport;

pub use behavior::{Base, ReorderBehavior};
pub use config::{CollapseMode, DragOptions, HookConfig, Markers, SectionConfig};
pub use cross_container::CrossContainer;
pub use drag::{DragControl, DragEnd, DragGroup, DragStart};
pub use driver::{DriverHandle, HookCommand, HookDriver, HookEvent};
pub use engine::{ReorderEngine, RequestShape};
pub use error::{HookError, HookResult};
pub use hook::{CrossContainerHook, FlatHook, ReorderHook, SectionedHook, SettleOutcome};
pub use protocol::{PushTarget, ReorderRequest, Reply, Signal};
pub use sectioned::Sectioned;
pub use state::{ContainerState, DragOrigin, DragPhase, PendingMove};
pub use transport::ReorderTransport;
