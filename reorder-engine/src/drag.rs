//! The drag-gesture engine seam.
//!
//! Pointer tracking, ghost rendering and animation belong to a third-party
//! engine. The hook only needs to hear about gesture boundaries and to switch
//! the engine off and on.

use reorder_dom::NodeId;
use serde::{Deserialize, Serialize};

use crate::config::DragOptions;

/// A gesture began on `item`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragStart {
    pub item: NodeId,
    /// The container the item was picked up from.
    pub from: NodeId,
    pub old_index: usize,
}

/// A gesture ended. The engine has already moved `item` to `new_index` in `to`
/// as its visual preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragEnd {
    pub item: NodeId,
    pub from: NodeId,
    pub to: NodeId,
    pub old_index: usize,
    pub new_index: usize,
}

impl DragEnd {
    /// An end event for a move inside one container.
    #[must_use]
    pub fn within(container: NodeId, item: NodeId, old_index: usize, new_index: usize) -> Self {
        Self {
            item,
            from: container,
            to: container,
            old_index,
            new_index,
        }
    }

    /// Returns true if the item changed container.
    #[must_use]
    pub fn crossed(&self) -> bool {
        self.from != self.to
    }
}

/// Lets items be transferred between sibling containers that share a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragGroup {
    pub name: String,
    /// Items may leave containers of this group.
    pub pull: bool,
    /// Items may enter containers of this group.
    pub put: bool,
}

impl DragGroup {
    /// A group whose members freely exchange items.
    pub fn shared(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pull: true,
            put: true,
        }
    }
}

/// Controls exposed by the drag-gesture engine.
pub trait DragControl: Send {
    /// Applies the options the hook mounts with.
    fn configure(&mut self, options: &DragOptions);

    /// Enables or disables dragging for the container.
    fn set_disabled(&mut self, disabled: bool);

    /// Returns whether dragging is disabled.
    fn is_disabled(&self) -> bool;

    /// Joins the container to a transfer group.
    fn set_group(&mut self, group: DragGroup);

    /// Abandons the active gesture, if any.
    ///
    /// Returns `false` when the engine has no explicit cancel, in which case
    /// the caller falls back to toggling `set_disabled`.
    fn cancel(&mut self) -> bool {
        false
    }

    /// Releases the engine.
    fn destroy(&mut self);
}

/// A recording drag engine for tests.
pub mod mock {
    use super::*;
    use std::sync::{Arc, Mutex, MutexGuard};

    /// One call made against a [`MockDrag`].
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum DragCall {
        Configure,
        SetDisabled(bool),
        SetGroup(DragGroup),
        Cancel,
        Destroy,
    }

    #[derive(Debug, Default)]
    struct Inner {
        calls: Vec<DragCall>,
        options: Option<DragOptions>,
        disabled: bool,
        group: Option<DragGroup>,
        destroyed: bool,
    }

    /// A drag engine that records every call.
    ///
    /// Clones share state, so a test can keep one handle while the hook owns
    /// another.
    #[derive(Debug, Clone, Default)]
    pub struct MockDrag {
        inner: Arc<Mutex<Inner>>,
        explicit_cancel: bool,
    }

    impl MockDrag {
        /// Creates an engine without an explicit cancel API.
        pub fn new() -> Self {
            Self::default()
        }

        /// Creates an engine that supports explicit cancellation.
        pub fn with_cancel() -> Self {
            Self {
                explicit_cancel: true,
                ..Self::default()
            }
        }

        /// Boxes a shared handle for handing to a hook.
        pub fn boxed(&self) -> Box<dyn DragControl> {
            Box::new(self.clone())
        }

        /// Every call so far, in order.
        pub fn calls(&self) -> Vec<DragCall> {
            self.lock().calls.clone()
        }

        /// Forgets recorded calls.
        pub fn clear_calls(&self) {
            self.lock().calls.clear();
        }

        /// The options applied at mount.
        pub fn options(&self) -> Option<DragOptions> {
            self.lock().options.clone()
        }

        /// The transfer group, if one was set.
        pub fn group(&self) -> Option<DragGroup> {
            self.lock().group.clone()
        }

        /// Whether `destroy` was called.
        pub fn is_destroyed(&self) -> bool {
            self.lock().destroyed
        }

        fn lock(&self) -> MutexGuard<'_, Inner> {
            self.inner.lock().unwrap_or_else(|e| e.into_inner())
        }
    }

    impl DragControl for MockDrag {
        fn configure(&mut self, options: &DragOptions) {
            let mut inner = self.lock();
            inner.calls.push(DragCall::Configure);
            inner.disabled = options.disabled;
            inner.options = Some(options.clone());
        }

        fn set_disabled(&mut self, disabled: bool) {
            let mut inner = self.lock();
            inner.calls.push(DragCall::SetDisabled(disabled));
            inner.disabled = disabled;
        }

        fn is_disabled(&self) -> bool {
            self.lock().disabled
        }

        fn set_group(&mut self, group: DragGroup) {
            let mut inner = self.lock();
            inner.calls.push(DragCall::SetGroup(group.clone()));
            inner.group = Some(group);
        }

        fn cancel(&mut self) -> bool {
            if !self.explicit_cancel {
                return false;
            }
            self.lock().calls.push(DragCall::Cancel);
            true
        }

        fn destroy(&mut self) {
            let mut inner = self.lock();
            inner.calls.push(DragCall::Destroy);
            inner.destroyed = true;
        }
    }
}
