//! Render-tree seam for the reordering core.
//!
//! The surrounding page owns every element; the reordering engine only reads
//! child order and element attributes, toggles a few classes and inline
//! styles, and repositions an item with `insert_before`. [`ListDom`] is exactly
//! that surface, so the engine can run against a browser binding or against
//! [`MemoryDom`] in tests and headless hosts.
//!
//! # Semantics
//!
//! - Order is defined purely by child position; there is no index field.
//! - `insert_before` has move semantics: a node that is already attached is
//!   detached from its old parent first.
//! - Detached nodes keep their attributes, so an element removed by a
//!   concurrent render can still be inspected.

mod error;
mod memory;
mod tree;

pub use error::{DomError, DomResult};
pub use memory::MemoryDom;
pub use tree::{dataset_attribute, ListDom, NodeId};
