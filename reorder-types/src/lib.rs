//! Core type definitions for optimistic list reordering.
//!
//! This crate defines the small, host-agnostic values shared by the DOM seam
//! and the reordering engine:
//! - Item and container identifiers (opaque, server-assigned strings)
//! - Move identifiers (UUID v7) used to recognise stale replies
//! - The neighbor reference that describes a drop position
//!
//! Nothing here knows about drag gestures or transports.

mod ids;
mod neighbor;

pub use ids::{ContainerId, ItemId, MoveId};
pub use neighbor::NeighborRef;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid identifier: {0:?}")]
    InvalidId(String),

    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),
}
