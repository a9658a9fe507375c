//! Error types for the reordering engine.
//!
//! None of these are fatal to the page. Lifecycle entry points log them and
//! fall back to a local snap back; only mount-time configuration and the
//! driver's transport plumbing hand them to the host.

use reorder_dom::{DomError, NodeId};
use thiserror::Error;

/// Result type for engine operations.
pub type HookResult<T> = Result<T, HookError>;

/// Errors that can occur while reconciling a reorder.
#[derive(Debug, Error)]
pub enum HookError {
    /// An item in the container carries no identifier.
    #[error("item {node} has no identifier under dataset key {key:?}")]
    MissingItemId { node: NodeId, key: String },

    /// A destination container carries no identifier.
    #[error("container {node} has no identifier under dataset key {key:?}")]
    MissingContainerId { node: NodeId, key: String },

    /// The item is not where the gesture engine reported it.
    #[error("item {node} is not at index {index} of {container}")]
    IndexOutOfSync {
        node: NodeId,
        container: NodeId,
        index: usize,
    },

    /// The item is no longer a child of the expected container.
    #[error("item {item} is not in container {container}")]
    NotInContainer { item: NodeId, container: NodeId },

    /// An identifier read from the page was malformed.
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] reorder_types::Error),

    /// The render tree rejected a mutation.
    #[error("dom error: {0}")]
    Dom(#[from] DomError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The transport could not deliver a request.
    #[error("transport error: {0}")]
    Transport(String),

    /// Channel closed.
    #[error("channel closed")]
    ChannelClosed,
}
