//! Error types for the DOM seam.

use thiserror::Error;

use crate::NodeId;

/// Result type for DOM operations.
pub type DomResult<T> = Result<T, DomError>;

/// Errors that can occur when mutating the render tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// The node handle does not belong to this tree.
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),

    /// A reference node is not a child of the given parent.
    #[error("node {node} is not a child of {parent}")]
    NotAChild { parent: NodeId, node: NodeId },

    /// Inserting the node would make it its own ancestor.
    #[error("inserting {node} under {parent} would create a cycle")]
    WouldCycle { parent: NodeId, node: NodeId },
}
