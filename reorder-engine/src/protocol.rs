//! Wire messages exchanged with the authoritative store.
//!
//! Outbound, the client describes a desired move by naming the moved item and
//! its new neighbors. Inbound, it receives a reply per request plus a few
//! unsolicited signals (connectivity changes and concurrent deletions).
//!
//! Field and event names are configurable, so payloads are built as JSON maps
//! keyed by the names in [`HookConfig`].

use reorder_types::{ContainerId, ItemId, MoveId, NeighborRef};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::config::HookConfig;

/// Event pushed by the transport when the socket drops.
pub const DISCONNECTED_EVENT: &str = "websocket_disconnected";

/// Event pushed by the transport when the socket comes back.
pub const RECONNECTED_EVENT: &str = "websocket_reconnected";

/// Where a request is delivered on the server side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PushTarget {
    /// The component that rendered the hook element.
    Element,
    /// The enclosing view.
    View,
}

/// A reorder request awaiting a reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderRequest {
    /// Identifies the pending move this request belongs to.
    pub move_id: MoveId,
    /// Event name the server dispatches on.
    pub event: String,
    pub target: PushTarget,
    /// Payload keyed by the configured field names.
    pub payload: Map<String, Value>,
}

impl ReorderRequest {
    /// Builds a request from a move description.
    pub fn new(
        move_id: MoveId,
        config: &HookConfig,
        target: PushTarget,
        item: &ItemId,
        neighbors: &NeighborRef,
        destination: Option<&ContainerId>,
    ) -> Self {
        let mut payload = Map::new();
        payload.insert(config.id_field.clone(), Value::from(item.as_str()));
        if let Some(destination) = destination {
            payload.insert(
                config.target_container_field.clone(),
                Value::from(destination.as_str()),
            );
        }
        payload.insert(config.prev_id_field.clone(), id_or_null(neighbors.prev.as_ref()));
        payload.insert(config.next_id_field.clone(), id_or_null(neighbors.next.as_ref()));
        Self {
            move_id,
            event: config.reposition_event.clone(),
            target,
            payload,
        }
    }

    /// Returns a payload field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.payload.get(name)
    }

    /// Returns the payload as a JSON object.
    pub fn payload_value(&self) -> Value {
        Value::Object(self.payload.clone())
    }
}

fn id_or_null(id: Option<&ItemId>) -> Value {
    id.map_or(Value::Null, |id| Value::from(id.as_str()))
}

/// The server's answer to a reorder request.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// The move was accepted; the page already shows the final order.
    Ok,
    /// The move was rejected and must be reverted.
    Error(Value),
}

impl Reply {
    /// Interprets a raw reply. Only a truthy `error` member means failure.
    pub fn from_value(value: &Value) -> Self {
        match value.get("error") {
            Some(error) if is_truthy(error) => Self::Error(error.clone()),
            _ => Self::Ok,
        }
    }

    /// Creates an error reply with a message.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(Value::String(message.into()))
    }

    /// Returns true if the move was rejected.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Truthiness as the page's scripting runtime sees it.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Renders a numeric id the way the page's scripting runtime would, so that
/// `1.0` matches a dataset value of `"1"`.
fn number_id(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER => format!("{}", f as i64),
        _ => n.to_string(),
    }
}

/// Largest integer a double holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// An unsolicited inbound event the hook reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    /// Connectivity was lost.
    Disconnected,
    /// Connectivity was restored.
    Reconnected,
    /// An item was deleted by a concurrent actor.
    ItemDeleted(ItemId),
}

impl Signal {
    /// Recognises an inbound event. Unknown events, and deletion events whose
    /// payload carries no usable id, yield `None`.
    pub fn from_event(config: &HookConfig, name: &str, payload: &Value) -> Option<Self> {
        match name {
            DISCONNECTED_EVENT => Some(Self::Disconnected),
            RECONNECTED_EVENT => Some(Self::Reconnected),
            _ if name == config.deletion_event => {
                let raw = match payload.get(&config.id_field)? {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => number_id(n),
                    _ => return None,
                };
                ItemId::parse(raw).ok().map(Self::ItemDeleted)
            }
            _ => None,
        }
    }
}
