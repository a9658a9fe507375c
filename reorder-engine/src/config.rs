//! Hook configuration.
//!
//! Configuration is read once, at mount, from the hook element's dataset.
//! Every key is optional; each variant has its own defaults and dataset
//! entries override them field by field. Empty values fall back to the
//! default.

use reorder_dom::{ListDom, NodeId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

use crate::error::HookResult;

/// Dataset keys understood by [`HookConfig::read_from`].
pub const CONFIG_KEYS: [&str; 8] = [
    "itemIdAttribute",
    "repositionEvent",
    "deletionEvent",
    "idField",
    "prevIdField",
    "nextIdField",
    "containerIdAttribute",
    "targetContainerField",
];

/// Names used to read items from the page and to build payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookConfig {
    /// Dataset key holding each item's identifier.
    pub item_id_attribute: String,
    /// Event name for outbound reorder requests.
    pub reposition_event: String,
    /// Event name announcing that an item was deleted elsewhere.
    pub deletion_event: String,
    /// Payload field carrying the moved item's id.
    pub id_field: String,
    /// Payload field carrying the previous neighbor's id.
    pub prev_id_field: String,
    /// Payload field carrying the next neighbor's id.
    pub next_id_field: String,
    /// Dataset key holding a container's identifier.
    pub container_id_attribute: String,
    /// Payload field carrying the destination container's id.
    pub target_container_field: String,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            item_id_attribute: "itemId".to_string(),
            reposition_event: "reposition_item".to_string(),
            deletion_event: "item_deleted".to_string(),
            id_field: "item_id".to_string(),
            prev_id_field: "prev_item_id".to_string(),
            next_id_field: "next_item_id".to_string(),
            container_id_attribute: "categoryId".to_string(),
            target_container_field: "target_category_id".to_string(),
        }
    }
}

impl HookConfig {
    /// Defaults for the flat and sectioned variants.
    #[must_use]
    pub fn flat() -> Self {
        Self::default()
    }

    /// Defaults for the cross-container variant (envelopes across categories).
    #[must_use]
    pub fn cross_container() -> Self {
        Self {
            item_id_attribute: "envelopeId".to_string(),
            reposition_event: "reposition_envelope".to_string(),
            deletion_event: "envelope_deleted".to_string(),
            id_field: "envelope_id".to_string(),
            prev_id_field: "prev_envelope_id".to_string(),
            next_id_field: "next_envelope_id".to_string(),
            ..Self::default()
        }
    }

    /// Applies dataset overrides on top of `self`. Unknown keys and empty
    /// values are ignored.
    pub fn overlay(self, overrides: &BTreeMap<String, String>) -> HookResult<Self> {
        let mut value = serde_json::to_value(&self)?;
        if let Value::Object(fields) = &mut value {
            for (key, override_value) in overrides {
                if override_value.is_empty() || !fields.contains_key(key) {
                    continue;
                }
                fields.insert(key.clone(), Value::String(override_value.clone()));
            }
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Reads overrides from the hook element's dataset.
    pub fn read_from(self, dom: &dyn ListDom, root: NodeId) -> HookResult<Self> {
        let overrides: BTreeMap<String, String> = CONFIG_KEYS
            .iter()
            .filter_map(|&key| dom.dataset(root, key).map(|v| (key.to_string(), v)))
            .collect();
        if !overrides.is_empty() {
            debug!("Hook {} overrides {} config keys", root, overrides.len());
        }
        self.overlay(&overrides)
    }
}

/// Class names the engine applies to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    /// On the dragged item while a gesture is active.
    pub dragging: String,
    /// On the moved item while its request is in flight.
    pub pending: Vec<String>,
    /// On the hook element while connectivity is lost.
    pub offline: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            dragging: "dragging".to_string(),
            pending: vec!["opacity-50".to_string(), "pointer-events-none".to_string()],
            offline: "opacity-75".to_string(),
        }
    }
}

/// What the hook asks of the drag-gesture engine when it is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragOptions {
    pub animation: Duration,
    /// Press-and-hold delay before a drag begins.
    pub delay: Duration,
    pub drag_class: String,
    pub ghost_class: String,
    /// Selector for the grip inside each item.
    pub handle: String,
    pub force_fallback: bool,
    pub disabled: bool,
}

impl Default for DragOptions {
    fn default() -> Self {
        Self {
            animation: Duration::from_millis(150),
            delay: Duration::from_millis(100),
            drag_class: "opacity-50".to_string(),
            ghost_class: "bg-base-200".to_string(),
            handle: ".drag-handle".to_string(),
            force_fallback: true,
            disabled: false,
        }
    }
}

/// How sections are hidden while a drag is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollapseMode {
    /// Transition height and opacity to zero, then restore.
    #[default]
    Animated,
    /// Hide sections outright with `display: none`.
    Instant,
}

/// Configuration for the sectioned-list extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionConfig {
    /// Id prefix of the collapsible section bodies.
    pub content_prefix: String,
    /// Id prefix of the toggle icons next to each section header.
    pub icon_prefix: String,
    /// Class that rotates a toggle icon into its collapsed pose.
    pub collapsed_icon_class: String,
    pub transition: Duration,
    pub mode: CollapseMode,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            content_prefix: "category-content-".to_string(),
            icon_prefix: "toggle-icon-".to_string(),
            collapsed_icon_class: "-rotate-90".to_string(),
            transition: Duration::from_millis(200),
            mode: CollapseMode::Animated,
        }
    }
}
