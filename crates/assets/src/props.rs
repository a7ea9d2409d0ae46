//! Per-node render property overrides carried by model files.
//!
//! A node may hold a JSON sidecar (glTF `extras.three_props`) such as
//! `{"castShadow": true}`. Only `transparent`, `receiveShadow` and
//! `castShadow` are recognised. Overrides flow down the tree: a node's
//! effective set is its parent's set with the node's own sidecar merged over
//! it, so deeper sidecars win.

use mazeworld_render::VisualNode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Keys a sidecar may set. Absent keys inherit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropOverrides {
    pub transparent: Option<bool>,
    pub receive_shadow: Option<bool>,
    pub cast_shadow: Option<bool>,
}

/// Fully resolved render properties for one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderProps {
    pub transparent: bool,
    pub receive_shadow: bool,
    pub cast_shadow: bool,
}

impl Default for RenderProps {
    fn default() -> Self {
        Self {
            transparent: true,
            receive_shadow: false,
            cast_shadow: false,
        }
    }
}

impl RenderProps {
    /// This set with `overrides` merged over it.
    pub fn merged(self, overrides: &PropOverrides) -> Self {
        Self {
            transparent: overrides.transparent.unwrap_or(self.transparent),
            receive_shadow: overrides.receive_shadow.unwrap_or(self.receive_shadow),
            cast_shadow: overrides.cast_shadow.unwrap_or(self.cast_shadow),
        }
    }

    /// Write these properties onto a single node and its material.
    pub fn apply_to(&self, node: &mut VisualNode) {
        node.receive_shadow = self.receive_shadow;
        node.cast_shadow = self.cast_shadow;
        if let Some(material) = node.material.as_mut() {
            material.transparent = self.transparent;
        }
    }
}

/// Parse a sidecar. Malformed JSON is logged and treated as no override, so
/// one bad node never poisons its siblings or the rest of the model. A
/// recognised key with a non-bool value is skipped on its own.
pub fn parse_sidecar(node_name: &str, raw: &str) -> PropOverrides {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::error!(node = node_name, sidecar = raw, error = %e, "malformed three_props");
            return PropOverrides::default();
        }
    };
    let Some(object) = value.as_object() else {
        tracing::error!(node = node_name, sidecar = raw, "three_props is not an object");
        return PropOverrides::default();
    };

    let flag = |key: &str| {
        let value = object.get(key)?;
        let parsed = value.as_bool();
        if parsed.is_none() {
            tracing::warn!(node = node_name, key, %value, "ignoring non-bool override");
        }
        parsed
    };
    PropOverrides {
        transparent: flag("transparent"),
        receive_shadow: flag("receiveShadow"),
        cast_shadow: flag("castShadow"),
    }
}
