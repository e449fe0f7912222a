//! Settings: the persisted configuration of a single key.
//!
//! Settings are a free-form JSON object owned by the host: the property
//! inspector may store fields this crate never reads, so they are kept as a
//! map and round-tripped untouched. Typed accessors cover the fields the
//! resolver, validator and dispatcher care about.
//!
//! A field holding JSON `null` counts as absent.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::id::{BridgeId, TargetId};

/// Field naming the bridge.
pub const BRIDGE: &str = "bridge";
/// Field naming the light or group key.
pub const LIGHT: &str = "light";
/// Brightness in percent (0–100).
pub const BRIGHTNESS: &str = "brightness";
/// Colour as `#rrggbb`.
pub const COLOR: &str = "color";
/// Colours cycled through by the cycle action.
pub const COLORS: &str = "colors";
/// Scene identifier, relative to the selected group.
pub const SCENE: &str = "scene";

/// Mapping of named fields to values, persisted per key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings(Map<String, Value>);

/// How far default resolution has progressed for a set of settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionState {
    /// No bridge chosen.
    Unconfigured,
    /// Bridge chosen, no light or group yet.
    PartiallyResolved,
    /// Bridge and light or group chosen.
    Resolved,
}

impl Settings {
    /// Create empty settings (a freshly placed key).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `field` holds a non-null value.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Value of `field`, skipping JSON `null`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field).filter(|value| !value.is_null())
    }

    /// Set `field`, replacing any previous value.
    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.0.insert(field.into(), value);
    }

    /// Set `field` only when it is absent. Returns whether a value was written.
    pub fn insert_if_absent(&mut self, field: &str, value: Value) -> bool {
        if self.contains(field) {
            return false;
        }
        self.insert(field, value);
        true
    }

    /// The configured bridge, if any.
    #[must_use]
    pub fn bridge(&self) -> Option<BridgeId> {
        self.get_key(BRIDGE).map(BridgeId::from)
    }

    /// The configured light or group key, if any.
    #[must_use]
    pub fn light(&self) -> Option<TargetId> {
        self.get_key(LIGHT).map(TargetId::from)
    }

    pub fn set_bridge(&mut self, bridge: &BridgeId) {
        self.insert(BRIDGE, Value::String(bridge.to_string()));
    }

    pub fn set_light(&mut self, light: &TargetId) {
        self.insert(LIGHT, Value::String(light.to_string()));
    }

    /// Classify how much of the target has been chosen.
    #[must_use]
    pub fn resolution_state(&self) -> ResolutionState {
        match (self.contains(BRIDGE), self.contains(LIGHT)) {
            (false, _) => ResolutionState::Unconfigured,
            (true, false) => ResolutionState::PartiallyResolved,
            (true, true) => ResolutionState::Resolved,
        }
    }

    /// Iterate over the raw fields.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Read a field as an identifier string. Numbers are accepted because
    /// older settings stored bare numeric ids.
    fn get_key(&self, field: &str) -> Option<String> {
        match self.get(field)? {
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

impl From<Map<String, Value>> for Settings {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
