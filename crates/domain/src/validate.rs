//! Pre-dispatch validation of settings against the current cache.
//!
//! Checks run in a fixed order and stop at the first failure, so the
//! resulting error always names exactly one missing or stale prerequisite:
//!
//! 1. `bridge` present
//! 2. bridge in the cache
//! 3. `light` present
//! 4. light or group under that bridge
//! 5. the action-kind value present and usable
//!
//! Validation never mutates settings.

use serde_json::Value;

use crate::action::ActionKind;
use crate::cache::{BridgeCacheEntry, CacheSnapshot, CachedTarget};
use crate::color::Rgb;
use crate::error::{HueDeckError, MissingConfiguration, StaleReference};
use crate::id::{BridgeId, TargetId, TargetKind};
use crate::settings::{BRIGHTNESS, COLOR, COLORS, SCENE, Settings};

/// A light or group that exists in the cache right now.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedTarget<'a> {
    /// Key the bridge is cached under.
    pub bridge_id: &'a BridgeId,
    pub bridge: &'a BridgeCacheEntry,
    pub id: &'a TargetId,
    pub cached: &'a CachedTarget,
}

impl ValidatedTarget<'_> {
    #[must_use]
    pub fn kind(&self) -> TargetKind {
        self.id.kind()
    }
}

/// The action-kind value read from settings.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionValue {
    /// Power carries no settings value; the target state comes from the key event.
    Power,
    /// Brightness in percent.
    Brightness(f64),
    Color(Rgb),
    Cycle(Vec<Rgb>),
    /// Scene id under the target group.
    Scene(String),
}

/// Everything dispatch needs, borrowed from the snapshot it was checked against.
#[derive(Debug, Clone)]
pub struct Validated<'a> {
    pub target: ValidatedTarget<'a>,
    pub value: ActionValue,
}

/// Run all checks for `kind`.
///
/// # Errors
///
/// Returns [`HueDeckError::MissingConfiguration`] or
/// [`HueDeckError::StaleReference`] for the first failing check.
pub fn validate<'a>(
    kind: ActionKind,
    settings: &Settings,
    cache: &'a CacheSnapshot,
) -> Result<Validated<'a>, HueDeckError> {
    let target = validate_target(settings, cache)?;
    let value = validate_value(kind, settings, &target)?;
    Ok(Validated { target, value })
}

/// Checks 1–4: the bridge and the light or group.
///
/// The key's marker picks the map: an `l-` key is only looked up among
/// lights and any other key only among groups. A key filed under the wrong
/// map is reported stale rather than dispatched to the wrong endpoint.
///
/// # Errors
///
/// Returns the first missing or stale reference.
pub fn validate_target<'a>(
    settings: &Settings,
    cache: &'a CacheSnapshot,
) -> Result<ValidatedTarget<'a>, HueDeckError> {
    let bridge_id = settings.bridge().ok_or(MissingConfiguration::Bridge)?;
    let (bridge_id, bridge) = cache
        .get_key_value(&bridge_id)
        .ok_or(StaleReference::Bridge(bridge_id))?;

    let light_id = settings.light().ok_or(MissingConfiguration::Light)?;
    let targets = match light_id.kind() {
        TargetKind::Light => &bridge.lights,
        TargetKind::Group => &bridge.groups,
    };
    let (id, cached) = targets
        .get_key_value(&light_id)
        .ok_or(StaleReference::Light(light_id))?;

    Ok(ValidatedTarget {
        bridge_id,
        bridge,
        id,
        cached,
    })
}

/// Check 5: the value the action kind needs.
///
/// # Errors
///
/// Returns [`MissingConfiguration`] when the field is absent or malformed,
/// and [`StaleReference::Scene`] when a scene is no longer on the group.
pub fn validate_value(
    kind: ActionKind,
    settings: &Settings,
    target: &ValidatedTarget<'_>,
) -> Result<ActionValue, HueDeckError> {
    match kind {
        ActionKind::Power => Ok(ActionValue::Power),
        ActionKind::Brightness => {
            let raw = required(settings, BRIGHTNESS)?;
            let percent = number(raw)
                .filter(|v| (0.0..=100.0).contains(v))
                .ok_or_else(|| invalid(BRIGHTNESS, raw))?;
            Ok(ActionValue::Brightness(percent))
        }
        ActionKind::Color => {
            let raw = required(settings, COLOR)?;
            Ok(ActionValue::Color(color(COLOR, raw)?))
        }
        ActionKind::Cycle => {
            let raw = required(settings, COLORS)?;
            let list = raw
                .as_array()
                .filter(|list| !list.is_empty())
                .ok_or_else(|| invalid(COLORS, raw))?;
            let colors = list
                .iter()
                .map(|item| color(COLORS, item))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ActionValue::Cycle(colors))
        }
        ActionKind::Scene => {
            if target.kind() != TargetKind::Group {
                return Err(MissingConfiguration::GroupRequired.into());
            }
            let raw = required(settings, SCENE)?;
            let scene = raw.as_str().ok_or_else(|| invalid(SCENE, raw))?;
            if !target.cached.scenes.contains_key(scene) {
                return Err(StaleReference::Scene(scene.to_string()).into());
            }
            Ok(ActionValue::Scene(scene.to_string()))
        }
    }
}

fn required<'s>(settings: &'s Settings, field: &'static str) -> Result<&'s Value, HueDeckError> {
    settings
        .get(field)
        .ok_or_else(|| MissingConfiguration::Value { field }.into())
}

fn invalid(field: &'static str, raw: &Value) -> HueDeckError {
    MissingConfiguration::InvalidValue {
        field,
        value: raw.to_string(),
    }
    .into()
}

/// Property inspectors send sliders as strings, so both forms are accepted.
fn number(raw: &Value) -> Option<f64> {
    let value: Option<f64> = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    value.filter(|v| v.is_finite())
}

fn color(field: &'static str, raw: &Value) -> Result<Rgb, HueDeckError> {
    raw.as_str()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| invalid(field, raw))
}
