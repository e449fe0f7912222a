//! Default choices derived from the cache.
//!
//! These are the pure decisions behind default resolution; the app layer's
//! resolver applies them one at a time and persists after each.

use serde_json::{Value, json};

use crate::action::ActionKind;
use crate::cache::{BridgeCacheEntry, CacheSnapshot};
use crate::id::{BridgeId, TargetId};
use crate::ordering::first_by_name;
use crate::settings::{BRIGHTNESS, COLOR, COLORS, SCENE, Settings};

/// Brightness for a new brightness key, in percent.
pub const DEFAULT_BRIGHTNESS: u8 = 100;
/// Colour for a new colour key.
pub const DEFAULT_COLOR: &str = "#ffffff";
/// Colours for a new cycle key.
pub const DEFAULT_CYCLE: [&str; 3] = ["#ff0000", "#00ff00", "#0000ff"];

/// The bridge whose name sorts first.
#[must_use]
pub fn pick_bridge(cache: &CacheSnapshot) -> Option<BridgeId> {
    first_by_name(cache.bridges(), |entry| entry.name.as_str()).cloned()
}

/// The group whose name sorts first, or failing that the first light.
///
/// Groups win because scene keys can only target groups.
#[must_use]
pub fn pick_light(bridge: &BridgeCacheEntry) -> Option<TargetId> {
    first_by_name(&bridge.groups, |g| g.name.as_str())
        .or_else(|| first_by_name(&bridge.lights, |l| l.name.as_str()))
        .cloned()
}

/// The next kind-specific field to fill, if any.
///
/// Returns one `(field, value)` pair at a time so the caller can persist
/// each assignment individually. Never proposes a field that is present.
#[must_use]
pub fn next_kind_default(
    kind: ActionKind,
    settings: &Settings,
    cache: &CacheSnapshot,
) -> Option<(&'static str, Value)> {
    match kind {
        ActionKind::Power => None,
        ActionKind::Brightness => {
            (!settings.contains(BRIGHTNESS)).then(|| (BRIGHTNESS, json!(DEFAULT_BRIGHTNESS)))
        }
        ActionKind::Color => (!settings.contains(COLOR)).then(|| (COLOR, json!(DEFAULT_COLOR))),
        ActionKind::Cycle => (!settings.contains(COLORS)).then(|| (COLORS, json!(DEFAULT_CYCLE))),
        ActionKind::Scene => {
            if settings.contains(SCENE) {
                return None;
            }
            let group = cache
                .get(&settings.bridge()?)?
                .groups
                .get(&settings.light()?)?;
            let scene = first_by_name(&group.scenes, |s| s.name.as_str())?;
            Some((SCENE, json!(scene)))
        }
    }
}
