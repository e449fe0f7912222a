//! Command planning: turning validated settings into a device command.
//!
//! UI-facing values are converted to the bridge's native scale here, the
//! light-or-group target is chosen from the key's structural marker, and the
//! optimistic cache update applied after a successful command is defined
//! alongside the command itself.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cache::{BridgeConnection, CachedTarget};
use crate::id::{BridgeId, TargetId, TargetKind};
use crate::validate::{ActionValue, Validated};

/// Device-scale brightness per UI percent.
const BRIGHTNESS_SCALE: f64 = 2.54;

/// A light or a group on a specific bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub connection: BridgeConnection,
    pub kind: TargetKind,
    /// Bridge-native id.
    pub id: String,
}

impl Target {
    #[must_use]
    pub fn light(connection: BridgeConnection, id: impl Into<String>) -> Self {
        Self {
            connection,
            kind: TargetKind::Light,
            id: id.into(),
        }
    }

    #[must_use]
    pub fn group(connection: BridgeConnection, id: impl Into<String>) -> Self {
        Self {
            connection,
            kind: TargetKind::Group,
            id: id.into(),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} on {}", self.kind, self.id, self.connection.id)
    }
}

/// A state change in the bridge's native units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum StateCommand {
    Power(bool),
    /// 0–254.
    Brightness(u8),
    /// CIE 1931 coordinates.
    Color([f64; 2]),
    /// Scene id, groups only.
    Scene(String),
}

impl StateCommand {
    /// Write the commanded state into a cached light or group.
    pub fn apply_to(&self, cached: &mut CachedTarget) {
        match self {
            Self::Power(on) => cached.power = Some(*on),
            Self::Brightness(bri) => cached.brightness = Some(*bri),
            Self::Color(xy) => cached.xy = Some(*xy),
            Self::Scene(_) => cached.power = Some(true),
        }
    }
}

impl fmt::Display for StateCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Power(on) => write!(f, "power({on})"),
            Self::Brightness(bri) => write!(f, "brightness({bri})"),
            Self::Color([x, y]) => write!(f, "color({x}, {y})"),
            Self::Scene(id) => write!(f, "scene({id})"),
        }
    }
}

/// Convert a 0–100 UI brightness to the 0–254 device scale.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn brightness_to_device(percent: f64) -> u8 {
    (percent.clamp(0.0, 100.0) * BRIGHTNESS_SCALE).round() as u8
}

/// Key-event inputs that influence the command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyInput {
    /// State requested by a multi-action (`0` off, anything else on).
    pub desired_state: Option<u8>,
    /// Next colour index for the cycle action.
    pub cycle_position: usize,
}

/// Which cycle slot a dispatch used, so the action can advance on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleStep {
    pub used: usize,
    pub len: usize,
}

/// A fully planned dispatch, detached from the snapshot it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchPlan {
    pub bridge: BridgeId,
    pub key: TargetId,
    pub target: Target,
    pub command: StateCommand,
    pub cycle: Option<CycleStep>,
}

/// Build the command for validated settings.
#[must_use]
pub fn plan(validated: &Validated<'_>, input: KeyInput) -> DispatchPlan {
    let vt = &validated.target;
    let connection = vt.bridge.connection();
    let target = match vt.kind() {
        TargetKind::Light => Target::light(connection, vt.cached.id.clone()),
        TargetKind::Group => Target::group(connection, vt.cached.id.clone()),
    };

    let mut cycle = None;
    let command = match &validated.value {
        ActionValue::Power => {
            let on = match input.desired_state {
                Some(state) => state != 0,
                None => !vt.cached.power.unwrap_or(false),
            };
            StateCommand::Power(on)
        }
        ActionValue::Brightness(percent) => StateCommand::Brightness(brightness_to_device(*percent)),
        ActionValue::Color(rgb) => StateCommand::Color(rgb.to_xy()),
        ActionValue::Cycle(colors) => {
            let used = input.cycle_position % colors.len();
            cycle = Some(CycleStep {
                used,
                len: colors.len(),
            });
            StateCommand::Color(colors[used].to_xy())
        }
        ActionValue::Scene(id) => StateCommand::Scene(id.clone()),
    };

    DispatchPlan {
        bridge: vt.bridge_id.clone(),
        key: vt.id.clone(),
        target,
        command,
        cycle,
    }
}
