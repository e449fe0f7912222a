//! Action: a key binding: its slot, its kind and its settings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::id::ActionContext;
use crate::settings::Settings;

/// The behaviour bound to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    #[serde(rename = "com.elgato.philips-hue.power")]
    Power,
    #[serde(rename = "com.elgato.philips-hue.color")]
    Color,
    #[serde(rename = "com.elgato.philips-hue.cycle")]
    Cycle,
    #[serde(rename = "com.elgato.philips-hue.brightness")]
    Brightness,
    #[serde(rename = "com.elgato.philips-hue.scene")]
    Scene,
}

impl ActionKind {
    pub const ALL: [Self; 5] = [
        Self::Power,
        Self::Color,
        Self::Cycle,
        Self::Brightness,
        Self::Scene,
    ];

    /// Identifier under which the host persists settings for this kind.
    #[must_use]
    pub fn settings_key(self) -> &'static str {
        match self {
            Self::Power => "com.elgato.philips-hue.power",
            Self::Color => "com.elgato.philips-hue.color",
            Self::Cycle => "com.elgato.philips-hue.cycle",
            Self::Brightness => "com.elgato.philips-hue.brightness",
            Self::Scene => "com.elgato.philips-hue.scene",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.settings_key())
    }
}

/// Returned when a string is not a known action identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action kind: {0}")]
pub struct UnknownActionKind(pub String);

impl FromStr for ActionKind {
    type Err = UnknownActionKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.settings_key() == s)
            .ok_or_else(|| UnknownActionKind(s.to_string()))
    }
}

/// A live key binding.
///
/// The action exclusively owns its settings; resolution and dispatch go
/// through [`settings`](Self::settings) and [`set_settings`](Self::set_settings)
/// so they always observe one consistent copy.
#[derive(Debug, Clone)]
pub struct Action {
    context: ActionContext,
    kind: ActionKind,
    settings: Settings,
    /// Index of the next colour for [`ActionKind::Cycle`].
    cycle_position: usize,
}

impl Action {
    #[must_use]
    pub fn new(context: ActionContext, kind: ActionKind, settings: Settings) -> Self {
        Self {
            context,
            kind,
            settings,
            cycle_position: 0,
        }
    }

    #[must_use]
    pub fn context(&self) -> &ActionContext {
        &self.context
    }

    #[must_use]
    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Replace the settings wholesale. No validation happens here.
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    #[must_use]
    pub fn cycle_position(&self) -> usize {
        self.cycle_position
    }

    /// Move the cycle past `used`, wrapping at `len`.
    pub fn advance_cycle(&mut self, used: usize, len: usize) {
        self.cycle_position = if len == 0 { 0 } else { (used + 1) % len };
    }
}
