//! Typed identifiers.
//!
//! Bridge, light/group and key-slot identifiers come from the outside world
//! (the bridge and the host) and are opaque strings. Dispatch identifiers are
//! generated locally and backed by UUIDs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(uuid::Uuid);

        impl Default for $name {
            fn default() -> Self {
                Self(uuid::Uuid::new_v4())
            }
        }

        impl $name {
            /// Generate a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }

            /// Access the inner UUID.
            #[must_use]
            pub fn as_uuid(self) -> uuid::Uuid {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                uuid::Uuid::parse_str(s).map(Self)
            }
        }
    };
}

macro_rules! define_key {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Borrow the raw identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

define_id!(
    /// Identifier attached to a single key-press dispatch, used to tell
    /// concurrent in-flight commands for the same key apart in logs.
    DispatchId
);

define_key!(
    /// Identifier of a Hue bridge as reported by discovery.
    BridgeId
);

define_key!(
    /// Cache key of a light or a group under a bridge (`l-<id>` or `g-<id>`).
    TargetId
);

define_key!(
    /// Opaque key-slot identifier handed out by the host surface.
    ActionContext
);

/// Prefix marking a light key. Anything else is a group key.
const LIGHT_MARKER: &str = "l-";
/// Prefix used when building group keys.
const GROUP_MARKER: &str = "g-";

/// Whether a [`TargetId`] addresses a single light or a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Light,
    Group,
}

impl TargetId {
    /// Build the cache key for the light with the given bridge-native id.
    #[must_use]
    pub fn light(native_id: &str) -> Self {
        Self(format!("{LIGHT_MARKER}{native_id}"))
    }

    /// Build the cache key for the group with the given bridge-native id.
    #[must_use]
    pub fn group(native_id: &str) -> Self {
        Self(format!("{GROUP_MARKER}{native_id}"))
    }

    /// Classify the key by its structural marker.
    #[must_use]
    pub fn kind(&self) -> TargetKind {
        if self.0.starts_with(LIGHT_MARKER) {
            TargetKind::Light
        } else {
            TargetKind::Group
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => f.write_str("light"),
            Self::Group => f.write_str("group"),
        }
    }
}
