//! Cache snapshot: what discovery last saw on each bridge.
//!
//! A [`CacheSnapshot`] maps bridge ids to [`BridgeCacheEntry`] values. Each
//! entry is replaced as a whole when discovery refreshes it, so a reader
//! never sees a half-updated bridge.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::id::{BridgeId, TargetId, TargetKind};
use crate::time::{Timestamp, now};

/// Everything needed to address a bridge over the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConnection {
    pub id: BridgeId,
    pub ip: String,
    /// Pairing credential issued by the bridge.
    pub username: String,
}

/// A scene stored on the bridge for a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedScene {
    pub id: String,
    pub name: String,
}

/// Last-known state of a light or group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CachedTarget {
    /// Bridge-native id (without the cache-key marker).
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<bool>,
    /// Device-scale brightness (0–254).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<u8>,
    /// CIE 1931 colour coordinates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xy: Option<[f64; 2]>,
    /// Scenes keyed by scene id. Only groups carry scenes.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub scenes: BTreeMap<String, CachedScene>,
}

impl CachedTarget {
    /// Create a target with a native id and display name and no known state.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Discovery result for one bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeCacheEntry {
    pub id: BridgeId,
    pub name: String,
    pub ip: String,
    pub username: String,
    #[serde(default)]
    pub lights: BTreeMap<TargetId, CachedTarget>,
    #[serde(default)]
    pub groups: BTreeMap<TargetId, CachedTarget>,
    #[serde(default = "now")]
    pub refreshed_at: Timestamp,
}

impl BridgeCacheEntry {
    /// Start an entry with no lights or groups.
    #[must_use]
    pub fn new(
        id: BridgeId,
        name: impl Into<String>,
        ip: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            ip: ip.into(),
            username: username.into(),
            lights: BTreeMap::new(),
            groups: BTreeMap::new(),
            refreshed_at: now(),
        }
    }

    /// Add a light, keyed with the light marker.
    #[must_use]
    pub fn with_light(mut self, light: CachedTarget) -> Self {
        self.lights.insert(TargetId::light(&light.id), light);
        self
    }

    /// Add a group, keyed with the group marker.
    #[must_use]
    pub fn with_group(mut self, group: CachedTarget) -> Self {
        self.groups.insert(TargetId::group(&group.id), group);
        self
    }

    /// Connection details for this bridge.
    #[must_use]
    pub fn connection(&self) -> BridgeConnection {
        BridgeConnection {
            id: self.id.clone(),
            ip: self.ip.clone(),
            username: self.username.clone(),
        }
    }

    /// Whether `id` names a light or a group on this bridge.
    #[must_use]
    pub fn contains_target(&self, id: &TargetId) -> bool {
        self.lights.contains_key(id) || self.groups.contains_key(id)
    }

    /// Look up a light or group, picking the map from the key's marker.
    #[must_use]
    pub fn target(&self, id: &TargetId) -> Option<&CachedTarget> {
        match id.kind() {
            TargetKind::Light => self.lights.get(id),
            TargetKind::Group => self.groups.get(id),
        }
    }

    pub fn target_mut(&mut self, id: &TargetId) -> Option<&mut CachedTarget> {
        match id.kind() {
            TargetKind::Light => self.lights.get_mut(id),
            TargetKind::Group => self.groups.get_mut(id),
        }
    }
}

/// All known bridges, keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheSnapshot(BTreeMap<BridgeId, BridgeCacheEntry>);

impl CacheSnapshot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn get(&self, id: &BridgeId) -> Option<&BridgeCacheEntry> {
        self.0.get(id)
    }

    /// Look up a bridge together with the key it is cached under.
    ///
    /// The key is what every later cache write must use; a snapshot
    /// uploaded as a map may carry an entry whose `id` differs from it.
    #[must_use]
    pub fn get_key_value(&self, id: &BridgeId) -> Option<(&BridgeId, &BridgeCacheEntry)> {
        self.0.get_key_value(id)
    }

    pub fn get_mut(&mut self, id: &BridgeId) -> Option<&mut BridgeCacheEntry> {
        self.0.get_mut(id)
    }

    #[must_use]
    pub fn contains(&self, id: &BridgeId) -> bool {
        self.0.contains_key(id)
    }

    /// Insert or replace a whole bridge entry.
    pub fn insert(&mut self, entry: BridgeCacheEntry) -> Option<BridgeCacheEntry> {
        self.0.insert(entry.id.clone(), entry)
    }

    pub fn remove(&mut self, id: &BridgeId) -> Option<BridgeCacheEntry> {
        self.0.remove(id)
    }

    pub fn bridges(&self) -> impl Iterator<Item = (&BridgeId, &BridgeCacheEntry)> {
        self.0.iter()
    }
}

impl FromIterator<BridgeCacheEntry> for CacheSnapshot {
    fn from_iter<T: IntoIterator<Item = BridgeCacheEntry>>(iter: T) -> Self {
        Self(iter.into_iter().map(|e| (e.id.clone(), e)).collect())
    }
}
