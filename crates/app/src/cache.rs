//! Process-wide bridge cache shared by every action.
//!
//! Two writers exist: discovery, which replaces whole bridge entries, and
//! the dispatcher, which writes the state a successful command produced.
//! Every write happens under one lock, so readers observe a bridge entry
//! either entirely before or entirely after a refresh.

use std::sync::{PoisonError, RwLock};

use huedeck_domain::cache::{BridgeCacheEntry, CacheSnapshot};
use huedeck_domain::command::StateCommand;
use huedeck_domain::id::{BridgeId, TargetId};

/// Shared, lock-protected [`CacheSnapshot`].
#[derive(Debug, Default)]
pub struct SharedCache {
    inner: RwLock<CacheSnapshot>,
}

impl SharedCache {
    /// Create an empty cache (discovery has not reported yet).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_snapshot(snapshot: CacheSnapshot) -> Self {
        Self {
            inner: RwLock::new(snapshot),
        }
    }

    /// Run `f` against the current snapshot without cloning it.
    ///
    /// `f` must not call back into the cache.
    pub fn read<R>(&self, f: impl FnOnce(&CacheSnapshot) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&*guard)
    }

    /// Clone the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> CacheSnapshot {
        self.read(Clone::clone)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read(CacheSnapshot::is_empty)
    }

    /// Replace every bridge at once with a fresh discovery result.
    pub fn replace_all(&self, snapshot: CacheSnapshot) {
        *self.write() = snapshot;
    }

    /// Replace one bridge entry. Returns whether the bridge was already known.
    pub fn replace_bridge(&self, entry: BridgeCacheEntry) -> bool {
        self.write().insert(entry).is_some()
    }

    pub fn remove_bridge(&self, id: &BridgeId) -> Option<BridgeCacheEntry> {
        self.write().remove(id)
    }

    /// Write the state produced by `command` into the cached target.
    ///
    /// Returns `false` when the bridge or target has left the cache since
    /// the command was planned; nothing is written in that case.
    pub fn apply(&self, bridge: &BridgeId, key: &TargetId, command: &StateCommand) -> bool {
        let mut guard = self.write();
        match guard.get_mut(bridge).and_then(|entry| entry.target_mut(key)) {
            Some(cached) => {
                command.apply_to(cached);
                true
            }
            None => false,
        }
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, CacheSnapshot> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}
