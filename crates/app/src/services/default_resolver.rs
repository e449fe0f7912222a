//! Default resolver: fills missing settings from the cache.
//!
//! Runs when an action is created and whenever the cache changes:
//!
//! 1. No bridges cached: leave `bridge` and `light` alone.
//! 2. `bridge` absent: take the bridge whose name sorts first.
//! 3. `light` absent: take the first group by name, else the first light.
//! 4. Kind-specific defaults (brightness 100, …) run in every case.
//!
//! Each assignment is persisted as soon as it is made, so a partial
//! resolution survives a restart. Present fields are never overwritten,
//! which makes a second pass over the same snapshot a no-op.

use huedeck_domain::action::Action;
use huedeck_domain::cache::CacheSnapshot;
use huedeck_domain::defaults::{next_kind_default, pick_bridge, pick_light};
use huedeck_domain::id::{BridgeId, TargetId};
use huedeck_domain::settings::{BRIDGE, LIGHT, ResolutionState, Settings};

use crate::cache::SharedCache;
use crate::ports::SettingsStore;

/// Result of one resolution pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Fields written during this pass, in order.
    pub filled: Vec<&'static str>,
    pub state: ResolutionState,
}

impl Resolution {
    /// Whether the pass changed nothing.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.filled.is_empty()
    }
}

/// Fills gaps in action settings and persists each fill.
pub struct DefaultResolver<S> {
    store: S,
}

impl<S: SettingsStore> DefaultResolver<S> {
    /// Create a resolver persisting through `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the store this resolver persists through.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolve defaults for `action` against the current cache.
    ///
    /// The cache is re-read before every step, so a refresh landing while a
    /// save is in flight is seen by the next step.
    pub async fn resolve(&self, action: &mut Action, cache: &SharedCache) -> Resolution {
        let mut filled = Vec::new();

        if let Some(bridge) = cache.read(|snapshot| missing_bridge(action.settings(), snapshot)) {
            action.settings_mut().set_bridge(&bridge);
            self.persist(action).await;
            filled.push(BRIDGE);
        }

        if let Some(light) = cache.read(|snapshot| missing_light(action.settings(), snapshot)) {
            action.settings_mut().set_light(&light);
            self.persist(action).await;
            filled.push(LIGHT);
        }

        let kind = action.kind();
        if let Some((field, value)) =
            cache.read(|snapshot| next_kind_default(kind, action.settings(), snapshot))
        {
            action.settings_mut().insert(field, value);
            self.persist(action).await;
            filled.push(field);
        }

        let resolution = Resolution {
            filled,
            state: action.settings().resolution_state(),
        };
        if !resolution.is_noop() {
            tracing::debug!(
                context = %action.context(),
                kind = %kind,
                filled = ?resolution.filled,
                state = ?resolution.state,
                "defaults resolved"
            );
        }
        resolution
    }

    async fn persist(&self, action: &Action) {
        if let Err(err) = self
            .store
            .save(action.kind(), action.context(), action.settings())
            .await
        {
            tracing::warn!(
                context = %action.context(),
                kind = %action.kind(),
                error = %err,
                "failed to persist resolved settings"
            );
        }
    }
}

fn missing_bridge(settings: &Settings, snapshot: &CacheSnapshot) -> Option<BridgeId> {
    if settings.contains(BRIDGE) {
        return None;
    }
    pick_bridge(snapshot)
}

/// A stale bridge yields nothing here; the validator reports it at dispatch.
fn missing_light(settings: &Settings, snapshot: &CacheSnapshot) -> Option<TargetId> {
    if settings.contains(LIGHT) {
        return None;
    }
    pick_light(snapshot.get(&settings.bridge()?)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use huedeck_domain::action::ActionKind;
    use huedeck_domain::cache::{BridgeCacheEntry, CachedTarget};
    use huedeck_domain::error::HueDeckError;
    use huedeck_domain::id::ActionContext;
    use huedeck_domain::settings::BRIGHTNESS;
    use serde_json::json;
    use std::future::Future;
    use std::sync::Mutex;

    // ── Spy store ──────────────────────────────────────────────────

    #[derive(Default)]
    struct SpyStore {
        saves: Mutex<Vec<Settings>>,
    }

    impl SpyStore {
        fn saves(&self) -> Vec<Settings> {
            self.saves.lock().unwrap().clone()
        }
    }

    impl SettingsStore for SpyStore {
        fn save(
            &self,
            _kind: ActionKind,
            _context: &ActionContext,
            settings: &Settings,
        ) -> impl Future<Output = Result<(), HueDeckError>> + Send {
            self.saves.lock().unwrap().push(settings.clone());
            async { Ok(()) }
        }

        fn load(
            &self,
            _kind: ActionKind,
            _context: &ActionContext,
        ) -> impl Future<Output = Result<Option<Settings>, HueDeckError>> + Send {
            async { Ok(None) }
        }
    }

    // ── Helpers ────────────────────────────────────────────────────

    fn bridge(id: &str, name: &str) -> BridgeCacheEntry {
        BridgeCacheEntry::new(BridgeId::from(id), name, "10.0.0.2", "user")
    }

    fn home() -> BridgeCacheEntry {
        bridge("B1", "Home")
            .with_light(CachedTarget::new("1", "Desk"))
            .with_group(CachedTarget::new("2", "Office"))
            .with_group(CachedTarget::new("1", "Kitchen"))
    }

    fn action(kind: ActionKind, settings: serde_json::Value) -> Action {
        Action::new(
            ActionContext::from("ctx-1"),
            kind,
            serde_json::from_value(settings).unwrap(),
        )
    }

    fn cache(entries: Vec<BridgeCacheEntry>) -> SharedCache {
        SharedCache::from_snapshot(entries.into_iter().collect())
    }

    // ── Tests ──────────────────────────────────────────────────────

    #[tokio::test]
    async fn should_pick_alphabetically_first_bridge() {
        let resolver = DefaultResolver::new(SpyStore::default());
        let cache = cache(vec![bridge("id1", "Zeta"), bridge("id2", "Alpha")]);
        let mut a = action(ActionKind::Power, json!({}));

        resolver.resolve(&mut a, &cache).await;

        assert_eq!(a.settings().bridge(), Some(BridgeId::from("id2")));
    }

    #[tokio::test]
    async fn should_prefer_group_when_both_exist() {
        let resolver = DefaultResolver::new(SpyStore::default());
        let cache = cache(vec![home()]);
        let mut a = action(ActionKind::Power, json!({}));

        let resolution = resolver.resolve(&mut a, &cache).await;

        assert_eq!(a.settings().light(), Some(TargetId::from("g-1")));
        assert_eq!(resolution.state, ResolutionState::Resolved);
    }

    #[tokio::test]
    async fn should_do_nothing_for_target_when_cache_empty() {
        let store = SpyStore::default();
        let resolver = DefaultResolver::new(store);
        let cache = SharedCache::new();
        let mut a = action(ActionKind::Power, json!({}));

        let resolution = resolver.resolve(&mut a, &cache).await;

        assert!(resolution.is_noop());
        assert_eq!(resolution.state, ResolutionState::Unconfigured);
        assert!(resolver.store().saves().is_empty());
    }

    #[tokio::test]
    async fn should_still_default_brightness_when_cache_empty() {
        let resolver = DefaultResolver::new(SpyStore::default());
        let mut a = action(ActionKind::Brightness, json!({}));

        let resolution = resolver.resolve(&mut a, &SharedCache::new()).await;

        assert_eq!(resolution.filled, vec![BRIGHTNESS]);
        assert_eq!(a.settings().get(BRIGHTNESS), Some(&json!(100)));
    }

    #[tokio::test]
    async fn should_persist_each_assignment_individually() {
        let resolver = DefaultResolver::new(SpyStore::default());
        let cache = cache(vec![home()]);
        let mut a = action(ActionKind::Brightness, json!({}));

        resolver.resolve(&mut a, &cache).await;

        let saves = resolver.store().saves();
        assert_eq!(saves.len(), 3);
        assert_eq!(saves[0].resolution_state(), ResolutionState::PartiallyResolved);
        assert!(!saves[0].contains(BRIGHTNESS));
        assert_eq!(saves[1].resolution_state(), ResolutionState::Resolved);
        assert!(saves[2].contains(BRIGHTNESS));
    }

    #[tokio::test]
    async fn should_leave_light_unresolved_when_bridge_has_no_targets() {
        let resolver = DefaultResolver::new(SpyStore::default());
        let cache = cache(vec![bridge("B1", "Home")]);
        let mut a = action(ActionKind::Power, json!({}));

        let resolution = resolver.resolve(&mut a, &cache).await;

        assert_eq!(resolution.filled, vec![BRIDGE]);
        assert_eq!(resolution.state, ResolutionState::PartiallyResolved);
        assert_eq!(resolver.store().saves().len(), 1);
    }

    #[tokio::test]
    async fn should_be_idempotent_on_second_pass() {
        let resolver = DefaultResolver::new(SpyStore::default());
        let cache = cache(vec![home(), bridge("B0", "Attic")]);
        let mut a = action(ActionKind::Brightness, json!({}));

        resolver.resolve(&mut a, &cache).await;
        let after_first = a.settings().clone();
        let second = resolver.resolve(&mut a, &cache).await;

        assert!(second.is_noop());
        assert_eq!(a.settings(), &after_first);
        assert_eq!(resolver.store().saves().len(), 3);
    }

    #[tokio::test]
    async fn should_never_overwrite_configured_bridge() {
        let resolver = DefaultResolver::new(SpyStore::default());
        let cache = cache(vec![bridge("A", "Alpha"), home()]);
        let mut a = action(ActionKind::Power, json!({"bridge": "X"}));

        resolver.resolve(&mut a, &cache).await;

        assert_eq!(a.settings().bridge(), Some(BridgeId::from("X")));
        assert!(a.settings().light().is_none());
    }

    #[tokio::test]
    async fn should_fill_light_under_configured_bridge() {
        let resolver = DefaultResolver::new(SpyStore::default());
        let cache = cache(vec![bridge("A", "Alpha"), home()]);
        let mut a = action(ActionKind::Power, json!({"bridge": "B1"}));

        let resolution = resolver.resolve(&mut a, &cache).await;

        assert_eq!(resolution.filled, vec![LIGHT]);
        assert_eq!(a.settings().light(), Some(TargetId::from("g-1")));
    }
}
