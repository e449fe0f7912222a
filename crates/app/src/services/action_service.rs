//! Action service: the registry of live keys and their use-cases.
//!
//! Owns the shared cache, the resolver and the dispatcher. Every cache
//! write made through this service re-runs default resolution for every
//! live action.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use huedeck_domain::action::{Action, ActionKind};
use huedeck_domain::cache::{BridgeCacheEntry, CacheSnapshot};
use huedeck_domain::command::KeyInput;
use huedeck_domain::error::{HueDeckError, NotFoundError};
use huedeck_domain::id::{ActionContext, BridgeId};
use huedeck_domain::settings::{ResolutionState, Settings};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::cache::SharedCache;
use crate::ports::{HostFeedback, LightController, SettingsStore};
use crate::services::default_resolver::{DefaultResolver, Resolution};
use crate::services::dispatcher::{DispatchOutcome, DispatchRequest, Dispatcher};

/// Read model of a live action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionView {
    pub context: ActionContext,
    pub kind: ActionKind,
    pub settings: Settings,
    pub state: ResolutionState,
}

impl ActionView {
    fn of(action: &Action) -> Self {
        Self {
            context: action.context().clone(),
            kind: action.kind(),
            settings: action.settings().clone(),
            state: action.settings().resolution_state(),
        }
    }
}

/// A key release as the host reports it.
#[derive(Debug, Clone, Default)]
pub struct KeyUp {
    /// Settings carried with the event. When present they are used for
    /// this press only; the action keeps its own settings.
    pub settings: Option<Settings>,
    /// Target state for two-state keys, `0` meaning off.
    pub desired_state: Option<u8>,
}

type SharedAction = Arc<Mutex<Action>>;

/// Application service for the lifecycle and key presses of actions.
pub struct ActionService<S, L, H> {
    cache: Arc<SharedCache>,
    resolver: DefaultResolver<S>,
    dispatcher: Dispatcher<L, H>,
    actions: RwLock<HashMap<ActionContext, SharedAction>>,
}

impl<S, L, H> ActionService<S, L, H>
where
    S: SettingsStore,
    L: LightController,
    H: HostFeedback,
{
    pub fn new(cache: Arc<SharedCache>, store: S, controller: L, feedback: H) -> Self {
        Self {
            cache,
            resolver: DefaultResolver::new(store),
            dispatcher: Dispatcher::new(controller, feedback),
            actions: RwLock::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    /// Register a key and resolve its defaults.
    ///
    /// Without explicit `settings`, the last persisted settings for this
    /// key are loaded; a key never seen before starts empty. A key that is
    /// already live is replaced.
    ///
    /// # Errors
    ///
    /// Returns a storage error if loading persisted settings fails.
    pub async fn will_appear(
        &self,
        context: ActionContext,
        kind: ActionKind,
        settings: Option<Settings>,
    ) -> Result<ActionView, HueDeckError> {
        let settings = match settings {
            Some(settings) => settings,
            None => self
                .resolver
                .store()
                .load(kind, &context)
                .await?
                .unwrap_or_default(),
        };

        let shared = Arc::new(Mutex::new(Action::new(context.clone(), kind, settings)));
        let mut action = shared.lock().await;
        if self.write_actions().insert(context, Arc::clone(&shared)).is_some() {
            tracing::debug!(context = %action.context(), "replaced live action");
        }
        self.resolver.resolve(&mut action, &self.cache).await;
        tracing::info!(context = %action.context(), %kind, "action appeared");
        Ok(ActionView::of(&action))
    }

    /// Forget a key. Its persisted settings are left to the host.
    ///
    /// # Errors
    ///
    /// Returns [`HueDeckError::NotFound`] if the key is not live.
    pub fn will_disappear(&self, context: &ActionContext) -> Result<(), HueDeckError> {
        if self.write_actions().remove(context).is_none() {
            return Err(not_found(context));
        }
        tracing::info!(%context, "action disappeared");
        Ok(())
    }

    /// Every live action, ordered by context.
    pub async fn list(&self) -> Vec<ActionView> {
        let mut live: Vec<(ActionContext, SharedAction)> = self
            .read_actions()
            .iter()
            .map(|(context, action)| (context.clone(), Arc::clone(action)))
            .collect();
        live.sort_by(|a, b| a.0.cmp(&b.0));

        let mut views = Vec::with_capacity(live.len());
        for (_, action) in live {
            views.push(ActionView::of(&*action.lock().await));
        }
        views
    }

    /// # Errors
    ///
    /// Returns [`HueDeckError::NotFound`] if the key is not live.
    pub async fn settings(&self, context: &ActionContext) -> Result<ActionView, HueDeckError> {
        let action = self.get(context)?;
        let guard = action.lock().await;
        Ok(ActionView::of(&guard))
    }

    /// Replace a key's settings, persist them, then fill any gaps.
    ///
    /// # Errors
    ///
    /// Returns [`HueDeckError::NotFound`] if the key is not live, or a
    /// storage error if the settings cannot be saved.
    pub async fn set_settings(
        &self,
        context: &ActionContext,
        settings: Settings,
    ) -> Result<ActionView, HueDeckError> {
        let action = self.get(context)?;
        let mut guard = action.lock().await;
        guard.set_settings(settings);
        self.resolver
            .store()
            .save(guard.kind(), guard.context(), guard.settings())
            .await?;
        self.resolver.resolve(&mut guard, &self.cache).await;
        Ok(ActionView::of(&guard))
    }

    /// Handle a key release: validate, send, and advance a cycle on success.
    ///
    /// The action lock is released while the command is in flight so cache
    /// refreshes are not held up by a slow bridge.
    ///
    /// # Errors
    ///
    /// Returns [`HueDeckError::NotFound`] if the key is not live. Rejections
    /// and device failures are reported through the outcome and the host
    /// feedback, not as errors.
    pub async fn key_up(
        &self,
        context: &ActionContext,
        event: KeyUp,
    ) -> Result<DispatchOutcome, HueDeckError> {
        let action = self.get(context)?;
        let request = {
            let guard = action.lock().await;
            DispatchRequest {
                context: context.clone(),
                kind: guard.kind(),
                settings: event
                    .settings
                    .unwrap_or_else(|| guard.settings().clone()),
                input: KeyInput {
                    desired_state: event.desired_state,
                    cycle_position: guard.cycle_position(),
                },
            }
        };

        let outcome = self.dispatcher.dispatch(&self.cache, request).await;
        if let DispatchOutcome::Applied(plan) = &outcome
            && let Some(step) = plan.cycle
        {
            action.lock().await.advance_cycle(step.used, step.len);
        }
        Ok(outcome)
    }

    /// Re-run default resolution for every live action.
    ///
    /// Actions are resolved one at a time; a save failing for one key does
    /// not stop the others.
    pub async fn cache_updated(&self) -> usize {
        let live: Vec<SharedAction> = self.read_actions().values().cloned().collect();
        let mut changed = 0;
        for action in live {
            let mut guard = action.lock().await;
            let Resolution { filled, .. } = self.resolver.resolve(&mut guard, &self.cache).await;
            if !filled.is_empty() {
                changed += 1;
            }
        }
        tracing::debug!(actions = changed, "resolution pass after cache update");
        changed
    }

    /// Replace the whole cache with a fresh discovery result.
    pub async fn replace_cache(&self, snapshot: CacheSnapshot) {
        tracing::info!(bridges = snapshot.len(), "cache replaced");
        self.cache.replace_all(snapshot);
        self.cache_updated().await;
    }

    /// Replace one bridge entry. Returns whether the bridge was already cached.
    pub async fn replace_bridge(&self, entry: BridgeCacheEntry) -> bool {
        let id = entry.id.clone();
        let known = self.cache.replace_bridge(entry);
        tracing::info!(bridge = %id, known, "bridge refreshed");
        self.cache_updated().await;
        known
    }

    /// Drop one bridge from the cache.
    ///
    /// Actions pointing at it keep their settings and are rejected at the
    /// next key press.
    ///
    /// # Errors
    ///
    /// Returns [`HueDeckError::NotFound`] if the bridge is not cached.
    pub async fn remove_bridge(&self, id: &BridgeId) -> Result<(), HueDeckError> {
        self.cache.remove_bridge(id).ok_or_else(|| NotFoundError {
            entity: "Bridge",
            id: id.to_string(),
        })?;
        tracing::info!(bridge = %id, "bridge removed");
        self.cache_updated().await;
        Ok(())
    }

    fn get(&self, context: &ActionContext) -> Result<SharedAction, HueDeckError> {
        self.read_actions()
            .get(context)
            .cloned()
            .ok_or_else(|| not_found(context))
    }

    fn read_actions(
        &self,
    ) -> std::sync::RwLockReadGuard<'_, HashMap<ActionContext, SharedAction>> {
        self.actions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_actions(
        &self,
    ) -> std::sync::RwLockWriteGuard<'_, HashMap<ActionContext, SharedAction>> {
        self.actions.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn not_found(context: &ActionContext) -> HueDeckError {
    NotFoundError {
        entity: "Action",
        id: context.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use huedeck_domain::cache::CachedTarget;
    use huedeck_domain::command::{StateCommand, Target};
    use huedeck_domain::id::TargetId;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::future::Future;
    use std::sync::Mutex as StdMutex;
    use tokio::sync::oneshot;

    // ── In-memory fakes ────────────────────────────────────────────

    #[derive(Default)]
    struct InMemoryStore {
        rows: StdMutex<HashMap<(ActionKind, ActionContext), Settings>>,
        saves: StdMutex<usize>,
    }

    impl SettingsStore for InMemoryStore {
        fn save(
            &self,
            kind: ActionKind,
            context: &ActionContext,
            settings: &Settings,
        ) -> impl Future<Output = Result<(), HueDeckError>> + Send {
            self.rows
                .lock()
                .unwrap()
                .insert((kind, context.clone()), settings.clone());
            *self.saves.lock().unwrap() += 1;
            async {
                tokio::task::yield_now().await;
                Ok(())
            }
        }

        fn load(
            &self,
            kind: ActionKind,
            context: &ActionContext,
        ) -> impl Future<Output = Result<Option<Settings>, HueDeckError>> + Send {
            let found = self
                .rows
                .lock()
                .unwrap()
                .get(&(kind, context.clone()))
                .cloned();
            async { Ok(found) }
        }
    }

    #[derive(Default)]
    struct RecordingController {
        sent: StdMutex<Vec<StateCommand>>,
    }

    impl LightController for RecordingController {
        fn send(
            &self,
            _target: &Target,
            command: &StateCommand,
        ) -> impl Future<Output = Result<(), HueDeckError>> + Send {
            self.sent.lock().unwrap().push(command.clone());
            async { Ok(()) }
        }
    }

    /// Parks each command until its gate is opened, in arrival order.
    #[derive(Default)]
    struct GatedController {
        sent: StdMutex<Vec<StateCommand>>,
        gates: StdMutex<VecDeque<oneshot::Receiver<()>>>,
    }

    impl GatedController {
        fn gate(&self) -> oneshot::Sender<()> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().unwrap().push_back(rx);
            tx
        }
    }

    impl LightController for GatedController {
        fn send(
            &self,
            _target: &Target,
            command: &StateCommand,
        ) -> impl Future<Output = Result<(), HueDeckError>> + Send {
            self.sent.lock().unwrap().push(command.clone());
            let gate = self.gates.lock().unwrap().pop_front();
            async move {
                if let Some(gate) = gate {
                    let _ = gate.await;
                }
                Ok(())
            }
        }
    }

    #[derive(Default)]
    struct SilentFeedback {
        alerts: StdMutex<usize>,
    }

    impl HostFeedback for SilentFeedback {
        fn log_message(&self, _message: &str) {}

        fn show_alert(&self, _context: &ActionContext) {
            *self.alerts.lock().unwrap() += 1;
        }
    }

    type TestService =
        ActionService<Arc<InMemoryStore>, Arc<RecordingController>, Arc<SilentFeedback>>;

    struct Harness {
        service: TestService,
        store: Arc<InMemoryStore>,
        controller: Arc<RecordingController>,
        feedback: Arc<SilentFeedback>,
    }

    fn harness(snapshot: CacheSnapshot) -> Harness {
        let store = Arc::new(InMemoryStore::default());
        let controller = Arc::new(RecordingController::default());
        let feedback = Arc::new(SilentFeedback::default());
        let service = ActionService::new(
            Arc::new(SharedCache::from_snapshot(snapshot)),
            Arc::clone(&store),
            Arc::clone(&controller),
            Arc::clone(&feedback),
        );
        Harness {
            service,
            store,
            controller,
            feedback,
        }
    }

    fn home() -> BridgeCacheEntry {
        BridgeCacheEntry::new(BridgeId::from("B1"), "Home", "10.0.0.2", "user")
            .with_light(CachedTarget::new("3", "Desk"))
            .with_group(CachedTarget::new("1", "Living"))
    }

    fn ctx(id: &str) -> ActionContext {
        ActionContext::from(id)
    }

    fn settings(value: serde_json::Value) -> Settings {
        serde_json::from_value(value).unwrap()
    }

    // ── Tests ──────────────────────────────────────────────────────

    #[tokio::test]
    async fn should_resolve_defaults_when_action_appears() {
        let h = harness(std::iter::once(home()).collect());

        let view = h
            .service
            .will_appear(ctx("k1"), ActionKind::Brightness, None)
            .await
            .unwrap();

        assert_eq!(view.state, ResolutionState::Resolved);
        assert_eq!(view.settings.light(), Some(TargetId::from("g-1")));
        assert_eq!(view.settings.get("brightness"), Some(&json!(100)));
        assert_eq!(*h.store.saves.lock().unwrap(), 3);
    }

    #[tokio::test]
    async fn should_load_persisted_settings_when_none_given() {
        let h = harness(CacheSnapshot::new());
        h.store
            .save(
                ActionKind::Power,
                &ctx("k1"),
                &settings(json!({"bridge": "B9", "light": "l-9"})),
            )
            .await
            .unwrap();

        let view = h
            .service
            .will_appear(ctx("k1"), ActionKind::Power, None)
            .await
            .unwrap();

        assert_eq!(view.settings.bridge(), Some(BridgeId::from("B9")));
    }

    #[tokio::test]
    async fn should_resolve_pending_actions_when_cache_arrives() {
        let h = harness(CacheSnapshot::new());
        h.service
            .will_appear(ctx("k1"), ActionKind::Power, None)
            .await
            .unwrap();

        h.service.replace_bridge(home()).await;

        let view = h.service.settings(&ctx("k1")).await.unwrap();
        assert_eq!(view.state, ResolutionState::Resolved);
    }

    #[tokio::test]
    async fn should_return_not_found_for_unknown_context() {
        let h = harness(CacheSnapshot::new());

        let err = h.service.settings(&ctx("nope")).await.unwrap_err();

        assert!(matches!(err, HueDeckError::NotFound(_)));
        assert!(h.service.will_disappear(&ctx("nope")).is_err());
    }

    #[tokio::test]
    async fn should_forget_action_on_disappear() {
        let h = harness(CacheSnapshot::new());
        h.service
            .will_appear(ctx("k1"), ActionKind::Power, None)
            .await
            .unwrap();

        h.service.will_disappear(&ctx("k1")).unwrap();

        assert!(h.service.list().await.is_empty());
    }

    #[tokio::test]
    async fn should_persist_settings_set_by_host() {
        let h = harness(std::iter::once(home()).collect());
        h.service
            .will_appear(ctx("k1"), ActionKind::Power, Some(Settings::new()))
            .await
            .unwrap();

        let view = h
            .service
            .set_settings(&ctx("k1"), settings(json!({"bridge": "B1", "light": "l-3"})))
            .await
            .unwrap();

        assert_eq!(view.settings.light(), Some(TargetId::from("l-3")));
        let stored = h
            .store
            .load(ActionKind::Power, &ctx("k1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.light(), Some(TargetId::from("l-3")));
    }

    #[tokio::test]
    async fn should_advance_cycle_after_successful_press() {
        let h = harness(std::iter::once(home()).collect());
        h.service
            .will_appear(
                ctx("k1"),
                ActionKind::Cycle,
                Some(settings(json!({"colors": ["#ff0000", "#0000ff"]}))),
            )
            .await
            .unwrap();

        for _ in 0..3 {
            let outcome = h.service.key_up(&ctx("k1"), KeyUp::default()).await.unwrap();
            assert!(outcome.is_applied());
        }

        let sent = h.controller.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[0], sent[2]);
        assert_ne!(sent[0], sent[1]);
    }

    #[tokio::test]
    async fn should_reject_press_after_bridge_removed() {
        let h = harness(std::iter::once(home()).collect());
        h.service
            .will_appear(ctx("k1"), ActionKind::Power, None)
            .await
            .unwrap();

        h.service.remove_bridge(&BridgeId::from("B1")).await.unwrap();
        let outcome = h.service.key_up(&ctx("k1"), KeyUp::default()).await.unwrap();

        assert_eq!(
            outcome.error().map(ToString::to_string).as_deref(),
            Some("Bridge B1 not found in cache")
        );
        assert!(h.controller.sent.lock().unwrap().is_empty());
        assert_eq!(*h.feedback.alerts.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn should_fail_removing_unknown_bridge() {
        let h = harness(CacheSnapshot::new());

        let err = h.service.remove_bridge(&BridgeId::from("B1")).await.unwrap_err();

        assert_eq!(err.to_string(), "Bridge B1 not found");
    }

    #[tokio::test]
    async fn should_use_settings_carried_by_key_event() {
        let h = harness(std::iter::once(home()).collect());
        h.service
            .will_appear(ctx("k1"), ActionKind::Brightness, None)
            .await
            .unwrap();

        h.service
            .key_up(
                &ctx("k1"),
                KeyUp {
                    settings: Some(settings(
                        json!({"bridge": "B1", "light": "l-3", "brightness": 50}),
                    )),
                    desired_state: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(
            *h.controller.sent.lock().unwrap(),
            vec![StateCommand::Brightness(127)]
        );
    }

    #[tokio::test]
    async fn should_keep_own_settings_after_press_with_event_settings() {
        let h = harness(std::iter::once(home()).collect());
        let before = h
            .service
            .will_appear(ctx("k1"), ActionKind::Brightness, None)
            .await
            .unwrap()
            .settings;

        h.service
            .key_up(
                &ctx("k1"),
                KeyUp {
                    settings: Some(settings(
                        json!({"bridge": "B1", "light": "l-3", "brightness": 50}),
                    )),
                    desired_state: None,
                },
            )
            .await
            .unwrap();
        h.service
            .key_up(&ctx("k1"), KeyUp::default())
            .await
            .unwrap();

        let after = h.service.settings(&ctx("k1")).await.unwrap().settings;
        assert_eq!(after, before);
        assert_eq!(
            *h.controller.sent.lock().unwrap(),
            vec![StateCommand::Brightness(127), StateCommand::Brightness(254)]
        );
        let stored = h
            .store
            .load(ActionKind::Brightness, &ctx("k1"))
            .await
            .unwrap();
        assert_eq!(stored, Some(before));
    }

    #[tokio::test]
    async fn should_list_actions_sorted_by_context() {
        let h = harness(CacheSnapshot::new());
        for id in ["k2", "k1", "k3"] {
            h.service
                .will_appear(ctx(id), ActionKind::Power, None)
                .await
                .unwrap();
        }

        let contexts: Vec<_> = h
            .service
            .list()
            .await
            .into_iter()
            .map(|v| v.context.to_string())
            .collect();

        assert_eq!(contexts, vec!["k1", "k2", "k3"]);
    }
    fn brightness_press(percent: u8) -> KeyUp {
        KeyUp {
            settings: Some(settings(
                json!({"bridge": "B1", "light": "l-3", "brightness": percent}),
            )),
            desired_state: None,
        }
    }

    type GatedService =
        ActionService<Arc<InMemoryStore>, Arc<GatedController>, Arc<SilentFeedback>>;

    fn cached_desk_brightness(service: &GatedService) -> Option<u8> {
        service.cache().read(|snapshot| {
            snapshot
                .get(&BridgeId::from("B1"))
                .and_then(|b| b.target(&TargetId::from("l-3")))
                .and_then(|t| t.brightness)
        })
    }

    #[tokio::test]
    async fn should_let_second_press_run_while_first_is_in_flight() {
        let controller = Arc::new(GatedController::default());
        let service: GatedService = ActionService::new(
            Arc::new(SharedCache::from_snapshot(std::iter::once(home()).collect())),
            Arc::new(InMemoryStore::default()),
            Arc::clone(&controller),
            Arc::new(SilentFeedback::default()),
        );
        let k1 = ctx("k1");
        service
            .will_appear(k1.clone(), ActionKind::Brightness, None)
            .await
            .unwrap();
        let first_gate = controller.gate();
        let second_gate = controller.gate();

        let release = async {
            while controller.sent.lock().unwrap().len() < 2 {
                tokio::task::yield_now().await;
            }
            second_gate.send(()).unwrap();
            while cached_desk_brightness(&service) != Some(203) {
                tokio::task::yield_now().await;
            }
            first_gate.send(()).unwrap();
        };
        let (first, second, ()) = tokio::join!(
            service.key_up(&k1, brightness_press(20)),
            service.key_up(&k1, brightness_press(80)),
            release,
        );

        assert!(first.unwrap().is_applied());
        assert!(second.unwrap().is_applied());
        assert_eq!(
            *controller.sent.lock().unwrap(),
            vec![StateCommand::Brightness(51), StateCommand::Brightness(203)]
        );
        assert_eq!(cached_desk_brightness(&service), Some(51));
    }

    #[tokio::test]
    async fn should_serialize_resolution_passes_for_one_action() {
        let h = harness(CacheSnapshot::new());
        h.service
            .will_appear(ctx("k1"), ActionKind::Power, None)
            .await
            .unwrap();
        h.service
            .cache()
            .replace_all(std::iter::once(home()).collect());

        let (a, b) = tokio::join!(h.service.cache_updated(), h.service.cache_updated());

        assert_eq!(a + b, 1);
        assert_eq!(*h.store.saves.lock().unwrap(), 2);
        let view = h.service.settings(&ctx("k1")).await.unwrap();
        assert_eq!(view.settings.light(), Some(TargetId::from("g-1")));
    }
}
