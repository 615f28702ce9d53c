use std::sync::{Arc, RwLock, Weak};

use serde_json::Value;
use tracing::debug;

use crate::action::{self, Action, ActionCreator, ActionDecl, Actions, Dispatch};
use crate::container::{Container, Unsubscribe};
use crate::error::ModlinkError;
use crate::path::{self, PathParts};

/// Optional lifecycle hooks a module's controller may implement.
///
/// All hooks default to no-ops; `()` implements the trait for modules that
/// need no controller state. `state_did_update` receives both the previous
/// and the next slice; it only fires when the slice actually changed
/// (value inequality).
///
/// Hooks run while the module holds its internal controller lock, so a
/// hook must not dispatch; subscribers registered via
/// [`Module::subscribe`] may.
pub trait Controller: Send + Sync + 'static {
    fn state_did_update(&mut self, _prev: Option<&Value>, _next: Option<&Value>) {}
    fn did_linked_with_store(&mut self) {}
    fn did_unlinked_with_store(&mut self) {}
}

impl Controller for () {}

/// Own-state change callback: `(previous slice, next slice)`.
///
/// Listener identity is `Arc` pointer identity: subscribing the same `Arc`
/// twice keeps a single entry.
pub type ChangeListener = Arc<dyn Fn(Option<&Value>, Option<&Value>) + Send + Sync>;

/// The reducer a module is integrated with, bound to its scope.
///
/// Called with `(current slice, action, full path)`. Repeat integrations
/// at an equal path return the same `Arc`.
pub type BoundReducer = Arc<dyn Fn(Option<&Value>, &Action, &str) -> Value + Send + Sync>;

/// The reducer signature a module is configured with.
///
/// The [`Scope`] argument carries what the reducer may know about its
/// owning module: the integration path and the resolved action table.
pub type ReducerFn = dyn Fn(Option<&Value>, &Action, &Scope<'_>) -> Value + Send + Sync;

/// What a reducer can see of its owning module while reducing.
pub struct Scope<'a> {
    path: &'a str,
    actions: &'a Actions,
}

impl<'a> Scope<'a> {
    pub(crate) fn new(path: &'a str, actions: &'a Actions) -> Self {
        Self { path, actions }
    }

    /// The full integration path this reducer was invoked at.
    pub fn path(&self) -> &str {
        self.path
    }

    /// The module's resolved action table.
    pub fn actions(&self) -> &Actions {
        self.actions
    }

    /// Shorthand for the resolved wire type of a declared action.
    pub fn kind_of(&self, name: &str) -> Option<&str> {
        self.actions.kind_of(name)
    }
}

/// Everything needed to create a module: a controller value, the module's
/// reducer, and its action declarations.
pub struct ModuleConfig<C: Controller> {
    pub(crate) controller: C,
    pub(crate) reducer: Box<ReducerFn>,
    pub(crate) actions: Vec<(String, ActionDecl)>,
}

impl<C: Controller> ModuleConfig<C> {
    pub fn new(
        controller: C,
        reducer: impl Fn(Option<&Value>, &Action, &Scope<'_>) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            controller,
            reducer: Box::new(reducer),
            actions: Vec::new(),
        }
    }

    /// Add one action declaration. Declaration order is preserved.
    pub fn action(mut self, name: impl Into<String>, decl: ActionDecl) -> Self {
        self.actions.push((name.into(), decl));
        self
    }
}

/// Link-state half of a module: path, cached slice, store connection.
struct LinkState {
    path: Option<String>,
    own_state: Option<Value>,
    store: Option<Arc<dyn Container>>,
    store_unsub: Option<Unsubscribe>,
}

pub(crate) struct ModuleInner<C: Controller> {
    actions: Actions,
    bound: BoundReducer,
    link: RwLock<LinkState>,
    controller: RwLock<C>,
    listeners: RwLock<Vec<ChangeListener>>,
    weak_self: Weak<ModuleInner<C>>,
}

/// The registry- and composition-facing surface of a module, independent
/// of its controller type.
pub(crate) trait ModuleLink: Send + Sync {
    /// Attach to a store: cache the current slice, subscribe to change
    /// notifications, fire `did_linked_with_store`. Fails while no path
    /// has been integrated.
    fn connect(&self, store: Arc<dyn Container>) -> Result<(), ModlinkError>;

    /// Release the store subscription and handle, fire
    /// `did_unlinked_with_store`. No-op when not connected.
    fn disconnect(&self);

    /// Assign the (already normalized) path and return the bound reducer.
    fn integrate_at(&self, normalized: &str) -> Result<BoundReducer, ModlinkError>;
}

impl<C: Controller> ModuleInner<C> {
    /// Recompute the own-state slice after a store notification and, only
    /// on change, fire the hook and every subscriber.
    fn handle_store_change(&self) {
        let (store, path) = {
            let link = self.link.read().unwrap();
            match (&link.store, &link.path) {
                (Some(store), Some(path)) => (store.clone(), path.clone()),
                _ => return,
            }
        };

        let state = store.get_state();
        let next = path::read(&state, &path).cloned();

        let prev = {
            let mut link = self.link.write().unwrap();
            if link.own_state == next {
                return;
            }
            std::mem::replace(&mut link.own_state, next.clone())
        };

        self.controller
            .write()
            .unwrap()
            .state_did_update(prev.as_ref(), next.as_ref());

        // Locks are released before fan-out so listeners may dispatch.
        let listeners: Vec<ChangeListener> = self.listeners.read().unwrap().clone();
        for listener in &listeners {
            listener(prev.as_ref(), next.as_ref());
        }
    }

    fn add_listener(&self, listener: &ChangeListener) {
        let mut listeners = self.listeners.write().unwrap();
        if !listeners.iter().any(|l| Arc::ptr_eq(l, listener)) {
            listeners.push(listener.clone());
        }
    }

    fn remove_listener(&self, listener: &ChangeListener) {
        self.listeners
            .write()
            .unwrap()
            .retain(|l| !Arc::ptr_eq(l, listener));
    }
}

impl<C: Controller> Dispatch for ModuleInner<C> {
    fn dispatch_action(&self, action: Action) -> Result<(), ModlinkError> {
        let store = { self.link.read().unwrap().store.clone() }.ok_or_else(|| {
            ModlinkError::WrongInterface("can not dispatch while store is not linked".to_string())
        })?;
        store.dispatch(action);
        Ok(())
    }
}

impl<C: Controller> ModuleLink for ModuleInner<C> {
    fn connect(&self, store: Arc<dyn Container>) -> Result<(), ModlinkError> {
        let path = { self.link.read().unwrap().path.clone() }.ok_or_else(|| {
            ModlinkError::InsufficientData(
                "module has no integrated path: call integrate before linking".to_string(),
            )
        })?;

        let state = store.get_state();
        let own_state = path::read(&state, &path).cloned();

        let weak = self.weak_self.clone();
        let store_unsub = store.subscribe(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.handle_store_change();
            }
        }));

        {
            let mut link = self.link.write().unwrap();
            link.own_state = own_state;
            link.store = Some(store);
            link.store_unsub = Some(store_unsub);
        }
        debug!("modlink: module connected at \"{path}\"");

        self.controller.write().unwrap().did_linked_with_store();
        Ok(())
    }

    fn disconnect(&self) {
        let store_unsub = {
            let mut link = self.link.write().unwrap();
            if link.store.take().is_none() {
                return;
            }
            link.store_unsub.take()
        };
        if let Some(unsub) = store_unsub {
            unsub();
        }
        debug!("modlink: module disconnected");

        self.controller.write().unwrap().did_unlinked_with_store();
    }

    fn integrate_at(&self, normalized: &str) -> Result<BoundReducer, ModlinkError> {
        let mut link = self.link.write().unwrap();
        match &link.path {
            None => link.path = Some(normalized.to_string()),
            Some(current) if current == normalized => {}
            Some(current) => {
                return Err(ModlinkError::InvalidParameters(format!(
                    "attempt to change a path of integration: \"{current}\" -> \"{normalized}\""
                )));
            }
        }
        Ok(self.bound.clone())
    }
}

/// A module handle: one reducer, one slice of the shared state tree, one
/// controller.
///
/// Created by [`Registry::create_module`](crate::registry::Registry::create_module)
/// independently of any store; connected and disconnected in bulk through
/// the registry's link/unlink cycle. Cloning the handle is cheap and
/// aliases the same module.
pub struct Module<C: Controller> {
    inner: Arc<ModuleInner<C>>,
}

impl<C: Controller> Clone for Module<C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<C: Controller> Module<C> {
    /// Build a module from its configuration. Does not register it; the
    /// registry does that so link cycles can find it.
    pub(crate) fn from_config(config: ModuleConfig<C>) -> Result<Self, ModlinkError> {
        action::validate_decls(&config.actions)?;

        let ModuleConfig {
            controller,
            reducer,
            actions,
        } = config;
        let suffix = action::next_suffix();

        let inner = Arc::new_cyclic(|weak: &Weak<ModuleInner<C>>| {
            let dispatcher: Weak<dyn Dispatch> = weak.clone();
            let actions = action::build_actions(actions, suffix, dispatcher);

            let bound: BoundReducer = {
                let weak = weak.clone();
                Arc::new(move |state: Option<&Value>, action: &Action, full_path: &str| {
                    match weak.upgrade() {
                        Some(inner) => {
                            let scope = Scope::new(full_path, &inner.actions);
                            (reducer)(state, action, &scope)
                        }
                        None => state.cloned().unwrap_or(Value::Null),
                    }
                })
            };

            ModuleInner {
                actions,
                bound,
                link: RwLock::new(LinkState {
                    path: None,
                    own_state: None,
                    store: None,
                    store_unsub: None,
                }),
                controller: RwLock::new(controller),
                listeners: RwLock::new(Vec::new()),
                weak_self: weak.clone(),
            }
        });

        Ok(Self { inner })
    }

    pub(crate) fn link_handle(&self) -> Arc<dyn ModuleLink> {
        self.inner.clone()
    }

    /// Declare this module's position in the global state tree and obtain
    /// its bound reducer for composition into the store's root reducer.
    ///
    /// The first call fixes the path; repeating it with an equal
    /// normalized path (any shape) is a no-op returning the same reducer
    /// `Arc`; a different path fails with `InvalidParameters`.
    pub fn integrate(&self, path: impl Into<PathParts>) -> Result<BoundReducer, ModlinkError> {
        let normalized = path::normalize(&path.into())?;
        self.inner.integrate_at(&normalized)
    }

    /// The normalized integration path, if one was assigned.
    pub fn path(&self) -> Option<String> {
        self.inner.link.read().unwrap().path.clone()
    }

    /// The cached own-state slice. `None` whenever no store is linked,
    /// even if a value was cached before disconnecting.
    pub fn own_state(&self) -> Option<Value> {
        let link = self.inner.link.read().unwrap();
        if link.store.is_some() {
            link.own_state.clone()
        } else {
            None
        }
    }

    /// Whether a store is currently attached.
    pub fn is_linked(&self) -> bool {
        self.inner.link.read().unwrap().store.is_some()
    }

    /// Forward an action to the linked store. Fails with `WrongInterface`
    /// while no store is attached.
    pub fn dispatch(&self, action: Action) -> Result<(), ModlinkError> {
        self.inner.dispatch_action(action)
    }

    /// The module's resolved action table.
    pub fn actions(&self) -> &Actions {
        &self.inner.actions
    }

    /// Look up one action creator by declaration name.
    pub fn action(&self, name: &str) -> Option<&ActionCreator> {
        self.inner.actions.get(name)
    }

    /// Register an own-state change listener.
    ///
    /// Subscribing the same `Arc` twice keeps one entry. The returned
    /// handle closes over that exact listener; subscriptions survive
    /// unlink/relink cycles until released.
    pub fn subscribe(&self, listener: ChangeListener) -> Unsubscribe {
        self.inner.add_listener(&listener);

        let weak = Arc::downgrade(&self.inner);
        Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.remove_listener(&listener);
            }
        })
    }

    /// Convenience wrapper around [`Module::subscribe`] for plain closures.
    pub fn subscribe_fn(
        &self,
        listener: impl Fn(Option<&Value>, Option<&Value>) + Send + Sync + 'static,
    ) -> Unsubscribe {
        self.subscribe(Arc::new(listener))
    }

    /// Read access to the controller.
    pub fn controller(&self) -> std::sync::RwLockReadGuard<'_, C> {
        self.inner.controller.read().unwrap()
    }

    /// Write access to the controller.
    pub fn controller_mut(&self) -> std::sync::RwLockWriteGuard<'_, C> {
        self.inner.controller.write().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::MemoryStore;
    use serde_json::json;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Counter module: `{count}` slice, `increment`/`set` actions.
    fn counter_config() -> ModuleConfig<()> {
        ModuleConfig::new((), |state: Option<&Value>, action, scope| {
            let count = state
                .and_then(|s| s.get("count"))
                .and_then(Value::as_i64)
                .unwrap_or(0);
            if Some(action.kind.as_str()) == scope.kind_of("increment") {
                json!({"count": count + 1})
            } else if Some(action.kind.as_str()) == scope.kind_of("set") {
                json!({"count": action.payload["value"].as_i64().unwrap_or(0)})
            } else {
                state.cloned().unwrap_or(json!({"count": 0}))
            }
        })
        .action("increment", ActionDecl::Empty)
        .action(
            "set",
            ActionDecl::with_creator("SET", |args| json!({"value": args.first().cloned()})),
        )
    }

    fn counter_module() -> Module<()> {
        Module::from_config(counter_config()).unwrap()
    }

    /// Root reducer delegating the "counter" slice to the module.
    fn root_for(module: &Module<()>) -> crate::container::RootReducer {
        let bound = module.integrate("counter").unwrap();
        Box::new(move |state, action| {
            let slice = state.and_then(|s| path::read(s, "counter"));
            json!({"counter": bound(slice, action, "counter")})
        })
    }

    fn connected(module: &Module<()>) -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new(root_for(module), None));
        module.link_handle().connect(store.clone()).unwrap();
        store
    }

    // ========================================================================
    // Integration / path immutability
    // ========================================================================

    #[test]
    fn integrate_assigns_path() {
        let module = counter_module();
        assert_eq!(module.path(), None);
        module.integrate("counter").unwrap();
        assert_eq!(module.path().as_deref(), Some("counter"));
    }

    #[test]
    fn integrate_same_path_returns_same_reducer() {
        let module = counter_module();
        let first = module.integrate("a.b").unwrap();
        let second = module.integrate("a.b").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn integrate_equal_after_normalization_is_noop() {
        let module = counter_module();
        let first = module.integrate("a.b").unwrap();
        let second = module.integrate(vec!["a", "b"]).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn integrate_different_path_fails() {
        let module = counter_module();
        module.integrate("a.b").unwrap();
        let err = module.integrate("a.c").err().unwrap();
        assert!(matches!(err, ModlinkError::InvalidParameters(_)));
        // Original path is retained.
        assert_eq!(module.path().as_deref(), Some("a.b"));
    }

    #[test]
    fn integrate_bad_paths_fail() {
        let module = counter_module();
        assert!(module.integrate("").is_err());
        assert!(module.integrate(Vec::<&str>::new()).is_err());
        assert!(module.integrate(vec!["a", "", ""]).is_err());
        assert!(module.integrate("0").is_ok());
    }

    // ========================================================================
    // Connect / disconnect lifecycle
    // ========================================================================

    #[test]
    fn connect_without_path_fails() {
        let module = counter_module();
        let other = counter_module();
        let store = Arc::new(MemoryStore::new(root_for(&other), None));

        let err = module.link_handle().connect(store).unwrap_err();
        assert!(matches!(err, ModlinkError::InsufficientData(_)));
    }

    #[test]
    fn connect_caches_own_state() {
        let module = counter_module();
        assert_eq!(module.own_state(), None);
        connected(&module);
        assert_eq!(module.own_state(), Some(json!({"count": 0})));
        assert!(module.is_linked());
    }

    #[test]
    fn disconnect_makes_own_state_unreadable() {
        let module = counter_module();
        connected(&module);
        module.link_handle().disconnect();
        assert_eq!(module.own_state(), None);
        assert!(!module.is_linked());
        // Path survives the disconnect.
        assert_eq!(module.path().as_deref(), Some("counter"));
    }

    #[test]
    fn disconnect_without_connection_is_guarded() {
        let module = counter_module();
        module.link_handle().disconnect();
        assert!(!module.is_linked());
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    #[test]
    fn dispatch_without_store_fails() {
        let module = counter_module();
        let err = module.dispatch(Action::new("x", Value::Null)).unwrap_err();
        assert!(matches!(err, ModlinkError::WrongInterface(_)));
    }

    #[test]
    fn action_creator_drives_own_state() {
        let module = counter_module();
        let store = connected(&module);

        module.action("increment").unwrap().dispatch(&[]).unwrap();
        module.action("increment").unwrap().dispatch(&[]).unwrap();

        assert_eq!(module.own_state(), Some(json!({"count": 2})));
        assert_eq!(store.get_state(), json!({"counter": {"count": 2}}));
    }

    #[test]
    fn creator_payload_reaches_reducer() {
        let module = counter_module();
        connected(&module);

        module.action("set").unwrap().dispatch(&[json!(42)]).unwrap();
        assert_eq!(module.own_state(), Some(json!({"count": 42})));
    }

    #[test]
    fn dispatch_after_disconnect_fails() {
        let module = counter_module();
        connected(&module);
        module.link_handle().disconnect();

        let err = module.action("increment").unwrap().dispatch(&[]).unwrap_err();
        assert!(matches!(err, ModlinkError::WrongInterface(_)));
    }

    // ========================================================================
    // Subscriptions and change detection
    // ========================================================================

    #[test]
    fn subscriber_fires_on_change() {
        let module = counter_module();
        connected(&module);

        let seen = Arc::new(RwLock::new(Vec::<(Option<Value>, Option<Value>)>::new()));
        let seen_c = seen.clone();
        let _unsub = module.subscribe_fn(move |prev, next| {
            seen_c
                .write()
                .unwrap()
                .push((prev.cloned(), next.cloned()));
        });

        module.action("increment").unwrap().dispatch(&[]).unwrap();

        let seen = seen.read().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, Some(json!({"count": 0})));
        assert_eq!(seen[0].1, Some(json!({"count": 1})));
    }

    #[test]
    fn equal_slice_suppresses_notifications() {
        let module = counter_module();
        connected(&module);

        let calls = Arc::new(AtomicU64::new(0));
        let c = calls.clone();
        let _unsub = module.subscribe_fn(move |_, _| {
            c.fetch_add(1, Ordering::Relaxed);
        });

        // "set 0" reduces to a value deep-equal to the current slice.
        module.action("set").unwrap().dispatch(&[json!(0)]).unwrap();
        assert_eq!(calls.load(Ordering::Relaxed), 0);

        module.action("set").unwrap().dispatch(&[json!(1)]).unwrap();
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn same_listener_arc_subscribed_twice_fires_once() {
        let module = counter_module();
        connected(&module);

        let calls = Arc::new(AtomicU64::new(0));
        let c = calls.clone();
        let listener: ChangeListener = Arc::new(move |_, _| {
            c.fetch_add(1, Ordering::Relaxed);
        });

        let _a = module.subscribe(listener.clone());
        let _b = module.subscribe(listener.clone());

        module.action("increment").unwrap().dispatch(&[]).unwrap();
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn distinct_listeners_both_fire() {
        let module = counter_module();
        connected(&module);

        let calls = Arc::new(AtomicU64::new(0));
        let a = calls.clone();
        let b = calls.clone();
        let _ua = module.subscribe_fn(move |_, _| {
            a.fetch_add(1, Ordering::Relaxed);
        });
        let _ub = module.subscribe_fn(move |_, _| {
            b.fetch_add(1, Ordering::Relaxed);
        });

        module.action("increment").unwrap().dispatch(&[]).unwrap();
        assert_eq!(calls.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn unsubscribe_closes_over_exact_listener() {
        let module = counter_module();
        connected(&module);

        let calls = Arc::new(AtomicU64::new(0));
        let a = calls.clone();
        let b = calls.clone();
        let unsub_a = module.subscribe_fn(move |_, _| {
            a.fetch_add(1, Ordering::Relaxed);
        });
        let _ub = module.subscribe_fn(move |_, _| {
            b.fetch_add(10, Ordering::Relaxed);
        });

        unsub_a();
        module.action("increment").unwrap().dispatch(&[]).unwrap();
        assert_eq!(calls.load(Ordering::Relaxed), 10);
    }

    #[test]
    fn subscribers_survive_relink() {
        let module = counter_module();
        let store = connected(&module);

        let calls = Arc::new(AtomicU64::new(0));
        let c = calls.clone();
        let _unsub = module.subscribe_fn(move |_, _| {
            c.fetch_add(1, Ordering::Relaxed);
        });

        module.link_handle().disconnect();
        drop(store);

        // Re-connect against a fresh store; the old subscription still fires.
        let bound = module.integrate("counter").unwrap();
        let root: crate::container::RootReducer = Box::new(move |state, action| {
            let slice = state.and_then(|s| path::read(s, "counter"));
            json!({"counter": bound(slice, action, "counter")})
        });
        let fresh = Arc::new(MemoryStore::new(root, None));
        module.link_handle().connect(fresh).unwrap();

        module.action("increment").unwrap().dispatch(&[]).unwrap();
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn listener_may_dispatch() {
        let module = counter_module();
        connected(&module);

        let chained = module.clone();
        let _unsub = module.subscribe_fn(move |_, next| {
            let count = next
                .and_then(|v| v.get("count"))
                .and_then(Value::as_i64)
                .unwrap_or(0);
            if count == 1 {
                chained.action("increment").unwrap().dispatch(&[]).unwrap();
            }
        });

        module.action("increment").unwrap().dispatch(&[]).unwrap();
        assert_eq!(module.own_state(), Some(json!({"count": 2})));
    }

    // ========================================================================
    // Controller hooks
    // ========================================================================

    #[derive(Default)]
    struct Recorder {
        updates: Vec<(Option<Value>, Option<Value>)>,
        linked: u64,
        unlinked: u64,
    }

    impl Controller for Recorder {
        fn state_did_update(&mut self, prev: Option<&Value>, next: Option<&Value>) {
            self.updates.push((prev.cloned(), next.cloned()));
        }

        fn did_linked_with_store(&mut self) {
            self.linked += 1;
        }

        fn did_unlinked_with_store(&mut self) {
            self.unlinked += 1;
        }
    }

    fn recorder_module() -> Module<Recorder> {
        Module::from_config(
            ModuleConfig::new(
                Recorder::default(),
                |state: Option<&Value>, action, scope| {
                    if Some(action.kind.as_str()) == scope.kind_of("bump") {
                        let n = state.and_then(Value::as_i64).unwrap_or(0);
                        json!(n + 1)
                    } else {
                        state.cloned().unwrap_or(json!(0))
                    }
                },
            )
            .action("bump", ActionDecl::Empty),
        )
        .unwrap()
    }

    fn recorder_connected(module: &Module<Recorder>) -> Arc<MemoryStore> {
        let bound = module.integrate("n").unwrap();
        let root: crate::container::RootReducer = Box::new(move |state, action| {
            let slice = state.and_then(|s| path::read(s, "n"));
            json!({"n": bound(slice, action, "n")})
        });
        let store = Arc::new(MemoryStore::new(root, None));
        module.link_handle().connect(store.clone()).unwrap();
        store
    }

    #[test]
    fn lifecycle_hooks_fire() {
        let module = recorder_module();
        recorder_connected(&module);
        assert_eq!(module.controller().linked, 1);

        module.link_handle().disconnect();
        assert_eq!(module.controller().unlinked, 1);
    }

    #[test]
    fn state_did_update_receives_prev_and_next() {
        let module = recorder_module();
        recorder_connected(&module);

        module.action("bump").unwrap().dispatch(&[]).unwrap();

        let controller = module.controller();
        assert_eq!(controller.updates.len(), 1);
        assert_eq!(controller.updates[0], (Some(json!(0)), Some(json!(1))));
    }

    #[test]
    fn hook_not_fired_on_connect_or_irrelevant_action() {
        let module = recorder_module();
        let store = recorder_connected(&module);

        // Connecting caches the slice without firing the hook.
        assert!(module.controller().updates.is_empty());

        // An action that leaves the slice unchanged stays silent.
        store.dispatch(Action::new("unrelated", Value::Null));
        assert!(module.controller().updates.is_empty());
    }
}
