use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use serde_json::Value;
use tracing::debug;

use crate::action::Action;

/// Handle returned by `subscribe`; call it to release the subscription.
pub type Unsubscribe = Box<dyn FnOnce() + Send + Sync>;

/// A root reducer: previous state (absent on bootstrap) plus an action,
/// producing the next state tree.
pub type RootReducer = Box<dyn Fn(Option<&Value>, &Action) -> Value + Send + Sync>;

/// The observable state container the binding layer consumes.
///
/// This is the only interface the core knows about: a conventional store
/// with `get_state`/`dispatch`/`subscribe` semantics. The core never
/// assumes anything about the store's internals beyond it calling the
/// supplied root reducer once to bootstrap.
pub trait Container: Send + Sync {
    /// The current global state tree.
    fn get_state(&self) -> Value;

    /// Run the action through the root reducer and notify subscribers.
    /// Synchronous: subscribers have run by the time this returns.
    fn dispatch(&self, action: Action);

    /// Register a change callback, invoked after every state change.
    fn subscribe(&self, on_change: Box<dyn Fn() + Send + Sync>) -> Unsubscribe;
}

type StoreListener = Arc<dyn Fn() + Send + Sync>;

/// A minimal in-memory single-writer store.
///
/// Reference implementation of [`Container`], used by the `create_store`
/// convenience and throughout tests. On construction it dispatches one
/// namespaced bootstrap action through the root reducer to obtain the
/// initial state.
///
/// Dispatching from inside a reducer panics (conventional single-writer
/// rule); dispatching from inside a change callback is legal and simply
/// re-enters the same synchronous cycle.
pub struct MemoryStore {
    reducer: RootReducer,
    state: RwLock<Value>,
    listeners: Arc<RwLock<Vec<(u64, StoreListener)>>>,
    next_id: AtomicU64,
    reducing: AtomicBool,
}

impl MemoryStore {
    pub fn new(reducer: RootReducer, preloaded: Option<Value>) -> Self {
        let initial = reducer(preloaded.as_ref(), &Action::bootstrap());
        debug!("modlink: store bootstrapped");
        Self {
            reducer,
            state: RwLock::new(initial),
            listeners: Arc::new(RwLock::new(Vec::new())),
            next_id: AtomicU64::new(1),
            reducing: AtomicBool::new(false),
        }
    }
}

impl Container for MemoryStore {
    fn get_state(&self) -> Value {
        self.state.read().unwrap().clone()
    }

    fn dispatch(&self, action: Action) {
        if self.reducing.swap(true, Ordering::SeqCst) {
            panic!("can not dispatch while the root reducer is running");
        }
        let prev = self.state.read().unwrap().clone();
        let next = (self.reducer)(Some(&prev), &action);
        self.reducing.store(false, Ordering::SeqCst);

        *self.state.write().unwrap() = next;

        // Snapshot first so listeners may subscribe/unsubscribe/dispatch.
        let snapshot: Vec<StoreListener> = self
            .listeners
            .read()
            .unwrap()
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for listener in snapshot {
            listener();
        }
    }

    fn subscribe(&self, on_change: Box<dyn Fn() + Send + Sync>) -> Unsubscribe {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners
            .write()
            .unwrap()
            .push((id, Arc::from(on_change)));

        let listeners = Arc::clone(&self.listeners);
        Box::new(move || {
            listeners.write().unwrap().retain(|(i, _)| *i != id);
        })
    }
}
