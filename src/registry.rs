use std::sync::{Arc, RwLock, Weak};

use serde_json::Value;
use tracing::{debug, warn};

use crate::container::{Container, MemoryStore, RootReducer};
use crate::error::ModlinkError;
use crate::module::{Controller, Module, ModuleConfig, ModuleLink};

/// Tracks every module created through it and drives the shared link
/// cycle: one store at a time, attached to and detached from all tracked
/// modules in bulk.
///
/// A process-wide default instance backs the free functions
/// [`create_module`], [`link_store`] and friends; independent registries
/// can be created for isolation (tests in one binary, embedded hosts).
///
/// Tracking is by weak handle: a module whose last [`Module`] handle is
/// dropped leaves future link cycles. [`Registry::reset`] is the explicit
/// clear-all.
pub struct Registry {
    modules: RwLock<Vec<Weak<dyn ModuleLink>>>,
    store: RwLock<Option<Arc<dyn Container>>>,
}

impl Registry {
    pub const fn new() -> Self {
        Self {
            modules: RwLock::new(Vec::new()),
            store: RwLock::new(None),
        }
    }

    /// Create a module and track it for future link cycles.
    ///
    /// A module created while a store is already linked stays unconnected
    /// until the next [`Registry::link_store`]; its reducer cannot be part
    /// of the running store's composition anyway.
    pub fn create_module<C: Controller>(
        &self,
        config: ModuleConfig<C>,
    ) -> Result<Module<C>, ModlinkError> {
        let module = Module::from_config(config)?;
        let handle = module.link_handle();
        self.modules.write().unwrap().push(Arc::downgrade(&handle));
        Ok(module)
    }

    /// Attach a store to every tracked module.
    ///
    /// Fails with `Duplicate` while another store is linked. A module
    /// that refuses to connect (not integrated yet) is skipped with a
    /// warning; the cycle continues.
    pub fn link_store(&self, store: Arc<dyn Container>) -> Result<(), ModlinkError> {
        {
            let mut current = self.store.write().unwrap();
            if current.is_some() {
                return Err(ModlinkError::Duplicate(
                    "a store is already linked: unlink it first".to_string(),
                ));
            }
            *current = Some(store.clone());
        }

        let modules = self.live_modules();
        debug!("modlink: linking store to {} module(s)", modules.len());
        for module in &modules {
            if let Err(e) = module.connect(store.clone()) {
                warn!("modlink: module skipped during link: {e}");
            }
        }
        Ok(())
    }

    /// Detach the linked store from every tracked module. Fails with
    /// `InsufficientData` when no store is linked.
    pub fn unlink_store(&self) -> Result<(), ModlinkError> {
        if self.store.write().unwrap().take().is_none() {
            return Err(ModlinkError::InsufficientData(
                "no store is linked".to_string(),
            ));
        }

        let modules = self.live_modules();
        debug!("modlink: unlinking store from {} module(s)", modules.len());
        for module in &modules {
            module.disconnect();
        }
        Ok(())
    }

    /// Whether a store is currently linked.
    pub fn is_store_linked(&self) -> bool {
        self.store.read().unwrap().is_some()
    }

    /// Build a [`MemoryStore`] from a root reducer and link it in one
    /// step.
    pub fn create_store(
        &self,
        reducer: RootReducer,
        preloaded: Option<Value>,
    ) -> Result<Arc<MemoryStore>, ModlinkError> {
        let store = Arc::new(MemoryStore::new(reducer, preloaded));
        self.link_store(store.clone())?;
        Ok(store)
    }

    /// Unlink (if linked) and forget every tracked module.
    pub fn reset(&self) {
        let _ = self.unlink_store();
        self.modules.write().unwrap().clear();
    }

    /// Snapshot the live modules, dropping entries whose module was
    /// dropped.
    fn live_modules(&self) -> Vec<Arc<dyn ModuleLink>> {
        let mut modules = self.modules.write().unwrap();
        modules.retain(|weak| weak.strong_count() > 0);
        modules.iter().filter_map(Weak::upgrade).collect()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

static DEFAULT_REGISTRY: Registry = Registry::new();

/// The process-wide registry behind the free functions.
pub fn default_registry() -> &'static Registry {
    &DEFAULT_REGISTRY
}

/// [`Registry::create_module`] on the default registry.
pub fn create_module<C: Controller>(config: ModuleConfig<C>) -> Result<Module<C>, ModlinkError> {
    DEFAULT_REGISTRY.create_module(config)
}

/// [`Registry::link_store`] on the default registry.
pub fn link_store(store: Arc<dyn Container>) -> Result<(), ModlinkError> {
    DEFAULT_REGISTRY.link_store(store)
}

/// [`Registry::unlink_store`] on the default registry.
pub fn unlink_store() -> Result<(), ModlinkError> {
    DEFAULT_REGISTRY.unlink_store()
}

/// [`Registry::is_store_linked`] on the default registry.
pub fn is_store_linked() -> bool {
    DEFAULT_REGISTRY.is_store_linked()
}

/// [`Registry::create_store`] on the default registry.
pub fn create_store(
    reducer: RootReducer,
    preloaded: Option<Value>,
) -> Result<Arc<MemoryStore>, ModlinkError> {
    DEFAULT_REGISTRY.create_store(reducer, preloaded)
}
