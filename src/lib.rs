//! Modlink — module binding layer for an observable state container.
//!
//! Business logic is packaged as modules: a reducer owning one slice of
//! the shared state tree, an optional controller with lifecycle hooks,
//! and a set of namespaced actions. Modules are created independently of
//! any store and attached to one at runtime through a registry-driven
//! link cycle.
//!
//! # Path Addressing
//!
//! Every module claims one position in the state tree, expressed as a
//! dotted string or a segment list with `.` as separator:
//! - Root slice: `counter`
//! - Nested: `app.session.user`
//! - Equivalent shapes: `"a.b"`, `["a", "b"]`, `["a.b"]`
//!
//! The path is fixed on first integration and immutable afterwards.
//!
//! # Action Namespacing
//!
//! Declared action types get a process-unique numeric suffix, so two
//! modules declaring `RESET` never collide. Reducers match on the
//! resolved types through their [`Scope`].
//!
//! # Example
//!
//! ```ignore
//! use modlink::{combine_reducers, ActionDecl, ModuleConfig, Registry, Slot};
//! use serde_json::{json, Value};
//!
//! let registry = Registry::new();
//!
//! let counter = registry.create_module(
//!     ModuleConfig::new((), |state: Option<&Value>, action, scope| {
//!         let n = state.and_then(Value::as_i64).unwrap_or(0);
//!         if Some(action.kind.as_str()) == scope.kind_of("increment") {
//!             json!(n + 1)
//!         } else {
//!             json!(n)
//!         }
//!     })
//!     .action("increment", ActionDecl::Empty),
//! )?;
//!
//! let root = combine_reducers(vec![("counter", Slot::module(&counter))])?;
//! let store = registry.create_store(root, None)?;
//!
//! counter.action("increment").unwrap().dispatch(&[])?;
//! assert_eq!(counter.own_state(), Some(json!(1)));
//! ```

pub mod action;
pub mod combine;
pub mod container;
pub mod error;
pub mod module;
pub mod path;
pub mod registry;

// Re-export primary types at crate root.
pub use action::{Action, ActionCreator, ActionDecl, Actions, PayloadFn};
pub use combine::{combine_reducers, combine_reducers_at, Slot};
pub use container::{Container, MemoryStore, RootReducer, Unsubscribe};
pub use error::ModlinkError;
pub use module::{
    BoundReducer, ChangeListener, Controller, Module, ModuleConfig, ReducerFn, Scope,
};
pub use path::PathParts;
pub use registry::{
    create_module, create_store, default_registry, is_store_linked, link_store, unlink_store,
    Registry,
};
