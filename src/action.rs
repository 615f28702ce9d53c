use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use serde_json::{Map, Value};

use crate::error::ModlinkError;

/// A dispatchable action: a wire type plus an arbitrary payload value.
///
/// The wire `kind` is what reducers switch on; payload fields live under
/// `payload` rather than being spread into the action itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub kind: String,
    pub payload: Value,
}

impl Action {
    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }

    /// The action a store dispatches once at construction to obtain its
    /// initial state. Namespaced so no user reducer can match it.
    pub(crate) fn bootstrap() -> Self {
        Self {
            kind: resolve_kind("@@init", next_suffix()),
            payload: Value::Null,
        }
    }
}

/// Monotonic counter for per-module wire-type suffixes.
static NEXT_SUFFIX: AtomicU64 = AtomicU64::new(1);

/// Return a suffix unique for the lifetime of the process.
pub fn next_suffix() -> u64 {
    NEXT_SUFFIX.fetch_add(1, Ordering::Relaxed)
}

/// Combine a logical action type with a per-module suffix into a wire type.
///
/// Two modules declaring the same logical type get distinct wire types, so
/// independently authored modules never collide inside one store. The
/// logical type stays a prefix of the result.
pub fn resolve_kind(logical: &str, suffix: u64) -> String {
    format!("{logical}_{suffix}")
}

/// Builds the payload value an action carries, from the creator call args.
pub type PayloadFn = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;

/// The dispatch seam an action creator reaches its owning module through.
pub(crate) trait Dispatch: Send + Sync {
    fn dispatch_action(&self, action: Action) -> Result<(), ModlinkError>;
}

/// One action declaration inside a module configuration.
///
/// A declaration is either an ordinary creator (logical type + payload fn,
/// namespaced at module construction), a proxy that delegates entirely to
/// an already-resolved creator from another module, or empty (no-op payload
/// with a wire type derived from the declaration name). The enum makes
/// mixing `proxy` with `creator`/`type` unrepresentable.
pub enum ActionDecl {
    Creator { kind: String, payload: PayloadFn },
    Proxy(ActionCreator),
    Empty,
}

impl ActionDecl {
    /// An ordinary declaration: logical type plus payload-producing fn.
    pub fn with_creator(
        kind: impl Into<String>,
        payload: impl Fn(&[Value]) -> Value + Send + Sync + 'static,
    ) -> Self {
        ActionDecl::Creator {
            kind: kind.into(),
            payload: Arc::new(payload),
        }
    }

    /// Delegate to an already-resolved creator, typically from another
    /// module. The proxy keeps the original's wire type and dispatches
    /// through the original's owning module.
    pub fn proxy(creator: ActionCreator) -> Self {
        ActionDecl::Proxy(creator)
    }
}

impl fmt::Debug for ActionDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionDecl::Creator { kind, .. } => {
                f.debug_struct("Creator").field("kind", kind).finish()
            }
            ActionDecl::Proxy(creator) => f.debug_tuple("Proxy").field(creator).finish(),
            ActionDecl::Empty => write!(f, "Empty"),
        }
    }
}

/// A materialized, dispatching action creator.
///
/// Calling [`ActionCreator::dispatch`] builds the payload from the given
/// args, stamps the resolved wire type, dispatches the action through the
/// owning module, and returns the stamped action. The resolved type is
/// discoverable via [`ActionCreator::kind`] for reducers to switch on.
#[derive(Clone)]
pub struct ActionCreator {
    kind: String,
    payload: PayloadFn,
    dispatcher: Weak<dyn Dispatch>,
}

impl ActionCreator {
    pub(crate) fn new(kind: String, payload: PayloadFn, dispatcher: Weak<dyn Dispatch>) -> Self {
        Self {
            kind,
            payload,
            dispatcher,
        }
    }

    /// The resolved wire type this creator stamps on its actions.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Build the stamped action without dispatching it.
    pub fn action(&self, args: &[Value]) -> Action {
        Action {
            kind: self.kind.clone(),
            payload: (self.payload)(args),
        }
    }

    /// Build the stamped action and dispatch it through the owning module.
    ///
    /// Fails with `WrongInterface` while the owning module has no store
    /// linked (or no longer exists).
    pub fn dispatch(&self, args: &[Value]) -> Result<Action, ModlinkError> {
        let action = self.action(args);
        let owner = self.dispatcher.upgrade().ok_or_else(|| {
            ModlinkError::WrongInterface("owning module no longer exists".to_string())
        })?;
        owner.dispatch_action(action.clone())?;
        Ok(action)
    }
}

impl fmt::Debug for ActionCreator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionCreator")
            .field("kind", &self.kind)
            .finish()
    }
}

/// The name → creator table a module materializes at construction.
///
/// Preserves declaration order.
pub struct Actions {
    entries: Vec<(String, ActionCreator)>,
}

impl Actions {
    /// Look up a creator by its declaration name.
    pub fn get(&self, name: &str) -> Option<&ActionCreator> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
    }

    /// The resolved wire type for a declaration name.
    pub fn kind_of(&self, name: &str) -> Option<&str> {
        self.get(name).map(ActionCreator::kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ActionCreator)> {
        self.entries.iter().map(|(n, c)| (n.as_str(), c))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Reject malformed declarations before any module state is built.
///
/// Declaration names and creator logical types must be non-empty; failures
/// name the offending action.
pub(crate) fn validate_decls(decls: &[(String, ActionDecl)]) -> Result<(), ModlinkError> {
    for (name, decl) in decls {
        if name.is_empty() {
            return Err(ModlinkError::InvalidParameters(
                "action declared with an empty name".to_string(),
            ));
        }
        if let ActionDecl::Creator { kind, .. } = decl {
            if kind.is_empty() {
                return Err(ModlinkError::InvalidParameters(format!(
                    "action type for \"{name}\" is empty"
                )));
            }
        }
    }
    Ok(())
}

/// Materialize the creator table for one module instance.
///
/// Expects `validate_decls` to have passed. Ordinary and empty declarations
/// get wire types namespaced with this module's `suffix`; proxies are kept
/// as-is, original dispatcher included.
pub(crate) fn build_actions(
    decls: Vec<(String, ActionDecl)>,
    suffix: u64,
    dispatcher: Weak<dyn Dispatch>,
) -> Actions {
    let entries = decls
        .into_iter()
        .map(|(name, decl)| {
            let creator = match decl {
                ActionDecl::Creator { kind, payload } => {
                    ActionCreator::new(resolve_kind(&kind, suffix), payload, dispatcher.clone())
                }
                ActionDecl::Proxy(creator) => creator,
                ActionDecl::Empty => ActionCreator::new(
                    resolve_kind(&name, suffix),
                    Arc::new(|_| Value::Object(Map::new())),
                    dispatcher.clone(),
                ),
            };
            (name, creator)
        })
        .collect();

    Actions { entries }
}
