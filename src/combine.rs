use std::sync::Arc;

use serde_json::{Map, Value};

use crate::action::Action;
use crate::container::RootReducer;
use crate::error::ModlinkError;
use crate::module::{BoundReducer, Controller, Module, ModuleLink};
use crate::path::{self, PathParts, DELIMITER};

/// One named position in a reducer composition: a plain reducer, a
/// module, or a nested composition.
pub struct Slot(SlotKind);

enum SlotKind {
    Reducer(BoundReducer),
    Module(Arc<dyn ModuleLink>),
    Combined(Vec<(String, Slot)>),
}

impl Slot {
    /// A plain reducer with no module behind it.
    pub fn reducer(
        f: impl Fn(Option<&Value>, &Action) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self(SlotKind::Reducer(Arc::new(
            move |state: Option<&Value>, action: &Action, _path: &str| f(state, action),
        )))
    }

    /// A plain reducer that also receives its full mount path, the same
    /// arguments a module's bound reducer gets.
    pub fn reducer_with_path(
        f: impl Fn(Option<&Value>, &Action, &str) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self(SlotKind::Reducer(Arc::new(f)))
    }

    /// A module slot. The module is integrated at the slot's full path
    /// when [`combine_reducers`] assembles the tree; a module already
    /// integrated at a different path makes the assembly fail.
    pub fn module<C: Controller>(module: &Module<C>) -> Self {
        Self(SlotKind::Module(module.link_handle()))
    }

    /// A nested composition. Keys of the inner level extend the slot's
    /// path, so modules placed here integrate at their full dotted path.
    pub fn combined(
        slots: impl IntoIterator<Item = (impl Into<String>, Slot)>,
    ) -> Self {
        Self(SlotKind::Combined(
            slots.into_iter().map(|(k, s)| (k.into(), s)).collect(),
        ))
    }
}

/// A resolved composition level: `(key, full path, node)` per slot.
enum Node {
    Leaf(BoundReducer),
    Branch(Vec<(String, String, Node)>),
}

fn build_level(
    prefix: &str,
    slots: Vec<(String, Slot)>,
) -> Result<Vec<(String, String, Node)>, ModlinkError> {
    let mut entries: Vec<(String, String, Node)> = Vec::with_capacity(slots.len());

    for (key, slot) in slots {
        if key.is_empty() || key.contains(DELIMITER) {
            return Err(ModlinkError::InvalidParameters(format!(
                "bad reducer key \"{key}\": keys must be non-empty and contain no \"{DELIMITER}\""
            )));
        }
        if entries.iter().any(|(k, _, _)| k == &key) {
            return Err(ModlinkError::Duplicate(format!(
                "duplicate reducer key \"{key}\""
            )));
        }

        let full = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}{DELIMITER}{key}")
        };

        let node = match slot.0 {
            SlotKind::Reducer(bound) => Node::Leaf(bound),
            SlotKind::Module(link) => Node::Leaf(link.integrate_at(&full)?),
            SlotKind::Combined(children) => Node::Branch(build_level(&full, children)?),
        };
        entries.push((key, full, node));
    }

    Ok(entries)
}

fn reduce_level(
    entries: &[(String, String, Node)],
    state: Option<&Value>,
    action: &Action,
) -> Value {
    let mut next = Map::with_capacity(entries.len());
    let mut changed = state.map(Value::is_object) != Some(true);

    for (key, full, node) in entries {
        let prev_child = state.and_then(|s| s.get(key));
        let next_child = match node {
            Node::Leaf(bound) => bound(prev_child, action, full),
            Node::Branch(children) => reduce_level(children, prev_child, action),
        };
        changed = changed || prev_child != Some(&next_child);
        next.insert(key.clone(), next_child);
    }

    // Unchanged children keep the previous level value intact, including
    // keys no slot owns.
    if !changed {
        if let Some(state) = state {
            return state.clone();
        }
    }
    Value::Object(next)
}

/// Assemble a root reducer from named slots.
///
/// Module slots are integrated eagerly: every path conflict or bad key
/// surfaces here, before the store exists. The produced reducer owns an
/// object whose keys mirror the slots; when no child changes for an
/// action, the previous state value is returned as-is.
pub fn combine_reducers(
    slots: impl IntoIterator<Item = (impl Into<String>, Slot)>,
) -> Result<RootReducer, ModlinkError> {
    assemble("", slots)
}

/// [`combine_reducers`], with every slot path prefixed by `root`.
///
/// The prefix affects integration and mount paths only: the produced
/// reducer still returns the bare slot object, so a host composition can
/// mount it as the `root` subtree of its own state. Modules placed here
/// integrate at `root.<key>` and read that slice of the host's tree.
pub fn combine_reducers_at(
    root: impl Into<PathParts>,
    slots: impl IntoIterator<Item = (impl Into<String>, Slot)>,
) -> Result<RootReducer, ModlinkError> {
    let prefix = path::normalize(&root.into())?;
    assemble(&prefix, slots)
}

fn assemble(
    prefix: &str,
    slots: impl IntoIterator<Item = (impl Into<String>, Slot)>,
) -> Result<RootReducer, ModlinkError> {
    let entries = build_level(prefix, slots.into_iter().map(|(k, s)| (k.into(), s)).collect())?;
    Ok(Box::new(move |state, action| {
        reduce_level(&entries, state, action)
    }))
}
