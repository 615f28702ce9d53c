use serde_json::{Map, Value};

use crate::error::ModlinkError;

/// Separator used in normalized paths.
pub const DELIMITER: char = '.';

/// A hierarchical key path before normalization.
///
/// A path is either a single (possibly already dot-delimited) string
/// segment or an arbitrarily nested list of paths. `normalize` flattens it
/// depth-first, left-to-right, into one `.`-joined string:
///
/// - `"a.b"` normalizes to `"a.b"`
/// - `["a", "b"]` normalizes to `"a.b"`
/// - `["a", ["b", ["c"]]]` normalizes to `"a.b.c"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathParts {
    Segment(String),
    List(Vec<PathParts>),
}

impl From<&str> for PathParts {
    fn from(s: &str) -> Self {
        PathParts::Segment(s.to_string())
    }
}

impl From<String> for PathParts {
    fn from(s: String) -> Self {
        PathParts::Segment(s)
    }
}

impl From<Vec<&str>> for PathParts {
    fn from(parts: Vec<&str>) -> Self {
        PathParts::List(parts.into_iter().map(PathParts::from).collect())
    }
}

impl From<Vec<String>> for PathParts {
    fn from(parts: Vec<String>) -> Self {
        PathParts::List(parts.into_iter().map(PathParts::from).collect())
    }
}

impl From<Vec<PathParts>> for PathParts {
    fn from(parts: Vec<PathParts>) -> Self {
        PathParts::List(parts)
    }
}

/// Check that a path is a non-empty string or a non-empty, arbitrarily
/// nested list whose leaves are all non-empty strings.
pub fn validate(path: &PathParts) -> Result<(), ModlinkError> {
    match path {
        PathParts::Segment(s) => {
            if s.is_empty() {
                Err(ModlinkError::InvalidParameters(
                    "attempt to use an empty path segment".to_string(),
                ))
            } else {
                Ok(())
            }
        }
        PathParts::List(parts) => {
            if parts.is_empty() {
                return Err(ModlinkError::InvalidParameters(
                    "attempt to use an empty path list".to_string(),
                ));
            }
            for part in parts {
                validate(part)?;
            }
            Ok(())
        }
    }
}

/// Validate and flatten a path into its canonical `.`-joined form.
pub fn normalize(path: &PathParts) -> Result<String, ModlinkError> {
    validate(path)?;

    let mut segments = Vec::new();
    flatten(path, &mut segments);
    Ok(segments.join("."))
}

fn flatten(path: &PathParts, out: &mut Vec<String>) {
    match path {
        PathParts::Segment(s) => out.push(s.clone()),
        PathParts::List(parts) => {
            for part in parts {
                flatten(part, out);
            }
        }
    }
}

/// Read the value at a normalized path inside a nested state tree.
///
/// Walks object keys hop by hop; a digit segment also indexes into arrays.
/// Returns `None` as soon as any hop is absent, never an error for a
/// missing intermediate key.
pub fn read<'a>(state: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = state;
    for segment in path.split(DELIMITER) {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Write a value at a normalized path, creating intermediate objects as
/// needed. Non-object hops along the way are replaced by objects.
pub fn write(state: &mut Value, path: &str, value: Value) -> Result<(), ModlinkError> {
    let segments: Vec<&str> = path.split(DELIMITER).collect();
    if path.is_empty() || segments.iter().any(|s| s.is_empty()) {
        return Err(ModlinkError::InvalidParameters(format!(
            "attempt to write at a bad path: \"{path}\""
        )));
    }

    // split always yields at least one segment
    let (last, parents) = segments.split_last().unwrap();

    let mut current = state;
    for segment in parents {
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        current = current
            .as_object_mut()
            .unwrap()
            .entry((*segment).to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }

    if !current.is_object() {
        *current = Value::Object(Map::new());
    }
    if let Value::Object(map) = current {
        map.insert((*last).to_string(), value);
    }
    Ok(())
}
