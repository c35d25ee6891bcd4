//! The settings document model.
//!
//! A [`SettingsDocument`] is an ordered JSON object: keys are unique at each
//! nesting level, values are booleans, numbers, strings, lists, or nested
//! documents. Order matters because it is what the user sees when the file
//! is written back, so the workspace builds `serde_json` with
//! `preserve_order` and documents keep template order for inherited keys and
//! insertion order for anything added at runtime.
//!
//! Keys may be addressed by dotted path (`"servers.default"`). A top-level key
//! that itself contains the separator always wins over path traversal.

pub mod merge;

use serde_json::{Map, Value};

/// An ordered mapping from key to dynamically typed value.
pub type SettingsDocument = Map<String, Value>;

/// Separator between segments of a key path.
pub const PATH_SEPARATOR: char = '.';

/// Looks up `key` in `doc`.
///
/// An exact top-level match is returned first; otherwise `key` is split on
/// [`PATH_SEPARATOR`] and walked through nested documents.
pub fn lookup<'a>(doc: &'a SettingsDocument, key: &str) -> Option<&'a Value> {
    if let Some(value) = doc.get(key) {
        return Some(value);
    }
    let mut segments = key.split(PATH_SEPARATOR);
    let mut current = doc.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Removes the value at `path`, returning it if it was present.
///
/// Follows the same resolution rule as [`lookup`].
pub fn remove_path(doc: &mut SettingsDocument, path: &str) -> Option<Value> {
    if let Some(value) = doc.shift_remove(path) {
        return Some(value);
    }
    match path.split_once(PATH_SEPARATOR) {
        Some((head, tail)) => match doc.get_mut(head) {
            Some(Value::Object(child)) => remove_path(child, tail),
            _ => None,
        },
        None => None,
    }
}

/// The per-platform set of option paths that must not appear in the
/// effective document or in rendered comments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnsupportedOptions {
    paths: Vec<String>,
}

impl UnsupportedOptions {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when `path` is unsupported.
    pub fn contains(&self, path: &str) -> bool {
        self.paths.iter().any(|p| p == path)
    }

    /// Iterates over the unsupported paths in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for UnsupportedOptions {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut paths: Vec<String> = Vec::new();
        for path in iter {
            let path = path.into();
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
        Self { paths }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
