//! Template merge and migration.
//!
//! The template is the authoritative key universe. Users override values,
//! never structure:
//!
//! 1. Start from a full copy of the template.
//! 2. Remove every unsupported path.
//! 3. Overlay on-disk values for keys the filtered template still has,
//!    recursing into structured sections.
//! 4. Drop everything else the user's file contains.
//!
//! Step 4 is the migration mechanism: options renamed or removed in a newer
//! release disappear from the user's file on the next load without any
//! manual edits.
//!
//! # Sections versus open tables
//!
//! A non-empty object in the template is a *section*: its keys are part of
//! the universe and the overlay recurses into it. An empty object is an
//! *open table* (for example a server → protocol map) whose entries are
//! supplied entirely by the user; its on-disk contents are taken verbatim.
//!
//! On-disk values are trusted as-is. A value whose type differs from the
//! template default replaces it and only surfaces as a type mismatch when a
//! typed accessor reads it.

use serde_json::Value;
use tracing::debug;

use super::{remove_path, SettingsDocument, UnsupportedOptions, PATH_SEPARATOR};

/// Produces the effective document from `template`, `unsupported`, and the
/// user's `on_disk` document.
///
/// `merge(t, u, &merge(t, u, d)) == merge(t, u, d)` for any inputs.
pub fn merge(
    template: &SettingsDocument,
    unsupported: &UnsupportedOptions,
    on_disk: &SettingsDocument,
) -> SettingsDocument {
    let mut effective = template.clone();
    for path in unsupported.iter() {
        if remove_path(&mut effective, path).is_some() {
            debug!(path, "removed unsupported option");
        }
    }
    overlay(&mut effective, template, on_disk, "");
    effective
}

/// Overlays `source` onto `target`.
///
/// `shape` is the unfiltered template node matching `target`. Whether a key
/// is a section or an open table is decided on `shape`, so a section whose
/// every key is unsupported stays a (now empty) section.
fn overlay(
    target: &mut SettingsDocument,
    shape: &SettingsDocument,
    source: &SettingsDocument,
    prefix: &str,
) {
    for (key, value) in source {
        let path = join(prefix, key);
        let Some(slot) = target.get_mut(key) else {
            debug!(path = %path, "dropped option absent from template");
            continue;
        };
        if let Some(Value::Object(section_shape)) = shape.get(key) {
            if !section_shape.is_empty() {
                if let (Value::Object(section), Value::Object(child)) = (&mut *slot, value) {
                    overlay(section, section_shape, child, &path);
                    continue;
                }
                debug!(path = %path, "on-disk value replaces section");
            }
        }
        *slot = value.clone();
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}{PATH_SEPARATOR}{key}")
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
