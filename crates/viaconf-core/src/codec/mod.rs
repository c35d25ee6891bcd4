//! Encoding and decoding of settings documents.
//!
//! Output format (defaults):
//! ```text
//! {
//!  "a":5,
//!  "b":{
//!   "c":true
//!  }
//! }
//! ```
//! One-space indentation, a bare `:` between key and value, null members
//! omitted, members in document order.
//!
//! Decoding is lenient: comments and trailing commas are stripped first (see
//! [`lenient`]). A decode failure is recoverable; callers substitute an empty
//! document so the template defaults apply.

pub mod format;
pub mod lenient;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::document::SettingsDocument;
use format::SettingsFormatter;

/// Errors that can occur while decoding settings text.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The text is not valid JSON even after lenient pre-processing.
    #[error("malformed settings JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    /// The text is valid JSON but its root is not an object.
    #[error("settings root must be an object, found {found}")]
    NotAnObject { found: &'static str },
}

/// Errors that can occur while encoding a settings document.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("serialized settings are not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Layout options for [`encode_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Written once per nesting level at the start of each member line.
    pub indent: String,
    /// Written between an object key and its value.
    pub key_separator: String,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            indent: " ".to_string(),
            key_separator: ":".to_string(),
        }
    }
}

/// Encodes `doc` with the default [`EncodeOptions`].
///
/// # Errors
///
/// Returns [`EncodeError`] if serialization fails.
pub fn encode(doc: &SettingsDocument) -> Result<String, EncodeError> {
    encode_with(doc, &EncodeOptions::default())
}

/// Encodes `doc` using the given layout options.
///
/// # Errors
///
/// Returns [`EncodeError`] if serialization fails.
pub fn encode_with(doc: &SettingsDocument, options: &EncodeOptions) -> Result<String, EncodeError> {
    let pruned = Value::Object(without_nulls(doc));
    let mut buf = Vec::new();
    let formatter = SettingsFormatter::new(&options.indent, &options.key_separator);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    pruned.serialize(&mut serializer)?;
    Ok(String::from_utf8(buf)?)
}

/// Decodes settings text into a document.
///
/// Blank input decodes to an empty document.
///
/// # Errors
///
/// Returns [`DecodeError::Syntax`] for malformed text and
/// [`DecodeError::NotAnObject`] when the root is not an object.
pub fn decode(text: &str) -> Result<SettingsDocument, DecodeError> {
    let cleaned = lenient::sanitize(text);
    if cleaned.trim().is_empty() {
        return Ok(SettingsDocument::new());
    }
    match serde_json::from_str::<Value>(&cleaned)? {
        Value::Object(map) => Ok(map),
        other => Err(DecodeError::NotAnObject {
            found: type_name(&other),
        }),
    }
}

/// Returns a short name for the JSON type of `value`, for error messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

fn without_nulls(doc: &SettingsDocument) -> SettingsDocument {
    doc.iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key.clone(), prune(value)))
        .collect()
}

fn prune(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(without_nulls(map)),
        Value::Array(items) => Value::Array(items.iter().map(prune).collect()),
        other => other.clone(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
