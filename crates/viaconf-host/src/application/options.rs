//! Typed accessors over a settings document.
//!
//! Every accessor follows the same contract:
//!
//! - key absent (or explicitly `null`) → the caller's default, never an error;
//! - key present and convertible → the converted value;
//! - key present with another shape → [`ConfigError::TypeMismatch`], which
//!   the caller must handle. Nothing is silently masked.
//!
//! Keys resolve like [`viaconf_core::lookup`]: exact top-level key first,
//! then dotted path.

use serde::de::DeserializeOwned;
use serde_json::Value;
use viaconf_core::codec::type_name;
use viaconf_core::{lookup, SettingsDocument};

use super::error::ConfigError;

/// A source of settings values with typed accessors.
///
/// Implementors only provide [`value`](OptionSource::value); the typed
/// accessors are derived from it.
pub trait OptionSource {
    /// Returns a copy of the raw value stored at `key`.
    fn value(&self, key: &str) -> Option<Value>;

    fn get_bool(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        typed(self.value(key), key, default, "boolean", Value::as_bool)
    }

    /// Reads a 32-bit integer. Floating-point values are accepted only when
    /// they have no fractional part.
    fn get_int(&self, key: &str, default: i32) -> Result<i32, ConfigError> {
        typed(self.value(key), key, default, "integer", as_int)
    }

    fn get_double(&self, key: &str, default: f64) -> Result<f64, ConfigError> {
        typed(self.value(key), key, default, "number", Value::as_f64)
    }

    fn get_string(&self, key: &str, default: &str) -> Result<String, ConfigError> {
        typed(self.value(key), key, default.to_string(), "string", |v| {
            v.as_str().map(str::to_string)
        })
    }

    /// Reads a list whose every element is an integer.
    fn get_int_list(&self, key: &str, default: Vec<i32>) -> Result<Vec<i32>, ConfigError> {
        typed(self.value(key), key, default, "list of integers", |v| {
            v.as_array()?.iter().map(as_int).collect()
        })
    }

    /// Reads any deserializable shape.
    fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        Self: Sized,
    {
        match self.value(key) {
            None | Some(Value::Null) => Ok(default),
            Some(value) => {
                let found = type_name(&value);
                serde_json::from_value(value).map_err(|_| ConfigError::TypeMismatch {
                    key: key.to_string(),
                    expected: std::any::type_name::<T>(),
                    found,
                })
            }
        }
    }
}

impl OptionSource for SettingsDocument {
    fn value(&self, key: &str) -> Option<Value> {
        lookup(self, key).cloned()
    }
}

fn typed<T>(
    value: Option<Value>,
    key: &str,
    default: T,
    expected: &'static str,
    convert: impl FnOnce(&Value) -> Option<T>,
) -> Result<T, ConfigError> {
    match value {
        None | Some(Value::Null) => Ok(default),
        Some(value) => convert(&value).ok_or_else(|| ConfigError::TypeMismatch {
            key: key.to_string(),
            expected,
            found: type_name(&value),
        }),
    }
}

fn as_int(value: &Value) -> Option<i32> {
    if let Some(i) = value.as_i64() {
        return i32::try_from(i).ok();
    }
    let f = value.as_f64()?;
    if f.fract() == 0.0 && f >= f64::from(i32::MIN) && f <= f64::from(i32::MAX) {
        Some(f as i32)
    } else {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
