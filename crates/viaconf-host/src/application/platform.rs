//! Host platform contract.
//!
//! Each host integration (a proxy or a game server) tells the config store
//! where its packaged template lives, which template options do not apply to
//! it, and how to normalise the merged document before it is installed.
//!
//! # Server protocol tables
//!
//! Proxies keep a table mapping backend server names to the protocol version
//! each backend speaks. Users may write either a numeric protocol id or a
//! release label such as `"1.16.4"`; [`normalize_server_protocols`] rewrites
//! the table so that every entry is a numeric id and a `default` entry exists.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};
use viaconf_core::{ProtocolVersion, SettingsDocument, UnsupportedOptions};

use super::companion::{CompanionProtocols, NoCompanion};

/// Error reported by a host capability.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The host cannot report its protocol range yet (e.g. during boot).
    #[error("protocol information unavailable: {0}")]
    ProtocolUnavailable(String),
}

/// Where a platform's canonical template is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateLocation {
    /// Compiled into the binary.
    Bundled {
        name: &'static str,
        text: &'static str,
    },
    /// A file on disk, typically an administrator override.
    File(PathBuf),
}

impl fmt::Display for TemplateLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bundled { name, .. } => write!(f, "bundled:{name}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Option keys a proxy platform reads for its backend servers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProxyKeys {
    /// Table of server name → protocol id.
    pub servers: &'static str,
    /// Seconds between backend pings, `-1` to disable.
    pub ping_interval: &'static str,
    /// Whether detected protocols are written back to the servers table.
    pub ping_save: &'static str,
}

/// Capabilities the config store consumes from a host integration.
pub trait PlatformConfig: Send + Sync {
    /// Human-readable platform name, used in logs.
    fn name(&self) -> &'static str;

    fn default_template_location(&self) -> TemplateLocation;

    /// Template options that do not apply on this platform.
    fn unsupported_options(&self) -> UnsupportedOptions;

    /// Proxy-specific keys, `None` for platforms that are not proxies.
    fn proxy_keys(&self) -> Option<ProxyKeys> {
        None
    }

    /// Called once per reload, after merge and before the document is
    /// installed and persisted.
    fn normalize(&self, _doc: &mut SettingsDocument) {}

    /// Companion protocol plugin resolved for this host, or [`NoCompanion`].
    fn companion(&self) -> Arc<dyn CompanionProtocols> {
        Arc::new(NoCompanion)
    }
}

/// Reports the lowest protocol version the host itself can speak.
pub trait ProtocolHost: Send + Sync {
    fn lowest_supported_protocol(&self) -> Result<i32, PlatformError>;
}

/// Rewrites the server protocol table stored under `table_key`.
///
/// - integer entries are kept;
/// - string entries are resolved with [`ProtocolVersion::closest`] and
///   removed when no known version matches;
/// - entries of any other shape are removed;
/// - a missing `default` entry is filled from `host`. When the host cannot
///   answer, the failure is logged and no default is injected.
///
/// A missing or non-object table is replaced by an empty table first. The
/// table keeps its position in the document.
pub fn normalize_server_protocols(
    doc: &mut SettingsDocument,
    table_key: &str,
    host: &dyn ProtocolHost,
) {
    let mut servers = match doc.get_mut(table_key).map(Value::take) {
        Some(Value::Object(map)) => map,
        Some(other) => {
            warn!(
                key = table_key,
                found = viaconf_core::codec::type_name(&other),
                "server table is not an object; resetting it"
            );
            Map::new()
        }
        None => Map::new(),
    };

    servers = servers
        .into_iter()
        .filter_map(|(server, version)| resolve_entry(table_key, server, version))
        .collect();

    if !servers.contains_key("default") {
        match host.lowest_supported_protocol() {
            Ok(id) => {
                debug!(key = table_key, protocol = id, "injecting default server protocol");
                servers.insert("default".to_string(), Value::from(id));
            }
            Err(e) => {
                warn!(key = table_key, error = %e, "could not inject default server protocol")
            }
        }
    }

    doc.insert(table_key.to_string(), Value::Object(servers));
}

fn resolve_entry(table_key: &str, server: String, version: Value) -> Option<(String, Value)> {
    match version {
        Value::Number(n) if n.is_i64() || n.is_u64() => Some((server, Value::Number(n))),
        Value::String(label) => match ProtocolVersion::closest(&label) {
            Some(found) => {
                debug!(
                    key = table_key,
                    server = %server,
                    label = %label,
                    protocol = %found,
                    "resolved server protocol label"
                );
                Some((server, Value::from(found.id)))
            }
            None => {
                warn!(
                    key = table_key,
                    server = %server,
                    label = %label,
                    "unknown protocol version; removing server entry"
                );
                None
            }
        },
        other => {
            warn!(
                key = table_key,
                server = %server,
                found = viaconf_core::codec::type_name(&other),
                "server protocol is neither a number nor a label; removing entry"
            );
            None
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Fixed(i32);

    impl ProtocolHost for Fixed {
        fn lowest_supported_protocol(&self) -> Result<i32, PlatformError> {
            Ok(self.0)
        }
    }

    struct Booting;

    impl ProtocolHost for Booting {
        fn lowest_supported_protocol(&self) -> Result<i32, PlatformError> {
            Err(PlatformError::ProtocolUnavailable("injector not ready".into()))
        }
    }

    fn doc_with(servers: Value) -> SettingsDocument {
        let mut doc = SettingsDocument::new();
        doc.insert("max-pps".into(), json!(800));
        doc.insert("servers".into(), servers);
        doc
    }

    #[test]
    fn test_release_label_becomes_protocol_id() {
        // Arrange
        let mut doc = doc_with(json!({"prod": "1.16.4"}));

        // Act
        normalize_server_protocols(&mut doc, "servers", &Fixed(47));

        // Assert
        assert_eq!(doc["servers"]["prod"], json!(754));
    }

    #[test]
    fn test_unknown_label_is_removed() {
        let mut doc = doc_with(json!({"bad": "not-a-version", "ok": 340}));

        normalize_server_protocols(&mut doc, "servers", &Fixed(47));

        assert!(doc["servers"].get("bad").is_none());
        assert_eq!(doc["servers"]["ok"], json!(340));
    }

    #[test]
    fn test_missing_default_is_injected_from_host() {
        let mut doc = doc_with(json!({"prod": 754}));

        normalize_server_protocols(&mut doc, "servers", &Fixed(47));

        assert_eq!(doc["servers"]["default"], json!(47));
    }

    #[test]
    fn test_existing_default_is_kept() {
        let mut doc = doc_with(json!({"default": "1.12.2"}));

        normalize_server_protocols(&mut doc, "servers", &Fixed(47));

        assert_eq!(doc["servers"]["default"], json!(340));
    }

    #[test]
    fn test_host_failure_skips_default_injection() {
        // Arrange
        let mut doc = doc_with(json!({"prod": 754}));

        // Act
        normalize_server_protocols(&mut doc, "servers", &Booting);

        // Assert
        assert_eq!(doc["servers"], json!({"prod": 754}));
    }

    #[test]
    fn test_non_numeric_non_string_entries_are_removed() {
        let mut doc = doc_with(json!({"a": true, "b": [1], "c": 1.5, "d": 5}));

        normalize_server_protocols(&mut doc, "servers", &Fixed(47));

        assert_eq!(doc["servers"], json!({"d": 5, "default": 47}));
    }

    #[test]
    fn test_non_object_table_is_reset() {
        let mut doc = doc_with(json!("oops"));

        normalize_server_protocols(&mut doc, "servers", &Fixed(47));

        assert_eq!(doc["servers"], json!({"default": 47}));
    }

    #[test]
    fn test_missing_table_is_created() {
        let mut doc = SettingsDocument::new();

        normalize_server_protocols(&mut doc, "servers", &Fixed(107));

        assert_eq!(doc["servers"], json!({"default": 107}));
    }

    #[test]
    fn test_template_location_display() {
        let bundled = TemplateLocation::Bundled { name: "config.json", text: "{}" };
        assert_eq!(bundled.to_string(), "bundled:config.json");
        let file = TemplateLocation::File(PathBuf::from("/tmp/template.json"));
        assert_eq!(file.to_string(), "/tmp/template.json");
    }
}
