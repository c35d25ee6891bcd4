//! Mock platform for unit and integration testing.
//!
//! Serves a caller-supplied template and unsupported set, and records every
//! `normalize` call so tests can check how often the pipeline ran.

use std::sync::{Arc, Mutex};

use viaconf_core::{SettingsDocument, UnsupportedOptions};

use crate::application::companion::{CompanionProtocols, NoCompanion};
use crate::application::platform::{PlatformConfig, ProxyKeys, TemplateLocation};

/// A [`PlatformConfig`] with fixed answers and a normalize call log.
pub struct MockPlatform {
    template: TemplateLocation,
    unsupported: Vec<String>,
    proxy_keys: Option<ProxyKeys>,
    companion: Arc<dyn CompanionProtocols>,
    normalized: Mutex<Vec<SettingsDocument>>,
}

impl MockPlatform {
    pub fn new(template: TemplateLocation, unsupported: &[&str]) -> Self {
        Self {
            template,
            unsupported: unsupported.iter().map(|s| s.to_string()).collect(),
            proxy_keys: None,
            companion: Arc::new(NoCompanion),
            normalized: Mutex::new(Vec::new()),
        }
    }

    /// Makes the mock report itself as a proxy reading `keys`.
    pub fn with_proxy_keys(mut self, keys: ProxyKeys) -> Self {
        self.proxy_keys = Some(keys);
        self
    }

    /// Makes the mock report `companion` as its resolved companion plugin.
    pub fn with_companion(mut self, companion: Arc<dyn CompanionProtocols>) -> Self {
        self.companion = companion;
        self
    }

    /// Number of times [`PlatformConfig::normalize`] was called.
    pub fn normalize_calls(&self) -> usize {
        self.normalized.lock().expect("lock poisoned").len()
    }

    /// The documents passed to `normalize`, oldest first.
    pub fn normalized_documents(&self) -> Vec<SettingsDocument> {
        self.normalized.lock().expect("lock poisoned").clone()
    }
}

impl PlatformConfig for MockPlatform {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn default_template_location(&self) -> TemplateLocation {
        self.template.clone()
    }

    fn unsupported_options(&self) -> UnsupportedOptions {
        self.unsupported.iter().cloned().collect()
    }

    fn proxy_keys(&self) -> Option<ProxyKeys> {
        self.proxy_keys
    }

    fn normalize(&self, doc: &mut SettingsDocument) {
        self.normalized.lock().expect("lock poisoned").push(doc.clone());
    }

    fn companion(&self) -> Arc<dyn CompanionProtocols> {
        Arc::clone(&self.companion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mock_platform_records_normalize_calls() {
        // Arrange
        let mock = MockPlatform::new(
            TemplateLocation::Bundled { name: "t", text: "{}" },
            &["a", "b"],
        );
        let mut doc = SettingsDocument::new();
        doc.insert("x".into(), json!(1));

        // Act
        mock.normalize(&mut doc);

        // Assert
        assert_eq!(mock.normalize_calls(), 1);
        assert_eq!(mock.normalized_documents()[0], doc);
        assert_eq!(mock.unsupported_options().len(), 2);
        assert!(mock.proxy_keys().is_none());
    }

    #[test]
    fn test_mock_platform_reports_configured_companion() {
        // Arrange
        struct Everyone;
        impl CompanionProtocols for Everyone {
            fn protocol_version(&self, _player: &str) -> Option<i32> {
                Some(340)
            }
        }
        let mock = MockPlatform::new(TemplateLocation::Bundled { name: "t", text: "{}" }, &[])
            .with_companion(Arc::new(Everyone));

        // Act
        let protocol = mock.companion().protocol_version("alex");

        // Assert
        assert_eq!(protocol, Some(340));
    }
}
