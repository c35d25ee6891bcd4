//! BungeeCord proxy integration.

use std::sync::Arc;

use viaconf_core::{SettingsDocument, UnsupportedOptions};

use crate::application::platform::{
    normalize_server_protocols, PlatformConfig, ProtocolHost, ProxyKeys, TemplateLocation,
};
use crate::infrastructure::template;

/// Options that only make sense on a game server or on Velocity.
const UNSUPPORTED: &[&str] = &[
    "nms-player-ticking",
    "item-cache",
    "anti-xray-patch",
    "quick-move-action-fix",
    "velocity-ping-interval",
    "velocity-ping-save",
    "velocity-servers",
    "blockconnection-method",
    "change-1_9-hitbox",
    "change-1_14-hitbox",
];

const KEYS: ProxyKeys = ProxyKeys {
    servers: "bungee-servers",
    ping_interval: "bungee-ping-interval",
    ping_save: "bungee-ping-save",
};

pub struct BungeePlatform {
    host: Arc<dyn ProtocolHost>,
}

impl BungeePlatform {
    pub fn new(host: Arc<dyn ProtocolHost>) -> Self {
        Self { host }
    }
}

impl PlatformConfig for BungeePlatform {
    fn name(&self) -> &'static str {
        "bungee"
    }

    fn default_template_location(&self) -> TemplateLocation {
        template::bundled()
    }

    fn unsupported_options(&self) -> UnsupportedOptions {
        UNSUPPORTED.iter().copied().collect()
    }

    fn proxy_keys(&self) -> Option<ProxyKeys> {
        Some(KEYS)
    }

    fn normalize(&self, doc: &mut SettingsDocument) {
        normalize_server_protocols(doc, KEYS.servers, self.host.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::platform::FixedProtocolHost;
    use serde_json::json;

    #[test]
    fn test_bungee_drops_velocity_options() {
        let options = BungeePlatform::new(Arc::new(FixedProtocolHost(47))).unsupported_options();

        assert!(options.contains("velocity-servers"));
        assert!(options.contains("item-cache"));
        assert!(!options.contains("bungee-servers"));
    }

    #[test]
    fn test_bungee_normalizes_its_server_table() {
        // Arrange
        let platform = BungeePlatform::new(Arc::new(FixedProtocolHost(107)));
        let mut doc = SettingsDocument::new();
        doc.insert("bungee-servers".into(), json!({"hub": 340, "legacy": "1.7.10"}));

        // Act
        platform.normalize(&mut doc);

        // Assert
        assert_eq!(doc["bungee-servers"], json!({"hub": 340, "default": 107}));
    }
}
