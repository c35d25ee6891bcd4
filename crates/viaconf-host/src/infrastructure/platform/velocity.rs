//! Velocity proxy integration.

use std::sync::Arc;

use viaconf_core::{SettingsDocument, UnsupportedOptions};

use crate::application::platform::{
    normalize_server_protocols, PlatformConfig, ProtocolHost, ProxyKeys, TemplateLocation,
};
use crate::infrastructure::template;

/// Options that only make sense on a game server or on BungeeCord.
const UNSUPPORTED: &[&str] = &[
    "nms-player-ticking",
    "item-cache",
    "anti-xray-patch",
    "quick-move-action-fix",
    "bungee-ping-interval",
    "bungee-ping-save",
    "bungee-servers",
    "blockconnection-method",
    "change-1_9-hitbox",
    "change-1_14-hitbox",
];

const KEYS: ProxyKeys = ProxyKeys {
    servers: "velocity-servers",
    ping_interval: "velocity-ping-interval",
    ping_save: "velocity-ping-save",
};

pub struct VelocityPlatform {
    host: Arc<dyn ProtocolHost>,
}

impl VelocityPlatform {
    pub fn new(host: Arc<dyn ProtocolHost>) -> Self {
        Self { host }
    }
}

impl PlatformConfig for VelocityPlatform {
    fn name(&self) -> &'static str {
        "velocity"
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
    fn test_velocity_drops_bungee_options() {
        let options = VelocityPlatform::new(Arc::new(FixedProtocolHost(47))).unsupported_options();

        assert!(options.contains("bungee-servers"));
        assert!(options.contains("item-cache"));
        assert!(!options.contains("velocity-servers"));
    }

    #[test]
    fn test_velocity_normalizes_its_server_table() {
        // Arrange
        let platform = VelocityPlatform::new(Arc::new(FixedProtocolHost(47)));
        let mut doc = SettingsDocument::new();
        doc.insert("velocity-servers".into(), json!({"lobby": "1.15.2"}));

        // Act
        platform.normalize(&mut doc);

        // Assert
        assert_eq!(doc["velocity-servers"], json!({"lobby": 578, "default": 47}));
    }
}
