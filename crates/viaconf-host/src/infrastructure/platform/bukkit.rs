//! Bukkit game server integration.
//!
//! A game server talks to clients directly, so the proxy backend options
//! have no meaning here and no normalisation is needed.

use viaconf_core::UnsupportedOptions;

use crate::application::platform::{PlatformConfig, TemplateLocation};
use crate::infrastructure::template;

const UNSUPPORTED: &[&str] = &[
    "bungee-ping-interval",
    "bungee-ping-save",
    "bungee-servers",
    "velocity-ping-interval",
    "velocity-ping-save",
    "velocity-servers",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct BukkitPlatform;

impl PlatformConfig for BukkitPlatform {
    fn name(&self) -> &'static str {
        "bukkit"
    }

    fn default_template_location(&self) -> TemplateLocation {
        template::bundled()
    }

    fn unsupported_options(&self) -> UnsupportedOptions {
        UNSUPPORTED.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use viaconf_core::SettingsDocument;

    #[test]
    fn test_bukkit_drops_only_proxy_options() {
        let options = BukkitPlatform.unsupported_options();

        assert!(options.contains("velocity-servers"));
        assert!(options.contains("bungee-ping-save"));
        assert!(!options.contains("item-cache"));
    }

    #[test]
    fn test_bukkit_normalize_leaves_document_alone() {
        let mut doc = SettingsDocument::new();
        doc.insert("max-pps".into(), json!(800));
        let before = doc.clone();

        BukkitPlatform.normalize(&mut doc);

        assert_eq!(doc, before);
        assert!(BukkitPlatform.proxy_keys().is_none());
    }
}
