//! Optional companion plugin capability.
//!
//! Some hosts run a second protocol-translation plugin alongside this one.
//! When it is present it knows the real client protocol of players it has
//! handled. The host integration resolves the capability once at startup and
//! passes [`NoCompanion`] when nothing is installed.

/// Player identifier as seen by the host.
pub type PlayerName = str;

/// Protocol lookups answered by a companion plugin.
pub trait CompanionProtocols: Send + Sync {
    /// Client protocol of `player`, if the companion knows it.
    fn protocol_version(&self, player: &PlayerName) -> Option<i32>;
}

/// Null object used when no companion plugin is installed.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCompanion;

impl CompanionProtocols for NoCompanion {
    fn protocol_version(&self, _player: &PlayerName) -> Option<i32> {
        None
    }
}

/// Client protocol of `player`, or `-1` when it is unknown.
pub fn client_protocol(companion: &dyn CompanionProtocols, player: &PlayerName) -> i32 {
    companion.protocol_version(player).unwrap_or(-1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Known(HashMap<&'static str, i32>);

    impl CompanionProtocols for Known {
        fn protocol_version(&self, player: &PlayerName) -> Option<i32> {
            self.0.get(player).copied()
        }
    }

    #[test]
    fn test_no_companion_reports_unknown() {
        assert_eq!(client_protocol(&NoCompanion, "steve"), -1);
    }

    #[test]
    fn test_platforms_default_to_no_companion() {
        use crate::application::platform::{PlatformConfig, TemplateLocation};
        use viaconf_core::UnsupportedOptions;

        struct Plain;
        impl PlatformConfig for Plain {
            fn name(&self) -> &'static str {
                "plain"
            }
            fn default_template_location(&self) -> TemplateLocation {
                TemplateLocation::Bundled { name: "t", text: "{}" }
            }
            fn unsupported_options(&self) -> UnsupportedOptions {
                UnsupportedOptions::new()
            }
        }

        assert_eq!(client_protocol(Plain.companion().as_ref(), "steve"), -1);
    }

    #[test]
    fn test_companion_answer_is_used() {
        // Arrange
        let companion = Known(HashMap::from([("alex", 340)]));

        // Act / Assert
        assert_eq!(client_protocol(&companion, "alex"), 340);
        assert_eq!(client_protocol(&companion, "steve"), -1);
    }
}
