//! Template loading.
//!
//! The template is the authoritative list of recognised options, their
//! defaults, and the comments written around them. It is read-only at
//! runtime and re-read on every reload.

use viaconf_core::{decode, SettingsDocument};

use crate::application::error::ConfigError;
use crate::application::platform::TemplateLocation;

/// Template shipped inside the binary.
pub const BUNDLED_TEMPLATE: &str = include_str!("../../assets/config.json");

/// Location of [`BUNDLED_TEMPLATE`].
pub fn bundled() -> TemplateLocation {
    TemplateLocation::Bundled {
        name: "config.json",
        text: BUNDLED_TEMPLATE,
    }
}

/// A loaded template: raw text for the comment scan, decoded defaults for
/// the merge.
#[derive(Debug, Clone)]
pub struct Template {
    pub location: TemplateLocation,
    pub text: String,
    pub document: SettingsDocument,
}

pub struct TemplateLoader;

impl TemplateLoader {
    /// Reads and decodes the template at `location`.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ResourceMissing`] when the resource cannot be opened.
    /// - [`ConfigError::TemplateMalformed`] when it is not a valid document.
    pub fn load(location: &TemplateLocation) -> Result<Template, ConfigError> {
        let text = match location {
            TemplateLocation::Bundled { text, .. } => (*text).to_string(),
            TemplateLocation::File(path) => {
                std::fs::read_to_string(path).map_err(|source| ConfigError::ResourceMissing {
                    location: location.to_string(),
                    source,
                })?
            }
        };

        let document = decode(&text).map_err(|source| ConfigError::TemplateMalformed {
            location: location.to_string(),
            source,
        })?;

        Ok(Template {
            location: location.clone(),
            text,
            document,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use uuid::Uuid;

    #[test]
    fn test_bundled_template_decodes() {
        // Arrange / Act
        let template = TemplateLoader::load(&bundled()).unwrap();

        // Assert
        assert!(template.document.contains_key("max-pps"));
        assert!(template.document.contains_key("velocity-servers"));
        assert!(template.document.contains_key("bungee-servers"));
        assert!(template.text.contains('#'));
    }

    #[test]
    fn test_missing_file_is_resource_missing() {
        let path = std::env::temp_dir().join(format!("viaconf_missing_{}.json", Uuid::new_v4()));

        let err = TemplateLoader::load(&TemplateLocation::File(path)).unwrap_err();

        assert!(matches!(err, ConfigError::ResourceMissing { .. }));
    }

    #[test]
    fn test_malformed_template_is_reported() {
        let location = TemplateLocation::Bundled {
            name: "broken",
            text: "{ \"a\": ",
        };

        let err = TemplateLoader::load(&location).unwrap_err();

        assert!(matches!(err, ConfigError::TemplateMalformed { .. }));
    }

    #[test]
    fn test_file_template_is_read() {
        // Arrange
        let path: PathBuf =
            std::env::temp_dir().join(format!("viaconf_template_{}.json", Uuid::new_v4()));
        std::fs::write(&path, "# header\n\n{\n # opt\n \"opt\":1\n}\n").unwrap();

        // Act
        let template = TemplateLoader::load(&TemplateLocation::File(path.clone())).unwrap();

        // Assert
        assert_eq!(template.document["opt"], serde_json::json!(1));
        assert_eq!(template.location, TemplateLocation::File(path.clone()));

        let _ = std::fs::remove_file(path);
    }
}
