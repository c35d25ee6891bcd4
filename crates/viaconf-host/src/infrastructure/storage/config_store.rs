//! The config store: owner of the effective settings document.
//!
//! # Pipeline
//!
//! Every [`ConfigStore::reload`] runs, under the store's lock:
//!
//! 1. load the template (fatal if missing);
//! 2. scan its comments and clear those of unsupported options;
//! 3. read and decode the user's file (unparsable → empty document);
//! 4. merge the user's values into the template;
//! 5. let the platform normalise the result;
//! 6. install the new document by swapping the `Arc`;
//! 7. persist it with the template's comments re-inserted.
//!
//! # Concurrency
//!
//! One `Mutex` guards the whole state. Accessors hold it for a single
//! lookup. A reload builds the new document completely before swapping the
//! reference, so a reader sees either the old or the new document, never a
//! mix. [`ConfigStore::values`] hands out an `Arc` snapshot which stays
//! valid after later reloads or `set` calls.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tracing::{info, warn};
use viaconf_core::{
    decode, encode, lookup, merge, CommentStore, SettingsDocument, UnsupportedOptions,
    PATH_SEPARATOR,
};

use super::file::{read_optional, write_atomic};
use crate::application::error::ConfigError;
use crate::application::options::OptionSource;
use crate::application::platform::{PlatformConfig, TemplateLocation};
use crate::application::settings::Settings;
use crate::infrastructure::template::TemplateLoader;

/// Leading comment blocks of the template that describe the whole file.
pub const HEADER_BLOCKS: usize = 1;

struct State {
    document: Arc<SettingsDocument>,
    comments: CommentStore,
    unsupported: UnsupportedOptions,
}

/// Thread-safe owner of the effective settings document.
pub struct ConfigStore {
    path: PathBuf,
    platform: Arc<dyn PlatformConfig>,
    template: TemplateLocation,
    state: Mutex<State>,
}

impl ConfigStore {
    /// Creates an empty store for the file at `path`.
    ///
    /// Nothing is read until [`reload`](Self::reload) is called; see
    /// [`open`](Self::open) for the usual entry point.
    pub fn new(path: impl Into<PathBuf>, platform: Arc<dyn PlatformConfig>) -> Self {
        let template = platform.default_template_location();
        Self {
            path: path.into(),
            platform,
            template,
            state: Mutex::new(State {
                document: Arc::new(SettingsDocument::new()),
                comments: CommentStore::parse("", PATH_SEPARATOR, HEADER_BLOCKS),
                unsupported: UnsupportedOptions::new(),
            }),
        }
    }

    /// Reads the template from `location` instead of the platform default.
    pub fn with_template(mut self, location: TemplateLocation) -> Self {
        self.template = location;
        self
    }

    /// Creates a store and runs the first reload.
    ///
    /// # Errors
    ///
    /// See [`reload`](Self::reload).
    pub fn open(
        path: impl Into<PathBuf>,
        platform: Arc<dyn PlatformConfig>,
    ) -> Result<Self, ConfigError> {
        let store = Self::new(path, platform);
        store.reload()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn platform(&self) -> &dyn PlatformConfig {
        self.platform.as_ref()
    }

    /// Runs the full load → merge → normalize pipeline and installs the
    /// result, then writes it back to disk.
    ///
    /// A failure to persist is logged and does not fail the reload: the new
    /// document is already installed.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ResourceMissing`] / [`ConfigError::TemplateMalformed`]
    ///   when the template cannot be used.
    /// - [`ConfigError::Io`] when the user's file exists but cannot be read.
    ///
    /// On error the previously installed document is left in place.
    pub fn reload(&self) -> Result<(), ConfigError> {
        let mut state = self.lock();

        let template = TemplateLoader::load(&self.template)?;
        let unsupported = self.platform.unsupported_options();
        let mut comments = CommentStore::parse(&template.text, PATH_SEPARATOR, HEADER_BLOCKS);
        comments.suppress(&unsupported);

        let on_disk = match read_optional(&self.path)? {
            Some(text) => decode(&text).unwrap_or_else(|e| {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "config file is unreadable; using template defaults"
                );
                SettingsDocument::new()
            }),
            None => SettingsDocument::new(),
        };

        let mut document = merge(&template.document, &unsupported, &on_disk);
        self.platform.normalize(&mut document);

        *state = State {
            document: Arc::new(document),
            comments,
            unsupported,
        };
        info!(
            platform = self.platform.name(),
            template = %template.location,
            options = state.document.len(),
            "configuration loaded"
        );

        if let Err(e) = self.persist(&state) {
            warn!(path = %self.path.display(), error = %e, "failed to write reloaded config");
        }
        Ok(())
    }

    /// Writes the current document to disk with the template's comments.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] or [`ConfigError::Encode`]. The file on
    /// disk is left unchanged and the in-memory document keeps any `set`
    /// changes, so a later save can succeed.
    pub fn save(&self) -> Result<(), ConfigError> {
        let state = self.lock();
        self.persist(&state)?;
        info!(path = %self.path.display(), "configuration saved");
        Ok(())
    }

    /// Overwrites the top-level option `key` without validation.
    ///
    /// `key` is taken literally: a dotted path such as `servers.lobby`
    /// becomes a new top-level key, which the next reload drops as unknown.
    /// Nested options are changed by setting their whole parent.
    pub fn set(&self, key: &str, value: Value) {
        let mut state = self.lock();
        Arc::make_mut(&mut state.document).insert(key.to_string(), value);
    }

    /// Snapshot of the effective document.
    pub fn values(&self) -> Arc<SettingsDocument> {
        Arc::clone(&self.lock().document)
    }

    /// The text [`save`](Self::save) would write.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Encode`] if the document cannot be encoded.
    pub fn rendered(&self) -> Result<String, ConfigError> {
        let state = self.lock();
        Self::render(&state)
    }

    /// Resolves the structured settings from one consistent snapshot.
    pub fn settings(&self) -> Settings {
        Settings::from_store(&*self.values(), self.platform())
    }

    fn persist(&self, state: &State) -> Result<(), ConfigError> {
        let text = Self::render(state)?;
        write_atomic(&self.path, &text)
    }

    fn render(state: &State) -> Result<String, ConfigError> {
        let json = encode(&state.document)?;
        Ok(state.comments.render(&json, &state.unsupported))
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl OptionSource for ConfigStore {
    fn value(&self, key: &str) -> Option<Value> {
        lookup(&self.lock().document, key).cloned()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
