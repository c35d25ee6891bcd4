//! File helpers for the persisted settings document.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::application::error::ConfigError;

/// Reads `path`, returning `None` when it does not exist yet.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found".
pub fn read_optional(path: &Path) -> Result<Option<String>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Replaces the contents of `path` with `content`.
///
/// The text is written to a sibling temporary file which is then renamed over
/// `path`, so a failure at any point leaves the previous file untouched.
/// Creates the parent directory if needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] naming the path that failed.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let tmp = temp_sibling(path);
    let result = write_and_sync(&tmp, content).and_then(|()| {
        std::fs::rename(&tmp, path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    });
    if result.is_err() {
        // Best effort; the original error is what matters.
        let _ = std::fs::remove_file(&tmp);
    }
    result
}

fn write_and_sync(tmp: &Path, content: &str) -> Result<(), ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: tmp.to_path_buf(),
        source,
    };
    let mut file = std::fs::File::create(tmp).map_err(io_err)?;
    file.write_all(content.as_bytes()).map_err(io_err)?;
    file.sync_all().map_err(io_err)
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!(".{}.tmp", std::process::id()));
    path.with_file_name(name)
}
