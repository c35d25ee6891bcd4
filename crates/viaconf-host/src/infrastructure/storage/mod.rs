//! Storage infrastructure: persistence of the effective configuration.
//!
//! - `file` reads the on-disk document (absent means "first run") and writes
//!   replacements atomically through a sibling temporary file.
//! - `config_store` owns the effective document and runs the
//!   load → merge → normalize → persist pipeline.

pub mod config_store;
pub mod file;
