//! # viaconf-core
//!
//! Shared library for ViaConf containing the settings document model, the
//! lenient JSON codec, the comment store, and the template merge.
//!
//! This crate is used by every platform integration. It has zero
//! dependencies on the filesystem, host runtimes, or plugin loaders: callers
//! hand it text and documents, and it hands back text and documents.
//!
//! # Pipeline overview
//!
//! A host plugin ships a canonical *template* (JSON with comments) listing
//! every recognised option and its default. On every load:
//!
//! - **`comments`** scans the template text and remembers which comment lines
//!   belong to which dotted key path.
//! - **`codec`** decodes the template and the user's on-disk file into
//!   [`SettingsDocument`]s.
//! - **`document::merge`** overlays the user's values onto the template,
//!   dropping unsupported and obsolete keys.
//! - **`codec`** encodes the result, and **`comments`** re-inserts the
//!   template's comments around it before it is written back.
//!
//! - **`protocol`** holds the registry of known protocol versions used by
//!   proxy platforms to normalise their server tables.

pub mod codec;
pub mod comments;
pub mod document;
pub mod protocol;

pub use codec::{decode, encode, encode_with, DecodeError, EncodeError, EncodeOptions};
pub use comments::{CommentRecord, CommentStore};
pub use document::merge::merge;
pub use document::{lookup, SettingsDocument, UnsupportedOptions, PATH_SEPARATOR};
pub use protocol::version::ProtocolVersion;
