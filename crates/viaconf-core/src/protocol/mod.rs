//! Protocol identifiers referenced by settings.

pub mod version;

pub use version::ProtocolVersion;
