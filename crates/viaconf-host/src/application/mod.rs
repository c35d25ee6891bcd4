//! Application layer: the contracts a host integration fulfils and the
//! typed view the rest of the plugin reads settings through.
//!
//! **Dependency rule**: this layer depends on `viaconf_core` only. Concrete
//! platforms, template loading, and file persistence live in
//! `infrastructure` and implement the traits declared here.

pub mod companion;
pub mod error;
pub mod options;
pub mod platform;
pub mod settings;
