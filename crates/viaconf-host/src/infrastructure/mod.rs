//! Infrastructure layer for the host crate.
//!
//! Contains the adapters that touch the outside world: template loading,
//! file-system persistence of the effective document, and the concrete
//! platform integrations.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `viaconf_core`, but MUST NOT be imported by the `application` layer.

pub mod platform;
pub mod storage;
pub mod template;
