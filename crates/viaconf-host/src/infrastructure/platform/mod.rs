//! Concrete platform integrations.
//!
//! Each host gets its own module declaring which template options it cannot
//! honour and how it normalises the merged document. Proxies additionally
//! resolve their backend server protocol table.
//!
//! # Testability
//!
//! [`mock::MockPlatform`] implements the same trait with fixed answers so the
//! config store can be tested without any real host.

use std::sync::Arc;

use clap::ValueEnum;
use viaconf_core::ProtocolVersion;

use crate::application::platform::{PlatformConfig, PlatformError, ProtocolHost};

pub mod bukkit;
pub mod bungee;
pub mod mock;
pub mod velocity;

pub use bukkit::BukkitPlatform;
pub use bungee::BungeePlatform;
pub use velocity::VelocityPlatform;

/// Host platforms the binary can act for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlatformKind {
    Velocity,
    Bungee,
    Bukkit,
}

/// Builds the integration for `kind`.
pub fn build(kind: PlatformKind, host: Arc<dyn ProtocolHost>) -> Arc<dyn PlatformConfig> {
    match kind {
        PlatformKind::Velocity => Arc::new(VelocityPlatform::new(host)),
        PlatformKind::Bungee => Arc::new(BungeePlatform::new(host)),
        PlatformKind::Bukkit => Arc::new(BukkitPlatform),
    }
}

/// A host whose lowest supported protocol is known up front.
#[derive(Debug, Clone, Copy)]
pub struct FixedProtocolHost(pub i32);

impl ProtocolHost for FixedProtocolHost {
    fn lowest_supported_protocol(&self) -> Result<i32, PlatformError> {
        Ok(self.0)
    }
}

/// Answers with the oldest release in the protocol registry.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistryProtocolHost;

impl ProtocolHost for RegistryProtocolHost {
    fn lowest_supported_protocol(&self) -> Result<i32, PlatformError> {
        Ok(ProtocolVersion::lowest().id)
    }
}
