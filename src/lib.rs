//! Libris application library
//!
//! Provides the application modules and the bootstrap that wires them into
//! the kernel registry and the HTTP server.

pub mod modules;

use anyhow::Context;
use libris_kernel::{settings::Settings, InitCtx, ModuleRegistry};

/// Re-export commonly used types
pub use modules::*;

/// Build a registry holding every application module.
pub fn build_registry(settings: &Settings) -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, settings)?;
    Ok(registry)
}

/// Run the full lifecycle: init and start modules, serve HTTP until a
/// shutdown signal, then stop modules.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let registry = build_registry(&settings).context("failed to register modules")?;
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    let served = libris_http::start_server(&registry, &settings).await;

    registry.stop_all().await?;
    served
}
