//! # PrioSync Service
//!
//! Wires the pure scheduling core to its storage collaborators.
//!
//! - **Availability**: the caller-owned [`AvailabilityService`] handle
//! - **Config**: environment-driven settings
//!
//! Nothing here starts a server; the binaries and any embedding
//! application construct the service explicitly and own its lifetime.

/// Configuration module for service settings
pub mod config;
/// Load, save, edit and migrate a user's weekly availability
pub mod availability;

use std::{future::Future, sync::Arc, time::Duration};

use eyre::{eyre, Result};
use priosync_core::errors::{ScheduleError, ScheduleResult};
use priosync_db::{file_cache::FileFallbackCache, PgRecordStore, DbPool};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

pub use availability::{AvailabilityService, LoadedSchedule, MigrationOutcome};

/// Installs the global `tracing` subscriber at `level`.
pub fn init_tracing(level: Level) -> Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Builds the service over PostgreSQL plus the configured file cache tier.
pub fn build_service(config: &config::ServiceConfig, pool: DbPool) -> AvailabilityService {
    let service = AvailabilityService::new(Arc::new(PgRecordStore::new(pool)));
    match &config.legacy_cache_dir {
        Some(dir) => service.with_fallback(Arc::new(FileFallbackCache::new(dir.clone()))),
        None => service,
    }
}

/// Runs a storage-bound operation under a caller-chosen time limit.
pub async fn with_timeout<T, F>(limit: Duration, operation: F) -> ScheduleResult<T>
where
    F: Future<Output = ScheduleResult<T>>,
{
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result,
        Err(_) => Err(ScheduleError::Storage(eyre!(
            "Storage call timed out after {}s",
            limit.as_secs()
        ))),
    }
}
