use color_eyre::eyre::Result;
use dotenv::dotenv;
use priosync_db::{create_pool, file_cache::FileFallbackCache, schema::initialize_database};
use priosync_service::{config::ServiceConfig, with_timeout, MigrationOutcome};
use tracing::{error, info, warn};

/// Copies every schedule found in the legacy cache directory into the
/// record store, skipping owners that were already migrated.
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ServiceConfig::from_env()?;
    priosync_service::init_tracing(config.log_level)?;

    // Create database connection pool
    let db_pool = create_pool(&config.database_url, config.max_connections).await?;

    // Initialize database schema
    initialize_database(&db_pool).await?;

    let Some(cache_dir) = config.legacy_cache_dir.clone() else {
        info!("LEGACY_CACHE_DIR not set, nothing to migrate");
        db_pool.close().await;
        return Ok(());
    };

    let owners = FileFallbackCache::new(&cache_dir).owner_ids().await?;
    info!("Found {} cached schedules in {}", owners.len(), cache_dir.display());

    let service = priosync_service::build_service(&config, db_pool.clone());
    let (mut migrated, mut skipped, mut failed) = (0usize, 0usize, 0usize);

    for owner_id in &owners {
        match with_timeout(config.store_timeout(), service.migrate_legacy(owner_id)).await {
            Ok(MigrationOutcome::Migrated { report, .. }) => {
                info!("Migrated {}: {} records", owner_id, report.written);
                migrated += 1;
            }
            Ok(MigrationOutcome::AlreadyMigrated { records }) => {
                info!("Skipped {}: {} records already stored", owner_id, records);
                skipped += 1;
            }
            Ok(MigrationOutcome::NothingToMigrate) => {
                warn!("Cache file for {} holds no usable schedule", owner_id);
                skipped += 1;
            }
            Err(e) => {
                error!("Migration failed for {}: {}", owner_id, e);
                failed += 1;
            }
        }
    }

    info!(
        "Migration finished: {} migrated, {} skipped, {} failed",
        migrated, skipped, failed
    );

    db_pool.close().await;
    Ok(())
}
