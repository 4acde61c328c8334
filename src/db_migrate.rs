use color_eyre::eyre::Result;
use dotenv::dotenv;
use priosync_db::{create_pool, schema::initialize_database};
use priosync_service::config::ServiceConfig;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    let config = ServiceConfig::from_env()?;
    priosync_service::init_tracing(config.log_level)?;

    info!("Connecting to database...");
    let db_pool = create_pool(&config.database_url, 1).await?;

    initialize_database(&db_pool).await?;
    info!("Database schema is up to date");

    db_pool.close().await;
    Ok(())
}
