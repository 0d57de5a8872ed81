//! Database migration command.
//!
//! The server also migrates on startup; this command exists for preparing a
//! database without bringing the server up (deploy hooks, fresh checkouts).

use tracing::info;

use webshop_server::config::WebshopConfig;
use webshop_server::db;

/// Run the embedded migrations against the configured database.
///
/// # Errors
///
/// Returns an error if configuration loading, the connection, or a migration
/// fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = WebshopConfig::from_env()?;

    if let Some(dir) = config.database_parent_dir() {
        std::fs::create_dir_all(&dir)?;
    }

    info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;

    info!("Running migrations...");
    db::MIGRATOR.run(&pool).await?;

    info!("Migrations complete!");
    Ok(())
}
