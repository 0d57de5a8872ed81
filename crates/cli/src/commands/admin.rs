//! Admin credential management.

use tracing::info;

use webshop_server::config::WebshopConfig;
use webshop_server::db::credentials::{DEFAULT_PASSWORD, DEFAULT_USERNAME};
use webshop_server::db::{self, CredentialRepository};

/// Restore the default admin credentials, replacing any existing row.
///
/// # Errors
///
/// Returns an error if configuration loading or a database operation fails.
pub async fn reset() -> Result<(), Box<dyn std::error::Error>> {
    let config = WebshopConfig::from_env()?;

    let pool = db::create_pool(&config.database_url).await?;
    db::MIGRATOR.run(&pool).await?;

    CredentialRepository::new(&pool).reset_default().await?;
    info!("Admin credentials reset (username: {DEFAULT_USERNAME}, password: {DEFAULT_PASSWORD})");

    Ok(())
}
