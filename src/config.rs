use anyhow::Result;
use sea_orm::{Database, DatabaseConnection};

use crate::admin;

/// Initialize the data layer: check static configuration and connect to the
/// configured database.
pub async fn initialize() -> Result<DatabaseConnection> {
    // The admin listing registry is static configuration; a bad column name
    // is a startup error, not a runtime one.
    admin::validate_registry()?;

    // Load configuration
    dotenvy::dotenv().ok();
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://edurust.db".to_string());

    // Connect to database
    tracing::info!("Connecting to database: {}", database_url);
    let db = Database::connect(&database_url).await?;

    Ok(db)
}

/// Initialize the tracing subscriber.
///
/// Logs to stdout; the level is controlled via the RUST_LOG environment
/// variable.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "edurust=debug".into()),
        )
        .init();
}
