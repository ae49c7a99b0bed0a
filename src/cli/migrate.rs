use crate::config::{Settings, init_database, migrate_database};

/// Run database migrations
///
/// Connects to the configured database and applies every pending migration.
/// It does not initialize the full AppData structure.
pub async fn run_migrations(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Running database migrations...");

    let db = init_database(settings.database_url()).await?;
    migrate_database(&db).await?;

    tracing::info!("All migrations completed successfully");
    Ok(())
}
