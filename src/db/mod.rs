//! Database module
pub mod entities;
pub mod repo;
pub mod types;

use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

pub async fn establish_connection(database_url: &str) -> Result<DatabaseConnection> {
    let mut opt = ConnectOptions::new(database_url);
    opt.max_connections(10)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(1800));

    let connection = Database::connect(opt)
        .await
        .with_context(|| format!("Failed to connect to database {}", database_url))?;
    info!("Connected to database: {}", database_url);

    Ok(connection)
}

/// In-memory database with the real migrations applied
#[cfg(test)]
pub async fn setup_test_db() -> Result<repo::Repo> {
    use sea_orm_migration::MigratorTrait;

    // Every pooled connection would open its own in-memory database
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1);
    let db = Database::connect(opt).await?;
    migration::Migrator::up(&db, None).await?;

    Ok(repo::Repo::new(db))
}
