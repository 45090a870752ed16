use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::time::Duration;

/// Create a SQLite connection pool for the database file at `path`
///
/// The file is created if missing. WAL mode lets readers proceed while a
/// writer holds the lock; the busy timeout covers short writer contention.
pub async fn create_pool(path: &Path) -> Result<SqlitePool, sqlx::Error> {
    tracing::info!("Creating database connection pool...");

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect_with(options)
        .await?;

    tracing::info!("Database connection pool created successfully");

    Ok(pool)
}
