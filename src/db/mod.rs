pub mod helpers;
pub mod pool;
pub mod requests;
pub mod schema;
pub mod users;

use sqlx::pool::PoolConnection;
use sqlx::{Sqlite, SqlitePool};
use std::path::Path;

pub use pool::create_pool;

/// Store handle shared by all operations
///
/// Cloning is cheap (the pool is reference counted). Every query method
/// acquires its own connection and returns it to the pool when the guard
/// drops, on success and error paths alike.
#[derive(Clone, Debug)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub(crate) async fn conn(&self) -> Result<PoolConnection<Sqlite>, sqlx::Error> {
        self.pool.acquire().await
    }

    /// Check that a connection can be acquired and used
    pub async fn ping(&self) -> bool {
        let result = async {
            let mut conn = self.conn().await?;
            sqlx::query("SELECT 1").execute(&mut *conn).await
        }
        .await;

        match result {
            Ok(_) => true,
            Err(e) => {
                tracing::error!("Database health check failed: {:?}", e);
                false
            }
        }
    }
}

/// Open or create the SQLite database at the given path
///
/// Creates all required tables on first run and applies additive migrations.
pub async fn open_store(path: impl AsRef<Path>) -> Result<Store, sqlx::Error> {
    let path = path.as_ref();
    tracing::info!("Opening database at: {:?}", path);

    // Create parent directory if it doesn't exist
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| {
                tracing::error!("Failed to create database directory: {}", e);
                sqlx::Error::Io(e)
            })?;
        }
    }

    let pool = create_pool(path).await?;

    {
        let mut conn = pool.acquire().await?;
        schema::initialize(&mut conn).await?;
    }

    tracing::info!("Database initialized successfully");

    Ok(Store::new(pool))
}
