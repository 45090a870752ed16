use sqlx::SqliteConnection;

const CREATE_USERS: &str = "CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT, phone TEXT, email TEXT UNIQUE, password TEXT)";

const CREATE_REQUESTS: &str = "CREATE TABLE IF NOT EXISTS requests (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    phone TEXT,
    resource TEXT,
    address TEXT,
    time TEXT)";

const CREATE_HELPERS: &str = "CREATE TABLE IF NOT EXISTS helpers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT,
    phone TEXT,
    latitude REAL,
    longitude REAL,
    request_id INTEGER)";

/// Columns added after the first release, applied only when missing
const ADDITIVE_COLUMNS: &[(&str, &str, &str)] = &[
    ("requests", "latitude", "REAL"),
    ("requests", "longitude", "REAL"),
    ("requests", "status", "TEXT DEFAULT 'Pending'"),
    ("users", "role", "TEXT DEFAULT 'requester'"),
];

/// Create missing tables and apply additive column migrations
///
/// Never drops or rewrites existing data, so an older database file can be
/// opened in place.
pub async fn initialize(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    for ddl in [CREATE_USERS, CREATE_REQUESTS, CREATE_HELPERS] {
        sqlx::query(ddl).execute(&mut *conn).await?;
    }

    for (table, column, definition) in ADDITIVE_COLUMNS {
        let existing = column_names(conn, table).await?;
        if !existing.iter().any(|c| c == column) {
            tracing::info!("Migrating {}: adding column {}", table, column);
            let ddl = format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, definition);
            sqlx::query(&ddl).execute(&mut *conn).await?;
        }
    }

    Ok(())
}

async fn column_names(conn: &mut SqliteConnection, table: &str) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT name FROM pragma_table_info(?1)")
        .bind(table)
        .fetch_all(&mut *conn)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Connection;

    #[tokio::test]
    async fn test_initialize_migrates_legacy_requests_table() {
        let mut conn = SqliteConnection::connect("sqlite::memory:").await.unwrap();

        // Layout of a database created before coordinates and status existed
        sqlx::query(CREATE_REQUESTS).execute(&mut conn).await.unwrap();
        sqlx::query(
            "INSERT INTO requests (phone, resource, address, time) VALUES ('+9199', 'Food', 'Old Town', '2024-01-01 09:00:00')",
        )
        .execute(&mut conn)
        .await
        .unwrap();

        initialize(&mut conn).await.unwrap();

        let columns = column_names(&mut conn, "requests").await.unwrap();
        for expected in ["latitude", "longitude", "status"] {
            assert!(columns.iter().any(|c| c == expected), "missing {}", expected);
        }

        let (resource, status, latitude): (String, String, Option<f64>) =
            sqlx::query_as("SELECT resource, status, latitude FROM requests")
                .fetch_one(&mut conn)
                .await
                .unwrap();
        assert_eq!(resource, "Food");
        assert_eq!(status, "Pending");
        assert!(latitude.is_none());
    }

    #[tokio::test]
    async fn test_initialize_is_idempotent() {
        let mut conn = SqliteConnection::connect("sqlite::memory:").await.unwrap();

        initialize(&mut conn).await.unwrap();
        initialize(&mut conn).await.unwrap();

        let columns = column_names(&mut conn, "users").await.unwrap();
        assert_eq!(columns.iter().filter(|c| c.as_str() == "role").count(), 1);
    }
}
