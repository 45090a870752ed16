use super::Store;
use crate::models::{HelperLocation, LocationPing};

/// Whether a location ping created a record or moved an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

impl Store {
    /// Insert-or-update a helper record keyed on (name, phone, request_id)
    ///
    /// Lookup and write run on the same connection.
    pub async fn upsert_helper_location(
        &self,
        ping: &LocationPing,
    ) -> Result<UpsertOutcome, sqlx::Error> {
        let mut conn = self.conn().await?;

        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM helpers WHERE name = ?1 AND phone = ?2 AND request_id = ?3",
        )
        .bind(&ping.name)
        .bind(&ping.phone)
        .bind(ping.request_id)
        .fetch_optional(&mut *conn)
        .await?;

        match existing {
            Some(id) => {
                sqlx::query("UPDATE helpers SET latitude = ?1, longitude = ?2 WHERE id = ?3")
                    .bind(ping.latitude)
                    .bind(ping.longitude)
                    .bind(id)
                    .execute(&mut *conn)
                    .await?;
                Ok(UpsertOutcome::Updated)
            }
            None => {
                sqlx::query(
                    "INSERT INTO helpers (name, phone, latitude, longitude, request_id)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                )
                .bind(&ping.name)
                .bind(&ping.phone)
                .bind(ping.latitude)
                .bind(ping.longitude)
                .bind(ping.request_id)
                .execute(&mut *conn)
                .await?;
                Ok(UpsertOutcome::Inserted)
            }
        }
    }

    /// Every helper record, unfiltered
    pub async fn list_helpers(&self) -> Result<Vec<HelperLocation>, sqlx::Error> {
        let mut conn = self.conn().await?;
        sqlx::query_as::<_, HelperLocation>(
            "SELECT name, latitude, longitude, request_id FROM helpers ORDER BY id",
        )
        .fetch_all(&mut *conn)
        .await
    }

    pub async fn count_helpers(&self) -> Result<i64, sqlx::Error> {
        let mut conn = self.conn().await?;
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM helpers")
            .fetch_one(&mut *conn)
            .await
    }

    /// Most recently inserted helper record for a request
    pub async fn latest_helper_for_request(
        &self,
        request_id: i64,
    ) -> Result<Option<HelperLocation>, sqlx::Error> {
        let mut conn = self.conn().await?;
        sqlx::query_as::<_, HelperLocation>(
            "SELECT name, latitude, longitude, request_id FROM helpers
             WHERE request_id = ?1 ORDER BY id DESC LIMIT 1",
        )
        .bind(request_id)
        .fetch_optional(&mut *conn)
        .await
    }
}
