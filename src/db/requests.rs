use super::Store;
use crate::constants::STATUS_ON_THE_WAY;
use crate::models::{NewRequest, Request};

const SELECT_REQUEST: &str =
    "SELECT id, phone, resource, address, time, latitude, longitude, status FROM requests";

impl Store {
    /// Insert a request with status `Pending`; returns the assigned id
    pub async fn insert_request(&self, request: &NewRequest, time: &str) -> Result<i64, sqlx::Error> {
        let mut conn = self.conn().await?;
        let result = sqlx::query(
            "INSERT INTO requests (phone, resource, address, time, latitude, longitude, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'Pending')",
        )
        .bind(&request.phone)
        .bind(&request.resource)
        .bind(&request.address)
        .bind(time)
        .bind(request.latitude)
        .bind(request.longitude)
        .execute(&mut *conn)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// All requests, newest first
    pub async fn list_requests(&self) -> Result<Vec<Request>, sqlx::Error> {
        let mut conn = self.conn().await?;
        sqlx::query_as::<_, Request>(&format!("{} ORDER BY id DESC", SELECT_REQUEST))
            .fetch_all(&mut *conn)
            .await
    }

    pub async fn get_request(&self, id: i64) -> Result<Option<Request>, sqlx::Error> {
        let mut conn = self.conn().await?;
        sqlx::query_as::<_, Request>(&format!("{} WHERE id = ?1", SELECT_REQUEST))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Set status to `On The Way`; returns the number of rows touched
    pub async fn mark_on_the_way(&self, id: i64) -> Result<u64, sqlx::Error> {
        let mut conn = self.conn().await?;
        let result = sqlx::query("UPDATE requests SET status = ?1 WHERE id = ?2")
            .bind(STATUS_ON_THE_WAY)
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete a request; returns false if no row had that id
    ///
    /// Helper rows referencing the id are left in place.
    pub async fn delete_request(&self, id: i64) -> Result<bool, sqlx::Error> {
        let mut conn = self.conn().await?;
        let result = sqlx::query("DELETE FROM requests WHERE id = ?1")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Highest request id, if any request exists
    pub async fn latest_request_id(&self) -> Result<Option<i64>, sqlx::Error> {
        let mut conn = self.conn().await?;
        sqlx::query_scalar::<_, i64>("SELECT id FROM requests ORDER BY id DESC LIMIT 1")
            .fetch_optional(&mut *conn)
            .await
    }

    /// Delete every request and reset the id sequence; returns rows removed
    pub async fn clear_requests(&self) -> Result<u64, sqlx::Error> {
        let mut conn = self.conn().await?;
        let deleted = sqlx::query("DELETE FROM requests")
            .execute(&mut *conn)
            .await?
            .rows_affected();
        sqlx::query("DELETE FROM sqlite_sequence WHERE name = 'requests'")
            .execute(&mut *conn)
            .await?;
        Ok(deleted)
    }

    pub async fn count_requests(&self) -> Result<(i64, i64), sqlx::Error> {
        let mut conn = self.conn().await?;
        sqlx::query_as::<_, (i64, i64)>(
            "SELECT COUNT(*), COALESCE(SUM(CASE WHEN status = 'Pending' THEN 1 ELSE 0 END), 0) FROM requests",
        )
        .fetch_one(&mut *conn)
        .await
    }
}
