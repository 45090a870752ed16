use super::Store;
use crate::constants::ERR_EMAIL_EXISTS;
use crate::error::{AppError, Result};
use crate::models::{NewUser, UserRecord};

const SELECT_USER: &str = "SELECT id, name, phone, email, password, role FROM users";

impl Store {
    /// Insert a user; a duplicate email maps to `AppError::Conflict`
    pub async fn insert_user(&self, user: &NewUser) -> Result<i64> {
        let mut conn = self.conn().await?;
        let result = sqlx::query(
            "INSERT INTO users (name, phone, email, password, role) VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&user.name)
        .bind(&user.phone)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .execute(&mut *conn)
        .await;

        match result {
            Ok(done) => Ok(done.last_insert_rowid()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                tracing::info!("Signup rejected: email already registered");
                Err(AppError::Conflict(ERR_EMAIL_EXISTS.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let mut conn = self.conn().await?;
        let user = sqlx::query_as::<_, UserRecord>(&format!("{} WHERE email = ?1", SELECT_USER))
            .bind(email)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(user)
    }

    pub async fn find_user_by_id(&self, id: i64) -> Result<Option<UserRecord>> {
        let mut conn = self.conn().await?;
        let user = sqlx::query_as::<_, UserRecord>(&format!("{} WHERE id = ?1", SELECT_USER))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(user)
    }

    /// Replace a stored password value (used to upgrade legacy plaintext rows)
    pub async fn update_password_hash(&self, id: i64, password_hash: &str) -> Result<()> {
        let mut conn = self.conn().await?;
        sqlx::query("UPDATE users SET password = ?1 WHERE id = ?2")
            .bind(password_hash)
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    pub async fn count_users(&self) -> Result<i64> {
        let mut conn = self.conn().await?;
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&mut *conn)
            .await?;
        Ok(count)
    }
}
