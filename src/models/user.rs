use serde::{Deserialize, Serialize};

/// Account role
///
/// Volunteers/NGOs get a dedicated role instead of a magic credential pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Requester,
    Volunteer,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Requester => "requester",
            Role::Volunteer => "volunteer",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "requester" => Some(Role::Requester),
            "volunteer" => Some(Role::Volunteer),
            _ => None,
        }
    }
}

/// User row as stored in the `users` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: String,
    /// Argon2 PHC string, or plaintext for rows written before hashing existed
    pub password: String,
    pub role: Role,
}

/// User model for API responses (never carries the password)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub role: Role,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            phone: record.phone,
            email: record.email,
            role: record.role,
        }
    }
}

/// Fields needed to insert a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

impl User {
    /// Minimal email shape check: something before and after a single '@'
    pub fn validate_email(email: &str) -> bool {
        match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty() && !domain.is_empty() && !domain.contains('@')
            }
            None => false,
        }
    }
}
