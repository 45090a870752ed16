use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use hmac::{Hmac, Mac};
use rand_core::OsRng;
use sha2::{Digest, Sha256};

use crate::models::Role;

type HmacSha256 = Hmac<Sha256>;

// =============================================================================
// Password Hashing
// =============================================================================

/// Hash a password with Argon2id and a fresh random salt
///
/// Returns the PHC string (`$argon2id$v=19$...`) which embeds salt and params.
pub fn hash_password(password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| e.to_string())
}

/// Outcome of checking a candidate password against a stored value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordCheck {
    Valid,
    /// Matched a plaintext value left over from before hashing; caller should rehash
    ValidLegacy,
    Invalid,
}

/// Verify a password against a stored Argon2 hash
///
/// Rows created before hashing was introduced hold the plaintext password.
/// Those are compared in constant time and reported as `ValidLegacy` so the
/// login path can upgrade them.
pub fn verify_password(stored: &str, candidate: &str) -> PasswordCheck {
    match PasswordHash::new(stored) {
        Ok(parsed) => {
            if Argon2::default()
                .verify_password(candidate.as_bytes(), &parsed)
                .is_ok()
            {
                PasswordCheck::Valid
            } else {
                PasswordCheck::Invalid
            }
        }
        Err(_) => {
            if constant_time_eq(stored, candidate) {
                PasswordCheck::ValidLegacy
            } else {
                PasswordCheck::Invalid
            }
        }
    }
}

// =============================================================================
// Session Tokens
// =============================================================================

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: i64,
    pub role: Role,
    pub expires_at: i64,
}

fn sign(payload: &str, secret: &str) -> Option<String> {
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            tracing::error!("Failed to create HMAC instance");
            return None;
        }
    };
    mac.update(payload.as_bytes());
    Some(hex::encode(mac.finalize().into_bytes()))
}

/// Issue a session token of the form `<user_id>.<role>.<expires_at>.<hmac>`
///
/// The HMAC-SHA256 signature covers everything before the last dot.
pub fn issue_session_token(
    user_id: i64,
    role: Role,
    secret: &str,
    ttl_secs: i64,
) -> Option<String> {
    let expires_at = chrono::Utc::now().timestamp() + ttl_secs;
    let payload = format!("{}.{}.{}", user_id, role.as_str(), expires_at);
    let signature = sign(&payload, secret)?;
    Some(format!("{}.{}", payload, signature))
}

/// Verify a session token's signature and expiry
///
/// Returns `None` for malformed, tampered or expired tokens.
pub fn verify_session_token(token: &str, secret: &str) -> Option<Session> {
    let (payload, signature) = token.rsplit_once('.')?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(payload.as_bytes());
    let sig_bytes = match hex::decode(signature) {
        Ok(bytes) => bytes,
        Err(_) => {
            tracing::warn!("Invalid hex signature format in session token");
            return None;
        }
    };
    if mac.verify_slice(&sig_bytes).is_err() {
        tracing::warn!("Session token signature mismatch");
        return None;
    }

    let mut parts = payload.splitn(3, '.');
    let user_id = parts.next()?.parse().ok()?;
    let role = Role::parse(parts.next()?)?;
    let expires_at: i64 = parts.next()?.parse().ok()?;

    if expires_at <= chrono::Utc::now().timestamp() {
        tracing::debug!("Session token expired for user {}", user_id);
        return None;
    }

    Some(Session {
        user_id,
        role,
        expires_at,
    })
}

// =============================================================================
// Key Comparison
// =============================================================================

/// Compare two secrets without short-circuiting on the first differing byte
///
/// Both sides are hashed first so the comparison length does not leak either.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    let left = Sha256::digest(a.as_bytes());
    let right = Sha256::digest(b.as_bytes());
    left.iter()
        .zip(right.iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-session-secret";

    // =========================================================================
    // Password Tests
    // =========================================================================

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("hunter22").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert_eq!(verify_password(&hash, "hunter22"), PasswordCheck::Valid);
        assert_eq!(verify_password(&hash, "hunter23"), PasswordCheck::Invalid);
    }

    #[test]
    fn test_hash_is_salted() {
        let first = hash_password("same-password").unwrap();
        let second = hash_password("same-password").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_legacy_plaintext() {
        assert_eq!(
            verify_password("plain-pass", "plain-pass"),
            PasswordCheck::ValidLegacy
        );
        assert_eq!(
            verify_password("plain-pass", "other"),
            PasswordCheck::Invalid
        );
    }

    // =========================================================================
    // Session Token Tests
    // =========================================================================

    #[test]
    fn test_session_token_round_trip() {
        let token = issue_session_token(42, Role::Volunteer, SECRET, 60).unwrap();
        let session = verify_session_token(&token, SECRET).unwrap();

        assert_eq!(session.user_id, 42);
        assert_eq!(session.role, Role::Volunteer);
    }

    #[test]
    fn test_session_token_wrong_secret() {
        let token = issue_session_token(42, Role::Requester, SECRET, 60).unwrap();

        assert!(verify_session_token(&token, "another-secret").is_none());
    }

    #[test]
    fn test_session_token_tampered_role() {
        let token = issue_session_token(42, Role::Requester, SECRET, 60).unwrap();
        let tampered = token.replacen("requester", "volunteer", 1);

        assert!(verify_session_token(&tampered, SECRET).is_none());
    }

    #[test]
    fn test_session_token_expired() {
        let token = issue_session_token(42, Role::Requester, SECRET, -1).unwrap();

        assert!(verify_session_token(&token, SECRET).is_none());
    }

    #[test]
    fn test_session_token_garbage() {
        assert!(verify_session_token("", SECRET).is_none());
        assert!(verify_session_token("not-a-token", SECRET).is_none());
        assert!(verify_session_token("1.requester.99.zz", SECRET).is_none());
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq("admin-key", "admin-key"));
        assert!(!constant_time_eq("admin-key", "admin-kez"));
        assert!(!constant_time_eq("admin-key", ""));
    }
}
