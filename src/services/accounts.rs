use serde::{Deserialize, Serialize};

use crate::constants::{
    ERR_ALL_FIELDS_REQUIRED, REDIRECT_REQUESTER, REDIRECT_VOLUNTEER, SESSION_TTL_SECS,
};
use crate::db::Store;
use crate::error::{AppError, Result};
use crate::models::request::present;
use crate::models::{NewUser, Role, User};
use crate::security::{
    hash_password, issue_session_token, verify_password, verify_session_token, PasswordCheck,
};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupForm {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    #[serde(alias = "pass")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    pub email: Option<String>,
    #[serde(alias = "pass")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LoginOutcome {
    pub user: User,
    pub redirect: &'static str,
    pub token: String,
}

/// Hash on the blocking pool
async fn hash_blocking(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await?
        .map_err(AppError::Internal)
}

/// Create a requester account with a salted password hash
pub async fn signup(store: &Store, form: SignupForm) -> Result<i64> {
    let (name, phone, email, password) = match (
        present(form.name),
        present(form.phone),
        present(form.email),
        form.password.filter(|p| !p.is_empty()),
    ) {
        (Some(n), Some(p), Some(e), Some(pw)) => (n, p, e, pw),
        _ => return Err(AppError::Validation(ERR_ALL_FIELDS_REQUIRED.to_string())),
    };

    if !User::validate_email(&email) {
        return Err(AppError::Validation("Invalid email address".to_string()));
    }

    let password_hash = hash_blocking(password).await?;

    let id = store
        .insert_user(&NewUser {
            name,
            phone,
            email,
            password_hash,
            role: Role::Requester,
        })
        .await?;

    tracing::info!("New user registered: {}", id);
    Ok(id)
}

/// Check credentials and issue a session token
///
/// A legacy plaintext password that matches is rehashed in place.
pub async fn login(store: &Store, secret: &str, form: LoginForm) -> Result<LoginOutcome> {
    let (email, password) = match (present(form.email), form.password.filter(|p| !p.is_empty())) {
        (Some(e), Some(p)) => (e, p),
        _ => return Err(AppError::Validation(ERR_ALL_FIELDS_REQUIRED.to_string())),
    };

    let record = store
        .find_user_by_email(&email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let stored = record.password.clone();
    let candidate = password.clone();
    let check = tokio::task::spawn_blocking(move || verify_password(&stored, &candidate)).await?;

    match check {
        PasswordCheck::Invalid => {
            tracing::warn!("Failed login for user {}", record.id);
            return Err(AppError::InvalidCredentials);
        }
        PasswordCheck::ValidLegacy => {
            tracing::info!("Upgrading plaintext password for user {}", record.id);
            let hash = hash_blocking(password).await?;
            store.update_password_hash(record.id, &hash).await?;
        }
        PasswordCheck::Valid => {}
    }

    let token = issue_session_token(record.id, record.role, secret, SESSION_TTL_SECS)
        .ok_or_else(|| AppError::Internal("session token signing failed".to_string()))?;

    let redirect = match record.role {
        Role::Volunteer => REDIRECT_VOLUNTEER,
        Role::Requester => REDIRECT_REQUESTER,
    };

    Ok(LoginOutcome {
        user: User::from(record),
        redirect,
        token,
    })
}

/// Resolve a bearer token to its user
pub async fn current_user(store: &Store, secret: &str, token: &str) -> Result<User> {
    let session = verify_session_token(token, secret).ok_or(AppError::Unauthorized)?;

    let record = store
        .find_user_by_id(session.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if record.role != session.role {
        return Err(AppError::Unauthorized);
    }

    Ok(User::from(record))
}

/// Make sure the configured volunteer/NGO account exists
///
/// An existing account with that email is left untouched.
pub async fn ensure_volunteer_account(store: &Store, email: &str, password: &str) -> Result<()> {
    if store.find_user_by_email(email).await?.is_some() {
        tracing::debug!("Volunteer account already present");
        return Ok(());
    }

    let password_hash = hash_blocking(password.to_string()).await?;
    store
        .insert_user(&NewUser {
            name: "Volunteer/NGO".to_string(),
            phone: String::new(),
            email: email.to_string(),
            password_hash,
            role: Role::Volunteer,
        })
        .await?;

    tracing::info!("Volunteer account created for {}", email);
    Ok(())
}
