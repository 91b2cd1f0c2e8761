//! Account store and session handling.
//!
//! The original tool kept accounts in browser storage with plaintext
//! passwords and client-held roles. Here the records live server-side
//! behind the `Store` trait, passwords are argon2id hashes, and admin
//! routes check an opaque session token. Emails are lowercased and used
//! as the unique key; the admin email is fixed and compared
//! case-insensitively everywhere.

pub mod handlers;
pub mod password;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{LoggedInUser, Role, StoredUser};
use crate::storage::{self, Store, ADMIN_ACCOUNT_KEY, MANAGED_USERS_KEY};

/// The only email allowed to register the administrator account.
pub const ADMIN_EMAIL: &str = "admin@la121consultants.co.uk";

const MIN_PASSWORD_LEN: usize = 8;
/// Managed accounts expire 30 days after creation.
const MANAGED_USER_EXPIRY_DAYS: i64 = 30;

/// A logged-in session, stored under `session:{token}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

fn is_admin_email(email: &str) -> bool {
    email.trim().eq_ignore_ascii_case(ADMIN_EMAIL)
}

fn check_password_length(password: &str) -> Result<(), AppError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(
            "Password must be at least 8 characters long.".to_string(),
        ));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Store access
// ────────────────────────────────────────────────────────────────────────────

pub async fn load_admin(store: &dyn Store) -> Result<Option<StoredUser>, AppError> {
    storage::get_json(store, ADMIN_ACCOUNT_KEY).await
}

pub async fn load_managed_users(store: &dyn Store) -> Result<Vec<StoredUser>, AppError> {
    Ok(storage::get_json(store, MANAGED_USERS_KEY)
        .await?
        .unwrap_or_default())
}

async fn save_managed_users(store: &dyn Store, users: &[StoredUser]) -> Result<(), AppError> {
    storage::put_json(store, MANAGED_USERS_KEY, &users).await
}

/// Looks up any account — admin or managed — by lowercased email.
pub async fn find_account(store: &dyn Store, email: &str) -> Result<Option<StoredUser>, AppError> {
    if is_admin_email(email) {
        return load_admin(store).await;
    }
    let users = load_managed_users(store).await?;
    Ok(users
        .into_iter()
        .find(|u| u.email.eq_ignore_ascii_case(email)))
}

/// Increments a `onetime` account's usage counter in place.
/// No-op for other roles.
pub async fn record_account_usage(store: &dyn Store, email: &str) -> Result<(), AppError> {
    let mut users = load_managed_users(store).await?;
    let mut changed = false;
    for user in users.iter_mut() {
        if user.email.eq_ignore_ascii_case(email) && user.role == Role::Onetime {
            user.usage_count = Some(user.usage_count.unwrap_or(0) + 1);
            changed = true;
        }
    }
    if changed {
        save_managed_users(store, &users).await?;
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Operations
// ────────────────────────────────────────────────────────────────────────────

/// One-time registration of the administrator account.
pub async fn register_admin(
    store: &dyn Store,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<LoggedInUser, AppError> {
    if !is_admin_email(email) {
        return Err(AppError::Validation(
            "Registration is only permitted for the designated administrator email.".to_string(),
        ));
    }
    check_password_length(password)?;
    if password != confirm_password {
        return Err(AppError::Validation("Passwords do not match.".to_string()));
    }
    if load_admin(store).await?.is_some() {
        return Err(AppError::Validation(
            "Admin account is already registered.".to_string(),
        ));
    }

    let admin = StoredUser {
        email: ADMIN_EMAIL.to_string(),
        password_hash: password::hash_password(password)?,
        role: Role::Superadmin,
        created_at: Utc::now(),
        expires_at: None,
        usage_count: None,
    };
    storage::put_json(store, ADMIN_ACCOUNT_KEY, &admin).await?;
    Ok(LoggedInUser::from(&admin))
}

pub async fn login_admin(
    store: &dyn Store,
    email: &str,
    password: &str,
) -> Result<StoredUser, AppError> {
    let admin = load_admin(store).await?.ok_or_else(|| {
        AppError::NotFound(
            "Admin account not found. Please complete the one-time registration.".to_string(),
        )
    })?;
    if admin.email.eq_ignore_ascii_case(email) && password::verify_password(password, &admin.password_hash)
    {
        Ok(admin)
    } else {
        Err(AppError::Unauthorized)
    }
}

/// Login for managed users. The administrator email is rejected here —
/// admins use the admin login.
pub async fn login_user(
    store: &dyn Store,
    email: &str,
    password: &str,
) -> Result<StoredUser, AppError> {
    if is_admin_email(email) {
        return Err(AppError::Validation(
            "Administrators must use the admin login.".to_string(),
        ));
    }
    let users = load_managed_users(store).await?;
    let user = users
        .into_iter()
        .find(|u| u.email.eq_ignore_ascii_case(email));
    match user {
        Some(u) if password::verify_password(password, &u.password_hash) => Ok(u),
        _ => Err(AppError::Unauthorized),
    }
}

/// Admin-only: creates a managed `pro` or `onetime` account with a
/// 30-day expiry. Rejects duplicate emails across admin and managed users.
pub async fn create_managed_user(
    store: &dyn Store,
    email: &str,
    password: &str,
    role: Role,
) -> Result<LoggedInUser, AppError> {
    if role == Role::Superadmin {
        return Err(AppError::Validation(
            "Managed users must be 'pro' or 'onetime'.".to_string(),
        ));
    }
    let email = email.trim().to_lowercase();
    if email.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Please provide both an email and a password.".to_string(),
        ));
    }
    check_password_length(password)?;
    if find_account(store, &email).await?.is_some() {
        return Err(AppError::Validation(
            "A user with this email already exists.".to_string(),
        ));
    }

    let now = Utc::now();
    let user = StoredUser {
        email,
        password_hash: password::hash_password(password)?,
        role,
        created_at: now,
        expires_at: Some(now + Duration::days(MANAGED_USER_EXPIRY_DAYS)),
        usage_count: if role == Role::Onetime { Some(0) } else { None },
    };

    let mut users = load_managed_users(store).await?;
    users.push(user.clone());
    save_managed_users(store, &users).await?;
    Ok(LoggedInUser::from(&user))
}

pub async fn remove_managed_user(store: &dyn Store, email: &str) -> Result<(), AppError> {
    let users = load_managed_users(store).await?;
    let remaining: Vec<StoredUser> = users
        .into_iter()
        .filter(|u| !u.email.eq_ignore_ascii_case(email))
        .collect();
    save_managed_users(store, &remaining).await
}

// ────────────────────────────────────────────────────────────────────────────
// Sessions
// ────────────────────────────────────────────────────────────────────────────

pub async fn create_session(store: &dyn Store, user: &StoredUser) -> Result<String, AppError> {
    let token = Uuid::new_v4().to_string();
    let session = Session {
        email: user.email.clone(),
        role: user.role,
        created_at: Utc::now(),
    };
    storage::put_json(store, &storage::session_key(&token), &session).await?;
    Ok(token)
}

pub async fn load_session(store: &dyn Store, token: &str) -> Result<Option<Session>, AppError> {
    storage::get_json(store, &storage::session_key(token)).await
}

/// Extracts the Bearer token and requires a superadmin session.
pub async fn require_admin(
    store: &dyn Store,
    headers: &axum::http::HeaderMap,
) -> Result<Session, AppError> {
    let token = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(AppError::Unauthorized)?;
    let session = load_session(store, token)
        .await?
        .ok_or(AppError::Unauthorized)?;
    if session.role != Role::Superadmin {
        return Err(AppError::Forbidden);
    }
    Ok(session)
}
