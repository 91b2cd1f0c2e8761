use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account role. `Onetime` accounts are limited to a single successful
/// generation; `Pro` and `Superadmin` are never gated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Superadmin,
    Pro,
    Onetime,
}

/// Account record as persisted in the store. Passwords are stored as
/// argon2id hashes — never plaintext.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredUser {
    /// Lowercased; unique key across admin and managed users.
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    /// Only meaningful for `Onetime` accounts.
    pub usage_count: Option<u32>,
}

/// Public view of an account — the stored record minus the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct LoggedInUser {
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub usage_count: Option<u32>,
}

impl From<&StoredUser> for LoggedInUser {
    fn from(user: &StoredUser) -> Self {
        LoggedInUser {
            email: user.email.clone(),
            role: user.role,
            created_at: user.created_at,
            expires_at: user.expires_at,
            usage_count: user.usage_count,
        }
    }
}

/// Derived account status. `Expired` takes precedence over `Used`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UserStatus {
    Active,
    Expired,
    Used,
}

impl StoredUser {
    pub fn status(&self, now: DateTime<Utc>) -> UserStatus {
        if self.role == Role::Superadmin {
            return UserStatus::Active;
        }
        if let Some(expires_at) = self.expires_at {
            if expires_at < now {
                return UserStatus::Expired;
            }
        }
        if self.role == Role::Onetime && self.usage_count.unwrap_or(0) >= 1 {
            return UserStatus::Used;
        }
        UserStatus::Active
    }
}
