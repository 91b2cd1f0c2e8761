//! Usage Gate — quota enforcement per identity.
//!
//! Identities are either anonymous (a client-generated UUID) or a
//! registered account. At-limit requests are rejected BEFORE any network
//! call; counters increment only after a successful generation or
//! refinement, so a failed AI call never consumes quota.

pub mod handlers;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::accounts;
use crate::errors::AppError;
use crate::models::user::{Role, StoredUser};
use crate::storage::{self, usage_key, Store};

pub const ANONYMOUS_GENERATION_LIMIT: u32 = 3;
pub const ANONYMOUS_REFINEMENT_LIMIT: u32 = 5;
pub const ONETIME_GENERATION_LIMIT: u32 = 1;

/// Who is asking. Carried in request bodies; accounts are looked up
/// server-side so client-supplied roles or counters are never trusted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Identity {
    Anonymous { client_id: Uuid },
    Account { email: String },
}

/// Anonymous per-client counters, stored under `usage:{client_id}`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct UsageCounters {
    pub generations: u32,
    pub refinements: u32,
}

/// Remaining-quota view returned alongside generation responses.
#[derive(Debug, Clone, Serialize)]
pub struct UsageSnapshot {
    pub generations_used: u32,
    /// None means unlimited.
    pub generation_limit: Option<u32>,
    pub refinements_used: u32,
    pub refinement_limit: Option<u32>,
}

async fn load_counters(store: &dyn Store, client_id: &Uuid) -> Result<UsageCounters, AppError> {
    Ok(storage::get_json(store, &usage_key(client_id))
        .await?
        .unwrap_or_default())
}

async fn save_counters(
    store: &dyn Store,
    client_id: &Uuid,
    counters: &UsageCounters,
) -> Result<(), AppError> {
    storage::put_json(store, &usage_key(client_id), counters).await
}

/// Clears an anonymous identity's counters. The only way an anonymous
/// identity is ever unblocked.
pub async fn clear_counters(store: &dyn Store, client_id: &Uuid) -> Result<(), AppError> {
    storage::delete(store, &usage_key(client_id)).await
}

async fn resolve_account(store: &dyn Store, email: &str) -> Result<StoredUser, AppError> {
    accounts::find_account(store, email)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No account found for {email}")))
}

/// Rejects the request if the identity has no generation quota left.
pub async fn check_generation(store: &dyn Store, identity: &Identity) -> Result<(), AppError> {
    match identity {
        Identity::Anonymous { client_id } => {
            let counters = load_counters(store, client_id).await?;
            if counters.generations >= ANONYMOUS_GENERATION_LIMIT {
                return Err(AppError::UsageLimit {
                    message: "You've used all your free CV generations. Please upgrade to continue."
                        .to_string(),
                    upgrade: false,
                });
            }
            Ok(())
        }
        Identity::Account { email } => {
            let account = resolve_account(store, email).await?;
            match account.role {
                Role::Pro | Role::Superadmin => Ok(()),
                Role::Onetime => {
                    if account.usage_count.unwrap_or(0) >= ONETIME_GENERATION_LIMIT {
                        Err(AppError::UsageLimit {
                            message: "This one-time account has already been used.".to_string(),
                            upgrade: false,
                        })
                    } else {
                        Ok(())
                    }
                }
            }
        }
    }
}

/// Rejects the request if the identity has no refinement quota left.
/// Refinement is a Pro feature for logged-in accounts.
pub async fn check_refinement(store: &dyn Store, identity: &Identity) -> Result<(), AppError> {
    match identity {
        Identity::Anonymous { client_id } => {
            let counters = load_counters(store, client_id).await?;
            if counters.refinements >= ANONYMOUS_REFINEMENT_LIMIT {
                return Err(AppError::UsageLimit {
                    message:
                        "You've used all your free refinements. Please upgrade for unlimited editing."
                            .to_string(),
                    upgrade: false,
                });
            }
            Ok(())
        }
        Identity::Account { email } => {
            let account = resolve_account(store, email).await?;
            match account.role {
                Role::Pro | Role::Superadmin => Ok(()),
                Role::Onetime => Err(AppError::UsageLimit {
                    message: "Refinements are a Pro feature. Please upgrade for unlimited editing."
                        .to_string(),
                    upgrade: true,
                }),
            }
        }
    }
}

/// Records a successful generation. Must only be called after the AI
/// response parsed cleanly.
pub async fn record_generation(store: &dyn Store, identity: &Identity) -> Result<(), AppError> {
    match identity {
        Identity::Anonymous { client_id } => {
            let mut counters = load_counters(store, client_id).await?;
            counters.generations += 1;
            save_counters(store, client_id, &counters).await
        }
        Identity::Account { email } => accounts::record_account_usage(store, email).await,
    }
}

/// Records a successful refinement. Accounts that reach this point are
/// Pro or superadmin, which are not metered.
pub async fn record_refinement(store: &dyn Store, identity: &Identity) -> Result<(), AppError> {
    match identity {
        Identity::Anonymous { client_id } => {
            let mut counters = load_counters(store, client_id).await?;
            counters.refinements += 1;
            save_counters(store, client_id, &counters).await
        }
        Identity::Account { .. } => Ok(()),
    }
}

pub async fn snapshot(store: &dyn Store, identity: &Identity) -> Result<UsageSnapshot, AppError> {
    match identity {
        Identity::Anonymous { client_id } => {
            let counters = load_counters(store, client_id).await?;
            Ok(UsageSnapshot {
                generations_used: counters.generations,
                generation_limit: Some(ANONYMOUS_GENERATION_LIMIT),
                refinements_used: counters.refinements,
                refinement_limit: Some(ANONYMOUS_REFINEMENT_LIMIT),
            })
        }
        Identity::Account { email } => {
            let account = resolve_account(store, email).await?;
            match account.role {
                Role::Pro | Role::Superadmin => Ok(UsageSnapshot {
                    generations_used: 0,
                    generation_limit: None,
                    refinements_used: 0,
                    refinement_limit: None,
                }),
                Role::Onetime => Ok(UsageSnapshot {
                    generations_used: account.usage_count.unwrap_or(0),
                    generation_limit: Some(ONETIME_GENERATION_LIMIT),
                    refinements_used: 0,
                    refinement_limit: Some(0),
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::{create_managed_user, register_admin, ADMIN_EMAIL};
    use crate::storage::memory::MemoryStore;

    fn anon() -> Identity {
        Identity::Anonymous {
            client_id: Uuid::new_v4(),
        }
    }

    #[tokio::test]
    async fn test_anonymous_fourth_generation_blocked() {
        let store = MemoryStore::new();
        let identity = anon();
        for _ in 0..3 {
            check_generation(&store, &identity).await.unwrap();
            record_generation(&store, &identity).await.unwrap();
        }
        let result = check_generation(&store, &identity).await;
        assert!(matches!(result, Err(AppError::UsageLimit { .. })));
    }

    #[tokio::test]
    async fn test_anonymous_sixth_refinement_blocked() {
        let store = MemoryStore::new();
        let identity = anon();
        for _ in 0..5 {
            check_refinement(&store, &identity).await.unwrap();
            record_refinement(&store, &identity).await.unwrap();
        }
        let result = check_refinement(&store, &identity).await;
        assert!(matches!(result, Err(AppError::UsageLimit { .. })));
    }

    #[tokio::test]
    async fn test_clearing_counters_unblocks() {
        let store = MemoryStore::new();
        let identity = anon();
        for _ in 0..3 {
            record_generation(&store, &identity).await.unwrap();
        }
        assert!(check_generation(&store, &identity).await.is_err());

        let Identity::Anonymous { client_id } = &identity else {
            unreachable!()
        };
        clear_counters(&store, client_id).await.unwrap();
        assert!(check_generation(&store, &identity).await.is_ok());
    }

    #[tokio::test]
    async fn test_onetime_second_generation_blocked() {
        let store = MemoryStore::new();
        create_managed_user(&store, "one@example.com", "longenough", Role::Onetime)
            .await
            .unwrap();
        let identity = Identity::Account {
            email: "one@example.com".to_string(),
        };
        check_generation(&store, &identity).await.unwrap();
        record_generation(&store, &identity).await.unwrap();
        let result = check_generation(&store, &identity).await;
        assert!(matches!(result, Err(AppError::UsageLimit { .. })));
    }

    #[tokio::test]
    async fn test_pro_and_superadmin_never_blocked() {
        let store = MemoryStore::new();
        create_managed_user(&store, "pro@example.com", "longenough", Role::Pro)
            .await
            .unwrap();
        register_admin(&store, ADMIN_EMAIL, "longenough", "longenough")
            .await
            .unwrap();

        for email in ["pro@example.com", ADMIN_EMAIL] {
            let identity = Identity::Account {
                email: email.to_string(),
            };
            for _ in 0..10 {
                check_generation(&store, &identity).await.unwrap();
                record_generation(&store, &identity).await.unwrap();
                check_refinement(&store, &identity).await.unwrap();
                record_refinement(&store, &identity).await.unwrap();
            }
        }
    }

    #[tokio::test]
    async fn test_onetime_refinement_requires_upgrade() {
        let store = MemoryStore::new();
        create_managed_user(&store, "one@example.com", "longenough", Role::Onetime)
            .await
            .unwrap();
        let identity = Identity::Account {
            email: "one@example.com".to_string(),
        };
        let result = check_refinement(&store, &identity).await;
        match result {
            Err(AppError::UsageLimit { upgrade, .. }) => assert!(upgrade),
            other => panic!("expected UsageLimit, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unknown_account_is_not_found() {
        let store = MemoryStore::new();
        let identity = Identity::Account {
            email: "ghost@example.com".to_string(),
        };
        let result = check_generation(&store, &identity).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_snapshot_reflects_anonymous_counts() {
        let store = MemoryStore::new();
        let identity = anon();
        record_generation(&store, &identity).await.unwrap();
        record_refinement(&store, &identity).await.unwrap();
        record_refinement(&store, &identity).await.unwrap();

        let snap = snapshot(&store, &identity).await.unwrap();
        assert_eq!(snap.generations_used, 1);
        assert_eq!(snap.generation_limit, Some(ANONYMOUS_GENERATION_LIMIT));
        assert_eq!(snap.refinements_used, 2);
        assert_eq!(snap.refinement_limit, Some(ANONYMOUS_REFINEMENT_LIMIT));
    }

    #[tokio::test]
    async fn test_identity_serde_tagged_form() {
        let json = serde_json::json!({
            "kind": "account",
            "email": "user@example.com"
        });
        let identity: Identity = serde_json::from_value(json).unwrap();
        assert!(matches!(identity, Identity::Account { .. }));

        let json = serde_json::json!({
            "kind": "anonymous",
            "client_id": Uuid::nil()
        });
        let identity: Identity = serde_json::from_value(json).unwrap();
        assert!(matches!(identity, Identity::Anonymous { .. }));
    }
}
