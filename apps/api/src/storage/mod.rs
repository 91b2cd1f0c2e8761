//! Persistence boundary — a small key-value store of JSON-encoded strings.
//!
//! The key layout mirrors the original client-side storage: one key for the
//! admin account, one for the managed-user list, one per anonymous client for
//! usage counters, one for the feedback log, plus session tokens. Components
//! receive an injected `Arc<dyn Store>` rather than reaching for ambient
//! global state.

pub mod memory;
pub mod postgres;

use anyhow::Result;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use crate::errors::AppError;

pub const ADMIN_ACCOUNT_KEY: &str = "admin_account";
pub const MANAGED_USERS_KEY: &str = "managed_users";
pub const FEEDBACK_LOG_KEY: &str = "feedback_log";

pub fn usage_key(client_id: &uuid::Uuid) -> String {
    format!("usage:{client_id}")
}

pub fn session_key(token: &str) -> String {
    format!("session:{token}")
}

/// Async key-value store of JSON-encoded string values.
#[async_trait]
pub trait Store: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn put(&self, key: &str, value: &str) -> Result<()>;
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Reads and decodes a JSON value. A corrupt record degrades to "no data"
/// with a warning instead of failing the request.
pub async fn get_json<T: DeserializeOwned>(
    store: &dyn Store,
    key: &str,
) -> Result<Option<T>, AppError> {
    let raw = store
        .get(key)
        .await
        .map_err(|e| AppError::Storage(e.to_string()))?;
    match raw {
        None => Ok(None),
        Some(raw) => match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!("Corrupt JSON at key '{key}', treating as absent: {e}");
                Ok(None)
            }
        },
    }
}

/// Encodes and writes a JSON value.
pub async fn put_json<T: Serialize>(
    store: &dyn Store,
    key: &str,
    value: &T,
) -> Result<(), AppError> {
    let raw = serde_json::to_string(value)
        .map_err(|e| AppError::Storage(format!("Failed to encode value for '{key}': {e}")))?;
    store
        .put(key, &raw)
        .await
        .map_err(|e| AppError::Storage(e.to_string()))
}

pub async fn delete(store: &dyn Store, key: &str) -> Result<(), AppError> {
    store
        .delete(key)
        .await
        .map_err(|e| AppError::Storage(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::memory::MemoryStore;
    use super::*;

    #[tokio::test]
    async fn test_get_json_on_missing_key_is_none() {
        let store = MemoryStore::new();
        let value: Option<Vec<String>> = get_json(&store, "nothing").await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_json_degrades_to_none() {
        let store = MemoryStore::new();
        store.put("bad", "{not json").await.unwrap();
        let value: Option<Vec<String>> = get_json(&store, "bad").await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_put_then_get_round_trips() {
        let store = MemoryStore::new();
        put_json(&store, "list", &vec!["a".to_string(), "b".to_string()])
            .await
            .unwrap();
        let value: Option<Vec<String>> = get_json(&store, "list").await.unwrap();
        assert_eq!(value.unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_usage_key_layout() {
        let id = uuid::Uuid::nil();
        assert_eq!(
            usage_key(&id),
            "usage:00000000-0000-0000-0000-000000000000"
        );
    }
}
