//! Feedback capture — stored newest-first and forwarded to the telemetry
//! webhook. Unlike submission telemetry, an unconfigured webhook is
//! surfaced here: the user pressed a feedback button and deserves to know
//! it went nowhere.

pub mod handlers;

use crate::errors::AppError;
use crate::models::feedback::FeedbackEntry;
use crate::storage::{self, Store, FEEDBACK_LOG_KEY};
use crate::telemetry::Telemetry;

pub async fn load_log(store: &dyn Store) -> Result<Vec<FeedbackEntry>, AppError> {
    Ok(storage::get_json(store, FEEDBACK_LOG_KEY)
        .await?
        .unwrap_or_default())
}

/// Validates and records a feedback entry, then forwards it to the
/// webhook. Rejects up front when no webhook is configured.
pub async fn submit(
    store: &dyn Store,
    telemetry: &Telemetry,
    entry: FeedbackEntry,
) -> Result<(), AppError> {
    entry.validate()?;
    if !telemetry.is_configured() {
        return Err(AppError::TelemetryUnavailable);
    }

    let mut log = load_log(store).await?;
    log.insert(0, entry.clone());
    storage::put_json(store, FEEDBACK_LOG_KEY, &log).await?;

    telemetry.log_feedback(&entry);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::models::feedback::YesNo;
    use crate::storage::memory::MemoryStore;

    fn entry(rating: u8, comments: &str) -> FeedbackEntry {
        FeedbackEntry {
            rating,
            is_helpful: Some(YesNo::Yes),
            would_recommend: Some(YesNo::No),
            comments: comments.to_string(),
            submitted_at: Utc::now(),
        }
    }

    fn configured_telemetry() -> Telemetry {
        Telemetry::new(Some("https://example.com/hook".to_string()))
    }

    #[tokio::test]
    async fn test_submit_prepends_newest_first() {
        let store = MemoryStore::new();
        let telemetry = configured_telemetry();
        submit(&store, &telemetry, entry(4, "first")).await.unwrap();
        submit(&store, &telemetry, entry(5, "second")).await.unwrap();

        let log = load_log(&store).await.unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].comments, "second");
        assert_eq!(log[1].comments, "first");
    }

    #[tokio::test]
    async fn test_submit_without_webhook_is_unavailable() {
        let store = MemoryStore::new();
        let telemetry = Telemetry::new(None);
        let result = submit(&store, &telemetry, entry(4, "lost")).await;
        assert!(matches!(result, Err(AppError::TelemetryUnavailable)));
        assert!(load_log(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_submit_rejects_out_of_range_rating() {
        let store = MemoryStore::new();
        let telemetry = configured_telemetry();
        let result = submit(&store, &telemetry, entry(0, "bad")).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
