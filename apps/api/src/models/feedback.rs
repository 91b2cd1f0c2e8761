use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YesNo {
    Yes,
    No,
}

/// A single feedback submission. The stored log is append-only,
/// newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackEntry {
    /// Star rating, 1-5.
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_helpful: Option<YesNo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub would_recommend: Option<YesNo>,
    #[serde(default)]
    pub comments: String,
    pub submitted_at: DateTime<Utc>,
}

impl FeedbackEntry {
    pub fn validate(&self) -> Result<(), AppError> {
        if !(1..=5).contains(&self.rating) {
            return Err(AppError::Validation(
                "Rating must be between 1 and 5.".to_string(),
            ));
        }
        Ok(())
    }
}
