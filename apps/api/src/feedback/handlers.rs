use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::accounts;
use crate::errors::AppError;
use crate::models::feedback::{FeedbackEntry, YesNo};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFeedbackRequest {
    pub rating: u8,
    #[serde(default)]
    pub is_helpful: Option<YesNo>,
    #[serde(default)]
    pub would_recommend: Option<YesNo>,
    #[serde(default)]
    pub comments: String,
}

/// POST /api/v1/feedback
pub async fn submit_feedback(
    State(state): State<AppState>,
    Json(req): Json<SubmitFeedbackRequest>,
) -> Result<Json<Value>, AppError> {
    let entry = FeedbackEntry {
        rating: req.rating,
        is_helpful: req.is_helpful,
        would_recommend: req.would_recommend,
        comments: req.comments,
        submitted_at: Utc::now(),
    };
    super::submit(state.store.as_ref(), &state.telemetry, entry).await?;
    Ok(Json(json!({ "status": "received" })))
}

/// GET /api/v1/feedback — admin only, newest first.
pub async fn list_feedback(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<FeedbackEntry>>, AppError> {
    accounts::require_admin(state.store.as_ref(), &headers).await?;
    let log = super::load_log(state.store.as_ref()).await?;
    Ok(Json(log))
}
