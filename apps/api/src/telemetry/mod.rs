//! Telemetry sink — fire-and-forget delivery to an external webhook.
//!
//! Each event is a single form field named `payload` holding a JSON object
//! tagged with a `type` of `submission` or `feedback`. Delivery runs on a
//! detached task and failures are logged, never surfaced; an unconfigured
//! webhook is surfaced to callers only through `is_configured`, which the
//! feedback route checks before accepting a submission.

use chrono::Utc;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::models::cv::UserInfo;
use crate::models::feedback::FeedbackEntry;

#[derive(Clone)]
pub struct Telemetry {
    client: Client,
    webhook_url: Option<String>,
}

impl Telemetry {
    pub fn new(webhook_url: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(15))
                .build()
                .expect("Failed to build HTTP client"),
            webhook_url,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.webhook_url.is_some()
    }

    /// Records a generation submission. Never blocks or fails the caller.
    pub fn log_submission(&self, user_info: &UserInfo, jd_text: &str) {
        self.dispatch(submission_payload(user_info, jd_text));
    }

    /// Records a feedback entry. Callers that need a hard guarantee check
    /// `is_configured` first; delivery itself is still fire-and-forget.
    pub fn log_feedback(&self, entry: &FeedbackEntry) {
        self.dispatch(feedback_payload(entry));
    }

    fn dispatch(&self, payload: Value) {
        let Some(url) = self.webhook_url.clone() else {
            warn!("Telemetry webhook not configured, dropping event");
            return;
        };
        let client = self.client.clone();
        let body = payload.to_string();
        tokio::spawn(async move {
            let result = client.post(&url).form(&[("payload", body)]).send().await;
            match result {
                Ok(response) if response.status().is_success() => {
                    info!("Telemetry event delivered");
                }
                Ok(response) => {
                    warn!("Telemetry webhook returned status {}", response.status());
                }
                Err(e) => {
                    warn!("Telemetry delivery failed: {e}");
                }
            }
        });
    }
}

/// Job descriptions are truncated to keep the payload within what the
/// webhook accepts for a single form field.
const JD_EXCERPT_LEN: usize = 500;

fn submission_payload(user_info: &UserInfo, jd_text: &str) -> Value {
    let jd_excerpt: String = jd_text.chars().take(JD_EXCERPT_LEN).collect();
    json!({
        "type": "submission",
        "timestamp": Utc::now().to_rfc3339(),
        "name": user_info.name,
        "email": user_info.email,
        "phone": user_info.phone,
        "location": user_info.location,
        "targetJobs": user_info.target_jobs,
        "referralSource": user_info.referral_source,
        "employmentStatus": user_info.employment_status,
        "jobDescription": jd_excerpt,
    })
}

fn feedback_payload(entry: &FeedbackEntry) -> Value {
    json!({
        "type": "feedback",
        "timestamp": Utc::now().to_rfc3339(),
        "rating": entry.rating,
        "isHelpful": entry.is_helpful,
        "wouldRecommend": entry.would_recommend,
        "comments": entry.comments,
    })
}
