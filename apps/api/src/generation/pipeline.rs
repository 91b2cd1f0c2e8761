//! Generation pipeline: quota check, prompt build, single LLM call, parse,
//! then record usage. The order is load-bearing — at-limit identities are
//! rejected before any network call, and counters move only after the
//! response has parsed cleanly, so a failed or malformed AI response never
//! consumes quota.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::{self, GenerationOptions, GenerativeBackend};
use crate::models::cv::{CvData, UserInfo};
use crate::storage::Store;
use crate::telemetry::Telemetry;
use crate::usage::{self, Identity, UsageSnapshot};

use super::prompts;
use super::schema;

const GENERATE_TEMPERATURE: f32 = 0.3;
const CV_REFINE_TEMPERATURE: f32 = 0.4;
const COVER_LETTER_TEMPERATURE: f32 = 0.5;

/// Which prompt strategy a generation request selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationMode {
    /// Tailor an existing CV to the job description.
    Improve,
    /// Build a CV from scratch out of the candidate's guided answers.
    Scratch,
    /// Produce only a cover letter, no structured CV.
    CoverLetter,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub identity: Identity,
    pub mode: GenerationMode,
    /// Existing CV text (`improve`) or the candidate's guided answers
    /// (`scratch` / `cover-letter`).
    pub cv_text: String,
    pub jd_text: String,
    pub user_info: UserInfo,
    /// Also produce a cover letter alongside the tailored CV. Ignored in
    /// `cover-letter` mode, which always produces one.
    #[serde(default)]
    pub with_cover_letter: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cv: Option<CvData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
    pub usage: UsageSnapshot,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefineCvRequest {
    pub identity: Identity,
    pub cv: CvData,
    /// The user's refinement instruction, free text.
    pub request: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefineCvResponse {
    pub cv: CvData,
    pub usage: UsageSnapshot,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefineCoverLetterRequest {
    pub identity: Identity,
    pub cover_letter: String,
    pub request: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefineCoverLetterResponse {
    pub cover_letter: String,
    pub usage: UsageSnapshot,
}

fn check_generate_inputs(req: &GenerateRequest) -> Result<(), AppError> {
    if req.mode == GenerationMode::Improve && req.cv_text.trim().is_empty() {
        return Err(AppError::Validation(
            "Please provide your current CV text.".to_string(),
        ));
    }
    if req.jd_text.trim().is_empty() {
        return Err(AppError::Validation(
            "Please provide the job description.".to_string(),
        ));
    }
    if req.user_info.name.trim().is_empty() || req.user_info.email.trim().is_empty() {
        return Err(AppError::Validation(
            "Please provide your name and email.".to_string(),
        ));
    }
    Ok(())
}

pub async fn generate(
    store: &dyn Store,
    llm: &dyn GenerativeBackend,
    telemetry: &Telemetry,
    req: GenerateRequest,
) -> Result<GenerateResponse, AppError> {
    check_generate_inputs(&req)?;
    usage::check_generation(store, &req.identity).await?;

    let (cv, cover_letter) = match req.mode {
        GenerationMode::Improve | GenerationMode::Scratch => {
            let prompt = prompts::build_tailor_prompt(&req.cv_text, &req.jd_text, &req.user_info);
            let opts =
                GenerationOptions::structured(GENERATE_TEMPERATURE, schema::cv_response_schema());
            let text = llm
                .generate(&prompt, &opts)
                .await
                .map_err(|e| AppError::Llm(e.to_string()))?;
            let cv: CvData = llm_client::parse_json_response(&text)
                .map_err(|e| AppError::LlmFormat(e.to_string()))?;

            let cover_letter = if req.with_cover_letter {
                let prompt = prompts::build_cover_letter_prompt(
                    &cv,
                    &req.jd_text,
                    &req.user_info.target_jobs,
                );
                let letter = llm
                    .generate(&prompt, &GenerationOptions::free_text(COVER_LETTER_TEMPERATURE))
                    .await
                    .map_err(|e| AppError::Llm(e.to_string()))?;
                Some(letter.trim().to_string())
            } else {
                None
            };
            (Some(cv), cover_letter)
        }
        GenerationMode::CoverLetter => {
            let prompt = prompts::build_standalone_cover_letter_prompt(
                &req.cv_text,
                &req.jd_text,
                &req.user_info,
            );
            let letter = llm
                .generate(&prompt, &GenerationOptions::free_text(COVER_LETTER_TEMPERATURE))
                .await
                .map_err(|e| AppError::Llm(e.to_string()))?;
            (None, Some(letter.trim().to_string()))
        }
    };

    usage::record_generation(store, &req.identity).await?;
    telemetry.log_submission(&req.user_info, &req.jd_text);
    info!("Generation succeeded (mode {:?})", req.mode);

    Ok(GenerateResponse {
        cv,
        cover_letter,
        usage: usage::snapshot(store, &req.identity).await?,
    })
}

pub async fn refine_cv(
    store: &dyn Store,
    llm: &dyn GenerativeBackend,
    req: RefineCvRequest,
) -> Result<RefineCvResponse, AppError> {
    if req.request.trim().is_empty() {
        return Err(AppError::Validation(
            "Please describe the change you want.".to_string(),
        ));
    }
    usage::check_refinement(store, &req.identity).await?;

    let cv_json = serde_json::to_string_pretty(&req.cv)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode CV: {e}")))?;
    let prompt = prompts::build_cv_refinement_prompt(&cv_json, &req.request);
    let opts = GenerationOptions::structured(CV_REFINE_TEMPERATURE, schema::cv_response_schema());

    let text = llm
        .generate(&prompt, &opts)
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;
    let cv: CvData =
        llm_client::parse_json_response(&text).map_err(|e| AppError::LlmFormat(e.to_string()))?;

    usage::record_refinement(store, &req.identity).await?;
    Ok(RefineCvResponse {
        cv,
        usage: usage::snapshot(store, &req.identity).await?,
    })
}

pub async fn refine_cover_letter(
    store: &dyn Store,
    llm: &dyn GenerativeBackend,
    req: RefineCoverLetterRequest,
) -> Result<RefineCoverLetterResponse, AppError> {
    if req.request.trim().is_empty() {
        return Err(AppError::Validation(
            "Please describe the change you want.".to_string(),
        ));
    }
    usage::check_refinement(store, &req.identity).await?;

    let prompt = prompts::build_cover_letter_refinement_prompt(&req.cover_letter, &req.request);
    let letter = llm
        .generate(&prompt, &GenerationOptions::free_text(COVER_LETTER_TEMPERATURE))
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;

    usage::record_refinement(store, &req.identity).await?;
    Ok(RefineCoverLetterResponse {
        cover_letter: letter.trim().to_string(),
        usage: usage::snapshot(store, &req.identity).await?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use uuid::Uuid;

    use crate::llm_client::LlmError;
    use crate::models::cv::fixtures;
    use crate::storage::memory::MemoryStore;

    /// Canned backend: pops responses front-to-back and records the
    /// options each call carried.
    struct StubBackend {
        responses: Mutex<Vec<Result<String, LlmError>>>,
        seen: Mutex<Vec<GenerationOptions>>,
    }

    impl StubBackend {
        fn new(responses: Vec<Result<String, LlmError>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn returning(text: &str) -> Self {
            Self::new(vec![Ok(text.to_string())])
        }
    }

    #[async_trait]
    impl GenerativeBackend for StubBackend {
        async fn generate(
            &self,
            _prompt: &str,
            opts: &GenerationOptions,
        ) -> Result<String, LlmError> {
            self.seen.lock().unwrap().push(opts.clone());
            self.responses.lock().unwrap().remove(0)
        }
    }

    fn anon() -> Identity {
        Identity::Anonymous {
            client_id: Uuid::new_v4(),
        }
    }

    fn generate_request(identity: Identity, mode: GenerationMode) -> GenerateRequest {
        GenerateRequest {
            identity,
            mode,
            cv_text: "Jane Doe. Software engineer at Acme since 2019.".to_string(),
            jd_text: "We are hiring a backend engineer.".to_string(),
            user_info: UserInfo {
                name: "Jane Doe".to_string(),
                email: "jane@example.com".to_string(),
                phone: "+44 7000 000000".to_string(),
                location: "London".to_string(),
                target_jobs: "Backend Engineer".to_string(),
                linkedin: None,
                referral_source: "Friend".to_string(),
                employment_status: "Employed".to_string(),
            },
            with_cover_letter: false,
        }
    }

    fn cv_json() -> String {
        serde_json::to_string(&fixtures::full_cv()).unwrap()
    }

    #[tokio::test]
    async fn test_successful_generation_increments_counter() {
        let store = MemoryStore::new();
        let llm = StubBackend::returning(&cv_json());
        let telemetry = Telemetry::new(None);
        let identity = anon();

        let response = generate(
            &store,
            &llm,
            &telemetry,
            generate_request(identity.clone(), GenerationMode::Improve),
        )
        .await
        .unwrap();

        assert_eq!(response.cv.unwrap().full_name, "Jane Doe");
        assert_eq!(response.usage.generations_used, 1);
    }

    #[tokio::test]
    async fn test_malformed_response_does_not_consume_quota() {
        let store = MemoryStore::new();
        // Missing closing brace.
        let llm = StubBackend::returning("{\"fullName\": \"Jane\"");
        let telemetry = Telemetry::new(None);
        let identity = anon();

        let result = generate(
            &store,
            &llm,
            &telemetry,
            generate_request(identity.clone(), GenerationMode::Improve),
        )
        .await;
        assert!(matches!(result, Err(AppError::LlmFormat(_))));

        let snap = usage::snapshot(&store, &identity).await.unwrap();
        assert_eq!(snap.generations_used, 0);
    }

    #[tokio::test]
    async fn test_transport_failure_does_not_consume_quota() {
        let store = MemoryStore::new();
        let llm = StubBackend::new(vec![Err(LlmError::Api {
            status: 503,
            message: "overloaded".to_string(),
        })]);
        let telemetry = Telemetry::new(None);
        let identity = anon();

        let result = generate(
            &store,
            &llm,
            &telemetry,
            generate_request(identity.clone(), GenerationMode::Improve),
        )
        .await;
        assert!(matches!(result, Err(AppError::Llm(_))));
        // Single-shot: exactly one call, no retries.
        assert_eq!(llm.seen.lock().unwrap().len(), 1);

        let snap = usage::snapshot(&store, &identity).await.unwrap();
        assert_eq!(snap.generations_used, 0);
    }

    #[tokio::test]
    async fn test_at_limit_identity_rejected_before_llm_call() {
        let store = MemoryStore::new();
        let llm = StubBackend::returning(&cv_json());
        let telemetry = Telemetry::new(None);
        let identity = anon();

        for _ in 0..3 {
            usage::record_generation(&store, &identity).await.unwrap();
        }
        let result = generate(
            &store,
            &llm,
            &telemetry,
            generate_request(identity, GenerationMode::Improve),
        )
        .await;
        assert!(matches!(result, Err(AppError::UsageLimit { .. })));
        assert!(llm.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generate_uses_schema_and_low_temperature() {
        let store = MemoryStore::new();
        let llm = StubBackend::returning(&cv_json());
        let telemetry = Telemetry::new(None);

        generate(
            &store,
            &llm,
            &telemetry,
            generate_request(anon(), GenerationMode::Improve),
        )
        .await
        .unwrap();

        let seen = llm.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].temperature, GENERATE_TEMPERATURE);
        assert!(seen[0].response_schema.is_some());
    }

    #[tokio::test]
    async fn test_cover_letter_mode_is_free_text() {
        let store = MemoryStore::new();
        let llm = StubBackend::returning("Dear Hiring Manager,\n\nI am writing to apply.");
        let telemetry = Telemetry::new(None);

        let response = generate(
            &store,
            &llm,
            &telemetry,
            generate_request(anon(), GenerationMode::CoverLetter),
        )
        .await
        .unwrap();

        assert!(response.cv.is_none());
        assert!(response.cover_letter.unwrap().starts_with("Dear"));
        let seen = llm.seen.lock().unwrap();
        assert_eq!(seen[0].temperature, COVER_LETTER_TEMPERATURE);
        assert!(seen[0].response_schema.is_none());
    }

    #[tokio::test]
    async fn test_generate_with_cover_letter_makes_two_calls() {
        let store = MemoryStore::new();
        let llm = StubBackend::new(vec![
            Ok(cv_json()),
            Ok("Dear Hiring Manager,".to_string()),
        ]);
        let telemetry = Telemetry::new(None);

        let mut req = generate_request(anon(), GenerationMode::Improve);
        req.with_cover_letter = true;
        let identity = req.identity.clone();
        let response = generate(&store, &llm, &telemetry, req).await.unwrap();

        assert!(response.cv.is_some());
        assert!(response.cover_letter.is_some());
        assert_eq!(llm.seen.lock().unwrap().len(), 2);
        // Both calls together consume a single generation.
        let snap = usage::snapshot(&store, &identity).await.unwrap();
        assert_eq!(snap.generations_used, 1);
    }

    #[tokio::test]
    async fn test_improve_mode_requires_cv_text() {
        let store = MemoryStore::new();
        let llm = StubBackend::returning(&cv_json());
        let telemetry = Telemetry::new(None);

        let mut req = generate_request(anon(), GenerationMode::Improve);
        req.cv_text = "   ".to_string();
        let result = generate(&store, &llm, &telemetry, req).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_refine_cv_uses_mid_temperature_and_schema() {
        let store = MemoryStore::new();
        let llm = StubBackend::returning(&cv_json());
        let identity = anon();

        let response = refine_cv(
            &store,
            &llm,
            RefineCvRequest {
                identity: identity.clone(),
                cv: fixtures::full_cv(),
                request: "Make the summary punchier".to_string(),
            },
        )
        .await
        .unwrap();

        assert_eq!(response.usage.refinements_used, 1);
        let seen = llm.seen.lock().unwrap();
        assert_eq!(seen[0].temperature, CV_REFINE_TEMPERATURE);
        assert!(seen[0].response_schema.is_some());
    }

    #[tokio::test]
    async fn test_refine_cover_letter_trims_output() {
        let store = MemoryStore::new();
        let llm = StubBackend::returning("\n\nDear Hiring Manager,\n\nRevised.\n");

        let response = refine_cover_letter(
            &store,
            &llm,
            RefineCoverLetterRequest {
                identity: anon(),
                cover_letter: "Dear Hiring Manager,\n\nOriginal.".to_string(),
                request: "Make it shorter".to_string(),
            },
        )
        .await
        .unwrap();

        assert!(response.cover_letter.starts_with("Dear"));
        assert!(!response.cover_letter.ends_with('\n'));
    }

    #[tokio::test]
    async fn test_refine_rejects_empty_instruction() {
        let store = MemoryStore::new();
        let llm = StubBackend::returning(&cv_json());
        let result = refine_cv(
            &store,
            &llm,
            RefineCvRequest {
                identity: anon(),
                cv: fixtures::full_cv(),
                request: "  ".to_string(),
            },
        )
        .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(llm.seen.lock().unwrap().is_empty());
    }
}
