//! Generation route handlers. All heavy lifting lives in `pipeline`;
//! handlers only unwrap the shared state and delegate.

use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::state::AppState;

use super::pipeline::{
    self, GenerateRequest, GenerateResponse, RefineCoverLetterRequest, RefineCoverLetterResponse,
    RefineCvRequest, RefineCvResponse,
};

/// POST /api/v1/cv/generate
pub async fn generate_cv(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let response =
        pipeline::generate(state.store.as_ref(), state.llm.as_ref(), &state.telemetry, req).await?;
    Ok(Json(response))
}

/// POST /api/v1/cv/refine
pub async fn refine_cv(
    State(state): State<AppState>,
    Json(req): Json<RefineCvRequest>,
) -> Result<Json<RefineCvResponse>, AppError> {
    let response = pipeline::refine_cv(state.store.as_ref(), state.llm.as_ref(), req).await?;
    Ok(Json(response))
}

/// POST /api/v1/cover-letter/refine
pub async fn refine_cover_letter(
    State(state): State<AppState>,
    Json(req): Json<RefineCoverLetterRequest>,
) -> Result<Json<RefineCoverLetterResponse>, AppError> {
    let response =
        pipeline::refine_cover_letter(state.store.as_ref(), state.llm.as_ref(), req).await?;
    Ok(Json(response))
}
