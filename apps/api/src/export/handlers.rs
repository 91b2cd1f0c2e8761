use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::cv::CvData;

use super::flow::{cover_letter_flow, cv_flow, DocumentFlow};
use super::{docx, export_filename, pdf, ExportFormat};

#[derive(Debug, Deserialize)]
pub struct ExportCvRequest {
    pub cv: CvData,
    pub format: ExportFormat,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportCoverLetterRequest {
    pub full_name: String,
    pub cover_letter: String,
    pub format: ExportFormat,
}

fn attachment(flow: &DocumentFlow, format: ExportFormat, suffix: &str) -> Result<Response, AppError> {
    let bytes = match format {
        ExportFormat::Pdf => pdf::render(flow),
        ExportFormat::Docx => docx::render(flow)?,
    };
    let filename = export_filename(&flow.title, suffix, format.extension());
    info!("Exported {filename} ({} bytes)", bytes.len());

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// POST /api/v1/export/cv
pub async fn export_cv(Json(req): Json<ExportCvRequest>) -> Result<Response, AppError> {
    attachment(&cv_flow(&req.cv), req.format, "CV")
}

/// POST /api/v1/export/cover-letter
pub async fn export_cover_letter(
    Json(req): Json<ExportCoverLetterRequest>,
) -> Result<Response, AppError> {
    if req.cover_letter.trim().is_empty() {
        return Err(AppError::Validation(
            "There is no cover letter to export.".to_string(),
        ));
    }
    let flow = cover_letter_flow(&req.full_name, &req.cover_letter);
    attachment(&flow, req.format, "Cover_Letter")
}
