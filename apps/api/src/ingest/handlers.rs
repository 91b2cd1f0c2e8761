use axum::extract::Multipart;
use axum::Json;
use serde::Serialize;

use crate::errors::AppError;

use super::{detect_format, extract_text};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResponse {
    pub filename: String,
    pub text: String,
    pub char_count: usize,
}

/// POST /api/v1/documents/extract — multipart upload with a `file` field.
pub async fn extract_document(mut multipart: Multipart) -> Result<Json<ExtractResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

        let format = detect_format(&filename, content_type.as_deref());
        let text = extract_text(format, &bytes)?;
        return Ok(Json(ExtractResponse {
            filename,
            char_count: text.chars().count(),
            text,
        }));
    }
    Err(AppError::Validation(
        "No file field found in the upload.".to_string(),
    ))
}
