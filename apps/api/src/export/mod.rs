//! Document export — renders a tailored CV or cover letter to PDF or DOCX.
//!
//! `flow` flattens the structured data into an ordered list of sections and
//! blocks; `pdf` and `docx` render that flow. Section order is fixed and
//! independent of input order; empty sections are omitted entirely.

pub mod docx;
pub mod flow;
pub mod handlers;
pub mod pdf;

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Docx,
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
        }
    }
}

/// Builds a download filename from the candidate's name: whitespace runs
/// become single underscores, other characters pass through.
pub fn export_filename(full_name: &str, suffix: &str, extension: &str) -> String {
    let base: String = full_name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    let base = if base.is_empty() { "document" } else { &base };
    format!("{base}_{suffix}.{extension}")
}
