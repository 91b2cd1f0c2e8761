//! Minimal DOCX writer.
//!
//! A .docx is a zip archive with three required parts: the content-type
//! manifest, the package relationships, and the WordprocessingML body.
//! Headings are bold runs; bullets are plain paragraphs with a bullet
//! marker, which keeps the document dependency-free of numbering parts.

use std::io::{Cursor, Write};

use zip::write::FileOptions;
use zip::ZipWriter;

use crate::errors::AppError;

use super::flow::{Block, DocumentFlow};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#;

const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;

fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn paragraph(text: &str, bold: bool, size_half_points: u16) -> String {
    let props = if bold {
        format!("<w:rPr><w:b/><w:sz w:val=\"{size_half_points}\"/></w:rPr>")
    } else {
        format!("<w:rPr><w:sz w:val=\"{size_half_points}\"/></w:rPr>")
    };
    format!(
        "<w:p><w:r>{props}<w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>",
        xml_escape(text)
    )
}

fn empty_paragraph() -> &'static str {
    "<w:p/>"
}

fn document_xml(flow: &DocumentFlow) -> String {
    // Word sizes are half-points: 32 = 16pt title, 24 = 12pt heading, 22 = 11pt body.
    let mut body = String::new();
    body.push_str(&paragraph(&flow.title, true, 32));
    if !flow.contact_line.is_empty() {
        body.push_str(&paragraph(&flow.contact_line, false, 22));
    }
    body.push_str(empty_paragraph());

    for section in &flow.sections {
        if !section.heading.is_empty() {
            body.push_str(&paragraph(&section.heading, true, 24));
        }
        for block in &section.blocks {
            match block {
                Block::Paragraph(text) => {
                    body.push_str(&paragraph(text, false, 22));
                    if section.heading.is_empty() {
                        body.push_str(empty_paragraph());
                    }
                }
                Block::Bullet(text) => {
                    body.push_str(&paragraph(&format!("\u{2022} {text}"), false, 22));
                }
            }
        }
        body.push_str(empty_paragraph());
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:body>{body}</w:body></w:document>"
    )
}

/// Renders the flow to DOCX bytes.
pub fn render(flow: &DocumentFlow) -> Result<Vec<u8>, AppError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default();

    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", RELS.to_string()),
        ("word/document.xml", document_xml(flow)),
    ];
    for (name, content) in parts {
        zip.start_file(name, options)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("DOCX write failed: {e}")))?;
        zip.write_all(content.as_bytes())
            .map_err(|e| AppError::Internal(anyhow::anyhow!("DOCX write failed: {e}")))?;
    }

    let cursor = zip
        .finish()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("DOCX finalize failed: {e}")))?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::flow::{cover_letter_flow, cv_flow};
    use crate::ingest;
    use crate::models::cv::fixtures;

    #[test]
    fn test_xml_escape() {
        assert_eq!(
            xml_escape("R&D <lead> \"quoted\""),
            "R&amp;D &lt;lead&gt; &quot;quoted&quot;"
        );
    }

    #[test]
    fn test_rendered_cv_round_trips_through_extraction() {
        let bytes = render(&cv_flow(&fixtures::full_cv())).unwrap();
        // Read back with our own DOCX ingestion.
        let text = ingest::docx::extract_text(&bytes).unwrap();
        assert!(text.contains("Jane Doe"));
        assert!(text.contains("Professional Summary"));
        assert!(text.contains("\u{2022} Built payment reconciliation pipeline"));
        let summary = text.find("Professional Summary").unwrap();
        let experience = text.find("Experience").unwrap();
        assert!(summary < experience);
    }

    #[test]
    fn test_document_contains_required_parts() {
        let bytes = render(&cv_flow(&fixtures::minimal_cv())).unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
        for name in ["[Content_Types].xml", "_rels/.rels", "word/document.xml"] {
            assert!(archive.by_name(name).is_ok(), "missing part {name}");
        }
    }

    #[test]
    fn test_special_characters_survive_round_trip() {
        let mut cv = fixtures::minimal_cv();
        cv.summary = "Led R&D for <platform> services.".to_string();
        let bytes = render(&cv_flow(&cv)).unwrap();
        let text = ingest::docx::extract_text(&bytes).unwrap();
        assert!(text.contains("Led R&D for <platform> services."));
    }

    #[test]
    fn test_cover_letter_renders() {
        let flow = cover_letter_flow("Jane Doe", "Dear Hiring Manager,\n\nBody text.");
        let bytes = render(&flow).unwrap();
        let text = ingest::docx::extract_text(&bytes).unwrap();
        assert!(text.contains("Jane Doe"));
        assert!(text.contains("Dear Hiring Manager,"));
    }
}
