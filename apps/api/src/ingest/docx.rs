//! DOCX text extraction.
//!
//! A .docx file is a zip archive; the body lives in `word/document.xml` as
//! WordprocessingML. Text sits inside `<w:t>` runs; paragraphs (`<w:p>`)
//! become newlines, and explicit tabs and breaks are preserved.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::errors::AppError;

pub fn extract_text(bytes: &[u8]) -> Result<String, AppError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| {
        AppError::Validation(format!("Could not read the DOCX file: {e}"))
    })?;
    let mut document_xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| {
            AppError::Validation(format!(
                "The DOCX file has no document body. It may be corrupt: {e}"
            ))
        })?
        .read_to_string(&mut document_xml)
        .map_err(|e| AppError::Validation(format!("Could not read the DOCX body: {e}")))?;

    text_from_document_xml(&document_xml)
}

fn text_from_document_xml(xml: &str) -> Result<String, AppError> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_text_run = true,
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => out.push('\t'),
                b"w:br" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Text(e)) if in_text_run => {
                let text = e
                    .unescape()
                    .map_err(|e| AppError::Validation(format!("Malformed DOCX text: {e}")))?;
                out.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(AppError::Validation(format!(
                    "The DOCX body is not valid XML: {e}"
                )))
            }
        }
    }
    Ok(out)
}
