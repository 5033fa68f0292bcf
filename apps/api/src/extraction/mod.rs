//! Résumé text extraction.
//!
//! `extract_text` never fails: any decode or parse problem is logged and
//! yields an empty string, which the matcher treats as "no skills found".

mod docx;
mod pdf;

#[cfg(test)]
pub(crate) use docx::build_docx;
#[cfg(test)]
pub(crate) use pdf::build_pdf;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

const PDF_MIME: &str = "application/pdf";
const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResumeFormat {
    Pdf,
    Docx,
}

impl ResumeFormat {
    /// Declared content type first, then the file extension.
    /// Returns `None` for anything that is neither PDF nor DOCX.
    pub fn detect(content_type: Option<&str>, file_name: Option<&str>) -> Option<Self> {
        let mime = content_type
            .and_then(|ct| ct.split(';').next())
            .map(|ct| ct.trim().to_ascii_lowercase());
        match mime.as_deref() {
            Some(PDF_MIME) | Some("application/x-pdf") => return Some(ResumeFormat::Pdf),
            Some(DOCX_MIME) => return Some(ResumeFormat::Docx),
            _ => {}
        }

        let extension = file_name
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("pdf") => Some(ResumeFormat::Pdf),
            Some("docx") => Some(ResumeFormat::Docx),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResumeFormat::Pdf => "pdf",
            ResumeFormat::Docx => "docx",
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("PDF parse failed: {0}")]
    Pdf(String),

    #[error("{0} parser panicked")]
    Panicked(&'static str),

    #[error("not a valid DOCX container: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("DOCX is missing {0}")]
    MissingPart(&'static str),

    #[error("DOCX XML is malformed: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("DOCX text is not valid UTF-8: {0}")]
    Encoding(String),

    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Plain text of a résumé file. Empty on any failure.
pub fn extract_text(bytes: &[u8], format: ResumeFormat) -> String {
    if bytes.is_empty() {
        debug!(format = format.as_str(), "Empty upload, nothing to extract");
        return String::new();
    }

    let result = match format {
        ResumeFormat::Pdf => pdf::extract(bytes),
        ResumeFormat::Docx => docx::extract(bytes),
    };

    match result {
        Ok(text) => {
            let text = normalize_text(&text);
            debug!(
                format = format.as_str(),
                bytes = bytes.len(),
                chars = text.chars().count(),
                "Extracted résumé text"
            );
            text
        }
        Err(e) => {
            warn!(
                format = format.as_str(),
                bytes = bytes.len(),
                error = %e,
                "Résumé text extraction failed, continuing with empty text"
            );
            String::new()
        }
    }
}

/// Folds typographic ligatures and punctuation that PDF text layers emit, so
/// a trigger like "fluent in" still matches "\u{FB02}uent in". Line structure is kept.
fn normalize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{FB00}' => out.push_str("ff"),
            '\u{FB01}' => out.push_str("fi"),
            '\u{FB02}' => out.push_str("fl"),
            '\u{FB03}' => out.push_str("ffi"),
            '\u{FB04}' => out.push_str("ffl"),
            '\u{FB05}' | '\u{FB06}' => out.push_str("st"),
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201C}' | '\u{201D}' => out.push('"'),
            '\u{2013}' | '\u{2014}' => out.push('-'),
            '\u{00A0}' => out.push(' '),
            _ => out.push(c),
        }
    }
    out.trim().to_string()
}
