use docx_rs::{DocumentChild, Docx, ParagraphChild, RunChild};
use serde::Serialize;
use std::path::Path;
use tracing::info;

use crate::errors::ExtractError;
use crate::TARGET_EXTRACT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
}

/// Raw text pulled out of an uploaded document. Immutable once extracted;
/// consumed by a single analysis run.
#[derive(Debug, Clone)]
pub struct Document {
    pub text: String,
    pub kind: DocumentKind,
}

impl Document {
    /// True when extraction succeeded but the document yielded no usable
    /// text (scanned PDFs mostly). Distinct from an extraction *failure*,
    /// which is an `ExtractError`.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Extracts text from a document on disk, dispatching on file extension.
pub fn extract_document(path: &Path) -> Result<Document, ExtractError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let kind = match extension.as_str() {
        "pdf" => DocumentKind::Pdf,
        "docx" => DocumentKind::Docx,
        other => return Err(ExtractError::UnsupportedFormat(other.to_string())),
    };

    let bytes = std::fs::read(path)?;
    let text = match kind {
        DocumentKind::Pdf => extract_pdf(&bytes)?,
        DocumentKind::Docx => extract_docx(&bytes)?,
    };

    info!(target: TARGET_EXTRACT,
        "Extracted {} characters from {:?} document {}",
        text.len(),
        kind,
        path.display()
    );

    Ok(Document { text, kind })
}

/// Extracts text from PDF bytes.
pub fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))
}

/// Extracts text from DOCX bytes, joining paragraphs with newlines.
pub fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| ExtractError::Docx(e.to_string()))?;
    Ok(docx_text(&docx))
}

fn docx_text(docx: &Docx) -> String {
    let mut paragraphs = Vec::new();
    for child in &docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            let mut line = String::new();
            for paragraph_child in &paragraph.children {
                if let ParagraphChild::Run(run) = paragraph_child {
                    for run_child in &run.children {
                        if let RunChild::Text(text) = run_child {
                            line.push_str(&text.text);
                        }
                    }
                }
            }
            paragraphs.push(line);
        }
    }
    paragraphs.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Paragraph, Run};

    #[test]
    fn unsupported_extension_is_a_typed_error() {
        let result = extract_document(Path::new("resume.txt"));
        assert!(matches!(result, Err(ExtractError::UnsupportedFormat(ext)) if ext == "txt"));
    }

    #[test]
    fn missing_extension_is_a_typed_error() {
        let result = extract_document(Path::new("resume"));
        assert!(matches!(result, Err(ExtractError::UnsupportedFormat(_))));
    }

    #[test]
    fn docx_paragraphs_join_with_newlines() {
        let docx = Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Python developer")))
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("SQL experience")));
        assert_eq!(docx_text(&docx), "Python developer\nSQL experience");
    }

    #[test]
    fn empty_document_is_detected() {
        let document = Document {
            text: "  \n ".to_string(),
            kind: DocumentKind::Pdf,
        };
        assert!(document.is_empty());

        let document = Document {
            text: "real content".to_string(),
            kind: DocumentKind::Docx,
        };
        assert!(!document.is_empty());
    }

    #[test]
    fn garbage_docx_bytes_fail_with_typed_error() {
        assert!(matches!(
            extract_docx(b"not a zip archive"),
            Err(ExtractError::Docx(_))
        ));
    }
}
