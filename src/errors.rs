use thiserror::Error;

/// Errors that abort a full analysis request.
///
/// Degenerate sub-results (empty keyword gap, no rankable sentences) are not
/// errors; they surface as empty collections plus an [`AnalysisWarning`]
/// inside the result. Only losing the embedding model is fatal.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("embedding model unavailable: {0}")]
    EmbeddingUnavailable(#[source] anyhow::Error),
}

/// Degraded-precondition signals carried inside an `AnalysisResult`.
///
/// The pipeline still completes when one of these fires; the caller decides
/// whether a zero score over empty content is worth showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisWarning {
    EmptyResume,
    EmptyJobDescription,
    DegenerateEmbedding,
}

/// Document extraction failures.
///
/// Extraction errors are typed so the caller can tell "the file was
/// unreadable" apart from "the file was readable but contained no text".
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse PDF: {0}")]
    Pdf(String),

    #[error("failed to parse DOCX: {0}")]
    Docx(String),

    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),
}

/// Advisory (recommendation) service failures. Never fatal to an analysis;
/// the match result is finalized before the advisory call is made.
#[derive(Debug, Error)]
pub enum AdvisoryError {
    #[error("advisory API key is not configured")]
    MissingApiKey,

    #[error("advisory request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("advisory service returned unexpected content: {0}")]
    UnexpectedResponse(String),
}
