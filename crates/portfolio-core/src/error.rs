/// Error types shared by the portfolio search crates.
///
/// These cover failures while turning raw content into the search corpus
/// (content document, synonym table). Server-specific errors are defined in
/// the server crate and wrap `CoreError` via `#[from]`.

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("invalid synonym table: {0}")]
    Synonyms(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
