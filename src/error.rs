use thiserror::Error;

#[derive(Error, Debug)]
pub enum KlaarError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Attach a document to {0} before saving it")]
    EvidenceRequired(String),

    #[error("No document #{index} in {category} ({count} attached)")]
    BadFileIndex {
        category: String,
        index: usize,
        count: usize,
    },

    #[error("Export not ready: checklist at {pct}% (needs 80% and at least one attached document)")]
    ExportNotReady { pct: u8 },

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, KlaarError>;
