use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Portfolio item not found: {slug}")]
    NotFound { slug: String },
    #[error("Invalid portfolio slug: {slug:?}")]
    InvalidSlug { slug: String },
    #[error("Content I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed portfolio document {document}: {source}")]
    Parse {
        document: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Content source unavailable: {0}")]
    Unavailable(String),
}

impl ContentError {
    /// Missing items are expected; everything else means the source misbehaved.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ContentError::NotFound { .. })
    }
}
