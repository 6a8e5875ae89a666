use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON workbook error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{backend} backend error: {message}")]
    Backend { backend: String, message: String },

    #[error("unsupported workbook format: {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("sheet `{0}` not found")]
    SheetNotFound(String),
}

impl IoError {
    pub fn from_backend(backend: &str, err: impl std::error::Error) -> Self {
        IoError::Backend {
            backend: backend.to_string(),
            message: err.to_string(),
        }
    }
}
