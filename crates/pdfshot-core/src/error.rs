//! Error types for the pdfshot-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the pdfshot library.
///
/// Every variant here is fatal for an extraction call. Failures of a single
/// page are reported through [`PageError`] instead and never surface as a
/// `PdfshotError`.
#[derive(Error, Debug)]
pub enum PdfshotError {
    /// The source document does not exist.
    #[error("PDF file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The page-count probe could not open or parse the document.
    #[error("failed to open document {}: {reason}", path.display())]
    DocumentOpen { path: PathBuf, reason: String },

    /// The rendering library could not be loaded.
    #[error("render engine unavailable: {0}")]
    EngineUnavailable(String),

    /// Request parameters are out of range.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The worker pool could not be started.
    #[error("worker pool error: {0}")]
    Pool(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised by a render engine or one of its documents.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The engine's native library is missing or failed to bind.
    #[error("rendering library unavailable: {0}")]
    Unavailable(String),

    /// The document could not be opened or parsed.
    #[error("failed to open document: {0}")]
    Open(String),

    /// Requested page does not exist in the document.
    #[error("page index {index} out of range (document has {count} pages)")]
    PageOutOfRange { index: usize, count: usize },

    /// Rasterization of a page failed.
    #[error("failed to render page: {0}")]
    Render(String),
}

/// Failure while extracting a single page. Recovered by the orchestrator.
#[derive(Error, Debug)]
pub enum PageError {
    /// Opening the document or rendering the page failed.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// JPEG encoding failed.
    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    /// Writing the output file failed.
    #[error("failed to write image: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the pdfshot library.
pub type Result<T> = std::result::Result<T, PdfshotError>;
