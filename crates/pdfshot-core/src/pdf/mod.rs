//! PDF page rasterization.

mod extractor;
mod output;
#[cfg(feature = "pdfium")]
mod pdfium;

#[cfg(test)]
pub(crate) mod fake;

pub use extractor::{
    MAX_DEFAULT_WORKERS, PageExtractor, PageJob, effective_worker_count, select_pages,
    validate_and_prepare,
};
#[cfg(feature = "pdfium")]
pub use extractor::extract_pdf_pages;
pub use output::{page_output_path, write_jpeg};
#[cfg(feature = "pdfium")]
pub use pdfium::PdfiumEngine;

use std::path::Path;

use image::DynamicImage;

use crate::error::RenderError;

/// Result type for render operations.
pub type Result<T> = std::result::Result<T, RenderError>;

/// A rendering library able to open documents.
///
/// Implementations are shared by every worker of an extraction call, so
/// they must be `Send + Sync`. Each call to [`open`](RenderEngine::open)
/// must return an independent handle: workers never share documents.
pub trait RenderEngine: Send + Sync {
    /// Open the document at `path`.
    fn open(&self, path: &Path) -> Result<Box<dyn RenderDocument + '_>>;
}

/// An open document handle. Dropping it closes the document.
pub trait RenderDocument {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Rasterize the page at zero-based `index`, `scale` times its native
    /// resolution.
    fn render_page(&self, index: usize, scale: u32) -> Result<DynamicImage>;
}
