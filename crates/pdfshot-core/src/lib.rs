//! Core library for parallel PDF page rasterization.
//!
//! This crate provides:
//! - A render engine abstraction with a pdfium backend
//! - A page extraction orchestrator that renders pages on a bounded worker
//!   pool, each worker with its own document handle
//! - JPEG output with deterministic `{base}_page{N}.jpg` naming
//! - Configuration and request models

pub mod error;
pub mod models;
pub mod pdf;

pub use error::{PageError, PdfshotError, RenderError, Result};
pub use models::config::PdfshotConfig;
pub use models::request::{ExtractionOutcome, ExtractionRequest, PageFailure, PageResult};
pub use pdf::{PageExtractor, RenderDocument, RenderEngine};

#[cfg(feature = "pdfium")]
pub use pdf::{PdfiumEngine, extract_pdf_pages};
