//! Page extraction orchestrator: probe, fan out one task per page across a
//! bounded worker pool, fan the results back in page order.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{Dispatch, debug, error, info, warn};

use super::output::{page_output_path, write_jpeg};
use super::RenderEngine;
use crate::error::{PageError, PdfshotError, RenderError, Result};
use crate::models::request::{ExtractionOutcome, ExtractionRequest, PageFailure, PageResult};

/// Ceiling for the automatically derived worker count.
pub const MAX_DEFAULT_WORKERS: usize = 32;

/// Immutable inputs shared by every page task of one extraction call.
#[derive(Debug, Clone, Copy)]
pub struct PageJob<'a> {
    pub source_path: &'a Path,
    pub output_dir: &'a Path,
    pub base_filename: &'a str,
    pub scale: u32,
    pub jpeg_quality: u8,
}

/// Check the source exists, resolve and create the output directory, and
/// derive the base filename (source name without extension).
pub fn validate_and_prepare(
    source_path: &Path,
    output_dir: Option<&Path>,
) -> Result<(PathBuf, String)> {
    if !source_path.is_file() {
        error!("PDF file not found: {}", source_path.display());
        return Err(PdfshotError::NotFound(source_path.to_path_buf()));
    }

    let output_dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => default_output_dir(source_path),
    };
    fs::create_dir_all(&output_dir)?;

    let base_filename = source_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .ok_or_else(|| PdfshotError::NotFound(source_path.to_path_buf()))?;

    Ok((output_dir, base_filename))
}

fn default_output_dir(source_path: &Path) -> PathBuf {
    match source_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Page indices to extract: only the first page, or all of them.
pub fn select_pages(total_pages: usize, extract_all: bool) -> Vec<usize> {
    if extract_all {
        (0..total_pages).collect()
    } else {
        vec![0]
    }
}

/// Requested worker count, or `min(32, max(1, cores))` when unspecified.
pub fn effective_worker_count(requested: Option<usize>) -> usize {
    requested.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .clamp(1, MAX_DEFAULT_WORKERS)
    })
}

/// Extracts PDF pages to JPEG files using a [`RenderEngine`].
pub struct PageExtractor<E> {
    engine: E,
}

impl<E: RenderEngine> PageExtractor<E> {
    /// Create an extractor backed by `engine`.
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    /// The underlying render engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Open the document just long enough to read its page count.
    pub fn probe_page_count(&self, source_path: &Path) -> Result<usize> {
        let document = self.engine.open(source_path).map_err(|e| match e {
            RenderError::Unavailable(reason) => PdfshotError::EngineUnavailable(reason),
            other => PdfshotError::DocumentOpen {
                path: source_path.to_path_buf(),
                reason: other.to_string(),
            },
        })?;
        let total_pages = document.page_count();
        drop(document);

        debug!("Probed {}: {} pages", source_path.display(), total_pages);
        Ok(total_pages)
    }

    /// Render one page with its own document handle and write it as JPEG.
    ///
    /// Never fails: errors are logged and returned as [`PageResult::Failure`].
    pub fn extract_page(&self, job: &PageJob<'_>, page_index: usize) -> PageResult {
        let output_path = page_output_path(job.output_dir, job.base_filename, page_index);

        match self.render_to(job, page_index, &output_path) {
            Ok(()) => {
                info!(
                    "Extracted page {} to {}",
                    page_index + 1,
                    output_path.display()
                );
                PageResult::Success {
                    page_index,
                    output_path,
                }
            }
            Err(e) => {
                error!("Error extracting page {}: {}", page_index + 1, e);
                PageResult::Failure(PageFailure {
                    page_index,
                    error: e.to_string(),
                })
            }
        }
    }

    fn render_to(
        &self,
        job: &PageJob<'_>,
        page_index: usize,
        output_path: &Path,
    ) -> std::result::Result<(), PageError> {
        let image = {
            let document = self.engine.open(job.source_path)?;
            document.render_page(page_index, job.scale)?
        };
        write_jpeg(&image, output_path, job.jpeg_quality)
    }

    /// Run a full extraction call.
    ///
    /// Fatal errors (bad parameters, missing source, unreadable document,
    /// missing rendering library) are returned. Per-page failures are not:
    /// those pages are simply absent from [`ExtractionOutcome::paths`].
    pub fn run(&self, request: ExtractionRequest) -> Result<ExtractionOutcome> {
        request.validate()?;

        let (output_dir, base_filename) =
            validate_and_prepare(&request.source_path, request.output_dir.as_deref())?;
        let total_pages = self.probe_page_count(&request.source_path)?;

        info!("Extracting from PDF: {}", request.source_path.display());
        info!("Total pages: {}", total_pages);

        if total_pages == 0 {
            warn!("No images were extracted: document has no pages");
            return Ok(ExtractionOutcome::default());
        }

        let pages = select_pages(total_pages, request.extract_all);
        let workers = effective_worker_count(request.worker_count);
        let job = PageJob {
            source_path: &request.source_path,
            output_dir: &output_dir,
            base_filename: &base_filename,
            scale: request.scale,
            jpeg_quality: request.jpeg_quality,
        };

        let results = self.dispatch(&job, &pages, workers)?;
        let outcome = ExtractionOutcome::from_results(total_pages, results);

        if outcome.is_empty() {
            warn!("No images were extracted");
        } else if !outcome.failures.is_empty() {
            warn!(
                "Extracted {} of {} pages, {} failed",
                outcome.paths.len(),
                outcome.requested_pages,
                outcome.failures.len()
            );
        }

        Ok(outcome)
    }

    /// Run one task per page on a dedicated pool. Results come back in the
    /// order of `pages` regardless of completion order.
    fn dispatch(
        &self,
        job: &PageJob<'_>,
        pages: &[usize],
        workers: usize,
    ) -> Result<Vec<PageResult>> {
        let threads = workers.min(pages.len()).max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("pdfshot-worker-{}", i))
            .build()
            .map_err(|e| PdfshotError::Pool(e.to_string()))?;

        debug!(
            "Dispatching {} page tasks across {} workers",
            pages.len(),
            threads
        );

        // Pool threads do not inherit the caller's scoped subscriber
        let dispatch = tracing::dispatcher::get_default(Dispatch::clone);

        Ok(pool.install(|| {
            pages
                .par_iter()
                .map(|&page_index| {
                    tracing::dispatcher::with_default(&dispatch, || {
                        self.extract_page(job, page_index)
                    })
                })
                .collect()
        }))
    }
}

/// Extract pages of `source_path` to JPEG files with the pdfium engine.
///
/// Output goes to `output_dir`, or next to the source when `None`. Returns
/// the written paths in page order.
#[cfg(feature = "pdfium")]
pub fn extract_pdf_pages(
    source_path: impl AsRef<Path>,
    output_dir: Option<&Path>,
    scale: u32,
    extract_all: bool,
    worker_count: Option<usize>,
) -> Result<Vec<PathBuf>> {
    let mut request = ExtractionRequest::new(source_path.as_ref())
        .with_scale(scale)
        .with_extract_all(extract_all);
    if let Some(dir) = output_dir {
        request = request.with_output_dir(dir);
    }
    if let Some(workers) = worker_count {
        request = request.with_worker_count(workers);
    }

    let extractor = PageExtractor::new(super::PdfiumEngine::new());
    Ok(extractor.run(request)?.into_paths())
}
