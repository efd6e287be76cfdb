//! Extraction request, per-page results and the aggregated outcome.

use std::path::PathBuf;

use serde::Serialize;

use crate::error::{PdfshotError, Result};

/// Default linear render multiplier.
pub const DEFAULT_SCALE: u32 = 4;

/// Default JPEG quality.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Default upper bound for the render multiplier.
pub const DEFAULT_MAX_SCALE: u32 = 16;

/// A single extraction call.
///
/// Built with [`ExtractionRequest::new`] and the `with_*` setters, then handed
/// to [`PageExtractor::run`](crate::pdf::PageExtractor::run) which consumes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    /// Document to rasterize.
    pub source_path: PathBuf,
    /// Output directory (None = the source's parent directory).
    pub output_dir: Option<PathBuf>,
    /// Linear render multiplier.
    pub scale: u32,
    /// Extract every page instead of only the first.
    pub extract_all: bool,
    /// Worker pool size (None = derived from available cores).
    pub worker_count: Option<usize>,
    /// JPEG quality (1 - 100).
    pub jpeg_quality: u8,
    /// Largest accepted `scale`.
    pub max_scale: u32,
}

impl ExtractionRequest {
    /// Create a first-page request for `source_path` with default settings.
    pub fn new(source_path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            output_dir: None,
            scale: DEFAULT_SCALE,
            extract_all: false,
            worker_count: None,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            max_scale: DEFAULT_MAX_SCALE,
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_extract_all(mut self, extract_all: bool) -> Self {
        self.extract_all = extract_all;
        self
    }

    pub fn with_worker_count(mut self, workers: usize) -> Self {
        self.worker_count = Some(workers);
        self
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    pub fn with_max_scale(mut self, max_scale: u32) -> Self {
        self.max_scale = max_scale;
        self
    }

    /// Check numeric parameters before anything touches the filesystem.
    pub fn validate(&self) -> Result<()> {
        if self.scale == 0 || self.scale > self.max_scale {
            return Err(PdfshotError::InvalidRequest(format!(
                "scale must be between 1 and {}, got {}",
                self.max_scale, self.scale
            )));
        }
        if self.worker_count == Some(0) {
            return Err(PdfshotError::InvalidRequest(
                "worker count must be at least 1".to_string(),
            ));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(PdfshotError::InvalidRequest(format!(
                "JPEG quality must be between 1 and 100, got {}",
                self.jpeg_quality
            )));
        }
        Ok(())
    }
}

/// Outcome of one page task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageResult {
    Success { page_index: usize, output_path: PathBuf },
    Failure(PageFailure),
}

impl PageResult {
    /// Zero-based index of the page this result belongs to.
    pub fn page_index(&self) -> usize {
        match self {
            PageResult::Success { page_index, .. } => *page_index,
            PageResult::Failure(failure) => failure.page_index,
        }
    }
}

/// A page that could not be extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageFailure {
    /// Zero-based page index.
    pub page_index: usize,
    /// Human-readable reason.
    pub error: String,
}

/// Aggregated result of an extraction call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionOutcome {
    /// Page count reported by the probe.
    pub total_pages: usize,
    /// Number of page tasks dispatched.
    pub requested_pages: usize,
    /// Written files, ascending by page.
    pub paths: Vec<PathBuf>,
    /// Pages that failed, ascending by page.
    pub failures: Vec<PageFailure>,
}

impl ExtractionOutcome {
    /// Partition task results, preserving their submission order.
    pub fn from_results(total_pages: usize, results: Vec<PageResult>) -> Self {
        debug_assert!(
            results
                .windows(2)
                .all(|pair| pair[0].page_index() < pair[1].page_index()),
            "page results out of order"
        );
        let requested_pages = results.len();
        let mut paths = Vec::with_capacity(requested_pages);
        let mut failures = Vec::new();

        for result in results {
            match result {
                PageResult::Success { output_path, .. } => paths.push(output_path),
                PageResult::Failure(failure) => failures.push(failure),
            }
        }

        Self {
            total_pages,
            requested_pages,
            paths,
            failures,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// The ordered list of written files.
    pub fn into_paths(self) -> Vec<PathBuf> {
        self.paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_uses_defaults() {
        let request = ExtractionRequest::new("doc.pdf");
        assert_eq!(request.scale, 4);
        assert_eq!(request.jpeg_quality, 95);
        assert!(!request.extract_all);
        assert_eq!(request.worker_count, None);
        assert_eq!(request.output_dir, None);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_scale() {
        let err = ExtractionRequest::new("doc.pdf")
            .with_scale(0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, PdfshotError::InvalidRequest(_)));
    }

    #[test]
    fn test_validate_rejects_scale_above_bound() {
        let request = ExtractionRequest::new("doc.pdf").with_max_scale(8);
        assert!(request.clone().with_scale(8).validate().is_ok());
        assert!(request.with_scale(9).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_workers() {
        let request = ExtractionRequest::new("doc.pdf").with_worker_count(0);
        assert!(matches!(
            request.validate(),
            Err(PdfshotError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_quality() {
        assert!(ExtractionRequest::new("doc.pdf")
            .with_jpeg_quality(0)
            .validate()
            .is_err());
        assert!(ExtractionRequest::new("doc.pdf")
            .with_jpeg_quality(101)
            .validate()
            .is_err());
    }

    #[test]
    fn test_outcome_drops_failures_keeps_order() {
        let results = vec![
            PageResult::Success {
                page_index: 0,
                output_path: PathBuf::from("doc_page1.jpg"),
            },
            PageResult::Failure(PageFailure {
                page_index: 1,
                error: "boom".to_string(),
            }),
            PageResult::Success {
                page_index: 2,
                output_path: PathBuf::from("doc_page3.jpg"),
            },
        ];
        assert_eq!(results[1].page_index(), 1);

        let outcome = ExtractionOutcome::from_results(3, results);
        assert_eq!(outcome.requested_pages, 3);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(
            outcome.into_paths(),
            vec![PathBuf::from("doc_page1.jpg"), PathBuf::from("doc_page3.jpg")]
        );
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "page results out of order")]
    fn test_outcome_rejects_unordered_results() {
        let results = vec![
            PageResult::Success {
                page_index: 1,
                output_path: PathBuf::from("doc_page2.jpg"),
            },
            PageResult::Success {
                page_index: 0,
                output_path: PathBuf::from("doc_page1.jpg"),
            },
        ];
        ExtractionOutcome::from_results(2, results);
    }
}
