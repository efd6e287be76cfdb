//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;

use super::request::{DEFAULT_JPEG_QUALITY, DEFAULT_MAX_SCALE, DEFAULT_SCALE, ExtractionRequest};
use crate::error::{PdfshotError, Result};

/// Main configuration for pdfshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PdfshotConfig {
    /// Page extraction defaults.
    pub extraction: ExtractionConfig,

    /// Rendering library configuration.
    pub render: RenderConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Defaults applied to every extraction request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Linear render multiplier.
    pub scale: u32,

    /// Extract every page instead of only the first.
    pub extract_all: bool,

    /// Worker pool size (None = derived from available cores).
    pub worker_count: Option<usize>,

    /// JPEG quality (1 - 100).
    pub jpeg_quality: u8,

    /// Largest accepted scale.
    pub max_scale: u32,

    /// Output directory (None = next to the source document).
    pub output_dir: Option<PathBuf>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            extract_all: false,
            worker_count: None,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            max_scale: DEFAULT_MAX_SCALE,
            output_dir: None,
        }
    }
}

/// Rendering library configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Directory containing the pdfium shared library.
    pub library_dir: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level filter (error, warn, info, debug, trace).
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Parsed level filter. Accepts `off`, `error`, `warn`, `info`, `debug`
    /// and `trace` in any case.
    pub fn level_filter(&self) -> Result<LevelFilter> {
        self.level.parse().map_err(|_| {
            PdfshotError::Config(format!(
                "invalid logging.level '{}': expected off, error, warn, info, debug or trace",
                self.level
            ))
        })
    }
}

impl PdfshotConfig {
    /// Check values that deserialize fine but cannot be used.
    pub fn validate(&self) -> Result<()> {
        self.logging.level_filter()?;
        Ok(())
    }

    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| PdfshotError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| PdfshotError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Build a request for `source` from the configured defaults.
    pub fn request_for(&self, source: impl Into<PathBuf>) -> ExtractionRequest {
        let extraction = &self.extraction;
        let mut request = ExtractionRequest::new(source)
            .with_scale(extraction.scale)
            .with_extract_all(extraction.extract_all)
            .with_jpeg_quality(extraction.jpeg_quality)
            .with_max_scale(extraction.max_scale);

        if let Some(workers) = extraction.worker_count {
            request = request.with_worker_count(workers);
        }
        if let Some(dir) = &extraction.output_dir {
            request = request.with_output_dir(dir.clone());
        }
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = PdfshotConfig::default();
        assert_eq!(config.extraction.scale, 4);
        assert_eq!(config.extraction.jpeg_quality, 95);
        assert!(!config.extraction.extract_all);
        assert_eq!(config.extraction.worker_count, None);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: PdfshotConfig =
            serde_json::from_str(r#"{"extraction": {"extract_all": true, "worker_count": 2}}"#)
                .unwrap();
        assert!(config.extraction.extract_all);
        assert_eq!(config.extraction.worker_count, Some(2));
        assert_eq!(config.extraction.scale, 4);
        assert_eq!(config.render, RenderConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = PdfshotConfig::default();
        config.extraction.scale = 2;
        config.render.library_dir = Some(PathBuf::from("/opt/pdfium/lib"));
        config.save(&path).unwrap();

        assert_eq!(PdfshotConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = PdfshotConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, PdfshotError::Config(_)));
    }

    #[test]
    fn test_logging_level_filter() {
        let mut config = PdfshotConfig::default();
        assert_eq!(config.logging.level_filter().unwrap(), LevelFilter::INFO);

        config.logging.level = "DEBUG".to_string();
        assert_eq!(config.logging.level_filter().unwrap(), LevelFilter::DEBUG);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_logging_level() {
        let mut config = PdfshotConfig::default();
        config.logging.level = "verbose".to_string();

        let err = config.validate().unwrap_err();
        assert!(matches!(err, PdfshotError::Config(_)));
        assert!(err.to_string().contains("verbose"));
    }

    #[test]
    fn test_request_for_applies_defaults() {
        let mut config = PdfshotConfig::default();
        config.extraction.extract_all = true;
        config.extraction.worker_count = Some(3);
        config.extraction.output_dir = Some(PathBuf::from("out"));

        let request = config.request_for("doc.pdf");
        assert_eq!(request.source_path, PathBuf::from("doc.pdf"));
        assert_eq!(request.output_dir, Some(PathBuf::from("out")));
        assert!(request.extract_all);
        assert_eq!(request.worker_count, Some(3));
        assert_eq!(request.scale, 4);
        assert_eq!(request.jpeg_quality, 95);
    }
}
