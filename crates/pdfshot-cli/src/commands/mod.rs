//! Subcommands and the option set they share.

pub mod batch;
pub mod config;
pub mod extract;

use std::path::{Path, PathBuf};

use clap::Args;
use tracing::debug;

use pdfshot_core::{ExtractionRequest, PdfiumEngine, PdfshotConfig};

/// Extraction options shared by `extract` and `batch`. Unset flags fall
/// back to the configuration file.
#[derive(Args, Debug, Default)]
pub struct ExtractOptions {
    /// Output directory (default: next to each input)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Render scale (multiplies page resolution)
    #[arg(short, long)]
    pub scale: Option<u32>,

    /// Extract every page instead of only the first
    #[arg(short = 'a', long)]
    pub all: bool,

    /// Extract only the first page, even if the config says otherwise
    #[arg(long, conflicts_with = "all")]
    pub first_only: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long)]
    pub jobs: Option<usize>,

    /// JPEG quality (1-100)
    #[arg(long)]
    pub quality: Option<u8>,

    /// Directory containing the pdfium shared library
    #[arg(long)]
    pub pdfium_dir: Option<PathBuf>,
}

impl ExtractOptions {
    /// Request for `input`: config defaults overridden by flags.
    pub fn request_for(&self, config: &PdfshotConfig, input: &Path) -> ExtractionRequest {
        let mut request = config.request_for(input);

        if let Some(dir) = &self.output_dir {
            request = request.with_output_dir(dir.clone());
        }
        if let Some(scale) = self.scale {
            request = request.with_scale(scale);
        }
        if self.all {
            request = request.with_extract_all(true);
        } else if self.first_only {
            request = request.with_extract_all(false);
        }
        if let Some(jobs) = self.jobs {
            request = request.with_worker_count(jobs);
        }
        if let Some(quality) = self.quality {
            request = request.with_jpeg_quality(quality);
        }
        request
    }

    pub fn engine(&self, config: &PdfshotConfig) -> PdfiumEngine {
        match &self.pdfium_dir {
            Some(dir) => PdfiumEngine::with_library_dir(dir.clone()),
            None => PdfiumEngine::from_config(&config.render),
        }
    }
}

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pdfshot")
        .join("config.json")
}

/// Load the explicit config file, else the default one if present, else defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<PdfshotConfig> {
    let config = match path {
        Some(path) => PdfshotConfig::from_file(path)?,
        None => {
            let default_path = default_config_path();
            if default_path.exists() {
                debug!("Loading config from {}", default_path.display());
                PdfshotConfig::from_file(&default_path)?
            } else {
                PdfshotConfig::default()
            }
        }
    };
    config.validate()?;
    Ok(config)
}
