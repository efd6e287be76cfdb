//! Render engine backed by the pdfium shared library.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use once_cell::sync::OnceCell;
use pdfium_render::prelude::*;
use tracing::{debug, info};

use super::{RenderDocument, RenderEngine, Result};
use crate::error::RenderError;
use crate::models::config::RenderConfig;

/// Pdfium-backed [`RenderEngine`].
///
/// The shared library is bound on the first [`open`](RenderEngine::open)
/// call, so constructing the engine never fails. Libraries are searched in
/// the configured directory, next to the executable (and its `libs/`
/// subdirectory), the working directory, then the system library path.
pub struct PdfiumEngine {
    library_dir: Option<PathBuf>,
    pdfium: OnceCell<Pdfium>,
}

impl PdfiumEngine {
    pub fn new() -> Self {
        Self {
            library_dir: None,
            pdfium: OnceCell::new(),
        }
    }

    /// Look for the pdfium library in `dir` before the default locations.
    pub fn with_library_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            library_dir: Some(dir.into()),
            pdfium: OnceCell::new(),
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        match &config.library_dir {
            Some(dir) => Self::with_library_dir(dir.clone()),
            None => Self::new(),
        }
    }

    fn search_paths(&self) -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Some(dir) = &self.library_dir {
            paths.push(dir.clone());
        }
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                paths.push(exe_dir.join("libs"));
                paths.push(exe_dir.to_path_buf());
            }
        }
        paths.push(PathBuf::from("./"));

        paths
    }

    fn bind(&self) -> Result<Pdfium> {
        for path in self.search_paths() {
            let lib_path = Pdfium::pdfium_platform_library_name_at_path(&path);
            debug!("Trying pdfium at {}", lib_path.display());

            if let Ok(bindings) = Pdfium::bind_to_library(&lib_path) {
                info!("Loaded pdfium from {}", path.display());
                return Ok(Pdfium::new(bindings));
            }
        }

        debug!("Trying system pdfium library");
        Pdfium::bind_to_system_library()
            .map(Pdfium::new)
            .map_err(|e| RenderError::Unavailable(e.to_string()))
    }

    fn pdfium(&self) -> Result<&Pdfium> {
        self.pdfium.get_or_try_init(|| self.bind())
    }
}

impl Default for PdfiumEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderEngine for PdfiumEngine {
    fn open(&self, path: &Path) -> Result<Box<dyn RenderDocument + '_>> {
        let document = self
            .pdfium()?
            .load_pdf_from_file(path, None)
            .map_err(|e| RenderError::Open(e.to_string()))?;
        Ok(Box::new(PdfiumDocument { document }))
    }
}

struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
}

impl RenderDocument for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn render_page(&self, index: usize, scale: u32) -> Result<DynamicImage> {
        let count = self.page_count();
        let page_index = u16::try_from(index)
            .ok()
            .filter(|_| index < count)
            .ok_or(RenderError::PageOutOfRange { index, count })?;

        let page = self
            .document
            .pages()
            .get(page_index)
            .map_err(|e| RenderError::Render(e.to_string()))?;

        let render_config = PdfRenderConfig::new().scale_page_by_factor(scale as f32);
        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| RenderError::Render(e.to_string()))?;

        Ok(bitmap.as_image())
    }
}
