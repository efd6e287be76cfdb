//! In-memory render engine for tests.

use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use image::{DynamicImage, Rgb, RgbImage};

use super::{RenderDocument, RenderEngine, Result};
use crate::error::RenderError;

/// Native page size in pixels at scale 1.
pub const PAGE_WIDTH: u32 = 6;
pub const PAGE_HEIGHT: u32 = 8;

/// Engine serving a synthetic document with a fixed number of pages.
#[derive(Default)]
pub struct FakeEngine {
    pages: usize,
    failing: HashSet<usize>,
    unopenable: bool,
    render_delay: Option<Duration>,
    opened: AtomicUsize,
    live: AtomicUsize,
    peak: AtomicUsize,
}

impl FakeEngine {
    pub fn with_pages(pages: usize) -> Self {
        Self {
            pages,
            ..Default::default()
        }
    }

    /// Make rendering of `index` fail.
    pub fn failing_page(mut self, index: usize) -> Self {
        self.failing.insert(index);
        self
    }

    /// Make every `open` call fail, as for a corrupt file.
    pub fn unopenable(mut self) -> Self {
        self.unopenable = true;
        self
    }

    pub fn render_delay(mut self, delay: Duration) -> Self {
        self.render_delay = Some(delay);
        self
    }

    /// Total successful `open` calls.
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// Handles currently open.
    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Largest number of handles that were open at the same time.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

impl RenderEngine for FakeEngine {
    fn open(&self, _path: &Path) -> Result<Box<dyn RenderDocument + '_>> {
        if self.unopenable {
            return Err(RenderError::Open("not a PDF".to_string()));
        }
        self.opened.fetch_add(1, Ordering::SeqCst);
        let live = self.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(live, Ordering::SeqCst);
        Ok(Box::new(FakeDocument { engine: self }))
    }
}

struct FakeDocument<'a> {
    engine: &'a FakeEngine,
}

impl RenderDocument for FakeDocument<'_> {
    fn page_count(&self) -> usize {
        self.engine.pages
    }

    fn render_page(&self, index: usize, scale: u32) -> Result<DynamicImage> {
        if let Some(delay) = self.engine.render_delay {
            thread::sleep(delay);
        }
        if index >= self.engine.pages {
            return Err(RenderError::PageOutOfRange {
                index,
                count: self.engine.pages,
            });
        }
        if self.engine.failing.contains(&index) {
            return Err(RenderError::Render(format!("forced fault on page {}", index)));
        }
        let shade = (index * 40 % 256) as u8;
        Ok(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            PAGE_WIDTH * scale,
            PAGE_HEIGHT * scale,
            Rgb([shade, shade, shade]),
        )))
    }
}

impl Drop for FakeDocument<'_> {
    fn drop(&mut self) {
        self.engine.live.fetch_sub(1, Ordering::SeqCst);
    }
}
