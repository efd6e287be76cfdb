//! Output naming and JPEG encoding.

use std::fs;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use tracing::trace;

use crate::error::PageError;

/// Output path for the zero-based `page_index`: `{dir}/{base}_page{index+1}.jpg`.
pub fn page_output_path(output_dir: &Path, base_filename: &str, page_index: usize) -> PathBuf {
    output_dir.join(format!("{}_page{}.jpg", base_filename, page_index + 1))
}

/// Encode `image` as JPEG at `quality` into `path`, replacing any existing file.
///
/// The image is encoded in memory first, so a failed encode leaves `path`
/// as it was. A failed write removes the partial file.
pub fn write_jpeg(image: &DynamicImage, path: &Path, quality: u8) -> Result<(), PageError> {
    // JPEG has no alpha channel
    let rgb = image.to_rgb8();
    trace!(
        "Encoding {}x{} JPEG (quality {}) to {}",
        rgb.width(),
        rgb.height(),
        quality,
        path.display()
    );

    let mut encoded = Vec::new();
    JpegEncoder::new_with_quality(&mut encoded, quality).encode_image(&rgb)?;

    if let Err(e) = fs::write(path, &encoded) {
        let _ = fs::remove_file(path);
        return Err(e.into());
    }
    Ok(())
}
