//! Frame encoders.
//!
//! A flush hands the current `Framebuffer` to a `FrameEncoder`. The shipped
//! encoder writes `<prefix>-NNNN.png` files; tests substitute their own.

use anyhow::{Context, Result};
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder as _};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::IngestConfig;
use crate::frame::Framebuffer;

/// Sink for completed frames.
///
/// An error returned here is fatal for the ingest loop.
pub trait FrameEncoder {
    /// Encode `frame` as image number `counter` and return where it went.
    fn encode(&mut self, counter: u32, frame: &Framebuffer) -> Result<PathBuf>;
}

/// Writes each frame as an 8-bit RGBA PNG.
#[derive(Clone, Debug)]
pub struct PngFrameEncoder {
    output_dir: PathBuf,
    prefix: String,
}

impl PngFrameEncoder {
    pub fn new(output_dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            prefix: prefix.into(),
        }
    }

    pub fn from_config(cfg: &IngestConfig) -> Self {
        Self::new(cfg.output_dir.clone(), cfg.prefix.clone())
    }

    /// `<output_dir>/<prefix>-NNNN.png`, counter padded to four digits.
    pub fn path_for(&self, counter: u32) -> PathBuf {
        self.output_dir.join(format!("{}-{:04}.png", self.prefix, counter))
    }
}

impl FrameEncoder for PngFrameEncoder {
    fn encode(&mut self, counter: u32, frame: &Framebuffer) -> Result<PathBuf> {
        let path = self.path_for(counter);
        write_png(&path, frame)?;
        log::debug!("encoded frame {} to {}", counter, path.display());
        Ok(path)
    }
}

fn write_png(path: &Path, frame: &Framebuffer) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create image file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    PngEncoder::new_with_quality(&mut writer, CompressionType::Default, FilterType::NoFilter)
        .write_image(
            frame.as_bytes(),
            frame.width(),
            frame.height(),
            ExtendedColorType::Rgba8,
        )
        .with_context(|| format!("failed to encode {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::OPAQUE;
    use image::GenericImageView;

    #[test]
    fn file_names_are_zero_padded() {
        let enc = PngFrameEncoder::new("/tmp/out", "oskimage");
        assert_eq!(enc.path_for(1), PathBuf::from("/tmp/out/oskimage-0001.png"));
        assert_eq!(enc.path_for(42), PathBuf::from("/tmp/out/oskimage-0042.png"));
        assert_eq!(enc.path_for(12345), PathBuf::from("/tmp/out/oskimage-12345.png"));
    }

    #[test]
    fn writes_decodable_rgba_png() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut frame = Framebuffer::new();
        frame.set_pixel(10, 20, [0xaa, 0xbb, 0xcc, OPAQUE]);

        let mut enc = PngFrameEncoder::new(dir.path(), "frame");
        let path = enc.encode(7, &frame)?;
        assert_eq!(path, dir.path().join("frame-0007.png"));

        let decoded = image::open(&path)?;
        assert_eq!(decoded.dimensions(), (800, 480));
        let rgba = decoded.into_rgba8();
        assert_eq!(rgba.get_pixel(10, 20).0, [0xaa, 0xbb, 0xcc, 0xff]);
        assert_eq!(rgba.get_pixel(0, 0).0, [0, 0, 0, 0]);
        assert_eq!(rgba.as_raw().as_slice(), frame.as_bytes());
        Ok(())
    }

    #[test]
    fn missing_output_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut enc = PngFrameEncoder::new(dir.path().join("absent"), "frame");
        let err = enc.encode(1, &Framebuffer::new()).unwrap_err();
        assert!(format!("{err:#}").contains("failed to create image file"));
    }
}
