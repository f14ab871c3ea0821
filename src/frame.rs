//! Framebuffer accumulation layer.
//!
//! - `Framebuffer`: fixed 800x480 RGBA raster, row-major, owned by the ingest loop.
//!
//! The buffer is zeroed once at construction and never cleared afterwards.
//! Successive frames accumulate: a pixel not rewritten before the next marker
//! keeps the colour it had in the previous frame.

/// Raster width in pixels.
pub const FRAME_WIDTH: u32 = 800;

/// Raster height in pixels.
pub const FRAME_HEIGHT: u32 = 480;

/// Bytes per pixel (R, G, B, A).
pub const BYTES_PER_PIXEL: usize = 4;

const FRAME_BYTES: usize = FRAME_WIDTH as usize * FRAME_HEIGHT as usize * BYTES_PER_PIXEL;

/// Alpha written with every in-range pixel.
pub const OPAQUE: u8 = 0xff;

// ----------------------------------------------------------------------------
// Framebuffer
// ----------------------------------------------------------------------------

/// Contiguous RGBA raster of `FRAME_WIDTH` x `FRAME_HEIGHT` pixels.
pub struct Framebuffer {
    data: Vec<u8>,
}

impl Framebuffer {
    /// All-zero buffer (black, alpha 0).
    pub fn new() -> Self {
        Self {
            data: vec![0u8; FRAME_BYTES],
        }
    }

    pub fn width(&self) -> u32 {
        FRAME_WIDTH
    }

    pub fn height(&self) -> u32 {
        FRAME_HEIGHT
    }

    /// Write an RGBA pixel at column `x`, row `y`.
    ///
    /// Returns `false` and leaves the buffer untouched when the coordinates
    /// fall outside the raster.
    pub fn set_pixel(&mut self, x: i64, y: i64, rgba: [u8; 4]) -> bool {
        let Some(offset) = offset_of(x, y) else {
            return false;
        };
        self.data[offset..offset + BYTES_PER_PIXEL].copy_from_slice(&rgba);
        true
    }

    /// Read the pixel at column `x`, row `y`, if in bounds.
    pub fn pixel(&self, x: i64, y: i64) -> Option<[u8; 4]> {
        let offset = offset_of(x, y)?;
        let mut rgba = [0u8; 4];
        rgba.copy_from_slice(&self.data[offset..offset + BYTES_PER_PIXEL]);
        Some(rgba)
    }

    /// One row of raw RGBA bytes.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= FRAME_HEIGHT {
            return None;
        }
        let stride = FRAME_WIDTH as usize * BYTES_PER_PIXEL;
        let start = y as usize * stride;
        Some(&self.data[start..start + stride])
    }

    /// Whole raster, row-major, as handed to the encoder.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

fn offset_of(x: i64, y: i64) -> Option<usize> {
    if !(0..FRAME_WIDTH as i64).contains(&x) || !(0..FRAME_HEIGHT as i64).contains(&y) {
        return None;
    }
    Some((y as usize * FRAME_WIDTH as usize + x as usize) * BYTES_PER_PIXEL)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
