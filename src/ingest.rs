//! Frame ingest loop.
//!
//! `FrameIngest` consumes testbench output one chunk at a time:
//! - pixel reports inside the raster are written into the framebuffer
//! - the (800, 480) marker flushes the framebuffer through the encoder
//! - everything else is echoed to the output stream unchanged
//!
//! Encoder and I/O errors are returned to the caller and end the run.

use anyhow::{anyhow, Context, Result};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::encoder::FrameEncoder;
use crate::frame::Framebuffer;
use crate::report::parse_pixel_event;

/// Longest chunk handed to the parser. Longer physical lines are split.
pub const MAX_CHUNK_BYTES: usize = 1023;

/// What a single chunk did to the ingest state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineOutcome {
    /// In-range pixel written.
    Pixel,
    /// Pixel report outside the raster; ignored.
    OutOfRange,
    /// Frame marker; the buffer was encoded as image `counter`.
    Flushed { counter: u32, path: PathBuf },
    /// Not a pixel report; echoed verbatim.
    Echoed,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub chunks_read: u64,
    pub pixels_written: u64,
    pub pixels_dropped: u64,
    pub lines_echoed: u64,
    pub frames_written: u32,
}

pub struct FrameIngest<E: FrameEncoder> {
    framebuffer: Framebuffer,
    encoder: E,
    counter: u32,
    stats: IngestStats,
}

impl<E: FrameEncoder> FrameIngest<E> {
    pub fn new(encoder: E) -> Self {
        Self {
            framebuffer: Framebuffer::new(),
            encoder,
            counter: 0,
            stats: IngestStats::default(),
        }
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// Number of images flushed so far (the last counter value used).
    pub fn frames_written(&self) -> u32 {
        self.counter
    }

    pub fn stats(&self) -> &IngestStats {
        &self.stats
    }

    /// Apply one chunk of input. Echoed text and progress go to `out`.
    pub fn process_line<W: Write>(&mut self, line: &[u8], out: &mut W) -> Result<LineOutcome> {
        self.stats.chunks_read += 1;

        let event = std::str::from_utf8(line)
            .ok()
            .and_then(parse_pixel_event);
        let Some(event) = event else {
            out.write_all(line).context("failed to echo input line")?;
            self.stats.lines_echoed += 1;
            return Ok(LineOutcome::Echoed);
        };

        let (x, y) = event.coords();
        if self.framebuffer.set_pixel(x, y, event.rgba()) {
            self.stats.pixels_written += 1;
            return Ok(LineOutcome::Pixel);
        }

        if event.is_frame_marker() {
            return self.flush(out);
        }

        log::debug!("dropping out-of-range pixel ({}, {})", x, y);
        self.stats.pixels_dropped += 1;
        Ok(LineOutcome::OutOfRange)
    }

    /// Bump the counter and encode the buffer. The `Writing image N` progress
    /// line is newline-terminated so it cannot run into the next echoed line.
    fn flush<W: Write>(&mut self, out: &mut W) -> Result<LineOutcome> {
        let counter = self
            .counter
            .checked_add(1)
            .ok_or_else(|| anyhow!("image counter overflow"))?;
        self.counter = counter;

        writeln!(out, "Writing image {}", counter).context("failed to write progress")?;
        out.flush().context("failed to flush output")?;

        let path = self
            .encoder
            .encode(counter, &self.framebuffer)
            .with_context(|| format!("failed to write image {}", counter))?;
        self.stats.frames_written = counter;
        log::info!("wrote image {} to {}", counter, path.display());
        Ok(LineOutcome::Flushed { counter, path })
    }

    /// Drive the loop until end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, mut reader: R, out: &mut W) -> Result<IngestStats> {
        let mut chunk = Vec::with_capacity(MAX_CHUNK_BYTES);
        loop {
            let n = read_chunk(&mut reader, &mut chunk).context("failed to read input")?;
            if n == 0 {
                break;
            }
            self.process_line(&chunk, out)?;
        }
        out.flush().context("failed to flush output")?;
        Ok(self.stats.clone())
    }
}

/// Read the next chunk into `buf`: bytes up to and including a newline, or
/// `MAX_CHUNK_BYTES` bytes, whichever comes first. Returns 0 at end of input.
pub fn read_chunk<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<usize> {
    buf.clear();
    while buf.len() < MAX_CHUNK_BYTES {
        let available = match reader.fill_buf() {
            Ok(available) => available,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if available.is_empty() {
            break;
        }
        let room = MAX_CHUNK_BYTES - buf.len();
        let window = &available[..available.len().min(room)];
        match window.iter().position(|b| *b == b'\n') {
            Some(newline) => {
                buf.extend_from_slice(&window[..=newline]);
                reader.consume(newline + 1);
                break;
            }
            None => {
                let taken = window.len();
                buf.extend_from_slice(window);
                reader.consume(taken);
            }
        }
    }
    Ok(buf.len())
}
