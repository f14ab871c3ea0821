//! osk_image - Turn testbench PIXEL reports into PNG frames
//!
//! Reads simulator output on stdin:
//! 1. `PIXEL:x:y:r:g:b` notes inside 800x480 are drawn into the framebuffer
//! 2. `PIXEL:800:480:...` writes the framebuffer to `<prefix>-NNNN.png`
//! 3. Every other line is passed through to stdout
//!
//! Output location comes from `OSK_IMAGE_CONFIG`, `OSK_IMAGE_OUTPUT_DIR`
//! and `OSK_IMAGE_PREFIX`.

use anyhow::{Context, Result};
use std::io::{self, Write};

use osk_image::{FrameIngest, IngestConfig, PngFrameEncoder};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = IngestConfig::load()?;
    log::info!(
        "writing frames to {} as {}-NNNN.png",
        cfg.output_dir.display(),
        cfg.prefix
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out, "Clear frame...").context("failed to write progress")?;
    let mut ingest = FrameIngest::new(PngFrameEncoder::from_config(&cfg));

    writeln!(out, "Read pixels...").context("failed to write progress")?;
    let stdin = io::stdin();
    let stats = ingest.run(stdin.lock(), &mut out)?;

    log::info!(
        "end of input: {} frames, {} pixels written, {} dropped, {} lines passed through",
        stats.frames_written,
        stats.pixels_written,
        stats.pixels_dropped,
        stats.lines_echoed
    );
    Ok(())
}
