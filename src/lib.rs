//! osk-image
//!
//! Rebuilds framebuffer snapshots from the `PIXEL:` notes a VHDL display
//! testbench reports while it simulates.
//!
//! # Module Structure
//!
//! - `report`: grammar for `(report note): PIXEL:x:y:r:g:b` lines
//! - `frame`: the 800x480 RGBA framebuffer the reports accumulate into
//! - `encoder`: `FrameEncoder` trait and the PNG file encoder
//! - `ingest`: the line loop tying the three together
//! - `config`: output directory and file prefix

pub mod config;
pub mod encoder;
pub mod frame;
pub mod ingest;
pub mod report;

pub use config::IngestConfig;
pub use encoder::{FrameEncoder, PngFrameEncoder};
pub use frame::{Framebuffer, FRAME_HEIGHT, FRAME_WIDTH};
pub use ingest::{read_chunk, FrameIngest, IngestStats, LineOutcome, MAX_CHUNK_BYTES};
pub use report::{parse_pixel_event, PixelEvent};
