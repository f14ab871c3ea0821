//! Testbench report grammar.
//!
//! A pixel report is a VHDL `report` note of the form
//!
//! ```text
//! tb_display.vhdl:212:9:@1250ns:(report note): PIXEL:12:34:ff:80:00
//! ```
//!
//! x and y are decimal, the three channels are hexadecimal. Any line that
//! does not fit this shape is not a pixel report.

use std::sync::OnceLock;

use crate::frame::{FRAME_HEIGHT, FRAME_WIDTH, OPAQUE};

const PIXEL_REPORT_PATTERN: &str = concat!(
    r"^[^.\\]+\.vhdl:[^:]+:\s*[+-]?[0-9]+:[^:]+:\(report\s*note\):\s*PIXEL:",
    r"\s*([+-]?[0-9]+):",
    r"\s*([+-]?[0-9]+):",
    r"\s*([+-])?(?:0[xX])?([0-9A-Fa-f]+):",
    r"\s*([+-])?(?:0[xX])?([0-9A-Fa-f]+):",
    r"\s*([+-])?(?:0[xX])?([0-9A-Fa-f]+)",
);

fn pixel_report_re() -> &'static regex::Regex {
    static PIXEL_REPORT_RE: OnceLock<regex::Regex> = OnceLock::new();
    PIXEL_REPORT_RE.get_or_init(|| regex::Regex::new(PIXEL_REPORT_PATTERN).unwrap())
}

/// One parsed `PIXEL:` report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelEvent {
    pub x: i64,
    pub y: i64,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl PixelEvent {
    pub fn coords(&self) -> (i64, i64) {
        (self.x, self.y)
    }

    /// The (800, 480) sentinel that closes a frame.
    pub fn is_frame_marker(&self) -> bool {
        self.x == FRAME_WIDTH as i64 && self.y == FRAME_HEIGHT as i64
    }

    pub fn rgba(&self) -> [u8; 4] {
        [self.r, self.g, self.b, OPAQUE]
    }
}

/// Parse a single report line. Returns `None` for anything that is not a
/// well-formed pixel report; callers echo those lines.
///
/// Numbers never fail once the shape matches: coordinates saturate to the
/// `i64` range and are then narrowed to 32 bits, channels saturate to the
/// `u64` range and keep their low byte. Negative channels wrap.
pub fn parse_pixel_event(line: &str) -> Option<PixelEvent> {
    let caps = pixel_report_re().captures(line)?;
    let channel = |sign: usize| {
        parse_channel(caps.get(sign).map(|m| m.as_str()), &caps[sign + 1])
    };
    Some(PixelEvent {
        x: parse_coordinate(&caps[1]),
        y: parse_coordinate(&caps[2]),
        r: channel(3),
        g: channel(5),
        b: channel(7),
    })
}

fn parse_coordinate(digits: &str) -> i64 {
    let value = digits.parse::<i64>().unwrap_or(if digits.starts_with('-') {
        i64::MIN
    } else {
        i64::MAX
    });
    value as i32 as i64
}

fn parse_channel(sign: Option<&str>, digits: &str) -> u8 {
    let value = match u64::from_str_radix(digits, 16) {
        Ok(value) if sign == Some("-") => value.wrapping_neg(),
        Ok(value) => value,
        Err(_) => u64::MAX,
    };
    (value & 0xff) as u8
}
