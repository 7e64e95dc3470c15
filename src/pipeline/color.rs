//! Background colour parsing.
//!
//! Accepted forms:
//!
//! | Form | Example |
//! |------|---------|
//! | `#rgb` / `#rgba` | `#fa0`, `#fa08` |
//! | `#rrggbb` / `#rrggbbaa` | `#ffaa00`, `#ffaa0080` |
//! | `rgb(r, g, b)` | `rgb(255, 170, 0)` |
//! | CSS name | `white`, `Navy`, `lightgray` |
//!
//! Alpha is parsed and dropped; the canvas is opaque RGB.

use crate::error::ExtractError;
use image::Rgb;

const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("black", [0, 0, 0]),
    ("white", [255, 255, 255]),
    ("red", [255, 0, 0]),
    ("lime", [0, 255, 0]),
    ("green", [0, 128, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("cyan", [0, 255, 255]),
    ("aqua", [0, 255, 255]),
    ("magenta", [255, 0, 255]),
    ("fuchsia", [255, 0, 255]),
    ("silver", [192, 192, 192]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
    ("lightgray", [211, 211, 211]),
    ("lightgrey", [211, 211, 211]),
    ("darkgray", [169, 169, 169]),
    ("darkgrey", [169, 169, 169]),
    ("maroon", [128, 0, 0]),
    ("olive", [128, 128, 0]),
    ("purple", [128, 0, 128]),
    ("teal", [0, 128, 128]),
    ("navy", [0, 0, 128]),
    ("orange", [255, 165, 0]),
    ("pink", [255, 192, 203]),
    ("brown", [165, 42, 42]),
    ("gold", [255, 215, 0]),
    ("beige", [245, 245, 220]),
    ("ivory", [255, 255, 240]),
    ("whitesmoke", [245, 245, 245]),
];

/// Parse a colour string into an opaque RGB pixel.
pub fn parse_color(input: &str) -> Result<Rgb<u8>, ExtractError> {
    let s = input.trim();
    let invalid = |reason: &str| ExtractError::invalid_parameter("bgcolor", input, reason);

    if let Some(hex) = s.strip_prefix('#') {
        let reason = "expected #rgb, #rgba, #rrggbb or #rrggbbaa";
        return parse_hex(hex).ok_or_else(|| invalid(reason));
    }

    let lower = s.to_ascii_lowercase();
    if let Some(args) = lower
        .strip_prefix("rgb(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        let reason = "expected rgb(r, g, b) with 0-255 components";
        return parse_rgb_function(args).ok_or_else(|| invalid(reason));
    }

    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, rgb)| Rgb(*rgb))
        .ok_or_else(|| invalid("unknown colour name"))
}

fn parse_hex(hex: &str) -> Option<Rgb<u8>> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok();
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 | 4 => Some(Rgb([nibble(0)? * 17, nibble(1)? * 17, nibble(2)? * 17])),
        6 | 8 => Some(Rgb([byte(0)?, byte(2)?, byte(4)?])),
        _ => None,
    }
}

fn parse_rgb_function(args: &str) -> Option<Rgb<u8>> {
    let parts: Vec<u8> = args
        .split(',')
        .map(|p| p.trim().parse::<u8>().ok())
        .collect::<Option<Vec<_>>>()?;
    match parts.as_slice() {
        [r, g, b] => Some(Rgb([*r, *g, *b])),
        _ => None,
    }
}
