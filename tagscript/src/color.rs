//! Color parsing for the embed `{color: ...}` directive.
//!
//! Accepts the named palette below (case-insensitive) or a hex code in
//! `#RGB`, `#RRGGBB`, `0xRRGGBB`, or bare `RRGGBB` form. Anything else is
//! [`CompileError::UnknownColor`].

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::CompileError;

static NAMED: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| {
    HashMap::from([
        ("red", 0xED4245),
        ("dark_red", 0x992D22),
        ("orange", 0xE67E22),
        ("dark_orange", 0xA84300),
        ("yellow", 0xFEE75C),
        ("gold", 0xF1C40F),
        ("green", 0x57F287),
        ("dark_green", 0x1F8B4C),
        ("blue", 0x3498DB),
        ("dark_blue", 0x206694),
        ("blurple", 0x5865F2),
        ("purple", 0x9B59B6),
        ("dark_purple", 0x71368A),
        ("magenta", 0xE91E63),
        ("pink", 0xEB459E),
        ("teal", 0x1ABC9C),
        ("dark_teal", 0x11806A),
        ("aqua", 0x00FFFF),
        ("white", 0xFFFFFF),
        ("black", 0x000000),
        ("grey", 0x95A5A6),
        ("gray", 0x95A5A6),
        ("dark_grey", 0x607D8B),
        ("dark_gray", 0x607D8B),
    ])
});

// Three or six hex digits, prefix already stripped.
static HEX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{3}(?:[0-9a-fA-F]{3})?$").unwrap()
});

/// Parse a color directive value into a 24-bit RGB integer.
pub fn parse_color(value: &str) -> Result<u32, CompileError> {
    let v = value.trim();
    if let Some(&rgb) = NAMED.get(v.to_ascii_lowercase().as_str()) {
        return Ok(rgb);
    }

    let hex = v
        .strip_prefix('#')
        .or_else(|| v.strip_prefix("0x"))
        .or_else(|| v.strip_prefix("0X"))
        .unwrap_or(v);
    if HEX_RE.is_match(hex) {
        // #RGB shorthand doubles each digit.
        let expanded: String = if hex.len() == 3 {
            hex.chars().flat_map(|c| [c, c]).collect()
        } else {
            hex.to_owned()
        };
        return u32::from_str_radix(&expanded, 16)
            .map_err(|_| CompileError::UnknownColor(v.to_owned()));
    }

    Err(CompileError::UnknownColor(v.to_owned()))
}
