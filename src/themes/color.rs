use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, ThemeResult};

/// A color id assigned by a [`ColorMap`].
///
/// `0` is the sentinel meaning "unset"; real ids start at 1. Ids fit in the 9 bits reserved for
/// the foreground slot and the 8 bits reserved for the background slot of the packed metadata
/// word (see [`crate::metadata`]), so callers that feed a `ColorId` into that word must keep
/// their theme's distinct color count under those limits -- themes in practice use a handful of
/// dozens of colors, well inside either budget.
pub type ColorId = u32;

fn parse_hex_component(hex: &str, original: &str) -> ThemeResult<u8> {
    u8::from_str_radix(hex, 16).map_err(|_| Error::InvalidHexColor {
        value: original.to_string(),
        reason: format!("invalid hex component '{}'", hex),
    })
}

/// Canonicalize a color string into upper-case `#RRGGBB` (or `#RRGGBBAA` when an alpha channel
/// is present and not fully opaque), expanding `#RGB`/`#RGBA` shorthand along the way.
///
/// Malformed input is never an error here: per the spec's total-error-handling design, a color
/// the canonicalizer can't parse is interned verbatim, upper-cased, so two equally-malformed
/// strings still collapse to the same id.
pub fn canonicalize_color(raw: &str) -> String {
    let hex = raw.trim_start_matches('#');
    let parsed = match hex.len() {
        3 | 4 => {
            let digits: Option<Vec<u8>> =
                hex.chars().map(|c| c.to_digit(16).map(|d| d as u8 * 17)).collect();
            digits.map(|d| {
                if d.len() == 3 {
                    (d[0], d[1], d[2], 255)
                } else {
                    (d[0], d[1], d[2], d[3])
                }
            })
        }
        6 => parse_hex_component(&hex[0..2], raw)
            .ok()
            .zip(parse_hex_component(&hex[2..4], raw).ok())
            .zip(parse_hex_component(&hex[4..6], raw).ok())
            .map(|((r, g), b)| (r, g, b, 255)),
        8 => parse_hex_component(&hex[0..2], raw)
            .ok()
            .zip(parse_hex_component(&hex[2..4], raw).ok())
            .zip(parse_hex_component(&hex[4..6], raw).ok())
            .zip(parse_hex_component(&hex[6..8], raw).ok())
            .map(|(((r, g), b), a)| (r, g, b, a)),
        _ => None,
    };

    match parsed {
        Some((r, g, b, 255)) => format!("#{:02X}{:02X}{:02X}", r, g, b),
        Some((r, g, b, a)) => format!("#{:02X}{:02X}{:02X}{:02X}", r, g, b, a),
        None => raw.to_uppercase(),
    }
}

/// Parses a hex color string into RGBA components, failing on malformed input.
///
/// This is a general-purpose parser for callers that need actual channel values rather than a
/// canonical string; the theme-compilation path never calls this -- it always goes through
/// [`canonicalize_color`], which is total.
pub fn parse_hex_rgba(raw: &str) -> ThemeResult<(u8, u8, u8, u8)> {
    let hex = raw.trim_start_matches('#');
    match hex.len() {
        3 => {
            let r = parse_hex_component(&hex[0..1], raw)?;
            let g = parse_hex_component(&hex[1..2], raw)?;
            let b = parse_hex_component(&hex[2..3], raw)?;
            Ok((r * 17, g * 17, b * 17, 255))
        }
        4 => {
            let r = parse_hex_component(&hex[0..1], raw)?;
            let g = parse_hex_component(&hex[1..2], raw)?;
            let b = parse_hex_component(&hex[2..3], raw)?;
            let a = parse_hex_component(&hex[3..4], raw)?;
            Ok((r * 17, g * 17, b * 17, a * 17))
        }
        6 => {
            let r = parse_hex_component(&hex[0..2], raw)?;
            let g = parse_hex_component(&hex[2..4], raw)?;
            let b = parse_hex_component(&hex[4..6], raw)?;
            Ok((r, g, b, 255))
        }
        8 => {
            let r = parse_hex_component(&hex[0..2], raw)?;
            let g = parse_hex_component(&hex[2..4], raw)?;
            let b = parse_hex_component(&hex[4..6], raw)?;
            let a = parse_hex_component(&hex[6..8], raw)?;
            Ok((r, g, b, a))
        }
        _ => Err(Error::InvalidHexColor {
            value: raw.to_string(),
            reason: format!("invalid length {}", hex.len()),
        }),
    }
}

/// Interns color strings into small, stable integer ids.
///
/// Canonicalization-equal strings (e.g. `#fff` and `#FFFFFF`) map to the same id. Ids are
/// assigned in first-request order starting at 1; `0` is reserved to mean "unset" and is never
/// handed out. Mutable during theme construction only -- once a [`crate::theme::Theme`] is
/// finalized, the map is read-only (see the crate's concurrency notes).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColorMap {
    strings: Vec<String>,
    ids: HashMap<String, ColorId>,
}

impl ColorMap {
    /// Creates an empty color map. Index 0 of [`ColorMap::colors`] is unused padding so that
    /// valid ids (which start at 1) can index directly into it.
    pub fn new() -> Self {
        ColorMap {
            strings: vec![String::new()],
            ids: HashMap::new(),
        }
    }

    /// Interns `color`, canonicalizing it first, and returns its id. Idempotent: interning the
    /// same (canonicalization-equal) string twice returns the same id.
    pub fn get_id(&mut self, color: &str) -> ColorId {
        let canonical = canonicalize_color(color);
        if let Some(&id) = self.ids.get(&canonical) {
            return id;
        }
        let id = self.strings.len() as ColorId;
        self.ids.insert(canonical.clone(), id);
        self.strings.push(canonical);
        id
    }

    /// Looks up the canonicalized color string for a previously-returned id.
    ///
    /// Returns `None` for the unset sentinel `0` or for ids outside the range ever handed out.
    pub fn get_color(&self, id: ColorId) -> Option<&str> {
        if id == 0 {
            return None;
        }
        self.strings.get(id as usize).map(String::as_str)
    }

    /// All canonicalized color strings, indexed by id. Index 0 is unused padding.
    pub fn colors(&self) -> &[String] {
        &self.strings
    }
}
