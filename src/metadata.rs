//! 32-bit metadata word packing (§4.6).
//!
//! ```text
//! bit    0       is_default
//! bits   1-8     language_id      (8 bits)
//! bits   9-11    token_type       (3 bits)
//! bits   12-14   font_style       (3 bits)
//! bits   15-23   foreground id    (9 bits)
//! bits   24-31   background id    (8 bits)
//! ```

use crate::themes::color::ColorId;
use crate::themes::font_style::FontStyle;

const IS_DEFAULT_MASK: u32 = 0b1;

const LANGUAGE_ID_OFFSET: u32 = 1;
const LANGUAGE_ID_BITS: u32 = 8;
const LANGUAGE_ID_MASK: u32 = ((1 << LANGUAGE_ID_BITS) - 1) << LANGUAGE_ID_OFFSET;

const TOKEN_TYPE_OFFSET: u32 = 9;
const TOKEN_TYPE_BITS: u32 = 3;
const TOKEN_TYPE_MASK: u32 = ((1 << TOKEN_TYPE_BITS) - 1) << TOKEN_TYPE_OFFSET;

const FONT_STYLE_OFFSET: u32 = 12;
const FONT_STYLE_BITS: u32 = 3;
const FONT_STYLE_MASK: u32 = ((1 << FONT_STYLE_BITS) - 1) << FONT_STYLE_OFFSET;

const FOREGROUND_OFFSET: u32 = 15;
const FOREGROUND_BITS: u32 = 9;
const FOREGROUND_MASK: u32 = ((1 << FOREGROUND_BITS) - 1) << FOREGROUND_OFFSET;

const BACKGROUND_OFFSET: u32 = 24;
const BACKGROUND_BITS: u32 = 8;
const BACKGROUND_MASK: u32 = ((1 << BACKGROUND_BITS) - 1) << BACKGROUND_OFFSET;

/// The maximum foreground color id that fits in the metadata word's 9-bit slot.
pub const MAX_FOREGROUND_ID: ColorId = (1 << FOREGROUND_BITS) - 1;
/// The maximum background color id that fits in the metadata word's 8-bit slot.
pub const MAX_BACKGROUND_ID: ColorId = (1 << BACKGROUND_BITS) - 1;

/// A parent scope's already-resolved packed metadata word, as carried down a scope stack.
///
/// Kept as a distinct type rather than a bare `u32` so that the external merge interface names
/// what it actually receives: a tokenizer's current stack element, not an arbitrary word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopeListElement(u32);

impl ScopeListElement {
    /// Wraps an already-packed metadata word as a scope list element.
    pub fn new(metadata: u32) -> Self {
        ScopeListElement(metadata)
    }

    /// The element's packed metadata word.
    pub fn metadata(&self) -> u32 {
        self.0
    }
}

/// The fields a single trie node rule contributes to a packed metadata word, before merging
/// with ancestor context. Every field is optional: `None` means "not set by this rule",
/// which [`merge_metadata`] resolves by falling back to the parent/old value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopeMetadata {
    /// The language id to set, if this rule assigns one.
    pub language_id: Option<u8>,
    /// The token type to set, if this rule assigns one.
    pub token_type: Option<u8>,
    /// The font style to set, if this rule assigns one.
    pub font_style: Option<FontStyle>,
    /// The foreground color id to set, if this rule assigns one.
    pub foreground: Option<ColorId>,
    /// The background color id to set, if this rule assigns one.
    pub background: Option<ColorId>,
}

fn get_bits(word: u32, mask: u32, offset: u32) -> u32 {
    (word & mask) >> offset
}

fn set_bits(word: u32, mask: u32, offset: u32, value: u32) -> u32 {
    (word & !mask) | ((value << offset) & mask)
}

/// Reads the `is_default` flag from a packed metadata word.
pub fn is_default(word: u32) -> bool {
    (word & IS_DEFAULT_MASK) != 0
}

/// Reads the language id field from a packed metadata word.
pub fn language_id(word: u32) -> u8 {
    get_bits(word, LANGUAGE_ID_MASK, LANGUAGE_ID_OFFSET) as u8
}

/// Reads the token type field from a packed metadata word.
pub fn token_type(word: u32) -> u8 {
    get_bits(word, TOKEN_TYPE_MASK, TOKEN_TYPE_OFFSET) as u8
}

/// Reads the font style field from a packed metadata word.
pub fn font_style(word: u32) -> FontStyle {
    FontStyle::from_bits(get_bits(word, FONT_STYLE_MASK, FONT_STYLE_OFFSET) as u8)
}

/// Reads the foreground color id field from a packed metadata word.
pub fn foreground(word: u32) -> ColorId {
    get_bits(word, FOREGROUND_MASK, FOREGROUND_OFFSET)
}

/// Reads the background color id field from a packed metadata word.
pub fn background(word: u32) -> ColorId {
    get_bits(word, BACKGROUND_MASK, BACKGROUND_OFFSET)
}

/// Packs a full set of field values into a metadata word. `foreground`/`background` ids beyond
/// their slot's capacity are truncated by the bitmask, matching the packer's total,
/// never-panics contract -- callers that mint a [`crate::themes::color::ColorMap`] with more
/// distinct colors than a slot can hold have exceeded the format, not triggered a bug here.
pub fn pack(
    is_default_flag: bool,
    language_id_value: u8,
    token_type_value: u8,
    font_style_value: FontStyle,
    foreground_id: ColorId,
    background_id: ColorId,
) -> u32 {
    let mut word = 0u32;
    word = set_bits(word, IS_DEFAULT_MASK, 0, is_default_flag as u32);
    word = set_bits(word, LANGUAGE_ID_MASK, LANGUAGE_ID_OFFSET, language_id_value as u32);
    word = set_bits(word, TOKEN_TYPE_MASK, TOKEN_TYPE_OFFSET, token_type_value as u32);
    word = set_bits(word, FONT_STYLE_MASK, FONT_STYLE_OFFSET, font_style_value.bits() as u32);
    word = set_bits(word, FOREGROUND_MASK, FOREGROUND_OFFSET, foreground_id);
    word = set_bits(word, BACKGROUND_MASK, BACKGROUND_OFFSET, background_id);
    word
}

/// Merges `incoming`'s set fields over `parent`'s packed word: any field `incoming` leaves unset
/// falls back to `parent`'s value for that field rather than to `old`. `old`'s `is_default` flag
/// is carried through unchanged -- merging metadata never flips whether a token is the
/// unclassified default.
///
/// This is the core inheritance step used both while building a trie node's resolved rule from
/// its parent node, and while folding a scope-stack match's winning candidate into its ancestor's
/// already-resolved metadata.
pub fn merge_metadata(old: u32, parent: &ScopeListElement, incoming: &ScopeMetadata) -> u32 {
    let parent = parent.metadata();
    let language_id_value = incoming.language_id.unwrap_or_else(|| language_id(parent));
    let token_type_value = incoming.token_type.unwrap_or_else(|| token_type(parent));
    let font_style_value = incoming.font_style.unwrap_or_else(|| font_style(parent));
    let foreground_id = incoming.foreground.unwrap_or_else(|| foreground(parent));
    let background_id = incoming.background.unwrap_or_else(|| background(parent));

    pack(
        is_default(old),
        language_id_value,
        token_type_value,
        font_style_value,
        foreground_id,
        background_id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_and_read_round_trips_every_field() {
        let word = pack(true, 200, 5, FontStyle::BOLD, 300, 150);
        assert!(is_default(word));
        assert_eq!(language_id(word), 200);
        assert_eq!(token_type(word), 5);
        assert_eq!(font_style(word), FontStyle::BOLD);
        assert_eq!(foreground(word), 300);
        assert_eq!(background(word), 150);
    }

    #[test]
    fn fields_do_not_bleed_into_neighboring_bits() {
        let word = pack(false, 0xFF, 0b111, FontStyle::empty(), MAX_FOREGROUND_ID, 0);
        assert!(!is_default(word));
        assert_eq!(language_id(word), 0xFF);
        assert_eq!(token_type(word), 0b111);
        assert_eq!(foreground(word), MAX_FOREGROUND_ID);
        assert_eq!(background(word), 0);
    }

    #[test]
    fn merge_unset_fields_fall_back_to_parent() {
        let parent = ScopeListElement::new(pack(false, 1, 2, FontStyle::ITALIC, 10, 20));
        let old = pack(true, 9, 9, FontStyle::BOLD, 99, 99);
        let incoming = ScopeMetadata {
            foreground: Some(42),
            ..Default::default()
        };
        let merged = merge_metadata(old, &parent, &incoming);
        assert!(is_default(merged), "is_default is carried from old, not parent");
        assert_eq!(language_id(merged), 1);
        assert_eq!(token_type(merged), 2);
        assert_eq!(font_style(merged), FontStyle::ITALIC);
        assert_eq!(foreground(merged), 42);
        assert_eq!(background(merged), 20);
    }

    #[test]
    fn merge_set_fields_override_parent() {
        let parent = ScopeListElement::new(pack(false, 1, 2, FontStyle::ITALIC, 10, 20));
        let old = pack(false, 0, 0, FontStyle::empty(), 0, 0);
        let incoming = ScopeMetadata {
            language_id: Some(7),
            token_type: Some(1),
            font_style: Some(FontStyle::BOLD),
            foreground: Some(11),
            background: Some(22),
        };
        let merged = merge_metadata(old, &parent, &incoming);
        assert_eq!(language_id(merged), 7);
        assert_eq!(token_type(merged), 1);
        assert_eq!(font_style(merged), FontStyle::BOLD);
        assert_eq!(foreground(merged), 11);
        assert_eq!(background(merged), 22);
    }

    #[test]
    fn max_ids_fit_without_truncation() {
        let word = pack(false, 0, 0, FontStyle::empty(), MAX_FOREGROUND_ID, MAX_BACKGROUND_ID);
        assert_eq!(foreground(word), MAX_FOREGROUND_ID);
        assert_eq!(background(word), MAX_BACKGROUND_ID);
    }
}
