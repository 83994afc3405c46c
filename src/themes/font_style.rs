use serde::{Deserialize, Serialize};

/// A compressed bitset of TextMate font styles: italic, bold, underline.
///
/// Unlike most bitset wrappers in this codebase's lineage, `FontStyle` has no "not set" variant
/// of its own -- the spec's `NotSet` sentinel is represented at the Rust boundary as
/// `Option<FontStyle>`, with `None` meaning "inherit from an ancestor" and `Some(FontStyle::empty())`
/// meaning the explicit, concrete style "no styles at all".
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Debug)]
pub struct FontStyle {
    bits: u8,
}

impl FontStyle {
    /// Italic bit.
    pub const ITALIC: Self = Self { bits: 1 };
    /// Bold bit.
    pub const BOLD: Self = Self { bits: 2 };
    /// Underline bit.
    pub const UNDERLINE: Self = Self { bits: 4 };

    /// The empty style: no italic, bold, or underline.
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    /// Whether this font style has no bits set.
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Whether this font style contains every bit of `other`.
    pub const fn contains(&self, other: Self) -> bool {
        (self.bits & other.bits) == other.bits
    }

    pub(crate) fn insert(&mut self, other: Self) {
        self.bits |= other.bits;
    }

    /// Packs this style into the 3-bit `font_style` slot of the metadata word.
    pub(crate) const fn bits(&self) -> u8 {
        self.bits
    }

    /// Reconstructs a `FontStyle` from a 3-bit field.
    pub(crate) const fn from_bits(bits: u8) -> Self {
        Self { bits: bits & 0b111 }
    }

    /// Parses a theme's `fontStyle` string per the spec's grammar: whitespace-separated tokens
    /// drawn from `{italic, bold, underline}`. An empty string, or the absence of the key
    /// entirely (represented by the caller as `None` before reaching this function), means
    /// `None`/empty. Any unrecognized token resets the *entire* result to empty, matching the
    /// distilled spec's stated (and explicitly confirmed) behavior.
    pub fn from_theme_str(font_style_str: &str) -> Self {
        let mut style = Self::empty();
        for token in font_style_str.split_whitespace() {
            match token {
                "italic" => style.insert(FontStyle::ITALIC),
                "bold" => style.insert(FontStyle::BOLD),
                "underline" => style.insert(FontStyle::UNDERLINE),
                _ => return Self::empty(),
            }
        }
        style
    }
}
