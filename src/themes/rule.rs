use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, de};

use crate::themes::font_style::FontStyle;

/// Foreground/background color pair from a theme's top-level `colors` object.
///
/// Some themes key these as `editor.foreground`/`editor.background`, others as the bare
/// `foreground`/`background` -- both spellings are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditorColors {
    /// The editor's default foreground color, before canonicalization.
    pub foreground: Option<String>,
    /// The editor's default background color, before canonicalization.
    pub background: Option<String>,
}

impl<'de> Deserialize<'de> for EditorColors {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ColorsVisitor;

        impl<'de> Visitor<'de> for ColorsVisitor {
            type Value = EditorColors;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an object with foreground/background colors")
            }

            fn visit_map<V>(self, mut map: V) -> Result<EditorColors, V::Error>
            where
                V: MapAccess<'de>,
            {
                let mut foreground = None;
                let mut background = None;

                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "foreground" | "editor.foreground" if foreground.is_none() => {
                            foreground = Some(map.next_value()?);
                        }
                        "background" | "editor.background" if background.is_none() => {
                            background = Some(map.next_value()?);
                        }
                        _ => {
                            let _: de::IgnoredAny = map.next_value()?;
                        }
                    }
                }

                Ok(EditorColors { foreground, background })
            }
        }

        deserializer.deserialize_map(ColorsVisitor)
    }
}

/// The `settings` object of a single `tokenColors` entry.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TokenColorSettings {
    foreground: Option<String>,
    background: Option<String>,
    #[serde(rename = "fontStyle")]
    font_style: Option<String>,
}

impl TokenColorSettings {
    fn foreground(&self) -> Option<&str> {
        self.foreground.as_deref().filter(|s| *s != "inherit")
    }

    fn background(&self) -> Option<&str> {
        self.background.as_deref().filter(|s| *s != "inherit")
    }
}

fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct ScopeVisitor;

    impl<'de> Visitor<'de> for ScopeVisitor {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("string or array of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_owned()])
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(ScopeVisitor)
}

/// A single `tokenColors` entry from a raw theme document, prior to normalization.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TokenColorRule {
    /// The raw `scope` field: absent, a single string, or an array of strings.
    #[serde(deserialize_with = "deserialize_string_or_vec", default)]
    pub scope: Vec<String>,
    /// The entry's `settings` object.
    #[serde(default)]
    pub settings: TokenColorSettings,
}

/// A raw theme document, deserialized straight from VSCode-shaped theme JSON.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawTheme {
    /// The theme's display name, if present.
    #[serde(default)]
    pub name: Option<String>,
    /// The theme's top-level editor colors.
    #[serde(default)]
    pub colors: EditorColors,
    /// The theme's ordered list of token color rules.
    #[serde(rename = "tokenColors", default)]
    pub token_colors: Vec<TokenColorRule>,
}

/// A normalized theme rule with exactly one target selector (§4.1 `ParsedRule`).
///
/// `index` preserves source order: the implicit/explicit defaults entry always gets `0`;
/// subsequent rules get their 1-based ordinal in the flattened output.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedRule {
    /// The rule's target selector.
    pub scope: String,
    /// The rule's ordered ancestor selectors, if it was declared as a selector chain.
    pub parent_scopes: Option<Vec<String>>,
    /// The rule's original source ordinal.
    pub index: i32,
    /// The rule's font style, or `None` to inherit.
    pub font_style: Option<FontStyle>,
    /// The rule's foreground color string, or `None` to inherit.
    pub foreground: Option<String>,
    /// The rule's background color string, or `None` to inherit.
    pub background: Option<String>,
}

/// Splits a selector piece (already comma-split and trimmed) into its target scope and, if the
/// piece is a space-separated chain, its ordered parent scopes.
///
/// `"p1 p2 target"` yields `(target, Some([p1, p2]))`; a piece with no whitespace yields
/// `(piece, None)`. An entry that is only whitespace (and therefore empty once split) is
/// skipped by the caller rather than producing a rule with an empty target.
fn split_selector_chain(piece: &str) -> Option<(String, Option<Vec<String>>)> {
    let tokens: Vec<&str> = piece.split_whitespace().collect();
    let (target, parents) = tokens.split_last()?;
    if parents.is_empty() {
        Some(((*target).to_owned(), None))
    } else {
        Some((
            (*target).to_owned(),
            Some(parents.iter().map(|s| (*s).to_owned()).collect()),
        ))
    }
}

/// Parses a raw theme document into a flat, order-preserving sequence of [`ParsedRule`]s
/// (§4.1). Malformed selector pieces are skipped silently; malformed colors are carried through
/// untouched since the color interner canonicalizes what it can.
pub fn parse_rules(raw: &RawTheme) -> Vec<ParsedRule> {
    let mut rules = Vec::with_capacity(raw.token_colors.len() + 1);
    let mut next_index: i32 = 1;

    for entry in &raw.token_colors {
        let font_style = entry.settings.font_style.as_deref().map(FontStyle::from_theme_str);
        let foreground = entry.settings.foreground().map(str::to_owned);
        let background = entry.settings.background().map(str::to_owned);

        if entry.scope.is_empty() {
            if font_style.is_some() || foreground.is_some() || background.is_some() {
                rules.push(ParsedRule {
                    scope: String::new(),
                    parent_scopes: None,
                    index: 0,
                    font_style,
                    foreground,
                    background,
                });
            }
            continue;
        }

        for scope_field in &entry.scope {
            for piece in scope_field.split(',') {
                let piece = piece.trim();
                if piece.is_empty() {
                    continue;
                }
                let Some((scope, parent_scopes)) = split_selector_chain(piece) else {
                    continue;
                };
                rules.push(ParsedRule {
                    scope,
                    parent_scopes,
                    index: next_index,
                    font_style,
                    foreground: foreground.clone(),
                    background: background.clone(),
                });
                next_index += 1;
            }
        }
    }

    rules
}
