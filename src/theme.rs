//! Theme assembly: wires the rule parser, color interner, and trie builder into the single
//! `create_theme` entry point and the `Theme` value it produces (§6).

use std::fs::File;
use std::io::Read;
use std::path::Path;

#[cfg(feature = "debug")]
use log::debug;

use crate::error::{Error, ThemeResult};
use crate::ordering::parsed_rule_cmp;
use crate::themes::color::ColorMap;
use crate::themes::font_style::FontStyle;
use crate::themes::rule::{self, ParsedRule, RawTheme};
use crate::trie::{self, ThemeTrie, TrieNodeRule};

/// Default foreground used when neither a raw theme's `colors` block nor its scopeless
/// `tokenColors` entry provides one.
const DEFAULT_FOREGROUND: &str = "#000000";
/// Default background used when neither a raw theme's `colors` block nor its scopeless
/// `tokenColors` entry provides one.
const DEFAULT_BACKGROUND: &str = "#FFFFFF";

/// An immutable, queryable theme: a color map, a defaults rule, and the scope trie built from
/// every other rule in the source document (§3 `Theme`).
#[derive(Debug, Clone)]
pub struct Theme {
    color_map: ColorMap,
    defaults: TrieNodeRule,
    trie: ThemeTrie,
}

impl Theme {
    /// Returns the ranked candidate rules for `scope` (§4.5 single-scope match).
    pub fn match_scope(&self, scope: &str) -> Vec<TrieNodeRule> {
        self.trie.match_scope(scope)
    }

    /// Returns the winning rule for `scope` given its enclosing `scope_stack` (§4.5 scope-stack
    /// match), or `None` if nothing survives the parent-scope filter (never observed in
    /// practice, since every node's main rule has `parent_scopes = None` and therefore always
    /// survives -- kept as `Option` to match the external interface in §6).
    pub fn match_with_stack(&self, scope: &str, scope_stack: &[String]) -> Option<TrieNodeRule> {
        self.trie.match_with_stack(scope, scope_stack)
    }

    /// All canonicalized color strings ever interned for this theme, indexed by id; index 0 is
    /// unused padding.
    pub fn color_map(&self) -> &[String] {
        self.color_map.colors()
    }

    /// Resolves a previously-returned color id back to its canonicalized string.
    pub fn color(&self, id: crate::themes::color::ColorId) -> Option<&str> {
        self.color_map.get_color(id)
    }

    /// The theme's defaults rule: concrete foreground, background, and font style used when no
    /// more specific rule applies.
    pub fn defaults(&self) -> &TrieNodeRule {
        &self.defaults
    }
}

fn fold_defaults(defaults: &mut TrieNodeRule, rule: &ParsedRule, color_map: &mut ColorMap) {
    if let Some(fs) = rule.font_style {
        defaults.font_style = Some(fs);
    }
    if let Some(fg) = &rule.foreground {
        defaults.foreground = Some(color_map.get_id(fg));
    }
    if let Some(bg) = &rule.background {
        defaults.background = Some(color_map.get_id(bg));
    }
}

/// Builds an immutable [`Theme`] from a [`RawTheme`] document (§6 `create_theme`).
pub fn create_theme(raw: &RawTheme) -> Theme {
    let mut color_map = ColorMap::new();

    let initial_foreground = raw.colors.foreground.as_deref().unwrap_or(DEFAULT_FOREGROUND);
    let initial_background = raw.colors.background.as_deref().unwrap_or(DEFAULT_BACKGROUND);

    let mut defaults = TrieNodeRule {
        scope_depth: 0,
        parent_scopes: None,
        font_style: Some(FontStyle::empty()),
        foreground: Some(color_map.get_id(initial_foreground)),
        background: Some(color_map.get_id(initial_background)),
    };

    let parsed_rules = rule::parse_rules(raw);
    let (default_rules, mut scoped_rules): (Vec<ParsedRule>, Vec<ParsedRule>) =
        parsed_rules.into_iter().partition(|r| r.scope.is_empty());

    for rule in &default_rules {
        fold_defaults(&mut defaults, rule, &mut color_map);
    }

    scoped_rules.sort_by(parsed_rule_cmp);

    #[cfg(feature = "debug")]
    debug!("building theme trie from {} scoped rules", scoped_rules.len());

    let entries: Vec<_> = scoped_rules
        .iter()
        .map(|rule| {
            let foreground = rule.foreground.as_deref().map(|c| color_map.get_id(c));
            let background = rule.background.as_deref().map(|c| color_map.get_id(c));
            (rule.scope.clone(), rule.parent_scopes.clone(), rule.font_style, foreground, background)
        })
        .collect();

    let trie = trie::build(&entries);

    Theme { color_map, defaults, trie }
}

impl RawTheme {
    /// Loads and deserializes a raw theme document from a JSON file (§6 `load_from_file`).
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ThemeResult<RawTheme> {
        let file = File::open(path)?;
        RawTheme::from_reader(file)
    }

    /// Deserializes a raw theme document from any JSON reader (§6 `from_reader`).
    pub fn from_reader<R: Read>(mut reader: R) -> ThemeResult<RawTheme> {
        let mut contents = String::new();
        reader.read_to_string(&mut contents).map_err(Error::from)?;
        serde_json::from_str(&contents).map_err(Error::from)
    }
}
