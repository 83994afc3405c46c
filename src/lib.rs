//! Resolves TextMate-style theme documents into a scope trie and packs the winning attributes
//! for a token's scope (plus its enclosing scope stack) into a compact metadata word.
//!
//! # Example
//!
//! ```
//! use themetrie::{create_theme, themes::rule::RawTheme};
//!
//! let json = r#"{
//!     "colors": {"editor.foreground": "#F8F8F2", "editor.background": "#272822"},
//!     "tokenColors": [
//!         {"scope": "keyword.control", "settings": {"foreground": "#F92672", "fontStyle": "bold"}}
//!     ]
//! }"#;
//!
//! let raw: RawTheme = serde_json::from_str(json).unwrap();
//! let theme = create_theme(&raw);
//! let matches = theme.match_scope("keyword.control");
//! assert_eq!(theme.color(matches[0].foreground.unwrap()), Some("#F92672"));
//! ```

#![deny(missing_docs)]

mod error;
mod metadata;
mod ordering;
mod theme;
pub mod themes;
mod trie;

pub use error::Error;
pub use metadata::{ScopeListElement, ScopeMetadata, merge_metadata};
pub use ordering::{str_arr_cmp, strcmp};
pub use theme::{Theme, create_theme};
pub use themes::color::ColorId;
pub use themes::font_style::FontStyle;
pub use themes::rule::RawTheme;
pub use trie::{ThemeTrie, TrieNodeRule};
