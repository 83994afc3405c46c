use std::cmp::Ordering;

use crate::themes::rule::ParsedRule;

/// Lexicographic string comparison where the empty string sorts before every non-empty string.
///
/// This is the same ordering `str`'s `Ord` impl already gives, spelled out as its own function
/// because it participates in the sort key below alongside [`str_arr_cmp`], which isn't a
/// built-in ordering at all.
pub fn strcmp(a: &str, b: &str) -> Ordering {
    a.cmp(b)
}

/// Total order over optional string sequences: `None < Some([])`, and among `Some` sequences,
/// shorter is not automatically smaller -- comparison is element-wise, and only once every
/// compared element is equal does the shorter sequence win.
///
/// | `a`                  | `b`                  | ordering |
/// |----------------------|----------------------|----------|
/// | `None`               | `None`               | `Equal`  |
/// | `None`               | `Some([])`           | `Less`   |
/// | `Some([])`           | `None`               | `Greater`|
/// | `Some([])`           | `Some([])`           | `Equal`  |
/// | `Some([])`           | `Some(["a"])`        | `Less`   |
/// | `Some(["a"])`        | `Some([])`           | `Greater`|
/// | `Some(["a"])`        | `Some(["a"])`        | `Equal`  |
/// | `Some(["a"])`        | `Some(["b"])`        | `Less`   |
/// | `Some(["b"])`        | `Some(["a"])`        | `Greater`|
/// | `Some(["a"])`        | `Some(["a", "b"])`   | `Less`   |
/// | `Some(["a", "b"])`   | `Some(["a"])`        | `Greater`|
/// | `Some(["a", "c"])`   | `Some(["a", "b"])`   | `Greater`|
/// | `Some(["a", "b"])`   | `Some(["a", "c"])`   | `Less`   |
/// | `Some(["a", "b", "c"])` | `Some(["a", "b"])` | `Greater`|
pub fn str_arr_cmp(a: Option<&[String]>, b: Option<&[String]>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => {
            for (x, y) in a.iter().zip(b.iter()) {
                let cmp = strcmp(x, y);
                if cmp != Ordering::Equal {
                    return cmp;
                }
            }
            a.len().cmp(&b.len())
        }
    }
}

/// The stable sort key for trie insertion (§4.1): font style, then foreground, then background,
/// then scope (`strcmp`), then parent scopes (`str_arr_cmp`), then source index.
///
/// `None` sorts before `Some` in every field here, matching the convention that an unset field
/// is "smaller" than any concrete value -- callers must use a stable sort so that rules that tie
/// on every key retain their original relative order.
pub fn parsed_rule_cmp(a: &ParsedRule, b: &ParsedRule) -> Ordering {
    a.font_style
        .cmp(&b.font_style)
        .then_with(|| a.foreground.cmp(&b.foreground))
        .then_with(|| a.background.cmp(&b.background))
        .then_with(|| strcmp(&a.scope, &b.scope))
        .then_with(|| str_arr_cmp(a.parent_scopes.as_deref(), b.parent_scopes.as_deref()))
        .then_with(|| a.index.cmp(&b.index))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn str_arr_cmp_table() {
        assert_eq!(str_arr_cmp(None, None), Ordering::Equal);
        assert_eq!(str_arr_cmp(None, Some(&v(&[]))), Ordering::Less);
        assert_eq!(str_arr_cmp(Some(&v(&[])), None), Ordering::Greater);
        assert_eq!(str_arr_cmp(Some(&v(&[])), Some(&v(&[]))), Ordering::Equal);
        assert_eq!(str_arr_cmp(Some(&v(&[])), Some(&v(&["a"]))), Ordering::Less);
        assert_eq!(str_arr_cmp(Some(&v(&["a"])), Some(&v(&[]))), Ordering::Greater);
        assert_eq!(str_arr_cmp(Some(&v(&["a"])), Some(&v(&["a"]))), Ordering::Equal);
        assert_eq!(str_arr_cmp(Some(&v(&["a"])), Some(&v(&["b"]))), Ordering::Less);
        assert_eq!(str_arr_cmp(Some(&v(&["b"])), Some(&v(&["a"]))), Ordering::Greater);
        assert_eq!(str_arr_cmp(Some(&v(&["a"])), Some(&v(&["a", "b"]))), Ordering::Less);
        assert_eq!(str_arr_cmp(Some(&v(&["a", "b"])), Some(&v(&["a"]))), Ordering::Greater);
        assert_eq!(str_arr_cmp(Some(&v(&["a", "c"])), Some(&v(&["a", "b"]))), Ordering::Greater);
        assert_eq!(str_arr_cmp(Some(&v(&["a", "b"])), Some(&v(&["a", "c"]))), Ordering::Less);
        assert_eq!(
            str_arr_cmp(Some(&v(&["a", "b", "c"])), Some(&v(&["a", "b"]))),
            Ordering::Greater
        );
    }

    #[test]
    fn strcmp_empty_sorts_first() {
        assert_eq!(strcmp("", "a"), Ordering::Less);
        assert_eq!(strcmp("a", ""), Ordering::Greater);
        assert_eq!(strcmp("", ""), Ordering::Equal);
    }

    #[test]
    fn parsed_rule_cmp_is_stable_on_ties() {
        let mut rules = vec![
            ParsedRule { index: 2, ..Default::default() },
            ParsedRule { index: 1, ..Default::default() },
        ];
        rules.sort_by(parsed_rule_cmp);
        assert_eq!(rules[0].index, 1);
        assert_eq!(rules[1].index, 2);
    }

    #[test]
    fn parsed_rule_cmp_orders_by_font_style_then_colors_then_scope() {
        use crate::themes::font_style::FontStyle;

        let a = ParsedRule {
            font_style: None,
            scope: "z".to_string(),
            index: 1,
            ..Default::default()
        };
        let b = ParsedRule {
            font_style: Some(FontStyle::BOLD),
            scope: "a".to_string(),
            index: 2,
            ..Default::default()
        };
        assert_eq!(parsed_rule_cmp(&a, &b), Ordering::Less);
    }
}
