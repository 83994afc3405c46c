//! The scope trie (§4.4): inheritance-aware indexing of theme rules by dotted scope segment.

use std::collections::HashMap;

#[cfg(feature = "debug")]
use log::trace;

use crate::ordering::str_arr_cmp;
use crate::themes::color::ColorId;
use crate::themes::font_style::FontStyle;

/// The resolved style attributes at a point in the trie: either a node's main rule, or one of
/// its parent-scopes-qualified rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrieNodeRule {
    /// Number of dot-separated segments in the scope that declared this rule (0 for the root
    /// defaults rule).
    pub scope_depth: i32,
    /// The ancestor selectors this rule is qualified by, or `None` for a node's main rule.
    pub parent_scopes: Option<Vec<String>>,
    /// Resolved font style, or `None` if inherited and never set by any ancestor.
    pub font_style: Option<FontStyle>,
    /// Resolved foreground color id, or `None` if inherited and never set by any ancestor.
    pub foreground: Option<ColorId>,
    /// Resolved background color id, or `None` if inherited and never set by any ancestor.
    pub background: Option<ColorId>,
}

/// A single node of the [`ThemeTrie`], keyed from its parent by one dotted scope segment.
#[derive(Debug, Clone, Default)]
struct TrieNode {
    main_rule: TrieNodeRule,
    qualified_rules: Vec<TrieNodeRule>,
    children: HashMap<String, TrieNode>,
}

/// An immutable tree indexing theme rules by scope segment, built once and queried many times.
#[derive(Debug, Clone)]
pub struct ThemeTrie {
    root: TrieNode,
}

fn sort_qualified_rules(rules: &mut [TrieNodeRule]) {
    rules.sort_by(|a, b| {
        b.scope_depth
            .cmp(&a.scope_depth)
            .then_with(|| str_arr_cmp(b.parent_scopes.as_deref(), a.parent_scopes.as_deref()))
    });
}

fn split_scope(scope: &str) -> Vec<String> {
    if scope.is_empty() {
        Vec::new()
    } else {
        scope.split('.').map(str::to_owned).collect()
    }
}

/// Creates a child node for `segment` if absent, seeding it with a snapshot of `node`'s current
/// main rule and qualified-rule list (inheritance at creation time, §4.4 step 4).
fn descend_create<'a>(node: &'a mut TrieNode, segments: &[String]) -> &'a mut TrieNode {
    if segments.is_empty() {
        return node;
    }
    let parent_main_rule = node.main_rule.clone();
    let parent_qualified = node.qualified_rules.clone();
    let head = segments[0].clone();
    let child = node.children.entry(head).or_insert_with(|| TrieNode {
        main_rule: parent_main_rule,
        qualified_rules: parent_qualified,
        children: HashMap::new(),
    });
    descend_create(child, &segments[1..])
}

/// Pushes `node`'s just-merged main rule fields down into descendants that had not diverged from
/// `old`'s corresponding field, so a descendant created before the merge still reports the depth
/// (and style/colors) of whichever rule actually produced its current value.
fn propagate_main(node: &mut TrieNode, old: &TrieNodeRule) {
    let new_scope_depth = node.main_rule.scope_depth;
    let new_font_style = node.main_rule.font_style;
    let new_foreground = node.main_rule.foreground;
    let new_background = node.main_rule.background;
    for child in node.children.values_mut() {
        let child_old = child.main_rule.clone();
        if child.main_rule.scope_depth == old.scope_depth {
            child.main_rule.scope_depth = new_scope_depth;
        }
        if child.main_rule.font_style == old.font_style {
            child.main_rule.font_style = new_font_style;
        }
        if child.main_rule.foreground == old.foreground {
            child.main_rule.foreground = new_foreground;
        }
        if child.main_rule.background == old.background {
            child.main_rule.background = new_background;
        }
        propagate_main(child, &child_old);
    }
}

/// Merges a rule with `parent_scopes == None` into `node`'s main rule, then propagates the
/// change into every already-existing descendant whose corresponding field had not diverged.
fn merge_main_rule(
    node: &mut TrieNode,
    depth: i32,
    font_style: Option<FontStyle>,
    foreground: Option<ColorId>,
    background: Option<ColorId>,
) {
    let old = node.main_rule.clone();
    node.main_rule.scope_depth = node.main_rule.scope_depth.max(depth);
    if let Some(fs) = font_style {
        node.main_rule.font_style = Some(fs);
    }
    if let Some(fg) = foreground {
        node.main_rule.foreground = Some(fg);
    }
    if let Some(bg) = background {
        node.main_rule.background = Some(bg);
    }
    propagate_main(node, &old);
}

fn upsert_single_qualified(
    node: &mut TrieNode,
    depth: i32,
    parents: &[String],
    font_style: Option<FontStyle>,
    foreground: Option<ColorId>,
    background: Option<ColorId>,
) {
    if let Some(existing) = node
        .qualified_rules
        .iter_mut()
        .find(|r| r.parent_scopes.as_deref() == Some(parents))
    {
        existing.scope_depth = existing.scope_depth.max(depth);
        if let Some(fs) = font_style {
            existing.font_style = Some(fs);
        }
        if let Some(fg) = foreground {
            existing.foreground = Some(fg);
        }
        if let Some(bg) = background {
            existing.background = Some(bg);
        }
    } else {
        node.qualified_rules.push(TrieNodeRule {
            scope_depth: depth,
            parent_scopes: Some(parents.to_vec()),
            font_style: font_style.or(node.main_rule.font_style),
            foreground: foreground.or(node.main_rule.foreground),
            background: background.or(node.main_rule.background),
        });
    }
    sort_qualified_rules(&mut node.qualified_rules);
}

/// Inserts a rule with `parent_scopes == Some(...)` into `node`'s qualified list, then
/// propagates the same insertion into every existing descendant (§4.4 step 4, second bullet) so
/// that a token matched at any depth at or below the declaring node can still find it.
fn insert_qualified_rule(
    node: &mut TrieNode,
    depth: i32,
    parents: &[String],
    font_style: Option<FontStyle>,
    foreground: Option<ColorId>,
    background: Option<ColorId>,
) {
    upsert_single_qualified(node, depth, parents, font_style, foreground, background);
    for child in node.children.values_mut() {
        insert_qualified_rule(child, depth, parents, font_style, foreground, background);
    }
}

struct TrieBuilder {
    root: TrieNode,
}

impl TrieBuilder {
    /// The trie root starts from the not-set rule, not the theme's defaults -- the defaults
    /// rule (§3 `Theme`) is a separate value the caller consults once a query bottoms out, per
    /// the S5 "no match" scenario returning the not-set sentinel rather than the defaults.
    fn new() -> Self {
        TrieBuilder { root: TrieNode::default() }
    }

    fn insert(
        &mut self,
        scope: &str,
        parent_scopes: Option<&[String]>,
        font_style: Option<FontStyle>,
        foreground: Option<ColorId>,
        background: Option<ColorId>,
    ) {
        let segments = split_scope(scope);
        let depth = segments.len() as i32;
        let target = descend_create(&mut self.root, &segments);
        match parent_scopes {
            None => {
                #[cfg(feature = "debug")]
                trace!("merging main rule at '{}' (depth {})", scope, depth);
                merge_main_rule(target, depth, font_style, foreground, background);
            }
            Some(parents) => {
                #[cfg(feature = "debug")]
                trace!("inserting qualified rule at '{}' (depth {}, parents {:?})", scope, depth, parents);
                insert_qualified_rule(target, depth, parents, font_style, foreground, background);
            }
        }
    }
}

/// Builds the trie from rules already sorted per §4.3.
pub fn build(rules: &[(String, Option<Vec<String>>, Option<FontStyle>, Option<ColorId>, Option<ColorId>)]) -> ThemeTrie {
    let mut builder = TrieBuilder::new();
    for (scope, parent_scopes, font_style, foreground, background) in rules {
        builder.insert(scope, parent_scopes.as_deref(), *font_style, *foreground, *background);
    }
    ThemeTrie { root: builder.root }
}

fn not_set_rule() -> TrieNodeRule {
    TrieNodeRule { scope_depth: 0, parent_scopes: None, font_style: None, foreground: None, background: None }
}

impl ThemeTrie {
    /// Single-scope match (§4.5): walks to the deepest reachable node for `scope` and returns
    /// all candidates there (main rule plus qualified rules), ranked most-specific first.
    pub fn match_scope(&self, scope: &str) -> Vec<TrieNodeRule> {
        let segments = split_scope(scope);
        let mut node = &self.root;
        let mut progressed = false;
        for segment in &segments {
            match node.children.get(segment) {
                Some(child) => {
                    node = child;
                    progressed = true;
                }
                None => break,
            }
        }

        if !progressed {
            return vec![not_set_rule()];
        }

        let mut candidates = node.qualified_rules.clone();
        candidates.push(node.main_rule.clone());
        candidates.sort_by(|a, b| {
            b.scope_depth
                .cmp(&a.scope_depth)
                .then_with(|| str_arr_cmp(b.parent_scopes.as_deref(), a.parent_scopes.as_deref()))
        });
        candidates
    }

    /// Scope-stack match (§4.5): retains only candidates whose `parent_scopes`, if any, form an
    /// in-order, prefix-matched subsequence of `scope_stack`, and returns the first survivor.
    pub fn match_with_stack(&self, scope: &str, scope_stack: &[String]) -> Option<TrieNodeRule> {
        self.match_scope(scope)
            .into_iter()
            .find(|candidate| match &candidate.parent_scopes {
                None => true,
                Some(parents) => is_ordered_prefix_subsequence(parents, scope_stack),
            })
    }
}

fn is_segment_prefix(prefix: &str, scope: &str) -> bool {
    let mut prefix_segs = prefix.split('.');
    let mut scope_segs = scope.split('.');
    loop {
        match (prefix_segs.next(), scope_segs.next()) {
            (Some(p), Some(s)) => {
                if p != s {
                    return false;
                }
            }
            (Some(_), None) => return false,
            (None, _) => return true,
        }
    }
}

fn is_ordered_prefix_subsequence(parents: &[String], ancestors: &[String]) -> bool {
    let mut ancestor_idx = 0;
    for parent in parents {
        let mut found = false;
        while ancestor_idx < ancestors.len() {
            let is_match = is_segment_prefix(parent, &ancestors[ancestor_idx]);
            ancestor_idx += 1;
            if is_match {
                found = true;
                break;
            }
        }
        if !found {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(scope: &str, parents: Option<&[&str]>, fg: Option<ColorId>) -> (String, Option<Vec<String>>, Option<FontStyle>, Option<ColorId>, Option<ColorId>) {
        (scope.to_string(), parents.map(|p| p.iter().map(|s| s.to_string()).collect()), None, fg, None)
    }

    fn styled_rule(
        scope: &str,
        font_style: Option<FontStyle>,
        fg: Option<ColorId>,
    ) -> (String, Option<Vec<String>>, Option<FontStyle>, Option<ColorId>, Option<ColorId>) {
        (scope.to_string(), None, font_style, fg, None)
    }

    #[test]
    fn s1_deeper_match_priority() {
        let rules = vec![
            rule("punctuation.definition.string.begin.html", None, Some(300)),
            rule("punctuation.definition.string", Some(&["meta.tag"]), Some(400)),
        ];
        let trie = build(&rules);
        let matches = trie.match_scope("punctuation.definition.string.begin.html");
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].scope_depth, 5);
        assert_eq!(matches[0].parent_scopes, None);
        assert_eq!(matches[0].foreground, Some(300));
        assert_eq!(matches[1].scope_depth, 3);
        assert_eq!(matches[1].parent_scopes, Some(vec!["meta.tag".to_string()]));
        assert_eq!(matches[1].foreground, Some(400));
    }

    #[test]
    fn s2_parent_match_priority() {
        let rules = vec![
            rule("a", Some(&["c"]), Some(300)),
            rule("a.b", Some(&["d"]), Some(400)),
            rule("a", None, Some(500)),
        ];
        let trie = build(&rules);
        let matches = trie.match_scope("a.b");
        assert_eq!(matches.len(), 3);
        assert_eq!((matches[0].scope_depth, &matches[0].parent_scopes, matches[0].foreground), (2, &Some(vec!["d".to_string()]), Some(400)));
        assert_eq!((matches[1].scope_depth, &matches[1].parent_scopes, matches[1].foreground), (1, &Some(vec!["c".to_string()]), Some(300)));
        assert_eq!((matches[2].scope_depth, &matches[2].parent_scopes, matches[2].foreground), (1, &None, Some(500)));
    }

    #[test]
    fn s3_stack_aware_merge() {
        let rules = vec![
            rule("entity", Some(&["meta.tag"]), Some(300)),
            rule("entity.name.tag", Some(&["meta.selector.css"]), Some(400)),
            rule("entity", None, Some(500)),
        ];
        let trie = build(&rules);
        let stack = vec!["text.html.cshtml".to_string(), "meta.tag.structure.any.html".to_string()];
        let winner = trie.match_with_stack("entity.name.tag.structure.any.html", &stack).unwrap();
        assert_eq!(winner.foreground, Some(300));
    }

    #[test]
    fn s4_inheritance() {
        let rules = vec![
            styled_rule("var", Some(FontStyle::BOLD), Some(700)),
            styled_rule("var.identifier", None, Some(600)),
        ];
        let trie = build(&rules);
        let matches = trie.match_scope("var.identifier");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].font_style, Some(FontStyle::BOLD));
        assert_eq!(matches[0].foreground, Some(600));
        assert_eq!(matches[0].background, None);
    }

    #[test]
    fn s5_no_match_yields_sentinel() {
        let rules = vec![rule("source", None, Some(900))];
        let trie = build(&rules);
        let matches = trie.match_scope("bazz");
        assert_eq!(matches, vec![not_set_rule()]);
    }

    #[test]
    fn empty_scope_query_is_no_progress() {
        let rules = vec![rule("source", None, Some(900))];
        let trie = build(&rules);
        assert_eq!(trie.match_scope(""), vec![not_set_rule()]);
    }

    #[test]
    fn prefix_subsequence_requires_in_order_segment_prefixes() {
        let ancestors = vec!["meta.tag.structure".to_string(), "entity.other".to_string()];
        assert!(is_ordered_prefix_subsequence(&["meta.tag".to_string()], &ancestors));
        assert!(!is_ordered_prefix_subsequence(&["entity.other".to_string(), "meta.tag".to_string()], &ancestors));
        assert!(!is_ordered_prefix_subsequence(&["not.present".to_string()], &ancestors));
    }
}
