//! Language tables: grapheme rules, rewrite rules and their construction.

use std::cmp::Ordering;
use std::ops::Range;

use hashbrown::HashMap;
use smol_str::SmolStr;
use unicode_normalization::UnicodeNormalization;

use crate::error::{PatternError, TableError};
use crate::pattern::{FindPattern, Pattern};
use crate::matcher::fold_char;
use crate::postprocess::Cascade;
use crate::puncnorm;

/// One orthography-to-phoneme mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphemeRule {
    pattern: SmolStr,
    left: Option<Pattern>,
    right: Option<Pattern>,
    phoneme: SmolStr,
    order: usize,
}

impl GraphemeRule {
    /// Lowercased, NFC-normalized orthographic pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn left(&self) -> Option<&Pattern> {
        self.left.as_ref()
    }

    pub fn right(&self) -> Option<&Pattern> {
        self.right.as_ref()
    }

    /// Output for a match. Empty means the span is elided.
    pub fn phoneme(&self) -> &str {
        &self.phoneme
    }

    /// Declaration order within the table.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Pattern length in characters.
    pub fn width(&self) -> usize {
        self.pattern.chars().count()
    }

    /// Number of context constraints (0 to 2).
    pub fn specificity(&self) -> u8 {
        u8::from(self.left.is_some()) + u8::from(self.right.is_some())
    }

    /// Rule priority: longer patterns first, then more context constraints,
    /// then earlier declaration. `Less` means `self` wins.
    pub fn priority_cmp(&self, other: &GraphemeRule) -> Ordering {
        other
            .width()
            .cmp(&self.width())
            .then_with(|| other.specificity().cmp(&self.specificity()))
            .then_with(|| self.order.cmp(&other.order))
    }

    /// Whether both contexts hold, given the folded text before and after
    /// the span.
    pub fn context_holds(&self, before: &str, after: &str) -> bool {
        self.left.as_ref().is_none_or(|p| p.matches_before(before))
            && self.right.as_ref().is_none_or(|p| p.matches_after(after))
    }
}

/// Unit a rewrite rule applies to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Scope {
    /// Each whitespace-delimited word separately.
    #[default]
    Word,
    /// The whole phoneme string at once.
    Text,
}

/// Replacement side of a rewrite rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Replace {
    /// Substitute the whole match.
    Literal(SmolStr),
    /// Map each matched character through `from[i] -> to[i]`; other
    /// characters are kept.
    Translate { from: Vec<char>, to: Vec<char> },
}

impl Replace {
    pub fn literal(s: &str) -> Replace {
        Replace::Literal(SmolStr::new(s))
    }

    pub fn translate(from: &str, to: &str) -> Replace {
        Replace::Translate {
            from: from.chars().collect(),
            to: to.chars().collect(),
        }
    }

    pub(crate) fn map_char(&self, c: char) -> char {
        match self {
            Replace::Translate { from, to } => from
                .iter()
                .position(|&f| f == c)
                .and_then(|i| to.get(i).copied())
                .unwrap_or(c),
            Replace::Literal(_) => c,
        }
    }
}

/// Declaration of a rewrite rule, compiled by [`TableBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRuleSpec {
    find: SmolStr,
    replace: Replace,
    left: Option<SmolStr>,
    right: Option<SmolStr>,
    scope: Scope,
    group: Option<SmolStr>,
}

impl PostRuleSpec {
    pub fn new(find: &str, replace: Replace) -> Self {
        PostRuleSpec {
            find: SmolStr::new(find),
            replace,
            left: None,
            right: None,
            scope: Scope::Word,
            group: None,
        }
    }

    pub fn left(mut self, context: &str) -> Self {
        self.left = non_empty(context);
        self
    }

    pub fn right(mut self, context: &str) -> Self {
        self.right = non_empty(context);
        self
    }

    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Label used by [`Variant::Without`] to switch the rule off.
    pub fn group(mut self, group: &str) -> Self {
        self.group = Some(SmolStr::new(group));
        self
    }
}

/// A compiled rewrite rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRule {
    find: FindPattern,
    replace: Replace,
    left: Option<Pattern>,
    right: Option<Pattern>,
    scope: Scope,
    group: Option<SmolStr>,
    enabled: bool,
}

impl PostRule {
    pub fn find(&self) -> &FindPattern {
        &self.find
    }

    pub fn left(&self) -> Option<&Pattern> {
        self.left.as_ref()
    }

    pub fn right(&self) -> Option<&Pattern> {
        self.right.as_ref()
    }

    pub fn replace(&self) -> &Replace {
        &self.replace
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Byte range of the next non-empty match at or after `pos` with both
    /// contexts satisfied.
    pub(crate) fn next_match(&self, text: &str, pos: usize) -> Option<Range<usize>> {
        let mut from = pos;
        while let Some(range) = self.find.find_at(text, from) {
            let left = self.left.as_ref();
            if !range.is_empty() && left.is_none_or(|p| p.matches_before(&text[..range.start])) {
                return Some(range);
            }
            let step = text[range.start..].chars().next()?.len_utf8();
            from = range.start + step;
        }
        None
    }
}

/// Language variant, resolved into `PostRule::enabled` flags at build time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Variant {
    /// Every rewrite rule enabled.
    #[default]
    Default,
    /// No postprocessing at all.
    NoPostprocessing,
    /// Rules in the listed groups disabled.
    Without(Vec<SmolStr>),
}

impl Variant {
    fn enables(&self, group: Option<&str>) -> bool {
        match self {
            Variant::Default => true,
            Variant::NoPostprocessing => false,
            Variant::Without(groups) => group.is_none_or(|g| !groups.iter().any(|d| d == g)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct GraphemeSpec {
    pattern: SmolStr,
    phoneme: SmolStr,
    left: Option<SmolStr>,
    right: Option<SmolStr>,
}

/// Collects rule declarations and validates them into a [`LanguageTable`].
///
/// ```
/// use epitran_rs::{PostRuleSpec, Replace, TableBuilder, Variant};
///
/// let builder = TableBuilder::new()
///     .map("b", "b")
///     .map("e", "e")
///     .map("l", "l")
///     .post(PostRuleSpec::new("b", Replace::literal("p")).right("#").group("devoicing"));
/// let table = builder.build().unwrap();
/// assert_eq!(table.post_rules().len(), 1);
/// let np = builder.build_variant(&Variant::NoPostprocessing).unwrap();
/// assert!(!np.post_rules()[0].enabled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TableBuilder {
    graphemes: Vec<GraphemeSpec>,
    post: Vec<PostRuleSpec>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a context-free grapheme rule.
    pub fn map(self, pattern: &str, phoneme: &str) -> Self {
        self.map_in_context(pattern, phoneme, "", "")
    }

    /// Declares a grapheme rule that applies only between `left` and `right`.
    /// An empty context is unconstrained.
    pub fn map_in_context(mut self, pattern: &str, phoneme: &str, left: &str, right: &str) -> Self {
        self.graphemes.push(GraphemeSpec {
            pattern: SmolStr::new(pattern),
            phoneme: SmolStr::new(phoneme),
            left: non_empty(left),
            right: non_empty(right),
        });
        self
    }

    /// Appends a rewrite rule to the postprocessing cascade.
    pub fn post(mut self, rule: PostRuleSpec) -> Self {
        self.post.push(rule);
        self
    }

    pub fn build(&self) -> Result<LanguageTable, TableError> {
        self.build_variant(&Variant::Default)
    }

    pub fn build_variant(&self, variant: &Variant) -> Result<LanguageTable, TableError> {
        let mut graphemes = Vec::with_capacity(self.graphemes.len());
        let mut seen: HashMap<(SmolStr, Option<SmolStr>, Option<SmolStr>), usize> = HashMap::new();

        for (order, spec) in self.graphemes.iter().enumerate() {
            let pattern = nfc(&spec.pattern.chars().map(fold_char).collect::<Vec<_>>().concat());
            if pattern.is_empty() {
                return Err(TableError::EmptyPattern { order });
            }
            let key = (pattern.clone(), spec.left.clone(), spec.right.clone());
            if let Some(&first) = seen.get(&key) {
                return Err(TableError::DuplicateRule { order, first, pattern });
            }
            seen.insert(key, order);

            graphemes.push(GraphemeRule {
                pattern,
                // Contexts are matched against case-folded input.
                left: compile_opt(spec.left.as_deref(), true, Pattern::left)?,
                right: compile_opt(spec.right.as_deref(), true, Pattern::right)?,
                phoneme: nfc(&spec.phoneme),
                order,
            });
        }

        let mut post = Vec::with_capacity(self.post.len());
        for (index, spec) in self.post.iter().enumerate() {
            let find_source = nfc(&spec.find);
            let right_source = spec.right.as_deref().map(nfc);
            let right = compile_opt(spec.right.as_deref(), false, Pattern::right)?;
            let find = FindPattern::compile(&find_source, right_source.as_deref())
                .map_err(|error| TableError::Pattern {
                    pattern: spec.find.clone(),
                    error,
                })?;
            if find.is_nullable() {
                return Err(TableError::EmptyFind {
                    index,
                    pattern: spec.find.clone(),
                });
            }
            if let Replace::Translate { from, to } = &spec.replace {
                if from.len() != to.len() {
                    return Err(TableError::TranslateLength {
                        index,
                        from: from.len(),
                        to: to.len(),
                    });
                }
            }
            post.push(PostRule {
                find,
                replace: spec.replace.clone(),
                left: compile_opt(spec.left.as_deref(), false, Pattern::left)?,
                right,
                scope: spec.scope,
                group: spec.group.clone(),
                enabled: variant.enables(spec.group.as_deref()),
            });
        }

        Ok(LanguageTable::new(graphemes, post))
    }
}

fn non_empty(s: &str) -> Option<SmolStr> {
    (!s.is_empty()).then(|| SmolStr::new(s))
}

fn nfc(s: &str) -> SmolStr {
    s.nfc().collect::<String>().into()
}

fn compile_opt(
    source: Option<&str>,
    case_insensitive: bool,
    compile: fn(&str, bool) -> Result<Pattern, PatternError>,
) -> Result<Option<Pattern>, TableError> {
    source
        .map(|source| {
            compile(&nfc(source), case_insensitive).map_err(|error| TableError::Pattern {
                pattern: SmolStr::new(source),
                error,
            })
        })
        .transpose()
}

/// An immutable per-language rule set.
///
/// Grapheme rules are indexed by pattern twice: verbatim, and with
/// punctuation variants canonicalized, so that a rule written with either
/// apostrophe form is found when normalization is on. Each index bucket is
/// sorted by [`GraphemeRule::priority_cmp`].
#[derive(Debug, Clone)]
pub struct LanguageTable {
    graphemes: Vec<GraphemeRule>,
    post: Vec<PostRule>,
    index: HashMap<SmolStr, Vec<usize>>,
    normalized_index: HashMap<SmolStr, Vec<usize>>,
    max_pattern_len: usize,
    window: usize,
}

impl LanguageTable {
    pub fn builder() -> TableBuilder {
        TableBuilder::new()
    }

    fn new(graphemes: Vec<GraphemeRule>, post: Vec<PostRule>) -> LanguageTable {
        let mut index: HashMap<SmolStr, Vec<usize>> = HashMap::new();
        let mut normalized_index: HashMap<SmolStr, Vec<usize>> = HashMap::new();
        for (i, rule) in graphemes.iter().enumerate() {
            index.entry(rule.pattern.clone()).or_default().push(i);
            let normalized: SmolStr = puncnorm::normalize(&rule.pattern).as_ref().into();
            normalized_index.entry(normalized).or_default().push(i);
        }
        for bucket in index.values_mut().chain(normalized_index.values_mut()) {
            bucket.sort_by(|&a, &b| graphemes[a].priority_cmp(&graphemes[b]));
        }

        let max_pattern_len = graphemes.iter().map(GraphemeRule::width).max().unwrap_or(0);
        // Decomposed input needs a wider window to reach composed patterns.
        let window = graphemes
            .iter()
            .map(|r| r.pattern.nfd().count())
            .max()
            .unwrap_or(0);

        log::debug!(
            "built language table: {} grapheme rules, {} rewrite rules ({} enabled), window {}",
            graphemes.len(),
            post.len(),
            post.iter().filter(|r| r.enabled).count(),
            window
        );

        LanguageTable {
            graphemes,
            post,
            index,
            normalized_index,
            max_pattern_len,
            window,
        }
    }

    pub fn grapheme_rules(&self) -> &[GraphemeRule] {
        &self.graphemes
    }

    pub fn post_rules(&self) -> &[PostRule] {
        &self.post
    }

    /// Longest grapheme pattern, in characters.
    pub fn max_pattern_len(&self) -> usize {
        self.max_pattern_len
    }

    /// Lookahead bound for the segmenter, in input characters.
    pub(crate) fn window(&self) -> usize {
        self.window
    }

    /// Rules whose pattern equals `key`, best first.
    pub fn candidates<'t>(
        &'t self,
        key: &str,
        normalized: bool,
    ) -> impl Iterator<Item = &'t GraphemeRule> + use<'t> {
        let index = if normalized { &self.normalized_index } else { &self.index };
        index
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(move |&i| &self.graphemes[i])
    }

    /// The enabled rewrite rules, in declared order.
    pub fn cascade(&self) -> Cascade<'_> {
        Cascade::new(self.post.iter().filter(|r| r.enabled).collect())
    }
}
