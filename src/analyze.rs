use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};

/// A deterministic, total text transform. Normalizers run as an ordered
/// chain over the raw input before tokenization.
#[derive(Debug, Clone)]
pub enum Normalizer {
    /// NFKD-decompose and drop combining marks ("café" -> "cafe").
    Unaccent,
    /// Unicode lowercasing.
    Lowercase,
    /// Insert a space at every letter<->digit boundary so alphanumeric runs
    /// split into separate tokens ("abc123" -> "abc 123").
    SpaceBetweenDigits,
    /// Replace every occurrence of `pattern` with `with`.
    Replace { pattern: String, with: String },
    /// Keep only letters, digits and whitespace, collapsing whitespace runs
    /// to single spaces. Removed characters leave no gap ("cat.txt" ->
    /// "cattxt").
    RemoveNonAlphanumeric,
    /// Strip leading and trailing whitespace.
    Trim,
}

impl Normalizer {
    pub fn apply(&self, text: &str) -> String {
        match self {
            Normalizer::Unaccent => text.nfkd().filter(|c| !is_combining_mark(*c)).collect(),
            Normalizer::Lowercase => text.to_lowercase(),
            Normalizer::SpaceBetweenDigits => space_between_digits(text),
            Normalizer::Replace { pattern, with } => text.replace(pattern.as_str(), with),
            Normalizer::RemoveNonAlphanumeric => remove_non_alphanumeric(text),
            Normalizer::Trim => text.trim().to_string(),
        }
    }
}

fn space_between_digits(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 4);
    let mut prev: Option<char> = None;
    for c in text.chars() {
        if let Some(p) = prev {
            if (p.is_alphabetic() && c.is_numeric()) || (p.is_numeric() && c.is_alphabetic()) {
                out.push(' ');
            }
        }
        out.push(c);
        prev = Some(c);
    }
    out
}

fn remove_non_alphanumeric(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            pending_space = !out.is_empty();
        } else if c.is_alphanumeric() {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            out.push(c);
        }
    }
    out
}

/// The default normalizer chain: unaccent, lowercase, split digit runs,
/// replace `#` with a space, keep only alphanumerics and spaces, trim.
pub fn default_normalizers() -> Vec<Normalizer> {
    vec![
        Normalizer::Unaccent,
        Normalizer::Lowercase,
        Normalizer::SpaceBetweenDigits,
        Normalizer::Replace {
            pattern: "#".to_string(),
            with: " ".to_string(),
        },
        Normalizer::RemoveNonAlphanumeric,
        Normalizer::Trim,
    ]
}

/// Run a normalizer chain over `text`.
pub fn normalize(chain: &[Normalizer], text: &str) -> String {
    chain.iter().fold(text.to_string(), |s, n| n.apply(&s))
}

/// One stage of a tokenizer chain. A chain starts from the whole normalized
/// string as a single token; each stage maps the token vector to the next.
#[derive(Debug, Clone)]
pub enum Tokenizer {
    /// Split every input token on whitespace, yielding maximal
    /// non-whitespace runs.
    Whitespace,
    /// Overlapping windows of `width` consecutive upstream tokens, joined by
    /// a single space. Fewer than `width` tokens collapse into one shingle;
    /// no tokens yield no shingles. Width 0 is rejected by [`Analyzer::new`]
    /// and panics if applied directly.
    Shingles(usize),
}

impl Tokenizer {
    pub fn apply(&self, tokens: Vec<String>) -> Vec<String> {
        match self {
            Tokenizer::Whitespace => tokens
                .iter()
                .flat_map(|t| t.split_whitespace())
                .map(str::to_string)
                .collect(),
            Tokenizer::Shingles(width) => shingles(*width, &tokens),
        }
    }
}

fn shingles(width: usize, tokens: &[String]) -> Vec<String> {
    assert!(width > 0, "shingle width must be positive");
    if tokens.is_empty() {
        return Vec::new();
    }
    if tokens.len() < width {
        return vec![tokens.join(" ")];
    }
    tokens.windows(width).map(|w| w.join(" ")).collect()
}

/// Pairs one normalizer chain with two tokenizer chains: one for index-time
/// analysis and one for query-time analysis. The two sides may legitimately
/// differ: an index can hold shingles while queries stay word-level, or the
/// other way round. Both sides are deterministic `&str -> Vec<String>`.
#[derive(Debug, Clone)]
pub struct Analyzer {
    normalizers: Vec<Normalizer>,
    search: Vec<Tokenizer>,
    index: Vec<Tokenizer>,
}

impl Analyzer {
    /// Build an analyzer, rejecting malformed configuration up front.
    pub fn new(
        normalizers: Vec<Normalizer>,
        search: Vec<Tokenizer>,
        index: Vec<Tokenizer>,
    ) -> Result<Self> {
        for stage in search.iter().chain(index.iter()) {
            if let Tokenizer::Shingles(0) = stage {
                return Err(Error::InvalidShingleWidth);
            }
        }
        Ok(Self {
            normalizers,
            search,
            index,
        })
    }

    /// Whitespace tokenization on both sides over the default normalizers.
    pub fn whitespace() -> Self {
        Self {
            normalizers: default_normalizers(),
            search: vec![Tokenizer::Whitespace],
            index: vec![Tokenizer::Whitespace],
        }
    }

    /// Shingles of `width` on both sides over the default normalizers.
    pub fn shingled(width: usize) -> Result<Self> {
        Self::new(
            default_normalizers(),
            vec![Tokenizer::Whitespace, Tokenizer::Shingles(width)],
            vec![Tokenizer::Whitespace, Tokenizer::Shingles(width)],
        )
    }

    /// Replace the normalizer chain.
    pub fn with_normalizers(mut self, normalizers: Vec<Normalizer>) -> Self {
        self.normalizers = normalizers;
        self
    }

    /// Analyze `text` the way the index side sees it.
    pub fn analyze_index(&self, text: &str) -> Vec<String> {
        self.run(&self.index, text)
    }

    /// Analyze `text` the way the query side sees it.
    pub fn analyze_search(&self, text: &str) -> Vec<String> {
        self.run(&self.search, text)
    }

    fn run(&self, chain: &[Tokenizer], text: &str) -> Vec<String> {
        let normalized = normalize(&self.normalizers, text);
        if normalized.is_empty() {
            return Vec::new();
        }
        chain
            .iter()
            .fold(vec![normalized], |tokens, stage| stage.apply(tokens))
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::whitespace()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(text: &str) -> String {
        normalize(&default_normalizers(), text)
    }

    #[test]
    fn test_normalize_deterministic() {
        for input in ["Héllo Wörld!!", "a - b", "  #cat  9lives ", "ça va?"] {
            assert_eq!(norm(input), norm(input));
        }
    }

    #[test]
    fn test_normalize_output_charset() {
        for input in ["Héllo —  Wörld!!", "a   -  b", "#x(y)z 12a", "...."] {
            let out = norm(input);
            assert!(out.chars().all(|c| c.is_alphanumeric() || c == ' '), "{out:?}");
            assert!(!out.starts_with(' ') && !out.ends_with(' '), "{out:?}");
            assert!(!out.contains("  "), "{out:?}");
        }
    }

    #[test]
    fn test_normalize_unaccent_and_lowercase() {
        assert_eq!(norm("Café"), "cafe");
        assert_eq!(norm("ÜBER"), "uber");
    }

    #[test]
    fn test_normalize_splits_digit_runs() {
        assert_eq!(norm("abc123def"), "abc 123 def");
        assert_eq!(norm("9lives"), "9 lives");
    }

    #[test]
    fn test_normalize_replaces_hash() {
        assert_eq!(norm("#cat#dog"), "cat dog");
    }

    #[test]
    fn test_normalize_removal_leaves_no_gap() {
        // punctuation is removed, not turned into a separator
        assert_eq!(norm("cat.txt"), "cattxt");
        assert_eq!(norm("a - b"), "a b");
    }

    #[test]
    fn test_whitespace_tokenizer() {
        let tokens = Tokenizer::Whitespace.apply(vec!["a happy cat".to_string()]);
        assert_eq!(tokens, vec!["a", "happy", "cat"]);
    }

    fn owned(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_shingle_count() {
        // n >= k: exactly n - k + 1 shingles
        let out = Tokenizer::Shingles(2).apply(owned(&["a", "b", "c", "d"]));
        assert_eq!(out, vec!["a b", "b c", "c d"]);
        let out = Tokenizer::Shingles(3).apply(owned(&["a", "b", "c", "d", "e", "f"]));
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn test_shingle_short_input() {
        // 0 < n < k: the whole sequence as one shingle
        let out = Tokenizer::Shingles(5).apply(owned(&["a", "b"]));
        assert_eq!(out, vec!["a b"]);
        let out = Tokenizer::Shingles(2).apply(owned(&["cat"]));
        assert_eq!(out, vec!["cat"]);
    }

    #[test]
    fn test_shingle_empty_input() {
        assert!(Tokenizer::Shingles(2).apply(Vec::new()).is_empty());
    }

    #[test]
    #[should_panic(expected = "shingle width must be positive")]
    fn test_shingle_zero_width_panics_when_applied_directly() {
        // Analyzer::new rejects width 0; a hand-built stage fails loudly too
        Tokenizer::Shingles(0).apply(owned(&["a"]));
    }

    #[test]
    fn test_analyzer_default_is_word_level() {
        let analyzer = Analyzer::default();
        assert_eq!(analyzer.analyze_index("a happy cat"), vec!["a", "happy", "cat"]);
        assert_eq!(analyzer.analyze_search("CAT"), vec!["cat"]);
    }

    #[test]
    fn test_analyzer_shingled() {
        let analyzer = Analyzer::shingled(2).unwrap();
        assert_eq!(analyzer.analyze_index("a happy cat"), vec!["a happy", "happy cat"]);
        // single-word queries still produce a term
        assert_eq!(analyzer.analyze_search("cat"), vec!["cat"]);
    }

    #[test]
    fn test_analyzer_sides_can_differ() {
        let analyzer = Analyzer::new(
            default_normalizers(),
            vec![Tokenizer::Whitespace],
            vec![Tokenizer::Whitespace, Tokenizer::Shingles(2)],
        )
        .unwrap();
        assert_eq!(analyzer.analyze_index("happy cat"), vec!["happy cat"]);
        assert_eq!(analyzer.analyze_search("happy cat"), vec!["happy", "cat"]);
    }

    #[test]
    fn test_analyzer_rejects_zero_shingle_width() {
        assert_eq!(Analyzer::shingled(0).unwrap_err(), Error::InvalidShingleWidth);
        let err = Analyzer::new(
            default_normalizers(),
            vec![Tokenizer::Whitespace],
            vec![Tokenizer::Whitespace, Tokenizer::Shingles(0)],
        )
        .unwrap_err();
        assert_eq!(err, Error::InvalidShingleWidth);
    }

    #[test]
    fn test_degenerate_input_yields_no_terms() {
        let analyzer = Analyzer::default();
        assert!(analyzer.analyze_search("").is_empty());
        assert!(analyzer.analyze_search("  ...  !!! ").is_empty());
        assert!(analyzer.analyze_index("").is_empty());
    }
}
