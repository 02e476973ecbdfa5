//! Text tokenizer for metric names and help strings
//!
//! Pipeline: lowercase → split on every non-alphanumeric character
//!           → filter short tokens → remove stopwords
//!
//! Splitting on `_` and `:` turns `node_memory_usage_bytes` into
//! `node memory usage bytes`, so names and help text share one vocabulary.

/// Standard English stopwords (Lucene's default set).
const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

#[inline]
fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}

/// Tokenize text into hashable terms.
///
/// # Example
///
/// ```
/// use promrag_intelligence::embed::tokenizer::tokenize;
///
/// let tokens = tokenize("node_memory_usage_bytes The total memory in use");
/// assert_eq!(tokens, vec!["node", "memory", "usage", "bytes", "total", "memory", "use"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| s.chars().count() >= 2)
        .filter(|s| !is_stopword(s))
        .map(str::to_string)
        .collect()
}
