//! Folding tokenizer for place names
//!
//! Names are matched regardless of case and diacritics, so "Iași", "IASI"
//! and "iasi" all produce the same term.

use geoplaces_core::search_types::atonic;

/// Tokenize text into searchable terms
///
/// - Strip diacritics
/// - Lowercase
/// - Split on non-alphanumeric characters
///
/// # Example
///
/// ```
/// use geoplaces_search::tokenizer::tokenize;
///
/// let tokens = tokenize("Piatra-Neamț");
/// assert_eq!(tokens, vec!["piatra", "neamt"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    atonic(text)
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Tokenize and deduplicate for query processing
///
/// # Example
///
/// ```
/// use geoplaces_search::tokenizer::tokenize_unique;
///
/// let tokens = tokenize_unique("Cluj cluj CLUJ-Napoca");
/// assert_eq!(tokens, vec!["cluj", "napoca"]);
/// ```
pub fn tokenize_unique(text: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tokenize(text)
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect()
}
