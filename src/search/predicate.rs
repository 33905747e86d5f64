use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use super::QueryError;

/// Restricts `advocates` rows to those whose FTS5 index row matches `?1`.
const MATCH_CLAUSE: &str =
    "advocates.id IN (SELECT rowid FROM advocates_fts WHERE advocates_fts MATCH ?1)";

/// A term that tokenized to nothing can never match.
const MATCH_NOTHING_CLAUSE: &str = "0";

/// English stopwords dropped from search terms, sorted for binary search.
const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an",
    "and", "any", "are", "as", "at", "be", "because", "been", "before", "being",
    "below", "between", "both", "but", "by", "can", "did", "do", "does",
    "doing", "don", "down", "during", "each", "few", "for", "from", "further",
    "had", "has", "have", "having", "he", "her", "here", "hers", "herself",
    "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its",
    "itself", "just", "me", "more", "most", "my", "myself", "no", "nor", "not",
    "now", "of", "off", "on", "once", "only", "or", "other", "our", "ours",
    "ourselves", "out", "over", "own", "s", "same", "she", "should", "so",
    "some", "such", "t", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those", "through",
    "to", "too", "under", "until", "up", "very", "was", "we", "were", "what",
    "when", "where", "which", "while", "who", "whom", "why", "will", "with",
    "you", "your", "yours", "yourself", "yourselves",
];

/// A full-text filter over the indexed advocate fields.
///
/// The predicate is opaque to callers; the store asks it for its SQL clause
/// and bound parameter. The user's term is only ever bound, never spliced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPredicate {
    term: String,
    match_expression: Option<String>,
}

impl SearchPredicate {
    /// The raw term the predicate was built from.
    pub fn term(&self) -> &str {
        &self.term
    }

    /// The FTS5 query expression, or `None` when the term had no tokens.
    pub fn match_expression(&self) -> Option<&str> {
        self.match_expression.as_deref()
    }

    /// SQL boolean expression suitable for a `WHERE` clause.
    pub fn where_clause(&self) -> &'static str {
        if self.match_expression.is_some() {
            MATCH_CLAUSE
        } else {
            MATCH_NOTHING_CLAUSE
        }
    }
}

/// Build a full-text predicate for `term`.
///
/// The term is read as plain text. It is NFC-normalized and split at every
/// character that is neither alphanumeric nor a combining mark. English
/// stopwords are dropped and the remaining tokens must all appear in the
/// record's index row. Operators and punctuation in the input carry no query
/// meaning. A term left with no tokens matches nothing.
pub fn build_search_predicate(term: &str) -> Result<SearchPredicate, QueryError> {
    if term.trim().is_empty() {
        return Err(QueryError::EmptySearchTerm);
    }

    let tokens = tokenize(term);
    let match_expression = if tokens.is_empty() {
        None
    } else {
        Some(
            tokens
                .iter()
                .map(|t| format!("\"{t}\""))
                .collect::<Vec<_>>()
                .join(" AND "),
        )
    };

    Ok(SearchPredicate {
        term: term.to_string(),
        match_expression,
    })
}

fn tokenize(term: &str) -> Vec<String> {
    let normalized: String = term.nfc().collect();
    normalized
        .split(|c: char| !(c.is_alphanumeric() || is_combining_mark(c)))
        .filter(|t| !t.is_empty() && !is_stopword(t))
        .map(str::to_string)
        .collect()
}

fn is_stopword(token: &str) -> bool {
    STOPWORDS
        .binary_search(&token.to_lowercase().as_str())
        .is_ok()
}
