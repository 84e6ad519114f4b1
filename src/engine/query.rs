//! Query construction from raw input text.
//!
//! The short-query rule defines the empty/near-empty-query UX: anything
//! under three characters after trimming browses the whole index by
//! recency instead of matching tokens.

/// Result size cap for every request.
pub const DEFAULT_RESULT_SIZE: usize = 100;

/// Minimum trimmed length (in chars) for a token query; anything shorter is
/// a match-all browse.
const MIN_TOKEN_QUERY_CHARS: usize = 3;

/// One search token, matched case-insensitively at word granularity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenQuery {
    /// Lowercased token text.
    pub text: String,
    /// Prefix match instead of whole-word match. Set on the trailing token
    /// so the word still being typed already matches.
    pub prefix: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Match every document, most recently modified first.
    MatchAll,
    /// Disjunction of token matches, ranked by total match count.
    Tokens(Vec<TokenQuery>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: Query,
    pub size: usize,
    pub highlight: bool,
}

impl SearchRequest {
    /// Build a request from raw user input.
    ///
    /// Trimmed input shorter than three characters - regardless of what the
    /// characters are - becomes a match-all request sorted by modification
    /// time descending. Anything longer becomes a token query with the
    /// trailing token prefix-completed.
    pub fn from_input(input: &str) -> Self {
        let trimmed = input.trim();

        if trimmed.chars().count() < MIN_TOKEN_QUERY_CHARS {
            return Self { query: Query::MatchAll, size: DEFAULT_RESULT_SIZE, highlight: false };
        }

        let mut tokens: Vec<TokenQuery> = trimmed
            .split_whitespace()
            .map(|t| TokenQuery { text: t.to_lowercase(), prefix: false })
            .collect();
        if let Some(last) = tokens.last_mut() {
            last.prefix = true;
        }

        Self { query: Query::Tokens(tokens), size: DEFAULT_RESULT_SIZE, highlight: true }
    }
}
