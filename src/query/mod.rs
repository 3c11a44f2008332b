//! Prefix lookups over a name dictionary.
//!
//! Every backend implements [`NameLookup`]: given a prefix and a budget it
//! returns an ordered mix of complete words and continuation prefixes the
//! caller may query again for more detail.

pub mod cache;
pub mod engine;
pub mod exact;
pub mod expand;
pub mod merge;

pub use cache::CachedLookup;
pub use engine::{BloomNameLookup, LookupTrace};
pub use exact::SortedNameLookup;
pub use expand::{expand_all, expand_dictionary};

use crate::error::{Result, SuggestError};
use crate::index::TERMINATOR;
use std::fmt;
use std::ops::RangeInclusive;

/// Characters tried when extending a prefix by one position
pub const ALPHABET: RangeInclusive<char> = 'a'..='z';

/// A single suggestion handed back to callers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Suggestion {
    /// A complete dictionary word
    Word(String),
    /// A longer prefix with more content below it
    Prefix(String),
}

impl Suggestion {
    /// Interpret a raw token: a trailing terminator marks a complete word.
    pub fn from_token(token: String) -> Self {
        match token.strip_suffix(TERMINATOR) {
            Some(word) => Suggestion::Word(word.to_string()),
            None => Suggestion::Prefix(token),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Suggestion::Word(s) | Suggestion::Prefix(s) => s,
        }
    }

    pub fn is_word(&self) -> bool {
        matches!(self, Suggestion::Word(_))
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Suggestion::Word(word) => f.write_str(word),
            Suggestion::Prefix(prefix) => write!(f, "{prefix}..."),
        }
    }
}

/// `lookup(prefix, max) -> ordered suggestions`, independent of backend.
pub trait NameLookup {
    /// Raw tokens: words carry a trailing [`TERMINATOR`], continuation
    /// prefixes do not.
    ///
    /// The prefix must be non-empty and must not contain the terminator;
    /// use [`lookup`](NameLookup::lookup) when that is not already known.
    fn lookup_tokens(&self, prefix: &str, max: usize) -> Vec<String>;

    /// Checked lookup returning typed suggestions.
    fn lookup(&self, prefix: &str, max: usize) -> Result<Vec<Suggestion>> {
        validate_prefix(prefix)?;
        Ok(self
            .lookup_tokens(prefix, max)
            .into_iter()
            .map(Suggestion::from_token)
            .collect())
    }
}

/// Reject prefixes that would produce meaningless membership answers.
pub fn validate_prefix(prefix: &str) -> Result<()> {
    if prefix.is_empty() {
        return Err(SuggestError::InvalidArgument("prefix must not be empty".to_string()));
    }
    if prefix.contains(TERMINATOR) {
        return Err(SuggestError::InvalidArgument(format!(
            "prefix {prefix:?} contains the reserved character {TERMINATOR:?}"
        )));
    }
    Ok(())
}
