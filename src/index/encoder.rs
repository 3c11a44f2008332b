use crate::error::{Result, SuggestError};
use crate::index::types::{MIN_PREFIX_LENGTH, TERMINATOR};
use crate::utils::BloomFilter;

/// Turns dictionary words into filter keys.
///
/// A word of `L >= min_prefix_length` characters yields its prefixes of
/// `min_prefix_length..=L` characters followed by the word plus
/// [`TERMINATOR`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DictionaryEncoder {
    min_prefix_length: usize,
}

impl Default for DictionaryEncoder {
    fn default() -> Self {
        Self {
            min_prefix_length: MIN_PREFIX_LENGTH,
        }
    }
}

impl DictionaryEncoder {
    pub fn new(min_prefix_length: usize) -> Result<Self> {
        if min_prefix_length == 0 {
            return Err(SuggestError::InvalidConfiguration(
                "min prefix length must be at least 1".to_string(),
            ));
        }
        Ok(Self { min_prefix_length })
    }

    pub fn min_prefix_length(&self) -> usize {
        self.min_prefix_length
    }

    /// Whether `word` is encoded at all. Words containing the terminator
    /// would forge terminal keys and are skipped with the short ones.
    pub fn accepts(&self, word: &str) -> bool {
        !word.contains(TERMINATOR) && word.chars().count() >= self.min_prefix_length
    }

    /// Keys for `word` in insertion order; empty for rejected words.
    pub fn keys(&self, word: &str) -> Vec<String> {
        if !self.accepts(word) {
            return Vec::new();
        }

        // Byte offsets ending prefixes of min..L characters, then the whole word
        let ends = word
            .char_indices()
            .map(|(i, _)| i)
            .skip(self.min_prefix_length)
            .chain(std::iter::once(word.len()));

        let mut keys: Vec<String> = ends.map(|end| word[..end].to_string()).collect();
        keys.push(format!("{word}{TERMINATOR}"));
        keys
    }

    /// Insert every key of `word` into `filter`.
    /// Returns how many insertions were observably new.
    pub fn ingest(&self, word: &str, filter: &mut BloomFilter) -> usize {
        self.keys(word)
            .iter()
            .filter(|key| filter.insert(key))
            .count()
    }
}
