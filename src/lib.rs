//! # nsuggest - bloom-filter backed name suggestion
//!
//! Prefix suggestions over a very large name dictionary without keeping
//! the dictionary in memory. Names are encoded into a bloom filter as
//! every prefix of at least four characters plus a terminated whole-word
//! key; suggestions are reconstructed from membership tests alone by a
//! budgeted walk of the 26-letter extension space.
//!
//! ## Architecture
//!
//! - [`utils`] - Bloom filter, config, byte helpers
//! - [`index`] - Encoding names into a filter, persisting and loading it
//! - [`query`] - The [`NameLookup`](query::NameLookup) contract and its backends
//! - [`output`] - Terminal rendering
//! - [`error`] - Error types
//!
//! ## Quick Start
//!
//! ```
//! use nsuggest::index::DictionaryEncoder;
//! use nsuggest::query::{BloomNameLookup, NameLookup, Suggestion};
//! use nsuggest::utils::BloomFilter;
//!
//! let mut filter = BloomFilter::new(1_000, 0.001).unwrap();
//! let encoder = DictionaryEncoder::default();
//! for name in ["smith", "smithson", "smyth"] {
//!     encoder.ingest(name, &mut filter);
//! }
//!
//! let lookup = BloomNameLookup::new(filter);
//! let suggestions = lookup.lookup("smit", 10).unwrap();
//! assert!(suggestions.contains(&Suggestion::Word("smith".to_string())));
//! ```

pub mod error;
pub mod index;
pub mod output;
pub mod query;
pub mod utils;
