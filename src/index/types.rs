use crate::utils::AppConfig;
use serde::{Deserialize, Serialize};

/// Appended to a whole word's key. Never a legal query character, so a
/// terminal key cannot collide with a prefix key of a longer word.
pub const TERMINATOR: char = '.';

/// Shortest prefix stored in the filter in the default configuration.
pub const MIN_PREFIX_LENGTH: usize = 4;

/// Current version of the metadata sidecar
pub const META_VERSION: u32 = 1;

/// Parameters for a build pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildConfig {
    pub expected_insertions: usize,
    pub false_positive_probability: f64,
    pub min_prefix_length: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for BuildConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            expected_insertions: config.expected_insertions,
            false_positive_probability: config.false_positive_probability,
            min_prefix_length: config.min_prefix_length,
        }
    }
}

/// Counters collected while ingesting names
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestStats {
    /// Lines read from the input
    pub names_read: u64,
    /// Names long enough to be encoded
    pub names_indexed: u64,
    /// Keys whose insertion flipped at least one bit
    pub keys_added: u64,
}

/// Filter metadata stored next to the filter as `<filter>.meta.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterMeta {
    pub version: u32,
    pub expected_insertions: usize,
    pub false_positive_probability: f64,
    pub min_prefix_length: usize,
    pub num_bits: usize,
    pub num_hashes: u8,
    #[serde(flatten)]
    pub ingest: IngestStats,
    pub created_at: u64,
}
