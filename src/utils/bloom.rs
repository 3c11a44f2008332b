//! Bloom filter over string keys.
//!
//! Bit positions come from double hashing over two 64-bit hashes of the
//! key's UTF-8 bytes. The hash is fixed (FNV-1a followed by a splitmix64
//! finalizer) so a filter written by one build answers identically when
//! loaded by another.

use crate::error::{Result, SuggestError};
use crate::utils::encoding::{read_u64_le, read_u8, write_u64_le};
use std::io::{self, Read, Write};

/// Leading bytes of every serialized filter.
pub const FILTER_MAGIC: &[u8; 4] = b"NSBF";

/// Serialized layout version.
pub const FILTER_VERSION: u8 = 1;

/// magic + version + num_hashes + num_bits
const HEADER_LEN: usize = 4 + 1 + 1 + 8;

/// Largest word count a filter may request; a `Vec<u64>` cannot exceed
/// `isize::MAX` bytes.
const MAX_WORDS: usize = isize::MAX as usize / 8;

/// Upper bound on hash functions, reached only for very small fpp targets.
const MAX_HASHES: u8 = 32;

/// A space-efficient probabilistic set of strings.
///
/// `might_contain` never returns false for a key that was inserted. For
/// keys never inserted it returns true with a probability that grows with
/// the fill ratio and approaches the configured fpp at the expected load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BloomFilter {
    /// Bit array stored as u64 words for efficient access
    bits: Vec<u64>,
    /// Number of bits in the filter, always a multiple of 64
    num_bits: usize,
    /// Number of hash functions to use
    num_hashes: u8,
}

impl BloomFilter {
    /// Create a new bloom filter sized for the expected number of keys
    /// and desired false positive probability.
    ///
    /// # Arguments
    /// * `expected_insertions` - Expected number of distinct keys, must be > 0
    /// * `fpp` - Target false positive probability, strictly inside (0, 1)
    pub fn new(expected_insertions: usize, fpp: f64) -> Result<Self> {
        if expected_insertions == 0 {
            return Err(SuggestError::InvalidConfiguration(
                "expected insertions must be positive".to_string(),
            ));
        }
        // Written this way so NaN is rejected too
        if !(fpp > 0.0 && fpp < 1.0) {
            return Err(SuggestError::InvalidConfiguration(format!(
                "false positive probability must be in (0, 1), got {fpp}"
            )));
        }

        // Optimal number of bits: m = -n * ln(p) / (ln(2)^2)
        let n = expected_insertions as f64;
        let ln2_sq = std::f64::consts::LN_2 * std::f64::consts::LN_2;
        let optimal_bits = ((-n * fpp.ln()) / ln2_sq).ceil();
        if !optimal_bits.is_finite() || optimal_bits / 64.0 > MAX_WORDS as f64 {
            return Err(too_large(optimal_bits));
        }
        let num_bits = (optimal_bits as usize).max(64);

        // Round up to nearest u64
        let num_words = num_bits.div_ceil(64);
        let num_bits = match num_words.checked_mul(64) {
            Some(bits) if num_words <= MAX_WORDS => bits,
            _ => return Err(too_large(optimal_bits)),
        };

        // Optimal number of hash functions: k = (m/n) * ln(2)
        let num_hashes = ((num_bits as f64 / n) * std::f64::consts::LN_2).round();
        let num_hashes = (num_hashes as u64).clamp(1, MAX_HASHES as u64) as u8;

        let mut bits = Vec::new();
        bits.try_reserve_exact(num_words).map_err(|_| too_large(optimal_bits))?;
        bits.resize(num_words, 0);

        Ok(Self {
            bits,
            num_bits,
            num_hashes,
        })
    }

    /// Insert a key. Returns true if at least one addressed bit was
    /// previously unset, i.e. the key was observably new.
    #[inline]
    pub fn insert(&mut self, key: &str) -> bool {
        let (h1, h2) = hash_pair(key.as_bytes());
        let mut changed = false;

        for i in 0..self.num_hashes as u64 {
            let (word, mask) = self.locate(h1, h2, i);
            if self.bits[word] & mask == 0 {
                self.bits[word] |= mask;
                changed = true;
            }
        }
        changed
    }

    /// Check if a key might be in the set.
    /// Returns false if definitely not present, true if possibly present.
    #[inline]
    pub fn might_contain(&self, key: &str) -> bool {
        let (h1, h2) = hash_pair(key.as_bytes());

        for i in 0..self.num_hashes as u64 {
            let (word, mask) = self.locate(h1, h2, i);
            if self.bits[word] & mask == 0 {
                return false;
            }
        }
        true
    }

    /// Word index and bit mask for the i-th hash function.
    /// Double hashing: h(i) = h1 + i*h2
    #[inline]
    fn locate(&self, h1: u64, h2: u64, i: u64) -> (usize, u64) {
        let hash = h1.wrapping_add(i.wrapping_mul(h2));
        let bit_index = (hash % self.num_bits as u64) as usize;
        (bit_index / 64, 1u64 << (bit_index % 64))
    }

    /// Get the number of hash functions
    pub fn num_hashes(&self) -> u8 {
        self.num_hashes
    }

    /// Get the number of bits
    pub fn num_bits(&self) -> usize {
        self.num_bits
    }

    /// Number of bits currently set
    pub fn bits_set(&self) -> u64 {
        self.bits.iter().map(|w| w.count_ones() as u64).sum()
    }

    /// Fraction of bits set, in [0, 1]
    pub fn fill_ratio(&self) -> f64 {
        self.bits_set() as f64 / self.num_bits as f64
    }

    /// Estimated false positive probability at the current load.
    pub fn expected_fpp(&self) -> f64 {
        self.fill_ratio().powi(self.num_hashes as i32)
    }

    /// Get approximate memory usage in bytes
    pub fn memory_usage(&self) -> usize {
        self.bits.len() * 8 + std::mem::size_of::<Self>()
    }

    /// Size of the serialized form in bytes
    pub fn serialized_len(&self) -> usize {
        HEADER_LEN + self.bits.len() * 8
    }

    /// Serialize into a byte vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.serialized_len());
        // Writing into a Vec cannot fail
        let _ = self.write_to(&mut buf);
        buf
    }

    /// Serialize to a writer.
    ///
    /// Format (little endian):
    /// - 4 bytes: magic `NSBF`
    /// - 1 byte: format version
    /// - 1 byte: num_hashes
    /// - 8 bytes: num_bits (u64)
    /// - num_bits / 64 words of u64: bit array
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(FILTER_MAGIC)?;
        writer.write_all(&[FILTER_VERSION, self.num_hashes])?;
        write_u64_le(writer, self.num_bits as u64)?;
        for word in &self.bits {
            write_u64_le(writer, *word)?;
        }
        Ok(())
    }

    /// Deserialize from a byte slice. The slice must hold exactly one filter.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut cursor = data;
        let filter = Self::read_from(&mut cursor)?;
        if !cursor.is_empty() {
            return Err(SuggestError::CorruptFilterData(format!(
                "{} trailing bytes after bit array",
                cursor.len()
            )));
        }
        Ok(filter)
    }

    /// Deserialize from a reader, consuming exactly one filter.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic).map_err(truncated)?;
        if &magic != FILTER_MAGIC {
            return Err(SuggestError::CorruptFilterData("bad magic".to_string()));
        }

        let version = read_u8(reader).map_err(truncated)?;
        if version != FILTER_VERSION {
            return Err(SuggestError::CorruptFilterData(format!(
                "unsupported format version {version}"
            )));
        }

        let num_hashes = read_u8(reader).map_err(truncated)?;
        if num_hashes == 0 {
            return Err(SuggestError::CorruptFilterData(
                "zero hash functions".to_string(),
            ));
        }

        let num_bits = read_u64_le(reader).map_err(truncated)?;
        if num_bits == 0 || num_bits % 64 != 0 {
            return Err(SuggestError::CorruptFilterData(format!(
                "invalid bit count {num_bits}"
            )));
        }
        let num_bits = usize::try_from(num_bits)
            .map_err(|_| SuggestError::CorruptFilterData("bit count overflows usize".to_string()))?;

        // Grow as words arrive so a corrupt header cannot force a huge allocation
        let num_words = num_bits / 64;
        let mut bits = Vec::with_capacity(num_words.min(1 << 20));
        for _ in 0..num_words {
            bits.push(read_u64_le(reader).map_err(truncated)?);
        }

        Ok(Self {
            bits,
            num_bits,
            num_hashes,
        })
    }
}

fn too_large(bits: f64) -> SuggestError {
    SuggestError::InvalidConfiguration(format!("could not create a filter of {bits} bits"))
}

fn truncated(err: io::Error) -> SuggestError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        SuggestError::CorruptFilterData("truncated filter data".to_string())
    } else {
        SuggestError::Io(err)
    }
}

/// Compute two hash values for double hashing.
#[inline]
fn hash_pair(bytes: &[u8]) -> (u64, u64) {
    let h1 = mix64(fnv1a(bytes, 0));
    // Odd step so the probe sequence never degenerates to a single bit
    let h2 = mix64(fnv1a(bytes, 0x9e3779b97f4a7c15)) | 1;
    (h1, h2)
}

#[inline]
fn fnv1a(bytes: &[u8], seed: u64) -> u64 {
    const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;

    let mut hash = FNV_OFFSET_BASIS ^ seed;
    for &byte in bytes {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// splitmix64 finalizer
#[inline]
fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_bloom_filter_basic() {
        let mut bf = BloomFilter::new(1000, 0.01).unwrap();

        for i in 0..100 {
            bf.insert(&format!("name{i}"));
        }

        // All inserted items should be found
        for i in 0..100 {
            assert!(bf.might_contain(&format!("name{i}")), "name{} should be found", i);
        }

        // Items not inserted should mostly not be found
        let mut false_positives = 0;
        for i in 1000..2000 {
            if bf.might_contain(&format!("name{i}")) {
                false_positives += 1;
            }
        }
        assert!(false_positives < 50, "Too many false positives: {}", false_positives);
    }

    #[test]
    fn test_invalid_configuration() {
        assert!(matches!(
            BloomFilter::new(0, 0.01),
            Err(SuggestError::InvalidConfiguration(_))
        ));
        for fpp in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
            assert!(
                matches!(BloomFilter::new(100, fpp), Err(SuggestError::InvalidConfiguration(_))),
                "fpp {fpp} should be rejected"
            );
        }
    }

    #[test]
    fn test_oversized_configuration_rejected() {
        // Exceeds the addressable bit array outright
        assert!(matches!(
            BloomFilter::new(usize::MAX, 1e-300),
            Err(SuggestError::InvalidConfiguration(_))
        ));
        // Within the bound but far past any real allocator
        assert!(matches!(
            BloomFilter::new(usize::MAX / 2, 0.5),
            Err(SuggestError::InvalidConfiguration(_))
        ));
        assert!(BloomFilter::new(1_000, 0.01).is_ok());
    }

    #[test]
    fn test_sizing() {
        let bf = BloomFilter::new(1_000_000, 0.01).unwrap();
        // ~9.59 bits per element, 7 hashes for 1%
        assert!(bf.num_bits() >= 9_585_059);
        assert_eq!(bf.num_bits() % 64, 0);
        assert_eq!(bf.num_hashes(), 7);

        let tiny = BloomFilter::new(1, 0.5).unwrap();
        assert_eq!(tiny.num_bits(), 64);
        assert!(tiny.num_hashes() >= 1);
    }

    #[test]
    fn test_insert_reports_new_keys() {
        let mut bf = BloomFilter::new(1000, 0.01).unwrap();
        assert!(bf.insert("smith"));
        assert!(!bf.insert("smith"));
        assert!(bf.might_contain("smith"));
    }

    #[test]
    fn test_bloom_filter_false_positive_rate() {
        let expected_fpr = 0.01;
        let num_elements = 10_000;
        let num_test_elements = 100_000;

        let mut bf = BloomFilter::new(num_elements, expected_fpr).unwrap();
        for i in 0..num_elements {
            bf.insert(&format!("in-{i}"));
        }

        let mut false_positives = 0;
        for i in 0..num_test_elements {
            if bf.might_contain(&format!("out-{i}")) {
                false_positives += 1;
            }
        }

        let actual_fpr = false_positives as f64 / num_test_elements as f64;

        // 1.5x tolerance covers sampling variance at this sample size
        assert!(
            actual_fpr <= expected_fpr * 1.5,
            "False positive rate too high: {:.2}% (expected <= {:.2}%)",
            actual_fpr * 100.0,
            expected_fpr * 1.5 * 100.0
        );
        assert!(
            actual_fpr >= expected_fpr * 0.1,
            "False positive rate suspiciously low: {:.4}% (may indicate broken hash function)",
            actual_fpr * 100.0
        );
        assert!(bf.expected_fpp() < expected_fpr * 1.5);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let mut bf = BloomFilter::new(500, 0.001).unwrap();
        for name in ["smith", "smithson", "smyth", "jones"] {
            bf.insert(name);
        }

        let bytes = bf.to_bytes();
        assert_eq!(bytes.len(), bf.serialized_len());
        let restored = BloomFilter::from_bytes(&bytes).unwrap();
        assert_eq!(restored, bf);
        assert!(restored.might_contain("smyth"));
    }

    #[test]
    fn test_corrupt_data_rejected() {
        let bf = BloomFilter::new(100, 0.01).unwrap();
        let bytes = bf.to_bytes();

        let corrupt = |data: &[u8]| {
            matches!(
                BloomFilter::from_bytes(data),
                Err(SuggestError::CorruptFilterData(_))
            )
        };

        assert!(corrupt(&[]));
        assert!(corrupt(&bytes[..3]));
        assert!(corrupt(&bytes[..HEADER_LEN]));
        assert!(corrupt(&bytes[..bytes.len() - 1]));

        let mut extra = bytes.clone();
        extra.push(0);
        assert!(corrupt(&extra));

        let mut bad_magic = bytes.clone();
        bad_magic[0] = b'X';
        assert!(corrupt(&bad_magic));

        let mut bad_version = bytes.clone();
        bad_version[4] = 99;
        assert!(corrupt(&bad_version));

        let mut no_hashes = bytes.clone();
        no_hashes[5] = 0;
        assert!(corrupt(&no_hashes));

        let mut odd_bits = bytes.clone();
        odd_bits[6] = 65;
        assert!(corrupt(&odd_bits));
    }

    #[test]
    fn test_hash_pair_independence() {
        let mut same_count = 0;
        for i in 0..1000 {
            let (h1, h2) = hash_pair(format!("key{i}").as_bytes());
            if h1 == h2 {
                same_count += 1;
            }
        }
        assert_eq!(same_count, 0);
    }

    proptest! {
        #[test]
        fn prop_no_false_negatives(keys in prop::collection::vec("[a-z.]{1,12}", 1..300)) {
            // Deliberately undersized so the filter runs well past its target load
            let mut bf = BloomFilter::new(16, 0.05).unwrap();
            for key in &keys {
                bf.insert(key);
            }
            for key in &keys {
                prop_assert!(bf.might_contain(key));
            }
        }
    }
}
