use crate::index::types::*;
use crate::index::writer::meta_path;
use crate::utils::BloomFilter;
use anyhow::{Context, Result};
use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};

/// A filter loaded read-only from disk
pub struct FilterReader {
    path: PathBuf,
    filter: BloomFilter,
    /// Absent when the sidecar is missing or unreadable
    pub meta: Option<FilterMeta>,
}

impl FilterReader {
    /// Open a filter file written by [`FilterWriter`](crate::index::FilterWriter)
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("No filter at {}. Run 'nsuggest build' first.", path.display()))?;
        let mmap = unsafe { Mmap::map(&file)? };
        let filter = BloomFilter::from_bytes(&mmap)
            .with_context(|| format!("Failed to load filter {}", path.display()))?;

        let meta = match File::open(meta_path(path)) {
            Ok(file) => match serde_json::from_reader::<_, FilterMeta>(file) {
                Ok(meta) => Some(meta),
                Err(e) => {
                    tracing::warn!("ignoring unreadable filter metadata: {}", e);
                    None
                }
            },
            Err(_) => None,
        };

        if let Some(meta) = &meta {
            if meta.num_bits != filter.num_bits() || meta.num_hashes != filter.num_hashes() {
                tracing::warn!(
                    "filter metadata does not match {} (stale sidecar?)",
                    path.display()
                );
            }
        }

        tracing::debug!(
            path = %path.display(),
            bits = filter.num_bits(),
            hashes = filter.num_hashes(),
            "filter loaded"
        );

        Ok(Self {
            path: path.to_path_buf(),
            filter,
            meta,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn filter(&self) -> &BloomFilter {
        &self.filter
    }

    pub fn into_filter(self) -> BloomFilter {
        self.filter
    }

    /// Minimum prefix length the filter was built with
    pub fn min_prefix_length(&self) -> usize {
        self.meta
            .as_ref()
            .map(|m| m.min_prefix_length)
            .unwrap_or(MIN_PREFIX_LENGTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SuggestError;
    use crate::index::FilterWriter;

    #[test]
    fn test_write_then_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("names.bloom");

        let mut filter = BloomFilter::new(100, 0.01).unwrap();
        filter.insert("smith");
        let config = BuildConfig {
            expected_insertions: 100,
            false_positive_probability: 0.01,
            min_prefix_length: 3,
        };
        let written = FilterWriter::new(&path)
            .write(&filter, &config, IngestStats::default())
            .unwrap();

        let reader = FilterReader::open(&path).unwrap();
        assert_eq!(reader.filter(), &filter);
        assert_eq!(reader.meta.as_ref(), Some(&written));
        assert_eq!(reader.min_prefix_length(), 3);
    }

    #[test]
    fn test_open_without_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bare.bloom");
        let filter = BloomFilter::new(10, 0.1).unwrap();
        std::fs::write(&path, filter.to_bytes()).unwrap();

        let reader = FilterReader::open(&path).unwrap();
        assert!(reader.meta.is_none());
        assert_eq!(reader.min_prefix_length(), MIN_PREFIX_LENGTH);
    }

    #[test]
    fn test_open_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.bloom");
        std::fs::write(&path, b"NSBF\x01").unwrap();

        let err = FilterReader::open(&path).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<SuggestError>(),
            Some(SuggestError::CorruptFilterData(_))
        ));
    }
}
