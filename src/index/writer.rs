use crate::index::types::*;
use crate::utils::BloomFilter;
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Path of the metadata sidecar for a filter file
pub fn meta_path(filter_path: &Path) -> PathBuf {
    let mut name = filter_path.as_os_str().to_owned();
    name.push(".meta.json");
    PathBuf::from(name)
}

/// Writes a built filter and its metadata to disk
pub struct FilterWriter {
    filter_path: PathBuf,
}

impl FilterWriter {
    pub fn new(filter_path: &Path) -> Self {
        Self {
            filter_path: filter_path.to_path_buf(),
        }
    }

    /// Write filter and sidecar. The filter goes to a temporary file first
    /// and is renamed into place, so readers never observe a partial file.
    pub fn write(&self, filter: &BloomFilter, config: &BuildConfig, stats: IngestStats) -> Result<FilterMeta> {
        if let Some(parent) = self.filter_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut tmp_name = self.filter_path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        {
            let mut file = BufWriter::new(
                File::create(&tmp_path)
                    .with_context(|| format!("Failed to create {}", tmp_path.display()))?,
            );
            filter.write_to(&mut file)?;
            file.flush()?;
        }
        fs::rename(&tmp_path, &self.filter_path)
            .with_context(|| format!("Failed to move filter into {}", self.filter_path.display()))?;

        let meta = FilterMeta {
            version: META_VERSION,
            expected_insertions: config.expected_insertions,
            false_positive_probability: config.false_positive_probability,
            min_prefix_length: config.min_prefix_length,
            num_bits: filter.num_bits(),
            num_hashes: filter.num_hashes(),
            ingest: stats,
            created_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        };

        let file = File::create(meta_path(&self.filter_path))?;
        serde_json::to_writer_pretty(file, &meta)?;

        tracing::debug!(
            path = %self.filter_path.display(),
            bytes = filter.serialized_len(),
            "filter written"
        );
        Ok(meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_path() {
        assert_eq!(
            meta_path(Path::new("/tmp/names.bloom")),
            PathBuf::from("/tmp/names.bloom.meta.json")
        );
    }
}
