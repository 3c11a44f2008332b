use crate::index::encoder::DictionaryEncoder;
use crate::index::types::*;
use crate::index::writer::FilterWriter;
use crate::utils::progress::ingest_bar;
use crate::utils::{split_lines, BloomFilter};
use anyhow::{Context, Result};
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Names between debug log lines
const LOG_EVERY: u64 = 100_000;

/// Bytes between progress bar updates
const PROGRESS_STEP: u64 = 1 << 16;

/// Encode every line of a newline-delimited name list into `filter`.
///
/// Blank lines, lines that are not valid UTF-8 and lines the encoder
/// rejects are counted as read but not indexed.
pub fn ingest_lines(
    data: &[u8],
    encoder: &DictionaryEncoder,
    filter: &mut BloomFilter,
    silent: bool,
) -> IngestStats {
    let mut stats = IngestStats::default();
    let progress = ingest_bar(data.len() as u64, silent);
    let mut pending_bytes = 0u64;

    for line in split_lines(data) {
        stats.names_read += 1;
        pending_bytes += line.len() as u64 + 1;

        match std::str::from_utf8(line) {
            Ok(name) if encoder.accepts(name) => {
                stats.keys_added += encoder.ingest(name, filter) as u64;
                stats.names_indexed += 1;
                if stats.names_indexed % LOG_EVERY == 0 {
                    debug!("Added {} names", stats.names_indexed);
                }
            }
            Ok(_) => {}
            Err(_) => debug!("skipping line {}: not valid UTF-8", stats.names_read),
        }

        if pending_bytes >= PROGRESS_STEP {
            if let Some(ref pb) = progress {
                pb.inc(pending_bytes);
            }
            pending_bytes = 0;
        }
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }
    stats
}

/// Build a fresh filter from an in-memory name list
pub fn build_filter_from_bytes(
    data: &[u8],
    config: &BuildConfig,
    silent: bool,
) -> crate::error::Result<(BloomFilter, IngestStats)> {
    let encoder = DictionaryEncoder::new(config.min_prefix_length)?;
    let mut filter = BloomFilter::new(config.expected_insertions, config.false_positive_probability)?;
    let stats = ingest_lines(data, &encoder, &mut filter, silent);
    Ok((filter, stats))
}

/// Build a filter from a names file and persist it to `output`
pub fn build_filter(names_path: &Path, output: &Path, config: &BuildConfig, silent: bool) -> Result<FilterMeta> {
    let start = Instant::now();
    let file = File::open(names_path)
        .with_context(|| format!("Failed to open names file {}", names_path.display()))?;
    let data = unsafe { Mmap::map(&file)? };

    info!(
        "Building filter from {} ({} insertions at fpp {})",
        names_path.display(),
        config.expected_insertions,
        config.false_positive_probability
    );

    let (filter, stats) = build_filter_from_bytes(&data, config, silent)?;

    info!("Read {} names, indexed {}", stats.names_read, stats.names_indexed);
    info!("Generated {} prefixes", stats.keys_added);

    let estimated = filter.expected_fpp();
    if estimated > config.false_positive_probability * 2.0 {
        warn!(
            "filter is overfull: estimated fpp {:.4} exceeds target {}; raise expected_insertions",
            estimated,
            config.false_positive_probability
        );
    }

    let meta = FilterWriter::new(output).write(&filter, config, stats)?;
    info!("Filter stored at {} in {:.2?}", output.display(), start.elapsed());
    Ok(meta)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> BuildConfig {
        BuildConfig {
            expected_insertions: 1000,
            false_positive_probability: 0.01,
            min_prefix_length: MIN_PREFIX_LENGTH,
        }
    }

    #[test]
    fn test_ingest_lines_counts() {
        let data = b"smith\nsmithson\r\nabc\n\nsmyth\n\xff\xfe\n";
        let (filter, stats) = build_filter_from_bytes(data, &small_config(), true).unwrap();

        assert_eq!(stats.names_read, 6);
        assert_eq!(stats.names_indexed, 3);
        assert!(filter.might_contain("smithson."));
        assert!(filter.might_contain("smyth."));
        assert!(stats.keys_added >= 8);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = small_config();
        config.false_positive_probability = 0.0;
        assert!(build_filter_from_bytes(b"smith\n", &config, true).is_err());
    }

    #[test]
    fn test_build_filter_writes_meta() {
        let dir = tempfile::tempdir().unwrap();
        let names = dir.path().join("names.txt");
        std::fs::write(&names, "smith\nsmithson\nsmyth\n").unwrap();
        let output = dir.path().join("out").join("names.bloom");

        let meta = build_filter(&names, &output, &small_config(), true).unwrap();
        assert_eq!(meta.ingest.names_indexed, 3);
        assert!(output.exists());
        assert!(crate::index::writer::meta_path(&output).exists());
    }
}
