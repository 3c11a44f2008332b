use crate::index::reader::FilterReader;
use anyhow::Result;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Display filter statistics
pub fn show_stats(filter_path: &Path) -> Result<()> {
    let reader = FilterReader::open(filter_path)?;
    let filter = reader.filter();

    println!("Filter Statistics");
    println!("=================");
    println!();
    println!("Filter location:  {}", reader.path().display());
    println!("Size:             {}", format_size(filter.serialized_len() as u64));
    println!("Bits:             {}", filter.num_bits());
    println!("Hash functions:   {}", filter.num_hashes());
    println!("Bits set:         {}", filter.bits_set());
    println!("Fill ratio:       {:.2}%", filter.fill_ratio() * 100.0);
    println!("Estimated fpp:    {:.6}", filter.expected_fpp());

    match &reader.meta {
        Some(meta) => {
            println!();
            println!("Expected keys:    {}", meta.expected_insertions);
            println!("Target fpp:       {}", meta.false_positive_probability);
            println!("Min prefix:       {}", meta.min_prefix_length);
            println!("Names read:       {}", meta.ingest.names_read);
            println!("Names indexed:    {}", meta.ingest.names_indexed);
            println!("Keys added:       {}", meta.ingest.keys_added);
            println!();
            println!("Created:          {}", format_timestamp(meta.created_at, unix_now()));
        }
        None => {
            println!();
            println!("(no metadata sidecar found)");
        }
    }

    Ok(())
}

/// Format byte size to human readable
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

/// Unix seconds followed by the age relative to `now`
fn format_timestamp(ts: u64, now: u64) -> String {
    const MINUTE: u64 = 60;
    const HOUR: u64 = MINUTE * 60;
    const DAY: u64 = HOUR * 24;

    let age = match now.checked_sub(ts) {
        Some(secs) if secs >= DAY => format!("{} days ago", secs / DAY),
        Some(secs) if secs >= HOUR => format!("{} hours ago", secs / HOUR),
        Some(secs) if secs >= MINUTE => format!("{} minutes ago", secs / MINUTE),
        Some(_) => "just now".to_string(),
        None => "in the future".to_string(),
    };
    format!("{ts} (unix time, {age})")
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
