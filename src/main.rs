use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nsuggest::index::{self, BuildConfig, FilterReader};
use nsuggest::output;
use nsuggest::query::{
    expand_all, expand_dictionary, validate_prefix, BloomNameLookup, CachedLookup, NameLookup,
    SortedNameLookup, Suggestion,
};
use nsuggest::utils::{default_filter_path, AppConfig};
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::time::Instant;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nsuggest")]
#[command(about = "Prefix name suggestions from a bloom filter")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to config.json in the app data directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a filter from a newline-delimited names file
    Build {
        /// Names file, one name per line
        names: PathBuf,

        /// Where to write the filter
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of keys to size the filter for
        #[arg(long)]
        expected: Option<usize>,

        /// Target false positive probability
        #[arg(long)]
        fpp: Option<f64>,

        /// Shortest prefix to store
        #[arg(long)]
        min_prefix: Option<usize>,

        /// Hide the progress bar
        #[arg(short, long)]
        quiet: bool,
    },
    /// Suggest names for a prefix
    Suggest {
        prefix: String,

        /// Filter file
        #[arg(short, long)]
        filter: Option<PathBuf>,

        /// Suggestion budget
        #[arg(short = 'n', long)]
        max: Option<usize>,

        /// Answer exactly from a names file instead of the filter
        #[arg(long, value_name = "NAMES")]
        exact: Option<PathBuf>,

        /// Explore top-level branches in parallel
        #[arg(long)]
        parallel: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
    /// Read prefixes from stdin and suggest for each line
    Interactive {
        /// Filter file
        #[arg(short, long)]
        filter: Option<PathBuf>,

        /// Suggestion budget
        #[arg(short = 'n', long)]
        max: Option<usize>,
    },
    /// Print every name reachable from a prefix, or the whole dictionary
    Expand {
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        prefix: Option<String>,

        /// Recover every name by expanding each minimum-length prefix
        #[arg(long)]
        all: bool,

        /// Filter file
        #[arg(short, long)]
        filter: Option<PathBuf>,

        /// Budget used for each step of the expansion
        #[arg(short = 'n', long)]
        batch: Option<usize>,
    },
    /// Show filter statistics
    Stats {
        /// Filter file
        #[arg(short, long)]
        filter: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };

    match cli.command {
        Commands::Build {
            names,
            output,
            expected,
            fpp,
            min_prefix,
            quiet,
        } => {
            let mut build_config = BuildConfig::from(&config);
            if let Some(expected) = expected {
                build_config.expected_insertions = expected;
            }
            if let Some(fpp) = fpp {
                build_config.false_positive_probability = fpp;
            }
            if let Some(min_prefix) = min_prefix {
                build_config.min_prefix_length = min_prefix;
            }
            let output = resolve_filter_path(output)?;
            let meta = index::build::build_filter(&names, &output, &build_config, quiet)?;
            println!(
                "Indexed {} of {} names into {}",
                meta.ingest.names_indexed,
                meta.ingest.names_read,
                output.display()
            );
        }
        Commands::Suggest {
            prefix,
            filter,
            max,
            exact,
            parallel,
            no_color,
        } => {
            validate_prefix(&prefix)?;
            let max = max.unwrap_or(config.max_suggestions);
            let tokens = match exact {
                Some(names) => {
                    let data = std::fs::read(&names)
                        .with_context(|| format!("Failed to read names file {}", names.display()))?;
                    let lookup = SortedNameLookup::from_lines(&data, config.min_prefix_length)?;
                    lookup.lookup_tokens(&prefix, max)
                }
                None => {
                    let lookup = load_lookup(filter)?;
                    if parallel {
                        lookup.lookup_parallel(&prefix, max)
                    } else {
                        lookup.lookup_tokens(&prefix, max)
                    }
                }
            };
            let suggestions: Vec<_> = tokens
                .into_iter()
                .map(Suggestion::from_token)
                .collect();
            output::print_suggestions(&suggestions, !no_color)?;
        }
        Commands::Interactive { filter, max } => {
            let reader = FilterReader::open(&resolve_filter_path(filter)?)?;
            let min_prefix = reader.min_prefix_length();
            let lookup = CachedLookup::new(BloomNameLookup::new(reader.into_filter()), config.cache_capacity);
            run_interactive(&lookup, min_prefix, max.unwrap_or(config.max_suggestions))?;
        }
        Commands::Expand {
            prefix,
            all,
            filter,
            batch,
        } => {
            let reader = FilterReader::open(&resolve_filter_path(filter)?)?;
            let min_prefix = reader.min_prefix_length();
            let lookup = BloomNameLookup::new(reader.into_filter());
            let batch = batch.unwrap_or(config.max_suggestions);

            let start = Instant::now();
            let words = match prefix {
                Some(prefix) if !all => {
                    validate_prefix(&prefix)?;
                    if prefix.chars().count() < min_prefix {
                        println!("> {} is too short", prefix);
                        return Ok(());
                    }
                    expand_all(&lookup, &prefix, batch)
                }
                _ => expand_dictionary(&lookup, min_prefix, batch),
            };
            output::print_words(&words)?;
            debug!("Expanded {} names in {:.2?}", words.len(), start.elapsed());
        }
        Commands::Stats { filter } => {
            index::stats::show_stats(&resolve_filter_path(filter)?)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("nsuggest={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn resolve_filter_path(path: Option<PathBuf>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path),
        None => default_filter_path(),
    }
}

fn load_lookup(path: Option<PathBuf>) -> Result<BloomNameLookup> {
    let path = resolve_filter_path(path)?;
    let reader = FilterReader::open(&path)?;
    Ok(BloomNameLookup::new(reader.into_filter()))
}

fn run_interactive<L: NameLookup>(lookup: &CachedLookup<L>, min_prefix: usize, max: usize) -> Result<()> {
    debug!("Ready to suggest. Enter the prefix...");

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let prefix = line.trim();
        if prefix.chars().count() < min_prefix {
            println!("> {} is too short", prefix);
            continue;
        }

        let start = Instant::now();
        match lookup.lookup(prefix, max) {
            Ok(suggestions) => {
                debug!(
                    "Found {} suggestions in {:.2?} (cache hit rate {:.1}%)",
                    suggestions.len(),
                    start.elapsed(),
                    lookup.hit_rate() * 100.0
                );
                output::print_suggestions(&suggestions, true)?;
            }
            Err(e) => println!("> {}", e),
        }
    }

    Ok(())
}
