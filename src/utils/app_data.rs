use crate::error::SuggestError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "nsuggest";
const CONFIG_FILE: &str = "config.json";
const DEFAULT_FILTER_FILE: &str = "names.bloom";

/// Application configuration stored in the app data directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Number of distinct keys the filter is sized for. Each name yields
    /// one key per prefix plus a terminal key, so this is several times
    /// the number of names.
    #[serde(default = "default_expected_insertions")]
    pub expected_insertions: usize,

    /// Target false positive probability, trades memory for accuracy
    #[serde(default = "default_false_positive_probability")]
    pub false_positive_probability: f64,

    /// Shortest prefix stored in the filter
    #[serde(default = "default_min_prefix_length")]
    pub min_prefix_length: usize,

    /// Suggestion budget used by the CLI when none is given
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,

    /// Entries kept by the lookup cache in interactive mode
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

fn default_expected_insertions() -> usize {
    20_000_000
}

fn default_false_positive_probability() -> f64 {
    0.01
}

fn default_min_prefix_length() -> usize {
    crate::index::MIN_PREFIX_LENGTH
}

fn default_max_suggestions() -> usize {
    10
}

fn default_cache_capacity() -> usize {
    1024
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            expected_insertions: default_expected_insertions(),
            false_positive_probability: default_false_positive_probability(),
            min_prefix_length: default_min_prefix_length(),
            max_suggestions: default_max_suggestions(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

impl AppConfig {
    /// Load config from the app data directory, or return default if not found
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: AppConfig =
            serde_json::from_str(&content).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the filter or encoder would refuse later
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.expected_insertions == 0 {
            return Err(SuggestError::InvalidConfiguration(
                "expected_insertions must be positive".to_string(),
            ));
        }
        let fpp = self.false_positive_probability;
        if !(fpp > 0.0 && fpp < 1.0) {
            return Err(SuggestError::InvalidConfiguration(format!(
                "false_positive_probability must be in (0, 1), got {fpp}"
            )));
        }
        if self.min_prefix_length == 0 {
            return Err(SuggestError::InvalidConfiguration(
                "min_prefix_length must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Get the path to the config file
pub fn get_config_path() -> Result<PathBuf> {
    let app_dir = get_app_data_dir()?;
    Ok(app_dir.join(CONFIG_FILE))
}

/// Default location of the persisted filter
pub fn default_filter_path() -> Result<PathBuf> {
    let app_dir = get_app_data_dir()?;
    Ok(app_dir.join(DEFAULT_FILTER_FILE))
}

/// Get the application data directory
pub fn get_app_data_dir() -> Result<PathBuf> {
    let base = if cfg!(target_os = "macos") {
        dirs::home_dir().map(|h| h.join("Library").join("Application Support"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
    } else {
        // Linux/Unix: use XDG_DATA_HOME or ~/.local/share
        dirs::data_dir()
    };

    let base = base.context("Could not determine app data directory")?;
    let app_dir = base.join(APP_NAME);

    fs::create_dir_all(&app_dir)?;
    Ok(app_dir)
}
