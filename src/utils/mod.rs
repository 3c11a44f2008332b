//! Utility functions and data structures.
//!
//! ## Modules
//!
//! - [`app_data`] - Application data directory and config file
//! - [`bloom`] - Bloom filter over string keys
//! - [`encoding`] - Little-endian integer I/O and line splitting
//! - [`progress`] - Ingestion progress bar

pub mod app_data;
pub mod bloom;
pub mod encoding;
pub mod progress;

pub use app_data::*;
pub use bloom::*;
pub use encoding::*;
