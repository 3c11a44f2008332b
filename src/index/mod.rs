pub mod build;
pub mod encoder;
pub mod reader;
pub mod stats;
pub mod types;
pub mod writer;

pub use encoder::DictionaryEncoder;
pub use reader::FilterReader;
pub use types::*;
pub use writer::FilterWriter;
