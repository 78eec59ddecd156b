pub mod compression;
pub mod config;
pub mod error;

pub use compression::{compare, Codec, Comparator, CompressionReport, EncodedOutput};
pub use config::{CodeWidth, CompareConfig, LzwConfig, OverflowPolicy};
pub use error::{Error, Result};
