//! Engine configuration.
//!
//! The defaults reproduce the classic 12-bit LZW setup: a 4096-entry dictionary that stops
//! growing once full, with every code costing 12 bits.

use crate::error::{Error, Result};

/// Number of single-byte entries every LZW dictionary starts with.
pub const ALPHABET_SIZE: usize = 256;

/// Default maximum number of LZW dictionary entries.
pub const DEFAULT_MAX_DICT_SIZE: usize = 4096;

/// Largest dictionary addressable with 16-bit codes.
pub const MAX_DICT_SIZE_LIMIT: usize = 1 << 16;

/// What the LZW encoder does when its dictionary is full.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Stop adding phrases and keep encoding with the existing table.
    #[default]
    Freeze,
    /// Return to the single-byte table and keep growing from there.
    Reset,
}

/// How many bits each emitted LZW code is charged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CodeWidth {
    /// Width needed to address the full dictionary.
    #[default]
    Fixed,
    /// Width needed for the largest code actually emitted.
    Minimal,
}

/// LZW dictionary and size accounting settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LzwConfig {
    max_dict_size: usize,
    overflow: OverflowPolicy,
    code_width: CodeWidth,
}

impl LzwConfig {
    /// Creates a configuration.
    ///
    /// # Arguments
    ///
    /// * `max_dict_size` - Maximum number of dictionary entries, between 256 and 65536
    /// * `overflow` - Behaviour once the dictionary is full
    /// * `code_width` - Size accounting rule for emitted codes
    pub fn new(
        max_dict_size: usize,
        overflow: OverflowPolicy,
        code_width: CodeWidth,
    ) -> Result<Self> {
        if !(ALPHABET_SIZE..=MAX_DICT_SIZE_LIMIT).contains(&max_dict_size) {
            return Err(Error::invalid_input(format!(
                "dictionary size {max_dict_size} must be between {ALPHABET_SIZE} and {MAX_DICT_SIZE_LIMIT}"
            )));
        }

        Ok(Self {
            max_dict_size,
            overflow,
            code_width,
        })
    }

    pub fn max_dict_size(&self) -> usize {
        self.max_dict_size
    }

    pub fn overflow(&self) -> OverflowPolicy {
        self.overflow
    }

    pub fn code_width(&self) -> CodeWidth {
        self.code_width
    }

    /// Bits needed to address every code of a full dictionary.
    pub fn fixed_width(&self) -> u32 {
        crate::compression::bits::bits_for((self.max_dict_size - 1) as u64)
    }
}

impl Default for LzwConfig {
    fn default() -> Self {
        Self {
            max_dict_size: DEFAULT_MAX_DICT_SIZE,
            overflow: OverflowPolicy::Freeze,
            code_width: CodeWidth::Fixed,
        }
    }
}

/// Settings for a full comparison run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompareConfig {
    /// LZW settings.
    pub lzw: LzwConfig,
    /// Run the two codecs on the rayon pool instead of one after the other.
    pub parallel: bool,
}
