//! Compression codecs and their comparison.
//!
//! This module provides two classic lossless encoders that can be run on the same input:
//! - LZW, a dictionary coder that replaces repeated phrases with integer codes
//! - Huffman, an entropy coder that gives frequent bytes shorter bit strings
//!
//! [`report::compare`] runs both and collects their sizes into a [`CompressionReport`].
//!
//! # Examples
//!
//! ```rust
//! use codecmp::compression::{compare, EncodedOutput};
//!
//! let report = compare(Some(b"ABABABA".as_slice())).unwrap();
//! assert_eq!(report.original_size(), 7);
//! assert_eq!(report.huffman().size_bits(), 7);
//! assert_eq!(report.lzw().render(), "65 66 256 258");
//! ```

use crate::error::Result;

pub mod bits;
pub mod frequency;
pub mod huffman;
pub mod lzw;
pub mod report;

pub use frequency::FrequencyTable;
pub use huffman::{CodeTable, HuffmanCodec, HuffmanNode, HuffmanOutput, HuffmanTree};
pub use lzw::{Dictionary, LzwCodec, LzwOutput};
pub use report::{compare, Comparator, CompressionReport};

/// Result of running a codec over an input.
pub trait EncodedOutput {
    /// Length of the input that was encoded, in bytes.
    fn original_len(&self) -> usize;

    /// Exact size of the encoded form in bits.
    fn size_bits(&self) -> usize;

    /// Size in whole bytes; a partial final byte counts as a full one.
    fn size_bytes(&self) -> usize {
        bits::bytes_for_bits(self.size_bits())
    }

    /// Human-readable rendering of the encoded form.
    fn render(&self) -> String;

    /// Compact byte form of the encoded data.
    fn to_bytes(&self) -> Vec<u8>;

    /// Encoded bits over original bits; 0.0 for empty input.
    fn ratio(&self) -> f64 {
        match self.original_len() {
            0 => 0.0,
            len => self.size_bits() as f64 / (len * 8) as f64,
        }
    }
}

/// A lossless encoder that can be compared against the others.
pub trait Codec {
    /// Display name of the algorithm.
    const NAME: &'static str;

    type Output: EncodedOutput;

    /// Encode the input data
    fn encode(&self, input: &[u8]) -> Result<Self::Output>;

    /// Reconstruct the input from an encoded output
    fn decode(&self, output: &Self::Output) -> Result<Vec<u8>>;
}
