use log::debug;

use crate::compression::huffman::{HuffmanCodec, HuffmanOutput};
use crate::compression::lzw::{LzwCodec, LzwOutput};
use crate::compression::{Codec, EncodedOutput};
use crate::config::CompareConfig;
use crate::error::{Error, Result};

/// Sizes and outputs of both codecs for one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionReport {
    original_size: usize,
    lzw: LzwOutput,
    huffman: HuffmanOutput,
}

impl CompressionReport {
    /// Input length in bytes.
    pub fn original_size(&self) -> usize {
        self.original_size
    }

    pub fn lzw(&self) -> &LzwOutput {
        &self.lzw
    }

    pub fn huffman(&self) -> &HuffmanOutput {
        &self.huffman
    }
}

/// Runs both codecs over the same input.
#[derive(Debug, Clone, Copy, Default)]
pub struct Comparator {
    config: CompareConfig,
}

impl Comparator {
    pub fn new(config: CompareConfig) -> Self {
        Self { config }
    }

    /// Compresses `input` with LZW and Huffman.
    ///
    /// `None` means nothing has been loaded and fails with [`Error::NoInput`]. Empty input is
    /// valid and produces a report where every size is zero.
    pub fn compare(&self, input: Option<&[u8]>) -> Result<CompressionReport> {
        let input = input.ok_or(Error::NoInput)?;
        let lzw = LzwCodec::new(self.config.lzw);
        let huffman = HuffmanCodec::new();

        let (lzw, huffman) = if self.config.parallel {
            rayon::join(|| lzw.encode(input), || huffman.encode(input))
        } else {
            (lzw.encode(input), huffman.encode(input))
        };
        let (lzw, huffman) = (lzw?, huffman?);

        debug!(
            "compared {} bytes: {} {} bytes, {} {} bytes",
            input.len(),
            LzwCodec::NAME,
            lzw.size_bytes(),
            HuffmanCodec::NAME,
            huffman.size_bytes()
        );

        Ok(CompressionReport {
            original_size: input.len(),
            lzw,
            huffman,
        })
    }

    /// Compresses the UTF-8 bytes of `text`.
    pub fn compare_str(&self, text: Option<&str>) -> Result<CompressionReport> {
        self.compare(text.map(str::as_bytes))
    }
}

/// Compares with the default configuration.
pub fn compare(input: Option<&[u8]>) -> Result<CompressionReport> {
    Comparator::default().compare(input)
}
