//! Error types for the comparison engine.

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the codecs and the comparison front end.
#[derive(Debug, Error)]
pub enum Error {
    /// A comparison was requested before any input was loaded.
    #[error("no input provided")]
    NoInput,

    /// A Huffman tree was requested for a frequency table with no symbols.
    #[error("cannot build a Huffman tree from an empty alphabet")]
    EmptyAlphabet,

    /// A parameter is outside its accepted range.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The input contains a symbol the code table has no code for.
    #[error("symbol 0x{0:02x} has no Huffman code")]
    UnknownSymbol(u8),

    /// An LZW code could not be resolved against the dictionary.
    #[error("invalid LZW code {code} at position {position}")]
    InvalidCode { code: u16, position: usize },

    /// A Huffman bit sequence does not end on a code boundary.
    #[error("Huffman bit sequence truncated at bit {position}")]
    TruncatedBits { position: usize },

    /// Reading the input source failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates an [`Error::InvalidInput`] from anything string-like.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Error::InvalidInput(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(Error::NoInput.to_string(), "no input provided");
        assert_eq!(
            Error::UnknownSymbol(b'A').to_string(),
            "symbol 0x41 has no Huffman code"
        );
        assert_eq!(
            Error::InvalidCode {
                code: 300,
                position: 2
            }
            .to_string(),
            "invalid LZW code 300 at position 2"
        );
        assert_eq!(
            Error::invalid_input("bad size").to_string(),
            "invalid input: bad size"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
