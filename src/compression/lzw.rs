//! LZW dictionary coding.
//!
//! The dictionary starts with the 256 single-byte phrases, code `n` standing for byte `n`. The
//! encoder grows the current phrase while it is still in the dictionary; on the first miss it
//! emits the code of the known phrase, records the extended phrase under the next free code and
//! restarts from the unmatched byte.
//!
//! Growth is capped by [`LzwConfig::max_dict_size`]. What happens at the cap is governed by
//! [`OverflowPolicy`], and the decoder applies the same policy so both sides stay in step.

use std::collections::HashMap;

use log::{debug, trace};

use crate::compression::bits;
use crate::compression::{Codec, EncodedOutput};
use crate::config::{CodeWidth, LzwConfig, OverflowPolicy, ALPHABET_SIZE};
use crate::error::{Error, Result};

/// Phrase dictionary used while encoding.
///
/// A phrase is identified by the code of its prefix plus its final byte, so single-byte phrases
/// need no entry: their code is the byte value itself.
#[derive(Debug, Clone)]
pub struct Dictionary {
    entries: HashMap<(u16, u8), u16>,
    max_size: usize,
    overflow: OverflowPolicy,
    frozen: bool,
}

impl Dictionary {
    pub fn new(config: &LzwConfig) -> Self {
        Self {
            entries: HashMap::new(),
            max_size: config.max_dict_size(),
            overflow: config.overflow(),
            frozen: false,
        }
    }

    /// Number of phrases, including the 256 single-byte ones.
    pub fn len(&self) -> usize {
        ALPHABET_SIZE + self.entries.len()
    }

    pub fn is_full(&self) -> bool {
        self.len() >= self.max_size
    }

    /// Code of the phrase `prefix` followed by `symbol`, if known.
    pub fn find(&self, prefix: u16, symbol: u8) -> Option<u16> {
        self.entries.get(&(prefix, symbol)).copied()
    }

    /// Records `prefix` followed by `symbol` under the next free code.
    ///
    /// When the dictionary is full nothing is recorded: it is either left as is or returned to
    /// the single-byte phrases, depending on the overflow policy.
    pub fn insert(&mut self, prefix: u16, symbol: u8) -> Option<u16> {
        if self.is_full() {
            match self.overflow {
                OverflowPolicy::Freeze => {
                    if !self.frozen {
                        trace!("dictionary full at {} entries, freezing", self.len());
                        self.frozen = true;
                    }
                }
                OverflowPolicy::Reset => {
                    trace!("dictionary full at {} entries, resetting", self.len());
                    self.entries.clear();
                }
            }
            return None;
        }

        let code = self.len() as u16;
        self.entries.insert((prefix, symbol), code);
        Some(code)
    }
}

/// LZW-encoded input: the emitted codes and the width each one is charged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LzwOutput {
    codes: Vec<u16>,
    width: u32,
    original_len: usize,
}

impl LzwOutput {
    pub fn codes(&self) -> &[u16] {
        &self.codes
    }

    /// Bits per code used for size accounting and packing.
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn max_code(&self) -> Option<u16> {
        self.codes.iter().copied().max()
    }
}

impl EncodedOutput for LzwOutput {
    fn original_len(&self) -> usize {
        self.original_len
    }

    fn size_bits(&self) -> usize {
        self.codes.len() * self.width as usize
    }

    fn render(&self) -> String {
        self.codes
            .iter()
            .map(|code| code.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn to_bytes(&self) -> Vec<u8> {
        bits::to_padded_bytes(&bits::pack_codes(&self.codes, self.width))
    }
}

/// LZW codec. Each `encode` builds a fresh dictionary from the configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct LzwCodec {
    config: LzwConfig,
}

impl LzwCodec {
    pub fn new(config: LzwConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LzwConfig {
        &self.config
    }

    fn width_for(&self, codes: &[u16]) -> u32 {
        match self.config.code_width() {
            CodeWidth::Fixed => self.config.fixed_width(),
            CodeWidth::Minimal => {
                bits::bits_for(u64::from(codes.iter().copied().max().unwrap_or(0)))
            }
        }
    }
}

impl Codec for LzwCodec {
    const NAME: &'static str = "LZW";
    type Output = LzwOutput;

    fn encode(&self, input: &[u8]) -> Result<LzwOutput> {
        let mut dictionary = Dictionary::new(&self.config);
        let mut codes = Vec::new();

        if let Some((&first, rest)) = input.split_first() {
            let mut current = u16::from(first);
            for &symbol in rest {
                match dictionary.find(current, symbol) {
                    Some(code) => current = code,
                    None => {
                        codes.push(current);
                        dictionary.insert(current, symbol);
                        current = u16::from(symbol);
                    }
                }
            }
            codes.push(current);
        }

        let width = self.width_for(&codes);
        debug!(
            "LZW encoded {} symbols into {} codes of {} bits, dictionary size {}",
            input.len(),
            codes.len(),
            width,
            dictionary.len()
        );

        Ok(LzwOutput {
            codes,
            width,
            original_len: input.len(),
        })
    }

    fn decode(&self, output: &LzwOutput) -> Result<Vec<u8>> {
        decode_codes(&output.codes, &self.config)
    }
}

fn initial_phrases() -> Vec<Vec<u8>> {
    (0..ALPHABET_SIZE).map(|byte| vec![byte as u8]).collect()
}

/// Rebuilds the input from a code sequence encoded with `config`.
///
/// # Errors
///
/// [`Error::InvalidCode`] if a code refers to a phrase the dictionary cannot hold at that point.
pub fn decode_codes(codes: &[u16], config: &LzwConfig) -> Result<Vec<u8>> {
    let Some((&first, rest)) = codes.split_first() else {
        return Ok(Vec::new());
    };

    let mut phrases = initial_phrases();
    let mut previous = phrases
        .get(first as usize)
        .cloned()
        .ok_or(Error::InvalidCode {
            code: first,
            position: 0,
        })?;
    let mut output = previous.clone();

    for (offset, &code) in rest.iter().enumerate() {
        let position = offset + 1;
        // The encoder recorded a phrase for the previous code unless it was full.
        let full = phrases.len() >= config.max_dict_size();
        if full && config.overflow() == OverflowPolicy::Reset {
            phrases.truncate(ALPHABET_SIZE);
        }

        let index = code as usize;
        let entry = if index < phrases.len() {
            phrases[index].clone()
        } else if index == phrases.len() && !full {
            // The phrase being defined right now: previous plus its own first byte.
            let mut entry = previous.clone();
            entry.push(previous[0]);
            entry
        } else {
            return Err(Error::InvalidCode { code, position });
        };

        output.extend_from_slice(&entry);
        if !full {
            let mut phrase = previous;
            phrase.push(entry[0]);
            phrases.push(phrase);
        }
        previous = entry;
    }

    Ok(output)
}
