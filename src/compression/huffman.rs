//! Huffman entropy coding.
//!
//! Codes are derived from a tree built by repeatedly merging the two lightest nodes. Ties are
//! broken by creation order: leaves are created in ascending symbol order and every merged node
//! is newer than all existing ones, so the same input always yields the same code table. The
//! first node taken from the queue becomes the left (`0`) child.
//!
//! An input with a single distinct symbol produces a tree with no merges. That symbol gets the
//! one-bit code `0`, since an empty code could not be told apart in a bitstream.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

use bitvec::prelude::*;
use log::{debug, trace};

use crate::compression::bits::{self, Bits};
use crate::compression::frequency::FrequencyTable;
use crate::compression::{Codec, EncodedOutput};
use crate::error::{Error, Result};

/// Represents a node in the Huffman tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffmanNode {
    /// A leaf node holds one symbol and its frequency.
    Leaf { symbol: u8, weight: usize },
    /// An internal node owns both children and the sum of their weights.
    Internal {
        weight: usize,
        left: Box<HuffmanNode>,
        right: Box<HuffmanNode>,
    },
}

impl HuffmanNode {
    /// Returns the weight of the node.
    pub fn weight(&self) -> usize {
        match self {
            HuffmanNode::Leaf { weight, .. } => *weight,
            HuffmanNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffmanNode::Leaf { .. })
    }
}

/// Priority queue entry. `BinaryHeap` is a max-heap, so the ordering is reversed to pop the
/// lightest, oldest node first.
#[derive(Debug)]
struct QueueEntry {
    weight: usize,
    order: usize,
    node: Box<HuffmanNode>,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.order == other.order
    }
}

impl Eq for QueueEntry {}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A Huffman tree built from a frequency table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: HuffmanNode,
}

impl HuffmanTree {
    /// Builds the tree for `freq`.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyAlphabet`] if the table has no symbols.
    pub fn build(freq: &FrequencyTable) -> Result<Self> {
        let mut heap: BinaryHeap<QueueEntry> = freq
            .iter()
            .enumerate()
            .map(|(order, (symbol, weight))| QueueEntry {
                weight,
                order,
                node: Box::new(HuffmanNode::Leaf { symbol, weight }),
            })
            .collect();
        let mut next_order = heap.len();

        while heap.len() > 1 {
            let (Some(first), Some(second)) = (heap.pop(), heap.pop()) else {
                break;
            };
            let weight = first.weight + second.weight;
            trace!(
                "merging weights {} and {} into {}",
                first.weight,
                second.weight,
                weight
            );
            heap.push(QueueEntry {
                weight,
                order: next_order,
                node: Box::new(HuffmanNode::Internal {
                    weight,
                    left: first.node,
                    right: second.node,
                }),
            });
            next_order += 1;
        }

        let root = heap.pop().ok_or(Error::EmptyAlphabet)?;
        debug!(
            "built Huffman tree over {} symbols, total weight {}",
            freq.len(),
            root.weight
        );
        Ok(Self { root: *root.node })
    }

    pub fn root(&self) -> &HuffmanNode {
        &self.root
    }

    /// Derives the code of every leaf: `0` for a left branch, `1` for a right one.
    pub fn code_table(&self) -> CodeTable {
        let mut codes = BTreeMap::new();
        assign_codes(&self.root, Bits::new(), &mut codes);
        CodeTable { codes }
    }
}

fn assign_codes(node: &HuffmanNode, prefix: Bits, codes: &mut BTreeMap<u8, Bits>) {
    match node {
        HuffmanNode::Leaf { symbol, .. } => {
            let code = if prefix.is_empty() {
                bitvec![u8, Msb0; 0]
            } else {
                prefix
            };
            codes.insert(*symbol, code);
        }
        HuffmanNode::Internal { left, right, .. } => {
            let mut left_prefix = prefix.clone();
            left_prefix.push(false);
            assign_codes(left, left_prefix, codes);
            let mut right_prefix = prefix;
            right_prefix.push(true);
            assign_codes(right, right_prefix, codes);
        }
    }
}

/// Symbol to bit-string mapping derived from a Huffman tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<u8, Bits>,
}

impl CodeTable {
    /// Code assigned to `symbol`.
    pub fn get(&self, symbol: u8) -> Option<&BitSlice<u8, Msb0>> {
        self.codes.get(&symbol).map(|code| code.as_bitslice())
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// `(symbol, code)` pairs in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &BitSlice<u8, Msb0>)> + '_ {
        self.codes
            .iter()
            .map(|(&symbol, code)| (symbol, code.as_bitslice()))
    }

    /// Checks that no code is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        self.codes.iter().all(|(a, code_a)| {
            self.codes
                .iter()
                .filter(|(b, _)| a != *b)
                .all(|(_, code_b)| !code_b.starts_with(code_a.as_bitslice()))
        })
    }

    /// Builds a binary trie over the codes for bit-by-bit decoding.
    fn decoding_trie(&self) -> Vec<TrieNode> {
        let mut trie = vec![TrieNode::default()];
        for (&symbol, code) in &self.codes {
            let mut current = 0;
            for bit in code.iter().by_vals() {
                let branch = bit as usize;
                let existing = trie[current].children[branch];
                current = match existing {
                    Some(next) => next,
                    None => {
                        trie.push(TrieNode::default());
                        let next = trie.len() - 1;
                        trie[current].children[branch] = Some(next);
                        next
                    }
                };
            }
            trie[current].symbol = Some(symbol);
        }
        trie
    }
}

#[derive(Debug, Default, Clone)]
struct TrieNode {
    children: [Option<usize>; 2],
    symbol: Option<u8>,
}

/// Decodes a bit sequence produced with `table`.
///
/// # Errors
///
/// [`Error::TruncatedBits`] if the bits follow a path no code uses or stop mid-code.
pub fn decode_bits(bits: &BitSlice<u8, Msb0>, table: &CodeTable) -> Result<Vec<u8>> {
    let trie = table.decoding_trie();
    let mut output = Vec::new();
    let mut current = 0;

    for (position, bit) in bits.iter().by_vals().enumerate() {
        current = trie[current].children[bit as usize]
            .ok_or(Error::TruncatedBits { position })?;
        if let Some(symbol) = trie[current].symbol {
            output.push(symbol);
            current = 0;
        }
    }

    if current != 0 {
        return Err(Error::TruncatedBits {
            position: bits.len(),
        });
    }
    Ok(output)
}

/// Huffman-encoded input together with the table needed to decode it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanOutput {
    bits: Bits,
    table: CodeTable,
    original_len: usize,
}

impl HuffmanOutput {
    pub fn bits(&self) -> &BitSlice<u8, Msb0> {
        &self.bits
    }

    pub fn code_table(&self) -> &CodeTable {
        &self.table
    }
}

impl EncodedOutput for HuffmanOutput {
    fn original_len(&self) -> usize {
        self.original_len
    }

    fn size_bits(&self) -> usize {
        self.bits.len()
    }

    fn render(&self) -> String {
        bits::render_bits(&self.bits)
    }

    fn to_bytes(&self) -> Vec<u8> {
        bits::to_padded_bytes(&self.bits)
    }
}

/// Huffman codec. Each `encode` builds its own frequency table, tree and code table.
#[derive(Debug, Clone, Copy, Default)]
pub struct HuffmanCodec;

impl HuffmanCodec {
    pub fn new() -> Self {
        Self
    }

    /// Encodes `input` with an existing code table.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownSymbol`] if `input` contains a symbol `table` has no code for.
    pub fn encode_with(&self, input: &[u8], table: CodeTable) -> Result<HuffmanOutput> {
        let mut bits = Bits::new();
        for &symbol in input {
            let code = table.get(symbol).ok_or(Error::UnknownSymbol(symbol))?;
            bits.extend_from_bitslice(code);
        }
        debug!(
            "Huffman encoded {} symbols into {} bits",
            input.len(),
            bits.len()
        );

        Ok(HuffmanOutput {
            bits,
            table,
            original_len: input.len(),
        })
    }
}

impl Codec for HuffmanCodec {
    const NAME: &'static str = "Huffman";
    type Output = HuffmanOutput;

    fn encode(&self, input: &[u8]) -> Result<HuffmanOutput> {
        let freq = FrequencyTable::from_bytes(input);
        let table = if freq.is_empty() {
            CodeTable::default()
        } else {
            HuffmanTree::build(&freq)?.code_table()
        };
        self.encode_with(input, table)
    }

    fn decode(&self, output: &HuffmanOutput) -> Result<Vec<u8>> {
        decode_bits(&output.bits, &output.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_string(table: &CodeTable, symbol: u8) -> String {
        bits::render_bits(table.get(symbol).unwrap())
    }

    fn table_for(input: &[u8]) -> CodeTable {
        HuffmanTree::build(&FrequencyTable::from_bytes(input))
            .unwrap()
            .code_table()
    }

    #[test]
    fn test_empty_alphabet() {
        let freq = FrequencyTable::from_bytes(b"");
        assert!(matches!(
            HuffmanTree::build(&freq),
            Err(Error::EmptyAlphabet)
        ));
    }

    #[test]
    fn test_tree_weights() {
        let tree = HuffmanTree::build(&FrequencyTable::from_bytes(b"aabccc")).unwrap();
        assert_eq!(tree.root().weight(), 6);
        match tree.root() {
            HuffmanNode::Internal { left, right, .. } => {
                assert_eq!(left.weight(), 3);
                assert!(left.is_leaf());
                assert_eq!(right.weight(), 3);
                assert!(!right.is_leaf());
            }
            HuffmanNode::Leaf { .. } => panic!("root should be internal"),
        }
    }

    #[test]
    fn test_two_symbols() {
        let table = table_for(b"ABABABA");
        // B is lighter, so it is taken first and becomes the left branch.
        assert_eq!(code_string(&table, b'B'), "0");
        assert_eq!(code_string(&table, b'A'), "1");
    }

    #[test]
    fn test_tie_break_is_by_symbol_order() {
        let table = table_for(b"aabccc");
        assert_eq!(code_string(&table, b'c'), "0");
        assert_eq!(code_string(&table, b'b'), "10");
        assert_eq!(code_string(&table, b'a'), "11");
    }

    #[test]
    fn test_code_table_covers_input() {
        let input = b"this is an example for huffman encoding";
        let table = table_for(input);
        for symbol in input {
            assert!(table.get(*symbol).is_some(), "Missing code for {symbol}");
        }
        assert!(table.is_prefix_free());
    }

    #[test]
    fn test_single_symbol_gets_one_bit() {
        let table = table_for(b"aaaaaaaa");
        assert_eq!(table.len(), 1);
        assert_eq!(code_string(&table, b'a'), "0");

        let output = HuffmanCodec.encode(b"aaaaaaaa").unwrap();
        assert_eq!(output.render(), "00000000");
        assert_eq!(output.size_bits(), 8);
        assert_eq!(HuffmanCodec.decode(&output).unwrap(), b"aaaaaaaa");
    }

    #[test]
    fn test_encode_decode() {
        let input = b"huffman coding in rust is fun!";
        let output = HuffmanCodec.encode(input).unwrap();
        assert_eq!(HuffmanCodec.decode(&output).unwrap(), input);
    }

    #[test]
    fn test_sizes_round_up_to_bytes() {
        let output = HuffmanCodec.encode(b"aabccc").unwrap();
        assert_eq!(output.render(), "111110000");
        assert_eq!(output.size_bits(), 9);
        assert_eq!(output.size_bytes(), 2);
        assert_eq!(output.to_bytes(), [0b1111_1000, 0b0000_0000]);
    }

    #[test]
    fn test_empty_input() {
        let output = HuffmanCodec.encode(b"").unwrap();
        assert_eq!(output.size_bits(), 0);
        assert_eq!(output.size_bytes(), 0);
        assert_eq!(output.render(), "");
        assert!(output.code_table().is_empty());
        assert_eq!(output.ratio(), 0.0);
        assert!(HuffmanCodec.decode(&output).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_symbol() {
        let table = table_for(b"abc");
        assert!(matches!(
            HuffmanCodec.encode_with(b"abd", table),
            Err(Error::UnknownSymbol(b'd'))
        ));
    }

    #[test]
    fn test_decode_rejects_partial_code() {
        let table = table_for(b"aabccc");
        let bits = bits::parse_bits("1").unwrap();
        assert!(matches!(
            decode_bits(&bits, &table),
            Err(Error::TruncatedBits { position: 1 })
        ));
    }

    #[test]
    fn test_decode_rejects_unused_path() {
        let table = table_for(b"zzzz");
        let bits = bits::parse_bits("01").unwrap();
        assert!(matches!(
            decode_bits(&bits, &table),
            Err(Error::TruncatedBits { position: 1 })
        ));
    }

    #[test]
    fn test_decode_rendered_output() {
        let input = b"TOBEORNOTTOBEORTOBEORNOT";
        let output = HuffmanCodec.encode(input).unwrap();
        let parsed = bits::parse_bits(&output.render()).unwrap();
        assert_eq!(decode_bits(&parsed, output.code_table()).unwrap(), input);
    }
}
