//! Bit-level helpers shared by the codecs.
//!
//! All packing is most-significant-bit first: the first bit of a sequence lands in the high bit
//! of the first byte, and padding bits at the end of the last byte are zero.

use crate::error::{Error, Result};
use bitvec::prelude::*;

/// Bit sequence type used by every codec.
pub type Bits = BitVec<u8, Msb0>;

/// Number of bits needed to represent `value`, never less than one.
pub fn bits_for(value: u64) -> u32 {
    (u64::BITS - value.leading_zeros()).max(1)
}

/// Whole bytes needed to store `bits` bits.
pub fn bytes_for_bits(bits: usize) -> usize {
    bits.div_ceil(8)
}

/// Packs each code into `width` bits.
///
/// Codes wider than `width` lose their high bits, so callers pick `width` from the largest code.
pub fn pack_codes(codes: &[u16], width: u32) -> Bits {
    let width = width.clamp(1, u16::BITS) as usize;
    let mut bits = Bits::with_capacity(codes.len() * width);
    for code in codes {
        debug_assert!(bits_for(u64::from(*code)) as usize <= width);
        bits.extend_from_bitslice(&code.view_bits::<Msb0>()[u16::BITS as usize - width..]);
    }
    bits
}

/// Reads `width`-bit codes back out of a packed sequence, ignoring a trailing partial code.
pub fn unpack_codes(bits: &BitSlice<u8, Msb0>, width: u32) -> Vec<u16> {
    let width = width.clamp(1, u16::BITS) as usize;
    bits.chunks_exact(width)
        .map(|chunk| chunk.load_be::<u16>())
        .collect()
}

/// Copies a bit sequence into bytes, zero-filling the final partial byte.
pub fn to_padded_bytes(bits: &BitSlice<u8, Msb0>) -> Vec<u8> {
    let mut padded = bits.to_bitvec();
    padded.set_uninitialized(false);
    padded.into_vec()
}

/// Renders bits as a string of '0' and '1' characters.
pub fn render_bits(bits: &BitSlice<u8, Msb0>) -> String {
    bits.iter()
        .map(|bit| if *bit { '1' } else { '0' })
        .collect()
}

/// Parses a '0'/'1' string produced by [`render_bits`].
pub fn parse_bits(text: &str) -> Result<Bits> {
    text.chars()
        .map(|ch| match ch {
            '0' => Ok(false),
            '1' => Ok(true),
            other => Err(Error::invalid_input(format!(
                "unexpected character {other:?} in bit string"
            ))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_for() {
        assert_eq!(bits_for(0), 1);
        assert_eq!(bits_for(1), 1);
        assert_eq!(bits_for(2), 2);
        assert_eq!(bits_for(255), 8);
        assert_eq!(bits_for(256), 9);
        assert_eq!(bits_for(4095), 12);
        assert_eq!(bits_for(65535), 16);
    }

    #[test]
    fn test_bytes_for_bits() {
        assert_eq!(bytes_for_bits(0), 0);
        assert_eq!(bytes_for_bits(1), 1);
        assert_eq!(bytes_for_bits(8), 1);
        assert_eq!(bytes_for_bits(9), 2);
        assert_eq!(bytes_for_bits(48), 6);
    }

    #[test]
    fn test_pack_12_bit_codes() {
        let bits = pack_codes(&[0xABC, 0x123], 12);
        assert_eq!(bits.len(), 24);
        assert_eq!(to_padded_bytes(&bits), [0xAB, 0xC1, 0x23]);
        assert_eq!(unpack_codes(&bits, 12), [0xABC, 0x123]);
    }

    #[test]
    fn test_pack_pads_last_byte_with_zeros() {
        let bits = pack_codes(&[0b101], 3);
        assert_eq!(render_bits(&bits), "101");
        assert_eq!(to_padded_bytes(&bits), [0b1010_0000]);
    }

    #[test]
    fn test_unpack_ignores_padding() {
        let bits = pack_codes(&[1, 2, 3], 9);
        let padded = to_padded_bytes(&bits);
        assert_eq!(padded.len(), 4);
        assert_eq!(unpack_codes(padded.view_bits::<Msb0>(), 9), [1, 2, 3]);
    }

    #[test]
    fn test_render_and_parse() {
        let bits = parse_bits("1010110").unwrap();
        assert_eq!(bits.len(), 7);
        assert_eq!(render_bits(&bits), "1010110");
        assert_eq!(to_padded_bytes(&bits), [0b1010_1100]);
        assert!(parse_bits("10a1").is_err());
        assert!(parse_bits("").unwrap().is_empty());
    }
}
