//! Canonical Huffman coding for DEFLATE.
//!
//! Everything a table needs to cross the wire is an array of per-symbol code
//! widths: both the encode table and the decode table are derived from widths
//! alone, using the canonical assignment rule of RFC 1951 (symbols sorted by
//! `(width, symbol)` receive consecutive code values, left-shifted whenever
//! the width steps up).
//!
//! Codes are stored bit-reversed. The DEFLATE bit stream is LSB-first while
//! canonical codes are built MSB-first; reversing at construction time lets
//! the decoder consume one bit at a time without buffering a whole code.
//!
//! Width construction from frequencies uses the package-merge algorithm,
//! which produces optimal codes under a hard width limit (15 bits for the
//! main alphabets, 7 for the code-length alphabet of a dynamic header).

use crate::tables::MAX_CODE_WIDTH;
use ferroflate_core::BitReader;
use ferroflate_core::error::{FlateError, Result};

/// A single canonical code: value plus width, already bit-reversed for the
/// LSB-first stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HuffmanCode {
    /// Code value, reversed, right-aligned.
    pub bits: u32,
    /// Code width in bits (1-15). Zero means the symbol has no code.
    pub width: u8,
}

/// Reverse the low `width` bits of `value`.
fn reverse_bits(mut value: u32, width: u8) -> u32 {
    let mut reversed = 0u32;
    for _ in 0..width {
        reversed = (reversed << 1) | (value & 1);
        value >>= 1;
    }
    reversed
}

// ---------------------------------------------------------------------------
// Width construction (package-merge)
// ---------------------------------------------------------------------------

/// A node in the package-merge arena: either an original symbol or a package
/// of two earlier nodes.
#[derive(Debug, Clone, Copy)]
enum NodeKind {
    Leaf(u16),
    Package(u32, u32),
}

/// Build length-limited code widths from symbol frequencies.
///
/// Returns one width per symbol; zero-frequency symbols get width 0. The
/// result always satisfies the Kraft inequality and never exceeds
/// `max_width`, provided the number of used symbols fits in `max_width` bits.
///
/// Ordering is deterministic: leaves are sorted by `(frequency, symbol)` and
/// merges keep leaves ahead of equal-weight packages, so equal inputs always
/// produce identical width arrays.
pub fn build_widths(frequencies: &[u32], max_width: u8) -> Vec<u8> {
    let mut widths = vec![0u8; frequencies.len()];

    let mut leaves: Vec<(u32, u16)> = frequencies
        .iter()
        .enumerate()
        .filter(|&(_, &f)| f > 0)
        .map(|(sym, &f)| (f, sym as u16))
        .collect();

    match leaves.len() {
        0 => return widths,
        1 => {
            widths[leaves[0].1 as usize] = 1;
            return widths;
        }
        _ => {}
    }

    leaves.sort(); // ascending (frequency, symbol)

    // Arena of nodes; packages reference children by index so counting a
    // symbol's occurrences is a walk over index pairs, no per-round clones.
    let mut arena: Vec<(u64, NodeKind)> = leaves
        .iter()
        .map(|&(f, sym)| (f as u64, NodeKind::Leaf(sym)))
        .collect();
    let leaf_ids: Vec<u32> = (0..arena.len() as u32).collect();

    let mut current = leaf_ids.clone();
    for _ in 0..max_width - 1 {
        // Package adjacent pairs; an unpaired trailing node is dropped.
        let mut packages = Vec::with_capacity(current.len() / 2);
        let mut i = 0;
        while i + 1 < current.len() {
            let (a, b) = (current[i], current[i + 1]);
            let weight = arena[a as usize].0 + arena[b as usize].0;
            arena.push((weight, NodeKind::Package(a, b)));
            packages.push(arena.len() as u32 - 1);
            i += 2;
        }

        // Merge the packages back into the leaf list, preserving weight
        // order with leaves ahead of equal-weight packages.
        let mut merged = Vec::with_capacity(leaf_ids.len() + packages.len());
        let (mut li, mut pi) = (0, 0);
        while li < leaf_ids.len() && pi < packages.len() {
            if arena[leaf_ids[li] as usize].0 <= arena[packages[pi] as usize].0 {
                merged.push(leaf_ids[li]);
                li += 1;
            } else {
                merged.push(packages[pi]);
                pi += 1;
            }
        }
        merged.extend_from_slice(&leaf_ids[li..]);
        merged.extend_from_slice(&packages[pi..]);
        current = merged;
    }

    // A symbol's width is the number of selected nodes containing it; the
    // selection is the 2n - 2 lightest nodes of the final list.
    let mut stack: Vec<u32> = Vec::new();
    for &id in &current[..2 * leaves.len() - 2] {
        stack.push(id);
        while let Some(id) = stack.pop() {
            match arena[id as usize].1 {
                NodeKind::Leaf(sym) => widths[sym as usize] += 1,
                NodeKind::Package(a, b) => {
                    stack.push(a);
                    stack.push(b);
                }
            }
        }
    }

    widths
}

// ---------------------------------------------------------------------------
// Encode table
// ---------------------------------------------------------------------------

/// Encode-side canonical table: one [`HuffmanCode`] per symbol.
#[derive(Debug, Clone)]
pub struct HuffmanEncoder {
    codes: Vec<HuffmanCode>,
}

impl HuffmanEncoder {
    /// Build the canonical encode table from per-symbol widths.
    pub fn from_widths(widths: &[u8]) -> Self {
        // First code of each width (RFC 1951 algorithm).
        let mut width_count = [0u32; MAX_CODE_WIDTH as usize + 1];
        for &w in widths {
            if w > 0 {
                width_count[w as usize] += 1;
            }
        }

        let mut next_code = [0u32; MAX_CODE_WIDTH as usize + 1];
        let mut code = 0u32;
        for width in 1..=MAX_CODE_WIDTH as usize {
            code = (code + width_count[width - 1]) << 1;
            next_code[width] = code;
        }

        // Ascending symbol order within each width gives the (width, symbol)
        // canonical ordering.
        let mut codes = vec![HuffmanCode { bits: 0, width: 0 }; widths.len()];
        for (symbol, &width) in widths.iter().enumerate() {
            if width > 0 {
                let value = next_code[width as usize];
                next_code[width as usize] += 1;
                codes[symbol] = HuffmanCode {
                    bits: reverse_bits(value, width),
                    width,
                };
            }
        }

        Self { codes }
    }

    /// The code for `symbol`. Width 0 means the symbol is absent.
    #[inline]
    pub fn code(&self, symbol: u16) -> HuffmanCode {
        self.codes[symbol as usize]
    }

    /// Number of symbols in the table.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether the table holds no symbols at all.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Decode table
// ---------------------------------------------------------------------------

/// Decode-side canonical table: per-width symbol counts plus a flat
/// translation array of symbols sorted by `(width, symbol)`.
///
/// Decoding is a bit-by-bit canonical descent, at most 15 bit reads per
/// symbol. DEFLATE rebuilds tables for every dynamic block, so this trades
/// the O(1) lookup-table decode for construction that is linear in the
/// alphabet with no table-size blow-up.
#[derive(Debug, Clone)]
pub struct HuffmanDecoder {
    /// Number of codes of each width; index 0 unused.
    counts: [u16; MAX_CODE_WIDTH as usize + 1],
    /// Symbols ordered by (width, symbol).
    translation: Vec<u16>,
    /// Largest width present.
    max_width: u8,
}

impl HuffmanDecoder {
    /// Build the canonical decode table from per-symbol widths.
    ///
    /// Fails on widths above 15 and on over-subscribed tables (more codes of
    /// some width than the code space can hold). An all-zero width array
    /// yields an empty table whose `decode` always fails; dynamic blocks use
    /// that shape for an unused distance alphabet.
    pub fn from_widths(widths: &[u8]) -> Result<Self> {
        let mut counts = [0u16; MAX_CODE_WIDTH as usize + 1];
        let mut max_width = 0u8;

        for &w in widths {
            if w > MAX_CODE_WIDTH {
                return Err(FlateError::corrupted(format!(
                    "code width {w} exceeds maximum {MAX_CODE_WIDTH}"
                )));
            }
            if w > 0 {
                counts[w as usize] += 1;
                max_width = max_width.max(w);
            }
        }

        // Over-subscription check: walk the code space width by width.
        let mut available = 1i32;
        for width in 1..=MAX_CODE_WIDTH as usize {
            available = (available << 1) - counts[width] as i32;
            if available < 0 {
                return Err(FlateError::corrupted("over-subscribed Huffman table"));
            }
        }

        // Translation array: symbols ascending within ascending width.
        let mut offsets = [0usize; MAX_CODE_WIDTH as usize + 2];
        for width in 1..=MAX_CODE_WIDTH as usize {
            offsets[width + 1] = offsets[width] + counts[width] as usize;
        }

        let mut translation = vec![0u16; offsets[MAX_CODE_WIDTH as usize + 1]];
        let mut cursor = [0usize; MAX_CODE_WIDTH as usize + 1];
        for (symbol, &w) in widths.iter().enumerate() {
            if w > 0 {
                let w = w as usize;
                translation[offsets[w] + cursor[w]] = symbol as u16;
                cursor[w] += 1;
            }
        }

        Ok(Self {
            counts,
            translation,
            max_width,
        })
    }

    /// Decode one symbol from the stream.
    #[inline]
    pub fn decode(&self, reader: &mut BitReader<'_>) -> Result<u16> {
        // Canonical descent: accumulate the code MSB-first (the stream is
        // LSB-first per code, which is why codes were reversed on encode),
        // tracking the first code value and translation offset per width.
        let mut code = 0u32;
        let mut first = 0u32;
        let mut index = 0usize;

        for width in 1..=self.max_width as usize {
            code |= reader.read_bits(1)?;
            let count = self.counts[width] as u32;
            if code < first + count {
                return Ok(self.translation[index + (code - first) as usize]);
            }
            index += count as usize;
            first = (first + count) << 1;
            code <<= 1;
        }

        Err(FlateError::huffman_out_of_bounds(self.translation.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferroflate_core::BitWriter;

    #[test]
    fn test_reverse_bits() {
        assert_eq!(reverse_bits(0b101, 3), 0b101);
        assert_eq!(reverse_bits(0b1100, 4), 0b0011);
        assert_eq!(reverse_bits(0b10101010, 8), 0b01010101);
    }

    #[test]
    fn test_canonical_assignment() {
        // Widths A=1, B=2, C=2 -> canonical codes A=0, B=10, C=11.
        let encoder = HuffmanEncoder::from_widths(&[1, 2, 2]);
        assert_eq!(encoder.code(0), HuffmanCode { bits: 0b0, width: 1 });
        // 10 reversed = 01, 11 reversed = 11.
        assert_eq!(encoder.code(1), HuffmanCode { bits: 0b01, width: 2 });
        assert_eq!(encoder.code(2), HuffmanCode { bits: 0b11, width: 2 });
    }

    #[test]
    fn test_decode_simple() {
        let widths = [1u8, 2, 2];
        let decoder = HuffmanDecoder::from_widths(&widths).unwrap();

        // A B C A, LSB-first: 0, 01, 11, 0 -> 0b00011010 = 0x1A
        let data = [0b0001_1010u8];
        let mut reader = BitReader::new(&data);
        assert_eq!(decoder.decode(&mut reader).unwrap(), 0);
        assert_eq!(decoder.decode(&mut reader).unwrap(), 1);
        assert_eq!(decoder.decode(&mut reader).unwrap(), 2);
        assert_eq!(decoder.decode(&mut reader).unwrap(), 0);
    }

    #[test]
    fn test_encode_decode_consistency() {
        // Skewed frequencies over a 12-symbol alphabet.
        let freqs = [900u32, 450, 225, 112, 56, 28, 14, 7, 3, 2, 1, 1];
        let widths = build_widths(&freqs, MAX_CODE_WIDTH);

        let encoder = HuffmanEncoder::from_widths(&widths);
        let decoder = HuffmanDecoder::from_widths(&widths).unwrap();

        let mut writer = BitWriter::new();
        for symbol in 0..freqs.len() as u16 {
            let code = encoder.code(symbol);
            assert!(code.width > 0);
            writer.write_bits(code.bits, code.width);
        }
        let bytes = writer.into_bytes();

        let mut reader = BitReader::new(&bytes);
        for symbol in 0..freqs.len() as u16 {
            assert_eq!(decoder.decode(&mut reader).unwrap(), symbol);
        }
    }

    #[test]
    fn test_build_widths_empty_and_single() {
        assert_eq!(build_widths(&[0, 0, 0], 15), vec![0, 0, 0]);
        assert_eq!(build_widths(&[0, 7, 0], 15), vec![0, 1, 0]);
    }

    #[test]
    fn test_build_widths_two_symbols() {
        // Two symbols always get one bit each, whatever the weights.
        assert_eq!(build_widths(&[1, 1000], 15), vec![1, 1]);
    }

    #[test]
    fn test_build_widths_known_tree() {
        // Weights 1, 1, 4: classic tree puts the heavy symbol at depth 1.
        assert_eq!(build_widths(&[1, 1, 4], 15), vec![2, 2, 1]);
    }

    #[test]
    fn test_build_widths_respects_limit() {
        // Fibonacci-ish weights force deep unlimited trees; the limit must
        // clamp them while keeping the Kraft sum valid.
        let freqs: Vec<u32> = [1, 1, 2, 3, 5, 8, 13, 21, 34, 55, 89, 144].into();
        for limit in [4u8, 5, 7, 15] {
            let widths = build_widths(&freqs, limit);
            let mut kraft = 0u64;
            for &w in &widths {
                assert!(w > 0 && w <= limit, "width {w} exceeds limit {limit}");
                kraft += 1u64 << (limit - w);
            }
            assert!(kraft <= 1u64 << limit, "Kraft violated at limit {limit}");
        }
    }

    #[test]
    fn test_build_widths_deterministic_ties() {
        let freqs = [5u32, 5, 5, 5, 5];
        assert_eq!(build_widths(&freqs, 15), build_widths(&freqs, 15));
    }

    #[test]
    fn test_decoder_rejects_oversubscribed() {
        // Three codes of width 1 cannot exist.
        assert!(HuffmanDecoder::from_widths(&[1, 1, 1]).is_err());
    }

    #[test]
    fn test_decoder_rejects_wide_codes() {
        assert!(HuffmanDecoder::from_widths(&[16]).is_err());
    }

    #[test]
    fn test_empty_decoder_always_fails() {
        let decoder = HuffmanDecoder::from_widths(&[0, 0, 0, 0]).unwrap();
        let data = [0xFFu8];
        let mut reader = BitReader::new(&data);
        assert!(decoder.decode(&mut reader).is_err());
    }

    #[test]
    fn test_single_code_decoder() {
        let decoder = HuffmanDecoder::from_widths(&[0, 1, 0]).unwrap();
        let data = [0x00u8];
        let mut reader = BitReader::new(&data);
        assert_eq!(decoder.decode(&mut reader).unwrap(), 1);
    }
}
