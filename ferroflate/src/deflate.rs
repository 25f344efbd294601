//! DEFLATE compression (RFC 1951).
//!
//! The encoder splits its input into blocks and emits each one according to
//! the selected [`BlockConfig`]:
//!
//! - **Raw**: stored blocks, no compression
//! - **Static**: the fixed Huffman tables of RFC 1951
//! - **Dynamic**: per-block Huffman tables built from symbol frequencies,
//!   transmitted in a run-length-coded header
//!
//! Compression is infallible; output goes to an owned `Vec`.

use crate::huffman::{HuffmanEncoder, build_widths};
use crate::lz77::{Lz77Token, WINDOW_SIZE, tokenize};
use crate::tables::{
    CODELEN_ALPHABET_SIZE, CODELEN_ORDER, DISTANCE_ALPHABET_SIZE, END_OF_BLOCK,
    LITLEN_ALPHABET_SIZE, MAX_CODE_WIDTH, MAX_CODELEN_WIDTH, distance_to_code,
    fixed_distance_widths, fixed_litlen_widths, length_to_code,
};
use ferroflate_core::BitWriter;

/// Compressed blocks cover at most 1 MiB of input, bounding the cost of
/// rebuilding dynamic Huffman tables per block.
pub const MAX_BLOCK_SIZE: usize = 1 << 20;

/// Stored blocks carry a 16-bit length field.
const MAX_STORED_BLOCK: usize = 65535;

/// Block-encoding strategy.
///
/// The `window` of the compressed variants controls LZ77: `None` disables
/// back-references entirely (literal-only streams), `Some(n)` allows
/// references up to `n` bytes back (clamped to the format's 32 KiB).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockConfig {
    /// Stored blocks, no compression.
    Raw,
    /// Fixed Huffman tables.
    Static {
        /// LZ77 window, or `None` for literals only.
        window: Option<usize>,
    },
    /// Per-block Huffman tables.
    Dynamic {
        /// LZ77 window, or `None` for literals only.
        window: Option<usize>,
    },
}

impl Default for BlockConfig {
    /// Dynamic blocks with a full 32 KiB window.
    fn default() -> Self {
        Self::Dynamic {
            window: Some(WINDOW_SIZE),
        }
    }
}

/// Compress `data` into a raw DEFLATE stream.
pub fn deflate(data: &[u8], config: BlockConfig) -> Vec<u8> {
    let mut writer = BitWriter::new();

    match config {
        BlockConfig::Raw => write_stored(&mut writer, data),
        BlockConfig::Static { window } => write_compressed(&mut writer, data, window, false),
        BlockConfig::Dynamic { window } => write_compressed(&mut writer, data, window, true),
    }

    writer.into_bytes()
}

/// Emit `data` as stored blocks of up to 65535 bytes.
fn write_stored(writer: &mut BitWriter, data: &[u8]) {
    let mut chunks = data.chunks(MAX_STORED_BLOCK).peekable();

    // Empty input still needs one (empty) block to carry the final flag.
    if chunks.peek().is_none() {
        write_stored_block(writer, &[], true);
        return;
    }

    while let Some(chunk) = chunks.next() {
        write_stored_block(writer, chunk, chunks.peek().is_none());
    }
}

fn write_stored_block(writer: &mut BitWriter, chunk: &[u8], is_final: bool) {
    writer.write_bit(is_final);
    writer.write_bits(0b00, 2); // BTYPE=00 (stored)
    writer.align_to_byte();

    let len = chunk.len() as u16;
    writer.write_bits(len as u32, 16);
    writer.write_bits(!len as u32, 16);
    writer.write_bytes(chunk);
}

/// Emit `data` as static or dynamic blocks of up to [`MAX_BLOCK_SIZE`].
fn write_compressed(writer: &mut BitWriter, data: &[u8], window: Option<usize>, dynamic: bool) {
    let mut chunks = data.chunks(MAX_BLOCK_SIZE).peekable();

    if chunks.peek().is_none() {
        write_compressed_block(writer, &[], dynamic, true);
        return;
    }

    while let Some(chunk) = chunks.next() {
        let tokens = match window {
            Some(w) => tokenize(chunk, w.min(WINDOW_SIZE)),
            None => chunk.iter().map(|&b| Lz77Token::Literal(b)).collect(),
        };
        write_compressed_block(writer, &tokens, dynamic, chunks.peek().is_none());
    }
}

fn write_compressed_block(
    writer: &mut BitWriter,
    tokens: &[Lz77Token],
    dynamic: bool,
    is_final: bool,
) {
    if dynamic {
        write_dynamic_block(writer, tokens, is_final);
    } else {
        write_static_block(writer, tokens, is_final);
    }
}

/// Write one block using the fixed tables.
fn write_static_block(writer: &mut BitWriter, tokens: &[Lz77Token], is_final: bool) {
    writer.write_bit(is_final);
    writer.write_bits(0b01, 2); // BTYPE=01 (static)

    let litlen = HuffmanEncoder::from_widths(&fixed_litlen_widths());
    let distance = HuffmanEncoder::from_widths(&fixed_distance_widths());
    write_tokens(writer, tokens, &litlen, &distance);
}

/// Write one block with tables built from the block's own frequencies.
fn write_dynamic_block(writer: &mut BitWriter, tokens: &[Lz77Token], is_final: bool) {
    writer.write_bit(is_final);
    writer.write_bits(0b10, 2); // BTYPE=10 (dynamic)

    let (litlen_freq, distance_freq) = count_frequencies(tokens);

    let mut litlen_widths = build_widths(&litlen_freq, MAX_CODE_WIDTH);
    ensure_two_codes(&mut litlen_widths);
    let distance_widths = build_widths(&distance_freq, MAX_CODE_WIDTH);

    // HLIT/HDIST: trim trailing zero widths, keeping the format's minimums.
    let hlit = last_nonzero(&litlen_widths).max(257);
    let hdist = last_nonzero(&distance_widths).max(1);

    let mut combined = Vec::with_capacity(hlit + hdist);
    combined.extend_from_slice(&litlen_widths[..hlit]);
    combined.extend_from_slice(&distance_widths[..hdist]);

    let (codelen_syms, codelen_freq) = rle_encode_widths(&combined);
    let codelen_widths = build_widths(&codelen_freq, MAX_CODELEN_WIDTH);

    // HCLEN: trim trailing zeros in transmission order, minimum 4 entries.
    let mut hclen = CODELEN_ALPHABET_SIZE;
    while hclen > 4 && codelen_widths[CODELEN_ORDER[hclen - 1]] == 0 {
        hclen -= 1;
    }

    writer.write_bits((hlit - 257) as u32, 5);
    writer.write_bits((hdist - 1) as u32, 5);
    writer.write_bits((hclen - 4) as u32, 4);

    for &sym in CODELEN_ORDER.iter().take(hclen) {
        writer.write_bits(codelen_widths[sym] as u32, 3);
    }

    let codelen = HuffmanEncoder::from_widths(&codelen_widths);
    for &(sym, extra, extra_bits) in &codelen_syms {
        let code = codelen.code(sym as u16);
        writer.write_bits(code.bits, code.width);
        if extra_bits > 0 {
            writer.write_bits(extra as u32, extra_bits);
        }
    }

    let litlen = HuffmanEncoder::from_widths(&litlen_widths);
    let distance = HuffmanEncoder::from_widths(&distance_widths);
    write_tokens(writer, tokens, &litlen, &distance);
}

/// Write the symbol stream of a block, EOB included.
fn write_tokens(
    writer: &mut BitWriter,
    tokens: &[Lz77Token],
    litlen: &HuffmanEncoder,
    distance: &HuffmanEncoder,
) {
    for token in tokens {
        match *token {
            Lz77Token::Literal(byte) => {
                let code = litlen.code(byte as u16);
                writer.write_bits(code.bits, code.width);
            }
            Lz77Token::Pointer {
                length,
                distance: dist,
            } => {
                let (len_code, len_extra_bits, len_extra) = length_to_code(length);
                let code = litlen.code(len_code);
                writer.write_bits(code.bits, code.width);
                writer.write_bits(len_extra as u32, len_extra_bits);

                let (dist_code, dist_extra_bits, dist_extra) = distance_to_code(dist);
                let code = distance.code(dist_code);
                writer.write_bits(code.bits, code.width);
                writer.write_bits(dist_extra as u32, dist_extra_bits);
            }
        }
    }

    let eob = litlen.code(END_OF_BLOCK);
    writer.write_bits(eob.bits, eob.width);
}

/// Count literal/length and distance symbol frequencies, EOB included.
fn count_frequencies(
    tokens: &[Lz77Token],
) -> ([u32; LITLEN_ALPHABET_SIZE], [u32; DISTANCE_ALPHABET_SIZE]) {
    let mut litlen = [0u32; LITLEN_ALPHABET_SIZE];
    let mut distance = [0u32; DISTANCE_ALPHABET_SIZE];

    for token in tokens {
        match *token {
            Lz77Token::Literal(byte) => litlen[byte as usize] += 1,
            Lz77Token::Pointer {
                length,
                distance: dist,
            } => {
                let (len_code, _, _) = length_to_code(length);
                litlen[len_code as usize] += 1;
                let (dist_code, _, _) = distance_to_code(dist);
                distance[dist_code as usize] += 1;
            }
        }
    }
    litlen[END_OF_BLOCK as usize] += 1;

    (litlen, distance)
}

/// A table with a single 1-bit code is degenerate; give it a second code so
/// strict decoders accept the emitted tree. Costs one bit per symbol.
fn ensure_two_codes(widths: &mut [u8]) {
    let used = widths.iter().filter(|&&w| w > 0).count();
    if used == 1 {
        let filler = widths.iter().position(|&w| w == 0).unwrap_or(0);
        widths[filler] = 1;
    }
}

/// Index just past the last nonzero width.
fn last_nonzero(widths: &[u8]) -> usize {
    widths
        .iter()
        .rposition(|&w| w > 0)
        .map(|i| i + 1)
        .unwrap_or(0)
}

/// Run-length code a width array with the repeat symbols 16 (copy previous
/// 3-6 times), 17 (3-10 zeros), and 18 (11-138 zeros).
///
/// Returns `(symbol, extra_value, extra_bits)` triples plus the symbol
/// frequencies needed to build the code-length table.
fn rle_encode_widths(widths: &[u8]) -> (Vec<(u8, u8, u8)>, [u32; CODELEN_ALPHABET_SIZE]) {
    let mut syms = Vec::new();
    let mut freq = [0u32; CODELEN_ALPHABET_SIZE];
    let mut emit = |sym: u8, extra: u8, extra_bits: u8| {
        syms.push((sym, extra, extra_bits));
        freq[sym as usize] += 1;
    };

    let mut i = 0;
    while i < widths.len() {
        let w = widths[i];
        let mut run = widths[i..].iter().take_while(|&&x| x == w).count();
        i += run;

        if w == 0 {
            while run > 0 {
                if run >= 11 {
                    let r = run.min(138);
                    emit(18, (r - 11) as u8, 7);
                    run -= r;
                } else if run >= 3 {
                    emit(17, (run - 3) as u8, 3);
                    run = 0;
                } else {
                    emit(0, 0, 0);
                    run -= 1;
                }
            }
        } else {
            emit(w, 0, 0);
            run -= 1;
            while run > 0 {
                if run >= 3 {
                    let r = run.min(6);
                    emit(16, (r - 3) as u8, 2);
                    run -= r;
                } else {
                    emit(w, 0, 0);
                    run -= 1;
                }
            }
        }
    }

    (syms, freq)
}
