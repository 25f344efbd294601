//! DEFLATE decompression (RFC 1951).
//!
//! The decoder walks the block sequence until a block with the final flag has
//! been consumed. Each block is stored (raw bytes behind a LEN/NLEN header),
//! static (the fixed RFC 1951 tables), or dynamic (tables read from a
//! run-length-coded header). Trailing bits after the final block are ignored;
//! container formats own whatever follows.

use crate::huffman::HuffmanDecoder;
use crate::tables::{
    CODELEN_ALPHABET_SIZE, CODELEN_ORDER, DISTANCE_ALPHABET_SIZE, DISTANCE_EXTRA_BITS,
    END_OF_BLOCK, LENGTH_EXTRA_BITS, LITLEN_ALPHABET_SIZE, decode_distance, decode_length,
    fixed_distance_widths, fixed_litlen_widths,
};
use ferroflate_core::error::{FlateError, Result};
use ferroflate_core::{BitReader, OutputBuffer};

/// Decompress a raw DEFLATE stream.
pub fn inflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut reader = BitReader::new(data);
    let mut output = OutputBuffer::new();

    loop {
        let is_final = reader.read_bit()?;
        let btype = reader.read_bits(2)? as u8;

        match btype {
            0b00 => inflate_stored(&mut reader, &mut output)?,
            0b01 => {
                let litlen = HuffmanDecoder::from_widths(&fixed_litlen_widths())?;
                let distance = HuffmanDecoder::from_widths(&fixed_distance_widths())?;
                inflate_block(&mut reader, &mut output, &litlen, &distance)?;
            }
            0b10 => {
                let (litlen, distance) = read_dynamic_tables(&mut reader)?;
                inflate_block(&mut reader, &mut output, &litlen, &distance)?;
            }
            _ => return Err(FlateError::InvalidBlockType { btype }),
        }

        if is_final {
            break;
        }
    }

    Ok(output.into_vec())
}

/// Copy a stored block: byte-align, LEN/NLEN, then raw bytes.
fn inflate_stored(reader: &mut BitReader<'_>, output: &mut OutputBuffer) -> Result<()> {
    reader.align_to_byte();

    let len = reader.read_bits(16)? as u16;
    let nlen = reader.read_bits(16)? as u16;
    if len != !nlen {
        return Err(FlateError::StoredBlockLengthMismatch { len, nlen });
    }

    output.read_from(reader, len as usize)
}

/// Read the dynamic-block header and build the two decode tables.
fn read_dynamic_tables(reader: &mut BitReader<'_>) -> Result<(HuffmanDecoder, HuffmanDecoder)> {
    let hlit = reader.read_bits(5)? as usize + 257;
    let hdist = reader.read_bits(5)? as usize + 1;
    let hclen = reader.read_bits(4)? as usize + 4;

    if hlit > LITLEN_ALPHABET_SIZE {
        return Err(FlateError::corrupted(format!(
            "dynamic header declares {hlit} literal/length codes, maximum is \
             {LITLEN_ALPHABET_SIZE}"
        )));
    }
    if hdist > DISTANCE_ALPHABET_SIZE {
        return Err(FlateError::corrupted(format!(
            "dynamic header declares {hdist} distance codes, maximum is \
             {DISTANCE_ALPHABET_SIZE}"
        )));
    }

    let mut codelen_widths = [0u8; CODELEN_ALPHABET_SIZE];
    for &sym in CODELEN_ORDER.iter().take(hclen) {
        codelen_widths[sym] = reader.read_bits(3)? as u8;
    }
    let codelen = HuffmanDecoder::from_widths(&codelen_widths)?;

    // Literal/length and distance widths share one run-length-coded sequence.
    let total = hlit + hdist;
    let mut widths = Vec::with_capacity(total);
    while widths.len() < total {
        let sym = codelen.decode(reader)?;
        match sym {
            0..=15 => widths.push(sym as u8),
            16 => {
                let Some(&previous) = widths.last() else {
                    return Err(FlateError::corrupted(
                        "code-length repeat with no previous width",
                    ));
                };
                let run = reader.read_bits(2)? as usize + 3;
                extend_widths(&mut widths, previous, run, total)?;
            }
            17 => {
                let run = reader.read_bits(3)? as usize + 3;
                extend_widths(&mut widths, 0, run, total)?;
            }
            18 => {
                let run = reader.read_bits(7)? as usize + 11;
                extend_widths(&mut widths, 0, run, total)?;
            }
            _ => {
                return Err(FlateError::corrupted(format!(
                    "invalid code-length symbol {sym}"
                )));
            }
        }
    }

    let litlen = HuffmanDecoder::from_widths(&widths[..hlit])?;
    let distance = HuffmanDecoder::from_widths(&widths[hlit..])?;
    Ok((litlen, distance))
}

/// Append `run` copies of `width`, refusing to spill past the declared total.
fn extend_widths(widths: &mut Vec<u8>, width: u8, run: usize, total: usize) -> Result<()> {
    if widths.len() + run > total {
        return Err(FlateError::corrupted(
            "code-length run overflows the declared table size",
        ));
    }
    widths.extend(std::iter::repeat_n(width, run));
    Ok(())
}

/// Decode one block's symbol stream up to and including end-of-block.
fn inflate_block(
    reader: &mut BitReader<'_>,
    output: &mut OutputBuffer,
    litlen: &HuffmanDecoder,
    distance: &HuffmanDecoder,
) -> Result<()> {
    loop {
        let sym = litlen.decode(reader)?;
        match sym {
            0..=255 => output.push(sym as u8),
            END_OF_BLOCK => return Ok(()),
            257..=285 => {
                let extra = reader.read_bits(LENGTH_EXTRA_BITS[(sym - 257) as usize])? as u16;
                let length = decode_length(sym, extra);

                let dist_sym = distance.decode(reader)?;
                let extra = reader.read_bits(DISTANCE_EXTRA_BITS[dist_sym as usize])? as u16;
                let dist = decode_distance(dist_sym, extra);

                output.copy_match(dist as usize, length as usize)?;
            }
            _ => {
                return Err(FlateError::corrupted(format!(
                    "invalid literal/length symbol {sym}"
                )));
            }
        }
    }
}
