//! zlib container format (RFC 1950).
//!
//! A zlib stream is a two-byte header, a raw DEFLATE stream, and a big-endian
//! Adler-32 checksum of the uncompressed data:
//!
//! ```text
//! +-----+-----+====================+---------+
//! | CMF | FLG | DEFLATE data       | ADLER32 |
//! +-----+-----+====================+---------+
//! ```
//!
//! CMF carries the compression method (low nibble, always 8) and the window
//! size exponent (high nibble). FLG carries a check value making the header
//! pair divisible by 31, a preset-dictionary bit, and a compression level
//! hint.

use crate::deflate::{BlockConfig, deflate};
use crate::inflate::inflate;
use ferroflate_core::adler32;
use ferroflate_core::error::{FlateError, Result};

/// CM=8 (DEFLATE), CINFO=7 (32 KiB window).
const CMF: u8 = 0x78;

/// FLG bit for a preset dictionary.
const FDICT: u8 = 0x20;

/// FLEVEL hint: default compression.
const FLEVEL_DEFAULT: u8 = 2;

/// Compress `data` into a zlib stream.
pub fn zlib_compress(data: &[u8], config: BlockConfig) -> Vec<u8> {
    let mut out = Vec::new();

    // FCHECK pads the header pair to a multiple of 31.
    let mut flg = FLEVEL_DEFAULT << 6;
    let value = (CMF as u16) * 256 + flg as u16;
    flg |= (31 - (value % 31) as u8) % 31;
    out.push(CMF);
    out.push(flg);

    out.extend_from_slice(&deflate(data, config));
    out.extend_from_slice(&adler32(data).to_be_bytes());
    out
}

/// Decompress a zlib stream, verifying the header and the Adler-32 trailer.
pub fn zlib_decompress(data: &[u8]) -> Result<Vec<u8>> {
    // 2-byte header plus 4-byte trailer around an (at least empty) stream.
    if data.len() < 6 {
        return Err(FlateError::UnexpectedEndOfInput);
    }

    let (cmf, flg) = (data[0], data[1]);

    let method = cmf & 0x0F;
    if method != 8 {
        return Err(FlateError::invalid_method(method));
    }

    let cinfo = cmf >> 4;
    if cinfo > 7 {
        return Err(FlateError::InvalidWindowSize { cinfo });
    }

    let value = (cmf as u32) * 256 + flg as u32;
    if value % 31 != 0 {
        return Err(FlateError::header_checksum_mismatch(0, value % 31));
    }

    if flg & FDICT != 0 {
        return Err(FlateError::PresetDictionaryUnsupported);
    }

    let payload = &data[2..data.len() - 4];
    let decompressed = inflate(payload)?;

    let trailer = &data[data.len() - 4..];
    let expected = u32::from_be_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);
    let found = adler32(&decompressed);
    if expected != found {
        return Err(FlateError::trailer_checksum_mismatch(expected, found));
    }

    Ok(decompressed)
}
