//! gzip container format (RFC 1952).
//!
//! A gzip member is a variable-length header, a raw DEFLATE stream, and an
//! eight-byte trailer:
//!
//! ```text
//! +----+----+----+----+------------+----+----+----------+====+-------+-------+
//! | 1F | 8B | CM | FLG|   MTIME    | XFL| OS | optional | .. | CRC32 | ISIZE |
//! +----+----+----+----+------------+----+----+----------+====+-------+-------+
//! ```
//!
//! The optional fields (extra data, file name, comment, header CRC) are
//! selected by FLG bits. The trailer holds the CRC-32 and the length modulo
//! 2^32 of the uncompressed data, both little-endian; this decoder parses the
//! trailer for presence but does not enforce it, so members produced by tools
//! that fill it incorrectly still decode.

use crate::deflate::{BlockConfig, deflate};
use crate::inflate::inflate;
use ferroflate_core::error::{FlateError, Result};
use ferroflate_core::{Crc32, crc32};

/// The two gzip magic bytes.
pub const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// FLG bit assignments of the member header.
pub mod flags {
    /// The content is probably ASCII text.
    pub const FTEXT: u8 = 0x01;
    /// A CRC-16 of the header follows the fixed fields.
    pub const FHCRC: u8 = 0x02;
    /// A length-prefixed extra field is present.
    pub const FEXTRA: u8 = 0x04;
    /// A zero-terminated original file name is present.
    pub const FNAME: u8 = 0x08;
    /// A zero-terminated comment is present.
    pub const FCOMMENT: u8 = 0x10;
    /// Bits that must be zero.
    pub const RESERVED: u8 = 0xE0;
}

/// Parsed gzip member header.
///
/// Name and comment are kept as raw bytes; RFC 1952 declares them ISO 8859-1,
/// which a caller can transcode if it cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GzipHeader {
    /// FTEXT hint from the producer.
    pub text: bool,
    /// Modification time as a Unix timestamp, zero if unset.
    pub mtime: u32,
    /// XFL compression hint.
    pub extra_flags: u8,
    /// Producing operating system, 255 for unknown.
    pub os: u8,
    /// FEXTRA payload, subfield structure untouched.
    pub extra: Option<Vec<u8>>,
    /// Original file name, terminator stripped.
    pub name: Option<Vec<u8>>,
    /// Comment, terminator stripped.
    pub comment: Option<Vec<u8>>,
}

impl GzipHeader {
    /// Parse a member header, returning it with the number of bytes consumed.
    ///
    /// When FHCRC is set, the stored CRC-16 is checked against the CRC-32 of
    /// every header byte that precedes it.
    pub fn parse(data: &[u8]) -> Result<(Self, usize)> {
        if data.len() < 10 {
            return Err(FlateError::UnexpectedEndOfInput);
        }
        if data[..2] != GZIP_MAGIC {
            return Err(FlateError::invalid_magic(GZIP_MAGIC, &data[..2]));
        }

        let method = data[2];
        if method != 8 {
            return Err(FlateError::invalid_method(method));
        }

        let flg = data[3];
        if flg & flags::RESERVED != 0 {
            return Err(FlateError::corrupted(format!(
                "reserved gzip flag bits set: {flg:#04x}"
            )));
        }

        let mtime = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
        let extra_flags = data[8];
        let os = data[9];
        let mut pos = 10;

        let extra = if flg & flags::FEXTRA != 0 {
            let len = read_u16_le(data, &mut pos)? as usize;
            let field = take(data, &mut pos, len)?;
            Some(field.to_vec())
        } else {
            None
        };

        let name = if flg & flags::FNAME != 0 {
            Some(read_terminated(data, &mut pos)?)
        } else {
            None
        };

        let comment = if flg & flags::FCOMMENT != 0 {
            Some(read_terminated(data, &mut pos)?)
        } else {
            None
        };

        if flg & flags::FHCRC != 0 {
            let expected = crc32(&data[..pos]) & 0xFFFF;
            let found = read_u16_le(data, &mut pos)? as u32;
            if expected != found {
                return Err(FlateError::header_checksum_mismatch(expected, found));
            }
        }

        Ok((
            Self {
                text: flg & flags::FTEXT != 0,
                mtime,
                extra_flags,
                os,
                extra,
                name,
                comment,
            },
            pos,
        ))
    }
}

/// Read a little-endian u16 at `*pos`, advancing it.
fn read_u16_le(data: &[u8], pos: &mut usize) -> Result<u16> {
    let bytes = take(data, pos, 2)?;
    Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
}

/// Take `len` bytes at `*pos`, advancing it.
fn take<'a>(data: &'a [u8], pos: &mut usize, len: usize) -> Result<&'a [u8]> {
    let end = pos.checked_add(len).filter(|&e| e <= data.len());
    let Some(end) = end else {
        return Err(FlateError::UnexpectedEndOfInput);
    };
    let slice = &data[*pos..end];
    *pos = end;
    Ok(slice)
}

/// Read a zero-terminated byte string at `*pos`, advancing past the
/// terminator.
fn read_terminated(data: &[u8], pos: &mut usize) -> Result<Vec<u8>> {
    let Some(end) = data[*pos..].iter().position(|&b| b == 0) else {
        return Err(FlateError::UnexpectedEndOfInput);
    };
    let bytes = data[*pos..*pos + end].to_vec();
    *pos += end + 1;
    Ok(bytes)
}

/// Compress `data` into a single-member gzip stream with a minimal header.
pub fn gzip_compress(data: &[u8], config: BlockConfig) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&GZIP_MAGIC);
    out.push(8); // CM: DEFLATE
    out.push(0); // FLG: no optional fields
    out.extend_from_slice(&0u32.to_le_bytes()); // MTIME unset
    out.push(0); // XFL
    out.push(255); // OS: unknown

    out.extend_from_slice(&deflate(data, config));

    let mut crc = Crc32::new();
    crc.update(data);
    out.extend_from_slice(&crc.finalize().to_le_bytes());
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out
}

/// Decompress a gzip member, returning the parsed header alongside the data.
pub fn gzip_decompress_with_header(data: &[u8]) -> Result<(GzipHeader, Vec<u8>)> {
    let (header, consumed) = GzipHeader::parse(data)?;

    // The trailer must be present even though its values are not enforced.
    if data.len() < consumed + 8 {
        return Err(FlateError::UnexpectedEndOfInput);
    }

    let payload = &data[consumed..data.len() - 8];
    let decompressed = inflate(payload)?;
    Ok((header, decompressed))
}

/// Decompress a gzip member.
pub fn gzip_decompress(data: &[u8]) -> Result<Vec<u8>> {
    gzip_decompress_with_header(data).map(|(_, decompressed)| decompressed)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A member with the given FLG and optional field bytes around a stored
    /// DEFLATE payload.
    fn member(flg: u8, optional: &[u8], payload: &[u8]) -> Vec<u8> {
        let mut out = vec![0x1F, 0x8B, 8, flg, 0, 0, 0, 0, 0, 255];
        out.extend_from_slice(optional);
        out.extend_from_slice(&deflate(payload, BlockConfig::Raw));
        out.extend_from_slice(&crc32(payload).to_le_bytes());
        out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        out
    }

    #[test]
    fn test_roundtrip() {
        let input = b"gzip adds a file-oriented header around DEFLATE";
        let compressed = gzip_compress(input, BlockConfig::default());
        assert_eq!(gzip_decompress(&compressed).unwrap(), input);
    }

    #[test]
    fn test_minimal_header_fields() {
        let compressed = gzip_compress(b"x", BlockConfig::Raw);
        let (header, consumed) = GzipHeader::parse(&compressed).unwrap();
        assert_eq!(consumed, 10);
        assert_eq!(header.os, 255);
        assert_eq!(header.mtime, 0);
        assert!(!header.text);
        assert!(header.name.is_none());
    }

    #[test]
    fn test_rejects_bad_magic() {
        let mut compressed = gzip_compress(b"x", BlockConfig::Raw);
        compressed[1] = 0x8C;
        assert_eq!(
            gzip_decompress(&compressed).unwrap_err(),
            FlateError::invalid_magic(GZIP_MAGIC, [0x1F, 0x8C])
        );
    }

    #[test]
    fn test_rejects_bad_method() {
        let mut compressed = gzip_compress(b"x", BlockConfig::Raw);
        compressed[2] = 7;
        assert_eq!(
            gzip_decompress(&compressed).unwrap_err(),
            FlateError::invalid_method(7)
        );
    }

    #[test]
    fn test_rejects_reserved_flags() {
        let data = member(0x40, &[], b"x");
        assert!(matches!(
            gzip_decompress(&data).unwrap_err(),
            FlateError::CorruptedData { .. }
        ));
    }

    #[test]
    fn test_name_and_comment() {
        let mut optional = Vec::new();
        optional.extend_from_slice(b"file.txt\0");
        optional.extend_from_slice(b"a comment\0");
        let data = member(flags::FNAME | flags::FCOMMENT, &optional, b"payload");

        let (header, out) = gzip_decompress_with_header(&data).unwrap();
        assert_eq!(header.name.as_deref(), Some(b"file.txt".as_slice()));
        assert_eq!(header.comment.as_deref(), Some(b"a comment".as_slice()));
        assert_eq!(out, b"payload");
    }

    #[test]
    fn test_extra_field() {
        // Two-byte LE length prefix, then opaque subfield bytes.
        let data = member(flags::FEXTRA, &[4, 0, b'S', b'F', 1, 2], b"payload");
        let (header, _) = gzip_decompress_with_header(&data).unwrap();
        assert_eq!(header.extra.as_deref(), Some([b'S', b'F', 1, 2].as_slice()));
    }

    #[test]
    fn test_header_crc_accepted() {
        // CRC-16 of the ten fixed bytes plus the name field.
        let mut optional = Vec::new();
        optional.extend_from_slice(b"n\0");
        let mut head = vec![0x1F, 0x8B, 8, flags::FHCRC | flags::FNAME, 0, 0, 0, 0, 0, 255];
        head.extend_from_slice(&optional);
        let hcrc = (crc32(&head) & 0xFFFF) as u16;
        optional.extend_from_slice(&hcrc.to_le_bytes());

        let data = member(flags::FHCRC | flags::FNAME, &optional, b"payload");
        assert_eq!(gzip_decompress(&data).unwrap(), b"payload");
    }

    #[test]
    fn test_header_crc_rejected() {
        let data = member(flags::FHCRC, &[0xAA, 0xBB], b"payload");
        assert!(matches!(
            gzip_decompress(&data).unwrap_err(),
            FlateError::HeaderChecksumMismatch { .. }
        ));
    }

    #[test]
    fn test_trailer_not_enforced() {
        let mut compressed = gzip_compress(b"payload", BlockConfig::Raw);
        let len = compressed.len();
        for byte in &mut compressed[len - 8..] {
            *byte ^= 0xFF;
        }
        assert_eq!(gzip_decompress(&compressed).unwrap(), b"payload");
    }

    #[test]
    fn test_missing_trailer() {
        let compressed = gzip_compress(b"payload", BlockConfig::Raw);
        assert_eq!(
            gzip_decompress(&compressed[..compressed.len() - 3]).unwrap_err(),
            FlateError::UnexpectedEndOfInput
        );
    }

    #[test]
    fn test_unterminated_name() {
        let mut data = vec![0x1F, 0x8B, 8, flags::FNAME, 0, 0, 0, 0, 0, 255];
        data.extend_from_slice(b"no terminator");
        assert_eq!(
            GzipHeader::parse(&data).unwrap_err(),
            FlateError::UnexpectedEndOfInput
        );
    }
}
