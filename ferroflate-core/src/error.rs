//! Error types for ferroflate operations.
//!
//! All expected failure paths in the codec are surfaced as values of
//! [`FlateError`]; malformed input aborts the whole decode with no partial
//! result. Encoding has no failure path.

use thiserror::Error;

/// The main error type for ferroflate operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlateError {
    /// Invalid magic bytes at the start of a container.
    #[error("Invalid magic bytes: expected {expected:02x?}, found {found:02x?}")]
    InvalidMagic {
        /// Expected magic bytes.
        expected: Vec<u8>,
        /// Actual bytes found.
        found: Vec<u8>,
    },

    /// Compression method other than DEFLATE (8) in a container header.
    #[error("Unsupported compression method: {method}")]
    InvalidMethod {
        /// The method nibble/byte found in the header.
        method: u8,
    },

    /// The zlib CINFO field claims a window larger than 32 KiB.
    #[error("Invalid window size indicator: {cinfo}")]
    InvalidWindowSize {
        /// The CINFO value found in the header.
        cinfo: u8,
    },

    /// The container requires a preset dictionary, which is not supported.
    #[error("Preset dictionaries are not supported")]
    PresetDictionaryUnsupported,

    /// A header self-check failed (zlib FCHECK or gzip FHCRC).
    #[error("Header checksum mismatch: expected {expected:#06x}, found {found:#06x}")]
    HeaderChecksumMismatch {
        /// Checksum computed over the header bytes.
        expected: u32,
        /// Checksum stored in the header.
        found: u32,
    },

    /// The bit reader was exhausted before a decode completed.
    #[error("Unexpected end of input")]
    UnexpectedEndOfInput,

    /// Reserved DEFLATE block type 3.
    #[error("Invalid block type: {btype}")]
    InvalidBlockType {
        /// The two-bit block type read from the stream.
        btype: u8,
    },

    /// No symbol matched within the maximum code width, or a dynamic-table
    /// header produced a symbol index outside the table.
    #[error("Huffman code resolves outside the symbol table ({symbol_count} symbols)")]
    HuffmanIndexOutOfBounds {
        /// Number of symbols the table actually holds.
        symbol_count: usize,
    },

    /// A stored block's LEN and NLEN fields were not one's complements.
    #[error("Stored block length mismatch: len={len:#06x}, nlen={nlen:#06x}")]
    StoredBlockLengthMismatch {
        /// LEN field as read.
        len: u16,
        /// NLEN field as read.
        nlen: u16,
    },

    /// A back-reference pointed before the start of the produced output.
    #[error("Invalid back-reference distance: {distance} exceeds {available} bytes of output")]
    InvalidDistance {
        /// The offending distance.
        distance: usize,
        /// Bytes of output available at that point.
        available: usize,
    },

    /// The container's trailing checksum did not match the decompressed data.
    #[error("Trailer checksum mismatch: expected {expected:#010x}, found {found:#010x}")]
    TrailerChecksumMismatch {
        /// Checksum computed over the decompressed output.
        expected: u32,
        /// Checksum stored in the trailer.
        found: u32,
    },

    /// A structural violation in the compressed data not covered above.
    #[error("Corrupted data: {message}")]
    CorruptedData {
        /// Description of the violation.
        message: String,
    },
}

/// Result type alias for ferroflate operations.
pub type Result<T> = std::result::Result<T, FlateError>;

impl FlateError {
    /// Create an invalid magic error.
    pub fn invalid_magic(expected: impl Into<Vec<u8>>, found: impl Into<Vec<u8>>) -> Self {
        Self::InvalidMagic {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create an invalid method error.
    pub fn invalid_method(method: u8) -> Self {
        Self::InvalidMethod { method }
    }

    /// Create a header checksum mismatch error.
    pub fn header_checksum_mismatch(expected: u32, found: u32) -> Self {
        Self::HeaderChecksumMismatch { expected, found }
    }

    /// Create a Huffman index error for a table of `symbol_count` symbols.
    pub fn huffman_out_of_bounds(symbol_count: usize) -> Self {
        Self::HuffmanIndexOutOfBounds { symbol_count }
    }

    /// Create an invalid distance error.
    pub fn invalid_distance(distance: usize, available: usize) -> Self {
        Self::InvalidDistance {
            distance,
            available,
        }
    }

    /// Create a trailer checksum mismatch error.
    pub fn trailer_checksum_mismatch(expected: u32, found: u32) -> Self {
        Self::TrailerChecksumMismatch { expected, found }
    }

    /// Create a corrupted data error.
    pub fn corrupted(message: impl Into<String>) -> Self {
        Self::CorruptedData {
            message: message.into(),
        }
    }
}
