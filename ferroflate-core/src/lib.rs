//! # Ferroflate Core
//!
//! Core components for the ferroflate DEFLATE codec.
//!
//! This crate provides the leaf building blocks the codec layers on top of:
//!
//! - [`bitstream`]: LSB-first bit-level I/O over in-memory buffers
//! - [`buffer`]: decode-side output buffer with self-overlapping copies
//! - [`crc`]: CRC-32 (ISO 3309), nibble-table driven
//! - [`adler`]: Adler-32 (RFC 1950)
//! - [`error`]: error types
//!
//! ## Architecture
//!
//! Ferroflate is layered the same way the formats are:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ Container: zlib / gzip headers and trailers  │
//! ├──────────────────────────────────────────────┤
//! │ Codec: DEFLATE blocks (LZ77 + Huffman)       │
//! ├──────────────────────────────────────────────┤
//! │ This crate: bits, bytes, checksums, errors   │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Everything here is synchronous and allocation-owned: readers borrow
//! slices, writers own vectors, and no state is shared between calls.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod adler;
pub mod bitstream;
pub mod buffer;
pub mod crc;
pub mod error;

// Re-exports for convenience
pub use adler::{Adler32, adler32};
pub use bitstream::{BitReader, BitWriter};
pub use buffer::OutputBuffer;
pub use crc::{Crc32, crc32};
pub use error::{FlateError, Result};
