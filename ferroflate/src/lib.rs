//! # Ferroflate
//!
//! A pure Rust implementation of the DEFLATE compressed data format
//! (RFC 1951) and its two standard containers, zlib (RFC 1950) and gzip
//! (RFC 1952). No unsafe code, no C bindings.
//!
//! ## Quick start
//!
//! ```
//! use ferroflate::{BlockConfig, deflate, inflate};
//!
//! let data = b"The quick brown fox jumps over the lazy dog";
//! let compressed = deflate(data, BlockConfig::default());
//! assert_eq!(inflate(&compressed).unwrap(), data);
//! ```
//!
//! Container round trips work the same way:
//!
//! ```
//! use ferroflate::{BlockConfig, gzip_compress, gzip_decompress};
//!
//! let compressed = gzip_compress(b"hello", BlockConfig::default());
//! assert_eq!(gzip_decompress(&compressed).unwrap(), b"hello");
//! ```
//!
//! ## Modules
//!
//! - [`deflate`](crate::deflate()): block encoder ([`BlockConfig`] selects
//!   stored, static, or dynamic blocks and the LZ77 window)
//! - [`inflate`](crate::inflate()): block decoder
//! - [`huffman`]: canonical codes, package-merge width construction
//! - [`lz77`]: prefix-table match finder
//! - [`tables`]: the fixed tables and symbol conversions of RFC 1951
//! - [`zlib`], [`gzip`]: container framing and checksums
//!
//! Compression always succeeds and returns owned bytes; decompression
//! returns [`FlateError`] on any structural violation of the input.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod deflate;
pub mod gzip;
pub mod huffman;
pub mod inflate;
pub mod lz77;
pub mod tables;
pub mod zlib;

// Re-exports for convenience
pub use deflate::{BlockConfig, deflate};
pub use ferroflate_core::{FlateError, Result};
pub use gzip::{GzipHeader, gzip_compress, gzip_decompress, gzip_decompress_with_header};
pub use inflate::inflate;
pub use lz77::{Lz77Token, tokenize};
pub use zlib::{zlib_compress, zlib_decompress};
