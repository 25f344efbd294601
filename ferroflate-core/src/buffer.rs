//! Growable output buffer for INFLATE and the LZ77 window.
//!
//! [`OutputBuffer`] is a thin wrapper around `Vec<u8>` that adds the one
//! operation a DEFLATE decoder needs beyond plain appends: a self-overlapping
//! back-reference copy. A match may read bytes it itself just wrote (distance
//! smaller than length), which is how DEFLATE expresses repeated runs, so the
//! copy must proceed byte by byte from `distance` behind the current write
//! position.

use crate::bitstream::BitReader;
use crate::error::{FlateError, Result};

/// Decode-side byte buffer with history-relative copies.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    data: Vec<u8>,
}

impl OutputBuffer {
    /// Create a new empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer with pre-reserved capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Append a single literal byte.
    #[inline]
    pub fn push(&mut self, byte: u8) {
        self.data.push(byte);
    }

    /// Append a run of literal bytes.
    #[inline]
    pub fn extend_from_slice(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Copy `length` bytes, each read from `distance` bytes behind the
    /// current write position.
    ///
    /// Fails if `distance` reaches before the start of the buffer or is zero.
    pub fn copy_match(&mut self, distance: usize, length: usize) -> Result<()> {
        if distance == 0 || distance > self.data.len() {
            return Err(FlateError::invalid_distance(distance, self.data.len()));
        }

        self.data.reserve(length);
        let mut src = self.data.len() - distance;
        for _ in 0..length {
            let byte = self.data[src];
            self.data.push(byte);
            src += 1;
        }

        Ok(())
    }

    /// Append `count` bytes taken whole from a byte-aligned reader.
    ///
    /// The stored-block path of a decoder lands here.
    pub fn read_from(&mut self, reader: &mut BitReader<'_>, count: usize) -> Result<()> {
        reader.read_bytes(&mut self.data, count)
    }

    /// Byte at index `i`, if written.
    pub fn get(&self, i: usize) -> Option<u8> {
        self.data.get(i).copied()
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// View the produced bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Take ownership of the produced bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}
