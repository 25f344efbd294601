//! Bit-level I/O over in-memory byte buffers.
//!
//! [`BitReader`] and [`BitWriter`] provide the bit-granularity cursors that
//! the DEFLATE codec is built on. Both sides are LSB-first: bits are packed
//! into (and consumed from) the least significant end of each byte, as the
//! DEFLATE wire format requires.
//!
//! The reader borrows a byte slice and the writer owns a `Vec<u8>`; the codec
//! operates on fully materialized inputs, so neither side touches `std::io`.
//! Writes cannot fail, reads fail only by exhausting the input.
//!
//! # Example
//!
//! ```
//! use ferroflate_core::bitstream::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(0b101, 3);
//! writer.write_bits(0b1100, 4);
//! let bytes = writer.into_bytes();
//!
//! let mut reader = BitReader::new(&bytes);
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! assert_eq!(reader.read_bits(4).unwrap(), 0b1100);
//! ```

use crate::error::{FlateError, Result};

/// A bit-level reader over a byte slice.
///
/// Maintains a 64-bit accumulator refilled a whole byte at a time, reading
/// only as many bytes as the input still holds.
#[derive(Debug)]
pub struct BitReader<'a> {
    /// Remaining input bytes (not yet shifted into the accumulator).
    data: &'a [u8],
    /// Next byte offset in `data`.
    pos: usize,
    /// Bit accumulator, LSB-first.
    buffer: u64,
    /// Number of valid bits in `buffer`. Never exceeds 64.
    bits_in_buffer: u8,
}

impl<'a> BitReader<'a> {
    /// Create a new `BitReader` over the given bytes.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            buffer: 0,
            bits_in_buffer: 0,
        }
    }

    /// Ensure at least `count` bits are buffered, pulling in whole bytes.
    #[inline]
    fn fill_buffer(&mut self, count: u8) -> Result<()> {
        while self.bits_in_buffer < count {
            let Some(&byte) = self.data.get(self.pos) else {
                return Err(FlateError::UnexpectedEndOfInput);
            };
            self.buffer |= (byte as u64) << self.bits_in_buffer;
            self.bits_in_buffer += 8;
            self.pos += 1;
        }
        Ok(())
    }

    /// Read up to 32 bits, first bit read landing in the LSB of the result.
    #[inline]
    pub fn read_bits(&mut self, count: u8) -> Result<u32> {
        debug_assert!(count <= 32, "Cannot read more than 32 bits at once");

        if count == 0 {
            return Ok(0);
        }

        self.fill_buffer(count)?;

        let mask = (1u64 << count).wrapping_sub(1);
        let result = (self.buffer & mask) as u32;

        self.buffer >>= count;
        self.bits_in_buffer -= count;

        Ok(result)
    }

    /// Read a single bit.
    #[inline]
    pub fn read_bit(&mut self) -> Result<bool> {
        Ok(self.read_bits(1)? != 0)
    }

    /// Discard partial bits so the cursor sits on a byte boundary.
    ///
    /// Required before the LEN/NLEN fields of a stored block.
    pub fn align_to_byte(&mut self) {
        let remainder = self.bits_in_buffer % 8;
        if remainder > 0 {
            self.buffer >>= remainder;
            self.bits_in_buffer -= remainder;
        }
    }

    /// Copy `count` whole bytes into `out`, draining buffered bytes first.
    ///
    /// The cursor must be byte-aligned.
    pub fn read_bytes(&mut self, out: &mut Vec<u8>, count: usize) -> Result<()> {
        debug_assert!(self.bits_in_buffer % 8 == 0, "read_bytes requires alignment");

        let mut remaining = count;
        while self.bits_in_buffer >= 8 && remaining > 0 {
            out.push((self.buffer & 0xFF) as u8);
            self.buffer >>= 8;
            self.bits_in_buffer -= 8;
            remaining -= 1;
        }

        if remaining > 0 {
            let end = self.pos + remaining;
            if end > self.data.len() {
                return Err(FlateError::UnexpectedEndOfInput);
            }
            out.extend_from_slice(&self.data[self.pos..end]);
            self.pos = end;
        }

        Ok(())
    }

    /// Number of unread bits remaining (buffered plus unconsumed input).
    pub fn bits_remaining(&self) -> usize {
        self.bits_in_buffer as usize + (self.data.len() - self.pos) * 8
    }
}

/// A bit-level writer backed by an owned `Vec<u8>`.
///
/// Bits accumulate LSB-first in a 64-bit register; whole bytes drain into the
/// output vector as they complete. [`flush`](BitWriter::flush) pads the final
/// partial byte with zeros and is idempotent.
#[derive(Debug, Default)]
pub struct BitWriter {
    /// Completed output bytes.
    out: Vec<u8>,
    /// Bit accumulator, LSB-first.
    buffer: u64,
    /// Number of valid bits in `buffer`.
    bits_in_buffer: u8,
}

impl BitWriter {
    /// Create a new empty `BitWriter`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain completed bytes from the accumulator into the output.
    #[inline]
    fn drain_bytes(&mut self) {
        while self.bits_in_buffer >= 8 {
            self.out.push((self.buffer & 0xFF) as u8);
            self.buffer >>= 8;
            self.bits_in_buffer -= 8;
        }
    }

    /// Write the low `count` bits of `value` (0..=32 bits).
    #[inline]
    pub fn write_bits(&mut self, value: u32, count: u8) {
        debug_assert!(count <= 32, "Cannot write more than 32 bits at once");

        if count == 0 {
            return;
        }

        let mask = if count == 32 {
            u32::MAX
        } else {
            (1u32 << count).wrapping_sub(1)
        };

        self.buffer |= ((value & mask) as u64) << self.bits_in_buffer;
        self.bits_in_buffer += count;
        self.drain_bytes();
    }

    /// Write a single bit.
    #[inline]
    pub fn write_bit(&mut self, bit: bool) {
        self.buffer |= (bit as u64) << self.bits_in_buffer;
        self.bits_in_buffer += 1;
        if self.bits_in_buffer >= 8 {
            self.drain_bytes();
        }
    }

    /// Pad with zero bits up to the next byte boundary.
    pub fn align_to_byte(&mut self) {
        let remainder = self.bits_in_buffer % 8;
        if remainder > 0 {
            self.write_bits(0, 8 - remainder);
        }
    }

    /// Append whole bytes. The accumulator must be byte-aligned.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        debug_assert!(
            self.bits_in_buffer % 8 == 0,
            "write_bytes requires alignment"
        );
        self.drain_bytes();
        self.out.extend_from_slice(bytes);
    }

    /// Pad the final partial byte with zeros and drain everything.
    ///
    /// Calling `flush` a second time is a no-op.
    pub fn flush(&mut self) {
        self.align_to_byte();
        self.drain_bytes();
    }

    /// Number of bytes emitted so far (excluding buffered partial bits).
    pub fn byte_len(&self) -> usize {
        self.out.len()
    }

    /// Flush and return the accumulated output.
    pub fn into_bytes(mut self) -> Vec<u8> {
        self.flush();
        self.out
    }
}
