//! Adler-32 checksum (RFC 1950).
//!
//! The checksum that guards the zlib container: two running sums `s1` and
//! `s2` with `s1 += byte; s2 += s1`, both modulo 65521 (the largest prime
//! below 2^16), combined as `(s2 << 16) | s1`.
//!
//! The sums are only reduced every [`NMAX`] bytes; 5552 is the largest block
//! for which `s2` cannot overflow a `u32` before the reduction.

/// Largest prime smaller than 65536.
const ADLER_MOD: u32 = 65521;

/// Number of bytes to process before reducing the sums.
const NMAX: usize = 5552;

/// Streaming Adler-32 calculator.
#[derive(Debug, Clone)]
pub struct Adler32 {
    s1: u32,
    s2: u32,
}

impl Adler32 {
    /// Create a new Adler-32 calculator.
    pub fn new() -> Self {
        Self { s1: 1, s2: 0 }
    }

    /// Reset to the initial state.
    pub fn reset(&mut self) {
        self.s1 = 1;
        self.s2 = 0;
    }

    /// Update the checksum with more data.
    pub fn update(&mut self, data: &[u8]) {
        let mut s1 = self.s1;
        let mut s2 = self.s2;

        let mut remaining = data;
        while remaining.len() >= NMAX {
            let (chunk, rest) = remaining.split_at(NMAX);
            remaining = rest;

            for &byte in chunk {
                s1 += byte as u32;
                s2 += s1;
            }

            s1 %= ADLER_MOD;
            s2 %= ADLER_MOD;
        }

        for &byte in remaining {
            s1 += byte as u32;
            s2 += s1;
        }

        self.s1 = s1 % ADLER_MOD;
        self.s2 = s2 % ADLER_MOD;
    }

    /// Finalize and return the checksum.
    pub fn finish(&self) -> u32 {
        (self.s2 << 16) | self.s1
    }

    /// Compute the Adler-32 of a slice in one call.
    pub fn checksum(data: &[u8]) -> u32 {
        let mut adler = Self::new();
        adler.update(data);
        adler.finish()
    }
}

impl Default for Adler32 {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute the Adler-32 of a byte slice.
pub fn adler32(data: &[u8]) -> u32 {
    Adler32::checksum(data)
}
