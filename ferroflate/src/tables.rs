//! Fixed code tables and symbol conversions for DEFLATE (RFC 1951).
//!
//! Length codes 257-285 encode match lengths 3-258 and distance codes 0-29
//! encode distances 1-32768, each as a base value plus a run of extra bits
//! carrying the offset within the code's range.

/// Maximum code width in DEFLATE (15 bits).
pub const MAX_CODE_WIDTH: u8 = 15;

/// Maximum width of code-length codes in a dynamic header (7 bits).
pub const MAX_CODELEN_WIDTH: u8 = 7;

/// Size of the literal/length alphabet used by dynamic blocks (0-285).
pub const LITLEN_ALPHABET_SIZE: usize = 286;

/// Size of the literal/length alphabet of the static table (0-287).
pub const STATIC_LITLEN_ALPHABET_SIZE: usize = 288;

/// Size of the distance alphabet (0-29).
pub const DISTANCE_ALPHABET_SIZE: usize = 30;

/// Size of the code-length alphabet (0-18).
pub const CODELEN_ALPHABET_SIZE: usize = 19;

/// End of block symbol.
pub const END_OF_BLOCK: u16 = 256;

/// Fixed literal/length code widths (RFC 1951 Section 3.2.6).
///
/// - Symbols 0-143: 8 bits
/// - Symbols 144-255: 9 bits
/// - Symbols 256-279: 7 bits
/// - Symbols 280-287: 8 bits
pub fn fixed_litlen_widths() -> [u8; STATIC_LITLEN_ALPHABET_SIZE] {
    let mut widths = [0u8; STATIC_LITLEN_ALPHABET_SIZE];
    let mut i = 0;
    while i < 144 {
        widths[i] = 8;
        i += 1;
    }
    while i < 256 {
        widths[i] = 9;
        i += 1;
    }
    while i < 280 {
        widths[i] = 7;
        i += 1;
    }
    while i < 288 {
        widths[i] = 8;
        i += 1;
    }
    widths
}

/// Fixed distance code widths: all 30 codes use 5 bits.
pub fn fixed_distance_widths() -> [u8; DISTANCE_ALPHABET_SIZE] {
    [5u8; DISTANCE_ALPHABET_SIZE]
}

/// Base length values for codes 257-285 (RFC 1951 Section 3.2.5).
pub const LENGTH_BASE: [u16; 29] = [
    3, 4, 5, 6, 7, 8, 9, 10, // 257-264: 0 extra bits
    11, 13, 15, 17, // 265-268: 1 extra bit
    19, 23, 27, 31, // 269-272: 2 extra bits
    35, 43, 51, 59, // 273-276: 3 extra bits
    67, 83, 99, 115, // 277-280: 4 extra bits
    131, 163, 195, 227, // 281-284: 5 extra bits
    258, // 285: 0 extra bits
];

/// Extra-bit counts for length codes 257-285.
pub const LENGTH_EXTRA_BITS: [u8; 29] = [
    0, 0, 0, 0, 0, 0, 0, 0, //
    1, 1, 1, 1, //
    2, 2, 2, 2, //
    3, 3, 3, 3, //
    4, 4, 4, 4, //
    5, 5, 5, 5, //
    0,
];

/// Base distance values for codes 0-29 (RFC 1951 Section 3.2.5).
pub const DISTANCE_BASE: [u16; 30] = [
    1, 2, 3, 4, //
    5, 7, //
    9, 13, //
    17, 25, //
    33, 49, //
    65, 97, //
    129, 193, //
    257, 385, //
    513, 769, //
    1025, 1537, //
    2049, 3073, //
    4097, 6145, //
    8193, 12289, //
    16385, 24577,
];

/// Extra-bit counts for distance codes 0-29.
pub const DISTANCE_EXTRA_BITS: [u8; 30] = [
    0, 0, 0, 0, //
    1, 1, //
    2, 2, //
    3, 3, //
    4, 4, //
    5, 5, //
    6, 6, //
    7, 7, //
    8, 8, //
    9, 9, //
    10, 10, //
    11, 11, //
    12, 12, //
    13, 13,
];

/// Transmission order of code-length code widths in a dynamic header
/// (RFC 1951 Section 3.2.7).
pub const CODELEN_ORDER: [usize; 19] = [
    16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15,
];

/// Convert a match length (3-258) to `(code, extra_bits, extra_value)`.
pub fn length_to_code(length: u16) -> (u16, u8, u16) {
    debug_assert!((3..=258).contains(&length), "length out of range: {length}");

    // Scan for the last code whose base does not exceed the length. 258 hits
    // its own base and therefore resolves to code 285, not 281 + extra.
    let mut idx = LENGTH_BASE.len() - 1;
    while LENGTH_BASE[idx] > length {
        idx -= 1;
    }

    let code = (idx + 257) as u16;
    let extra_bits = LENGTH_EXTRA_BITS[idx];
    let extra_value = length - LENGTH_BASE[idx];
    (code, extra_bits, extra_value)
}

/// Convert a distance (1-32768) to `(code, extra_bits, extra_value)`.
pub fn distance_to_code(distance: u16) -> (u16, u8, u16) {
    debug_assert!(distance >= 1, "distance out of range: {distance}");

    let mut idx = DISTANCE_BASE.len() - 1;
    while DISTANCE_BASE[idx] > distance {
        idx -= 1;
    }

    let extra_bits = DISTANCE_EXTRA_BITS[idx];
    let extra_value = distance - DISTANCE_BASE[idx];
    (idx as u16, extra_bits, extra_value)
}

/// Decode a match length from a length code (257-285) and its extra bits.
pub fn decode_length(code: u16, extra: u16) -> u16 {
    debug_assert!((257..=285).contains(&code), "invalid length code: {code}");
    LENGTH_BASE[(code - 257) as usize] + extra
}

/// Decode a distance from a distance code (0-29) and its extra bits.
pub fn decode_distance(code: u16, extra: u16) -> u16 {
    debug_assert!(code < 30, "invalid distance code: {code}");
    DISTANCE_BASE[code as usize] + extra
}
