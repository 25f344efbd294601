//! LZ77 match finding for DEFLATE.
//!
//! The match finder scans the input left to right, replacing repeated byte
//! runs with back-references into already-scanned data. Candidate matches are
//! found through a prefix table mapping each 3-byte prefix to the most recent
//! position where it occurred.
//!
//! # Prefix table
//!
//! Two representations, selected once per call from the input size:
//!
//! - [`PrefixTable::Small`]: a direct prefix -> position map, used while the
//!   whole input fits inside one 32 KiB window.
//! - [`PrefixTable::Large`]: a fixed array of 256 buckets keyed by the
//!   prefix's top byte, each holding an association list of (prefix,
//!   position) pairs. Bounds memory for big inputs at the cost of a chain
//!   walk per lookup.

use std::collections::HashMap;

/// Maximum window size for DEFLATE (32 KiB).
pub const WINDOW_SIZE: usize = 32768;

/// Minimum match length.
pub const MIN_MATCH: usize = 3;

/// Maximum match length.
pub const MAX_MATCH: usize = 258;

/// A token produced by the match finder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lz77Token {
    /// A literal byte.
    Literal(u8),
    /// A back-reference to previously scanned data.
    Pointer {
        /// Number of bytes to copy (3-258).
        length: u16,
        /// Distance back from the current position (1-32768).
        distance: u16,
    },
}

/// Most-recent-position table keyed by 3-byte prefix.
#[derive(Debug)]
enum PrefixTable {
    /// Direct map; fine while every position is inside one window.
    Small(HashMap<u32, u32>),
    /// 256 buckets of association lists, keyed by the prefix's top byte.
    Large(Box<[Vec<(u32, u32)>; 256]>),
}

impl PrefixTable {
    /// Pick the representation for an input of `input_len` bytes.
    fn for_input(input_len: usize) -> Self {
        if input_len < WINDOW_SIZE {
            Self::Small(HashMap::new())
        } else {
            Self::Large(Box::new(std::array::from_fn(|_| Vec::new())))
        }
    }

    /// Record `position` as the latest occurrence of `prefix`, returning the
    /// position it replaces, if any.
    fn insert(&mut self, prefix: u32, position: u32) -> Option<u32> {
        match self {
            Self::Small(map) => map.insert(prefix, position),
            Self::Large(buckets) => {
                let bucket = &mut buckets[(prefix >> 16) as usize];
                for entry in bucket.iter_mut() {
                    if entry.0 == prefix {
                        return Some(std::mem::replace(&mut entry.1, position));
                    }
                }
                bucket.push((prefix, position));
                None
            }
        }
    }
}

/// The 3-byte prefix starting at `i`. Caller guarantees 3 bytes remain.
#[inline]
fn prefix_at(data: &[u8], i: usize) -> u32 {
    (data[i] as u32) << 16 | (data[i + 1] as u32) << 8 | data[i + 2] as u32
}

/// Scan `data` into a token stream, allowing back-references up to
/// `window_size` bytes behind the cursor.
///
/// Every position covered by an emitted pointer is still entered into the
/// prefix table, so later matches can reference the interior of an earlier
/// run.
pub fn tokenize(data: &[u8], window_size: usize) -> Vec<Lz77Token> {
    let mut tokens = Vec::new();
    let mut table = PrefixTable::for_input(data.len());

    let mut i = 0;
    while i < data.len() {
        if data.len() - i < MIN_MATCH {
            // Too short for a prefix; flush the tail as literals.
            while i < data.len() {
                tokens.push(Lz77Token::Literal(data[i]));
                i += 1;
            }
            break;
        }

        let prefix = prefix_at(data, i);
        let candidate = table.insert(prefix, i as u32);

        let matched = candidate.and_then(|j| {
            let j = j as usize;
            let distance = i - j;
            if distance > window_size {
                return None;
            }

            // Extend beyond the guaranteed 3-byte prefix.
            let cap = (data.len() - i).min(MAX_MATCH);
            let mut length = MIN_MATCH;
            while length < cap && data[i + length] == data[j + length] {
                length += 1;
            }
            Some((length, distance))
        });

        match matched {
            Some((length, distance)) => {
                tokens.push(Lz77Token::Pointer {
                    length: length as u16,
                    distance: distance as u16,
                });

                // Enter the skipped positions too.
                for k in i + 1..i + length {
                    if data.len() - k < MIN_MATCH {
                        break;
                    }
                    table.insert(prefix_at(data, k), k as u32);
                }
                i += length;
            }
            None => {
                tokens.push(Lz77Token::Literal(data[i]));
                i += 1;
            }
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reconstruct the original bytes from a token stream.
    fn resolve(tokens: &[Lz77Token]) -> Vec<u8> {
        let mut out = Vec::new();
        for token in tokens {
            match *token {
                Lz77Token::Literal(b) => out.push(b),
                Lz77Token::Pointer { length, distance } => {
                    for _ in 0..length {
                        let pos = out.len() - distance as usize;
                        out.push(out[pos]);
                    }
                }
            }
        }
        out
    }

    #[test]
    fn test_all_distinct_bytes() {
        let input = b"abcdefgh";
        let tokens = tokenize(input, WINDOW_SIZE);
        assert_eq!(tokens.len(), 8);
        assert!(tokens.iter().all(|t| matches!(t, Lz77Token::Literal(_))));
    }

    #[test]
    fn test_repeated_run() {
        // One literal, then a single self-overlapping pointer.
        let input = b"AAAAAAAAAA";
        let tokens = tokenize(input, WINDOW_SIZE);
        assert_eq!(
            tokens,
            vec![
                Lz77Token::Literal(b'A'),
                Lz77Token::Pointer {
                    length: 9,
                    distance: 1
                },
            ]
        );
        assert_eq!(resolve(&tokens), input);
    }

    #[test]
    fn test_short_input_stays_literal() {
        let tokens = tokenize(b"ab", WINDOW_SIZE);
        assert_eq!(
            tokens,
            vec![Lz77Token::Literal(b'a'), Lz77Token::Literal(b'b')]
        );
        assert!(tokenize(b"", WINDOW_SIZE).is_empty());
    }

    #[test]
    fn test_period_three_repeat() {
        let input = b"abcabcabcabc";
        let tokens = tokenize(input, WINDOW_SIZE);
        assert!(
            tokens
                .iter()
                .any(|t| matches!(t, Lz77Token::Pointer { .. }))
        );
        assert_eq!(resolve(&tokens), input);
    }

    #[test]
    fn test_interior_positions_matchable() {
        // "xyz" occurs inside the run covered by an earlier pointer; the
        // finder must still see it.
        let input = b"0xyzxyzxyz10xyz2";
        let tokens = tokenize(input, WINDOW_SIZE);
        assert_eq!(resolve(&tokens), input);
        assert!(
            tokens
                .iter()
                .filter(|t| matches!(t, Lz77Token::Pointer { .. }))
                .count()
                >= 2
        );
    }

    #[test]
    fn test_window_limit_blocks_match() {
        // Repeat "needle!" 4096 bytes apart with a 64-byte window: no
        // pointer may reach back that far.
        let mut input = Vec::new();
        input.extend_from_slice(b"needle!");
        input.resize(4096, b'.');
        // Break up the '.' run so the only cross-gap repeat is "needle!".
        for (i, b) in input.iter_mut().enumerate().skip(8) {
            if *b == b'.' {
                *b = (i % 251) as u8;
            }
        }
        input.extend_from_slice(b"needle!");

        let tokens = tokenize(&input, 64);
        for token in &tokens {
            if let Lz77Token::Pointer { distance, .. } = token {
                assert!(*distance as usize <= 64);
            }
        }
        assert_eq!(resolve(&tokens), input);
    }

    #[test]
    fn test_token_legality() {
        let input: Vec<u8> = (0u32..5000)
            .map(|i| (i * 7 % 13) as u8 + b'a')
            .collect();
        let tokens = tokenize(&input, WINDOW_SIZE);

        let mut produced = 0usize;
        for token in &tokens {
            match *token {
                Lz77Token::Literal(_) => produced += 1,
                Lz77Token::Pointer { length, distance } => {
                    let (length, distance) = (length as usize, distance as usize);
                    assert!((MIN_MATCH..=MAX_MATCH).contains(&length));
                    assert!(distance >= 1 && distance <= WINDOW_SIZE);
                    assert!(distance <= produced);
                    produced += length;
                }
            }
        }
        assert_eq!(produced, input.len());
        assert_eq!(resolve(&tokens), input);
    }

    #[test]
    fn test_large_table_roundtrip() {
        // Above WINDOW_SIZE so the bucketed table is exercised.
        let mut input = Vec::with_capacity(WINDOW_SIZE + 1024);
        for i in 0..WINDOW_SIZE + 1024 {
            input.push((i % 7) as u8 * 3 + (i % 31) as u8);
        }
        let tokens = tokenize(&input, WINDOW_SIZE);
        assert_eq!(resolve(&tokens), input);
    }

    proptest::proptest! {
        #[test]
        fn prop_tokens_resolve_back(
            data in proptest::collection::vec(0u8..8, 0..2048),
            window in 1usize..=WINDOW_SIZE,
        ) {
            let tokens = tokenize(&data, window);
            for token in &tokens {
                if let Lz77Token::Pointer { length, distance } = token {
                    let (length, distance) = (*length as usize, *distance as usize);
                    proptest::prop_assert!((MIN_MATCH..=MAX_MATCH).contains(&length));
                    proptest::prop_assert!(distance >= 1 && distance <= window);
                }
            }
            proptest::prop_assert_eq!(resolve(&tokens), data);
        }
    }

    #[test]
    fn test_max_match_cap() {
        let input = vec![b'z'; 1000];
        let tokens = tokenize(&input, WINDOW_SIZE);
        for token in &tokens {
            if let Lz77Token::Pointer { length, .. } = token {
                assert!(*length as usize <= MAX_MATCH);
            }
        }
        assert_eq!(resolve(&tokens), input);
    }
}
