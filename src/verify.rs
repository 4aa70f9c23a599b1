// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Whole-index validation against brute-force ground truth.
//!
//! [`verify_index`] re-derives every invariant of a [`SuffixIndex`] by
//! direct scans over the sequence: no structure is trusted to check itself.
//! It is intended for indexes reassembled from persisted files and for
//! tests; on a freshly built index it should never fail.

use std::cmp::Ordering;
use std::fmt;

use crate::index::SuffixIndex;

/// One invariant violation, carrying enough context to locate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantError {
    /// `pos` is not a bijection over `[0, n)`.
    PosNotPermutation { rank: usize, pos: usize },
    /// Adjacent ranks hold suffixes out of lexicographic order.
    UnsortedSuffixes { rank: usize },
    /// The BWT symbol at some rank disagrees with the sequence.
    WrongBwtSymbol { rank: usize, stored: u8, expected: u8 },
    /// A rank query disagrees with a literal count over the BWT.
    WrongRank { r: usize, symbol: u8, stored: usize, expected: usize },
    /// A `less` entry disagrees with a literal count over the BWT.
    WrongLess { symbol: u8, stored: usize, expected: usize },
    /// An LCP value disagrees with a direct suffix comparison.
    WrongLcp { rank: usize, stored: i64, expected: i64 },
    /// A rank index entry names a record that does not own the position.
    WrongRecord { rank: usize, entry: usize },
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantError::PosNotPermutation { rank, pos } => {
                write!(f, "pos[{}] = {} repeats or exceeds the text length", rank, pos)
            }
            InvariantError::UnsortedSuffixes { rank } => {
                write!(f, "suffix at rank {} sorts after its successor", rank)
            }
            InvariantError::WrongBwtSymbol { rank, stored, expected } => {
                write!(f, "bwt[{}] = {} but the sequence says {}", rank, stored, expected)
            }
            InvariantError::WrongRank { r, symbol, stored, expected } => {
                write!(
                    f,
                    "rank({}, {}) = {} but a literal scan counts {}",
                    r, symbol, stored, expected
                )
            }
            InvariantError::WrongLess { symbol, stored, expected } => {
                write!(
                    f,
                    "less({}) = {} but a literal scan counts {}",
                    symbol, stored, expected
                )
            }
            InvariantError::WrongLcp { rank, stored, expected } => {
                write!(f, "lcp[{}] = {} but direct comparison gives {}", rank, stored, expected)
            }
            InvariantError::WrongRecord { rank, entry } => {
                write!(f, "rindex[{}] = {} does not own pos[{}]", rank, entry, rank)
            }
        }
    }
}

impl std::error::Error for InvariantError {}

/// Check every testable property of a built index by brute force.
///
/// Runs in roughly O(n² / occrate) for the rank checks on small inputs;
/// meant for tests and post-load validation, not hot paths.
pub fn verify_index(index: &SuffixIndex) -> Result<(), InvariantError> {
    let seq = index.sequence();
    let pos = index.pos();
    let n = seq.len();

    // pos is a permutation
    let mut seen = vec![false; n];
    for (rank, &p) in pos.iter().enumerate() {
        if p >= n || seen[p] {
            return Err(InvariantError::PosNotPermutation { rank, pos: p });
        }
        seen[p] = true;
    }

    // suffixes are sorted
    for r in 1..n {
        if seq.suffix_cmp(pos[r - 1], pos[r], 0).0 == Ordering::Greater {
            return Err(InvariantError::UnsortedSuffixes { rank: r - 1 });
        }
    }

    // bwt matches the cyclic predecessor of each suffix
    let occ = index.occ();
    let bwt = occ.bwt();
    for r in 0..n {
        let expected = if pos[r] == 0 { seq.at(n - 1) } else { seq.at(pos[r] - 1) };
        if bwt[r] != expected {
            return Err(InvariantError::WrongBwtSymbol {
                rank: r,
                stored: bwt[r],
                expected,
            });
        }
    }

    // rank and less agree with literal counts
    let firstreg = occ.firstregular();
    for c in 0..occ.regulars() {
        let a = firstreg + c as u8;
        let mut count = 0usize;
        for r in 0..=n {
            if occ.rank(r, a) != count {
                return Err(InvariantError::WrongRank {
                    r,
                    symbol: a,
                    stored: occ.rank(r, a),
                    expected: count,
                });
            }
            if r < n && bwt[r] == a {
                count += 1;
            }
        }
        let below = bwt.iter().filter(|&&b| b < a).count();
        if occ.less(a) != Some(below) {
            return Err(InvariantError::WrongLess {
                symbol: a,
                stored: occ.less(a).unwrap_or(usize::MAX),
                expected: below,
            });
        }
    }

    // lcp values match direct comparisons
    if let Some(lcp) = index.lcp() {
        if lcp.mode().has_exceptions() || lcp.mode().sentinel().is_none() {
            for r in 1..n {
                let expected = seq.suffix_cmp(pos[r - 1], pos[r], 0).1 as i64;
                if lcp.at(r) != expected {
                    return Err(InvariantError::WrongLcp {
                        rank: r,
                        stored: lcp.at(r),
                        expected,
                    });
                }
            }
            if n > 0 && lcp.at(0) != -1 {
                return Err(InvariantError::WrongLcp {
                    rank: 0,
                    stored: lcp.at(0),
                    expected: -1,
                });
            }
        }
    }

    // rindex entries own their positions
    for r in 0..n {
        let entry = index.rindex()[r] as usize;
        match seq.manifest().get(entry) {
            Some(e) if e.start <= pos[r] && pos[r] <= e.end => {}
            _ => return Err(InvariantError::WrongRecord { rank: r, entry }),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{banana_index, dna_index, random_dna};

    #[test]
    fn fresh_indexes_verify() {
        verify_index(&banana_index()).unwrap();
        verify_index(&dna_index(&[("a", "ACGT"), ("b", "TTGGCCAA")])).unwrap();
        let text = random_dna(500, 42);
        verify_index(&dna_index(&[("rnd", &text)])).unwrap();
    }

    #[test]
    fn errors_render_with_context() {
        let e = InvariantError::WrongRank {
            r: 3,
            symbol: 2,
            stored: 1,
            expected: 2,
        };
        assert_eq!(e.to_string(), "rank(3, 2) = 1 but a literal scan counts 2");
    }
}
