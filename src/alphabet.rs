// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Alphabets, encoded sequences, and the manifest that maps text positions
//! back to the records they came from.
//!
//! An [`Alphabet`] assigns small integer codes to symbols. Codes below
//! `firstregular` are *special*: record separators and sentinels that sort
//! before every regular symbol. A [`Sequence`] is the concatenation of one or
//! more encoded records, each terminated by the separator code, together with
//! a manifest of `(name, start, end)` ranges tiling `[0, n)`.
//!
//! The alphabet is an explicit value object passed by reference into every
//! component constructor. There is no process-wide alphabet state.
//!
//! # Invariants (the stuff that breaks if you ignore it)
//!
//! - Every special code is numerically below every regular code.
//! - A non-empty `Sequence` always ends with a special code, so suffix
//!   comparisons and the order builder never scan past the end.
//! - Manifest entries are ordered, non-overlapping, and contiguous; the last
//!   entry's (inclusive) end is `n - 1`.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};

/// Error type for alphabet construction and sequence encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlphabetError {
    /// The alphabet has no special symbols (a separator is mandatory).
    NoSpecials,
    /// The alphabet has no regular symbols.
    NoRegulars,
    /// Alphabet exceeds the representable code range.
    TooLarge { size: usize },
    /// The same display symbol was given twice.
    DuplicateSymbol { symbol: char },
    /// A symbol that is not part of the alphabet.
    UnknownSymbol { symbol: char },
    /// A code outside `[0, SIZE)`.
    CodeOutOfRange { code: u8, size: usize },
    /// Records must contain at least one symbol.
    EmptyRecord { name: String },
}

impl fmt::Display for AlphabetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlphabetError::NoSpecials => write!(f, "alphabet needs at least one special symbol"),
            AlphabetError::NoRegulars => write!(f, "alphabet needs at least one regular symbol"),
            AlphabetError::TooLarge { size } => {
                write!(f, "alphabet size {} exceeds the maximum of 255", size)
            }
            AlphabetError::DuplicateSymbol { symbol } => {
                write!(f, "duplicate symbol '{}' in alphabet", symbol)
            }
            AlphabetError::UnknownSymbol { symbol } => {
                write!(f, "symbol '{}' is not in the alphabet", symbol)
            }
            AlphabetError::CodeOutOfRange { code, size } => {
                write!(f, "code {} out of range for alphabet of size {}", code, size)
            }
            AlphabetError::EmptyRecord { name } => {
                write!(f, "record '{}' is empty", name)
            }
        }
    }
}

impl std::error::Error for AlphabetError {}

// =============================================================================
// ALPHABET
// =============================================================================

/// A fixed-size code alphabet with a special/regular boundary.
///
/// Codes `0..firstregular` are special (separators, sentinels); codes
/// `firstregular..SIZE` are regular. Specials sort before all regulars by
/// construction, which is what makes the separator act as a suffix sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alphabet {
    /// Display symbol for each code, specials first.
    symbols: Vec<char>,
    /// First regular code; everything below is special.
    firstregular: u8,
}

impl Alphabet {
    /// Build an alphabet from display symbols: specials first, then regulars.
    ///
    /// Code 0 is the first special symbol and doubles as the record separator.
    pub fn new(specials: &str, regulars: &str) -> Result<Alphabet, AlphabetError> {
        if specials.is_empty() {
            return Err(AlphabetError::NoSpecials);
        }
        if regulars.is_empty() {
            return Err(AlphabetError::NoRegulars);
        }
        let symbols: Vec<char> = specials.chars().chain(regulars.chars()).collect();
        if symbols.len() > 255 {
            return Err(AlphabetError::TooLarge {
                size: symbols.len(),
            });
        }
        for (i, &c) in symbols.iter().enumerate() {
            if symbols[..i].contains(&c) {
                return Err(AlphabetError::DuplicateSymbol { symbol: c });
            }
        }
        Ok(Alphabet {
            symbols,
            firstregular: specials.chars().count() as u8,
        })
    }

    /// The standard DNA alphabet: `$` separator plus `ACGT`.
    pub fn dna() -> Alphabet {
        Alphabet::new("$", "ACGT").expect("static alphabet is valid")
    }

    /// Number of codes (`SIZE`).
    #[inline]
    pub fn size(&self) -> usize {
        self.symbols.len()
    }

    /// First regular code.
    #[inline]
    pub fn firstregular(&self) -> u8 {
        self.firstregular
    }

    /// Number of regular codes (`SIZE - firstregular`).
    #[inline]
    pub fn regulars(&self) -> usize {
        self.symbols.len() - self.firstregular as usize
    }

    /// True iff `code` is a special (below the regular boundary).
    #[inline]
    pub fn is_special(&self, code: u8) -> bool {
        code < self.firstregular
    }

    /// The special code appended after every record.
    #[inline]
    pub fn separator(&self) -> u8 {
        0
    }

    /// Code for a display symbol, if present.
    pub fn encode(&self, symbol: char) -> Option<u8> {
        self.symbols.iter().position(|&c| c == symbol).map(|i| i as u8)
    }

    /// Display symbol for a code, if in range.
    pub fn decode(&self, code: u8) -> Option<char> {
        self.symbols.get(code as usize).copied()
    }

    /// Encode a whole string of display symbols.
    pub fn encode_str(&self, text: &str) -> Result<Vec<u8>, AlphabetError> {
        text.chars()
            .map(|symbol| {
                self.encode(symbol)
                    .ok_or(AlphabetError::UnknownSymbol { symbol })
            })
            .collect()
    }

    /// Structural validity check, used after deserializing from untrusted
    /// sources: the boundary must leave at least one special and one regular.
    pub fn validate(&self) -> Result<(), AlphabetError> {
        if self.firstregular == 0 {
            return Err(AlphabetError::NoSpecials);
        }
        if (self.firstregular as usize) >= self.symbols.len() {
            return Err(AlphabetError::NoRegulars);
        }
        if self.symbols.len() > 255 {
            return Err(AlphabetError::TooLarge {
                size: self.symbols.len(),
            });
        }
        for (i, &c) in self.symbols.iter().enumerate() {
            if self.symbols[..i].contains(&c) {
                return Err(AlphabetError::DuplicateSymbol { symbol: c });
            }
        }
        Ok(())
    }
}

// =============================================================================
// MANIFEST
// =============================================================================

/// One manifest entry: the record `name` owns text positions `start..=end`.
///
/// The end is inclusive and covers the record's separator code, so entries
/// tile `[0, n)` exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeqEntry {
    pub name: String,
    pub start: usize,
    pub end: usize,
}

// =============================================================================
// SEQUENCE
// =============================================================================

/// The concatenation of encoded records over one alphabet.
///
/// Append records with [`Sequence::append`] or [`Sequence::append_str`]; each
/// record is followed by the separator code and registered in the manifest.
/// Once the index is built from it, a `Sequence` is only ever read.
#[derive(Debug, Clone)]
pub struct Sequence {
    alphabet: Alphabet,
    codes: Vec<u8>,
    manifest: Vec<SeqEntry>,
    /// Inclusive end offsets per manifest entry, for binary search.
    ends: Vec<usize>,
}

impl Sequence {
    pub fn new(alphabet: Alphabet) -> Sequence {
        Sequence {
            alphabet,
            codes: Vec::new(),
            manifest: Vec::new(),
            ends: Vec::new(),
        }
    }

    /// Append a record of pre-encoded codes, followed by the separator.
    pub fn append(&mut self, name: &str, codes: &[u8]) -> Result<(), AlphabetError> {
        if codes.is_empty() {
            return Err(AlphabetError::EmptyRecord {
                name: name.to_string(),
            });
        }
        let size = self.alphabet.size();
        for &code in codes {
            if code as usize >= size {
                return Err(AlphabetError::CodeOutOfRange { code, size });
            }
        }
        let start = self.codes.len();
        self.codes.extend_from_slice(codes);
        self.codes.push(self.alphabet.separator());
        let end = self.codes.len() - 1;
        self.manifest.push(SeqEntry {
            name: name.to_string(),
            start,
            end,
        });
        self.ends.push(end);
        Ok(())
    }

    /// Encode a record from display symbols and append it.
    pub fn append_str(&mut self, name: &str, text: &str) -> Result<(), AlphabetError> {
        let codes = self.alphabet.encode_str(text)?;
        self.append(name, &codes)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    #[inline]
    pub fn at(&self, p: usize) -> u8 {
        self.codes[p]
    }

    #[inline]
    pub fn codes(&self) -> &[u8] {
        &self.codes
    }

    #[inline]
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    #[inline]
    pub fn manifest(&self) -> &[SeqEntry] {
        &self.manifest
    }

    /// Index of the leftmost manifest entry whose end is `>= pos`.
    pub fn entry_at(&self, pos: usize) -> usize {
        self.ends.partition_point(|&e| e < pos)
    }

    /// Compare the suffixes starting at `p` and `q`, given a known common
    /// prefix of `from` symbols, returning the ordering and the full common
    /// prefix length.
    ///
    /// Equal special codes end the comparison: every separator occurrence is
    /// its own sentinel, ordered by text position, and the common prefix
    /// stops before it. This is the same order the linked-list builder
    /// produces for separator runs, so sortedness checks and the PLCP phase
    /// agree with the built suffix order on multi-record sequences.
    ///
    /// The PLCP phase of LCP construction relies on the `from` lower bound
    /// for its suffix-link acceleration.
    pub fn suffix_cmp(&self, p: usize, q: usize, from: usize) -> (Ordering, usize) {
        let mut k = from;
        loop {
            match (self.codes.get(p + k), self.codes.get(q + k)) {
                (Some(a), Some(b)) if a == b => {
                    if self.alphabet.is_special(*a) {
                        return (p.cmp(&q), k);
                    }
                    k += 1;
                }
                (Some(a), Some(b)) => return (a.cmp(b), k),
                (None, Some(_)) => return (Ordering::Less, k),
                (Some(_), None) => return (Ordering::Greater, k),
                (None, None) => return (p.cmp(&q), k),
            }
        }
    }

    /// Decode `codes[p..q]` back to display symbols, for diagnostics.
    pub fn decode_range(&self, p: usize, q: usize) -> String {
        self.codes[p..q]
            .iter()
            .filter_map(|&c| self.alphabet.decode(c))
            .collect()
    }
}

impl Index<usize> for Sequence {
    type Output = u8;

    #[inline]
    fn index(&self, p: usize) -> &u8 {
        &self.codes[p]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_boundaries() {
        let a = Alphabet::dna();
        assert_eq!(a.size(), 5);
        assert_eq!(a.firstregular(), 1);
        assert_eq!(a.regulars(), 4);
        assert!(a.is_special(0));
        assert!(!a.is_special(1));
        assert_eq!(a.encode('A'), Some(1));
        assert_eq!(a.encode('T'), Some(4));
        assert_eq!(a.decode(0), Some('$'));
        assert_eq!(a.encode('x'), None);
    }

    #[test]
    fn alphabet_rejects_duplicates_and_empties() {
        assert_eq!(
            Alphabet::new("", "AC"),
            Err(AlphabetError::NoSpecials)
        );
        assert_eq!(Alphabet::new("$", ""), Err(AlphabetError::NoRegulars));
        assert_eq!(
            Alphabet::new("$", "AA"),
            Err(AlphabetError::DuplicateSymbol { symbol: 'A' })
        );
    }

    #[test]
    fn sequence_appends_separator_and_manifest() {
        let mut s = Sequence::new(Alphabet::dna());
        s.append_str("r1", "ACGT").unwrap();
        s.append_str("r2", "GG").unwrap();
        assert_eq!(s.len(), 8);
        assert!(s.alphabet().is_special(s.at(4)));
        assert!(s.alphabet().is_special(s.at(7)));
        assert_eq!(s.manifest().len(), 2);
        assert_eq!(s.manifest()[0].start, 0);
        assert_eq!(s.manifest()[0].end, 4);
        assert_eq!(s.manifest()[1].start, 5);
        assert_eq!(s.manifest()[1].end, 7);
        assert_eq!(s.entry_at(0), 0);
        assert_eq!(s.entry_at(4), 0);
        assert_eq!(s.entry_at(5), 1);
        assert_eq!(s.entry_at(7), 1);
    }

    #[test]
    fn sequence_rejects_bad_input() {
        let mut s = Sequence::new(Alphabet::dna());
        assert_eq!(
            s.append_str("bad", "ACX"),
            Err(AlphabetError::UnknownSymbol { symbol: 'X' })
        );
        assert_eq!(
            s.append("empty", &[]),
            Err(AlphabetError::EmptyRecord {
                name: "empty".to_string()
            })
        );
        assert_eq!(
            s.append("range", &[9]),
            Err(AlphabetError::CodeOutOfRange { code: 9, size: 5 })
        );
        assert!(s.is_empty());
    }

    #[test]
    fn suffix_cmp_with_lower_bound() {
        let mut s = Sequence::new(Alphabet::dna());
        s.append_str("r", "ACACG").unwrap();
        // suffix 0 = ACACG$, suffix 2 = ACG$
        let (ord, lcp) = s.suffix_cmp(0, 2, 0);
        assert_eq!(lcp, 2);
        assert_eq!(ord, Ordering::Less);
        // same comparison with the lower bound already known
        let (ord2, lcp2) = s.suffix_cmp(0, 2, 1);
        assert_eq!((ord2, lcp2), (ord, lcp));
    }

    #[test]
    fn separator_suffixes_order_by_text_position() {
        let mut s = Sequence::new(Alphabet::dna());
        s.append_str("r1", "ACGT").unwrap();
        s.append_str("r2", "GG").unwrap();
        // suffix 4 = $GG$, suffix 7 = $: equal separators compare as
        // distinct sentinels, earlier text position first
        assert_eq!(s.suffix_cmp(4, 7, 0), (Ordering::Less, 0));
        assert_eq!(s.suffix_cmp(7, 4, 0), (Ordering::Greater, 0));
        // a separator pair also ends a longer common prefix
        // suffix 6 = G$, suffix 2 = GT$GG$: G matches, then $ vs T
        assert_eq!(s.suffix_cmp(6, 2, 0), (Ordering::Less, 1));
    }

    #[test]
    fn decode_range_round_trips() {
        let mut s = Sequence::new(Alphabet::dna());
        s.append_str("r", "ACGT").unwrap();
        assert_eq!(s.decode_range(0, 5), "ACGT$");
    }
}
