//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.
//! It provides canonical fixtures to avoid duplication across tests.

#![doc(hidden)]

use crate::alphabet::{Alphabet, Sequence};
use crate::index::{BuildOptions, SuffixIndex};
use crate::lcp::LcpMode;

/// Alphabet `$` (special) + `abn`, enough for the banana fixtures.
pub fn abn_alphabet() -> Alphabet {
    Alphabet::new("$", "abn").expect("valid alphabet")
}

/// The single record `banana`, the canonical worked example.
pub fn banana_sequence() -> Sequence {
    let mut seq = Sequence::new(abn_alphabet());
    seq.append_str("banana", "banana").expect("valid record");
    seq
}

/// Index over `banana$` with `occrate = 1` and a byte LCP table.
pub fn banana_index() -> SuffixIndex {
    SuffixIndex::build(
        banana_sequence(),
        &BuildOptions {
            occrate: 1,
            lcp_mode: Some(LcpMode::Byte),
        },
    )
}

/// Index over the given `(name, text)` DNA records with default options.
pub fn dna_index(records: &[(&str, &str)]) -> SuffixIndex {
    let mut seq = Sequence::new(Alphabet::dna());
    for (name, text) in records {
        seq.append_str(name, text).expect("valid record");
    }
    SuffixIndex::build(seq, &BuildOptions::default())
}

/// Encode a pattern through the index's own alphabet.
pub fn encode(index: &SuffixIndex, pat: &str) -> Vec<u8> {
    index
        .sequence()
        .alphabet()
        .encode_str(pat)
        .expect("pattern symbols in alphabet")
}

/// Deterministic pseudo-random DNA of length `len`, seeded LCG.
pub fn random_dna(len: usize, seed: u64) -> String {
    const BASES: [char; 4] = ['A', 'C', 'G', 'T'];
    let mut state = seed.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
    let mut out = String::with_capacity(len);
    for _ in 0..len {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        out.push(BASES[(state >> 62) as usize]);
    }
    out
}
