//! Shared test utilities and fixtures.

#![allow(dead_code)]

use fmseq::{Alphabet, BuildOptions, Sequence, SuffixIndex};

// Re-export canonical test utilities from fmseq::testing
pub use fmseq::testing::{encode, random_dna};

/// Build a DNA index over named records with the given options.
pub fn build_dna_index(records: &[(&str, &str)], options: &BuildOptions) -> SuffixIndex {
    let mut seq = Sequence::new(Alphabet::dna());
    for (name, text) in records {
        seq.append_str(name, text).expect("record uses DNA symbols");
    }
    SuffixIndex::build(seq, options)
}

/// Every start offset of `pat` in `codes`, by direct comparison.
pub fn naive_occurrences(codes: &[u8], pat: &[u8]) -> Vec<usize> {
    if pat.is_empty() || pat.len() > codes.len() {
        return Vec::new();
    }
    (0..=codes.len() - pat.len())
        .filter(|&p| &codes[p..p + pat.len()] == pat)
        .collect()
}

/// Length of the longest common prefix of the suffixes at `p` and `q`.
///
/// A pair of equal separators (code 0) ends the prefix: each separator
/// occurrence is a distinct sentinel.
pub fn naive_lcp(codes: &[u8], p: usize, q: usize) -> usize {
    codes[p..]
        .iter()
        .zip(&codes[q..])
        .take_while(|(a, b)| a == b && **a != 0)
        .count()
}
