//! Runtime contracts for the built index structures.
//!
//! Debug-mode assertions over the invariants the construction pipeline is
//! supposed to establish. The checks are brute-force on purpose: they are
//! the independent ground truth the fast structures are compared against.
//!
//! All functions are zero-cost in release builds (`debug_assert!`); the
//! build pipeline calls them after each construction stage.

use std::cmp::Ordering;

use crate::alphabet::Sequence;
use crate::lcp::LcpTable;
use crate::occ::OccTable;

/// Check that `pos` is a bijection over `[0, n)`.
///
/// # Panics (debug builds only)
/// Panics if a position is missing, duplicated or out of range.
#[inline]
pub fn check_pos_is_permutation(pos: &[usize], n: usize) {
    if !cfg!(debug_assertions) {
        return;
    }
    debug_assert_eq!(
        pos.len(),
        n,
        "Contract violation: PosPermutation - pos.len() {} != n {}",
        pos.len(),
        n
    );
    let mut seen = vec![false; n];
    for &p in pos {
        debug_assert!(
            p < n && !seen[p],
            "Contract violation: PosPermutation - position {} out of range or repeated",
            p
        );
        if p < n {
            seen[p] = true;
        }
    }
}

/// Check that adjacent ranks hold lexicographically non-decreasing suffixes.
///
/// # Panics (debug builds only)
/// Panics if any adjacent pair violates the ordering.
#[inline]
pub fn check_suffix_order_sorted(seq: &Sequence, pos: &[usize]) {
    if !cfg!(debug_assertions) {
        return;
    }
    for r in 1..pos.len() {
        let (ord, _) = seq.suffix_cmp(pos[r - 1], pos[r], 0);
        debug_assert_ne!(
            ord,
            Ordering::Greater,
            "Contract violation: SuffixOrderSorted - rank {} (pos {}) sorts after rank {} (pos {})",
            r - 1,
            pos[r - 1],
            r,
            pos[r]
        );
    }
}

/// Check that manifest entries tile `[0, n)` contiguously.
///
/// # Panics (debug builds only)
/// Panics on a gap, overlap or a short final entry.
#[inline]
pub fn check_manifest_tiles(seq: &Sequence) {
    if !cfg!(debug_assertions) {
        return;
    }
    let mut next = 0usize;
    for entry in seq.manifest() {
        debug_assert_eq!(
            entry.start, next,
            "Contract violation: ManifestTiles - entry '{}' starts at {} (expected {})",
            entry.name, entry.start, next
        );
        debug_assert!(
            entry.end >= entry.start,
            "Contract violation: ManifestTiles - entry '{}' ends before it starts",
            entry.name
        );
        next = entry.end + 1;
    }
    debug_assert_eq!(
        next,
        seq.len(),
        "Contract violation: ManifestTiles - entries cover [0, {}) but n = {}",
        next,
        seq.len()
    );
}

/// Check every rank query against a literal scan of the BWT.
///
/// # Panics (debug builds only)
/// Panics if a checkpointed rank or a `less` entry disagrees with the
/// brute-force count.
#[inline]
pub fn check_occ_consistent(occ: &OccTable) {
    if !cfg!(debug_assertions) {
        return;
    }
    let bwt = occ.bwt();
    let firstreg = occ.firstregular();
    for c in 0..occ.regulars() {
        let a = firstreg + c as u8;
        let mut count = 0usize;
        for r in 0..=bwt.len() {
            debug_assert_eq!(
                occ.rank(r, a),
                count,
                "Contract violation: OccConsistent - rank({}, {}) disagrees with scan",
                r,
                a
            );
            if r < bwt.len() && bwt[r] == a {
                count += 1;
            }
        }
        let below = bwt.iter().filter(|&&b| b < a).count();
        debug_assert_eq!(
            occ.less(a),
            Some(below),
            "Contract violation: OccConsistent - less({}) disagrees with scan",
            a
        );
    }
}

/// Check every LCP value against a direct suffix comparison.
///
/// # Panics (debug builds only)
/// Panics if a resolved value (including exception entries) is wrong, or the
/// rank-0 slot does not hold the sentinel.
#[inline]
pub fn check_lcp_correct(seq: &Sequence, pos: &[usize], lcp: &LcpTable) {
    if !cfg!(debug_assertions) {
        return;
    }
    if !lcp.mode().has_exceptions() && lcp.mode().sentinel().is_some() {
        return; // raw modes truncate values and cannot be checked this way
    }
    debug_assert_eq!(
        lcp.len(),
        pos.len(),
        "Contract violation: LcpCorrect - lcp.len() {} != n {}",
        lcp.len(),
        pos.len()
    );
    if !pos.is_empty() {
        debug_assert_eq!(
            lcp.at(0),
            -1,
            "Contract violation: LcpCorrect - rank 0 holds {} (expected -1)",
            lcp.at(0)
        );
    }
    for r in 1..pos.len() {
        let (_, len) = seq.suffix_cmp(pos[r - 1], pos[r], 0);
        debug_assert_eq!(
            lcp.at(r),
            len as i64,
            "Contract violation: LcpCorrect - lcp[{}] = {} (expected {})",
            r,
            lcp.at(r),
            len
        );
    }
}
