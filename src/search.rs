// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Backward search over the occurrence table.
//!
//! All algorithms here are pure functions of the occurrence table, the
//! optional LCP table and the pattern; the engine holds no mutable state and
//! may be shared freely across threads.
//!
//! The workhorse is [`SearchEngine::backward_matching_statistics`]: for each
//! pattern position `i` it reports the length of the longest pattern
//! substring ending at `i` that occurs in the text, together with the suffix
//! array interval of all its occurrences. The wildcard and error-tolerant
//! variants relax the match, the `mms`/`suffix_search`/`prefix_search`
//! wrappers filter the reports.

use std::collections::HashSet;
use std::fmt;

use crate::lcp::LcpTable;
use crate::occ::OccTable;

/// Largest supported error budget for [`SearchEngine::backward_search_with_errors`].
pub const MAX_ERRORS: usize = 2;

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// An error budget above [`MAX_ERRORS`] was requested.
    ErrorBudgetExceeded { requested: usize, max: usize },
    /// A wildcard search exceeded its configured step budget.
    StepLimitExceeded { limit: u64 },
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::ErrorBudgetExceeded { requested, max } => {
                write!(f, "error budget {} exceeds the supported maximum {}", requested, max)
            }
            SearchError::StepLimitExceeded { limit } => {
                write!(f, "search exceeded the step limit of {}", limit)
            }
        }
    }
}

impl std::error::Error for SearchError {}

// =============================================================================
// RESULT TYPES
// =============================================================================

/// One matching-statistics report: the longest match ending at pattern
/// position `right` spans `left..=right` (minus skipped positions, for the
/// wildcard variant), has `len` matched characters and occurs at every
/// suffix array rank in `lo..=hi`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchStat {
    pub right: usize,
    pub left: usize,
    pub len: usize,
    pub lo: usize,
    pub hi: usize,
}

/// Terminal report of the error-tolerant search: `matched` pattern characters
/// (counted from the right end) align to every rank in `lo..=hi` using
/// exactly `errors` edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorMatch {
    pub errors: usize,
    pub matched: usize,
    pub lo: usize,
    pub hi: usize,
}

/// Filters for [`SearchEngine::mms`] and [`crate::index::SuffixIndex::cumms`].
#[derive(Debug, Clone, Default)]
pub struct MmsOptions {
    /// Minimum matched length to report.
    pub minlen: usize,
    /// Report only matches with a singleton interval.
    pub unique: bool,
    /// Rightmost pattern position to scan (default: last).
    pub begin: Option<usize>,
    /// Leftmost pattern position to scan (default: 0).
    pub end: Option<usize>,
}

/// One state of the wildcard search: a match of `ms` characters whose
/// leftmost matched position is `left`, with the positions in `skipped`
/// (descending) treated as optional and consumed without text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct WildState {
    ms: usize,
    left: usize,
    lo: usize,
    hi: usize,
    skipped: Vec<usize>,
}

// =============================================================================
// ENGINE
// =============================================================================

/// Borrowing view over the built tables, carrying the search configuration.
#[derive(Debug, Clone, Copy)]
pub struct SearchEngine<'a> {
    occ: &'a OccTable,
    lcp: Option<&'a LcpTable>,
    lcp_threshold: usize,
    step_limit: Option<u64>,
}

impl<'a> SearchEngine<'a> {
    pub fn new(occ: &'a OccTable, lcp: Option<&'a LcpTable>, lcp_threshold: usize) -> Self {
        // A raw compact table surfaces the bare sentinel instead of real
        // values and cannot drive widening; search as if it were absent.
        let lcp =
            lcp.filter(|t| t.mode().has_exceptions() || t.mode().sentinel().is_none());
        SearchEngine {
            occ,
            lcp,
            lcp_threshold,
            step_limit: None,
        }
    }

    /// Bound the exponential wildcard branching by a step budget.
    pub fn with_step_limit(mut self, limit: u64) -> Self {
        self.step_limit = Some(limit);
        self
    }

    pub fn lcp_threshold(&self) -> usize {
        self.lcp_threshold
    }

    /// One backward extension: prepend `a` to the match represented by
    /// `[lo, hi]`. `None` means the extension is impossible (unknown
    /// character or empty result) and the caller keeps its interval.
    fn prepend(&self, lo: usize, hi: usize, a: u8) -> Option<(usize, usize)> {
        let ls = self.occ.less(a)?;
        let cl = self.occ.rank(lo, a);
        let ch = self.occ.rank(hi + 1, a);
        if cl >= ch {
            return None;
        }
        Some((ls + cl, ls + ch - 1))
    }

    /// Suffix array interval of all occurrences of the full pattern, or
    /// `None` if the pattern does not occur.
    pub fn exact_interval(&self, pat: &[u8]) -> Option<(usize, usize)> {
        let n = self.occ.len();
        if n == 0 {
            return None;
        }
        let (mut lo, mut hi) = (0, n - 1);
        for &a in pat.iter().rev() {
            (lo, hi) = self.prepend(lo, hi, a)?;
        }
        Some((lo, hi))
    }

    // =========================================================================
    // MATCHING STATISTICS
    // =========================================================================

    /// Backward matching statistics of `pat`, one report per pattern
    /// position from `begin` (default: last) down to `end` (default: 0).
    ///
    /// The interval for position `i-1` is derived from the one for `i` by
    /// LCP widening when the interval is at most `lcp_threshold` wide, and
    /// recomputed from scratch otherwise (or when no LCP table is present).
    pub fn backward_matching_statistics(
        &self,
        pat: &[u8],
        begin: Option<usize>,
        end: Option<usize>,
    ) -> Vec<MatchStat> {
        let n = self.occ.len();
        let m = pat.len();
        if m == 0 || n == 0 {
            return Vec::new();
        }
        let begin = begin.map_or(m - 1, |b| b.min(m - 1));
        let end = end.unwrap_or(0).min(begin);
        let mut out = Vec::with_capacity(begin - end + 1);

        // jn - 1 is the next pattern position to examine; jn itself is the
        // leftmost matched position of the current run.
        let mut jn = begin + 1;
        let (mut lo, mut hi) = (0usize, n - 1);
        for i in (end..=begin).rev() {
            if jn > i {
                jn = i + 1;
                lo = 0;
                hi = n - 1;
            }
            while jn > 0 {
                match self.prepend(lo, hi, pat[jn - 1]) {
                    Some(iv) => (lo, hi) = iv,
                    None => break,
                }
                jn -= 1;
            }
            let ms = i + 1 - jn;
            out.push(MatchStat {
                right: i,
                left: jn,
                len: ms,
                lo,
                hi,
            });
            // Prepare the interval for i-1: conceptually drop the matched
            // character at i, leaving a match of length ms-1.
            match self.lcp {
                Some(lcp) if hi - lo <= self.lcp_threshold && ms >= 1 => {
                    let msw = (ms - 1) as i64;
                    while lcp.at(lo) >= msw {
                        lo -= 1;
                    }
                    while hi < n - 1 && lcp.at(hi + 1) >= msw {
                        hi += 1;
                    }
                }
                _ => jn = i + 1, // wide interval: recompute at the next i
            }
        }
        out
    }

    /// Wildcard matching statistics: positions flagged in `opt` may be
    /// consumed without constraining the interval. All branches are explored
    /// through an explicit worklist with per-position deduplication; per
    /// position the best state is reported (longest match, then widest
    /// interval, then smallest `lo`, then smallest `left` and skip list).
    /// Distinct states never tie on all five keys, so the report does not
    /// depend on set iteration order.
    ///
    /// The state count can grow as `2^(optional positions in the window)`;
    /// cap it with [`SearchEngine::with_step_limit`].
    pub fn backward_matching_statistics_with_optional_characters(
        &self,
        pat: &[u8],
        opt: &[bool],
        begin: Option<usize>,
        end: Option<usize>,
    ) -> Result<Vec<MatchStat>, SearchError> {
        let n = self.occ.len();
        let m = pat.len();
        assert_eq!(opt.len(), m, "optional mask must cover the pattern");
        if m == 0 || n == 0 {
            return Ok(Vec::new());
        }
        let begin = begin.map_or(m - 1, |b| b.min(m - 1));
        let end = end.unwrap_or(0).min(begin);

        let mut steps = 0u64;
        let mut states: HashSet<WildState> = HashSet::new();
        let mut out = Vec::with_capacity(begin - end + 1);
        for i in (end..=begin).rev() {
            states = self.cut_states(states, pat, i, &mut steps)?;
            if states.is_empty() {
                states.insert(WildState {
                    ms: 0,
                    left: i + 1,
                    lo: 0,
                    hi: n - 1,
                    skipped: Vec::new(),
                });
            }
            states = self.extend_states(states, pat, opt, i, &mut steps)?;
            let best = states
                .iter()
                .max_by(|a, b| {
                    a.ms.cmp(&b.ms)
                        .then((a.hi - a.lo).cmp(&(b.hi - b.lo)))
                        .then(b.lo.cmp(&a.lo))
                        .then(b.left.cmp(&a.left))
                        .then(b.skipped.cmp(&a.skipped))
                })
                .expect("state set is non-empty after seeding");
            out.push(MatchStat {
                right: i,
                left: best.left,
                len: best.ms,
                lo: best.lo,
                hi: best.hi,
            });
        }
        Ok(out)
    }

    /// Drop the matched character at `i + 1` from every state and rebuild
    /// the intervals, by LCP widening when narrow enough and by a fresh
    /// backward search over the still-matched characters otherwise.
    fn cut_states(
        &self,
        states: HashSet<WildState>,
        pat: &[u8],
        i: usize,
        steps: &mut u64,
    ) -> Result<HashSet<WildState>, SearchError> {
        let n = self.occ.len();
        let cut_pos = i + 1;
        let mut out = HashSet::with_capacity(states.len());
        for mut st in states {
            self.bump(steps)?;
            if st.skipped.first() == Some(&cut_pos) {
                st.skipped.remove(0);
            } else if st.ms == 0 {
                continue; // nothing left of this match
            } else {
                st.ms -= 1;
            }
            match self.lcp {
                Some(lcp) if st.hi - st.lo <= self.lcp_threshold => {
                    let msw = st.ms as i64;
                    while lcp.at(st.lo) >= msw {
                        st.lo -= 1;
                    }
                    while st.hi < n - 1 && lcp.at(st.hi + 1) >= msw {
                        st.hi += 1;
                    }
                }
                _ => {
                    let matched: Vec<u8> = (st.left..=i)
                        .filter(|k| !st.skipped.contains(k))
                        .map(|k| pat[k])
                        .collect();
                    debug_assert_eq!(matched.len(), st.ms);
                    (st.lo, st.hi) = match self.exact_interval(&matched) {
                        Some(iv) => iv,
                        // matched characters came out of the text, so this
                        // interval cannot be empty
                        None => unreachable!("matched substring must occur"),
                    };
                }
            }
            out.insert(st);
        }
        Ok(out)
    }

    /// Extend every state as far left as possible, branching on optional
    /// positions. Branch states are queued and extended in turn; each fully
    /// extended state lands in the output set.
    fn extend_states(
        &self,
        states: HashSet<WildState>,
        pat: &[u8],
        opt: &[bool],
        i: usize,
        steps: &mut u64,
    ) -> Result<HashSet<WildState>, SearchError> {
        let mut out = HashSet::with_capacity(states.len());
        let mut stack: Vec<WildState> = states.into_iter().collect();
        while let Some(mut st) = stack.pop() {
            while st.left > 0 {
                self.bump(steps)?;
                let jn = st.left - 1;
                if opt[jn] && jn < i {
                    let mut branch = st.clone();
                    branch.left = jn;
                    branch.skipped.push(jn);
                    stack.push(branch);
                }
                match self.prepend(st.lo, st.hi, pat[jn]) {
                    Some((lo, hi)) => {
                        st.lo = lo;
                        st.hi = hi;
                        st.left = jn;
                        st.ms += 1;
                    }
                    None => break,
                }
            }
            out.insert(st);
        }
        Ok(out)
    }

    fn bump(&self, steps: &mut u64) -> Result<(), SearchError> {
        *steps += 1;
        match self.step_limit {
            Some(limit) if *steps > limit => Err(SearchError::StepLimitExceeded { limit }),
            _ => Ok(()),
        }
    }

    // =========================================================================
    // ERROR-TOLERANT SEARCH
    // =========================================================================

    /// Backward search allowing up to `errors` edits (substitution,
    /// insertion, deletion), as an NFA executed row by row: row `k` holds
    /// the intervals reachable with exactly `k` edits, indexed by the number
    /// of pattern characters consumed from the right end.
    ///
    /// A row going empty at some position reports the previous position's
    /// intervals; consuming the whole pattern reports at full length.
    pub fn backward_search_with_errors(
        &self,
        pat: &[u8],
        errors: usize,
    ) -> Result<Vec<ErrorMatch>, SearchError> {
        if errors > MAX_ERRORS {
            return Err(SearchError::ErrorBudgetExceeded {
                requested: errors,
                max: MAX_ERRORS,
            });
        }
        let n = self.occ.len();
        let m = pat.len();
        if m == 0 || n == 0 {
            return Ok(Vec::new());
        }
        let less = self.occ.less_table();
        let firstreg = self.occ.firstregular() as i64;
        let regulars = self.occ.regulars();
        let mut out = Vec::new();

        let mut thisrow: Vec<HashSet<(usize, usize)>> = vec![HashSet::new(); m + 1];
        thisrow[0].insert((0, n - 1));
        for k in 0..=errors {
            let mut nextrow: Vec<HashSet<(usize, usize)>> = vec![HashSet::new(); m + 1];
            for j in 0..=m {
                let cell: Vec<(usize, usize)> = thisrow[j].iter().copied().collect();
                if cell.is_empty() {
                    if j > 0 {
                        for &(lo, hi) in &thisrow[j - 1] {
                            out.push(ErrorMatch {
                                errors: k,
                                matched: j - 1,
                                lo,
                                hi,
                            });
                        }
                    }
                    break;
                }
                if j == m {
                    for &(lo, hi) in &cell {
                        out.push(ErrorMatch {
                            errors: k,
                            matched: m,
                            lo,
                            hi,
                        });
                    }
                }
                // pattern is consumed right to left
                let a = if j < m { i64::from(pat[m - 1 - j]) - firstreg } else { -1 };
                for (lo, hi) in cell {
                    let ll = self.occ.rank_all(lo);
                    let rr = self.occ.rank_all(hi + 1);
                    if k < errors {
                        for c in 0..regulars {
                            if rr[c] > ll[c] {
                                let l = less[c] as usize + ll[c];
                                let r = less[c] as usize + rr[c] - 1;
                                nextrow[j].insert((l, r)); // insertion
                                if j < m && c as i64 != a {
                                    nextrow[j + 1].insert((l, r)); // substitution
                                }
                            }
                        }
                        if j < m {
                            nextrow[j + 1].insert((lo, hi)); // deletion
                        }
                    }
                    if j < m && a >= 0 && (a as usize) < regulars {
                        let c = a as usize;
                        if rr[c] > ll[c] {
                            let l = less[c] as usize + ll[c];
                            let r = less[c] as usize + rr[c] - 1;
                            thisrow[j + 1].insert((l, r)); // match
                        }
                    }
                }
            }
            thisrow = nextrow;
        }
        Ok(out)
    }

    // =========================================================================
    // REPORT WRAPPERS
    // =========================================================================

    /// Longest matches of a suffix of `pat` ending at its last position, at
    /// least `minlen` long, with up to `errors` edits.
    pub fn suffix_search(
        &self,
        pat: &[u8],
        minlen: usize,
        errors: usize,
    ) -> Result<Vec<MatchStat>, SearchError> {
        if pat.is_empty() {
            return Ok(Vec::new());
        }
        let mspos = pat.len() - 1;
        if errors == 0 {
            let bms = self.backward_matching_statistics(pat, Some(mspos), Some(mspos));
            Ok(bms.into_iter().filter(|st| st.len >= minlen).collect())
        } else {
            let ems = self.backward_search_with_errors(pat, errors)?;
            Ok(ems
                .into_iter()
                .filter(|em| em.matched >= minlen)
                .map(|em| MatchStat {
                    right: mspos,
                    left: mspos + 1 - em.matched,
                    len: em.matched,
                    lo: em.lo,
                    hi: em.hi,
                })
                .collect())
        }
    }

    /// The longest match that is a prefix of `pat`, at least `minlen` long,
    /// if any.
    pub fn prefix_search(&self, pat: &[u8], minlen: usize) -> Vec<MatchStat> {
        self.backward_matching_statistics(pat, None, None)
            .into_iter()
            .find(|st| st.left == 0 && st.len >= minlen)
            .into_iter()
            .collect()
    }

    /// Pattern-maximal matches: positions where the matching statistics jump
    /// (the leftmost matched position moves), filtered by the options.
    pub fn mms(
        &self,
        pat: &[u8],
        opt: Option<&[bool]>,
        options: &MmsOptions,
    ) -> Result<Vec<MatchStat>, SearchError> {
        let stats = match opt {
            Some(opt) => self.backward_matching_statistics_with_optional_characters(
                pat,
                opt,
                options.begin,
                options.end,
            )?,
            None => self.backward_matching_statistics(pat, options.begin, options.end),
        };
        let mut out = Vec::new();
        let mut oldleft = pat.len();
        for st in stats {
            if st.left < oldleft
                && st.len > 0
                && st.len >= options.minlen
                && (!options.unique || st.lo == st.hi)
            {
                out.push(st);
            }
            oldleft = st.left;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{banana_index, dna_index, encode};

    #[test]
    fn exact_interval_on_banana() {
        let index = banana_index();
        let engine = index.engine();
        assert_eq!(engine.exact_interval(&encode(&index, "ana")), Some((2, 3)));
        assert_eq!(engine.exact_interval(&encode(&index, "banana")), Some((4, 4)));
        assert_eq!(engine.exact_interval(&encode(&index, "nn")), None);
        assert_eq!(engine.exact_interval(&[]), Some((0, 6)));
    }

    #[test]
    fn ana_occurs_at_offsets_1_and_3() {
        let index = banana_index();
        let (lo, hi) = index.engine().exact_interval(&encode(&index, "ana")).unwrap();
        let mut offsets: Vec<usize> = (lo..=hi).map(|r| index.pos()[r]).collect();
        offsets.sort_unstable();
        assert_eq!(offsets, vec![1, 3]);
    }

    #[test]
    fn matching_statistics_of_the_whole_text() {
        let index = banana_index();
        let stats = index
            .engine()
            .backward_matching_statistics(&encode(&index, "banana"), None, None);
        assert_eq!(stats.len(), 6);
        assert_eq!(
            stats[0],
            MatchStat {
                right: 5,
                left: 0,
                len: 6,
                lo: 4,
                hi: 4
            }
        );
        // every shorter prefix of "banana" is still a unique match
        for (k, st) in stats.iter().enumerate() {
            assert_eq!(st.right, 5 - k);
            assert_eq!(st.left, 0);
            assert_eq!(st.len, 6 - k);
            assert_eq!((st.lo, st.hi), (4, 4));
        }
    }

    #[test]
    fn statistics_agree_with_and_without_lcp() {
        let with = dna_index(&[("r", "ACGTGCAACGTTTACG")]);
        let without = crate::index::SuffixIndex::build(
            with.sequence().clone(),
            &crate::index::BuildOptions {
                occrate: 4,
                lcp_mode: None,
            },
        );
        let pat = encode(&with, "CGTTAG");
        let a = with.engine().backward_matching_statistics(&pat, None, None);
        let b = without.engine().backward_matching_statistics(&pat, None, None);
        assert_eq!(a, b);
    }

    #[test]
    fn raw_lcp_tables_search_like_absent_ones() {
        use crate::index::{BuildOptions, SuffixIndex};
        use crate::lcp::LcpMode;
        use crate::testing::banana_sequence;

        let byte = banana_index();
        let raw = SuffixIndex::build(
            banana_sequence(),
            &BuildOptions {
                occrate: 1,
                lcp_mode: Some(LcpMode::ByteRaw),
            },
        );
        let pat = encode(&byte, "na");
        let a = byte.engine().backward_matching_statistics(&pat, None, None);
        let b = raw.engine().backward_matching_statistics(&pat, None, None);
        assert_eq!(a, b);
    }

    #[test]
    fn wildcard_best_state_is_deterministic() {
        use crate::alphabet::{Alphabet, Sequence};
        use crate::index::{BuildOptions, SuffixIndex};
        use crate::lcp::LcpMode;

        let mut seq = Sequence::new(Alphabet::new("$", "ab").unwrap());
        seq.append_str("r", "aab").unwrap();
        let index = SuffixIndex::build(
            seq,
            &BuildOptions {
                occrate: 1,
                lcp_mode: Some(LcpMode::Byte),
            },
        );
        // "aa" matched outright and "a" + skip + "a" tie on length, width
        // and lo; the smaller left must win, every time
        let pat = encode(&index, "aaa");
        let opt = [false, true, false];
        let first = index
            .engine()
            .backward_matching_statistics_with_optional_characters(&pat, &opt, None, None)
            .unwrap();
        assert_eq!(first[0], MatchStat { right: 2, left: 0, len: 2, lo: 1, hi: 1 });
        for _ in 0..50 {
            let again = index
                .engine()
                .backward_matching_statistics_with_optional_characters(&pat, &opt, None, None)
                .unwrap();
            assert_eq!(again, first);
        }
    }

    #[test]
    fn suffix_and_prefix_search() {
        let index = banana_index();
        let engine = index.engine();
        let pat = encode(&index, "nana");
        let hits = engine.suffix_search(&pat, 4, 0).unwrap();
        assert_eq!(hits, vec![MatchStat { right: 3, left: 0, len: 4, lo: 6, hi: 6 }]);
        assert!(engine.suffix_search(&pat, 5, 0).unwrap().is_empty());
        let pre = engine.prefix_search(&encode(&index, "banbab"), 3);
        assert_eq!(pre, vec![MatchStat { right: 2, left: 0, len: 3, lo: 4, hi: 4 }]);
        assert!(engine.prefix_search(&encode(&index, "nanb"), 4).is_empty());
    }

    #[test]
    fn mms_reports_only_jumps() {
        let index = banana_index();
        let reports = index
            .engine()
            .mms(&encode(&index, "banana"), None, &MmsOptions::default())
            .unwrap();
        // the full text matches at its last position; no further jump occurs
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].len, 6);
        let unique = index
            .engine()
            .mms(
                &encode(&index, "nab"),
                None,
                &MmsOptions {
                    unique: true,
                    ..MmsOptions::default()
                },
            )
            .unwrap();
        for st in &unique {
            assert_eq!(st.lo, st.hi);
        }
    }

    #[test]
    fn wildcard_prefers_longer_then_wider() {
        let index = banana_index();
        let pat = encode(&index, "bna");
        let opt = [false, true, false];
        let stats = index
            .engine()
            .backward_matching_statistics_with_optional_characters(&pat, &opt, Some(2), Some(2))
            .unwrap();
        // skipping the optional "n" matches "ba" (one occurrence); not
        // skipping matches "na" (two occurrences). Equal length, the wider
        // interval wins.
        assert_eq!(
            stats,
            vec![MatchStat {
                right: 2,
                left: 1,
                len: 2,
                lo: 5,
                hi: 6
            }]
        );
    }

    #[test]
    fn wildcard_skip_bridges_a_mismatch() {
        let index = banana_index();
        // "bnanana": the leading b only joins a match if the "n" after it
        // is skipped
        let pat = encode(&index, "bnanana");
        let opt = [false, true, false, false, false, false, false];
        let stats = index
            .engine()
            .backward_matching_statistics_with_optional_characters(&pat, &opt, None, None)
            .unwrap();
        let best = &stats[0];
        assert_eq!(best.right, 6);
        assert_eq!(best.left, 0);
        assert_eq!(best.len, 6); // banana without the skipped position
        assert_eq!((best.lo, best.hi), (4, 4));
    }

    #[test]
    fn wildcard_step_limit_is_enforced() {
        let index = banana_index();
        let pat = encode(&index, "banana");
        let opt = [true; 6];
        let err = index
            .engine()
            .with_step_limit(3)
            .backward_matching_statistics_with_optional_characters(&pat, &opt, None, None)
            .unwrap_err();
        assert_eq!(err, SearchError::StepLimitExceeded { limit: 3 });
    }

    #[test]
    fn one_substitution_recovers_the_full_pattern() {
        let index = banana_index();
        let pat = encode(&index, "banbna");
        let hits = index.engine().backward_search_with_errors(&pat, 1).unwrap();
        assert!(hits.contains(&ErrorMatch {
            errors: 1,
            matched: 6,
            lo: 4,
            hi: 4
        }));
        // with no budget the search stops at the unbroken suffix
        let exact = index.engine().backward_search_with_errors(&pat, 0).unwrap();
        assert!(exact.iter().all(|em| em.matched < 6));
    }

    #[test]
    fn one_deletion_recovers_the_full_pattern() {
        let index = banana_index();
        // "bannana" needs one deletion to become "banana"
        let pat = encode(&index, "bannana");
        let hits = index.engine().backward_search_with_errors(&pat, 1).unwrap();
        assert!(hits
            .iter()
            .any(|em| em.errors == 1 && em.matched == 7 && (em.lo, em.hi) == (4, 4)));
    }

    #[test]
    fn error_budget_is_validated_up_front() {
        let index = banana_index();
        let err = index
            .engine()
            .backward_search_with_errors(&encode(&index, "ana"), MAX_ERRORS + 1)
            .unwrap_err();
        assert_eq!(
            err,
            SearchError::ErrorBudgetExceeded {
                requested: 3,
                max: 2
            }
        );
        let via_suffix = index.engine().suffix_search(&encode(&index, "ana"), 0, 3);
        assert!(via_suffix.is_err());
    }

    #[test]
    fn suffix_search_with_errors_reports_positions() {
        let index = banana_index();
        let pat = encode(&index, "banbna");
        let hits = index.engine().suffix_search(&pat, 6, 1).unwrap();
        assert!(hits
            .iter()
            .any(|st| st.left == 0 && st.right == 5 && st.len == 6));
    }

    #[test]
    fn empty_pattern_yields_nothing() {
        let index = banana_index();
        let engine = index.engine();
        assert!(engine.backward_matching_statistics(&[], None, None).is_empty());
        assert!(engine.backward_search_with_errors(&[], 1).unwrap().is_empty());
        assert!(engine.suffix_search(&[], 0, 0).unwrap().is_empty());
    }
}
