// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Index assembly: position array, rank index, BWT derivation and the
//! [`SuffixIndex`] aggregate that owns every built structure.

use crate::alphabet::Sequence;
use crate::contracts;
use crate::lcp::{LcpMode, LcpTable};
use crate::occ::OccTable;
use crate::order::{SuffixOrder, NIL};
use crate::search::{MatchStat, MmsOptions, SearchEngine, SearchError};

/// Materialize the suffix linked list into a rank-indexed position array.
pub fn pos_from_order(order: &SuffixOrder) -> Vec<usize> {
    let mut pos = Vec::with_capacity(order.nextpos.len());
    let mut p = order.firstpos;
    while p != NIL {
        pos.push(p);
        p = order.nextpos[p];
    }
    pos
}

/// Manifest entry index owning each rank's position.
pub fn rindex_from_pos(seq: &Sequence, pos: &[usize]) -> Vec<u32> {
    pos.iter().map(|&p| seq.entry_at(p) as u32).collect()
}

/// Derive the BWT from the position array. The rank holding position 0
/// receives the final symbol of the text (the cyclic predecessor), which is
/// always a special code because sequences end in a separator.
pub fn bwt_from_pos(seq: &Sequence, pos: &[usize]) -> Vec<u8> {
    let n = seq.len();
    pos.iter()
        .map(|&p| if p == 0 { seq.at(n - 1) } else { seq.at(p - 1) })
        .collect()
}

/// Interval width below which LCP-based widening beats recomputing the
/// interval by backward search.
///
/// For an interval of width `k`, cutting the rightmost matched character
/// grows it to an expected `asize * k`, costing `(asize-1) * k` LCP hops,
/// while recomputing costs about `occrate/2` BWT lookups per step over an
/// expected match length of `ln(n/k) / ln(asize)`. The threshold is the
/// largest `k` where the hops still win.
pub fn lcp_threshold(n: usize, asize: usize, occrate: usize) -> usize {
    const FACTOR: f64 = 2.0;
    const OFFSET: usize = 1;
    if n <= 1 || asize < 2 {
        return OFFSET;
    }
    let a1 = (asize - 1) as f64;
    let loga = (asize as f64).ln();
    let c = FACTOR * occrate as f64 / (2.0 * loga);
    let mut k = 1usize;
    while a1 * k as f64 <= c * (n as f64 / k as f64).ln() {
        k += 1;
    }
    k - 1 + OFFSET
}

/// Knobs for [`SuffixIndex::build`].
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Checkpoint spacing of the occurrence table.
    pub occrate: usize,
    /// LCP storage mode; `None` skips the LCP table entirely (searches then
    /// always recompute intervals from scratch).
    pub lcp_mode: Option<LcpMode>,
}

impl Default for BuildOptions {
    fn default() -> BuildOptions {
        BuildOptions {
            occrate: 128,
            lcp_mode: Some(LcpMode::Byte),
        }
    }
}

/// A fully built index over one [`Sequence`]. Immutable after construction;
/// every accessor takes `&self` and search calls share it freely.
#[derive(Debug)]
pub struct SuffixIndex {
    seq: Sequence,
    pos: Vec<usize>,
    rindex: Vec<u32>,
    occ: OccTable,
    lcp: Option<LcpTable>,
    lcp_threshold: usize,
    build_steps: u64,
}

impl SuffixIndex {
    /// Run the whole construction chain: suffix order, position array, rank
    /// index, BWT, occurrence table and (optionally) the LCP table.
    pub fn build(seq: Sequence, options: &BuildOptions) -> SuffixIndex {
        let order = SuffixOrder::build(&seq);
        let pos = pos_from_order(&order);
        contracts::check_pos_is_permutation(&pos, seq.len());
        contracts::check_suffix_order_sorted(&seq, &pos);
        contracts::check_manifest_tiles(&seq);
        let rindex = rindex_from_pos(&seq, &pos);
        let bwt = bwt_from_pos(&seq, &pos);
        let occ = OccTable::from_bwt(bwt, seq.alphabet(), options.occrate);
        contracts::check_occ_consistent(&occ);
        let lcp = options
            .lcp_mode
            .map(|mode| LcpTable::build(&seq, &order, mode));
        if let Some(lcp) = &lcp {
            contracts::check_lcp_correct(&seq, &pos, lcp);
        }
        let threshold = lcp_threshold(seq.len(), seq.alphabet().size(), options.occrate);
        SuffixIndex {
            seq,
            pos,
            rindex,
            occ,
            lcp,
            lcp_threshold: threshold,
            build_steps: order.steps,
        }
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.len() == 0
    }

    pub fn sequence(&self) -> &Sequence {
        &self.seq
    }

    pub fn pos(&self) -> &[usize] {
        &self.pos
    }

    pub fn rindex(&self) -> &[u32] {
        &self.rindex
    }

    pub fn occ(&self) -> &OccTable {
        &self.occ
    }

    pub fn lcp(&self) -> Option<&LcpTable> {
        self.lcp.as_ref()
    }

    pub fn lcp_threshold(&self) -> usize {
        self.lcp_threshold
    }

    /// List-traversal steps spent building the suffix order.
    pub fn build_steps(&self) -> u64 {
        self.build_steps
    }

    /// A search engine borrowing this index's tables.
    pub fn engine(&self) -> SearchEngine<'_> {
        SearchEngine::new(&self.occ, self.lcp.as_ref(), self.lcp_threshold)
    }

    /// Name of the record owning the suffix at `rank`.
    pub fn description_at(&self, rank: usize) -> &str {
        &self.seq.manifest()[self.rindex[rank] as usize].name
    }

    /// Human-readable decode of text positions `p..q`.
    pub fn substring(&self, p: usize, q: usize) -> String {
        self.seq.decode_range(p, q)
    }

    /// Cumulative matching statistics per record: for every jump in the
    /// matching statistics of `pat` at least `minlen` long, credit the
    /// matched length to every record whose suffix falls in the interval.
    ///
    /// Returns two rankings over record indices, both sorted descending:
    /// by cumulative matched length, and by single longest match. Ties are
    /// broken by ascending record index.
    pub fn cumms(
        &self,
        pat: &[u8],
        opt: Option<&[bool]>,
        options: &MmsOptions,
    ) -> Result<(Vec<(u64, usize)>, Vec<(u64, usize)>), SearchError> {
        let nseq = self.seq.manifest().len();
        let mut cms = vec![0u64; nseq];
        let mut sms = vec![0u64; nseq];
        let minlen = options.minlen.max(1);
        let engine = self.engine();
        let stats = match opt {
            Some(opt) => engine.backward_matching_statistics_with_optional_characters(
                pat,
                opt,
                options.begin,
                options.end,
            )?,
            None => engine.backward_matching_statistics(pat, options.begin, options.end),
        };
        let mut oldleft = pat.len();
        for st in &stats {
            if st.len >= minlen && st.left < oldleft && (!options.unique || st.lo == st.hi) {
                for r in st.lo..=st.hi {
                    let idx = self.rindex[r] as usize;
                    cms[idx] += st.len as u64;
                    if st.len as u64 > sms[idx] {
                        sms[idx] = st.len as u64;
                    }
                }
            }
            oldleft = st.left;
        }
        Ok((rank_scores(&cms), rank_scores(&sms)))
    }

    /// Convenience wrapper over [`SearchEngine::mms`].
    pub fn mms(
        &self,
        pat: &[u8],
        opt: Option<&[bool]>,
        options: &MmsOptions,
    ) -> Result<Vec<MatchStat>, SearchError> {
        self.engine().mms(pat, opt, options)
    }
}

fn rank_scores(scores: &[u64]) -> Vec<(u64, usize)> {
    let mut ranked: Vec<(u64, usize)> = scores.iter().copied().zip(0..).collect();
    ranked.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    ranked
}
