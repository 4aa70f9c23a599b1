//! Compact longest-common-prefix tables with out-of-band exceptions.
//!
//! `lcp[r]` is the length of the longest common prefix of the suffixes at
//! ranks `r - 1` and `r`; the rank-0 slot (the suffix with no predecessor)
//! holds the sentinel `-1`.
//!
//! Values are stored full-width or compacted to 8/16 bits. A compact value
//! at or above the width's maximum is replaced by that maximum and the true
//! value recorded in a side exception table keyed by ascending rank. The
//! mode numbering matches the on-disk format:
//!
//! | mode | width | exceptions |
//! |------|-------|------------|
//! |  0   | 64    | none       |
//! |  1   |  8    | yes        |
//! |  2   | 16    | yes        |
//! | -1   |  8    | no (reads return the raw compact value) |
//! | -2   | 16    | no (reads return the raw compact value) |
//!
//! Construction is two-phase and needs only `nextpos`, never the BWT:
//! first compute the LCP of every position with its lexicographic successor
//! by direct comparison (reusing the previous length minus one as a lower
//! bound), indexed by text position; then project into rank order by walking
//! `nextpos` from `firstpos`, compacting as values stream by.

use std::cmp::Ordering;

use crate::alphabet::Sequence;
use crate::order::{SuffixOrder, NIL};

/// Storage mode of an [`LcpTable`]. Negative ("raw") modes write the compact
/// width but never consult the exception path on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LcpMode {
    /// Full-width values, no exceptions (mode 0).
    Full,
    /// 8-bit values with exceptions (mode 1).
    Byte,
    /// 16-bit values with exceptions (mode 2).
    Word,
    /// 8-bit values, no exception table (mode -1).
    ByteRaw,
    /// 16-bit values, no exception table (mode -2).
    WordRaw,
}

impl LcpMode {
    /// The on-disk mode number.
    pub fn code(self) -> i8 {
        match self {
            LcpMode::Full => 0,
            LcpMode::Byte => 1,
            LcpMode::Word => 2,
            LcpMode::ByteRaw => -1,
            LcpMode::WordRaw => -2,
        }
    }

    pub fn from_code(code: i8) -> Option<LcpMode> {
        match code {
            0 => Some(LcpMode::Full),
            1 => Some(LcpMode::Byte),
            2 => Some(LcpMode::Word),
            -1 => Some(LcpMode::ByteRaw),
            -2 => Some(LcpMode::WordRaw),
            _ => None,
        }
    }

    /// Sentinel maximum for compact widths; `None` for full width.
    pub fn sentinel(self) -> Option<i64> {
        match self {
            LcpMode::Full => None,
            LcpMode::Byte | LcpMode::ByteRaw => Some(255),
            LcpMode::Word | LcpMode::WordRaw => Some(65535),
        }
    }

    /// Whether sentinel values resolve through the exception table.
    pub fn has_exceptions(self) -> bool {
        matches!(self, LcpMode::Byte | LcpMode::Word)
    }
}

#[derive(Debug, Clone)]
enum LcpValues {
    Full(Vec<i64>),
    Byte(Vec<u8>),
    Word(Vec<u16>),
}

/// Per-rank LCP values, compactly encoded, with an exception list for values
/// that do not fit the compact width.
#[derive(Debug, Clone)]
pub struct LcpTable {
    mode: LcpMode,
    values: LcpValues,
    /// Exception ranks, strictly ascending.
    xind: Vec<u64>,
    /// True value per exception rank.
    xval: Vec<i64>,
}

impl LcpTable {
    /// Build the LCP table of `seq` in the given storage mode.
    pub fn build(seq: &Sequence, order: &SuffixOrder, mode: LcpMode) -> LcpTable {
        let n = seq.len();

        // Phase 1: PLCP, indexed by the successor's text position. If the
        // suffix at p-1 matched its successor to length L, the suffix at p
        // matches its own successor to at least L-1.
        let mut plcp = vec![0i64; n];
        let mut ll = 0usize;
        for p in 0..n {
            if ll > 0 {
                ll -= 1;
            }
            let pp = order.nextpos[p];
            if pp == NIL {
                // p is the lexicographically largest suffix; the slot that
                // never receives a value is firstpos, the rank-0 sentinel.
                plcp[order.firstpos] = -1;
                continue;
            }
            let (ord, len) = seq.suffix_cmp(p, pp, ll);
            debug_assert_eq!(ord, Ordering::Less);
            ll = len;
            plcp[pp] = len as i64;
        }

        // Phase 2 + 3: project into rank order and compact in one stream.
        let mut builder = CompactBuilder::new(mode, n);
        let mut p = order.firstpos;
        while p != NIL {
            builder.push(plcp[p]);
            p = order.nextpos[p];
        }
        builder.finish()
    }

    /// Resolved LCP value at rank `r`.
    ///
    /// # Panics
    ///
    /// Panics if a sentinel value has no exception entry; that can only
    /// happen through index corruption or a construction bug.
    pub fn at(&self, r: usize) -> i64 {
        match &self.values {
            LcpValues::Full(v) => v[r],
            LcpValues::Byte(v) => {
                let lv = i64::from(v[r]);
                if lv < 255 || !self.mode.has_exceptions() {
                    lv
                } else {
                    self.xfind(r)
                }
            }
            LcpValues::Word(v) => {
                let lv = i64::from(v[r]);
                if lv < 65535 || !self.mode.has_exceptions() {
                    lv
                } else {
                    self.xfind(r)
                }
            }
        }
    }

    /// True value of the exception at rank `r`.
    ///
    /// Only valid on ranks whose compact value is the sentinel; a miss is an
    /// internal invariant violation and panics.
    pub fn xfind(&self, r: usize) -> i64 {
        match self.xind.binary_search(&(r as u64)) {
            Ok(i) => self.xval[i],
            Err(_) => panic!("rank {} should be an lcp exception, but was not found", r),
        }
    }

    /// A fresh iterator over resolved LCP values in rank order.
    pub fn iter(&self) -> LcpIter<'_> {
        LcpIter {
            table: self,
            r: 0,
            x: 0,
        }
    }

    pub fn len(&self) -> usize {
        match &self.values {
            LcpValues::Full(v) => v.len(),
            LcpValues::Byte(v) => v.len(),
            LcpValues::Word(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn mode(&self) -> LcpMode {
        self.mode
    }

    /// Number of out-of-band exception entries.
    pub fn exceptions(&self) -> usize {
        self.xind.len()
    }

    pub(crate) fn raw_parts(&self) -> (&[u64], &[i64]) {
        (&self.xind, &self.xval)
    }

    pub(crate) fn raw_bytes(&self) -> Vec<u8> {
        match &self.values {
            LcpValues::Full(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
            LcpValues::Byte(v) => v.clone(),
            LcpValues::Word(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
        }
    }

    pub(crate) fn from_raw(
        mode: LcpMode,
        values: Vec<u8>,
        xind: Vec<u64>,
        xval: Vec<i64>,
    ) -> LcpTable {
        let values = match mode {
            LcpMode::Full => LcpValues::Full(
                values
                    .chunks_exact(8)
                    .map(|c| i64::from_le_bytes(c.try_into().expect("chunk of 8")))
                    .collect(),
            ),
            LcpMode::Byte | LcpMode::ByteRaw => LcpValues::Byte(values),
            LcpMode::Word | LcpMode::WordRaw => LcpValues::Word(
                values
                    .chunks_exact(2)
                    .map(|c| u16::from_le_bytes(c.try_into().expect("chunk of 2")))
                    .collect(),
            ),
        };
        LcpTable {
            mode,
            values,
            xind,
            xval,
        }
    }
}

/// Streams rank-ordered values into the compact array, diverting oversized
/// and negative values to the exception lists.
struct CompactBuilder {
    mode: LcpMode,
    values: LcpValues,
    xind: Vec<u64>,
    xval: Vec<i64>,
    r: u64,
}

impl CompactBuilder {
    fn new(mode: LcpMode, n: usize) -> CompactBuilder {
        let values = match mode {
            LcpMode::Full => LcpValues::Full(Vec::with_capacity(n)),
            LcpMode::Byte | LcpMode::ByteRaw => LcpValues::Byte(Vec::with_capacity(n)),
            LcpMode::Word | LcpMode::WordRaw => LcpValues::Word(Vec::with_capacity(n)),
        };
        CompactBuilder {
            mode,
            values,
            xind: Vec::new(),
            xval: Vec::new(),
            r: 0,
        }
    }

    fn push(&mut self, lv: i64) {
        match &mut self.values {
            LcpValues::Full(v) => v.push(lv),
            LcpValues::Byte(v) => {
                if !(0..255).contains(&lv) {
                    v.push(255);
                    if self.mode.has_exceptions() {
                        self.xind.push(self.r);
                        self.xval.push(lv);
                    }
                } else {
                    v.push(lv as u8);
                }
            }
            LcpValues::Word(v) => {
                if !(0..65535).contains(&lv) {
                    v.push(65535);
                    if self.mode.has_exceptions() {
                        self.xind.push(self.r);
                        self.xval.push(lv);
                    }
                } else {
                    v.push(lv as u16);
                }
            }
        }
        self.r += 1;
    }

    fn finish(self) -> LcpTable {
        debug_assert_eq!(self.xind.len(), self.xval.len());
        LcpTable {
            mode: self.mode,
            values: self.values,
            xind: self.xind,
            xval: self.xval,
        }
    }
}

/// Lazy iterator over resolved LCP values, consuming the exception list in
/// the same ascending order it was built.
pub struct LcpIter<'a> {
    table: &'a LcpTable,
    r: usize,
    x: usize,
}

impl Iterator for LcpIter<'_> {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        if self.r >= self.table.len() {
            return None;
        }
        let raw = match &self.table.values {
            LcpValues::Full(v) => v[self.r],
            LcpValues::Byte(v) => i64::from(v[self.r]),
            LcpValues::Word(v) => i64::from(v[self.r]),
        };
        let sentinel = self.table.mode.sentinel();
        let v = match sentinel {
            Some(s) if raw >= s && self.table.mode.has_exceptions() => {
                let v = self.table.xval[self.x];
                self.x += 1;
                v
            }
            _ => raw,
        };
        self.r += 1;
        Some(v)
    }
}
