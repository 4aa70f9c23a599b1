//! The rank ("occurrence") table over the Burrows-Wheeler transform.
//!
//! An [`OccTable`] answers two queries that drive every backward search:
//!
//! - `rank(r, a)`: occurrences of regular character `a` in `bwt[..r]`,
//!   answered from the nearest checkpoint plus a residual scan of at most
//!   `occrate - 1` symbols. With `occrate == 1` the checkpoint *is* the
//!   answer and no scan happens.
//! - `less(a)`: number of characters strictly smaller than `a` in the whole
//!   BWT, answered in O(1). A code outside the regular range yields `None`,
//!   which backward search treats as "no further extension possible" rather
//!   than an error.
//!
//! Checkpoints hold the cumulative per-character counts *through* every
//! `occrate`-th BWT position, so larger `occrate` trades query time for
//! memory: `regulars * ceil(n / occrate)` counters.
//!
//! The table owns its BWT; residual scans read it directly. Everything here
//! is immutable after construction and safe to share across threads.

use crate::alphabet::Alphabet;

/// FM-index rank/count structure over the BWT with periodic checkpoints.
#[derive(Debug, Clone)]
pub struct OccTable {
    occrate: usize,
    firstregular: u8,
    regulars: usize,
    bwt: Vec<u8>,
    /// `regulars` counters per checkpoint row; row `i` holds counts through
    /// BWT position `i * occrate` inclusive.
    checkpoints: Vec<u64>,
    /// `less[c]` = symbols strictly smaller than regular character `c`.
    less: Vec<u64>,
}

impl OccTable {
    /// Count characters in one linear pass over the BWT, snapshotting into
    /// the checkpoint array every `occrate` positions.
    ///
    /// # Panics
    ///
    /// Panics if `occrate == 0`.
    pub fn from_bwt(bwt: Vec<u8>, alphabet: &Alphabet, occrate: usize) -> OccTable {
        assert!(occrate >= 1, "occrate must be at least 1");
        let regulars = alphabet.regulars();
        let firstregular = alphabet.firstregular();

        let rows = bwt.len().div_ceil(occrate);
        let mut checkpoints = Vec::with_capacity(regulars * rows);
        let mut counts = vec![0u64; regulars];
        let mut nltr = 0u64; // symbols below the first regular
        for (r, &b) in bwt.iter().enumerate() {
            if b >= firstregular {
                counts[(b - firstregular) as usize] += 1;
            } else {
                nltr += 1;
            }
            if r % occrate == 0 {
                checkpoints.extend_from_slice(&counts);
            }
        }

        let mut less = vec![0u64; regulars];
        less[0] = nltr;
        for c in 1..regulars {
            less[c] = less[c - 1] + counts[c - 1];
        }

        OccTable {
            occrate,
            firstregular,
            regulars,
            bwt,
            checkpoints,
            less,
        }
    }

    /// Occurrences of `a` in `bwt[..r]` (half-open), for `r` in `0..=n`.
    ///
    /// Callers must pass a regular character; guard with [`OccTable::less`]
    /// first when the code comes from a pattern.
    pub fn rank(&self, r: usize, a: u8) -> usize {
        debug_assert!(r <= self.bwt.len());
        if r == 0 {
            return 0;
        }
        debug_assert!(
            a >= self.firstregular && ((a - self.firstregular) as usize) < self.regulars,
            "rank() takes a regular character"
        );
        let c = (a - self.firstregular) as usize;
        let rr = r - 1;
        let idx = rr / self.occrate;
        let mut x = self.checkpoints[self.regulars * idx + c] as usize;
        for &b in &self.bwt[idx * self.occrate + 1..=rr] {
            if b == a {
                x += 1;
            }
        }
        x
    }

    /// Occurrences of every regular character in `bwt[..r]`, in one residual
    /// scan. The error-tolerant search calls this once per live interval
    /// instead of `regulars` separate `rank` queries.
    pub fn rank_all(&self, r: usize) -> Vec<usize> {
        debug_assert!(r <= self.bwt.len());
        if r == 0 {
            return vec![0; self.regulars];
        }
        let rr = r - 1;
        let idx = rr / self.occrate;
        let base = self.regulars * idx;
        let mut x: Vec<usize> = self.checkpoints[base..base + self.regulars]
            .iter()
            .map(|&v| v as usize)
            .collect();
        for &b in &self.bwt[idx * self.occrate + 1..=rr] {
            if b >= self.firstregular {
                let c = (b - self.firstregular) as usize;
                if c < self.regulars {
                    x[c] += 1;
                }
            }
        }
        x
    }

    /// Number of characters strictly smaller than `a` in the whole BWT, or
    /// `None` if `a` is not a regular character (extension blocked).
    #[inline]
    pub fn less(&self, a: u8) -> Option<usize> {
        if a < self.firstregular {
            return None;
        }
        let c = (a - self.firstregular) as usize;
        if c < self.regulars {
            Some(self.less[c] as usize)
        } else {
            None
        }
    }

    /// The raw `less` array indexed by regular-character offset, for the
    /// bulk transitions of the error-tolerant search.
    #[inline]
    pub fn less_table(&self) -> &[u64] {
        &self.less
    }

    /// Text length (the BWT is a permutation of the sequence).
    #[inline]
    pub fn len(&self) -> usize {
        self.bwt.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bwt.is_empty()
    }

    #[inline]
    pub fn occrate(&self) -> usize {
        self.occrate
    }

    #[inline]
    pub fn firstregular(&self) -> u8 {
        self.firstregular
    }

    #[inline]
    pub fn regulars(&self) -> usize {
        self.regulars
    }

    #[inline]
    pub fn bwt(&self) -> &[u8] {
        &self.bwt
    }

    pub(crate) fn checkpoints(&self) -> &[u64] {
        &self.checkpoints
    }

    /// Reassemble a table from persisted parts; lengths already validated.
    pub(crate) fn from_parts(
        bwt: Vec<u8>,
        alphabet: &Alphabet,
        occrate: usize,
        checkpoints: Vec<u64>,
        less: Vec<u64>,
    ) -> OccTable {
        OccTable {
            occrate,
            firstregular: alphabet.firstregular(),
            regulars: alphabet.regulars(),
            bwt,
            checkpoints,
            less,
        }
    }
}
