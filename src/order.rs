//! Suffix ordering by doubly-linked-list insertion (the min-L/R method).
//!
//! # Algorithm Overview
//!
//! ```text
//! Input: "banana$"   (codes: $ special, a < b < n regular)
//!
//! Process positions right-to-left. The list threads all inserted positions
//! in suffix-lexicographic order; first[c] / last[c] bound the run of
//! suffixes starting with code c.
//!
//!   p=6 '$'  new code      → runs: [$:6]
//!   p=5 'a'  new code      → [$:6][a:5]
//!   p=4 'n'  new code      → [$:6][a:5][n:4]
//!   p=3 'a'  seen, regular → walk from p+1=4 to find a neighbor whose
//!                             preceding symbol is 'a', splice next to it
//!   ...
//!
//! Output list, front to back: 6 5 3 1 0 4 2
//! ```
//!
//! No suffix comparisons are performed beyond single-character lookups: each
//! insertion walks the list alternately towards the front and the back from
//! position `p + 1` until it meets a position whose preceding symbol equals
//! the one being inserted. The suffix at `p` belongs immediately next to that
//! neighbor's predecessor rank.
//!
//! # Complexity
//!
//! - Worst case O(n · SIZE) list steps, O(n · alphabet) in practice.
//! - Space: two `usize` links per position.
//!
//! The number of list-traversal steps is returned in [`SuffixOrder::steps`]
//! so callers can verify performance characteristics on their data.

use crate::alphabet::Sequence;

/// Nil link in `nextpos`/`prevpos` (no successor/predecessor).
pub const NIL: usize = usize::MAX;

/// The suffix order of a sequence as a threaded doubly linked list.
///
/// Traversing `nextpos` from `firstpos` visits all text positions in
/// ascending suffix-lexicographic order. Exactly one position has
/// `nextpos == NIL` and exactly one (`firstpos`) has `prevpos == NIL`.
#[derive(Debug, Clone)]
pub struct SuffixOrder {
    pub nextpos: Vec<usize>,
    pub prevpos: Vec<usize>,
    pub firstpos: usize,
    /// List-traversal steps spent building the order.
    pub steps: u64,
}

impl SuffixOrder {
    /// Build the suffix order of `seq` with min-L/R insertion.
    pub fn build(seq: &Sequence) -> SuffixOrder {
        let n = seq.len();
        if n == 0 {
            return SuffixOrder {
                nextpos: Vec::new(),
                prevpos: Vec::new(),
                firstpos: NIL,
                steps: 0,
            };
        }
        // Sequence construction guarantees a trailing separator, which keeps
        // the walk from ever starting at p + 1 == n on a regular code.
        debug_assert!(seq.alphabet().is_special(seq.at(n - 1)));

        let mut b = Builder {
            seq,
            first: vec![NIL; seq.alphabet().size()],
            last: vec![NIL; seq.alphabet().size()],
            prv: vec![NIL; n],
            nxt: vec![NIL; n],
            steps: 0,
        };

        for p in (0..n).rev() {
            let ch = seq.at(p);
            b.steps += 1;
            if b.first[ch as usize] == NIL {
                b.insert_as_new(p, ch);
            } else if seq.alphabet().is_special(ch) {
                // Specials carry no further context: ties sort by insertion,
                // and inserting as first keeps ascending text positions.
                b.insert_as_first(p, ch);
            } else {
                b.insert_regular(p, ch);
                b.steps -= 1;
            }
        }

        let firstpos = b.first.iter().copied().find(|&p| p != NIL).unwrap_or(NIL);
        SuffixOrder {
            nextpos: b.nxt,
            prevpos: b.prv,
            firstpos,
            steps: b.steps,
        }
    }

    /// Number of positions in the order.
    pub fn len(&self) -> usize {
        self.nextpos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nextpos.is_empty()
    }
}

struct Builder<'a> {
    seq: &'a Sequence,
    first: Vec<usize>,
    last: Vec<usize>,
    prv: Vec<usize>,
    nxt: Vec<usize>,
    steps: u64,
}

impl Builder<'_> {
    fn insert_between(&mut self, p1: usize, p2: usize, i: usize) {
        self.prv[i] = p1;
        self.nxt[i] = p2;
        if p2 != NIL {
            self.prv[p2] = i;
        }
        if p1 != NIL {
            self.nxt[p1] = i;
        }
    }

    fn insert_as_first(&mut self, i: usize, ch: u8) {
        let p = self.first[ch as usize];
        self.insert_between(self.prv[p], p, i);
        self.first[ch as usize] = i;
    }

    fn insert_as_last(&mut self, i: usize, ch: u8) {
        let p = self.last[ch as usize];
        self.insert_between(p, self.nxt[p], i);
        self.last[ch as usize] = i;
    }

    /// First occurrence of `ch`: open a singleton run between the nearest
    /// populated smaller and larger runs.
    fn insert_as_new(&mut self, i: usize, ch: u8) {
        let asize = self.seq.alphabet().size();
        self.first[ch as usize] = i;
        self.last[ch as usize] = i;

        let mut cp = ch as usize;
        let ip = loop {
            if cp == 0 {
                break NIL;
            }
            cp -= 1;
            if self.last[cp] != NIL {
                break self.last[cp];
            }
        };

        let mut cs = ch as usize + 1;
        while cs < asize && self.first[cs] == NIL {
            cs += 1;
        }
        let js = if cs < asize { self.first[cs] } else { NIL };

        self.insert_between(ip, js, i);
    }

    /// Already-seen regular code: walk outward from `p + 1`, alternately
    /// towards the list front and back, until a neighbor whose preceding
    /// symbol is `ch` pins down the insertion point.
    fn insert_regular(&mut self, p: usize, ch: u8) {
        let mut pup = p + 1;
        let mut pdn = p + 1;
        loop {
            // look "up"
            self.steps += 1;
            pup = self.prv[pup];
            if pup == NIL {
                self.insert_as_first(p, ch);
                return;
            }
            if pup > 0 && self.seq.at(pup - 1) == ch {
                pup -= 1;
                if self.last[ch as usize] == pup {
                    self.insert_as_last(p, ch);
                } else {
                    let after = self.nxt[pup];
                    self.insert_between(pup, after, p);
                }
                return;
            }
            // look "down"
            self.steps += 1;
            pdn = self.nxt[pdn];
            if pdn == NIL {
                self.insert_as_last(p, ch);
                return;
            }
            if pdn > 0 && self.seq.at(pdn - 1) == ch {
                pdn -= 1;
                if self.first[ch as usize] == pdn {
                    self.insert_as_first(p, ch);
                } else {
                    let before = self.prv[pdn];
                    self.insert_between(before, pdn, p);
                }
                return;
            }
        }
    }
}
