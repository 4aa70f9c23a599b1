//! FM-index construction and matching statistics over concatenated symbol sequences.
//!
//! This crate builds a suffix-array based full-text index for collections of
//! records encoded over a small alphabet, and answers backward-search queries
//! against it: exact intervals, per-position matching statistics, searches with
//! optional pattern characters, and searches tolerating a bounded number of
//! edit errors.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ alphabet.rs  │────▶│   order.rs   │────▶│   index.rs   │
//! │ (Alphabet,   │     │ (SuffixOrder)│     │ (SuffixIndex,│
//! │  Sequence)   │     │              │     │  pos/bwt)    │
//! └──────────────┘     └──────────────┘     └──────┬───────┘
//!                                                  │
//!                      ┌──────────────┐     ┌──────▼───────┐
//!                      │    occ.rs    │     │   search.rs  │
//!                      │  (OccTable)  │────▶│ (SearchEngine│
//!                      │    lcp.rs    │     │  MatchStat)  │
//!                      │  (LcpTable)  │     └──────────────┘
//!                      └──────────────┘
//! ```
//!
//! Construction derives the suffix order by linked-list insertion, then the
//! Burrows-Wheeler transform, a checkpointed rank table, and optionally a
//! compact LCP table used to widen intervals cheaply during statistics runs.
//! `binary.rs` persists the rank and LCP tables in a checksummed frame format;
//! `verify.rs` re-checks every structural invariant of a built or reloaded
//! index by brute force.
//!
//! # Usage
//!
//! ```ignore
//! use fmseq::{Alphabet, Sequence, SuffixIndex, BuildOptions};
//!
//! let mut seq = Sequence::new(Alphabet::dna());
//! seq.append_str("chr1", "ACGTACGT")?;
//! let index = SuffixIndex::build(seq, &BuildOptions::default());
//!
//! let engine = index.engine();
//! let stats = engine.suffix_search(&pattern, 3, 1)?;
//! ```

// Module declarations
pub mod alphabet;
pub mod binary;
pub mod contracts;
pub mod index;
pub mod lcp;
pub mod occ;
pub mod order;
pub mod search;
pub mod testing;
pub mod verify;

// Re-exports for public API
pub use alphabet::{Alphabet, AlphabetError, SeqEntry, Sequence};
pub use index::{lcp_threshold, BuildOptions, SuffixIndex};
pub use lcp::{LcpMode, LcpTable};
pub use occ::OccTable;
pub use order::SuffixOrder;
pub use search::{
    ErrorMatch, MatchStat, MmsOptions, SearchEngine, SearchError, MAX_ERRORS,
};
pub use verify::{verify_index, InvariantError};
