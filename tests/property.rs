//! Property-based tests using proptest.
//!
//! These tests check the index and search layers against brute-force
//! re-computations on randomly generated record collections.

mod common;

use common::{build_dna_index, encode, naive_lcp, naive_occurrences};
use fmseq::{BuildOptions, LcpMode, MmsOptions, SuffixIndex};
use proptest::prelude::*;
use proptest::string::string_regex;

// ============================================================================
// STRATEGIES
// ============================================================================

/// Generate one DNA record.
fn record_strategy() -> impl Strategy<Value = String> {
    string_regex("[ACGT]{4,60}").unwrap()
}

/// Generate a collection of DNA records.
fn corpus_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(record_strategy(), 1..5)
}

/// Generate a corpus together with a query drawn from one of its records.
fn corpus_and_query_strategy() -> impl Strategy<Value = (Vec<String>, String)> {
    corpus_strategy().prop_flat_map(|records| {
        let pick = 0..records.len();
        (Just(records), pick).prop_flat_map(|(records, k)| {
            let text = records[k].clone();
            let len = 2..=text.len().min(12);
            (Just(records), Just(text), len).prop_flat_map(|(records, text, len)| {
                let start = 0..=text.len() - len;
                (Just(records), Just(text), Just(len), start).prop_map(
                    |(records, text, len, start)| (records, text[start..start + len].to_string()),
                )
            })
        })
    })
}

fn build(records: &[String], options: &BuildOptions) -> SuffixIndex {
    let named: Vec<(String, &str)> = records
        .iter()
        .enumerate()
        .map(|(i, text)| (format!("r{}", i), text.as_str()))
        .collect();
    let refs: Vec<(&str, &str)> = named
        .iter()
        .map(|(name, text)| (name.as_str(), *text))
        .collect();
    build_dna_index(&refs, options)
}

// ============================================================================
// LCP TABLE PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn lcp_matches_pairwise_comparison(records in corpus_strategy()) {
        let options = BuildOptions { occrate: 4, lcp_mode: Some(LcpMode::Full) };
        let index = build(&records, &options);
        let codes = index.sequence().codes();
        let pos = index.pos();
        let lcp = index.lcp().expect("built with an lcp table");

        prop_assert_eq!(lcp.at(0), -1);
        for r in 1..pos.len() {
            let expected = naive_lcp(codes, pos[r - 1], pos[r]) as i64;
            prop_assert_eq!(lcp.at(r), expected);
        }
    }

    #[test]
    fn compact_lcp_modes_agree_with_full(records in corpus_strategy()) {
        let full = build(&records, &BuildOptions { occrate: 4, lcp_mode: Some(LcpMode::Full) });
        let reference = full.lcp().unwrap();

        for mode in [LcpMode::Byte, LcpMode::Word] {
            let compact = build(&records, &BuildOptions { occrate: 4, lcp_mode: Some(mode) });
            let table = compact.lcp().unwrap();
            prop_assert_eq!(table.len(), reference.len());
            for r in 0..reference.len() {
                prop_assert_eq!(table.at(r), reference.at(r));
            }
        }
    }

    #[test]
    fn lcp_iterator_agrees_with_random_access(records in corpus_strategy()) {
        let options = BuildOptions { occrate: 4, lcp_mode: Some(LcpMode::Byte) };
        let index = build(&records, &options);
        let lcp = index.lcp().unwrap();

        let streamed: Vec<i64> = lcp.iter().collect();
        let accessed: Vec<i64> = (0..lcp.len()).map(|r| lcp.at(r)).collect();
        prop_assert_eq!(streamed, accessed);
    }
}

// ============================================================================
// SEARCH PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn exact_interval_is_sound_and_complete((records, query) in corpus_and_query_strategy()) {
        let index = build(&records, &BuildOptions::default());
        let codes = index.sequence().codes().to_vec();
        let pat = encode(&index, &query);

        let expected = naive_occurrences(&codes, &pat);
        let found: Vec<usize> = match index.engine().exact_interval(&pat) {
            Some((lo, hi)) => {
                let mut offsets: Vec<usize> = (lo..=hi).map(|r| index.pos()[r]).collect();
                offsets.sort_unstable();
                offsets
            }
            None => Vec::new(),
        };
        prop_assert_eq!(found, expected);
    }

    #[test]
    fn occrate_does_not_change_answers((records, query) in corpus_and_query_strategy()) {
        let pat_src = query;
        let baseline = build(&records, &BuildOptions { occrate: 1, lcp_mode: Some(LcpMode::Byte) });
        let pat = encode(&baseline, &pat_src);
        let reference = baseline.engine().backward_matching_statistics(&pat, None, None);

        for occrate in [4usize, 64, 1024] {
            let other = build(&records, &BuildOptions { occrate, lcp_mode: Some(LcpMode::Byte) });
            let stats = other.engine().backward_matching_statistics(&pat, None, None);
            prop_assert_eq!(&stats, &reference);
        }
    }

    #[test]
    fn all_mandatory_wildcard_mask_changes_nothing((records, query) in corpus_and_query_strategy()) {
        let index = build(&records, &BuildOptions::default());
        let engine = index.engine();
        let pat = encode(&index, &query);
        let opt = vec![false; pat.len()];

        let plain = engine.backward_matching_statistics(&pat, None, None);
        let masked = engine
            .backward_matching_statistics_with_optional_characters(&pat, &opt, None, None)
            .unwrap();
        prop_assert_eq!(masked, plain);
    }

    #[test]
    fn mms_reports_a_filtered_subset((records, query) in corpus_and_query_strategy()) {
        let index = build(&records, &BuildOptions::default());
        let engine = index.engine();
        let pat = encode(&index, &query);
        let options = MmsOptions { minlen: 2, ..MmsOptions::default() };

        let stats = engine.backward_matching_statistics(&pat, None, None);
        let jumps = engine.mms(&pat, None, &options).unwrap();

        for jump in &jumps {
            prop_assert!(jump.len >= options.minlen);
            prop_assert!(stats.contains(jump));
        }
        // Leftmost matched positions strictly decrease across reports.
        for pair in jumps.windows(2) {
            prop_assert!(pair[1].left < pair[0].left);
        }
    }

    #[test]
    fn error_search_finds_a_planted_substitution(
        (records, query) in corpus_and_query_strategy(),
        flip in 0usize..64,
    ) {
        prop_assume!(query.len() >= 4);
        let index = build(&records, &BuildOptions::default());
        let engine = index.engine();

        let mut mutated: Vec<char> = query.chars().collect();
        let at = flip % mutated.len();
        mutated[at] = match mutated[at] {
            'A' => 'C',
            'C' => 'G',
            'G' => 'T',
            _ => 'A',
        };
        let mutated: String = mutated.into_iter().collect();
        let pat = encode(&index, &mutated);

        let hits = engine.backward_search_with_errors(&pat, 1).unwrap();
        prop_assert!(
            hits.iter().any(|hit| hit.matched == pat.len()),
            "a single substitution must be recoverable with one error"
        );
    }
}

// ============================================================================
// ACCUMULATION PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn cumms_scores_account_for_every_jump((records, query) in corpus_and_query_strategy()) {
        let index = build(&records, &BuildOptions::default());
        let pat = encode(&index, &query);
        let options = MmsOptions { minlen: 2, ..MmsOptions::default() };

        let jumps = index.engine().mms(&pat, None, &options).unwrap();
        let expected_total: u64 = jumps
            .iter()
            .map(|jump| (jump.hi - jump.lo + 1) as u64 * jump.len as u64)
            .sum();
        let expected_best: u64 = jumps.iter().map(|jump| jump.len as u64).max().unwrap_or(0);

        let (cumulative, best) = index.cumms(&pat, None, &options).unwrap();
        prop_assert_eq!(cumulative.len(), records.len());
        prop_assert_eq!(best.len(), records.len());

        let cumulative_total: u64 = cumulative.iter().map(|(score, _)| score).sum();
        prop_assert_eq!(cumulative_total, expected_total);

        // The top single-match score is the longest reported jump, and no
        // record's best match can exceed its cumulative total.
        prop_assert_eq!(best[0].0, expected_best);
        for &(score, idx) in &best {
            let (total, _) = cumulative.iter().find(|(_, i)| *i == idx).unwrap();
            prop_assert!(score <= *total);
        }
    }
}
