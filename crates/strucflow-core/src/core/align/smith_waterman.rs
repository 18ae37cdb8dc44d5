//! Smith-Waterman local alignment with affine gaps (Gotoh's three matrices).

use super::{AlignmentError, AlignmentScoring, AlignmentSummary, SequenceAligner};
use crate::core::sequence::ProteinSequence;
use tracing::trace;

/// The built-in local aligner.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmithWaterman;

#[derive(Clone, Copy, PartialEq)]
enum State {
    H,
    E,
    F,
}

impl SequenceAligner for SmithWaterman {
    fn align(
        &self,
        query: &ProteinSequence,
        target: &ProteinSequence,
        scoring: &AlignmentScoring,
    ) -> Result<AlignmentSummary, AlignmentError> {
        let q = query.as_str().as_bytes();
        let t = target.as_str().as_bytes();
        if q.is_empty() || t.is_empty() {
            return Err(AlignmentError::EmptySequence);
        }
        scoring.validate()?;

        let open = scoring.gap_open.saturating_add(scoring.gap_extend).saturating_neg();
        let extend = scoring.gap_extend.saturating_neg();
        let cols = t.len() + 1;
        let idx = |i: usize, j: usize| i * cols + j;
        let cells = (q.len() + 1) * cols;

        // h: best ending in a column; e: ending in a gap in the query; f: in the target.
        let mut h = vec![0i32; cells];
        let mut e = vec![0i32; cells];
        let mut f = vec![0i32; cells];
        let (mut best, mut best_i, mut best_j) = (0i32, 0usize, 0usize);

        for i in 1..=q.len() {
            for j in 1..=t.len() {
                e[idx(i, j)] = h[idx(i, j - 1)]
                    .saturating_add(open)
                    .max(e[idx(i, j - 1)].saturating_add(extend))
                    .max(0);
                f[idx(i, j)] = h[idx(i - 1, j)]
                    .saturating_add(open)
                    .max(f[idx(i - 1, j)].saturating_add(extend))
                    .max(0);
                let diag = h[idx(i - 1, j - 1)]
                    .saturating_add(scoring.matrix.score(q[i - 1], t[j - 1]));
                let cell = diag.max(e[idx(i, j)]).max(f[idx(i, j)]).max(0);
                h[idx(i, j)] = cell;
                if cell > best {
                    (best, best_i, best_j) = (cell, i, j);
                }
            }
        }

        if best == 0 {
            return Ok(AlignmentSummary::default());
        }

        let (mut i, mut j) = (best_i, best_j);
        let (mut length, mut identities, mut similarities) = (0usize, 0usize, 0usize);
        let mut state = State::H;

        loop {
            match state {
                State::H => {
                    if i == 0 || j == 0 || h[idx(i, j)] == 0 {
                        break;
                    }
                    let sub = scoring.matrix.score(q[i - 1], t[j - 1]);
                    if h[idx(i, j)] == h[idx(i - 1, j - 1)].saturating_add(sub) {
                        length += 1;
                        if q[i - 1] == t[j - 1] {
                            identities += 1;
                        }
                        if sub > 0 {
                            similarities += 1;
                        }
                        i -= 1;
                        j -= 1;
                    } else if h[idx(i, j)] == e[idx(i, j)] {
                        state = State::E;
                    } else {
                        state = State::F;
                    }
                }
                State::E => {
                    length += 1;
                    if e[idx(i, j)] == h[idx(i, j - 1)].saturating_add(open) {
                        state = State::H;
                    }
                    j -= 1;
                }
                State::F => {
                    length += 1;
                    if f[idx(i, j)] == h[idx(i - 1, j)].saturating_add(open) {
                        state = State::H;
                    }
                    i -= 1;
                }
            }
        }

        trace!(score = best, length, identities, similarities, "Local alignment finished.");
        Ok(AlignmentSummary {
            score: best,
            length,
            identities,
            similarities,
            query_range: i..best_i,
            target_range: j..best_j,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::align::MAX_GAP_COST;

    fn align(a: &str, b: &str) -> AlignmentSummary {
        SmithWaterman
            .align(
                &ProteinSequence::new(a).unwrap(),
                &ProteinSequence::new(b).unwrap(),
                &AlignmentScoring::default(),
            )
            .unwrap()
    }

    #[test]
    fn identical_sequences_align_end_to_end() {
        let summary = align("ACDEGHIK", "ACDEGHIK");
        assert_eq!(summary.score, 4 + 9 + 6 + 5 + 6 + 8 + 4 + 5);
        assert_eq!(summary.length, 8);
        assert_eq!(summary.identities, 8);
        assert_eq!(summary.similarity(), 1.0);
        assert_eq!(summary.query_range, 0..8);
        assert_eq!(summary.target_range, 0..8);
    }

    #[test]
    fn single_deletion_costs_open_plus_extend() {
        let summary = align("ACDEFGHIK", "ACDEGHIK");
        assert_eq!(summary.score, 24 - 9 + 23);
        assert_eq!(summary.length, 9);
        assert_eq!(summary.similarities, 8);
        assert!((summary.similarity() - 8.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn local_alignment_ignores_unrelated_flanks() {
        let summary = align("PPPPWWWWPPPP", "WWWW");
        assert_eq!(summary.score, 44);
        assert_eq!(summary.length, 4);
        assert_eq!(summary.query_range, 4..8);
        assert_eq!(summary.similarity(), 1.0);
    }

    #[test]
    fn largest_gap_costs_still_align() {
        let scoring = AlignmentScoring {
            gap_open: MAX_GAP_COST,
            gap_extend: MAX_GAP_COST,
            ..Default::default()
        };
        let summary = SmithWaterman
            .align(
                &ProteinSequence::new("ACDEFGHIK").unwrap(),
                &ProteinSequence::new("ACDEGHIK").unwrap(),
                &scoring,
            )
            .unwrap();
        // No gap can pay for itself, so only the "ACDE" run survives.
        assert_eq!(summary.length, 4);
        assert_eq!(summary.score, 24);
        assert_eq!(summary.query_range, 0..4);
    }

    #[test]
    fn out_of_range_gap_costs_are_errors() {
        let sequence = ProteinSequence::new("ACDE").unwrap();
        for (gap_open, gap_extend) in [(i32::MAX, 1), (8, i32::MAX), (-1, 1), (8, i32::MIN)] {
            let scoring = AlignmentScoring {
                gap_open,
                gap_extend,
                ..Default::default()
            };
            let err = SmithWaterman.align(&sequence, &sequence, &scoring).unwrap_err();
            assert!(matches!(err, AlignmentError::InvalidGapCost { .. }));
        }
    }

    #[test]
    fn sequences_without_positive_pairs_have_zero_similarity() {
        let summary = align("WWWW", "PPPP");
        assert_eq!(summary.score, 0);
        assert_eq!(summary.length, 0);
        assert_eq!(summary.similarity(), 0.0);
    }
}
