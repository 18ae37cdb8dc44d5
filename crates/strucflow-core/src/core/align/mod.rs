//! Sequence similarity against a reference.
//!
//! The alignment engine sits behind [`SequenceAligner`], so any local aligner
//! can be plugged in. [`SmithWaterman`] is the engine used by default.

pub mod matrix;
pub mod smith_waterman;

pub use matrix::SubstitutionMatrix;
pub use smith_waterman::SmithWaterman;

use crate::core::sequence::{InvalidSequenceError, ProteinSequence};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AlignmentError {
    #[error("Cannot align an empty sequence")]
    EmptySequence,
    #[error("Gap costs must lie in 0..={max}, got open {open} and extend {extend}")]
    InvalidGapCost { open: i32, extend: i32, max: i32 },
    #[error("Alignment engine failed: {0}")]
    Engine(String),
}

/// Largest accepted gap opening or extension cost.
pub const MAX_GAP_COST: i32 = 1000;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimilarityError {
    #[error(transparent)]
    InvalidSequence(#[from] InvalidSequenceError),
    #[error(transparent)]
    Alignment(#[from] AlignmentError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlignmentMode {
    #[default]
    Local,
}

/// Scoring scheme handed to the aligner.
///
/// Gap costs are positive: a gap of length `n` costs `gap_open + n * gap_extend`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct AlignmentScoring {
    pub mode: AlignmentMode,
    pub gap_open: i32,
    pub gap_extend: i32,
    pub matrix: SubstitutionMatrix,
}

impl Default for AlignmentScoring {
    fn default() -> Self {
        Self {
            mode: AlignmentMode::Local,
            gap_open: 8,
            gap_extend: 1,
            matrix: SubstitutionMatrix::Blosum62,
        }
    }
}

impl AlignmentScoring {
    /// Checks both gap costs against `0..=MAX_GAP_COST`.
    pub fn validate(&self) -> Result<(), AlignmentError> {
        let range = 0..=MAX_GAP_COST;
        if range.contains(&self.gap_open) && range.contains(&self.gap_extend) {
            Ok(())
        } else {
            Err(AlignmentError::InvalidGapCost {
                open: self.gap_open,
                extend: self.gap_extend,
                max: MAX_GAP_COST,
            })
        }
    }
}

/// What the filter needs from an alignment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AlignmentSummary {
    pub score: i32,
    /// Number of alignment columns, gaps included.
    pub length: usize,
    /// Columns pairing identical residues.
    pub identities: usize,
    /// Columns pairing residues with a positive substitution score.
    pub similarities: usize,
    pub query_range: Range<usize>,
    pub target_range: Range<usize>,
}

impl AlignmentSummary {
    /// Fraction of columns with a positive substitution score, in `[0, 1]`.
    ///
    /// An empty alignment has similarity 0.
    pub fn similarity(&self) -> f64 {
        if self.length == 0 {
            0.0
        } else {
            self.similarities as f64 / self.length as f64
        }
    }

    /// Fraction of columns pairing identical residues, in `[0, 1]`.
    pub fn identity(&self) -> f64 {
        if self.length == 0 {
            0.0
        } else {
            self.identities as f64 / self.length as f64
        }
    }
}

/// A pairwise alignment engine.
pub trait SequenceAligner: Send + Sync {
    fn align(
        &self,
        query: &ProteinSequence,
        target: &ProteinSequence,
        scoring: &AlignmentScoring,
    ) -> Result<AlignmentSummary, AlignmentError>;
}

/// Keeps candidates whose similarity to a reference reaches a threshold.
#[derive(Debug, Clone)]
pub struct SimilarityFilter<A = SmithWaterman> {
    reference: ProteinSequence,
    min_similarity: f64,
    scoring: AlignmentScoring,
    aligner: A,
}

impl SimilarityFilter<SmithWaterman> {
    pub fn new(reference: &str, min_similarity: f64) -> Result<Self, InvalidSequenceError> {
        Ok(Self {
            reference: ProteinSequence::new(reference)?,
            min_similarity,
            scoring: AlignmentScoring::default(),
            aligner: SmithWaterman,
        })
    }
}

impl<A: SequenceAligner> SimilarityFilter<A> {
    pub fn with_aligner<B: SequenceAligner>(self, aligner: B) -> SimilarityFilter<B> {
        SimilarityFilter {
            reference: self.reference,
            min_similarity: self.min_similarity,
            scoring: self.scoring,
            aligner,
        }
    }

    pub fn with_scoring(mut self, scoring: AlignmentScoring) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn reference(&self) -> &ProteinSequence {
        &self.reference
    }

    pub fn min_similarity(&self) -> f64 {
        self.min_similarity
    }

    /// Aligns `candidate` against the reference.
    pub fn evaluate(&self, candidate: &str) -> Result<AlignmentSummary, SimilarityError> {
        let candidate = ProteinSequence::new(candidate)?;
        Ok(self.aligner.align(&self.reference, &candidate, &self.scoring)?)
    }

    /// Similarity of `candidate` to the reference.
    pub fn score(&self, candidate: &str) -> Result<f64, SimilarityError> {
        Ok(self.evaluate(candidate)?.similarity())
    }

    /// Whether an already computed alignment reaches the threshold.
    pub fn accepts(&self, summary: &AlignmentSummary) -> bool {
        summary.similarity() >= self.min_similarity
    }

    /// Whether `candidate` reaches the threshold. The boundary is inclusive.
    pub fn passes(&self, candidate: &str) -> Result<bool, SimilarityError> {
        Ok(self.accepts(&self.evaluate(candidate)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedAligner(AlignmentSummary);

    impl SequenceAligner for FixedAligner {
        fn align(
            &self,
            _: &ProteinSequence,
            _: &ProteinSequence,
            _: &AlignmentScoring,
        ) -> Result<AlignmentSummary, AlignmentError> {
            Ok(self.0.clone())
        }
    }

    struct FailingAligner;

    impl SequenceAligner for FailingAligner {
        fn align(
            &self,
            _: &ProteinSequence,
            _: &ProteinSequence,
            _: &AlignmentScoring,
        ) -> Result<AlignmentSummary, AlignmentError> {
            Err(AlignmentError::Engine("unavailable".into()))
        }
    }

    fn summary(similarities: usize, length: usize) -> AlignmentSummary {
        AlignmentSummary {
            length,
            similarities,
            ..Default::default()
        }
    }

    #[test]
    fn default_scoring_is_local_blosum62_with_open_8_extend_1() {
        let scoring = AlignmentScoring::default();
        assert_eq!(scoring.mode, AlignmentMode::Local);
        assert_eq!(scoring.gap_open, 8);
        assert_eq!(scoring.gap_extend, 1);
        assert_eq!(scoring.matrix, SubstitutionMatrix::Blosum62);
    }

    #[test]
    fn score_equal_to_threshold_passes() {
        let filter = SimilarityFilter::new("ACDE", 0.5)
            .unwrap()
            .with_aligner(FixedAligner(summary(50, 100)));
        assert_eq!(filter.score("ACDE").unwrap(), 0.5);
        assert!(filter.passes("ACDE").unwrap());
    }

    #[test]
    fn evaluate_reports_identity_alongside_similarity() {
        let filter = SimilarityFilter::new("ACDE", 0.5)
            .unwrap()
            .with_aligner(FixedAligner(AlignmentSummary {
                length: 10,
                identities: 4,
                similarities: 7,
                ..Default::default()
            }));
        let summary = filter.evaluate("ACDE").unwrap();
        assert_eq!(summary.identity(), 0.4);
        assert_eq!(summary.similarity(), 0.7);
        assert!(filter.accepts(&summary));
        assert_eq!(AlignmentSummary::default().identity(), 0.0);
    }

    #[test]
    fn score_below_threshold_fails() {
        let filter = SimilarityFilter::new("ACDE", 0.5)
            .unwrap()
            .with_aligner(FixedAligner(summary(49, 100)));
        assert!(!filter.passes("ACDE").unwrap());
    }

    #[test]
    fn invalid_sequences_are_reported_not_coerced() {
        assert!(matches!(
            SimilarityFilter::new("AC9", 0.5),
            Err(InvalidSequenceError::InvalidLetter { letter: '9', .. })
        ));
        let filter = SimilarityFilter::new("ACDE", 0.5).unwrap();
        assert_eq!(
            filter.passes("").unwrap_err(),
            SimilarityError::InvalidSequence(InvalidSequenceError::Empty)
        );
    }

    #[test]
    fn aligner_failures_propagate() {
        let filter = SimilarityFilter::new("ACDE", 0.0)
            .unwrap()
            .with_aligner(FailingAligner);
        assert!(matches!(
            filter.passes("ACDE"),
            Err(SimilarityError::Alignment(AlignmentError::Engine(_)))
        ));
    }

    #[test]
    fn built_in_aligner_scores_identical_sequences_as_fully_similar() {
        let filter = SimilarityFilter::new("MKTAYIAKQR", 0.9).unwrap();
        assert_eq!(filter.score("MKTAYIAKQR").unwrap(), 1.0);
        assert!(filter.passes("MKTAYIAKQR").unwrap());
        assert!(!filter.passes("PPPP").unwrap());
    }

    #[test]
    fn scoring_deserializes_with_defaults() {
        let scoring: AlignmentScoring = serde_json::from_str(r#"{"gap-open": 10}"#).unwrap();
        assert_eq!(scoring.gap_open, 10);
        assert_eq!(scoring.gap_extend, 1);
    }
}
