use super::fragments::{Segment, segments};
use crate::core::align::{AlignmentSummary, SequenceAligner, SimilarityFilter};
use crate::core::record::StructureRecord;
use crate::engine::config::{FragmentConfig, SimilarityConfig};
use crate::engine::error::EngineError;
use crate::engine::stage::{FilterStage, FlatMapStage, Stage};
use tracing::{debug, instrument};

/// Builds the built-in filter for a similarity configuration.
pub fn build_filter(config: &SimilarityConfig) -> Result<SimilarityFilter, EngineError> {
    Ok(SimilarityFilter::new(&config.reference, config.min_similarity)?
        .with_scoring(config.scoring))
}

/// A segment that reached the similarity threshold, with its alignment scores.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarSegment {
    pub segment: Segment,
    pub similarity: f64,
    pub identity: f64,
}

fn align_segment<A: SequenceAligner>(
    segment: &Segment,
    filter: &SimilarityFilter<A>,
) -> Result<(AlignmentSummary, bool), EngineError> {
    let summary = filter.evaluate(&segment.sequence)?;
    let passes = filter.accepts(&summary);
    debug!(
        segment = %segment.id,
        similarity = summary.similarity(),
        identity = summary.identity(),
        passes,
        "Similarity check."
    );
    Ok((summary, passes))
}

/// Whether a segment is similar enough to the filter's reference.
pub fn segment_passes<A: SequenceAligner>(
    segment: &Segment,
    filter: &SimilarityFilter<A>,
) -> Result<bool, EngineError> {
    Ok(align_segment(segment, filter)?.1)
}

/// Decodes a record and keeps the polymer segments similar to the reference.
#[instrument(skip_all, name = "similarity_workflow", fields(structure_id = %record.structure_id))]
pub fn similar_segments<A: SequenceAligner>(
    record: &StructureRecord,
    fragments: &FragmentConfig,
    filter: &SimilarityFilter<A>,
) -> Result<Vec<SimilarSegment>, EngineError> {
    let mut kept = Vec::new();
    for segment in segments(record, fragments)? {
        let (summary, passes) = align_segment(&segment, filter)?;
        if passes {
            kept.push(SimilarSegment {
                segment,
                similarity: summary.similarity(),
                identity: summary.identity(),
            });
        }
    }
    Ok(kept)
}

/// Filters already extracted segments.
pub fn segment_filter_stage<A: SequenceAligner>(
    filter: &SimilarityFilter<A>,
) -> impl Stage<Segment, Output = Segment> + '_ {
    FilterStage::new("Similarity", move |segment: &Segment| {
        segment_passes(segment, filter)
    })
}

/// Turns records straight into their similar segments.
pub fn similarity_stage<'a, A: SequenceAligner>(
    fragments: &'a FragmentConfig,
    filter: &'a SimilarityFilter<A>,
) -> impl Stage<StructureRecord, Output = SimilarSegment> + 'a {
    FlatMapStage::new("Similarity", move |record: &StructureRecord| {
        similar_segments(record, fragments, filter)
    })
}
