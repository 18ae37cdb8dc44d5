use crate::core::record::StructureRecord;
use crate::engine::config::QualityConfig;
use crate::engine::stage::{FilterStage, Stage};
use tracing::trace;

/// Whether a record is better than every configured bound.
///
/// Bounds are strict. A record without the metric a bound refers to (or with
/// a non-finite value) fails that bound.
pub fn passes_quality(record: &StructureRecord, config: &QualityConfig) -> bool {
    let below = |value: Option<f32>, bound: Option<f64>| match bound {
        None => true,
        Some(max) => value
            .map(f64::from)
            .is_some_and(|v| v.is_finite() && v < max),
    };
    let passes = below(record.resolution, config.max_resolution)
        && below(record.r_free, config.max_r_free);
    trace!(structure_id = %record.structure_id, passes, "Quality check.");
    passes
}

pub fn quality_stage(
    config: &QualityConfig,
) -> impl Stage<StructureRecord, Output = StructureRecord> + '_ {
    FilterStage::new("Quality", move |record: &StructureRecord| {
        Ok(passes_quality(record, config))
    })
}
