use super::error::EngineError;
use super::progress::{Progress, ProgressReporter};
use super::stage::Stage;
use crate::core::frequency::FrequencyTable;
use crate::core::record::StructureRecord;
use std::hash::Hash;
use tracing::{info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Anything with a stable identifier to tag failures and outputs with.
pub trait Identified {
    fn id(&self) -> &str;
}

impl Identified for StructureRecord {
    fn id(&self) -> &str {
        &self.structure_id
    }
}

/// What became of one input.
#[derive(Debug)]
pub enum RecordOutcome<O> {
    Succeeded { id: String, outputs: Vec<O> },
    Failed { id: String, error: EngineError },
}

impl<O> RecordOutcome<O> {
    pub fn id(&self) -> &str {
        match self {
            RecordOutcome::Succeeded { id, .. } | RecordOutcome::Failed { id, .. } => id,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RecordOutcome::Succeeded { .. })
    }
}

/// Outcomes of one batch, in input order.
#[derive(Debug)]
pub struct BatchReport<O> {
    pub stage: &'static str,
    pub outcomes: Vec<RecordOutcome<O>>,
}

impl<O> BatchReport<O> {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn outputs(&self) -> impl Iterator<Item = &O> {
        self.outcomes.iter().flat_map(|outcome| match outcome {
            RecordOutcome::Succeeded { outputs, .. } => outputs.as_slice(),
            RecordOutcome::Failed { .. } => &[],
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &EngineError)> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            RecordOutcome::Failed { id, error } => Some((id.as_str(), error)),
            RecordOutcome::Succeeded { .. } => None,
        })
    }

    /// All outputs of successful records, flattened in input order.
    pub fn into_outputs(self) -> Vec<O> {
        self.outcomes
            .into_iter()
            .flat_map(|outcome| match outcome {
                RecordOutcome::Succeeded { outputs, .. } => outputs,
                RecordOutcome::Failed { .. } => Vec::new(),
            })
            .collect()
    }
}

impl<K: Eq + Hash> BatchReport<FrequencyTable<K>> {
    /// Sums the per-record tables into one.
    pub fn merged_frequencies(self) -> FrequencyTable<K> {
        let mut total = FrequencyTable::new();
        for table in self.into_outputs() {
            total.merge(table);
        }
        total
    }
}

/// Applies a [`Stage`] to every record of a batch.
///
/// Records are independent: a failing record is logged and reported, and
/// never stops the others. Output order always equals input order.
#[derive(Default)]
pub struct BatchRunner<'a> {
    reporter: ProgressReporter<'a>,
}

impl<'a> BatchRunner<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reporter(reporter: ProgressReporter<'a>) -> Self {
        Self { reporter }
    }

    #[instrument(skip_all, name = "batch", fields(stage = stage.name(), records = records.len()))]
    pub fn run<I, S>(&self, stage: &S, records: &[I]) -> BatchReport<S::Output>
    where
        I: Identified + Sync,
        S: Stage<I>,
    {
        self.reporter.report(Progress::BatchStart {
            stage: stage.name(),
            records: records.len() as u64,
        });

        #[cfg(not(feature = "parallel"))]
        let iterator = records.iter();

        #[cfg(feature = "parallel")]
        let iterator = records.par_iter();

        let outcomes: Vec<RecordOutcome<S::Output>> = iterator
            .map(|record| {
                let outcome = match stage.apply(record) {
                    Ok(outputs) => RecordOutcome::Succeeded {
                        id: record.id().to_string(),
                        outputs,
                    },
                    Err(error) => {
                        warn!(record = record.id(), error = %error, "Record failed.");
                        RecordOutcome::Failed {
                            id: record.id().to_string(),
                            error: error.for_record(record.id()),
                        }
                    }
                };
                self.reporter.report(Progress::RecordDone {
                    failed: !outcome.is_success(),
                });
                outcome
            })
            .collect();

        let report = BatchReport {
            stage: stage.name(),
            outcomes,
        };
        self.reporter.report(Progress::BatchFinish {
            succeeded: report.succeeded() as u64,
            failed: report.failed() as u64,
        });
        info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            "Batch finished."
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::stage::{FilterStage, FlatMapStage, MapStage};
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: String,
        value: i64,
    }

    impl Identified for Item {
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn items(values: &[i64]) -> Vec<Item> {
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| Item {
                id: format!("R{i}"),
                value,
            })
            .collect()
    }

    fn reject_negative(item: &Item) -> Result<i64, EngineError> {
        if item.value < 0 {
            Err(EngineError::Stage {
                stage: "sqrt",
                reason: "negative".to_string(),
            })
        } else {
            Ok(item.value)
        }
    }

    #[test]
    fn failing_records_do_not_stop_the_batch() {
        let records = items(&[4, -1, 9, -5, 16]);
        let stage = MapStage::new("sqrt", reject_negative);
        let report = BatchRunner::new().run(&stage, &records);

        assert_eq!(report.stage, "sqrt");
        assert_eq!(report.succeeded(), 3);
        assert_eq!(report.failed(), 2);
        let failed: Vec<_> = report.failures().map(|(id, _)| id.to_string()).collect();
        assert_eq!(failed, vec!["R1", "R3"]);
        for (_, error) in report.failures() {
            assert!(matches!(error, EngineError::Record { .. }));
            assert!(matches!(error.root(), EngineError::Stage { .. }));
        }
        assert_eq!(report.into_outputs(), vec![4, 9, 16]);
    }

    #[test]
    fn output_order_follows_input_order() {
        let values: Vec<i64> = (0..500).collect();
        let records = items(&values);
        let stage = FlatMapStage::new("pair", |item: &Item| Ok(vec![item.value, -item.value]));
        let outputs = BatchRunner::new().run(&stage, &records).into_outputs();
        let expected: Vec<i64> = values.iter().flat_map(|&v| [v, -v]).collect();
        assert_eq!(outputs, expected);
    }

    #[test]
    fn filter_stage_keeps_matching_records() {
        let records = items(&[1, 2, 3, 4]);
        let stage = FilterStage::new("even", |item: &Item| Ok(item.value % 2 == 0));
        let report = BatchRunner::new().run(&stage, &records);
        let kept: Vec<_> = report.outputs().map(|item| item.id.as_str()).collect();
        assert_eq!(kept, vec!["R1", "R3"]);
        assert_eq!(report.failed(), 0);
    }

    #[test]
    fn progress_counts_every_record() {
        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            events.lock().unwrap().push(event);
        }));
        let records = items(&[1, -1, 2]);
        let stage = MapStage::new("sqrt", reject_negative);
        BatchRunner::with_reporter(reporter).run(&stage, &records);

        let events = events.into_inner().unwrap();
        assert_eq!(events.len(), 5);
        assert_eq!(events[0], Progress::BatchStart { stage: "sqrt", records: 3 });
        let failed_records = events
            .iter()
            .filter(|e| **e == Progress::RecordDone { failed: true })
            .count();
        assert_eq!(failed_records, 1);
        assert_eq!(events[4], Progress::BatchFinish { succeeded: 2, failed: 1 });
    }

    #[test]
    fn per_record_frequency_tables_merge() {
        let records = items(&[1, 2, 3]);
        let stage = MapStage::new("parity", |item: &Item| {
            let key = if item.value % 2 == 0 { "even" } else { "odd" };
            Ok(std::iter::once(key.to_string()).collect::<FrequencyTable<String>>())
        });
        let merged = BatchRunner::new().run(&stage, &records).merged_frequencies();
        assert_eq!(merged.get("odd"), 2);
        assert_eq!(merged.get("even"), 1);
        assert_eq!(merged.total(), 3);
    }

    #[test]
    fn empty_batch_yields_empty_report() {
        let records: Vec<Item> = Vec::new();
        let stage = MapStage::new("sqrt", reject_negative);
        let report = BatchRunner::new().run(&stage, &records);
        assert_eq!(report.succeeded(), 0);
        assert!(report.into_outputs().is_empty());
    }
}
