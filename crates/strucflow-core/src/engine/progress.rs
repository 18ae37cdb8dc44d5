/// Events emitted while a batch is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// A stage is about to run over `records` inputs.
    BatchStart { stage: &'static str, records: u64 },
    /// One input is done. Emitted from worker threads, in completion order.
    RecordDone { failed: bool },
    BatchFinish { succeeded: u64, failed: u64 },
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Forwards [`Progress`] events to an optional callback.
///
/// The reporter is shared by reference across worker threads, so the callback
/// must be `Send + Sync`.
#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn events_reach_the_callback_in_order() {
        let seen = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            seen.lock().unwrap().push(event);
        }));
        reporter.report(Progress::BatchStart { stage: "Decode", records: 2 });
        reporter.report(Progress::RecordDone { failed: true });
        reporter.report(Progress::BatchFinish { succeeded: 1, failed: 1 });
        drop(reporter);

        assert_eq!(
            seen.into_inner().unwrap(),
            vec![
                Progress::BatchStart { stage: "Decode", records: 2 },
                Progress::RecordDone { failed: true },
                Progress::BatchFinish { succeeded: 1, failed: 1 },
            ]
        );
    }

    #[test]
    fn reporter_without_callback_is_silent() {
        let reporter = ProgressReporter::new();
        reporter.report(Progress::RecordDone { failed: false });
    }
}
