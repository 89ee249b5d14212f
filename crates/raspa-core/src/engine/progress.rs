use crate::core::models::job::{JobHandle, JobStatus};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Progress {
    Submitted { handle: JobHandle },
    StatusPolled { status: JobStatus },
    Waiting { interval: Duration },

    DownloadStarted { total_bytes: Option<u64> },
    DownloadAdvanced { downloaded: u64 },
    DownloadFinished { path: PathBuf, bytes: u64 },
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

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
    use std::sync::{Arc, Mutex};

    #[test]
    fn reporter_without_callback_ignores_events() {
        let reporter = ProgressReporter::new();
        reporter.report(Progress::DownloadAdvanced { downloaded: 1 });
    }

    #[test]
    fn reporter_forwards_events_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let reporter = ProgressReporter::with_callback(Box::new(move |event| {
            if let Progress::DownloadAdvanced { downloaded } = event {
                sink.lock().unwrap().push(downloaded);
            }
        }));

        reporter.report(Progress::DownloadStarted {
            total_bytes: Some(30),
        });
        reporter.report(Progress::DownloadAdvanced { downloaded: 10 });
        reporter.report(Progress::DownloadAdvanced { downloaded: 30 });

        assert_eq!(*seen.lock().unwrap(), vec![10, 30]);
    }
}
