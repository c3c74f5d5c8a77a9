//! Run report: one entry per attempted target.

use std::path::PathBuf;

use crate::error::SyncError;
use crate::reconcile::TargetOutcome;

/// Result of reconciling one file.
#[derive(Debug)]
pub struct ReportEntry {
    pub path: PathBuf,
    pub outcome: Result<TargetOutcome, SyncError>,
}

/// Outcome of a whole run.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Version tag stamped on every document sent during the run.
    pub version_tag: String,
    pub dry_run: bool,
    /// Entries in the order the targets were processed.
    pub entries: Vec<ReportEntry>,
    /// Targets never attempted because the run stopped at a failure.
    pub not_attempted: Vec<PathBuf>,
}

impl SyncReport {
    fn count(&self, pred: impl Fn(&TargetOutcome) -> bool) -> usize {
        self.entries
            .iter()
            .filter(|e| e.outcome.as_ref().is_ok_and(&pred))
            .count()
    }

    /// Created, or would have been created in a dry run.
    pub fn created(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                TargetOutcome::Created { .. } | TargetOutcome::WouldCreate { .. }
            )
        })
    }

    /// Updated, or would have been updated in a dry run.
    pub fn updated(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                TargetOutcome::Updated { .. } | TargetOutcome::WouldUpdate { .. }
            )
        })
    }

    pub fn unchanged(&self) -> usize {
        self.count(|o| matches!(o, TargetOutcome::Unchanged { .. }))
    }

    pub fn failed(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_err()).count()
    }

    /// `true` when every target was attempted and none failed.
    pub fn is_success(&self) -> bool {
        self.failed() == 0 && self.not_attempted.is_empty()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&PathBuf, &SyncError)> {
        self.entries
            .iter()
            .filter_map(|e| e.outcome.as_ref().err().map(|err| (&e.path, err)))
    }
}
