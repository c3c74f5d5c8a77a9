//! Target enumeration and the per-run loop.
//!
//! A sync path is either one file or a directory whose immediate entries are
//! the targets. Targets run one at a time, in file-name order.

use std::fs::DirEntry;
use std::path::{Path, PathBuf};

use crate::error::{io_err, SyncError};
use crate::reconcile::Reconciler;
use crate::report::{ReportEntry, SyncReport};

/// What to do after a target fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop at the first failed target; later targets are not attempted.
    #[default]
    Abort,
    /// Record the failure and move on to the next target.
    Continue,
}

/// List the targets under `root`.
///
/// A regular file is its own single target. For a directory, sub-directories
/// and dot-files are skipped and the rest are returned sorted by file name.
pub fn enumerate_targets(root: &Path) -> Result<Vec<PathBuf>, SyncError> {
    let meta = std::fs::metadata(root).map_err(|e| io_err(root, e))?;
    if !meta.is_dir() {
        return Ok(vec![root.to_path_buf()]);
    }

    let mut targets = Vec::new();
    let entries = std::fs::read_dir(root).map_err(|e| io_err(root, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(root, e))?;
        let path = entry.path();
        if entry.file_name().to_string_lossy().starts_with('.') {
            tracing::debug!("skipping hidden entry {}", path.display());
            continue;
        }
        if is_directory(&entry) {
            tracing::debug!("skipping directory {}", path.display());
            continue;
        }
        targets.push(path);
    }
    targets.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(targets)
}

/// Symlinks are followed. An entry whose type cannot be determined is kept,
/// so the failure is reported against that target when it is loaded.
fn is_directory(entry: &DirEntry) -> bool {
    match entry.file_type() {
        Ok(kind) if kind.is_symlink() => std::fs::metadata(entry.path()).is_ok_and(|m| m.is_dir()),
        Ok(kind) => kind.is_dir(),
        Err(_) => false,
    }
}

/// Runs a [`Reconciler`] over every target of a sync path.
pub struct SyncDriver<'a> {
    reconciler: Reconciler<'a>,
    policy: FailurePolicy,
}

impl<'a> SyncDriver<'a> {
    pub fn new(reconciler: Reconciler<'a>, policy: FailurePolicy) -> Self {
        Self { reconciler, policy }
    }

    /// Reconcile every target under `root`.
    ///
    /// Only an unreadable `root` is an `Err`; per-target failures land in the
    /// report.
    pub fn run(&self, root: &Path) -> Result<SyncReport, SyncError> {
        let targets = enumerate_targets(root)?;
        let settings = self.reconciler.settings();
        let mut report = SyncReport {
            version_tag: settings.version_tag.clone(),
            dry_run: settings.dry_run,
            ..SyncReport::default()
        };

        let mut remaining = targets.into_iter();
        for path in remaining.by_ref() {
            let outcome = self.reconciler.reconcile(&path);
            let failed = outcome.is_err();
            if let Err(err) = &outcome {
                tracing::warn!("{err}");
            }
            report.entries.push(ReportEntry { path, outcome });

            if failed && self.policy == FailurePolicy::Abort {
                break;
            }
        }
        report.not_attempted = remaining.collect();
        if !report.not_attempted.is_empty() {
            tracing::warn!(
                "aborted; {} target(s) not attempted",
                report.not_attempted.len()
            );
        }

        Ok(report)
    }
}
