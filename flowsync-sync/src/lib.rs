//! # flowsync-sync
//!
//! Reconciliation of local workflow definitions with the orchestration
//! service.
//!
//! [`Reconciler`] decides and performs the remote operation for one file;
//! [`SyncDriver`] walks a file or directory and collects a [`SyncReport`];
//! [`pipeline::run`] wires both from a [`flowsync_core::SyncTarget`].

pub mod driver;
pub mod error;
pub mod pipeline;
pub mod reconcile;
pub mod report;

pub use driver::{enumerate_targets, FailurePolicy, SyncDriver};
pub use error::SyncError;
pub use reconcile::{ReconcileSettings, Reconciler, TargetOutcome};
pub use report::{ReportEntry, SyncReport};
