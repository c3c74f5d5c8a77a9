//! Flowsync core library — domain types, workflow documents, errors.
//!
//! Public API surface:
//! - [`types`] — newtypes, [`SyncTarget`], [`ChangeSet`], [`RemoteExistence`]
//! - [`document`] — [`WorkflowDocument`] loader and serializer
//! - [`config`] — input validation helpers
//! - [`error`] — [`DocumentError`], [`ConfigError`]

pub mod config;
pub mod document;
pub mod error;
pub mod types;

pub use document::WorkflowDocument;
pub use error::{ConfigError, DocumentError};
pub use types::{ChangeSet, Namespace, RemoteExistence, Scheme, SyncTarget, WorkflowId};
