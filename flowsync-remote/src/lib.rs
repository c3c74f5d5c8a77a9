//! # flowsync-remote
//!
//! Client for the orchestration service's workflow API.
//!
//! [`WorkflowApi`] is the seam the reconciler talks to; [`HttpWorkflowClient`]
//! implements it with a blocking `ureq` agent.

pub mod client;
pub mod error;

pub use client::{collection_url, workflow_url, HttpWorkflowClient};
pub use error::RemoteError;

use flowsync_core::{Namespace, RemoteExistence, WorkflowDocument, WorkflowId};

/// Existence probe and mutations for workflows in a namespace.
pub trait WorkflowApi {
    /// `Found` on 200, `NotFound` on 404. Any other outcome is an error.
    fn lookup(&self, namespace: &Namespace, id: &WorkflowId)
        -> Result<RemoteExistence, RemoteError>;

    /// Create a workflow that does not exist yet.
    fn create(&self, namespace: &Namespace, document: &WorkflowDocument)
        -> Result<(), RemoteError>;

    /// Replace an existing workflow.
    fn update(
        &self,
        namespace: &Namespace,
        id: &WorkflowId,
        document: &WorkflowDocument,
    ) -> Result<(), RemoteError>;
}

impl<T: WorkflowApi + ?Sized> WorkflowApi for &T {
    fn lookup(
        &self,
        namespace: &Namespace,
        id: &WorkflowId,
    ) -> Result<RemoteExistence, RemoteError> {
        (**self).lookup(namespace, id)
    }

    fn create(
        &self,
        namespace: &Namespace,
        document: &WorkflowDocument,
    ) -> Result<(), RemoteError> {
        (**self).create(namespace, document)
    }

    fn update(
        &self,
        namespace: &Namespace,
        id: &WorkflowId,
        document: &WorkflowDocument,
    ) -> Result<(), RemoteError> {
        (**self).update(namespace, id, document)
    }
}
