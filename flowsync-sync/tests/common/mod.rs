//! In-memory collaborators shared by the sync integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use flowsync_core::{ChangeSet, Namespace, RemoteExistence, WorkflowDocument, WorkflowId};
use flowsync_remote::{RemoteError, WorkflowApi};
use flowsync_sync::ReconcileSettings;
use flowsync_vcs::{RevisionDiff, VcsError};

/// One recorded interaction with a fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Lookup(String),
    Create { id: String, version: Option<String> },
    Update { id: String, version: Option<String> },
    Diff(PathBuf),
}

/// What the fake service answers for a lookup.
#[derive(Debug, Clone, Copy)]
pub enum Remote {
    Exists,
    Status(u16),
}

/// Fake workflow service. Unknown identifiers are `NotFound`; created
/// workflows exist for later lookups.
#[derive(Default)]
pub struct FakeApi {
    remote: RefCell<HashMap<String, Remote>>,
    reject_mutations: bool,
    pub calls: RefCell<Vec<Call>>,
}

impl FakeApi {
    pub fn with(entries: &[(&str, Remote)]) -> Self {
        let remote = entries
            .iter()
            .map(|(id, r)| (id.to_string(), *r))
            .collect();
        Self {
            remote: RefCell::new(remote),
            ..Self::default()
        }
    }

    pub fn rejecting_mutations(mut self) -> Self {
        self.reject_mutations = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Create { .. } | Call::Update { .. }))
            .collect()
    }

    fn url(id: &str) -> String {
        format!("http://fake/api/namespaces/ns/workflows/{id}")
    }

    fn reject(&self, method: &'static str, id: &str) -> Result<(), RemoteError> {
        if self.reject_mutations {
            return Err(RemoteError::MutationRejected {
                method,
                url: Self::url(id),
                status: 500,
                body: "rejected".into(),
            });
        }
        Ok(())
    }
}

impl WorkflowApi for FakeApi {
    fn lookup(&self, _: &Namespace, id: &WorkflowId) -> Result<RemoteExistence, RemoteError> {
        self.calls.borrow_mut().push(Call::Lookup(id.0.clone()));
        match self.remote.borrow().get(&id.0) {
            None => Ok(RemoteExistence::NotFound),
            Some(Remote::Exists) => Ok(RemoteExistence::Found),
            Some(Remote::Status(status)) => Err(RemoteError::LookupFailed {
                url: Self::url(&id.0),
                status: *status,
            }),
        }
    }

    fn create(&self, _: &Namespace, document: &WorkflowDocument) -> Result<(), RemoteError> {
        let id = document.identifier().0.clone();
        self.calls.borrow_mut().push(Call::Create {
            id: id.clone(),
            version: document.version_tag().map(str::to_owned),
        });
        self.reject("POST", &id)?;
        self.remote.borrow_mut().insert(id, Remote::Exists);
        Ok(())
    }

    fn update(
        &self,
        _: &Namespace,
        id: &WorkflowId,
        document: &WorkflowDocument,
    ) -> Result<(), RemoteError> {
        self.calls.borrow_mut().push(Call::Update {
            id: id.0.clone(),
            version: document.version_tag().map(str::to_owned),
        });
        self.reject("PUT", &id.0)
    }
}

/// Fake version control: a fixed change set for one revision pair and a
/// fixed short hash. Any other revision pair has no changes.
pub struct FakeVcs {
    pub range: (String, String),
    pub changed: BTreeSet<PathBuf>,
    pub short: String,
    pub fail_diff: bool,
    pub calls: RefCell<Vec<Call>>,
}

impl FakeVcs {
    pub fn new(short: &str, changed: &[&Path]) -> Self {
        Self {
            range: ("HEAD^".into(), "HEAD".into()),
            changed: changed.iter().map(|p| p.to_path_buf()).collect(),
            short: short.into(),
            fail_diff: false,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn failing_diff(mut self) -> Self {
        self.fail_diff = true;
        self
    }

    pub fn diffed(&self) -> Vec<PathBuf> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Diff(p) => Some(p.clone()),
                _ => None,
            })
            .collect()
    }
}

impl RevisionDiff for FakeVcs {
    fn changed_paths(&self, from: &str, to: &str, path: &Path) -> Result<ChangeSet, VcsError> {
        self.calls.borrow_mut().push(Call::Diff(path.to_path_buf()));
        if self.fail_diff {
            return Err(VcsError::CommandFailed {
                command: format!("git diff --name-only {from} {to}"),
                status: Some(128),
                stderr: "fatal: bad revision".into(),
            });
        }
        if (from, to) != (self.range.0.as_str(), self.range.1.as_str()) {
            return Ok(ChangeSet::default());
        }
        let changed_paths = self
            .changed
            .iter()
            .filter(|p| p.starts_with(path))
            .cloned()
            .collect();
        Ok(ChangeSet { changed_paths })
    }

    fn short_revision(&self, _: &str) -> Result<String, VcsError> {
        Ok(self.short.clone())
    }
}

pub fn settings(version_tag: &str) -> ReconcileSettings {
    ReconcileSettings {
        namespace: Namespace::from("ns"),
        version_tag: version_tag.into(),
        from_rev: "HEAD^".into(),
        to_rev: "HEAD".into(),
        force: false,
        dry_run: false,
    }
}

/// Write `<dir>/<name>` containing a workflow with identifier `id`.
pub fn write_workflow(dir: &Path, name: &str, id: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("id: {id}\nstates:\n- id: start\n  type: noop\n"))
        .expect("write workflow");
    path
}

pub fn create(id: &str, version: &str) -> Call {
    Call::Create {
        id: id.into(),
        version: Some(version.into()),
    }
}

pub fn update(id: &str, version: &str) -> Call {
    Call::Update {
        id: id.into(),
        version: Some(version.into()),
    }
}
