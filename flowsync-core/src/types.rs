//! Domain types shared by every flowsync crate.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;

use crate::config::{is_single_segment, non_empty, validate_host};
use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Stable key of a workflow within a namespace (the document's `id`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct WorkflowId(pub String);

impl fmt::Display for WorkflowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for WorkflowId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for WorkflowId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Logical grouping of workflows on the orchestration service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace(pub String);

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Namespace {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Namespace {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// URL scheme used to reach the orchestration service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Http => write!(f, "http"),
            Scheme::Https => write!(f, "https"),
        }
    }
}

impl FromStr for Scheme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            other => Err(ConfigError::UnsupportedScheme(other.to_string())),
        }
    }
}

/// Result of probing the service for a workflow identifier.
///
/// A failed probe is not a variant: it surfaces as an error so it can never
/// be mistaken for absence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteExistence {
    Found,
    NotFound,
}

impl RemoteExistence {
    pub fn exists(self) -> bool {
        matches!(self, RemoteExistence::Found)
    }
}

// ---------------------------------------------------------------------------
// SyncTarget
// ---------------------------------------------------------------------------

/// Immutable run configuration: where to sync, and what.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncTarget {
    pub server_host: String,
    pub scheme: Scheme,
    pub namespace: Namespace,
    pub auth_token: Option<String>,
    pub sync_path: PathBuf,
}

impl SyncTarget {
    /// Validate raw inputs into a target.
    ///
    /// Empty strings count as absent. Every field except `token` is required.
    pub fn new(
        server: Option<&str>,
        protocol: Option<&str>,
        namespace: Option<&str>,
        sync: Option<&str>,
        token: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let server = non_empty(server).ok_or(ConfigError::Missing("server"))?;
        let protocol = non_empty(protocol).ok_or(ConfigError::Missing("protocol"))?;
        let namespace = non_empty(namespace).ok_or(ConfigError::Missing("namespace"))?;
        let sync = non_empty(sync).ok_or(ConfigError::Missing("sync"))?;
        if !is_single_segment(namespace) {
            return Err(ConfigError::InvalidNamespace(namespace.to_string()));
        }

        Ok(Self {
            server_host: validate_host(server)?.to_string(),
            scheme: protocol.parse()?,
            namespace: Namespace::from(namespace),
            auth_token: non_empty(token).map(str::to_owned),
            sync_path: normalize_sync_path(Path::new(sync)),
        })
    }

    /// `<scheme>://<host>` with no trailing slash.
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.scheme, self.server_host)
    }
}

/// Absolute sync paths are taken relative to the working directory:
/// `/workflows` becomes `./workflows`.
pub fn normalize_sync_path(path: &Path) -> PathBuf {
    match path.strip_prefix("/") {
        Ok(rest) => Path::new(".").join(rest),
        Err(_) => path.to_path_buf(),
    }
}

// ---------------------------------------------------------------------------
// ChangeSet
// ---------------------------------------------------------------------------

/// Paths reported as modified between two revisions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub changed_paths: BTreeSet<PathBuf>,
}

impl ChangeSet {
    /// Build from name-only diff output: one path per line, blank lines ignored.
    pub fn from_output(stdout: &str) -> Self {
        let changed_paths = stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(PathBuf::from)
            .collect();
        Self { changed_paths }
    }

    pub fn is_empty(&self) -> bool {
        self.changed_paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changed_paths.len()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.changed_paths.contains(path)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
