//! Workflow definition documents.
//!
//! A document keeps the whole top-level YAML mapping so that every key,
//! including ones this tool knows nothing about, is sent back unchanged.
//! Only two keys are interpreted:
//!
//! | Key       | Use                                           |
//! |-----------|-----------------------------------------------|
//! | `id`      | identifier; required, non-blank string        |
//! | `version` | version tag; overwritten before every send    |

use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::config::is_single_segment;
use crate::error::{io_err, DocumentError};
use crate::types::WorkflowId;

const ID_KEY: &str = "id";
const VERSION_KEY: &str = "version";

/// A parsed workflow definition.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowDocument {
    id: WorkflowId,
    content: Mapping,
}

impl WorkflowDocument {
    /// Parse YAML bytes and extract the identifier.
    pub fn parse(bytes: &[u8]) -> Result<Self, DocumentError> {
        let value: Value = serde_yaml::from_slice(bytes).map_err(DocumentError::Parse)?;
        let Value::Mapping(content) = value else {
            return Err(DocumentError::NotAMapping);
        };

        let id = content
            .get(ID_KEY)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(DocumentError::MissingIdentifier)?;
        if !is_single_segment(id) {
            return Err(DocumentError::InvalidIdentifier(id.to_string()));
        }

        Ok(Self {
            id: WorkflowId::from(id),
            content,
        })
    }

    /// Read and parse the file at `path`.
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let bytes = std::fs::read(path).map_err(|e| io_err(path, e))?;
        Self::parse(&bytes)
    }

    pub fn identifier(&self) -> &WorkflowId {
        &self.id
    }

    pub fn version_tag(&self) -> Option<&str> {
        self.content.get(VERSION_KEY).and_then(Value::as_str)
    }

    /// Overwrite the version tag. Existing keys keep their position.
    pub fn set_version_tag(&mut self, tag: &str) {
        self.content.insert(Value::from(VERSION_KEY), Value::from(tag));
    }

    pub fn content(&self) -> &Mapping {
        &self.content
    }

    /// Serialize to the YAML wire format.
    pub fn to_yaml(&self) -> Result<String, DocumentError> {
        serde_yaml::to_string(&self.content).map_err(|source| DocumentError::Serialize {
            id: self.id.0.clone(),
            source,
        })
    }
}
