//! Point-in-time copies of the project handed to the persistence path.

use crate::format::{FormatError, ProjectFile};
use crate::model::Timestamp;

/// Full copy of a project taken at one revision.
///
/// A snapshot is taken while holding the store (or its lock) for the whole
/// copy, so a partially-mutated collection is never serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectSnapshot {
    /// Store revision the copy was taken at.
    pub revision: u64,
    pub taken_at: Timestamp,
    pub file: ProjectFile,
}

impl ProjectSnapshot {
    /// Serialize the snapshot for the persistence layer.
    pub fn to_json(&self) -> Result<String, FormatError> {
        self.file.to_json()
    }
}
