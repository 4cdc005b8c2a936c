//! Logical home directory mappings
//!
//! Each entry maps a virtual path shown to the client onto a bucket path.

use crate::policy::arn::Buckets;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single virtual-to-physical path rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DirectoryMapEntry {
    pub entry: String,
    pub target: String,
}

impl DirectoryMapEntry {
    pub fn new(entry: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            entry: entry.into(),
            target: target.into(),
        }
    }
}

/// Ordered list of entries. Serializes as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DirectoryMap(Vec<DirectoryMapEntry>);

impl DirectoryMap {
    pub fn new(entries: Vec<DirectoryMapEntry>) -> Self {
        Self(entries)
    }

    pub fn entries(&self) -> &[DirectoryMapEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the first entry path that appears more than once.
    pub fn duplicate_entry(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        self.0
            .iter()
            .map(|e| e.entry.as_str())
            .find(|entry| !seen.insert(*entry))
    }

    /// Returns the first target that is not inside `buckets`.
    pub fn foreign_target(&self, buckets: &Buckets) -> Option<&str> {
        self.0
            .iter()
            .map(|e| e.target.as_str())
            .find(|target| !buckets.owns_target(target))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
