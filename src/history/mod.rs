//! Calculation history.
//!
//! An ordered list of `(expression, result)` pairs, oldest first, persisted
//! through a [`HistoryBackend`] after every change.

mod backend;

pub use backend::{HistoryBackend, JsonFileBackend, MemoryBackend};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("no history entry at index {index} (history has {len} entries)")]
    NoSuchEntry { index: usize, len: usize },
}

/// One successful calculation, both halves in display form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The balanced expression with grouped digits and raw operators.
    pub expression: String,
    /// The formatted result.
    pub result: String,
}

impl HistoryEntry {
    pub fn new(expression: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            result: result.into(),
        }
    }

    /// Parse the single-line `"<expression> = <result>"` form.
    pub fn from_line(line: &str) -> Option<Self> {
        let (expression, result) = line.split_once(" = ")?;
        Some(Self::new(expression, result))
    }

    /// Render as `"<expression> = <result>"`.
    pub fn to_line(&self) -> String {
        format!("{} = {}", self.expression, self.result)
    }
}

/// The history list together with its persistent backend.
pub struct HistoryStore {
    entries: Vec<HistoryEntry>,
    backend: Box<dyn HistoryBackend>,
}

impl HistoryStore {
    /// Load the stored history. Missing or corrupt data gives an empty list.
    pub fn load(backend: Box<dyn HistoryBackend>) -> Self {
        let entries = backend.load();
        debug!(count = entries.len(), "history loaded");
        Self { entries, backend }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Result<&HistoryEntry, HistoryError> {
        self.entries.get(index).ok_or(HistoryError::NoSuchEntry {
            index,
            len: self.entries.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
        self.persist();
    }

    /// Remove the entry at `index`, returning it.
    pub fn delete(&mut self, index: usize) -> Result<HistoryEntry, HistoryError> {
        if index >= self.entries.len() {
            return Err(HistoryError::NoSuchEntry {
                index,
                len: self.entries.len(),
            });
        }
        let removed = self.entries.remove(index);
        self.persist();
        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        if let Err(e) = self.backend.clear() {
            warn!(error = %e, "failed to clear stored history");
        }
    }

    /// Save failures are logged and otherwise ignored.
    fn persist(&self) {
        if let Err(e) = self.backend.save(&self.entries) {
            warn!(error = %e, "failed to save history");
        }
    }
}
