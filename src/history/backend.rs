//! Persistent storage for the history list.

use std::cell::RefCell;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::Result;
use serde::Deserialize;
use tracing::warn;

use super::HistoryEntry;

/// Where history is loaded from and saved to.
pub trait HistoryBackend {
    /// Load all entries. Absent or unreadable data yields an empty list.
    fn load(&self) -> Vec<HistoryEntry>;

    /// Replace the stored entries.
    fn save(&self, entries: &[HistoryEntry]) -> Result<()>;

    /// Drop all stored entries.
    fn clear(&self) -> Result<()> {
        self.save(&[])
    }
}

/// A stored entry: the structured form, or the older one-line form
/// `"<expression> = <result>"`.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredEntry {
    Entry(HistoryEntry),
    Line(String),
}

/// History kept as a JSON array in a single file.
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The default location in the user's data directory.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("zcalc")
            .join("history.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parse(content: &str) -> Result<Vec<HistoryEntry>> {
        let stored: Vec<StoredEntry> = serde_json::from_str(content)?;
        let entries = stored
            .into_iter()
            .filter_map(|entry| match entry {
                StoredEntry::Entry(entry) => Some(entry),
                StoredEntry::Line(line) => {
                    let parsed = HistoryEntry::from_line(&line);
                    if parsed.is_none() {
                        warn!(%line, "skipping unreadable history line");
                    }
                    parsed
                }
            })
            .collect();
        Ok(entries)
    }
}

impl HistoryBackend for JsonFileBackend {
    fn load(&self) -> Vec<HistoryEntry> {
        if !self.path.exists() {
            return Vec::new();
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cannot read history");
                return Vec::new();
            }
        };

        Self::parse(&content).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "corrupt history, starting empty");
            Vec::new()
        })
    }

    fn save(&self, entries: &[HistoryEntry]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = self.path.with_extension("tmp");

        let json = serde_json::to_string_pretty(entries)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

#[derive(Default)]
struct MemoryState {
    entries: Vec<HistoryEntry>,
    saves: usize,
}

/// In-memory history. Clones share the same storage, so a caller can keep
/// a handle and inspect what was saved.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<HistoryEntry>) -> Self {
        let backend = Self::new();
        backend.state.borrow_mut().entries = entries;
        backend
    }

    /// The entries as last saved.
    pub fn snapshot(&self) -> Vec<HistoryEntry> {
        self.state.borrow().entries.clone()
    }

    /// Number of saves so far.
    pub fn save_count(&self) -> usize {
        self.state.borrow().saves
    }
}

impl HistoryBackend for MemoryBackend {
    fn load(&self) -> Vec<HistoryEntry> {
        self.snapshot()
    }

    fn save(&self, entries: &[HistoryEntry]) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.entries = entries.to_vec();
        state.saves += 1;
        Ok(())
    }
}
