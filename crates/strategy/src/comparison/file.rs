//! JSON file-backed comparison store

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use common::ComparisonEntry;
use parking_lot::RwLock;
use tracing::{debug, error, warn};

use super::traits::{add_entry, remove_entry, AddOutcome, ComparisonStore, DedupPolicy};

/// Comparison list persisted as a JSON array of `{strategy, payoff}`
///
/// Opening never fails: a missing file starts empty, and so does an
/// unreadable or malformed one (logged). Every mutation rewrites the whole
/// file atomically; write failures are logged and the in-memory list stays
/// authoritative.
pub struct FileComparisonStore {
    path: PathBuf,
    entries: RwLock<Vec<ComparisonEntry>>,
    policy: DedupPolicy,
}

impl FileComparisonStore {
    pub fn open(path: impl Into<PathBuf>, policy: DedupPolicy) -> Self {
        let path = path.into();
        let entries = load_entries(&path);
        debug!(path = %path.display(), entries = entries.len(), "Comparison store opened");

        Self {
            path,
            entries: RwLock::new(entries),
            policy,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &[ComparisonEntry]) {
        if let Err(e) = write_entries(&self.path, entries) {
            error!(path = %self.path.display(), error = %format!("{:#}", e), "Failed to save comparison list");
        }
    }
}

fn load_entries(path: &Path) -> Vec<ComparisonEntry> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            error!(path = %path.display(), error = %e, "Failed to read comparison list");
            return Vec::new();
        }
    };

    match serde_json::from_str(&contents) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Discarding malformed comparison list");
            Vec::new()
        }
    }
}

fn write_entries(path: &Path, entries: &[ComparisonEntry]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating storage dir {}", parent.display()))?;
    }

    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(entries)?;
    std::fs::write(&tmp, json).with_context(|| format!("writing {}", tmp.display()))?;
    std::fs::rename(&tmp, path).with_context(|| format!("renaming {} to {}", tmp.display(), path.display()))?;
    Ok(())
}

impl ComparisonStore for FileComparisonStore {
    fn entries(&self) -> Vec<ComparisonEntry> {
        self.entries.read().clone()
    }

    fn add(&self, entry: ComparisonEntry) -> AddOutcome {
        let mut entries = self.entries.write();
        let outcome = add_entry(&mut entries, entry, self.policy);
        if let AddOutcome::Added(_) = outcome {
            self.persist(&entries);
        }
        outcome
    }

    fn remove(&self, index: usize) -> Option<ComparisonEntry> {
        let mut entries = self.entries.write();
        let removed = remove_entry(&mut entries, index);
        if removed.is_some() {
            self.persist(&entries);
        }
        removed
    }

    fn clear(&self) {
        let mut entries = self.entries.write();
        entries.clear();
        self.persist(&entries);
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }
}
