//! In-memory comparison store

use common::ComparisonEntry;
use parking_lot::RwLock;

use super::traits::{add_entry, remove_entry, AddOutcome, ComparisonStore, DedupPolicy};

/// Comparison list that lives for the process only
pub struct InMemoryComparisonStore {
    entries: RwLock<Vec<ComparisonEntry>>,
    policy: DedupPolicy,
}

impl InMemoryComparisonStore {
    pub fn new() -> Self {
        Self::with_policy(DedupPolicy::default())
    }

    pub fn with_policy(policy: DedupPolicy) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            policy,
        }
    }
}

impl Default for InMemoryComparisonStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ComparisonStore for InMemoryComparisonStore {
    fn entries(&self) -> Vec<ComparisonEntry> {
        self.entries.read().clone()
    }

    fn add(&self, entry: ComparisonEntry) -> AddOutcome {
        add_entry(&mut self.entries.write(), entry, self.policy)
    }

    fn remove(&self, index: usize) -> Option<ComparisonEntry> {
        remove_entry(&mut self.entries.write(), index)
    }

    fn clear(&self) {
        self.entries.write().clear();
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }
}
