//! ComparisonStore trait definition

use common::ComparisonEntry;

/// When two entries count as the same comparison subject
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DedupPolicy {
    /// Same definition, asset and `(symbol, side)` leg set
    #[default]
    Identity,
    /// Structurally equal strategies, timestamp and prices included
    Exact,
}

impl DedupPolicy {
    pub fn same(&self, a: &ComparisonEntry, b: &ComparisonEntry) -> bool {
        match self {
            DedupPolicy::Identity => a.strategy.identity() == b.strategy.identity(),
            DedupPolicy::Exact => a.strategy == b.strategy,
        }
    }
}

/// Result of [`ComparisonStore::add`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Appended at this position
    Added(usize),
    /// An equal entry was already saved; nothing changed
    AlreadyPresent,
}

/// Ordered list of strategies saved for side-by-side comparison
///
/// Implementations persist every mutation themselves; callers never flush.
pub trait ComparisonStore: Send + Sync {
    /// Snapshot of all entries in insertion order
    fn entries(&self) -> Vec<ComparisonEntry>;

    /// Append unless an equal entry exists under the store's policy
    fn add(&self, entry: ComparisonEntry) -> AddOutcome;

    /// Remove by position; out of range is a no-op returning `None`
    fn remove(&self, index: usize) -> Option<ComparisonEntry>;

    fn clear(&self);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub(crate) fn add_entry(
    entries: &mut Vec<ComparisonEntry>,
    entry: ComparisonEntry,
    policy: DedupPolicy,
) -> AddOutcome {
    if entries.iter().any(|existing| policy.same(existing, &entry)) {
        return AddOutcome::AlreadyPresent;
    }
    entries.push(entry);
    AddOutcome::Added(entries.len() - 1)
}

pub(crate) fn remove_entry(entries: &mut Vec<ComparisonEntry>, index: usize) -> Option<ComparisonEntry> {
    if index < entries.len() {
        Some(entries.remove(index))
    } else {
        None
    }
}
