//! Saved comparison list

pub mod file;
pub mod memory;
pub mod traits;

pub use file::FileComparisonStore;
pub use memory::InMemoryComparisonStore;
pub use traits::{AddOutcome, ComparisonStore, DedupPolicy};
