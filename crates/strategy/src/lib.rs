//! Strategy workbench state
//!
//! - [`builder`]: catalog loading and the construct-then-payoff flow
//! - [`comparison`]: the saved comparison list, in memory or on disk
//! - [`chain`]: option chain selection guarded against late responses
//! - [`notify`]: user-facing outcome messages

pub mod builder;
pub mod chain;
pub mod comparison;
pub mod error;
pub mod generation;
pub mod notify;

pub use builder::{BuilderState, BuiltStrategy, PayoffWindow, StrategyBuilder};
pub use chain::{ChainUpdate, ChainView};
pub use comparison::{
    AddOutcome, ComparisonStore, DedupPolicy, FileComparisonStore, InMemoryComparisonStore,
};
pub use error::{StrategyError, StrategyResult};
pub use generation::{Generation, RequestGenerations};
pub use notify::{Notification, NotificationLevel, Notifier, RecordingNotifier, TracingNotifier};
