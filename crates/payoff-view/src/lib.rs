//! Payoff view-model and text rendering
//!
//! [`merge`] lines up the primary payoff with saved comparisons into one
//! row-per-price table, [`zoom`] narrows it, and [`render`] turns views,
//! strategies and chains into terminal text.

pub mod format;
pub mod merge;
pub mod render;
pub mod risk;
pub mod zoom;

pub use merge::{merge, Alignment, PayoffRow, PayoffView};
pub use render::{ChartKind, ViewSelection, ViewTab};
pub use risk::RiskAnalysis;
pub use zoom::ZoomLevel;
