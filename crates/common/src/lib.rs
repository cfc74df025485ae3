//! Common types and utilities for optlab
//!
//! This crate provides the domain types shared by every optlab crate.
//!
//! # Modules
//!
//! - [`error`] - Common error types
//! - [`types`] - Option contracts and chains
//! - [`strategy`] - Strategy definitions, constructed strategies and payoffs

pub mod error;
pub mod strategy;
pub mod types;

pub use error::{Error, Result};
pub use strategy::*;
pub use types::*;
