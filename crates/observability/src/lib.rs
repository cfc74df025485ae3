//! Observability infrastructure for optlab
//!
//! Structured logging via tracing. Logs go to stderr so that rendered
//! tables and charts on stdout stay pipeable.
//!
//! # Quick Start
//!
//! ```ignore
//! use observability::{init_logging, LogFormat};
//!
//! init_logging("optlab", LogFormat::Pretty, "warn")?;
//! ```

pub mod logging;

pub use logging::{init_logging, LogFormat};
