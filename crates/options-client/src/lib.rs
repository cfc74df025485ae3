//! Options Data Client
//!
//! Typed access to the pricing backend:
//! - asset list and option chains
//! - strategy catalog and construction (template or custom legs)
//! - payoff calculation over a price window
//!
//! [`OptionsApi`] is the seam every consumer depends on. The HTTP
//! implementation lives behind the `client` feature; [`MockOptionsApi`]
//! serves tests and the offline demo.

pub mod api;
pub mod error;
pub mod mock;
pub mod sample;
pub mod wire;

#[cfg(feature = "client")]
pub mod http;

pub use api::{Endpoint, OptionsApi};
pub use error::{ApiError, ApiResult};
pub use mock::{ApiCall, MockOptionsApi};
pub use wire::{ChainResponse, ConstructRequest, CustomStrategyRequest, PayoffRequest};

#[cfg(feature = "client")]
pub use http::HttpOptionsClient;
