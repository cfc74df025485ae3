//! Strategy workflow error types

use options_client::ApiError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StrategyError {
    /// Local input check failed; the backend was not contacted
    #[error("{0}")]
    Validation(String),

    /// Backend call failed
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl StrategyError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

pub type StrategyResult<T> = Result<T, StrategyError>;
