//! Options API client trait

use async_trait::async_trait;
use common::{CustomLegRequest, OptionChain, Strategy, StrategyDefinition, StrategyPayoff};

use crate::error::ApiResult;

/// Backend operations, one per REST endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    ListAssets,
    OptionChain,
    StrategyDefinitions,
    ConstructStrategy,
    ConstructCustomStrategy,
    CalculatePayoff,
}

impl Endpoint {
    /// Path template relative to the API base URL
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::ListAssets => "/options/assets",
            Endpoint::OptionChain => "/options/{asset}",
            Endpoint::StrategyDefinitions => "/strategies/definitions",
            Endpoint::ConstructStrategy => "/strategies/construct",
            Endpoint::ConstructCustomStrategy => "/strategies/custom",
            Endpoint::CalculatePayoff => "/strategies/payoff",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Client trait for the options pricing backend - transport agnostic
#[async_trait]
pub trait OptionsApi: Send + Sync {
    /// Assets that have option chains
    async fn list_assets(&self) -> ApiResult<Vec<String>>;

    /// Full option chain for one asset, grouped by expiry
    ///
    /// Both wire shapes (flat calls/puts and `options_by_expiry`) are
    /// normalized; no contract is dropped.
    async fn get_option_chain(&self, asset: &str) -> ApiResult<OptionChain>;

    /// Strategy template catalog
    async fn get_strategy_definitions(&self) -> ApiResult<Vec<StrategyDefinition>>;

    /// Construct a strategy from a named template
    async fn construct_strategy(
        &self,
        definition_name: &str,
        asset: &str,
        base_quantity: f64,
    ) -> ApiResult<Strategy>;

    /// Construct a strategy from explicit legs
    async fn construct_custom_strategy(
        &self,
        asset: &str,
        legs: &[CustomLegRequest],
    ) -> ApiResult<Strategy>;

    /// Profit/loss at expiry over `[price_min, price_max]`
    async fn calculate_payoff(
        &self,
        strategy: &Strategy,
        price_min: f64,
        price_max: f64,
        num_points: u32,
    ) -> ApiResult<StrategyPayoff>;
}
