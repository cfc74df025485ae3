//! In-process [`OptionsApi`] implementation for tests and offline use

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use common::{
    CustomLegRequest, OptionChain, OptionContract, PayoffPoint, Side, Strategy, StrategyDefinition,
    StrategyLeg, StrategyPayoff,
};
use parking_lot::Mutex;
use tracing::debug;

use crate::api::{Endpoint, OptionsApi};
use crate::error::{ApiError, ApiResult};

/// One recorded call against the mock
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    ListAssets,
    OptionChain {
        asset: String,
    },
    StrategyDefinitions,
    ConstructStrategy {
        definition_name: String,
        asset: String,
        base_quantity: f64,
    },
    ConstructCustomStrategy {
        asset: String,
        legs: Vec<CustomLegRequest>,
    },
    CalculatePayoff {
        definition_name: String,
        price_min: f64,
        price_max: f64,
        num_points: u32,
    },
}

/// Mock backend
///
/// Canned responses are set with the `with_*` builders. Strategies that are
/// not canned are assembled from the canned chains, and payoffs that are not
/// canned are computed at expiry from the legs.
pub struct MockOptionsApi {
    assets: Vec<String>,
    definitions: Vec<StrategyDefinition>,
    chains: HashMap<String, OptionChain>,
    strategies: HashMap<String, Strategy>,
    payoffs: HashMap<String, StrategyPayoff>,
    delays: HashMap<Endpoint, Duration>,
    chain_delays: HashMap<String, Duration>,
    failures: Mutex<HashMap<Endpoint, ApiError>>,
    calls: Mutex<Vec<ApiCall>>,
}

impl MockOptionsApi {
    /// Create an empty mock
    pub fn new() -> Self {
        Self {
            assets: Vec::new(),
            definitions: Vec::new(),
            chains: HashMap::new(),
            strategies: HashMap::new(),
            payoffs: HashMap::new(),
            delays: HashMap::new(),
            chain_delays: HashMap::new(),
            failures: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Configure the asset list
    pub fn with_assets<I, S>(mut self, assets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assets = assets.into_iter().map(Into::into).collect();
        self
    }

    /// Configure the strategy catalog
    pub fn with_definitions(mut self, definitions: Vec<StrategyDefinition>) -> Self {
        self.definitions = definitions;
        self
    }

    /// Add an option chain, keyed by its asset
    pub fn with_chain(mut self, chain: OptionChain) -> Self {
        self.chains.insert(chain.asset.clone(), chain);
        self
    }

    /// Return `strategy` for every construction of `definition_name`
    pub fn with_strategy(mut self, definition_name: impl Into<String>, strategy: Strategy) -> Self {
        self.strategies.insert(definition_name.into(), strategy);
        self
    }

    /// Return `payoff` for every payoff request on `definition_name`
    pub fn with_payoff(mut self, definition_name: impl Into<String>, payoff: StrategyPayoff) -> Self {
        self.payoffs.insert(definition_name.into(), payoff);
        self
    }

    /// Delay every call to `endpoint`
    pub fn with_delay(mut self, endpoint: Endpoint, delay: Duration) -> Self {
        self.delays.insert(endpoint, delay);
        self
    }

    /// Delay chain fetches for one asset
    pub fn with_chain_delay(mut self, asset: impl Into<String>, delay: Duration) -> Self {
        self.chain_delays.insert(asset.into(), delay);
        self
    }

    /// Fail every call to `endpoint` with `error`
    pub fn with_failure(self, endpoint: Endpoint, error: ApiError) -> Self {
        self.set_failure(endpoint, error);
        self
    }

    /// Fail calls to `endpoint` from now on
    pub fn set_failure(&self, endpoint: Endpoint, error: ApiError) {
        self.failures.lock().insert(endpoint, error);
    }

    /// Let calls to `endpoint` succeed again
    pub fn clear_failure(&self, endpoint: Endpoint) {
        self.failures.lock().remove(&endpoint);
    }

    /// Calls received so far, oldest first
    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().clone()
    }

    /// Number of calls received so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    async fn enter(&self, endpoint: Endpoint, call: ApiCall) -> ApiResult<()> {
        debug!(%endpoint, "Mock backend call");
        self.calls.lock().push(call);

        if let Some(delay) = self.delays.get(&endpoint) {
            tokio::time::sleep(*delay).await;
        }

        match self.failures.lock().get(&endpoint) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn find_contract(&self, asset: &str, symbol: &str) -> Option<&OptionContract> {
        self.chains.get(asset)?.expiries.values().find_map(|group| {
            group
                .calls
                .iter()
                .chain(group.puts.iter())
                .find(|c| c.symbol == symbol)
        })
    }

    fn chain_for(&self, asset: &str) -> ApiResult<&OptionChain> {
        self.chains
            .get(asset)
            .ok_or_else(|| ApiError::api(404, format!("Asset not found: {}", asset)))
    }

    fn template_strategy(
        &self,
        definition_name: &str,
        asset: &str,
        base_quantity: f64,
    ) -> ApiResult<Strategy> {
        let chain = self.chain_for(asset)?;
        let group = chain
            .expiries
            .values()
            .next()
            .ok_or_else(|| ApiError::api(404, format!("No expiries listed for {}", asset)))?;

        let strikes = group.strikes();
        let atm = strikes
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                (*a - chain.underlying_price)
                    .abs()
                    .total_cmp(&(*b - chain.underlying_price).abs())
            })
            .map(|(i, _)| i as isize)
            .ok_or_else(|| ApiError::api(404, format!("No strikes listed for {}", asset)))?;

        let pick = |contracts: &[OptionContract], offset: isize| -> ApiResult<OptionContract> {
            let strike = usize::try_from(atm + offset)
                .ok()
                .and_then(|i| strikes.get(i))
                .ok_or_else(|| ApiError::api(422, "Not enough strikes to build strategy"))?;
            contracts
                .iter()
                .find(|c| c.strike_price == *strike)
                .cloned()
                .ok_or_else(|| ApiError::api(422, "Not enough strikes to build strategy"))
        };

        let template: Vec<(Side, bool, isize)> = match definition_name {
            "Long Call" => vec![(Side::Buy, true, 0)],
            "Long Put" => vec![(Side::Buy, false, 0)],
            "Bull Call Spread" => vec![(Side::Buy, true, 0), (Side::Sell, true, 1)],
            "Bear Put Spread" => vec![(Side::Buy, false, 0), (Side::Sell, false, -1)],
            "Long Straddle" => vec![(Side::Buy, true, 0), (Side::Buy, false, 0)],
            "Long Strangle" => vec![(Side::Buy, true, 1), (Side::Buy, false, -1)],
            "Iron Condor" => vec![
                (Side::Buy, false, -2),
                (Side::Sell, false, -1),
                (Side::Sell, true, 1),
                (Side::Buy, true, 2),
            ],
            other => {
                return Err(ApiError::api(
                    400,
                    format!("Unknown strategy definition: {}", other),
                ))
            }
        };

        let legs = template
            .into_iter()
            .map(|(side, is_call, offset)| {
                let contracts = if is_call { &group.calls } else { &group.puts };
                Ok(StrategyLeg {
                    side,
                    ratio: 1.0,
                    selected: pick(contracts, offset)?,
                })
            })
            .collect::<ApiResult<Vec<_>>>()?;

        Ok(assemble(definition_name, chain, base_quantity, legs))
    }
}

impl Default for MockOptionsApi {
    fn default() -> Self {
        Self::new()
    }
}

fn assemble(definition_name: &str, chain: &OptionChain, base_quantity: f64, legs: Vec<StrategyLeg>) -> Strategy {
    let estimated_cost = legs
        .iter()
        .map(|leg| leg.side.direction() * leg.quantity(base_quantity) * leg.selected.mark_price)
        .sum();

    Strategy {
        definition_name: definition_name.to_string(),
        underlying_asset: chain.asset.clone(),
        underlying_price_at_construction: chain.underlying_price,
        base_quantity,
        timestamp: chain.last_updated.clone(),
        estimated_cost,
        legs,
    }
}

/// Profit/loss at expiry sampled at `num_points` evenly spaced prices
pub fn expiry_payoff(strategy: &Strategy, price_min: f64, price_max: f64, num_points: u32) -> StrategyPayoff {
    let n = num_points.max(2) as usize;
    let step = (price_max - price_min) / (n - 1) as f64;

    let payoff: Vec<PayoffPoint> = (0..n)
        .map(|i| {
            let price = price_min + step * i as f64;
            let value: f64 = strategy
                .legs
                .iter()
                .map(|leg| {
                    let strike = leg.selected.strike_price;
                    let intrinsic = match leg.selected.option_type {
                        common::OptionType::Call => (price - strike).max(0.0),
                        common::OptionType::Put => (strike - price).max(0.0),
                    };
                    leg.side.direction() * leg.quantity(strategy.base_quantity) * intrinsic
                })
                .sum();
            PayoffPoint {
                underlying_price: price,
                profit_loss: value - strategy.estimated_cost,
            }
        })
        .collect();

    let max_profit = payoff.iter().map(|p| p.profit_loss).fold(f64::MIN, f64::max);
    let max_loss = payoff.iter().map(|p| p.profit_loss).fold(f64::MAX, f64::min);
    let breakevens = payoff
        .windows(2)
        .filter_map(|w| {
            let (a, b) = (w[0], w[1]);
            if a.profit_loss == 0.0 {
                Some(a.underlying_price)
            } else if a.profit_loss.signum() != b.profit_loss.signum() && b.profit_loss != 0.0 {
                let t = a.profit_loss / (a.profit_loss - b.profit_loss);
                Some(a.underlying_price + t * (b.underlying_price - a.underlying_price))
            } else {
                None
            }
        })
        .collect();

    StrategyPayoff {
        payoff,
        max_profit,
        max_loss,
        breakevens,
    }
}

#[async_trait]
impl OptionsApi for MockOptionsApi {
    async fn list_assets(&self) -> ApiResult<Vec<String>> {
        self.enter(Endpoint::ListAssets, ApiCall::ListAssets).await?;
        Ok(self.assets.clone())
    }

    async fn get_option_chain(&self, asset: &str) -> ApiResult<OptionChain> {
        self.enter(
            Endpoint::OptionChain,
            ApiCall::OptionChain {
                asset: asset.to_string(),
            },
        )
        .await?;

        if let Some(delay) = self.chain_delays.get(asset) {
            tokio::time::sleep(*delay).await;
        }

        self.chain_for(asset).cloned()
    }

    async fn get_strategy_definitions(&self) -> ApiResult<Vec<StrategyDefinition>> {
        self.enter(Endpoint::StrategyDefinitions, ApiCall::StrategyDefinitions)
            .await?;
        Ok(self.definitions.clone())
    }

    async fn construct_strategy(
        &self,
        definition_name: &str,
        asset: &str,
        base_quantity: f64,
    ) -> ApiResult<Strategy> {
        self.enter(
            Endpoint::ConstructStrategy,
            ApiCall::ConstructStrategy {
                definition_name: definition_name.to_string(),
                asset: asset.to_string(),
                base_quantity,
            },
        )
        .await?;

        match self.strategies.get(definition_name) {
            Some(strategy) => Ok(strategy.clone()),
            None => self.template_strategy(definition_name, asset, base_quantity),
        }
    }

    async fn construct_custom_strategy(
        &self,
        asset: &str,
        legs: &[CustomLegRequest],
    ) -> ApiResult<Strategy> {
        self.enter(
            Endpoint::ConstructCustomStrategy,
            ApiCall::ConstructCustomStrategy {
                asset: asset.to_string(),
                legs: legs.to_vec(),
            },
        )
        .await?;

        if let Some(strategy) = self.strategies.get("Custom Strategy") {
            return Ok(strategy.clone());
        }

        let chain = self.chain_for(asset)?;
        let legs = legs
            .iter()
            .map(|request| {
                let selected = self
                    .find_contract(asset, &request.option_symbol)
                    .cloned()
                    .ok_or_else(|| {
                        ApiError::api(
                            400,
                            format!("Unknown option symbol: {}", request.option_symbol),
                        )
                    })?;
                Ok(StrategyLeg {
                    side: request.side,
                    ratio: request.quantity,
                    selected,
                })
            })
            .collect::<ApiResult<Vec<_>>>()?;

        Ok(assemble("Custom Strategy", chain, 1.0, legs))
    }

    async fn calculate_payoff(
        &self,
        strategy: &Strategy,
        price_min: f64,
        price_max: f64,
        num_points: u32,
    ) -> ApiResult<StrategyPayoff> {
        self.enter(
            Endpoint::CalculatePayoff,
            ApiCall::CalculatePayoff {
                definition_name: strategy.definition_name.clone(),
                price_min,
                price_max,
                num_points,
            },
        )
        .await?;

        match self.payoffs.get(&strategy.definition_name) {
            Some(payoff) => Ok(payoff.clone()),
            None => Ok(expiry_payoff(strategy, price_min, price_max, num_points)),
        }
    }
}
