//! Strategy types returned by the backend's strategy endpoints

use serde::{Deserialize, Serialize};

use crate::types::{OptionContract, Side};

/// Directional bias of a strategy template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StrategyBias {
    Neutral,
    Bearish,
    Bullish,
    Volatile,
}

impl std::fmt::Display for StrategyBias {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyBias::Neutral => write!(f, "NEUTRAL"),
            StrategyBias::Bearish => write!(f, "BEARISH"),
            StrategyBias::Bullish => write!(f, "BULLISH"),
            StrategyBias::Volatile => write!(f, "VOLATILE"),
        }
    }
}

/// Named strategy template from the backend catalog (e.g. "Iron Condor")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub bias: StrategyBias,
    #[serde(default)]
    pub description: String,
}

/// One constituent position of a strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyLeg {
    pub side: Side,
    /// Quantity relative to the strategy's base quantity
    pub ratio: f64,
    pub selected: OptionContract,
}

impl StrategyLeg {
    /// Absolute leg size for a given base quantity
    pub fn quantity(&self, base_quantity: f64) -> f64 {
        self.ratio * base_quantity
    }
}

/// A constructed multi-leg position
///
/// Never edited in place: every construction call yields a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub definition_name: String,
    pub underlying_asset: String,
    pub underlying_price_at_construction: f64,
    pub base_quantity: f64,
    pub timestamp: String,
    /// Net premium; negative is a credit
    pub estimated_cost: f64,
    pub legs: Vec<StrategyLeg>,
}

impl Strategy {
    /// True when the position is opened for a net credit
    pub fn is_credit(&self) -> bool {
        self.estimated_cost < 0.0
    }

    /// Identity used to decide whether two strategies are the same
    /// comparison subject, ignoring construction timestamp and prices
    pub fn identity(&self) -> StrategyIdentity {
        let mut legs: Vec<(String, Side, f64)> = self
            .legs
            .iter()
            .map(|leg| (leg.selected.symbol.clone(), leg.side, leg.ratio))
            .collect();
        legs.sort_by(|a, b| {
            (&a.0, a.1)
                .cmp(&(&b.0, b.1))
                .then(a.2.total_cmp(&b.2))
        });

        StrategyIdentity {
            definition_name: self.definition_name.clone(),
            underlying_asset: self.underlying_asset.clone(),
            base_quantity: self.base_quantity,
            legs,
        }
    }
}

/// Definition name + asset + base quantity + sorted `(symbol, side, ratio)`
/// leg set
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyIdentity {
    pub definition_name: String,
    pub underlying_asset: String,
    pub base_quantity: f64,
    pub legs: Vec<(String, Side, f64)>,
}

/// One sample of a payoff curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayoffPoint {
    pub underlying_price: f64,
    pub profit_loss: f64,
}

/// Payoff curve at expiry with summary statistics
///
/// Points are ordered by ascending `underlying_price`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyPayoff {
    pub payoff: Vec<PayoffPoint>,
    pub max_profit: f64,
    pub max_loss: f64,
    #[serde(default)]
    pub breakevens: Vec<f64>,
}

impl StrategyPayoff {
    /// Number of samples in the curve
    pub fn len(&self) -> usize {
        self.payoff.len()
    }

    /// True when the curve has no samples
    pub fn is_empty(&self) -> bool {
        self.payoff.is_empty()
    }

    /// Lowest and highest sampled price
    pub fn price_range(&self) -> Option<(f64, f64)> {
        match (self.payoff.first(), self.payoff.last()) {
            (Some(first), Some(last)) => Some((first.underlying_price, last.underlying_price)),
            _ => None,
        }
    }

    /// Profit/loss at `price`, interpolated linearly between samples
    ///
    /// Returns `None` outside the sampled range.
    pub fn profit_loss_at(&self, price: f64) -> Option<f64> {
        let (lo, hi) = self.price_range()?;
        if price < lo || price > hi {
            return None;
        }

        let upper = self
            .payoff
            .partition_point(|p| p.underlying_price < price);
        let right = self.payoff.get(upper)?;
        if upper == 0 || right.underlying_price == price {
            return Some(right.profit_loss);
        }

        let left = &self.payoff[upper - 1];
        let span = right.underlying_price - left.underlying_price;
        if span == 0.0 {
            return Some(right.profit_loss);
        }
        let t = (price - left.underlying_price) / span;
        Some(left.profit_loss + t * (right.profit_loss - left.profit_loss))
    }
}

/// A strategy with its payoff, as kept in the comparison list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonEntry {
    pub strategy: Strategy,
    pub payoff: StrategyPayoff,
}

impl ComparisonEntry {
    pub fn new(strategy: Strategy, payoff: StrategyPayoff) -> Self {
        Self { strategy, payoff }
    }

    /// Series label used by charts and tables
    pub fn label(&self) -> &str {
        &self.strategy.definition_name
    }
}

/// Leg request for a custom strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomLegRequest {
    pub option_symbol: String,
    pub side: Side,
    pub quantity: f64,
}

impl CustomLegRequest {
    pub fn new(option_symbol: impl Into<String>, side: Side, quantity: f64) -> Self {
        Self {
            option_symbol: option_symbol.into(),
            side,
            quantity,
        }
    }

    /// Parse `SYMBOL:SIDE[:QTY]`, quantity defaulting to 1
    pub fn parse(text: &str) -> crate::Result<Self> {
        let mut parts = text.split(':');
        let symbol = parts
            .next()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| crate::Error::invalid_input(format!("missing option symbol in '{}'", text)))?;
        let side = parts
            .next()
            .and_then(Side::parse)
            .ok_or_else(|| crate::Error::invalid_input(format!("missing or unknown side in '{}'", text)))?;
        let quantity = match parts.next() {
            Some(q) => q
                .trim()
                .parse::<f64>()
                .map_err(|_| crate::Error::invalid_input(format!("invalid quantity '{}'", q)))?,
            None => 1.0,
        };
        if parts.next().is_some() {
            return Err(crate::Error::invalid_input(format!(
                "expected SYMBOL:SIDE[:QTY], got '{}'",
                text
            )));
        }
        if quantity <= 0.0 || !quantity.is_finite() {
            return Err(crate::Error::invalid_input(format!(
                "quantity must be greater than 0, got {}",
                quantity
            )));
        }

        Ok(Self::new(symbol.trim(), side, quantity))
    }
}
