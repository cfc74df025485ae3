//! Option market types shared across optlab
//!
//! These mirror the backend's wire format: snake_case fields, upper-case
//! enum tags. Everything here is an immutable snapshot of what the backend
//! returned; nothing is recomputed client-side.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Position side of a leg (buy or sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Long the contract
    #[serde(alias = "buy")]
    Buy,
    /// Short the contract
    #[serde(alias = "sell")]
    Sell,
}

impl Side {
    /// +1 for buys, -1 for sells
    pub fn direction(&self) -> f64 {
        match self {
            Side::Buy => 1.0,
            Side::Sell => -1.0,
        }
    }

    /// Parse a case-insensitive side name
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "BUY" | "B" | "LONG" => Some(Side::Buy),
            "SELL" | "S" | "SHORT" => Some(Side::Sell),
            _ => None,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// Call or put
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OptionType {
    /// Right to buy at the strike
    #[serde(alias = "call")]
    Call,
    /// Right to sell at the strike
    #[serde(alias = "put")]
    Put,
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionType::Call => write!(f, "CALL"),
            OptionType::Put => write!(f, "PUT"),
        }
    }
}

/// One tradable option contract as quoted by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionContract {
    pub symbol: String,
    pub strike_price: f64,
    /// Expiry timestamp, RFC 3339 when the backend sends a full timestamp
    pub expiry_time: String,
    pub option_type: OptionType,
    #[serde(default)]
    pub last_price: f64,
    #[serde(default)]
    pub bid_price: f64,
    #[serde(default)]
    pub ask_price: f64,
    #[serde(default)]
    pub mark_price: f64,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub open_interest: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implied_volatility: Option<f64>,
    #[serde(default)]
    pub delta: Option<f64>,
    #[serde(default)]
    pub gamma: Option<f64>,
    #[serde(default)]
    pub theta: Option<f64>,
    #[serde(default)]
    pub vega: Option<f64>,
}

impl OptionContract {
    /// Parsed expiry, if the backend sent an RFC 3339 timestamp
    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.expiry_time)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// In-the-money relative to the given underlying price
    pub fn is_itm(&self, underlying_price: f64) -> bool {
        match self.option_type {
            OptionType::Call => self.strike_price < underlying_price,
            OptionType::Put => self.strike_price > underlying_price,
        }
    }

    /// Ask minus bid
    pub fn spread(&self) -> f64 {
        self.ask_price - self.bid_price
    }
}

/// Calls and puts sharing one expiry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpiryGroup {
    #[serde(default)]
    pub calls: Vec<OptionContract>,
    #[serde(default)]
    pub puts: Vec<OptionContract>,
}

impl ExpiryGroup {
    /// Total number of contracts in the group
    pub fn len(&self) -> usize {
        self.calls.len() + self.puts.len()
    }

    /// True when the group holds no contracts
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty() && self.puts.is_empty()
    }

    /// Distinct strikes across calls and puts, ascending
    pub fn strikes(&self) -> Vec<f64> {
        let mut strikes: Vec<f64> = self
            .calls
            .iter()
            .chain(self.puts.iter())
            .map(|c| c.strike_price)
            .collect();
        strikes.sort_by(|a, b| a.total_cmp(b));
        strikes.dedup();
        strikes
    }
}

/// Option chain for one underlying, grouped by expiry
///
/// Invariant: every contract's `expiry_time` equals the key of the group it
/// sits in. See [`OptionChain::misplaced_contracts`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionChain {
    pub asset: String,
    pub underlying_price: f64,
    pub last_updated: String,
    pub expiries: BTreeMap<String, ExpiryGroup>,
}

impl OptionChain {
    /// Build a chain from flat call/put lists, grouping each contract under
    /// its own expiry
    pub fn from_flat(
        asset: impl Into<String>,
        underlying_price: f64,
        last_updated: impl Into<String>,
        calls: Vec<OptionContract>,
        puts: Vec<OptionContract>,
    ) -> Self {
        let mut expiries: BTreeMap<String, ExpiryGroup> = BTreeMap::new();
        for call in calls {
            expiries
                .entry(call.expiry_time.clone())
                .or_default()
                .calls
                .push(call);
        }
        for put in puts {
            expiries
                .entry(put.expiry_time.clone())
                .or_default()
                .puts
                .push(put);
        }

        Self {
            asset: asset.into(),
            underlying_price,
            last_updated: last_updated.into(),
            expiries,
        }
    }

    /// Expiry keys, earliest first
    pub fn expiry_keys(&self) -> Vec<&str> {
        self.expiries.keys().map(String::as_str).collect()
    }

    /// Contracts for one expiry
    pub fn expiry(&self, key: &str) -> Option<&ExpiryGroup> {
        self.expiries.get(key)
    }

    /// Total number of contracts across all expiries
    pub fn contract_count(&self) -> usize {
        self.expiries.values().map(ExpiryGroup::len).sum()
    }

    /// Symbols of contracts whose `expiry_time` disagrees with their group key
    pub fn misplaced_contracts(&self) -> Vec<&str> {
        self.expiries
            .iter()
            .flat_map(|(key, group)| {
                group
                    .calls
                    .iter()
                    .chain(group.puts.iter())
                    .filter(move |c| &c.expiry_time != key)
                    .map(|c| c.symbol.as_str())
            })
            .collect()
    }

    /// Flat calls/puts projection of the earliest expiry
    ///
    /// Lossy: later expiries are dropped. Consumers that need the whole chain
    /// should walk `expiries` instead.
    pub fn flat(&self) -> FlatChain {
        let (expiry, group) = self
            .expiries
            .iter()
            .next()
            .map(|(k, g)| (Some(k.clone()), g.clone()))
            .unwrap_or((None, ExpiryGroup::default()));

        FlatChain {
            asset: self.asset.clone(),
            underlying_price: self.underlying_price,
            last_updated: self.last_updated.clone(),
            expiry,
            calls: group.calls,
            puts: group.puts,
        }
    }
}

/// Single-expiry view of a chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatChain {
    pub asset: String,
    pub underlying_price: f64,
    pub last_updated: String,
    pub expiry: Option<String>,
    pub calls: Vec<OptionContract>,
    pub puts: Vec<OptionContract>,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn contract(symbol: &str, strike: f64, expiry: &str, option_type: OptionType) -> OptionContract {
        OptionContract {
            symbol: symbol.to_string(),
            strike_price: strike,
            expiry_time: expiry.to_string(),
            option_type,
            last_price: 100.0,
            bid_price: 95.0,
            ask_price: 105.0,
            mark_price: 100.0,
            volume: 10.0,
            open_interest: 50.0,
            implied_volatility: Some(0.65),
            delta: Some(0.5),
            gamma: Some(0.0002),
            theta: Some(-12.5),
            vega: Some(20.0),
        }
    }
}
