//! Request bodies and response shapes of the REST contract

use std::collections::BTreeMap;

use common::{CustomLegRequest, ExpiryGroup, OptionChain, OptionContract, Strategy};
use serde::{Deserialize, Serialize};

/// `GET /options/assets`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetsResponse {
    pub assets: Vec<String>,
}

/// `GET /options/{asset}` in either of its two shapes
///
/// Older backends send flat `calls`/`puts`; newer ones send
/// `options_by_expiry`. Both may be present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainResponse {
    pub asset: String,
    pub underlying_price: f64,
    #[serde(default)]
    pub last_updated: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub calls: Vec<OptionContract>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub puts: Vec<OptionContract>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options_by_expiry: Option<BTreeMap<String, ExpiryGroup>>,
}

impl ChainResponse {
    /// Normalize into an [`OptionChain`]
    ///
    /// Every contract is regrouped under its own `expiry_time`, so the
    /// grouping invariant holds even when the backend keys groups by a
    /// differently formatted date.
    pub fn into_chain(self) -> OptionChain {
        let mut calls = self.calls;
        let mut puts = self.puts;
        for group in self.options_by_expiry.into_iter().flat_map(BTreeMap::into_values) {
            calls.extend(group.calls);
            puts.extend(group.puts);
        }

        OptionChain::from_flat(self.asset, self.underlying_price, self.last_updated, calls, puts)
    }
}

/// `POST /strategies/construct`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructRequest {
    pub definition_name: String,
    pub underlying_asset: String,
    pub base_quantity: f64,
}

/// `POST /strategies/custom`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomStrategyRequest {
    pub underlying_asset: String,
    pub legs: Vec<CustomLegRequest>,
}

/// `POST /strategies/payoff`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffRequest {
    pub strategy: Strategy,
    pub price_min: f64,
    pub price_max: f64,
    pub num_points: u32,
}

/// Error body of non-2xx responses
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contract_json(symbol: &str, strike: f64, expiry: &str, kind: &str) -> serde_json::Value {
        serde_json::json!({
            "symbol": symbol,
            "strike_price": strike,
            "expiry_time": expiry,
            "option_type": kind,
            "last_price": 1200.0,
            "bid_price": 1190.0,
            "ask_price": 1210.0,
            "mark_price": 1200.0,
            "volume": 12.0,
            "open_interest": 80.0,
            "delta": 0.45,
            "gamma": 0.0001,
            "theta": -30.0,
            "vega": 55.0
        })
    }

    #[test]
    fn test_flat_chain_keeps_every_expiry() {
        let body = serde_json::json!({
            "asset": "BTC",
            "underlying_price": 54800.0,
            "last_updated": "2025-04-12T10:00:00Z",
            "calls": [
                contract_json("BTC-250419-56000-C", 56000.0, "2025-04-19T08:00:00Z", "CALL"),
                contract_json("BTC-250426-56000-C", 56000.0, "2025-04-26T08:00:00Z", "CALL")
            ],
            "puts": [
                contract_json("BTC-250419-52000-P", 52000.0, "2025-04-19T08:00:00Z", "PUT")
            ]
        });

        let chain = serde_json::from_value::<ChainResponse>(body).unwrap().into_chain();
        assert_eq!(chain.contract_count(), 3);
        assert_eq!(
            chain.expiry_keys(),
            vec!["2025-04-19T08:00:00Z", "2025-04-26T08:00:00Z"]
        );
        assert!(chain.misplaced_contracts().is_empty());
    }

    #[test]
    fn test_grouped_chain_is_rekeyed_by_contract_expiry() {
        let body = serde_json::json!({
            "asset": "ETH",
            "underlying_price": 3100.0,
            "last_updated": "2025-04-12T10:00:00Z",
            "options_by_expiry": {
                "2025-04-19": {
                    "calls": [contract_json("ETH-250419-3200-C", 3200.0, "2025-04-19T08:00:00Z", "CALL")],
                    "puts": [contract_json("ETH-250419-3000-P", 3000.0, "2025-04-19T08:00:00Z", "PUT")]
                },
                "2025-05-30": {
                    "calls": [contract_json("ETH-250530-3400-C", 3400.0, "2025-05-30T08:00:00Z", "CALL")]
                }
            }
        });

        let chain = serde_json::from_value::<ChainResponse>(body).unwrap().into_chain();
        assert_eq!(chain.asset, "ETH");
        assert_eq!(chain.contract_count(), 3);
        assert!(chain.misplaced_contracts().is_empty());

        let first = chain.expiry("2025-04-19T08:00:00Z").unwrap();
        assert_eq!(first.calls.len(), 1);
        assert_eq!(first.puts.len(), 1);

        let flat = chain.flat();
        assert_eq!(flat.expiry.as_deref(), Some("2025-04-19T08:00:00Z"));
        assert_eq!(flat.calls[0].symbol, "ETH-250419-3200-C");
    }

    #[test]
    fn test_request_bodies_use_backend_field_names() {
        let body = serde_json::to_value(ConstructRequest {
            definition_name: "Iron Condor".into(),
            underlying_asset: "BTC".into(),
            base_quantity: 1.0,
        })
        .unwrap();
        assert_eq!(body["definition_name"], "Iron Condor");
        assert_eq!(body["underlying_asset"], "BTC");

        let body = serde_json::to_value(CustomStrategyRequest {
            underlying_asset: "BTC".into(),
            legs: vec![CustomLegRequest::new("BTC-C-56000", common::Side::Sell, 1.0)],
        })
        .unwrap();
        assert_eq!(body["legs"][0]["option_symbol"], "BTC-C-56000");
        assert_eq!(body["legs"][0]["side"], "SELL");
    }
}
