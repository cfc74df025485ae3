//! Built-in sample market used by the offline mode and by tests

use common::{
    OptionChain, OptionContract, OptionType, PayoffPoint, Side, Strategy, StrategyBias,
    StrategyDefinition, StrategyLeg, StrategyPayoff,
};

use crate::mock::MockOptionsApi;

const SAMPLE_UPDATED: &str = "2026-10-17T12:00:00Z";
const SAMPLE_EXPIRIES: [&str; 2] = ["2026-10-30T08:00:00Z", "2026-11-27T08:00:00Z"];

/// Mock backend preloaded with BTC and ETH chains and the template catalog
pub fn demo_api() -> MockOptionsApi {
    let btc_strikes: Vec<f64> = (48..=62).map(|k| k as f64 * 1000.0).collect();
    let eth_strikes: Vec<f64> = (26..=36).map(|k| k as f64 * 100.0).collect();

    MockOptionsApi::new()
        .with_assets(["BTC", "ETH"])
        .with_definitions(definitions())
        .with_chain(chain("BTC", 54_800.0, &btc_strikes, &SAMPLE_EXPIRIES))
        .with_chain(chain("ETH", 3_100.0, &eth_strikes, &SAMPLE_EXPIRIES))
}

/// Template catalog the sample backend can construct
pub fn definitions() -> Vec<StrategyDefinition> {
    [
        ("Iron Condor", StrategyBias::Neutral, "Profits when the price stays inside the short strikes"),
        ("Bull Call Spread", StrategyBias::Bullish, "Capped upside for a reduced premium"),
        ("Bear Put Spread", StrategyBias::Bearish, "Capped downside bet for a reduced premium"),
        ("Long Straddle", StrategyBias::Volatile, "Profits from a large move either way"),
        ("Long Strangle", StrategyBias::Volatile, "Cheaper straddle with out-of-the-money legs"),
        ("Long Call", StrategyBias::Bullish, "Single call, limited loss"),
        ("Long Put", StrategyBias::Bearish, "Single put, limited loss"),
    ]
    .into_iter()
    .map(|(name, bias, description)| StrategyDefinition {
        name: name.to_string(),
        bias,
        description: description.to_string(),
    })
    .collect()
}

/// Chain with one call and one put per strike and expiry
pub fn chain(asset: &str, underlying_price: f64, strikes: &[f64], expiries: &[&str]) -> OptionChain {
    let mut calls = Vec::new();
    let mut puts = Vec::new();
    for (i, expiry) in expiries.iter().enumerate() {
        let horizon = 1.0 + i as f64 * 0.5;
        for strike in strikes {
            calls.push(contract(asset, underlying_price, *strike, expiry, OptionType::Call, horizon));
            puts.push(contract(asset, underlying_price, *strike, expiry, OptionType::Put, horizon));
        }
    }

    OptionChain::from_flat(asset, underlying_price, SAMPLE_UPDATED, calls, puts)
}

fn contract(
    asset: &str,
    spot: f64,
    strike: f64,
    expiry: &str,
    option_type: OptionType,
    horizon: f64,
) -> OptionContract {
    let distance = (strike - spot).abs() / (spot * 0.05);
    let time_value = spot * 0.03 * horizon / (1.0 + distance);
    let intrinsic = match option_type {
        OptionType::Call => (spot - strike).max(0.0),
        OptionType::Put => (strike - spot).max(0.0),
    };
    let mark = ((intrinsic + time_value) * 100.0).round() / 100.0;

    let call_delta = (0.5 + (spot - strike) / (spot * 0.2)).clamp(0.02, 0.98);
    let delta = match option_type {
        OptionType::Call => call_delta,
        OptionType::Put => call_delta - 1.0,
    };

    let date: String = expiry
        .chars()
        .take(10)
        .filter(|c| *c != '-')
        .skip(2)
        .collect();
    let suffix = match option_type {
        OptionType::Call => "C",
        OptionType::Put => "P",
    };

    OptionContract {
        symbol: format!("{}-{}-{}-{}", asset, date, strike, suffix),
        strike_price: strike,
        expiry_time: expiry.to_string(),
        option_type,
        last_price: mark,
        bid_price: (mark * 0.98 * 100.0).round() / 100.0,
        ask_price: (mark * 1.02 * 100.0).round() / 100.0,
        mark_price: mark,
        volume: (40.0 / (1.0 + distance)).round(),
        open_interest: (400.0 / (1.0 + distance)).round(),
        implied_volatility: Some(0.55 + 0.02 * distance),
        delta: Some((delta * 10_000.0).round() / 10_000.0),
        gamma: Some(0.0001 / (1.0 + distance)),
        theta: Some(-(time_value / (30.0 * horizon) * 100.0).round() / 100.0),
        vega: Some((time_value / 20.0 * 100.0).round() / 100.0),
    }
}

/// BTC iron condor at 54,800 opened for a 120.50 credit, with its payoff
/// over the default ±15% window
pub fn iron_condor() -> (Strategy, StrategyPayoff) {
    let expiry = SAMPLE_EXPIRIES[0];
    let leg = |side, strike, option_type, mark| {
        let mut selected = contract("BTC", 54_800.0, strike, expiry, option_type, 1.0);
        selected.mark_price = mark;
        StrategyLeg {
            side,
            ratio: 1.0,
            selected,
        }
    };

    let strategy = Strategy {
        definition_name: "Iron Condor".to_string(),
        underlying_asset: "BTC".to_string(),
        underlying_price_at_construction: 54_800.0,
        base_quantity: 1.0,
        timestamp: SAMPLE_UPDATED.to_string(),
        estimated_cost: -120.50,
        legs: vec![
            leg(Side::Buy, 48_500.0, OptionType::Put, 210.0),
            leg(Side::Sell, 49_000.0, OptionType::Put, 265.25),
            leg(Side::Sell, 58_500.0, OptionType::Call, 290.25),
            leg(Side::Buy, 59_000.0, OptionType::Call, 225.0),
        ],
    };

    let (min, max, n) = (46_580.0, 63_020.0, 100);
    let step = (max - min) / (n - 1) as f64;
    let payoff = (0..n)
        .map(|i| {
            let price = min + step * i as f64;
            let profit_loss = if price <= 48_500.0 || price >= 59_000.0 {
                -379.50
            } else if price < 49_000.0 {
                -379.50 + (price - 48_500.0)
            } else if price > 58_500.0 {
                120.50 - (price - 58_500.0)
            } else {
                120.50
            };
            PayoffPoint {
                underlying_price: price,
                profit_loss,
            }
        })
        .collect();

    let payoff = StrategyPayoff {
        payoff,
        max_profit: 120.50,
        max_loss: -379.50,
        breakevens: vec![49_000.0, 58_500.0],
    };

    (strategy, payoff)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_chain_shape() {
        let chain = chain("BTC", 54_800.0, &[54_000.0, 55_000.0], &SAMPLE_EXPIRIES);
        assert_eq!(chain.expiries.len(), 2);
        assert_eq!(chain.contract_count(), 8);
        assert!(chain.misplaced_contracts().is_empty());

        let group = chain.expiry(SAMPLE_EXPIRIES[0]).unwrap();
        assert_eq!(group.calls[0].symbol, "BTC-261030-54000-C");
        assert!(group.calls[0].is_itm(54_800.0));
        assert!(group.puts[1].is_itm(54_800.0));
    }

    #[test]
    fn test_iron_condor_sample() {
        let (strategy, payoff) = iron_condor();
        assert_eq!(strategy.legs.len(), 4);
        assert!(strategy.is_credit());
        assert_eq!(payoff.len(), 100);
        assert_eq!(payoff.payoff[0].underlying_price, 46_580.0);
        assert!((payoff.payoff[99].underlying_price - 63_020.0).abs() < 1e-6);
        assert_eq!(payoff.payoff[0].profit_loss, -379.50);
    }
}
