//! Reward/risk and Greek exposure of a strategy

use common::{Strategy, StrategyPayoff};

/// Aggregates shown in the risk panel
///
/// Exposures sum `greek × ratio × direction` over the legs, where direction
/// is +1 for BUY and -1 for SELL. Missing Greeks count as zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskAnalysis {
    /// `|max_profit / max_loss|`; `None` when the loss is zero
    pub reward_risk: Option<f64>,
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
    pub vega: f64,
}

impl RiskAnalysis {
    pub fn analyze(strategy: &Strategy, payoff: &StrategyPayoff) -> Self {
        let exposure = |greek: fn(&common::OptionContract) -> Option<f64>| -> f64 {
            strategy
                .legs
                .iter()
                .map(|leg| greek(&leg.selected).unwrap_or(0.0) * leg.ratio * leg.side.direction())
                .sum()
        };

        let reward_risk = if payoff.max_loss == 0.0 {
            None
        } else {
            Some((payoff.max_profit / payoff.max_loss).abs())
        };

        Self {
            reward_risk,
            delta: exposure(|c| c.delta),
            gamma: exposure(|c| c.gamma),
            theta: exposure(|c| c.theta),
            vega: exposure(|c| c.vega),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use options_client::sample;

    #[test]
    fn test_iron_condor_risk() {
        let (mut strategy, payoff) = sample::iron_condor();
        for (leg, delta) in strategy.legs.iter_mut().zip([-0.10, -0.20, 0.25, 0.15]) {
            leg.selected.delta = Some(delta);
        }
        strategy.legs[0].selected.vega = None;

        let risk = RiskAnalysis::analyze(&strategy, &payoff);
        let ratio = risk.reward_risk.unwrap();
        assert!((ratio - 120.5 / 379.5).abs() < 1e-12);
        // -0.10 + 0.20 - 0.25 + 0.15
        assert!(risk.delta.abs() < 1e-12);
    }

    #[test]
    fn test_zero_loss_has_no_ratio() {
        let (strategy, mut payoff) = sample::iron_condor();
        payoff.max_loss = 0.0;
        assert_eq!(RiskAnalysis::analyze(&strategy, &payoff).reward_risk, None);
    }

    #[test]
    fn test_sell_flips_sign() {
        let (mut strategy, payoff) = sample::iron_condor();
        strategy.legs.truncate(1);
        strategy.legs[0].side = common::Side::Sell;
        strategy.legs[0].ratio = 2.0;
        strategy.legs[0].selected.theta = Some(-30.0);

        assert_eq!(RiskAnalysis::analyze(&strategy, &payoff).theta, 60.0);
    }
}
