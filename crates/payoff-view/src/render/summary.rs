use common::{Strategy, StrategyPayoff};

use crate::format::{breakevens, cost_label, usd};

/// Key facts of a built strategy, one `Label: value` per line
pub fn strategy_summary(strategy: &Strategy, payoff: Option<&StrategyPayoff>) -> String {
    let mut lines = vec![
        ("Strategy", strategy.definition_name.clone()),
        ("Asset", strategy.underlying_asset.clone()),
        ("Price", usd(strategy.underlying_price_at_construction)),
        ("Est. Cost", cost_label(strategy.estimated_cost)),
    ];
    if let Some(payoff) = payoff {
        lines.push(("Max Profit", usd(payoff.max_profit)));
        lines.push(("Max Loss", usd(payoff.max_loss.abs())));
        lines.push(("Breakevens", breakevens(&payoff.breakevens)));
    }

    lines
        .into_iter()
        .map(|(label, value)| format!("{:<12}{}", format!("{}:", label), value))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use options_client::sample;

    #[test]
    fn test_iron_condor_summary() {
        let (strategy, payoff) = sample::iron_condor();
        let text = strategy_summary(&strategy, Some(&payoff));

        assert!(text.contains("Strategy:   Iron Condor"));
        assert!(text.contains("Price:      $54,800.00"));
        assert!(text.contains("Est. Cost:  Credit: $120.50"));
        assert!(text.contains("Max Profit: $120.50"));
        assert!(text.contains("Max Loss:   $379.50"));
        assert!(text.contains("Breakevens: $49,000.00, $58,500.00"));
    }

    #[test]
    fn test_summary_without_payoff() {
        let (mut strategy, _) = sample::iron_condor();
        strategy.estimated_cost = 42.0;
        let text = strategy_summary(&strategy, None);
        assert!(text.contains("Debit: $42.00"));
        assert!(!text.contains("Max Profit"));
    }
}
