use super::table::{Align, TextTable};
use crate::risk::RiskAnalysis;

pub fn risk_panel(analysis: &RiskAnalysis) -> String {
    let mut table = TextTable::new([("Risk Analysis", Align::Left), ("", Align::Right)]);
    table.push(vec![
        "Reward/Risk Ratio".to_string(),
        analysis
            .reward_risk
            .map(|r| format!("{:.2}", r))
            .unwrap_or_else(|| "Unlimited".to_string()),
    ]);
    table.push(vec!["Delta Exposure".to_string(), format!("{:.2}", analysis.delta)]);
    table.push(vec!["Gamma Exposure".to_string(), format!("{:.4}", analysis.gamma)]);
    table.push(vec!["Theta Exposure".to_string(), format!("{:.2}", analysis.theta)]);
    table.push(vec!["Vega Exposure".to_string(), format!("{:.2}", analysis.vega)]);
    table.render()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_panel() {
        let text = risk_panel(&RiskAnalysis {
            reward_risk: Some(120.5 / 379.5),
            delta: 0.05,
            gamma: -0.00012,
            theta: 12.5,
            vega: -40.0,
        });

        assert!(text.starts_with("Risk Analysis"));
        let ratio = text.lines().find(|l| l.starts_with("Reward/Risk Ratio")).unwrap();
        assert!(ratio.ends_with(" 0.32"));
        assert!(text.contains("-0.0001"));
        assert!(text.contains("-40.00"));
    }

    #[test]
    fn test_unbounded_ratio() {
        let text = risk_panel(&RiskAnalysis {
            reward_risk: None,
            delta: 0.0,
            gamma: 0.0,
            theta: 0.0,
            vega: 0.0,
        });
        assert!(text.contains("Unlimited"));
    }
}
