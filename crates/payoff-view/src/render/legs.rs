use common::Strategy;

use super::table::{Align, TextTable};
use crate::format::{date, opt_fixed, usd, usd_short};

/// Legs with quantities scaled by the base quantity
pub fn legs_table(strategy: &Strategy) -> String {
    let mut table = TextTable::new([
        ("Side", Align::Left),
        ("Type", Align::Left),
        ("Strike", Align::Right),
        ("Expiry", Align::Left),
        ("Price", Align::Right),
        ("Quantity", Align::Right),
        ("Delta", Align::Right),
        ("Gamma", Align::Right),
        ("Theta", Align::Right),
        ("Vega", Align::Right),
    ]);

    for leg in &strategy.legs {
        let c = &leg.selected;
        table.push(vec![
            leg.side.to_string(),
            c.option_type.to_string(),
            usd_short(c.strike_price),
            date(&c.expiry_time),
            usd(c.mark_price),
            format!("{:.1}", leg.quantity(strategy.base_quantity)),
            opt_fixed(c.delta, 2),
            opt_fixed(c.gamma, 4),
            opt_fixed(c.theta, 2),
            opt_fixed(c.vega, 2),
        ]);
    }

    table.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use options_client::sample;

    #[test]
    fn test_legs_table() {
        let (mut strategy, _) = sample::iron_condor();
        strategy.base_quantity = 2.5;
        strategy.legs[0].selected.gamma = None;

        let text = legs_table(&strategy);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2 + 4);
        assert!(lines[0].starts_with("Side"));
        assert!(lines[2].starts_with("BUY   PUT"));
        assert!(lines[2].contains("$48,500"));
        assert!(lines[2].contains("Oct 30, 2026"));
        assert!(lines[2].contains("$210.00"));
        assert!(lines[2].contains("2.5"));
        assert!(lines[2].contains("N/A"));
        assert!(lines[3].starts_with("SELL  PUT"));
    }
}
