use common::ComparisonEntry;

use super::table::{Align, TextTable};
use crate::format::{breakevens, cost_label, usd};

pub const EMPTY_COMPARISON: &str =
    "No strategies to compare. Build and add strategies to see a comparison.";

/// Saved strategies side by side, numbered from 1
pub fn comparison_table(entries: &[ComparisonEntry]) -> String {
    if entries.is_empty() {
        return EMPTY_COMPARISON.to_string();
    }

    let mut table = TextTable::new([
        ("#", Align::Right),
        ("Strategy", Align::Left),
        ("Asset", Align::Left),
        ("Max Profit", Align::Right),
        ("Max Loss", Align::Right),
        ("Cost", Align::Right),
        ("Breakevens", Align::Left),
    ]);

    for (i, entry) in entries.iter().enumerate() {
        table.push(vec![
            (i + 1).to_string(),
            entry.strategy.definition_name.clone(),
            entry.strategy.underlying_asset.clone(),
            usd(entry.payoff.max_profit),
            usd(entry.payoff.max_loss.abs()),
            cost_label(entry.strategy.estimated_cost),
            breakevens(&entry.payoff.breakevens),
        ]);
    }

    table.render()
}
