//! Text renderers
//!
//! Every function returns a `String`; callers decide where it goes.

mod chain;
mod comparison;
mod legs;
mod payoff;
mod risk;
mod summary;
mod table;

pub use chain::chain_table;
pub use comparison::comparison_table;
pub use legs::legs_table;
pub use payoff::{payoff_chart, payoff_table};
pub use risk::risk_panel;
pub use summary::strategy_summary;

use crate::merge::PayoffView;
use crate::zoom::ZoomLevel;

pub const EMPTY_CHART_PROMPT: &str = "Build a strategy to see the payoff chart";
pub const EMPTY_TABLE_PROMPT: &str = "Build a strategy to see the payoff table";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChartKind {
    #[default]
    Area,
    Line,
    Bar,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewTab {
    #[default]
    Graph,
    Table,
}

/// What the payoff panel shows and how
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSelection {
    pub chart: ChartKind,
    pub tab: ViewTab,
    pub zoom: ZoomLevel,
    pub width: usize,
    pub height: usize,
}

impl Default for ViewSelection {
    fn default() -> Self {
        Self {
            chart: ChartKind::default(),
            tab: ViewTab::default(),
            zoom: ZoomLevel::default(),
            width: 72,
            height: 16,
        }
    }
}

/// Zoom `view`, then draw it as a chart or a table according to the tab
pub fn payoff_panel(view: &PayoffView, selection: &ViewSelection) -> String {
    if view.is_empty() {
        return match selection.tab {
            ViewTab::Graph => EMPTY_CHART_PROMPT.to_string(),
            ViewTab::Table => EMPTY_TABLE_PROMPT.to_string(),
        };
    }

    let zoomed = view.zoomed(selection.zoom);
    let body = match selection.tab {
        ViewTab::Graph => payoff_chart(&zoomed, selection.chart, selection.width, selection.height),
        ViewTab::Table => payoff_table(&zoomed),
    };
    format!("Payoff ({} zoom)\n{}", selection.zoom, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::{merge, Alignment};
    use options_client::sample;

    #[test]
    fn test_empty_view_prompts() {
        let view = PayoffView::default();
        let mut selection = ViewSelection::default();
        assert_eq!(payoff_panel(&view, &selection), EMPTY_CHART_PROMPT);

        selection.tab = ViewTab::Table;
        assert_eq!(payoff_panel(&view, &selection), EMPTY_TABLE_PROMPT);
    }

    #[test]
    fn test_table_tab_respects_zoom() {
        let (strategy, payoff) = sample::iron_condor();
        let view = merge(Some((&strategy, &payoff)), &[], Alignment::Price);
        let selection = ViewSelection {
            tab: ViewTab::Table,
            zoom: ZoomLevel::new(4.0),
            ..ViewSelection::default()
        };

        let text = payoff_panel(&view, &selection);
        assert!(text.starts_with("Payoff (4.0x zoom)"));
        // title, header, rule, then 25 rows
        assert_eq!(text.lines().count(), 3 + 25);
    }
}
