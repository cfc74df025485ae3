//! Merge of the primary payoff and saved comparisons into one table

use common::{ComparisonEntry, Strategy, StrategyPayoff};

/// How non-base series are matched to the base rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Alignment {
    /// i-th point of every series on the i-th row
    Index,
    /// Each series interpolated at the base row's price
    #[default]
    Price,
}

/// One merged row: a price and one value per column
#[derive(Debug, Clone, PartialEq)]
pub struct PayoffRow {
    pub underlying_price: f64,
    pub values: Vec<Option<f64>>,
}

/// Row-per-price table of every payoff series
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PayoffView {
    /// Series labels, one per column
    pub columns: Vec<String>,
    /// Ordered as the base series
    pub rows: Vec<PayoffRow>,
    /// Underlying price the primary strategy was built at
    pub construction_price: Option<f64>,
    /// Asset of the primary (or first) series
    pub asset: Option<String>,
}

impl PayoffView {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Value of `label` on row `row`
    pub fn value(&self, row: usize, label: &str) -> Option<f64> {
        let column = self.columns.iter().position(|c| c == label)?;
        self.rows.get(row)?.values.get(column).copied().flatten()
    }

    /// Smallest and largest value across all columns
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.rows
            .iter()
            .flat_map(|row| row.values.iter().flatten().copied())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Line up `primary` and `comparisons` on the base series' prices
///
/// The base is the primary payoff when present, else the first comparison.
/// Series sharing a label share a column; later series overwrite earlier
/// ones.
pub fn merge(
    primary: Option<(&Strategy, &StrategyPayoff)>,
    comparisons: &[ComparisonEntry],
    alignment: Alignment,
) -> PayoffView {
    let series: Vec<(&Strategy, &StrategyPayoff)> = primary
        .into_iter()
        .chain(comparisons.iter().map(|e| (&e.strategy, &e.payoff)))
        .collect();

    let Some((base_strategy, base)) = series.first().copied() else {
        return PayoffView::default();
    };

    let mut columns: Vec<String> = Vec::new();
    let slots: Vec<usize> = series
        .iter()
        .map(|(strategy, _)| {
            let label = &strategy.definition_name;
            match columns.iter().position(|c| c == label) {
                Some(i) => i,
                None => {
                    columns.push(label.clone());
                    columns.len() - 1
                }
            }
        })
        .collect();

    let rows = base
        .payoff
        .iter()
        .enumerate()
        .map(|(index, point)| {
            let mut values = vec![None; columns.len()];
            for (n, ((_, payoff), slot)) in series.iter().zip(&slots).enumerate() {
                values[*slot] = if n == 0 {
                    Some(point.profit_loss)
                } else {
                    match alignment {
                        Alignment::Index => payoff.payoff.get(index).map(|p| p.profit_loss),
                        Alignment::Price => payoff.profit_loss_at(point.underlying_price),
                    }
                };
            }
            PayoffRow {
                underlying_price: point.underlying_price,
                values,
            }
        })
        .collect();

    tracing::debug!(
        series = series.len(),
        columns = columns.len(),
        rows = base.payoff.len(),
        ?alignment,
        "Payoff view merged"
    );

    PayoffView {
        columns,
        rows,
        construction_price: primary.map(|(s, _)| s.underlying_price_at_construction),
        asset: Some(base_strategy.underlying_asset.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::PayoffPoint;
    use options_client::sample;

    fn series(name: &str, points: &[(f64, f64)]) -> ComparisonEntry {
        let (mut strategy, _) = sample::iron_condor();
        strategy.definition_name = name.to_string();
        let payoff = StrategyPayoff {
            payoff: points
                .iter()
                .map(|(price, pl)| PayoffPoint {
                    underlying_price: *price,
                    profit_loss: *pl,
                })
                .collect(),
            max_profit: 0.0,
            max_loss: 0.0,
            breakevens: vec![],
        };
        ComparisonEntry::new(strategy, payoff)
    }

    #[test]
    fn test_nothing_to_merge() {
        let view = merge(None, &[], Alignment::Price);
        assert!(view.is_empty());
        assert!(view.columns.is_empty());
    }

    #[test]
    fn test_primary_only_matches_points() {
        let (strategy, payoff) = sample::iron_condor();
        let view = merge(Some((&strategy, &payoff)), &[], Alignment::Price);

        assert_eq!(view.columns, vec!["Iron Condor"]);
        assert_eq!(view.len(), payoff.len());
        for (row, point) in view.rows.iter().zip(&payoff.payoff) {
            assert_eq!(row.underlying_price, point.underlying_price);
            assert_eq!(row.values, vec![Some(point.profit_loss)]);
        }
        assert_eq!(view.construction_price, Some(54_800.0));
    }

    #[test]
    fn test_row_count_follows_base() {
        let base = series("Base", &[(100.0, 1.0), (110.0, 2.0), (120.0, 3.0), (130.0, 4.0)]);
        let short = series("Short", &[(100.0, -1.0), (130.0, 2.0)]);

        for alignment in [Alignment::Index, Alignment::Price] {
            let view = merge(
                Some((&base.strategy, &base.payoff)),
                std::slice::from_ref(&short),
                alignment,
            );
            assert_eq!(view.len(), 4);
        }
    }

    #[test]
    fn test_index_alignment_pairs_by_position() {
        let base = series("Base", &[(100.0, 1.0), (110.0, 2.0), (120.0, 3.0)]);
        let other = series("Other", &[(500.0, -5.0), (600.0, -6.0)]);

        let view = merge(None, &[base, other], Alignment::Index);
        assert_eq!(view.value(0, "Other"), Some(-5.0));
        assert_eq!(view.value(1, "Other"), Some(-6.0));
        assert_eq!(view.value(2, "Other"), None);
        assert_eq!(view.construction_price, None);
    }

    #[test]
    fn test_price_alignment_interpolates() {
        let base = series("Base", &[(100.0, 1.0), (110.0, 2.0), (120.0, 3.0), (130.0, 4.0)]);
        let other = series("Other", &[(105.0, 0.0), (125.0, 20.0)]);

        let view = merge(None, &[base, other], Alignment::Price);
        assert_eq!(view.value(0, "Other"), None);
        assert_eq!(view.value(1, "Other"), Some(5.0));
        assert_eq!(view.value(2, "Other"), Some(15.0));
        assert_eq!(view.value(3, "Other"), None);
    }

    #[test]
    fn test_duplicate_labels_share_column() {
        let a = series("Same", &[(100.0, 1.0), (110.0, 2.0)]);
        let b = series("Same", &[(100.0, 9.0), (110.0, 8.0)]);

        let view = merge(Some((&a.strategy, &a.payoff)), std::slice::from_ref(&b), Alignment::Index);
        assert_eq!(view.columns.len(), 1);
        assert_eq!(view.value(0, "Same"), Some(9.0));
        assert_eq!(view.value_range(), Some((8.0, 9.0)));
    }
}
