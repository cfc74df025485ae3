use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Rect};
use ratatui::symbols::{self, Marker};
use ratatui::text::Span;
use ratatui::widgets::{Axis, Chart, Dataset, GraphType, Widget};

use super::table::{Align, TextTable};
use super::{ChartKind, EMPTY_CHART_PROMPT, EMPTY_TABLE_PROMPT};
use crate::format::{usd, usd_short};
use crate::merge::PayoffView;

/// Canvas marker per series and the cell symbol it leaves in the buffer
const SERIES_MARKERS: [(Marker, &str); 3] = [
    (Marker::Dot, symbols::DOT),
    (Marker::Block, symbols::block::FULL),
    (Marker::Bar, symbols::bar::HALF),
];

type Layer = (Vec<(f64, f64)>, Marker, GraphType);

/// Price column followed by one profit/loss column per series
pub fn payoff_table(view: &PayoffView) -> String {
    if view.is_empty() {
        return EMPTY_TABLE_PROMPT.to_string();
    }

    let headers = std::iter::once(("Price".to_string(), Align::Right))
        .chain(view.columns.iter().map(|c| (c.clone(), Align::Right)));
    let mut table = TextTable::new(headers);

    for row in &view.rows {
        let mut cells = vec![usd(row.underlying_price)];
        cells.extend(row.values.iter().map(|v| match v {
            Some(v) => usd(*v),
            None => "N/A".to_string(),
        }));
        table.push(cells);
    }

    table.render()
}

/// Chart of every series with a zero axis and the construction price
///
/// Drawn with ratatui into an off-screen buffer of `width` x `height`
/// cells, followed by a legend line. The first series is drawn on top.
pub fn payoff_chart(view: &PayoffView, kind: ChartKind, width: usize, height: usize) -> String {
    if view.is_empty() {
        return EMPTY_CHART_PROMPT.to_string();
    }

    let width = width.clamp(20, usize::from(u16::MAX)) as u16;
    let height = height.clamp(5, usize::from(u16::MAX)) as u16;

    let first = view.rows[0].underlying_price;
    let last = view.rows[view.rows.len() - 1].underlying_price;
    let (x_lo, x_hi) = if last > first { (first, last) } else { (first - 1.0, first + 1.0) };

    let (lo, hi) = view.value_range().unwrap_or((0.0, 0.0));
    let (lo, hi) = (lo.min(0.0), hi.max(0.0));
    let (lo, hi) = if hi - lo == 0.0 { (lo - 1.0, hi + 1.0) } else { (lo, hi) };
    // braille cells hold four dots vertically
    let step = (hi - lo) / (f64::from(height) * 4.0);

    let mut layers: Vec<Layer> = vec![(vec![(x_lo, 0.0), (x_hi, 0.0)], Marker::Braille, GraphType::Line)];
    if let Some(price) = view.construction_price.filter(|p| (x_lo..=x_hi).contains(p)) {
        layers.push((vec![(price, lo), (price, hi)], Marker::Braille, GraphType::Line));
    }

    let mut fills = Vec::new();
    let mut outlines = Vec::new();
    for series in (0..view.columns.len()).rev() {
        let (marker, _) = SERIES_MARKERS[series % SERIES_MARKERS.len()];
        match kind {
            ChartKind::Area => {
                fills.push((columns(view, series, step), Marker::Braille, GraphType::Scatter));
                outlines.extend(runs(view, series).into_iter().map(|run| (run, marker, GraphType::Line)));
            }
            ChartKind::Line => {
                outlines.extend(runs(view, series).into_iter().map(|run| (run, marker, GraphType::Line)));
            }
            ChartKind::Bar => fills.push((columns(view, series, step), marker, GraphType::Scatter)),
        }
    }
    layers.extend(fills);
    layers.extend(outlines);

    let datasets: Vec<Dataset> = layers
        .iter()
        .map(|(points, marker, graph)| Dataset::default().marker(*marker).graph_type(*graph).data(points))
        .collect();

    let chart = Chart::new(datasets)
        .x_axis(Axis::default().bounds([x_lo, x_hi]).labels(vec![
            Span::raw(usd_short(first)),
            Span::raw(usd_short((first + last) / 2.0)),
            Span::raw(usd_short(last)),
        ]))
        .y_axis(Axis::default().bounds([lo, hi]).labels(vec![
            Span::raw(usd(lo)),
            Span::raw(usd((lo + hi) / 2.0)),
            Span::raw(usd(hi)),
        ]))
        .hidden_legend_constraints((Constraint::Length(0), Constraint::Length(0)));

    let area = Rect::new(0, 0, width, height);
    let mut buffer = Buffer::empty(area);
    chart.render(area, &mut buffer);

    let mut out = buffer_lines(&buffer);

    let mut legend: Vec<String> = view
        .columns
        .iter()
        .enumerate()
        .map(|(i, label)| format!("{} {}", SERIES_MARKERS[i % SERIES_MARKERS.len()].1, label))
        .collect();
    if let Some(price) = view.construction_price {
        legend.push(format!("built at {}", usd(price)));
    }
    out.push(legend.join("   "));

    out.join("\n")
}

/// Contiguous stretches of a series, split where a price has no value
fn runs(view: &PayoffView, series: usize) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for row in &view.rows {
        match row.values.get(series).copied().flatten() {
            Some(v) => current.push((row.underlying_price, v)),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Points stacked from zero up (or down) to each value of a series
fn columns(view: &PayoffView, series: usize, step: f64) -> Vec<(f64, f64)> {
    let mut points = Vec::new();
    for row in &view.rows {
        let Some(value) = row.values.get(series).copied().flatten() else {
            continue;
        };
        let dots = (value.abs() / step).floor() as usize;
        let sign = value.signum();
        points.extend((0..=dots).map(|i| (row.underlying_price, sign * step * i as f64)));
        points.push((row.underlying_price, value));
    }
    points
}

fn buffer_lines(buffer: &Buffer) -> Vec<String> {
    let area = buffer.area;
    (area.top()..area.bottom())
        .map(|y| {
            let line: String = (area.left()..area.right()).map(|x| buffer.get(x, y).symbol()).collect();
            line.trim_end().to_string()
        })
        .collect()
}
