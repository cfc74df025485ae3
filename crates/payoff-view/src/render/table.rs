//! Column-aligned text tables

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Align {
    Left,
    Right,
}

pub(crate) struct TextTable {
    headers: Vec<String>,
    align: Vec<Align>,
    rows: Vec<Vec<String>>,
}

impl TextTable {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = (S, Align)>) -> Self {
        let (headers, align) = headers.into_iter().map(|(h, a)| (h.into(), a)).unzip();
        Self {
            headers,
            align,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                self.rows
                    .iter()
                    .filter_map(|r| r.get(i))
                    .map(|c| c.chars().count())
                    .chain(std::iter::once(h.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    fn line(&self, cells: &[String], widths: &[usize]) -> String {
        let empty = String::new();
        widths
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let cell = cells.get(i).unwrap_or(&empty);
                match self.align.get(i).copied().unwrap_or(Align::Left) {
                    Align::Left => format!("{:<w$}", cell, w = *w),
                    Align::Right => format!("{:>w$}", cell, w = *w),
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let mut out = Vec::with_capacity(self.rows.len() + 2);
        out.push(self.line(&self.headers, &widths));
        let total = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        out.push("-".repeat(total));
        for row in &self.rows {
            out.push(self.line(row, &widths));
        }
        out.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_aligned() {
        let mut table = TextTable::new([("Name", Align::Left), ("Value", Align::Right)]);
        table.push(vec!["Delta".into(), "0.05".into()]);
        table.push(vec!["Gamma".into(), "0.0001".into()]);

        let text = table.render();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Name    Value");
        assert_eq!(lines[1], "-------------");
        assert_eq!(lines[2], "Delta    0.05");
        assert_eq!(lines[3], "Gamma  0.0001");
    }
}
