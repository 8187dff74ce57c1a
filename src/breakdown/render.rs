//! Plain-text tooltip rendering for a bar's breakdown rows.

use super::{AmountFormatter, BarSummary, BreakdownRow};

const INDENT: &str = "   ";
const LABEL_MAX_WIDTH: usize = 40;

/// Describes how a column should align its contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableColumn {
    pub header: String,
    pub min_width: usize,
    pub max_width: Option<usize>,
    pub alignment: Alignment,
}

impl TableColumn {
    fn new(header: &str, alignment: Alignment, max_width: Option<usize>) -> Self {
        Self {
            header: header.to_string(),
            min_width: 0,
            max_width,
            alignment,
        }
    }
}

pub struct Table {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
    pub padding: usize,
    /// Draw the rule under the header with ASCII dashes.
    pub plain: bool,
}

impl Table {
    /// Content width of each column after min/max constraints.
    pub fn compute_widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let mut width = visible_width(&column.header).max(column.min_width);
                for row in &self.rows {
                    if let Some(cell) = row.get(idx) {
                        width = width.max(visible_width(cell));
                    }
                }
                if let Some(max_width) = column.max_width {
                    width = width.min(max_width);
                }
                width
            })
            .collect()
    }

    pub fn render_row(&self, row: &[String], widths: &[usize]) -> String {
        let cells: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let text = row.get(idx).map(String::as_str).unwrap_or("");
                render_cell(text, widths[idx], column.alignment, self.padding)
            })
            .collect();
        cells.join(" ").trim_end().to_string()
    }

    pub fn render(&self) -> String {
        let widths = self.compute_widths();
        let header: Vec<String> = self.columns.iter().map(|c| c.header.clone()).collect();

        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(self.render_row(&header, &widths));
        lines.push(horizontal_rule(&widths, self.padding, self.plain));
        lines.extend(self.rows.iter().map(|row| self.render_row(row, &widths)));
        lines.join("\n")
    }
}

/// Character count, skipping ANSI escape sequences.
fn visible_width(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut idx = 0;
    let mut width = 0;

    while idx < bytes.len() {
        if bytes[idx] == 0x1b {
            idx += 1;
            if idx < bytes.len() && bytes[idx] == b'[' {
                idx += 1;
                while idx < bytes.len() {
                    let byte = bytes[idx];
                    idx += 1;
                    if (0x40..=0x7E).contains(&byte) {
                        break;
                    }
                }
                continue;
            }
        }

        match text[idx..].chars().next() {
            Some(ch) => {
                width += 1;
                idx += ch.len_utf8();
            }
            None => break,
        }
    }

    width
}

fn truncate_text(text: &str, width: usize) -> String {
    if visible_width(text) <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut kept: String = text.chars().take(width - 1).collect();
    kept.push('…');
    kept
}

pub fn render_cell(text: &str, width: usize, alignment: Alignment, padding: usize) -> String {
    let fitted = truncate_text(text, width);
    let remaining = width.saturating_sub(visible_width(&fitted));
    let (left, right) = match alignment {
        Alignment::Left => (padding, remaining + padding),
        Alignment::Right => (remaining + padding, padding),
    };
    format!("{}{}{}", " ".repeat(left), fitted, " ".repeat(right))
}

pub fn horizontal_rule(widths: &[usize], padding: usize, plain: bool) -> String {
    if widths.is_empty() {
        return String::new();
    }
    let total: usize =
        widths.iter().map(|w| w + padding * 2).sum::<usize>() + widths.len().saturating_sub(1);
    let ch = if plain { '-' } else { '─' };
    ch.to_string().repeat(total)
}

/// Builds the Category | Spent | % | Remaining | Budget table for a bar.
pub fn breakdown_table(rows: &[BreakdownRow], amounts: &AmountFormatter<'_>, plain: bool) -> Table {
    let columns = vec![
        TableColumn::new("Category", Alignment::Left, Some(LABEL_MAX_WIDTH)),
        TableColumn::new("Spent", Alignment::Right, None),
        TableColumn::new("%", Alignment::Right, None),
        TableColumn::new("Remaining", Alignment::Right, None),
        TableColumn::new("Budget", Alignment::Right, None),
    ];

    let rows = rows
        .iter()
        .map(|row| {
            let label = format!("{}{}", INDENT.repeat(row.indent as usize), row.label);
            let Some(figures) = row.figures else {
                return vec![label];
            };
            vec![
                label,
                amounts.format(figures.spent, &row.currency),
                row.percent_text(),
                amounts.format(figures.remaining, &row.currency),
                amounts.format(figures.budget, &row.currency),
            ]
        })
        .collect();

    Table {
        columns,
        rows,
        padding: 0,
        plain,
    }
}

/// Full tooltip text: the bar's short name and percentage, then its breakdown.
pub fn render_tooltip(summary: &BarSummary, amounts: &AmountFormatter<'_>, plain: bool) -> String {
    let mut out = format!("{}\n{}", summary.short_name, summary.percent_text);
    if !summary.rows.is_empty() {
        out.push('\n');
        out.push_str(&breakdown_table(&summary.rows, amounts, plain).render());
    }
    out
}
