// Fixed-width text tables for listings. Widths are measured in terminal
// columns, so accented titles and wide characters line up too.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const SEPARATOR: &str = " | ";

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub header: &'static str,
    pub width: usize,
    /// Long cells are wrapped onto continuation lines instead of overflowing.
    pub wrap: bool,
}

impl Column {
    pub const fn fixed(header: &'static str, width: usize) -> Self {
        Self { header, width, wrap: false }
    }

    pub const fn wrapped(header: &'static str, width: usize) -> Self {
        Self { header, width, wrap: true }
    }
}

#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: impl Into<Vec<Column>>) -> Self {
        Self {
            columns: columns.into(),
            rows: Vec::new(),
        }
    }

    /// Add a row. Missing cells are left blank, extra cells are dropped.
    pub fn row<I, S>(&mut self, cells: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cells: Vec<String> = cells.into_iter().map(Into::into).collect();
        cells.resize(self.columns.len(), String::new());
        self.rows.push(cells);
        self
    }

    /// Header, a rule as wide as the header, then the rows.
    pub fn render(&self) -> Vec<String> {
        let headers: Vec<String> = self.columns.iter().map(|c| c.header.to_string()).collect();
        let header = self.line(&headers);
        let mut lines = vec![header.clone(), "-".repeat(header.width())];

        for cells in &self.rows {
            let wrapped: Vec<Vec<String>> = self
                .columns
                .iter()
                .zip(cells)
                .map(|(column, cell)| {
                    if column.wrap {
                        wrap(cell, column.width)
                    } else {
                        vec![cell.clone()]
                    }
                })
                .collect();
            let height = wrapped.iter().map(Vec::len).max().unwrap_or(1);
            for i in 0..height {
                let parts: Vec<String> = wrapped
                    .iter()
                    .map(|lines| lines.get(i).cloned().unwrap_or_default())
                    .collect();
                lines.push(self.line(&parts));
            }
        }
        lines
    }

    fn line(&self, cells: &[String]) -> String {
        let last = self.columns.len().saturating_sub(1);
        let padded: Vec<String> = self
            .columns
            .iter()
            .zip(cells)
            .enumerate()
            .map(|(i, (column, cell))| {
                if i == last {
                    cell.clone()
                } else {
                    pad(cell, column.width)
                }
            })
            .collect();
        padded.join(SEPARATOR).trim_end().to_string()
    }
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(fill))
}

/// Greedy word wrap to `width` columns. Words longer than a line are split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.width()
        } else {
            current.width() + 1 + word.width()
        };
        if needed <= width {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        for ch in word.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if current.width() + ch_width > width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current.push(ch);
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}
