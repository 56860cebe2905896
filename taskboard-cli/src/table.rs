//! Plain-text tables for the report.
//!
//! Columns are left-aligned and padded to the widest cell; cells longer than
//! the column limit are cut with an ellipsis.

use std::fmt::Write as _;

/// Longest cell shown, in characters
pub const MAX_CELL_CHARS: usize = 40;

/// Something that renders as one table row
pub trait TableRow {
    fn cells(&self) -> Vec<String>;
}

#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Builds a table from rows implementing `TableRow`
    pub fn from_rows<R: TableRow>(headers: &[&str], rows: &[R]) -> Self {
        let mut table = Self::new(headers);
        for row in rows {
            table.push(row.cells());
        }
        table
    }

    /// Appends a row, padding or cutting it to the header count
    pub fn push(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn render(&self) -> String {
        let rows: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(|cell| clip(cell)).collect())
            .collect();

        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut out = String::new();
        write_line(&mut out, &self.headers, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        write_line(&mut out, &rule, &widths);

        if rows.is_empty() {
            out.push_str("(no rows)\n");
        }
        for row in &rows {
            write_line(&mut out, row, &widths);
        }
        out
    }
}

fn write_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    let _ = writeln!(out, "{}", line.join(" | ").trim_end());
}

fn clip(cell: &str) -> String {
    // Newlines would break the row layout
    let flat = cell.replace(['\n', '\r'], " ");
    if flat.chars().count() <= MAX_CELL_CHARS {
        return flat;
    }
    let mut clipped: String = flat.chars().take(MAX_CELL_CHARS - 1).collect();
    clipped.push('…');
    clipped
}

/// Display form of an optional text column
pub fn optional(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}
