//! CSV and Markdown serialization of table grids.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::Table;

/// Minimum padding between a header label and its column edge.
const HEADER_PADDING: usize = 2;

/// Outcome of a Markdown table rendering.
///
/// Rendering never fails outright: when a pipe table cannot represent the
/// grid, the rows are written as plain ` | `-joined lines instead and the
/// reason is kept so callers and tests can tell the two paths apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TableMarkdown {
    /// A pipe table with positional column headers.
    Rendered {
        /// Pipe table text
        text: String,
    },
    /// Plain rows, one per line.
    Fallback {
        /// Fallback text
        text: String,
        /// Why the pipe table was not produced
        reason: String,
    },
}

impl TableMarkdown {
    /// The Markdown text, whichever path produced it.
    pub fn text(&self) -> &str {
        match self {
            TableMarkdown::Rendered { text } => text,
            TableMarkdown::Fallback { text, .. } => text,
        }
    }

    /// Check whether the fallback path was taken.
    pub fn is_fallback(&self) -> bool {
        matches!(self, TableMarkdown::Fallback { .. })
    }

    /// Consume into the Markdown text.
    pub fn into_text(self) -> String {
        match self {
            TableMarkdown::Rendered { text } | TableMarkdown::Fallback { text, .. } => text,
        }
    }
}

/// Headerless CSV with `\n` line endings. Short rows are padded with empty cells.
pub fn table_to_csv(table: &Table) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for row in table.padded_rows() {
        writer.write_record(&row)?;
    }

    writer.into_inner().map_err(|e| Error::Csv(e.to_string()))
}

/// Render a table as Markdown, falling back to plain rows when needed.
pub fn table_to_markdown(table: &Table) -> TableMarkdown {
    match pipe_table(table) {
        Ok(text) => TableMarkdown::Rendered { text },
        Err(reason) => {
            log::debug!("Markdown table fallback: {}", reason);
            TableMarkdown::Fallback {
                text: plain_rows(table),
                reason,
            }
        }
    }
}

/// Rows joined by ` | `, one row per line.
pub fn plain_rows(table: &Table) -> String {
    table
        .rows
        .iter()
        .map(|row| row.join(" | "))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

/// Pipe table whose header row is the column positions `0..n`.
///
/// Columns where every non-empty cell is numeric are right-aligned.
fn pipe_table(table: &Table) -> std::result::Result<String, String> {
    let columns = table.column_count();
    if columns == 0 {
        return Err("table has no columns".to_string());
    }
    if table.rows.iter().flatten().any(|c| c.contains('\n') || c.contains('\r')) {
        return Err("cell contains a line break".to_string());
    }

    let rows: Vec<Vec<String>> = table
        .padded_rows()
        .into_iter()
        .map(|row| row.into_iter().map(|c| c.replace('|', "\\|")).collect())
        .collect();
    let headers: Vec<String> = (0..columns).map(|i| i.to_string()).collect();

    let aligns: Vec<Align> = (0..columns)
        .map(|col| {
            let mut cells = rows.iter().map(|r| r[col].trim()).filter(|c| !c.is_empty()).peekable();
            if cells.peek().is_some() && cells.all(|c| c.parse::<f64>().is_ok()) {
                Align::Right
            } else {
                Align::Left
            }
        })
        .collect();
    let widths: Vec<usize> = (0..columns)
        .map(|col| {
            rows.iter()
                .map(|r| r[col].chars().count())
                .chain(std::iter::once(headers[col].len() + HEADER_PADDING))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_row(&headers, &widths, &aligns));
    lines.push(format!(
        "|{}|",
        widths
            .iter()
            .zip(&aligns)
            .map(|(&w, &align)| match align {
                Align::Left => format!(":{}", "-".repeat(w + 1)),
                Align::Right => format!("{}:", "-".repeat(w + 1)),
            })
            .collect::<Vec<_>>()
            .join("|")
    ));
    for row in &rows {
        lines.push(format_row(row, &widths, &aligns));
    }
    Ok(lines.join("\n"))
}

fn format_row(cells: &[String], widths: &[usize], aligns: &[Align]) -> String {
    let cells: Vec<String> = cells
        .iter()
        .zip(widths.iter().zip(aligns))
        .map(|(cell, (&width, &align))| match align {
            Align::Left => format!(" {:<width$} ", cell, width = width),
            Align::Right => format!(" {:>width$} ", cell, width = width),
        })
        .collect();
    format!("|{}|", cells.join("|"))
}
