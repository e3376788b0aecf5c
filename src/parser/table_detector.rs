//! Table detection from text positions (stream mode).
//!
//! Tables are found without ruling lines: spans are grouped into rows by
//! baseline, column edges are taken from left edges that line up across
//! rows, and runs of consecutive well-aligned rows become tables.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::model::Table;

use super::layout::TextSpan;

/// Width of the buckets left edges are snapped to (points).
const EDGE_BUCKET: f32 = 5.0;

/// Distance from a column edge that still counts as aligned (points).
const ALIGN_TOLERANCE: f32 = 5.0;

/// Slack allowed for spans starting slightly left of their column (points).
const COLUMN_SLACK: f32 = 10.0;

/// A detected table region with its content.
#[derive(Debug, Clone)]
pub struct DetectedTable {
    /// Baseline of the first row
    pub top_y: f32,
    /// Baseline of the last row
    pub bottom_y: f32,
    /// Left X boundary
    pub left_x: f32,
    /// Right X boundary
    pub right_x: f32,
    /// Column left edges (X coordinates), ascending
    pub columns: Vec<f32>,
    /// Rows of text spans, top to bottom
    pub rows: Vec<SpanRow>,
}

impl DetectedTable {
    /// Convert to a cell grid. Spans sharing a cell are joined with a space.
    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        for row in &self.rows {
            let mut cells: Vec<Vec<&str>> = vec![Vec::new(); self.columns.len()];
            for span in &row.spans {
                let column = column_for(span.x, &self.columns, self.right_x);
                if let Some(cell) = cells.get_mut(column) {
                    cell.push(span.text.trim());
                }
            }
            table.add_row(cells.into_iter().map(|parts| parts.join(" ")).collect());
        }
        table
    }
}

/// A row of text spans sharing a baseline.
#[derive(Debug, Clone)]
pub struct SpanRow {
    /// Average baseline of the spans
    pub y: f32,
    /// Spans in this row, sorted by X
    pub spans: Vec<TextSpan>,
}

/// Table detector configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDetectorConfig {
    /// Minimum number of rows to consider as table
    pub min_rows: usize,
    /// Minimum number of columns to consider as table
    pub min_columns: usize,
    /// Optional cap on columns; regions wider than this are skipped
    pub max_columns: Option<usize>,
    /// Y tolerance for grouping spans into rows (fraction of font size)
    pub y_tolerance_factor: f32,
    /// Minimum column alignment ratio (0.0-1.0)
    pub min_alignment_ratio: f32,
    /// Minimum gap between columns (points)
    pub min_column_gap: f32,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_columns: 2,
            max_columns: None,
            y_tolerance_factor: 0.4,
            min_alignment_ratio: 0.3,
            min_column_gap: 15.0,
        }
    }
}

/// Detects tables in a list of text spans.
#[derive(Debug, Clone, Default)]
pub struct TableDetector {
    config: TableDetectorConfig,
}

impl TableDetector {
    /// Create a new table detector with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new table detector with custom configuration.
    pub fn with_config(config: TableDetectorConfig) -> Self {
        Self { config }
    }

    /// Current configuration.
    pub fn config(&self) -> &TableDetectorConfig {
        &self.config
    }

    /// Detect tables in the spans of one page, top to bottom.
    pub fn detect(&self, spans: &[TextSpan]) -> Vec<DetectedTable> {
        let cfg = &self.config;
        if spans.len() < cfg.min_rows * cfg.min_columns {
            log::debug!("TableDetector: only {} spans", spans.len());
            return Vec::new();
        }

        let rows = self.group_into_rows(spans);
        if rows.len() < cfg.min_rows {
            log::debug!("TableDetector: only {} rows", rows.len());
            return Vec::new();
        }

        let columns = self.column_edges(&rows);
        log::debug!(
            "TableDetector: {} rows, page column edges {:?}",
            rows.len(),
            columns
        );
        if columns.len() < cfg.min_columns {
            return Vec::new();
        }

        let mut tables = Vec::new();
        for (start, end) in self.find_regions(&rows, &columns) {
            let region = &rows[start..=end];

            // Edges are re-derived per region; page-wide edges mix tables.
            let region_columns = self.column_edges(region);
            if region_columns.len() < cfg.min_columns {
                continue;
            }
            if cfg.max_columns.is_some_and(|max| region_columns.len() > max) {
                log::debug!(
                    "TableDetector: skipping rows {}..={}: {} columns",
                    start,
                    end,
                    region_columns.len()
                );
                continue;
            }
            if is_list_pattern(region, &region_columns) {
                log::debug!("TableDetector: skipping rows {}..={}: list", start, end);
                continue;
            }

            let all_spans = || region.iter().flat_map(|r| r.spans.iter());
            tables.push(DetectedTable {
                top_y: region[0].y,
                bottom_y: region[region.len() - 1].y,
                left_x: all_spans().map(|s| s.x).fold(f32::INFINITY, f32::min),
                right_x: all_spans().map(TextSpan::right).fold(f32::NEG_INFINITY, f32::max),
                columns: region_columns,
                rows: region.to_vec(),
            });
        }

        log::debug!("TableDetector: {} table(s)", tables.len());
        tables
    }

    /// Detect tables and convert them straight to cell grids.
    pub fn detect_tables(&self, spans: &[TextSpan]) -> Vec<Table> {
        self.detect(spans).iter().map(DetectedTable::to_table).collect()
    }

    /// Group spans into rows by baseline, top of the page first.
    fn group_into_rows(&self, spans: &[TextSpan]) -> Vec<SpanRow> {
        let mut sorted = spans.to_vec();
        sorted.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

        let mut rows: Vec<SpanRow> = Vec::new();
        let mut current: Vec<TextSpan> = Vec::new();
        let mut anchor_y = f32::NAN;

        for span in sorted {
            let tolerance = span.font_size * self.config.y_tolerance_factor;
            if current.is_empty() || (span.y - anchor_y).abs() <= tolerance {
                if current.is_empty() {
                    anchor_y = span.y;
                }
                current.push(span);
            } else {
                rows.push(finish_row(std::mem::take(&mut current)));
                anchor_y = span.y;
                current.push(span);
            }
        }
        if !current.is_empty() {
            rows.push(finish_row(current));
        }

        rows
    }

    /// Left edges shared by enough rows, merged when closer than the column gap.
    ///
    /// Rows with a single span are ignored when enough multi-span rows exist,
    /// since titles and paragraphs would otherwise contribute edges.
    fn column_edges(&self, rows: &[SpanRow]) -> Vec<f32> {
        let multi: Vec<&SpanRow> = rows.iter().filter(|r| r.spans.len() >= 2).collect();
        let (sample, once_per_row): (Vec<&SpanRow>, bool) = if multi.len() >= self.config.min_rows {
            (multi, true)
        } else {
            (rows.iter().collect(), false)
        };
        if sample.is_empty() {
            return Vec::new();
        }

        let mut counts: HashMap<i32, usize> = HashMap::new();
        for row in &sample {
            let buckets = row.spans.iter().map(|s| (s.x / EDGE_BUCKET).round() as i32);
            if once_per_row {
                for bucket in buckets.collect::<HashSet<_>>() {
                    *counts.entry(bucket).or_insert(0) += 1;
                }
            } else {
                for bucket in buckets {
                    *counts.entry(bucket).or_insert(0) += 1;
                }
            }
        }

        let min_hits = ((sample.len() as f32 * self.config.min_alignment_ratio) as usize).max(2);
        let mut edges: Vec<f32> = counts
            .into_iter()
            .filter(|&(_, n)| n >= min_hits)
            .map(|(bucket, _)| bucket as f32 * EDGE_BUCKET)
            .collect();
        edges.sort_by(f32::total_cmp);

        let mut merged: Vec<f32> = Vec::with_capacity(edges.len());
        for edge in edges {
            match merged.last() {
                Some(&last) if edge - last < self.config.min_column_gap => {}
                _ => merged.push(edge),
            }
        }
        merged
    }

    /// Runs of consecutive aligned rows at least `min_rows` long (inclusive bounds).
    fn find_regions(&self, rows: &[SpanRow], columns: &[f32]) -> Vec<(usize, usize)> {
        let mut regions = Vec::new();
        let mut start: Option<usize> = None;

        for (i, row) in rows.iter().enumerate() {
            if alignment_score(row, columns) >= self.config.min_alignment_ratio {
                start.get_or_insert(i);
            } else if let Some(s) = start.take() {
                if i - s >= self.config.min_rows {
                    regions.push((s, i - 1));
                }
            }
        }
        if let Some(s) = start {
            if rows.len() - s >= self.config.min_rows {
                regions.push((s, rows.len() - 1));
            }
        }

        regions
    }
}

fn finish_row(mut spans: Vec<TextSpan>) -> SpanRow {
    spans.sort_by(|a, b| a.x.total_cmp(&b.x));
    let y = spans.iter().map(|s| s.y).sum::<f32>() / spans.len() as f32;
    SpanRow { y, spans }
}

/// Fraction of a row's spans that start on a column edge.
fn alignment_score(row: &SpanRow, columns: &[f32]) -> f32 {
    if row.spans.is_empty() || columns.is_empty() {
        return 0.0;
    }
    let aligned = row
        .spans
        .iter()
        .filter(|s| columns.iter().any(|c| (s.x - c).abs() <= ALIGN_TOLERANCE))
        .count();
    aligned as f32 / row.spans.len() as f32
}

/// Index of the column a span starting at `x` falls into.
fn column_for(x: f32, columns: &[f32], right_x: f32) -> usize {
    for (i, &start) in columns.iter().enumerate() {
        let end = columns.get(i + 1).copied().unwrap_or(right_x + 100.0);
        if x >= start - COLUMN_SLACK && x < end - COLUMN_SLACK {
            return i;
        }
    }

    columns
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| (x - *a).abs().total_cmp(&(x - *b).abs()))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Check if the rows are really a bulleted or numbered list.
///
/// A list item's marker and text often land in separate spans at fixed
/// offsets, which looks like a two-column table.
fn is_list_pattern(rows: &[SpanRow], columns: &[f32]) -> bool {
    if columns.len() < 2 || rows.is_empty() {
        return false;
    }

    let mut bullets = 0;
    let mut numbers = 0;
    for row in rows {
        let first = row.spans.iter().min_by(|a, b| a.x.total_cmp(&b.x));
        if let Some(span) = first {
            let text = span.text.trim();
            if is_bullet_marker(text) {
                bullets += 1;
            } else if is_number_marker(text) {
                numbers += 1;
            }
        }
    }

    let total = rows.len() as f32;
    // Numbered first columns are common in real tables, so numbers only
    // disqualify two-column regions.
    bullets as f32 / total >= 0.5 || (columns.len() == 2 && (bullets + numbers) as f32 / total >= 0.5)
}

/// Check if text is a bullet marker (•, -, etc.).
fn is_bullet_marker(text: &str) -> bool {
    matches!(
        text.trim(),
        "-" | "–" | "—" | "•" | "·" | "*" | "○" | "▪" | "◦" | "▸" | "▹" | "►" | "■" | "●" | "□" | "◆" | "◇" | "▶" | "▷" | "➤"
    )
}

/// Check if text is a number-style list marker (1., 2), a., 7).
fn is_number_marker(text: &str) -> bool {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return false;
    }
    if cleaned.parse::<u32>().is_ok() {
        return true;
    }

    let head = match cleaned.strip_suffix(|c| c == '.' || c == ')') {
        Some(head) => head,
        None => return false,
    };
    let mut chars = head.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_alphabetic() => true,
        _ => !head.is_empty() && head.chars().all(|c| c.is_ascii_digit()),
    }
}
