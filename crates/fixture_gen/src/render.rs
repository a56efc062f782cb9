//! MySQL rendering of segments.
//!
//! A segment file is a header, one multi-row `INSERT` per batch (batches
//! separated by a blank line), and a footer. The header carries the seed but
//! no wall-clock time, so identical runs render identical bytes.

use crate::row::{Row, Table};
use crate::sink::Segment;
use std::fmt::Write;

/// Segment preamble: session settings for bulk loading, then the optional truncate
pub fn segment_header(segment: Segment, seed: u64) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "-- Fixture data for {}", segment.label());
    let _ = writeln!(out, "-- Seed: {}", seed);
    out.push('\n');
    out.push_str("SET FOREIGN_KEY_CHECKS = 0;\n");
    out.push_str("SET UNIQUE_CHECKS = 0;\n");
    out.push_str("SET AUTOCOMMIT = 0;\n");
    out.push_str("SET SQL_LOG_BIN = 0;\n");
    out.push('\n');
    if segment.truncates() {
        out.push_str("-- Clear existing data\n");
        let _ = writeln!(out, "TRUNCATE TABLE {};", segment.table().name());
        out.push('\n');
    }
    out
}

pub fn segment_footer() -> &'static str {
    "\nCOMMIT;\n\
     SET FOREIGN_KEY_CHECKS = 1;\n\
     SET UNIQUE_CHECKS = 1;\n\
     SET AUTOCOMMIT = 1;\n\
     SET SQL_LOG_BIN = 1;\n"
}

/// `INSERT INTO table (cols) VALUES` line, without a trailing newline
pub fn insert_prefix(table: Table) -> String {
    format!(
        "INSERT INTO {} ({}) VALUES",
        table.name(),
        table.columns().join(", ")
    )
}

/// Render one row as `(v1, v2, ...)`
pub fn render_row(row: &Row) -> String {
    let mut out = String::with_capacity(row.len() * 16);
    out.push('(');
    for (i, value) in row.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&value.to_mysql());
    }
    out.push(')');
    out
}

/// Render a batch as one statement terminated by `;` and a newline.
/// Returns an empty string for an empty batch.
pub fn render_insert(table: Table, rows: &[Row]) -> String {
    if rows.is_empty() {
        return String::new();
    }
    let mut out = insert_prefix(table);
    out.push('\n');
    for (i, row) in rows.iter().enumerate() {
        out.push_str(&render_row(row));
        out.push_str(if i + 1 < rows.len() { ",\n" } else { ";\n" });
    }
    out
}
