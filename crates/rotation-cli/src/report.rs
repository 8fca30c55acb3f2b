//! Report Emitter (ambient)
//!
//! Renders the assignment matrix and summaries as JSON or a plain-text grid.
//! This stands in for the excluded "emitting a styled output workbook"
//! boundary: no cell styling, column widths, or spreadsheet formulas.

use rotation_core::{Assignment, InternCounts, MonthCounts};
use serde::Serialize;

#[derive(Serialize)]
pub struct Report<'a> {
    pub assignment: &'a Assignment,
    pub per_intern_counts: &'a InternCounts,
    pub per_month_counts: &'a MonthCounts,
}

/// Pretty-printed JSON rendering, suitable for machine consumption.
pub fn render_json(report: &Report) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// Aligned plain-text rendering of the assignment matrix, suitable for a terminal.
pub fn render_text(assignment: &Assignment) -> String {
    let width = assignment
        .months
        .iter()
        .map(|m| m.chars().count())
        .max()
        .unwrap_or(4)
        .max(6);

    let mut out = String::new();
    out.push_str(&format!("{:<12}", "Intern"));
    for month in &assignment.months {
        out.push_str(&format!("{month:>width$} "));
    }
    out.push('\n');

    for (i, intern) in assignment.interns.iter().enumerate() {
        out.push_str(&format!("{intern:<12}"));
        for cell in &assignment.cells[i] {
            out.push_str(&format!("{cell:>width$} "));
        }
        out.push('\n');
    }

    out
}
