//! Summarizer
//!
//! Computes the two aggregate views over a solved assignment matrix:
//! per-intern rotation counts, and per-month rotation counts. Both are
//! complete grids — rotations/months that never appear for a row still get
//! a zero cell — per SPEC_FULL.md §4.4.

use std::collections::HashMap;

use rotation_core::{Assignment, InternCounts, MonthCounts, Rotation};

/// Per-intern x rotation month counts, columns in catalog order.
pub fn per_intern_counts(assignment: &Assignment, rotations: &[Rotation]) -> InternCounts {
    let rotation_ids: Vec<String> = rotations.iter().map(|r| r.id.clone()).collect();
    let index: HashMap<&str, usize> = rotation_ids
        .iter()
        .enumerate()
        .map(|(i, id)| (id.as_str(), i))
        .collect();

    let counts = assignment
        .cells
        .iter()
        .map(|row| {
            let mut counts = vec![0u32; rotation_ids.len()];
            for rotation_id in row {
                if let Some(&idx) = index.get(rotation_id.as_str()) {
                    counts[idx] += 1;
                }
            }
            counts
        })
        .collect();

    InternCounts {
        interns: assignment.interns.clone(),
        rotations: rotation_ids,
        counts,
    }
}

/// Per-rotation x month intern counts, rows in catalog order.
pub fn per_month_counts(assignment: &Assignment, rotations: &[Rotation]) -> MonthCounts {
    let rotation_ids: Vec<String> = rotations.iter().map(|r| r.id.clone()).collect();
    let index: HashMap<&str, usize> = rotation_ids
        .iter()
        .enumerate()
        .map(|(i, id)| (id.as_str(), i))
        .collect();

    let mut counts = vec![vec![0u32; assignment.months.len()]; rotation_ids.len()];
    for row in &assignment.cells {
        for (m, rotation_id) in row.iter().enumerate() {
            if let Some(&idx) = index.get(rotation_id.as_str()) {
                counts[idx][m] += 1;
            }
        }
    }

    MonthCounts {
        rotations: rotation_ids,
        months: assignment.months.clone(),
        counts,
    }
}
