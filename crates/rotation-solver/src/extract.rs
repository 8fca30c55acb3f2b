//! Assignment Extractor
//!
//! Reads a solved model's `x` values and produces the month x intern ->
//! rotation matrix described in SPEC_FULL.md §4.3.

use rotation_core::{intern_labels, Assignment, Calendar, Rotation, RotationError};

use crate::materialize::RawSolution;

/// Builds the assignment matrix from a raw solution. Rows follow input intern
/// order; columns follow the fixed 12-month calendar.
///
/// Returns `RotationError::ExtractionAnomaly` if some intern-month has no
/// rotation with value 1 — the solver's feasibility guarantee should make
/// this impossible; it is retained as a defensive check.
pub fn extract(raw: &RawSolution, rotations: &[Rotation], num_interns: usize) -> Result<Assignment, RotationError> {
    let interns = intern_labels(num_interns);
    let months = Calendar::month_labels();
    let mut cells = Vec::with_capacity(num_interns);

    for (i, intern) in interns.iter().enumerate() {
        let mut row = Vec::with_capacity(Calendar::NUM_MONTHS);
        for (m, month) in months.iter().enumerate() {
            let rotation = (0..rotations.len())
                .find(|&r| raw.x[i][m][r] == 1)
                .map(|r| rotations[r].id.clone())
                .ok_or_else(|| RotationError::ExtractionAnomaly {
                    intern: intern.clone(),
                    month: month.clone(),
                })?;
            row.push(rotation);
        }
        cells.push(row);
    }

    Ok(Assignment { interns, months, cells })
}
