//! Catalog Loader (ambient)
//!
//! A minimal CSV reader for the rotation catalog schema of SPEC_FULL.md §6.
//! This stands in for the excluded "reading the input workbook" boundary: it
//! establishes the same `Rotation` schema without reproducing spreadsheet
//! concerns (styles, merged cells, template sheets).

use std::path::Path;

use rotation_core::{Rotation, RotationError};

const EXPECTED_HEADERS: [&str; 7] = [
    "id",
    "dept_group",
    "location_group",
    "staff_min",
    "staff_max",
    "month_min",
    "month_max",
];

/// Loads the rotation catalog from a CSV file with the fixed header row
/// `id,dept_group,location_group,staff_min,staff_max,month_min,month_max`.
/// Missing numeric cells are read as 0; negative bounds and malformed rows
/// are rejected before any solve is attempted.
pub fn load_catalog(path: &Path) -> Result<Vec<Rotation>, RotationError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| RotationError::MalformedCatalog(format!("unable to read catalog file: {e}")))?;

    {
        let headers = reader
            .headers()
            .map_err(|e| RotationError::MalformedCatalog(format!("missing header row: {e}")))?;
        let found: Vec<&str> = headers.iter().collect();
        if found != EXPECTED_HEADERS {
            return Err(RotationError::MalformedCatalog(format!(
                "expected columns {EXPECTED_HEADERS:?}, found {found:?}"
            )));
        }
    }

    let mut rotations = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let record = result.map_err(|e| RotationError::MalformedCatalog(format!("row {}: {e}", line + 2)))?;
        if record.len() != EXPECTED_HEADERS.len() {
            return Err(RotationError::MalformedCatalog(format!(
                "row {}: expected {} columns, found {}",
                line + 2,
                EXPECTED_HEADERS.len(),
                record.len()
            )));
        }

        let id = record[0].trim().to_string();
        if id.is_empty() {
            return Err(RotationError::MalformedCatalog(format!("row {}: id is empty", line + 2)));
        }
        let dept_group = record[1].trim().to_string();
        let location_group = record[2].trim().to_string();
        let staff_min = parse_nonneg(&record[3], &id, "staff_min", line)?;
        let staff_max = parse_nonneg(&record[4], &id, "staff_max", line)?;
        let month_min = parse_nonneg(&record[5], &id, "month_min", line)?;
        let month_max = parse_nonneg(&record[6], &id, "month_max", line)?;

        rotations.push(Rotation::new(
            id,
            dept_group,
            location_group,
            staff_min,
            staff_max,
            month_min,
            month_max,
        ));
    }

    if rotations.is_empty() {
        return Err(RotationError::MalformedCatalog("catalog has no rotation rows".to_string()));
    }

    Ok(rotations)
}

fn parse_nonneg(cell: &str, rotation_id: &str, field: &str, line: usize) -> Result<u32, RotationError> {
    let cell = cell.trim();
    if cell.is_empty() {
        // "Missing numeric cells are read as 0" (SPEC_FULL.md §6).
        return Ok(0);
    }
    let value: i64 = cell.parse().map_err(|_| {
        RotationError::MalformedCatalog(format!(
            "row {} ({rotation_id}): {field} is not a number: {cell:?}",
            line + 2
        ))
    })?;
    if value < 0 {
        return Err(RotationError::MalformedCatalog(format!(
            "row {} ({rotation_id}): {field} must be non-negative, got {value}",
            line + 2
        )));
    }
    Ok(value as u32)
}

/// Validates the externally-supplied intern count.
pub fn validate_worker_count(w: i64) -> Result<usize, RotationError> {
    if w <= 0 {
        return Err(RotationError::MalformedCatalog(format!(
            "worker count must be positive, got {w}"
        )));
    }
    Ok(w as usize)
}
