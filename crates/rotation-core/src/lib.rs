//! # rotation-core
//!
//! Core domain model and error types for the intern rotation scheduling engine.
//!
//! This crate provides:
//! - The `Rotation` catalog record and its derived grouping/location predicates
//! - The fixed 12-month calendar and intern identifiers
//! - `SolveConfig`, the tunable knobs of the constraint model (external cap, big-M, time budget)
//! - Output schemas: `Assignment`, `InternCounts`, `MonthCounts`
//! - `RotationError`, the single error type returned across the pipeline
//!
//! ## Example
//!
//! ```rust
//! use rotation_core::{Rotation, Calendar};
//!
//! let r = Rotation::new("ER", "A", "main", 0, 12, 1, 3);
//! assert_eq!(r.group_key(), "ER");
//! assert!(!r.is_out());
//! assert_eq!(Calendar::month_label(0), "1월");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Rotation catalog
// ============================================================================

/// The literal `dept_group` sentinel meaning "this rotation is its own quota group".
pub const UNGROUPED_DEPT: &str = "A";

/// The `location_group` literal naming the primary external hospital.
pub const PRIMARY_EXTERNAL: &str = "out1";

/// The `location_group` literal naming internal rotations.
pub const MAIN_LOCATION: &str = "main";

/// A rotation slot: a clinical assignment tied to a work-site group and a quota group.
///
/// Mirrors the catalog columns in order: `id`, `dept_group`, `location_group`,
/// `staff_min`, `staff_max`, `month_min`, `month_max`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rotation {
    /// Unique identifier (the "구분" value).
    pub id: String,
    /// `A` means ungrouped; any other value names a shared quota group.
    pub dept_group: String,
    /// `main`, `out1`, or any `out`-prefixed secondary external.
    pub location_group: String,
    /// Lower bound on total months an intern may spend in this rotation's quota group.
    pub staff_min: u32,
    /// Upper bound on total months an intern may spend in this rotation's quota group.
    pub staff_max: u32,
    /// Lower bound on interns assigned to this rotation in a single month.
    pub month_min: u32,
    /// Upper bound on interns assigned to this rotation in a single month.
    pub month_max: u32,
}

impl Rotation {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        dept_group: impl Into<String>,
        location_group: impl Into<String>,
        staff_min: u32,
        staff_max: u32,
        month_min: u32,
        month_max: u32,
    ) -> Self {
        Self {
            id: id.into(),
            dept_group: dept_group.into(),
            location_group: location_group.into(),
            staff_min,
            staff_max,
            month_min,
            month_max,
        }
    }

    /// The quota-group key: the rotation's own id when ungrouped, else `dept_group`.
    pub fn group_key(&self) -> &str {
        if self.dept_group == UNGROUPED_DEPT {
            &self.id
        } else {
            &self.dept_group
        }
    }

    /// True for `location_group` values with the `out` prefix (any external placement).
    pub fn is_out(&self) -> bool {
        self.location_group.starts_with("out")
    }

    /// True for the primary external hospital (`out1`).
    pub fn is_out1(&self) -> bool {
        self.location_group == PRIMARY_EXTERNAL
    }

    /// True for internal rotations (`main`).
    pub fn is_main(&self) -> bool {
        self.location_group == MAIN_LOCATION
    }
}

/// Builds the quota-group map (group key -> member rotation indices), preserving
/// the order in which each group key first appears in the catalog, per the
/// grouping-key trick in the design notes: `dept_group = A` rotations form
/// singleton groups keyed on their own id, everything else aggregates under the
/// shared `dept_group` string. The builder's iteration order over groups must
/// match catalog insertion order, not lexical order, so this returns a `Vec`
/// rather than a sorted map.
pub fn group_map_ordered(rotations: &[Rotation]) -> Vec<(String, Vec<usize>)> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: Vec<(String, Vec<usize>)> = Vec::new();
    for (idx, r) in rotations.iter().enumerate() {
        let key = r.group_key().to_string();
        match order.iter().position(|k| k == &key) {
            Some(pos) => groups[pos].1.push(idx),
            None => {
                order.push(key.clone());
                groups.push((key, vec![idx]));
            }
        }
    }
    groups
}

// ============================================================================
// Calendar & interns
// ============================================================================

/// The fixed 12-month calendar used by every solve.
pub struct Calendar;

impl Calendar {
    pub const NUM_MONTHS: usize = 12;

    /// Month label for 0-based index `idx` (0 -> "1월", 11 -> "12월").
    pub fn month_label(idx: usize) -> String {
        format!("{}월", idx + 1)
    }

    /// All 12 month labels, in order.
    pub fn month_labels() -> Vec<String> {
        (0..Self::NUM_MONTHS).map(Self::month_label).collect()
    }
}

/// Stable identifier for an intern, `Worker_{n}` (1-based), matching the source's convention.
pub fn intern_label(idx: usize) -> String {
    format!("Worker_{}", idx + 1)
}

/// All intern labels for an intern count `w`, in order.
pub fn intern_labels(w: usize) -> Vec<String> {
    (0..w).map(intern_label).collect()
}

// ============================================================================
// Solve configuration
// ============================================================================

/// Tunable knobs of the constraint model. Defaults match the source program.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolveConfig {
    /// Per-intern upper bound on total months spent in any external placement.
    pub external_cap: u32,
    /// Big-M constant for the `out1` exclusivity constraint. Any value >= 12 is safe.
    pub big_m: i32,
    /// Wall-clock budget handed to the solver on each solve, including each
    /// diagnostic bisection step.
    pub solver_time_budget_ms: u64,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            external_cap: 3,
            big_m: 100,
            solver_time_budget_ms: 30_000,
        }
    }
}

// ============================================================================
// Output schemas
// ============================================================================

/// The solved month x intern -> rotation matrix. Rows follow input intern order,
/// columns follow the fixed 12-month calendar.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub interns: Vec<String>,
    pub months: Vec<String>,
    /// `cells[i][m]` is the rotation id assigned to intern `i` in month `m`.
    pub cells: Vec<Vec<String>>,
}

impl Assignment {
    pub fn rotation_at(&self, intern_idx: usize, month_idx: usize) -> &str {
        &self.cells[intern_idx][month_idx]
    }
}

/// Per-intern x rotation month counts. Complete grid, zero-filled for unused rotations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternCounts {
    pub interns: Vec<String>,
    pub rotations: Vec<String>,
    /// `counts[i][r]` = months intern `i` spent in rotation `r`.
    pub counts: Vec<Vec<u32>>,
}

/// Per-rotation x month intern counts. Complete grid, zero-filled for unused months.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthCounts {
    pub rotations: Vec<String>,
    pub months: Vec<String>,
    /// `counts[r][m]` = interns assigned to rotation `r` in month `m`.
    pub counts: Vec<Vec<u32>>,
}

// ============================================================================
// Errors
// ============================================================================

/// Errors surfaced across the catalog-loading, solving, and extraction pipeline.
///
/// Every error is captured into a single error-log field on the result object;
/// no exceptions escape the core.
#[derive(Debug, Error)]
pub enum RotationError {
    #[error("입력 오류: {0}")]
    MalformedCatalog(String),

    #[error("충돌 규칙: {0}")]
    Infeasible(String),

    #[error("제약조건 간의 복합적인 충돌로 특정 원인을 찾을 수 없습니다.")]
    InfeasibleUnresolved,

    #[error("최적화 실패: {0} (데이터가 너무 복잡하거나 제약이 너무 많습니다.)")]
    SolverFailure(String),

    #[error("최적해를 찾았으나 배정 데이터가 생성되지 않았습니다 (모델 설정 오류): intern={intern}, month={month}")]
    ExtractionAnomaly { intern: String, month: String },
}
