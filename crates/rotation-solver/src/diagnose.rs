//! Infeasibility Diagnoser
//!
//! Runs only on an `Infeasible` status. Performs a bisection over the ordered
//! constraint list to locate the smallest prefix `[0..=k]` that is infeasible,
//! and reports constraint `k`'s name as the culprit. See SPEC_FULL.md §4.5 for
//! the rationale: this is not a minimal unsatisfiable subset, but it is
//! deterministic, `O(log n)` solves, and maps directly to the most-recently
//! violated named policy thanks to the builder's ordering discipline.

use rotation_core::RotationError;
use tracing::debug;

use crate::materialize::{solve_prefix, SolveStatus};
use crate::model::NamedConstraint;

/// Runs the bisection and returns the culprit error, or `InfeasibleUnresolved`
/// if bisection narrows to nothing (the conflict is fundamentally combinatorial).
pub fn diagnose(
    constraints: &[NamedConstraint],
    num_interns: usize,
    num_rotations: usize,
    num_starts: usize,
    time_budget_ms: u64,
) -> RotationError {
    let mut lo = 0usize;
    let mut hi = constraints.len().saturating_sub(1);
    let mut culprit: Option<usize> = None;

    while lo <= hi {
        let mid = lo + (hi - lo) / 2;
        let prefix = &constraints[..=mid];
        let (status, _) = solve_prefix(num_interns, num_rotations, num_starts, prefix, time_budget_ms, false);
        debug!(mid, prefix_len = prefix.len(), ?status, "diagnostic bisection step");

        if status == SolveStatus::Infeasible {
            culprit = Some(mid);
            if mid == 0 {
                break;
            }
            hi = mid - 1;
        } else {
            lo = mid + 1;
        }
    }

    match culprit {
        Some(idx) => RotationError::Infeasible(constraints[idx].name.clone()),
        None => RotationError::InfeasibleUnresolved,
    }
}
