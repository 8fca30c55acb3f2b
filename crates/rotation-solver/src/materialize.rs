//! Solver Driver
//!
//! Binds a (prefix of a) pure constraint list to a fresh solver instance and
//! runs it. This is the single place logical `Var` references become
//! concrete solver variables, matching the re-architecture guidance: the
//! builder never touches a solver, and the diagnoser re-materializes
//! arbitrary prefixes without re-running the builder.

use std::time::Duration;

use pumpkin_solver::constraints as cp;
use pumpkin_solver::optimisation::linear_sat_unsat::LinearSatUnsat;
use pumpkin_solver::optimisation::OptimisationDirection;
use pumpkin_solver::results::{OptimisationResult, ProblemSolution};
use pumpkin_solver::termination::TimeBudget;
use pumpkin_solver::variables::{DomainId, TransformableVariable};
use pumpkin_solver::Solver;
use rotation_core::Calendar;

use crate::model::{NamedConstraint, RelOp, Var};

/// The outcome of submitting a model (or a prefix of one) to the solver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Other(String),
}

/// Raw 0/1 solution values for the `x` family, `[intern][month][rotation]`.
/// Only produced when extraction was requested and the status is `Optimal`.
pub struct RawSolution {
    pub x: Vec<Vec<Vec<i32>>>,
}

struct VarGrids {
    x: Vec<Vec<Vec<DomainId>>>,
    y: Vec<Vec<DomainId>>,
}

impl VarGrids {
    fn new(solver: &mut Solver, num_interns: usize, num_rotations: usize, num_starts: usize) -> Self {
        let x = (0..num_interns)
            .map(|_| {
                (0..Calendar::NUM_MONTHS)
                    .map(|_| (0..num_rotations).map(|_| solver.new_bounded_integer(0, 1)).collect())
                    .collect()
            })
            .collect();
        let y = (0..num_interns)
            .map(|_| (0..num_starts).map(|_| solver.new_bounded_integer(0, 1)).collect())
            .collect();
        Self { x, y }
    }

    fn lookup(&self, var: Var) -> DomainId {
        match var {
            Var::X(i, m, r) => self.x[i][m][r],
            Var::Y(i, m) => self.y[i][m],
        }
    }
}

/// Materializes the given constraint prefix against a fresh solver, solves it
/// with the constant zero objective described in the spec, and reports the
/// status. When `extract` is true and the status is `Optimal`, also reads
/// back the `x` family as a `RawSolution`.
pub(crate) fn solve_prefix(
    num_interns: usize,
    num_rotations: usize,
    num_starts: usize,
    prefix: &[NamedConstraint],
    time_budget_ms: u64,
    extract: bool,
) -> (SolveStatus, Option<RawSolution>) {
    let mut solver = Solver::default();
    let grids = VarGrids::new(&mut solver, num_interns, num_rotations, num_starts);
    let objective = solver.new_bounded_integer(0, 0);
    let tag = solver.new_constraint_tag();

    for c in prefix {
        let vars: Vec<_> = c
            .terms
            .iter()
            .map(|(v, coef)| grids.lookup(*v).scaled(*coef))
            .collect();
        let posted = match c.op {
            RelOp::Eq => solver.add_constraint(cp::equals(vars, c.rhs, tag)).post(),
            RelOp::Le => solver.add_constraint(cp::less_than_or_equals(vars, c.rhs, tag)).post(),
            RelOp::Ge => solver.add_constraint(cp::greater_than_or_equals(vars, c.rhs, tag)).post(),
        };
        if posted.is_err() {
            // Posting can fail only when the solver has already detected root-level
            // infeasibility from an earlier constraint in this same prefix.
            return (SolveStatus::Infeasible, None);
        }
    }

    let mut brancher = solver.default_brancher();
    let mut termination = TimeBudget::starting_now(Duration::from_millis(time_budget_ms));

    fn noop_callback<B>(_: &Solver, _: pumpkin_solver::results::SolutionReference, _: &B) {}
    let result = solver.optimise(
        &mut brancher,
        &mut termination,
        LinearSatUnsat::new(OptimisationDirection::Minimise, objective, noop_callback),
    );

    match result {
        OptimisationResult::Optimal(solution) => {
            let raw = extract.then(|| {
                read_solution(&grids, num_interns, num_rotations, |v| {
                    solution.get_integer_value(v) as i32
                })
            });
            (SolveStatus::Optimal, raw)
        }
        OptimisationResult::Satisfiable(solution) => {
            let raw = extract.then(|| {
                read_solution(&grids, num_interns, num_rotations, |v| {
                    solution.get_integer_value(v) as i32
                })
            });
            (SolveStatus::Optimal, raw)
        }
        OptimisationResult::Unsatisfiable => (SolveStatus::Infeasible, None),
        OptimisationResult::Unknown => (SolveStatus::Other("solver time budget exhausted".to_string()), None),
    }
}

fn read_solution(
    grids: &VarGrids,
    num_interns: usize,
    num_rotations: usize,
    get: impl Fn(DomainId) -> i32,
) -> RawSolution {
    let x = (0..num_interns)
        .map(|i| {
            (0..Calendar::NUM_MONTHS)
                .map(|m| (0..num_rotations).map(|r| get(grids.x[i][m][r])).collect())
                .collect()
        })
        .collect();
    RawSolution { x }
}
