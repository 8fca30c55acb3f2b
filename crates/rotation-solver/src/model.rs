//! Model Builder
//!
//! Converts a rotation catalog and an intern count into a pure data
//! representation of the constraint system: the decision-variable family
//! (`x`, `y`, referenced only by logical index), and an ordered list of
//! named linear constraints.
//!
//! Nothing here touches a solver instance. Binding these logical references
//! to concrete solver variables happens once, in `materialize`, so the
//! diagnoser can re-materialize arbitrary prefixes of the same list without
//! rebuilding it (see the re-architecture guidance this crate follows).

use rotation_core::{group_map_ordered, intern_label, Calendar, Rotation, SolveConfig};

/// A logical decision-variable reference, independent of any solver instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Var {
    /// `x[intern, month, rotation]`
    X(usize, usize, usize),
    /// `y[intern, start_month]`, `start_month` in `0..11`.
    Y(usize, usize),
}

/// The relation of a linear constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelOp {
    Eq,
    Le,
    Ge,
}

/// A single named linear constraint: `sum(coef * var) <op> rhs`.
#[derive(Clone, Debug)]
pub struct NamedConstraint {
    pub name: String,
    pub terms: Vec<(Var, i32)>,
    pub op: RelOp,
    pub rhs: i32,
}

impl NamedConstraint {
    fn new(name: String, terms: Vec<(Var, i32)>, op: RelOp, rhs: i32) -> Self {
        Self { name, terms, op, rhs }
    }
}

/// The pure constraint-programming model: catalog, intern count, config, and
/// the ordered constraint list. No solver variables exist yet.
pub struct Model {
    pub rotations: Vec<Rotation>,
    pub num_interns: usize,
    pub config: SolveConfig,
    pub constraints: Vec<NamedConstraint>,
}

/// The number of feasible `out1` block-start indices for a 12-month calendar.
const NUM_STARTS: usize = Calendar::NUM_MONTHS - 1;

/// Distinct `location_group` values, in first-appearance catalog order.
fn distinct_locations_in_order(rotations: &[Rotation]) -> Vec<String> {
    let mut seen = Vec::new();
    for r in rotations {
        if !seen.contains(&r.location_group) {
            seen.push(r.location_group.clone());
        }
    }
    seen
}

/// Builds the ordered constraint list for the given catalog, intern count, and
/// config. See SPEC_FULL.md §4.1 for the ordering discipline this follows.
pub fn build(rotations: Vec<Rotation>, num_interns: usize, config: SolveConfig) -> Model {
    let mut constraints = Vec::new();
    let num_rotations = rotations.len();
    let month_labels = Calendar::month_labels();

    // (1) One rotation per intern per month.
    for e in 0..num_interns {
        for m in 0..Calendar::NUM_MONTHS {
            let terms = (0..num_rotations).map(|r| (Var::X(e, m, r), 1)).collect();
            constraints.push(NamedConstraint::new(
                format!(
                    "Assignment_1Dept_Per_Month_{}_{}",
                    intern_label(e),
                    month_labels[m]
                ),
                terms,
                RelOp::Eq,
                1,
            ));
        }
    }

    // (2) Monthly capacity, min then max, iterated rotation then month.
    for (r, rotation) in rotations.iter().enumerate() {
        for m in 0..Calendar::NUM_MONTHS {
            let terms: Vec<_> = (0..num_interns).map(|e| (Var::X(e, m, r), 1)).collect();
            constraints.push(NamedConstraint::new(
                format!("Dept_Capacity_Min_{}_{}", rotation.id, month_labels[m]),
                terms.clone(),
                RelOp::Ge,
                rotation.month_min as i32,
            ));
            constraints.push(NamedConstraint::new(
                format!("Dept_Capacity_Max_{}_{}", rotation.id, month_labels[m]),
                terms,
                RelOp::Le,
                rotation.month_max as i32,
            ));
        }
    }

    // (3) Grouped per-intern quotas, iterated intern then group key
    //     (group-key order is catalog insertion order).
    let groups = group_map_ordered(&rotations);
    for e in 0..num_interns {
        for (group_key, members) in &groups {
            let min_i: i32 = members.iter().map(|&r| rotations[r].staff_min as i32).sum();
            let max_i: i32 = members.iter().map(|&r| rotations[r].staff_max as i32).sum();
            let terms: Vec<_> = members
                .iter()
                .flat_map(|&r| (0..Calendar::NUM_MONTHS).map(move |m| (Var::X(e, m, r), 1)))
                .collect();
            constraints.push(NamedConstraint::new(
                format!("Worker_Group_Min_{}_{}", intern_label(e), group_key),
                terms.clone(),
                RelOp::Ge,
                min_i,
            ));
            constraints.push(NamedConstraint::new(
                format!("Worker_Group_Max_{}_{}", intern_label(e), group_key),
                terms,
                RelOp::Le,
                max_i,
            ));
        }
    }

    // (4) Global external-placement count per intern, max then min.
    let out_depts: Vec<usize> = rotations
        .iter()
        .enumerate()
        .filter(|(_, r)| r.is_out())
        .map(|(r, _)| r)
        .collect();
    for e in 0..num_interns {
        let terms: Vec<_> = out_depts
            .iter()
            .flat_map(|&r| (0..Calendar::NUM_MONTHS).map(move |m| (Var::X(e, m, r), 1)))
            .collect();
        constraints.push(NamedConstraint::new(
            format!("Global_Out_Max_{}", intern_label(e)),
            terms.clone(),
            RelOp::Le,
            config.external_cap as i32,
        ));
        constraints.push(NamedConstraint::new(
            format!("Global_Out_Min_{}", intern_label(e)),
            terms,
            RelOp::Ge,
            config.external_cap as i32 - 2,
        ));
    }

    // (5) Continuity: per intern, per non-out1 location group, per adjacent month pair.
    let locations = distinct_locations_in_order(&rotations);
    for e in 0..num_interns {
        for loc in &locations {
            if loc == rotation_core::PRIMARY_EXTERNAL {
                continue;
            }
            let members: Vec<usize> = rotations
                .iter()
                .enumerate()
                .filter(|(_, r)| &r.location_group == loc)
                .map(|(r, _)| r)
                .collect();

            if loc == rotation_core::MAIN_LOCATION {
                for &r in &members {
                    for m in 0..NUM_STARTS {
                        constraints.push(NamedConstraint::new(
                            format!(
                                "No_Cont_Dept_{}_{}_{}",
                                intern_label(e),
                                rotations[r].id,
                                month_labels[m]
                            ),
                            vec![(Var::X(e, m, r), 1), (Var::X(e, m + 1, r), 1)],
                            RelOp::Le,
                            1,
                        ));
                    }
                }
            } else {
                for m in 0..NUM_STARTS {
                    let terms: Vec<_> = members
                        .iter()
                        .flat_map(|&r| [(Var::X(e, m, r), 1), (Var::X(e, m + 1, r), 1)])
                        .collect();
                    constraints.push(NamedConstraint::new(
                        format!("No_Cont_Loc_{}_{}_{}", intern_label(e), loc, month_labels[m]),
                        terms,
                        RelOp::Le,
                        1,
                    ));
                }
            }
        }
    }

    // (6) out1 constraints, per intern, then the cross-intern starter-count equality.
    let out1_depts: Vec<usize> = rotations
        .iter()
        .enumerate()
        .filter(|(_, r)| r.is_out1())
        .map(|(r, _)| r)
        .collect();

    for e in 0..num_interns {
        let start_terms: Vec<_> = (0..NUM_STARTS).map(|m| (Var::Y(e, m), 1)).collect();
        constraints.push(NamedConstraint::new(
            format!("Out1_Start_MaxOnce_{}", intern_label(e)),
            start_terms,
            RelOp::Le,
            1,
        ));

        for m in 0..NUM_STARTS {
            let (m1, m2) = (m, m + 1);

            let mut forced_m1: Vec<_> = out1_depts.iter().map(|&r| (Var::X(e, m1, r), 1)).collect();
            forced_m1.push((Var::Y(e, m), -1));
            constraints.push(NamedConstraint::new(
                format!("Out1_ForcedM1_{}_{}", intern_label(e), m),
                forced_m1,
                RelOp::Ge,
                0,
            ));

            let mut forced_m2: Vec<_> = out1_depts.iter().map(|&r| (Var::X(e, m2, r), 1)).collect();
            forced_m2.push((Var::Y(e, m), -1));
            constraints.push(NamedConstraint::new(
                format!("Out1_ForcedM2_{}_{}", intern_label(e), m),
                forced_m2,
                RelOp::Ge,
                0,
            ));

            for &r in &out1_depts {
                constraints.push(NamedConstraint::new(
                    format!("Out1_CrossRule_{}_{}_{}", intern_label(e), rotations[r].id, m),
                    vec![(Var::X(e, m1, r), 1), (Var::X(e, m2, r), 1), (Var::Y(e, m), 1)],
                    RelOp::Le,
                    2,
                ));
            }

            let other_months: Vec<usize> = (0..Calendar::NUM_MONTHS)
                .filter(|&om| om != m1 && om != m2)
                .collect();
            let mut exclusion: Vec<_> = other_months
                .iter()
                .flat_map(|&om| out_depts.iter().map(move |&r| (Var::X(e, om, r), 1)))
                .collect();
            exclusion.push((Var::Y(e, m), config.big_m));
            constraints.push(NamedConstraint::new(
                format!("Out1_Exclusion_OtherOuts_{}_{}", intern_label(e), m),
                exclusion,
                RelOp::Le,
                config.big_m,
            ));
        }
    }

    for m in 0..NUM_STARTS {
        let terms: Vec<_> = (0..num_interns).map(|e| (Var::Y(e, m), 1)).collect();
        constraints.push(NamedConstraint::new(
            format!("Out1_Monthly_StarterCount_{}", m),
            terms,
            RelOp::Eq,
            1,
        ));
    }

    Model {
        rotations,
        num_interns,
        config,
        constraints,
    }
}
