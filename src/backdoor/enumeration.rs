//! Enumerates the sign cubes of an ordered variable set on top of the
//! kernel. The tree walk shares propagation work between cubes with a common
//! prefix and prunes a whole subtree on every conflict; the exhaustive
//! variant checks each cube independently and exists only as an oracle for
//! the tree walk.

use crate::basic_types::LiftedBool;
use crate::burrow_assert_moderate;
use crate::burrow_assert_simple;
use crate::engine::SatSolver;
use crate::variables::Literal;
use crate::variables::PropositionalVariable;

/// The result of enumerating the sign cubes of a variable set: how many of
/// the `2^k` cubes are hard (propagation neither hits a conflict nor assigns
/// every variable of the formula), and the first `limit` of them in
/// lexicographic order.
#[derive(Debug)]
pub struct CubeEnumeration {
    pub num_hard: u64,
    pub cubes: Vec<Vec<Literal>>,
}

#[derive(Clone, Copy, Debug)]
enum WalkState {
    Descending,
    Ascending,
    Propagating,
}

fn is_hard_leaf(solver: &SatSolver) -> bool {
    solver.num_assigned_variables() < solver.num_variables()
}

/// The convention for the empty variable set: the root state itself is the
/// single cube, hard iff propagation at level 0 has not decided the formula.
fn enumerate_root_cube(solver: &mut SatSolver, limit: usize) -> CubeEnumeration {
    if is_hard_leaf(solver) {
        let cubes = if limit > 0 { vec![Vec::new()] } else { Vec::new() };
        CubeEnumeration { num_hard: 1, cubes }
    } else {
        CubeEnumeration {
            num_hard: 0,
            cubes: Vec::new(),
        }
    }
}

/// Depth-first walk over the binary tree of sign assignments to `variables`
/// (at most 63 of them), one decision level per variable. The cube `cube[i]`
/// maps `false` to the positive literal; cubes are visited in lexicographic
/// order with `cube[0]` as the highest-order bit. The solver is back at
/// decision level 0 on every exit.
pub fn enumerate_hard_cubes_tree(
    solver: &mut SatSolver,
    variables: &[PropositionalVariable],
    limit: usize,
) -> CubeEnumeration {
    burrow_assert_simple!(!solver.is_infeasible());
    burrow_assert_simple!(variables.len() < 64);
    solver.cancel_until(0);

    let num_variables = variables.len();
    if num_variables == 0 {
        return enumerate_root_cube(solver, limit);
    }

    let mut assumptions: Vec<Literal> = variables
        .iter()
        .map(|&variable| Literal::new(variable, true))
        .collect();
    let mut cube = vec![false; num_variables];
    let mut num_hard = 0u64;
    let mut cubes: Vec<Vec<Literal>> = Vec::new();
    let mut num_propagation_calls = 0u64;
    let mut state = WalkState::Descending;

    loop {
        burrow_assert_moderate!(solver.get_decision_level() <= num_variables);

        match state {
            WalkState::Descending => {
                if solver.get_decision_level() == num_variables {
                    // All sign literals placed without conflict: this cube
                    // survives, and it is a hard task unless propagation has
                    // already decided the formula.
                    if is_hard_leaf(solver) {
                        if cubes.len() < limit {
                            cubes.push(assumptions.clone());
                        }
                        num_hard += 1;
                    }
                    state = WalkState::Ascending;
                } else {
                    while solver.get_decision_level() < num_variables {
                        solver.new_decision_level();
                        let literal = assumptions[solver.get_decision_level() - 1];
                        match solver.get_literal_value(literal) {
                            LiftedBool::True => {
                                // Already implied by earlier levels; nothing
                                // to enqueue.
                            }
                            LiftedBool::False => {
                                // The opposite polarity was propagated from
                                // an earlier level; the branch is blocked.
                                state = WalkState::Ascending;
                                break;
                            }
                            LiftedBool::Unknown => {
                                solver.unchecked_enqueue(literal, None);
                                state = WalkState::Propagating;
                                break;
                            }
                        }
                    }
                }
            }
            WalkState::Ascending => {
                burrow_assert_moderate!(solver.get_decision_level() > 0);

                // Find the deepest level still holding a 0-branch; flipping
                // it skips the whole pruned subtree below the current level.
                let mut index = solver.get_decision_level();
                while index > 0 && cube[index - 1] {
                    index -= 1;
                }
                if index == 0 {
                    break;
                }

                cube[index - 1] = true;
                for tail in index..num_variables {
                    cube[tail] = false;
                }
                for position in (index - 1)..num_variables {
                    assumptions[position] = Literal::new(variables[position], !cube[position]);
                }

                // Level `index` gets a rewritten literal, so backtrack to
                // just before it.
                solver.cancel_until(index - 1);
                state = WalkState::Descending;
            }
            WalkState::Propagating => {
                num_propagation_calls += 1;
                state = if solver.propagate().is_some() {
                    WalkState::Ascending
                } else {
                    WalkState::Descending
                };
            }
        }
    }

    solver.cancel_until(0);
    log::trace!(
        "tree walk over {} variables: {} propagation calls, {} hard cubes",
        num_variables,
        num_propagation_calls,
        num_hard
    );

    CubeEnumeration { num_hard, cubes }
}

/// Checks every one of the `2^k` sign cubes independently, propagating each
/// from scratch. Exponentially more propagation work than the tree walk on
/// the same input; kept as a cross-checking oracle for `num_hard` and the
/// recorded cube prefix.
pub fn enumerate_hard_cubes_exhaustive(
    solver: &mut SatSolver,
    variables: &[PropositionalVariable],
    limit: usize,
) -> CubeEnumeration {
    burrow_assert_simple!(!solver.is_infeasible());
    burrow_assert_simple!(variables.len() < 64);
    solver.cancel_until(0);

    let num_variables = variables.len();
    if num_variables == 0 {
        return enumerate_root_cube(solver, limit);
    }

    let mut cube = vec![false; num_variables];
    let mut num_hard = 0u64;
    let mut cubes: Vec<Vec<Literal>> = Vec::new();

    loop {
        let assumptions: Vec<Literal> = variables
            .iter()
            .zip(cube.iter())
            .map(|(&variable, &sign)| Literal::new(variable, !sign))
            .collect();

        let mut decided = false;
        for &literal in &assumptions {
            match solver.get_literal_value(literal) {
                LiftedBool::True => {}
                LiftedBool::False => {
                    decided = true;
                    break;
                }
                LiftedBool::Unknown => {
                    solver.new_decision_level();
                    solver.unchecked_enqueue(literal, None);
                    if solver.propagate().is_some() {
                        decided = true;
                        break;
                    }
                }
            }
        }

        if !decided && is_hard_leaf(solver) {
            if cubes.len() < limit {
                cubes.push(assumptions);
            }
            num_hard += 1;
        }
        solver.cancel_until(0);

        // Advance to the lexicographically next cube.
        let mut position = num_variables;
        while position > 0 && cube[position - 1] {
            cube[position - 1] = false;
            position -= 1;
        }
        if position == 0 {
            break;
        }
        cube[position - 1] = true;
    }

    CubeEnumeration { num_hard, cubes }
}
