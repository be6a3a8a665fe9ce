#![cfg(any(test, doc))]
//! Helpers for building small formulas in tests. Clauses are written in the
//! signed 1-based DIMACS convention, so `&[-1, 2]` is the clause
//! `(~x1 \/ x2)`.

use crate::engine::SatSolver;
use crate::variables::Literal;
use crate::variables::PropositionalVariable;

/// The literal for a non-zero signed 1-based DIMACS index.
pub(crate) fn lit(dimacs_index: i32) -> Literal {
    assert_ne!(dimacs_index, 0);
    Literal::new(
        PropositionalVariable::new(dimacs_index.unsigned_abs() - 1),
        dimacs_index > 0,
    )
}

/// Builds a solver over `num_variables` variables from DIMACS-style clauses.
/// Panics if posting any clause makes the formula infeasible; tests that
/// target infeasibility post their clauses by hand.
pub(crate) fn build_solver(num_variables: usize, clauses: &[&[i32]]) -> SatSolver {
    let mut solver = SatSolver::default();
    for _ in 0..num_variables {
        let _ = solver.new_variable();
    }
    for clause in clauses {
        solver
            .add_clause(clause.iter().map(|&index| lit(index)).collect())
            .expect("test formula is feasible at the root");
    }
    solver
}
