//! Cross-module scenario tests. Unit-level properties live next to the code
//! they exercise.

mod kernel;
mod runner;

use crate::engine::test_helper;
use crate::engine::SatSolver;

/// A pigeonhole-flavoured formula over nine variables: three "pigeon"
/// clauses demanding a hole per pigeon, and exclusion clauses keeping the
/// first two pigeons apart. Satisfiable, but with enough propagation
/// structure that small variable sets differ in quality.
pub(crate) fn pigeonhole_like_solver() -> SatSolver {
    test_helper::build_solver(
        9,
        &[
            &[1, 2, 3],
            &[4, 5, 6],
            &[7, 8, 9],
            &[-1, -4],
            &[-2, -5],
            &[-3, -6],
        ],
    )
}
