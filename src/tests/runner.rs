use crate::engine::SatSolver;
use crate::runner::build_pool;
use crate::runner::load_formula;
use crate::runner::parse_index_intervals;
use crate::variables::PropositionalVariable;

fn variables(indices: &[u32]) -> Vec<PropositionalVariable> {
    indices
        .iter()
        .map(|&index| PropositionalVariable::new(index))
        .collect()
}

#[test]
fn intervals_parse_singletons_and_ranges() {
    assert_eq!(
        parse_index_intervals("1,5-7,10").expect("valid list"),
        vec![1, 5, 6, 7, 10]
    );
    assert_eq!(
        parse_index_intervals("7-3").expect("valid list"),
        vec![7, 6, 5, 4, 3]
    );
    assert_eq!(parse_index_intervals("0").expect("valid list"), vec![0]);
    assert!(parse_index_intervals("1,a").is_err());
    assert!(parse_index_intervals("1-2-3").is_err());
}

#[test]
fn loading_maps_dimacs_variables_to_zero_based_ids() {
    let directory = tempfile::tempdir().expect("temporary directory");
    let path = directory.path().join("formula.cnf");
    std::fs::write(&path, "p cnf 3 2\n1 0\n2 3 0\n").expect("file is writable");

    let mut solver = SatSolver::default();
    let infeasible = load_formula(&mut solver, &path).expect("parses");

    assert!(!infeasible);
    assert_eq!(solver.num_variables(), 3);
    // The unit clause is on the trail, not in the clause list.
    assert_eq!(solver.num_clauses(), 1);
    assert!(!solver
        .get_variable_value(PropositionalVariable::new(0))
        .is_unknown());
}

#[test]
fn loading_a_trivially_unsatisfiable_formula_reports_infeasible() {
    let directory = tempfile::tempdir().expect("temporary directory");
    let path = directory.path().join("unsat.cnf");
    std::fs::write(&path, "p cnf 1 2\n1 0\n-1 0\n").expect("file is writable");

    let mut solver = SatSolver::default();
    let infeasible = load_formula(&mut solver, &path).expect("parses");

    assert!(infeasible);
    assert!(solver.is_infeasible());
}

#[test]
fn the_pool_skips_holes_assigned_and_banned_variables() {
    let directory = tempfile::tempdir().expect("temporary directory");
    let path = directory.path().join("formula.cnf");
    // x1 is a root unit, x4 occurs nowhere.
    std::fs::write(&path, "p cnf 4 2\n1 0\n2 3 0\n").expect("file is writable");

    let mut solver = SatSolver::default();
    let infeasible = load_formula(&mut solver, &path).expect("parses");
    assert!(!infeasible);

    let pool = build_pool(&solver, None, &[]);
    assert_eq!(pool, variables(&[1, 2]));

    let banned = build_pool(&solver, None, &[2]);
    assert_eq!(banned, variables(&[1]));

    let restricted = build_pool(&solver, Some(&[2, 3]), &[]);
    assert_eq!(restricted, variables(&[2]));

    // Out-of-range ids in the lists are ignored.
    let with_bogus = build_pool(&solver, None, &[17]);
    assert_eq!(with_bogus, variables(&[1, 2]));
}
