use crate::backdoor::enumerate_hard_cubes_tree;
use crate::basic_types::LiftedBool;
use crate::engine::test_helper;
use crate::tests::pigeonhole_like_solver;
use crate::variables::PropositionalVariable;

#[test]
fn every_stored_clause_is_watched_by_its_first_two_literals() {
    let mut solver = pigeonhole_like_solver();

    // Move the watch lists around by walking a few assumption trees.
    let set: Vec<PropositionalVariable> =
        (0..6).map(PropositionalVariable::new).collect();
    let _ = enumerate_hard_cubes_tree(&mut solver, &set, 0);
    let _ = enumerate_hard_cubes_tree(&mut solver, &set[1..4], 0);

    for &reference in solver.get_original_clause_references() {
        let clause = solver.get_clause(reference);
        assert!(clause.len() >= 2);
        for watched in [clause[0], clause[1]] {
            assert!(
                solver
                    .clausal_propagator
                    .get_watchers(!watched)
                    .iter()
                    .any(|watcher| watcher.clause_reference == reference),
                "clause {} is not watched by {}",
                clause,
                !watched
            );
        }
    }
}

#[test]
fn propagated_literals_are_implied_by_their_reason_clause() {
    let mut solver = pigeonhole_like_solver();

    solver.new_decision_level();
    solver.unchecked_enqueue(test_helper::lit(1), None);
    assert!(solver.propagate().is_none());
    solver.new_decision_level();
    solver.unchecked_enqueue(!test_helper::lit(2), None);
    assert!(solver.propagate().is_none());

    for entry in 0..solver.assignments.num_trail_entries() {
        let literal = solver.assignments.get_trail_entry(entry);
        assert_eq!(solver.get_literal_value(literal), LiftedBool::True);

        if let Some(reason) = solver.assignments.get_variable_reason(literal.variable()) {
            let clause = solver.get_clause(reason);
            // The propagated literal sits in slot 0 and every other literal
            // of the reason is false, which is what makes the clause unit.
            assert_eq!(clause[0], literal);
            for position in 1..clause.len() {
                assert_eq!(
                    solver.get_literal_value(clause[position]),
                    LiftedBool::False
                );
            }
        }
    }

    solver.cancel_until(0);
}

#[test]
fn the_root_trail_is_stable_across_enumerations() {
    // Root units: x1, and through it x4 stays free; only x1 is fixed.
    let mut solver = test_helper::build_solver(4, &[&[1], &[2, 3, 4]]);
    let root_entries = solver.num_assigned_variables();
    assert_eq!(root_entries, 1);

    let set: Vec<PropositionalVariable> =
        vec![PropositionalVariable::new(1), PropositionalVariable::new(2)];
    let _ = enumerate_hard_cubes_tree(&mut solver, &set, 0);
    let _ = enumerate_hard_cubes_tree(&mut solver, &set, 0);

    assert_eq!(solver.get_decision_level(), 0);
    assert_eq!(solver.num_assigned_variables(), root_entries);
}
