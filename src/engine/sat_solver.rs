//! Houses the propagation kernel: clause storage, the partial assignment and
//! two-watched-literal unit propagation, together with the bookkeeping the
//! backdoor search drives through its narrow interface (variable creation,
//! clause posting at the root, decision levels, enqueueing and propagation).

use rand::rngs::SmallRng;
use rand::Rng;
use rand::SeedableRng;

use crate::basic_types::ClauseReference;
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::LiftedBool;
use crate::burrow_assert_eq_simple;
use crate::burrow_assert_simple;
use crate::engine::sat::AssignmentsPropositional;
use crate::engine::sat::ClausalPropagator;
use crate::engine::sat::Clause;
use crate::engine::sat::ClauseAllocator;
use crate::engine::sat::OrderHeap;
use crate::engine::sat::PhaseSaving;
use crate::variables::Literal;
use crate::variables::PropositionalVariable;

/// The kernel is either ready to accept work or has derived unsatisfiability
/// at the root level, after which every operation short-circuits.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum SolverState {
    Ready,
    Infeasible,
}

/// A set of counters updated while propagating.
#[derive(Default, Debug)]
pub struct Counters {
    pub(crate) num_propagations: u64,
    pub(crate) num_conflicts: u64,
}

/// Options for the [`SatSolver`] which determine how it behaves.
#[derive(Debug)]
pub struct SolverOptions {
    /// Which unassigned variables keep the polarity they last held.
    pub phase_saving: PhaseSaving,
    /// Give fresh variables a tiny random activity instead of zero.
    pub random_initial_activity: bool,
    /// The fraction of wasted arena storage tolerated before clauses are
    /// compacted.
    pub garbage_fraction: f64,
    /// A random generator which is used by the solver; passing it as an
    /// argument allows seeding of the randomization.
    pub random_generator: SmallRng,
}

impl Default for SolverOptions {
    fn default() -> Self {
        SolverOptions {
            phase_saving: PhaseSaving::Full,
            random_initial_activity: false,
            garbage_fraction: 0.2,
            random_generator: SmallRng::seed_from_u64(42),
        }
    }
}

/// The propagation kernel. It owns the clause arena, the watch lists and the
/// trail; the assumption-tree enumerator drives it through decision levels
/// and always returns it to the root level.
#[derive(Debug)]
pub struct SatSolver {
    /// The solver continuously changes states while clauses are posted; the
    /// state tracks whether unsatisfiability was already derived at the root.
    state: SolverState,
    /// Tracks information related to the assignments of variables.
    pub(crate) assignments: AssignmentsPropositional,
    /// Responsible for clausal propagation based on the two-watched scheme.
    pub(crate) clausal_propagator: ClausalPropagator,
    /// Tracks information about all allocated clauses. All clause allocation
    /// goes exclusively through the clause allocator; unit clauses are stored
    /// directly on the trail.
    pub(crate) clause_allocator: ClauseAllocator,
    /// References of the original problem clauses of size at least two.
    clauses: Vec<ClauseReference>,
    /// References of learned clauses. This mode of operation never learns,
    /// but the arena, attachment and relocation paths treat them uniformly.
    learned_clauses: Vec<ClauseReference>,
    /// Activity of each variable, used to order the decision heap.
    activities: Vec<f64>,
    /// Variables eligible for branching, ordered by activity.
    order_heap: OrderHeap,
    is_decision_variable: Vec<bool>,
    counters: Counters,
    options: SolverOptions,
}

impl Default for SatSolver {
    fn default() -> Self {
        SatSolver::new(SolverOptions::default())
    }
}

impl SatSolver {
    pub fn new(options: SolverOptions) -> SatSolver {
        SatSolver {
            state: SolverState::Ready,
            assignments: AssignmentsPropositional::default(),
            clausal_propagator: ClausalPropagator::default(),
            clause_allocator: ClauseAllocator::default(),
            clauses: Vec::new(),
            learned_clauses: Vec::new(),
            activities: Vec::new(),
            order_heap: OrderHeap::default(),
            is_decision_variable: Vec::new(),
            counters: Counters::default(),
            options,
        }
    }

    pub fn is_infeasible(&self) -> bool {
        self.state == SolverState::Infeasible
    }

    pub fn num_variables(&self) -> usize {
        self.assignments.num_propositional_variables()
    }

    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    pub fn num_learned_clauses(&self) -> usize {
        self.learned_clauses.len()
    }

    pub fn num_assigned_variables(&self) -> usize {
        self.assignments.num_trail_entries()
    }

    pub fn get_decision_level(&self) -> usize {
        self.assignments.get_decision_level()
    }

    pub fn get_variable_value(&self, variable: PropositionalVariable) -> LiftedBool {
        self.assignments.get_variable_value(variable)
    }

    pub fn get_literal_value(&self, literal: Literal) -> LiftedBool {
        self.assignments.get_literal_value(literal)
    }

    /// Creates a fresh decision variable with watcher slots for both
    /// polarities, an unassigned value and (optionally randomized) activity.
    pub fn new_variable(&mut self) -> PropositionalVariable {
        let variable =
            PropositionalVariable::new(self.assignments.num_propositional_variables() as u32);

        self.clausal_propagator.grow();
        self.assignments.grow();
        self.order_heap.grow();

        let initial_activity = if self.options.random_initial_activity {
            self.options.random_generator.gen::<f64>() * 0.00001
        } else {
            0.0
        };
        self.activities.push(initial_activity);
        self.is_decision_variable.push(true);
        self.order_heap.insert(variable, &self.activities);

        variable
    }

    pub fn set_decision_variable(&mut self, variable: PropositionalVariable, is_decision: bool) {
        self.is_decision_variable[variable.index()] = is_decision;
        if is_decision && self.get_variable_value(variable).is_unknown() {
            self.order_heap.insert(variable, &self.activities);
        }
    }

    /// Posts an original clause. Only accepted at the root level. The clause
    /// is sorted (for size > 2), duplicate and root-falsified literals are
    /// dropped, and tautological or already satisfied clauses are accepted
    /// without being stored. An empty result makes the formula infeasible; a
    /// unit is enqueued and propagated immediately.
    pub fn add_clause(
        &mut self,
        mut literals: Vec<Literal>,
    ) -> Result<(), ConstraintOperationError> {
        burrow_assert_eq_simple!(self.get_decision_level(), 0);

        if self.is_infeasible() {
            return Err(ConstraintOperationError::InfeasibleState);
        }

        // A clause of size one is always sorted and a clause of size two is
        // sorted enough for the duplicate-detecting pass below.
        if literals.len() > 2 {
            literals.sort();
        }

        let mut previous: Option<Literal> = None;
        let mut kept = 0;
        for index in 0..literals.len() {
            let literal = literals[index];
            if self.get_literal_value(literal) == LiftedBool::True || previous == Some(!literal) {
                return Ok(());
            }
            if self.get_literal_value(literal) != LiftedBool::False && previous != Some(literal) {
                previous = Some(literal);
                literals[kept] = literal;
                kept += 1;
            }
        }
        literals.truncate(kept);

        match literals.len() {
            0 => {
                self.state = SolverState::Infeasible;
                Err(ConstraintOperationError::InfeasibleClause)
            }
            1 => {
                self.unchecked_enqueue(literals[0], None);
                if self.propagate().is_some() {
                    self.state = SolverState::Infeasible;
                    Err(ConstraintOperationError::InfeasibleClause)
                } else {
                    Ok(())
                }
            }
            _ => {
                let reference = self.clause_allocator.create_clause(literals, false);
                self.clauses.push(reference);
                self.clausal_propagator
                    .attach_clause(reference, &self.clause_allocator);
                Ok(())
            }
        }
    }

    /// Allocates and attaches a learned clause of size at least two. Unused
    /// by the backdoor search itself (which never analyses conflicts) but
    /// kept so that the arena and relocation paths cover both clause kinds.
    pub fn add_learned_clause(&mut self, literals: Vec<Literal>) -> ClauseReference {
        burrow_assert_simple!(literals.len() >= 2);
        let reference = self.clause_allocator.create_clause(literals, true);
        self.learned_clauses.push(reference);
        self.clausal_propagator
            .attach_clause(reference, &self.clause_allocator);
        reference
    }

    /// Detaches and deletes a clause. If the clause is the reason of its
    /// propagated literal the reason is cleared first. May trigger a garbage
    /// collection of the arena.
    pub fn remove_clause(&mut self, reference: ClauseReference) {
        let clause = self.clause_allocator.get_clause(reference);
        let is_learned = clause.is_learned();
        let first = clause[0];

        self.clausal_propagator
            .detach_clause(reference, &self.clause_allocator);
        if self.assignments.get_variable_reason(first.variable()) == Some(reference) {
            self.assignments.clear_variable_reason(first.variable());
        }
        self.clause_allocator.delete_clause(reference);

        if is_learned {
            self.learned_clauses.retain(|&r| r != reference);
        } else {
            self.clauses.retain(|&r| r != reference);
        }

        if self.clause_allocator.wasted_fraction() > self.options.garbage_fraction {
            self.garbage_collect();
        }
    }

    /// Compacts the clause arena and rewrites every stored handle (watchers,
    /// trail reasons, clause lists) through the forwarding table in one pass.
    pub(crate) fn garbage_collect(&mut self) {
        let stored_before = self.clause_allocator.num_stored_clauses();
        let forward = self.clause_allocator.compact();
        log::debug!(
            "garbage collection: {} -> {} stored clauses",
            stored_before,
            self.clause_allocator.num_stored_clauses()
        );

        self.clausal_propagator.relocate_watchers(&forward);
        self.assignments.relocate_reasons(&forward);
        for reference in self.clauses.iter_mut() {
            *reference = forward[reference.id()].expect("original clauses are never reclaimed");
        }
        for reference in self.learned_clauses.iter_mut() {
            *reference = forward[reference.id()].expect("listed learned clauses are live");
        }
    }

    pub fn new_decision_level(&mut self) {
        self.assignments.increase_decision_level();
    }

    /// Reverts to the state at the given level, keeping all assignments at
    /// `level` but not beyond. Undone decision variables are reinserted into
    /// the decision heap; phase saving follows the configured policy.
    pub fn cancel_until(&mut self, level: usize) {
        let order_heap = &mut self.order_heap;
        let activities = &self.activities;
        let is_decision_variable = &self.is_decision_variable;

        self.assignments
            .backtrack_to(level, self.options.phase_saving, |variable| {
                if is_decision_variable[variable.index()] {
                    order_heap.insert(variable, activities);
                }
            });
    }

    /// Puts an unassigned literal on the trail. A propagated literal carries
    /// the clause that implied it as its reason; decisions and root units
    /// carry none.
    pub fn unchecked_enqueue(&mut self, literal: Literal, reason: Option<ClauseReference>) {
        match reason {
            Some(reference) => self
                .assignments
                .enqueue_propagated_literal(literal, reference),
            None => self.assignments.enqueue_decision_literal(literal),
        }
    }

    /// Propagates all enqueued facts. Returns the conflicting clause if one
    /// arises, otherwise `None`. The propagation queue is empty afterwards,
    /// even if there was a conflict.
    pub fn propagate(&mut self) -> Option<ClauseReference> {
        self.clausal_propagator.propagate(
            &mut self.assignments,
            &mut self.clause_allocator,
            &mut self.counters,
        )
    }

    pub(crate) fn get_clause(&self, reference: ClauseReference) -> &Clause {
        self.clause_allocator.get_clause(reference)
    }

    pub(crate) fn get_original_clause_references(&self) -> &[ClauseReference] {
        &self.clauses
    }

    pub fn log_statistics(&self) {
        log::info!("propagations: {}", self.counters.num_propagations);
        log::info!("conflicts: {}", self.counters.num_conflicts);
    }
}
