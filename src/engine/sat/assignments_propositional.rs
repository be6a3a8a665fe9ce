use crate::basic_types::ClauseReference;
use crate::basic_types::LiftedBool;
use crate::burrow_assert_moderate;
use crate::burrow_assert_simple;
use crate::variables::Literal;
use crate::variables::PropositionalVariable;

/// Controls which unassigned variables remember the polarity they last held,
/// mirroring the classic phase-saving levels: none, only the deepest level
/// being undone, or every undone assignment.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PhaseSaving {
    None,
    Limited,
    Full,
}

#[derive(Clone, Copy, Default, Debug)]
struct VariableAssignmentData {
    reason: Option<ClauseReference>,
    decision_level: usize,
}

/// Tracks the partial assignment of the kernel: per-variable truth values,
/// the trail of assignments in chronological order, the partition of the
/// trail into decision levels, and the propagation frontier.
#[derive(Default, Debug)]
pub(crate) struct AssignmentsPropositional {
    values: Vec<LiftedBool>,
    variable_data: Vec<VariableAssignmentData>,
    /// Polarity a variable last held, consulted by phase saving.
    saved_phases: Vec<bool>,
    trail: Vec<Literal>,
    /// `trail_delimiter[i]` is the trail index at which level `i + 1` starts.
    trail_delimiter: Vec<usize>,
    /// Index of the next trail entry the clausal propagator has to process.
    processing_pointer: usize,
}

impl AssignmentsPropositional {
    pub(crate) fn grow(&mut self) {
        self.values.push(LiftedBool::Unknown);
        self.variable_data.push(VariableAssignmentData::default());
        self.saved_phases.push(false);
    }

    pub(crate) fn num_propositional_variables(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn get_variable_value(&self, variable: PropositionalVariable) -> LiftedBool {
        self.values[variable.index()]
    }

    pub(crate) fn get_literal_value(&self, literal: Literal) -> LiftedBool {
        let value = self.values[literal.variable().index()];
        if literal.is_positive() {
            value
        } else {
            !value
        }
    }

    pub(crate) fn get_variable_reason(
        &self,
        variable: PropositionalVariable,
    ) -> Option<ClauseReference> {
        self.variable_data[variable.index()].reason
    }

    pub(crate) fn clear_variable_reason(&mut self, variable: PropositionalVariable) {
        self.variable_data[variable.index()].reason = None;
    }

    #[allow(unused, reason = "part of the trail interface used by conflict analysis")]
    pub(crate) fn get_variable_assignment_level(&self, variable: PropositionalVariable) -> usize {
        burrow_assert_moderate!(!self.get_variable_value(variable).is_unknown());
        self.variable_data[variable.index()].decision_level
    }

    #[allow(unused, reason = "consulted when branching picks a polarity")]
    pub(crate) fn get_saved_phase(&self, variable: PropositionalVariable) -> bool {
        self.saved_phases[variable.index()]
    }

    pub(crate) fn get_decision_level(&self) -> usize {
        self.trail_delimiter.len()
    }

    pub(crate) fn num_trail_entries(&self) -> usize {
        self.trail.len()
    }

    pub(crate) fn get_trail_entry(&self, index: usize) -> Literal {
        self.trail[index]
    }

    pub(crate) fn increase_decision_level(&mut self) {
        self.trail_delimiter.push(self.trail.len());
    }

    pub(crate) fn enqueue_decision_literal(&mut self, literal: Literal) {
        self.assign(literal, None);
    }

    pub(crate) fn enqueue_propagated_literal(&mut self, literal: Literal, reason: ClauseReference) {
        self.assign(literal, Some(reason));
    }

    fn assign(&mut self, literal: Literal, reason: Option<ClauseReference>) {
        burrow_assert_simple!(
            self.get_literal_value(literal).is_unknown(),
            "enqueueing an already assigned literal is a defect"
        );

        let variable = literal.variable();
        self.values[variable.index()] = LiftedBool::from_bool(literal.is_positive());
        self.variable_data[variable.index()] = VariableAssignmentData {
            reason,
            decision_level: self.get_decision_level(),
        };
        self.trail.push(literal);
    }

    /// Hands the clausal propagator the next trail entry whose watchers have
    /// not been scanned yet.
    pub(crate) fn next_unprocessed_literal(&mut self) -> Option<Literal> {
        if self.processing_pointer < self.trail.len() {
            let literal = self.trail[self.processing_pointer];
            self.processing_pointer += 1;
            Some(literal)
        } else {
            None
        }
    }

    /// Called on conflict: the remaining queue entries will be revisited
    /// after backtracking, so processing them now would be wasted work.
    pub(crate) fn drain_propagation_queue(&mut self) {
        self.processing_pointer = self.trail.len();
    }

    /// Undoes all assignments made after `level`. Every variable popped from
    /// the trail becomes unassigned and loses its reason; `on_unassigned` is
    /// invoked for each so the kernel can put it back into the decision
    /// order.
    pub(crate) fn backtrack_to(
        &mut self,
        level: usize,
        phase_saving: PhaseSaving,
        mut on_unassigned: impl FnMut(PropositionalVariable),
    ) {
        if self.get_decision_level() <= level {
            return;
        }

        let backtrack_point = self.trail_delimiter[level];
        let deepest_level_start = *self.trail_delimiter.last().expect("level > 0");

        for entry in (backtrack_point..self.trail.len()).rev() {
            let literal = self.trail[entry];
            let variable = literal.variable();

            self.values[variable.index()] = LiftedBool::Unknown;
            self.variable_data[variable.index()] = VariableAssignmentData::default();

            let save_phase = match phase_saving {
                PhaseSaving::Full => true,
                PhaseSaving::Limited => entry >= deepest_level_start,
                PhaseSaving::None => false,
            };
            if save_phase {
                self.saved_phases[variable.index()] = literal.is_positive();
            }

            on_unassigned(variable);
        }

        self.trail.truncate(backtrack_point);
        self.trail_delimiter.truncate(level);
        self.processing_pointer = backtrack_point;
    }

    /// Rewrites the reasons of assigned variables after the clause arena has
    /// been compacted.
    pub(crate) fn relocate_reasons(&mut self, forward: &[Option<ClauseReference>]) {
        for entry in 0..self.trail.len() {
            let variable = self.trail[entry].variable();
            let data = &mut self.variable_data[variable.index()];
            if let Some(reason) = data.reason {
                data.reason =
                    Some(forward[reason.id()].expect("a reason clause cannot be reclaimed"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positive(variable: u32) -> Literal {
        Literal::new(PropositionalVariable::new(variable), true)
    }

    fn assignments(num_variables: usize) -> AssignmentsPropositional {
        let mut assignments = AssignmentsPropositional::default();
        for _ in 0..num_variables {
            assignments.grow();
        }
        assignments
    }

    #[test]
    fn enqueued_literals_are_on_the_trail_with_their_level() {
        let mut assignments = assignments(3);

        assignments.enqueue_decision_literal(positive(0));
        assignments.increase_decision_level();
        assignments.enqueue_decision_literal(!positive(1));

        assert_eq!(assignments.num_trail_entries(), 2);
        assert_eq!(assignments.get_literal_value(positive(0)), LiftedBool::True);
        assert_eq!(
            assignments.get_literal_value(positive(1)),
            LiftedBool::False
        );
        assert_eq!(
            assignments.get_variable_assignment_level(PropositionalVariable::new(0)),
            0
        );
        assert_eq!(
            assignments.get_variable_assignment_level(PropositionalVariable::new(1)),
            1
        );
    }

    #[test]
    fn backtracking_keeps_root_assignments() {
        let mut assignments = assignments(3);

        assignments.enqueue_decision_literal(positive(0));
        assignments.increase_decision_level();
        assignments.enqueue_decision_literal(positive(1));
        assignments.increase_decision_level();
        assignments.enqueue_decision_literal(positive(2));

        let mut unassigned = vec![];
        assignments.backtrack_to(0, PhaseSaving::Full, |variable| unassigned.push(variable));

        assert_eq!(assignments.num_trail_entries(), 1);
        assert_eq!(assignments.get_decision_level(), 0);
        assert_eq!(assignments.get_literal_value(positive(0)), LiftedBool::True);
        assert!(assignments.get_variable_value(PropositionalVariable::new(1)).is_unknown());
        assert_eq!(
            unassigned,
            vec![PropositionalVariable::new(2), PropositionalVariable::new(1)]
        );
    }

    #[test]
    fn full_phase_saving_remembers_the_undone_polarity() {
        let mut assignments = assignments(2);

        assignments.increase_decision_level();
        assignments.enqueue_decision_literal(positive(0));
        assignments.enqueue_decision_literal(!positive(1));
        assignments.backtrack_to(0, PhaseSaving::Full, |_| {});

        assert!(assignments.get_saved_phase(PropositionalVariable::new(0)));
        assert!(!assignments.get_saved_phase(PropositionalVariable::new(1)));
    }

    #[test]
    fn limited_phase_saving_only_touches_the_deepest_level() {
        let mut assignments = assignments(2);

        assignments.increase_decision_level();
        assignments.enqueue_decision_literal(positive(0));
        assignments.increase_decision_level();
        assignments.enqueue_decision_literal(positive(1));
        assignments.backtrack_to(0, PhaseSaving::Limited, |_| {});

        assert!(!assignments.get_saved_phase(PropositionalVariable::new(0)));
        assert!(assignments.get_saved_phase(PropositionalVariable::new(1)));
    }

    #[test]
    fn reasons_are_cleared_when_a_variable_is_unassigned() {
        let mut assignments = assignments(2);

        assignments.increase_decision_level();
        assignments.enqueue_propagated_literal(positive(0), ClauseReference::new(0));
        assert!(assignments
            .get_variable_reason(PropositionalVariable::new(0))
            .is_some());

        assignments.backtrack_to(0, PhaseSaving::Full, |_| {});
        assert!(assignments
            .get_variable_reason(PropositionalVariable::new(0))
            .is_none());
    }
}
