use crate::basic_types::ClauseReference;
use crate::basic_types::LiftedBool;
use crate::burrow_assert_moderate;
use crate::burrow_assert_simple;
use crate::engine::sat::AssignmentsPropositional;
use crate::engine::sat::ClauseAllocator;
use crate::engine::sat_solver::Counters;
use crate::variables::Literal;

/// A watch-list entry: the watching clause plus a blocker literal whose truth
/// makes inspecting the clause unnecessary.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ClauseWatcher {
    pub(crate) clause_reference: ClauseReference,
    pub(crate) blocker: Literal,
}

/// Unit propagation over clauses with the two-watched-literal scheme. For
/// every literal `p`, `watch_lists[p]` holds the clauses that watch `!p` as
/// one of their first two literals; a clause of size ≥ 2 is watched exactly
/// by the negations of its first two literals.
#[derive(Default, Debug)]
pub(crate) struct ClausalPropagator {
    watch_lists: Vec<Vec<ClauseWatcher>>,
}

impl ClausalPropagator {
    /// Adds watcher slots for both polarities of a freshly created variable.
    pub(crate) fn grow(&mut self) {
        self.watch_lists.push(Vec::new());
        self.watch_lists.push(Vec::new());
    }

    pub(crate) fn attach_clause(
        &mut self,
        reference: ClauseReference,
        clause_allocator: &ClauseAllocator,
    ) {
        let clause = clause_allocator.get_clause(reference);
        burrow_assert_simple!(clause.len() >= 2);

        let first = clause[0];
        let second = clause[1];
        self.watch_lists[(!first).index()].push(ClauseWatcher {
            clause_reference: reference,
            blocker: second,
        });
        self.watch_lists[(!second).index()].push(ClauseWatcher {
            clause_reference: reference,
            blocker: first,
        });
    }

    pub(crate) fn detach_clause(
        &mut self,
        reference: ClauseReference,
        clause_allocator: &ClauseAllocator,
    ) {
        let clause = clause_allocator.get_clause(reference);
        burrow_assert_simple!(clause.len() >= 2);

        let first = clause[0];
        let second = clause[1];
        self.watch_lists[(!first).index()].retain(|watcher| watcher.clause_reference != reference);
        self.watch_lists[(!second).index()].retain(|watcher| watcher.clause_reference != reference);
    }

    pub(crate) fn get_watchers(&self, literal: Literal) -> &[ClauseWatcher] {
        &self.watch_lists[literal.index()]
    }

    /// Propagates all enqueued facts. Returns the conflicting clause if one
    /// is found, in which case the propagation frontier is drained so that
    /// the caller backtracks before propagating again.
    pub(crate) fn propagate(
        &mut self,
        assignments: &mut AssignmentsPropositional,
        clause_allocator: &mut ClauseAllocator,
        counters: &mut Counters,
    ) -> Option<ClauseReference> {
        let mut conflict = None;

        while conflict.is_none() {
            let Some(propagating_literal) = assignments.next_unprocessed_literal() else {
                break;
            };
            counters.num_propagations += 1;

            let false_literal = !propagating_literal;
            let mut watchers = std::mem::take(&mut self.watch_lists[propagating_literal.index()]);
            let mut kept = 0;
            let mut index = 0;

            while index < watchers.len() {
                let watcher = watchers[index];

                // Try to avoid inspecting the clause.
                if assignments.get_literal_value(watcher.blocker) == LiftedBool::True {
                    watchers[kept] = watcher;
                    kept += 1;
                    index += 1;
                    continue;
                }

                // Make sure the false literal is in slot 1.
                let reference = watcher.clause_reference;
                let clause = clause_allocator.get_mutable_clause(reference);
                if clause[0] == false_literal {
                    clause.swap(0, 1);
                }
                burrow_assert_moderate!(clause[1] == false_literal);
                index += 1;

                // If slot 0 is true, the clause is already satisfied.
                let first = clause[0];
                let replacement = ClauseWatcher {
                    clause_reference: reference,
                    blocker: first,
                };
                if first != watcher.blocker
                    && assignments.get_literal_value(first) == LiftedBool::True
                {
                    watchers[kept] = replacement;
                    kept += 1;
                    continue;
                }

                // Look for a new literal to watch.
                let mut found_new_watch = false;
                for position in 2..clause.len() {
                    if assignments.get_literal_value(clause[position]) != LiftedBool::False {
                        clause.swap(1, position as usize);
                        let new_watched = clause[1];
                        self.watch_lists[(!new_watched).index()].push(replacement);
                        found_new_watch = true;
                        break;
                    }
                }
                if found_new_watch {
                    continue;
                }

                // No replacement watch: the clause is unit under the current
                // assignment.
                watchers[kept] = replacement;
                kept += 1;
                if assignments.get_literal_value(first) == LiftedBool::False {
                    counters.num_conflicts += 1;
                    conflict = Some(reference);
                    assignments.drain_propagation_queue();
                    // Keep the watchers that were not scanned yet.
                    while index < watchers.len() {
                        let unscanned = watchers[index];
                        watchers[kept] = unscanned;
                        kept += 1;
                        index += 1;
                    }
                } else {
                    assignments.enqueue_propagated_literal(first, reference);
                }
            }

            watchers.truncate(kept);
            self.watch_lists[propagating_literal.index()] = watchers;
        }

        conflict
    }

    /// Rewrites every watcher after the clause arena has been compacted.
    pub(crate) fn relocate_watchers(&mut self, forward: &[Option<ClauseReference>]) {
        for watch_list in self.watch_lists.iter_mut() {
            for watcher in watch_list.iter_mut() {
                watcher.clause_reference = forward[watcher.clause_reference.id()]
                    .expect("a watched clause cannot be reclaimed");
            }
        }
    }
}
