use crate::basic_types::ClauseReference;
use crate::burrow_assert_moderate;
use crate::burrow_assert_simple;
use crate::engine::sat::Clause;
use crate::variables::Literal;

/// The arena that owns every clause of the kernel. Clauses are allocated by
/// bumping the end of the arena and are addressed through opaque
/// [`ClauseReference`]s. Deleting a clause only marks it; the storage is
/// reclaimed when [`ClauseAllocator::compact`] rebuilds the arena and hands
/// back a forwarding table so the kernel can rewrite every handle it stores
/// (watchers, trail reasons, clause lists) in lockstep.
#[derive(Default, Debug)]
pub(crate) struct ClauseAllocator {
    clauses: Vec<Clause>,
    /// Literal count of all stored clauses, deleted ones included.
    stored_literals: usize,
    /// Literal count of deleted clauses awaiting reclamation.
    wasted_literals: usize,
}

impl ClauseAllocator {
    pub(crate) fn create_clause(
        &mut self,
        literals: Vec<Literal>,
        is_learned: bool,
    ) -> ClauseReference {
        burrow_assert_simple!(literals.len() >= 2);

        let reference = ClauseReference::new(self.clauses.len() as u32);
        self.stored_literals += literals.len();
        self.clauses.push(Clause::new(literals, is_learned));
        reference
    }

    pub(crate) fn get_clause(&self, reference: ClauseReference) -> &Clause {
        let clause = &self.clauses[reference.id()];
        burrow_assert_moderate!(!clause.is_deleted());
        clause
    }

    pub(crate) fn get_mutable_clause(&mut self, reference: ClauseReference) -> &mut Clause {
        let clause = &mut self.clauses[reference.id()];
        burrow_assert_moderate!(!clause.is_deleted());
        clause
    }

    pub(crate) fn delete_clause(&mut self, reference: ClauseReference) {
        let clause = &mut self.clauses[reference.id()];
        self.wasted_literals += clause.len() as usize;
        clause.mark_deleted();
    }

    pub(crate) fn num_stored_clauses(&self) -> usize {
        self.clauses.len()
    }

    /// The fraction of arena storage held by deleted clauses. The kernel
    /// triggers [`ClauseAllocator::compact`] once this crosses its configured
    /// threshold.
    pub(crate) fn wasted_fraction(&self) -> f64 {
        if self.stored_literals == 0 {
            0.0
        } else {
            self.wasted_literals as f64 / self.stored_literals as f64
        }
    }

    /// Rebuilds the arena without the deleted clauses. The returned table
    /// maps every old clause id to the reference of the relocated clause, or
    /// `None` if the clause was reclaimed. The caller must rewrite all of its
    /// stored handles before touching the allocator again; a single stale
    /// handle after relocation is a defect.
    pub(crate) fn compact(&mut self) -> Vec<Option<ClauseReference>> {
        let old_clauses = std::mem::take(&mut self.clauses);
        let mut forward = Vec::with_capacity(old_clauses.len());

        self.stored_literals = 0;
        self.wasted_literals = 0;

        for clause in old_clauses {
            if clause.is_deleted() {
                forward.push(None);
            } else {
                forward.push(Some(ClauseReference::new(self.clauses.len() as u32)));
                self.stored_literals += clause.len() as usize;
                self.clauses.push(clause);
            }
        }

        forward
    }
}
