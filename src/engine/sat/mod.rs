mod assignments_propositional;
mod clausal_propagator;
mod clause;
mod clause_allocator;
mod order_heap;

pub use assignments_propositional::PhaseSaving;
pub(crate) use assignments_propositional::AssignmentsPropositional;
pub(crate) use clausal_propagator::ClausalPropagator;
pub(crate) use clause::Clause;
pub(crate) use clause_allocator::ClauseAllocator;
pub(crate) use order_heap::OrderHeap;
