use thiserror::Error;

/// Errors raised when posting constraints to the kernel.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
pub enum ConstraintOperationError {
    /// The clause made the formula trivially unsatisfiable, either because it
    /// became empty after removing falsified literals or because enqueueing
    /// its unit literal led to a root-level conflict.
    #[error("adding the clause made the formula unsatisfiable")]
    InfeasibleClause,
    /// The kernel was already in an unsatisfiable state; the operation was
    /// ignored.
    #[error("the formula is already unsatisfiable")]
    InfeasibleState,
}
