mod clause_reference;
mod constraint_operation_error;
mod lifted_bool;

pub use clause_reference::ClauseReference;
pub use constraint_operation_error::ConstraintOperationError;
pub use lifted_bool::LiftedBool;
