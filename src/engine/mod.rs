pub(crate) mod sat;
pub(crate) mod sat_solver;
pub(crate) mod test_helper;

pub use sat::PhaseSaving;
pub use sat_solver::SatSolver;
pub use sat_solver::SolverOptions;
