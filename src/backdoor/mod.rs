//! The backdoor-search layer: candidate instances over a pool of variables,
//! the assumption-tree enumerator that prices them, and the (1+1)
//! evolutionary searcher that drives the whole thing.

mod enumeration;
mod fitness;
mod instance;
mod output;
mod searcher;

pub use enumeration::enumerate_hard_cubes_exhaustive;
pub use enumeration::enumerate_hard_cubes_tree;
pub use enumeration::CubeEnumeration;
pub use fitness::Fitness;
pub use instance::Instance;
pub use output::OutputLog;
pub use searcher::BackdoorSearcher;
pub use searcher::RunResult;
