use itertools::Itertools;

use crate::backdoor::enumeration::enumerate_hard_cubes_tree;
use crate::backdoor::Fitness;
use crate::burrow_assert_simple;
use crate::engine::SatSolver;
use crate::variables::PropositionalVariable;

/// A backdoor candidate: a fixed-length vector of slots, each holding a pool
/// variable or nothing, plus the remaining pool. Mutation only ever swaps a
/// slot with a pool entry, so the multiset `data ∪ pool` never changes and
/// two slots can never hold the same variable.
#[derive(Debug)]
pub struct Instance {
    data: Vec<Option<PropositionalVariable>>,
    pool: Vec<Option<PropositionalVariable>>,
    cached_fitness: Option<Fitness>,
}

impl Clone for Instance {
    /// Copying a candidate invalidates its cached fitness; the copy is about
    /// to be mutated.
    fn clone(&self) -> Instance {
        Instance {
            data: self.data.clone(),
            pool: self.pool.clone(),
            cached_fitness: None,
        }
    }
}

impl Instance {
    pub(crate) fn new(
        data: Vec<Option<PropositionalVariable>>,
        pool: Vec<Option<PropositionalVariable>>,
    ) -> Instance {
        Instance {
            data,
            pool,
            cached_fitness: None,
        }
    }

    /// The number of slots, filled or not.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn num_variables(&self) -> usize {
        self.data.iter().flatten().count()
    }

    /// The canonical set form of this candidate: its variables, sorted.
    pub fn get_variables(&self) -> Vec<PropositionalVariable> {
        self.data.iter().flatten().copied().sorted().collect()
    }

    /// The candidate as a membership bitmask over `num_variables` variables;
    /// an alternative cache-key shape.
    pub fn get_bitmask(&self, num_variables: usize) -> Vec<bool> {
        let mut bits = vec![false; num_variables];
        for variable in self.data.iter().flatten() {
            bits[variable.index()] = true;
        }
        bits
    }

    pub(crate) fn num_pool_entries(&self) -> usize {
        self.pool.len()
    }

    pub(crate) fn pool_is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    pub(crate) fn swap_slot_with_pool(&mut self, slot: usize, pool_index: usize) {
        std::mem::swap(&mut self.data[slot], &mut self.pool[pool_index]);
        self.cached_fitness = None;
    }

    #[cfg(test)]
    pub(crate) fn cached_fitness(&self) -> Option<Fitness> {
        self.cached_fitness
    }

    pub(crate) fn set_cached_fitness(&mut self, fitness: Fitness) {
        self.cached_fitness = Some(fitness);
    }

    /// Prices this candidate by enumerating its sign cubes on the kernel
    /// (count only): `rho` is the decided fraction and the scalar is
    /// `1 - rho`. An empty candidate is unusable and gets infinite fitness.
    /// The result is cached on the instance; copies recompute.
    pub fn calculate_fitness(&mut self, solver: &mut SatSolver) -> Fitness {
        if let Some(fitness) = self.cached_fitness {
            return fitness;
        }

        let variables = self.get_variables();
        let fitness = if variables.is_empty() {
            Fitness {
                fitness: f64::INFINITY,
                rho: 0.0,
                num_hard: 0,
            }
        } else {
            burrow_assert_simple!(variables.len() < 64);
            let enumeration = enumerate_hard_cubes_tree(solver, &variables, 0);
            let num_cubes = 1u64 << variables.len();
            let rho = 1.0 - enumeration.num_hard as f64 / num_cubes as f64;
            Fitness {
                fitness: 1.0 - rho,
                rho,
                num_hard: enumeration.num_hard,
            }
        };

        self.cached_fitness = Some(fitness);
        fitness
    }
}

impl std::fmt::Display for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.get_variables().iter().join(","))
    }
}
