use std::collections::HashMap;
use std::time::Instant;

use itertools::Itertools;
use log::debug;
use log::info;
use log::warn;
use rand::rngs::SmallRng;
use rand::Rng;
use rand::SeedableRng;

use crate::backdoor::Fitness;
use crate::backdoor::Instance;
use crate::backdoor::OutputLog;
use crate::burrow_assert_simple;
use crate::engine::SatSolver;
use crate::variables::PropositionalVariable;

/// The best candidate a run produced, its fitness and the iteration of the
/// last strict improvement.
#[derive(Debug)]
pub struct RunResult {
    pub best_instance: Instance,
    pub best_fitness: Fitness,
    pub best_iteration: usize,
}

/// A (1+1) evolutionary search over backdoor candidates. The population is a
/// single instance; each round mutates a copy and keeps it when it is no
/// worse, which admits neutral drift across fitness plateaus. Fitness values
/// are memoized globally, keyed on the canonical variable set, so slot
/// permutations of the same set are priced once.
#[derive(Debug)]
pub struct BackdoorSearcher {
    rng: SmallRng,
    cache: HashMap<Vec<PropositionalVariable>, Fitness>,
    cache_hits: u64,
    cache_misses: u64,
}

impl BackdoorSearcher {
    pub fn new(seed: u64) -> BackdoorSearcher {
        BackdoorSearcher {
            rng: SmallRng::seed_from_u64(seed),
            cache: HashMap::new(),
            cache_hits: 0,
            cache_misses: 0,
        }
    }

    /// Runs the evolutionary search for `num_iterations` rounds and appends
    /// the best-of-run summary to `output`. The generator is reseeded first
    /// when `seed` is given, which makes repeated runs identical. Returns
    /// `None` only when the pool was empty to begin with; a pool shorter
    /// than `instance_size` yields a partial instance that is priced but not
    /// iterated on, since mutation has nothing left to swap with.
    pub fn run(
        &mut self,
        solver: &mut SatSolver,
        output: &mut OutputLog,
        num_iterations: usize,
        instance_size: usize,
        pool: Vec<PropositionalVariable>,
        seed: Option<u64>,
    ) -> Option<RunResult> {
        if let Some(seed) = seed {
            self.rng = SmallRng::seed_from_u64(seed);
        }

        info!("Running EA for {} iterations...", num_iterations);
        info!("instance size: {}", instance_size);
        info!("solver variables: {}", solver.num_variables());
        info!("pool size: {}", pool.len());

        if pool.is_empty() {
            warn!("Pool of variables is empty, cannot run!");
            return None;
        }

        let mut instance = self.initialize(instance_size, pool);
        if instance.pool_is_empty() {
            let fitness = self.calculate_fitness(&mut instance, solver);
            warn!("Pool of variables is empty, cannot run!");
            return Some(RunResult {
                best_instance: instance,
                best_fitness: fitness,
                best_iteration: 0,
            });
        }

        let mut fitness = self.calculate_fitness(&mut instance, solver);
        info!(
            "Initial fitness {} for {} vars: {}",
            fitness,
            instance.num_variables(),
            instance
        );

        let mut best_iteration = 0;
        let mut best = instance.clone();
        let mut best_fitness = fitness;

        for iteration in 1..=num_iterations {
            let start_time = Instant::now();

            let mut mutated = instance.clone();
            self.mutate(&mut mutated);
            let mutated_fitness = self.calculate_fitness(&mut mutated, solver);

            if iteration <= 10
                || (iteration < 1000 && iteration % 100 == 0)
                || (iteration < 10_000 && iteration % 1000 == 0)
                || iteration % 10_000 == 0
            {
                debug!(
                    "[{}/{}] Fitness {} for {} vars {} in {} ms",
                    iteration,
                    num_iterations,
                    mutated_fitness,
                    mutated.num_variables(),
                    mutated,
                    start_time.elapsed().as_millis()
                );
            }

            // Update the best.
            if mutated_fitness < best_fitness {
                best_iteration = iteration;
                best = mutated.clone();
                best_fitness = mutated_fitness;
            }

            // (1+1) strategy: replace the current instance if the mutated
            // one is not worse.
            if mutated_fitness <= fitness {
                instance = mutated;
                fitness = mutated_fitness;
            }
        }

        let best_variables = best.get_variables();
        info!(
            "Best fitness {} on iteration {} with {} variables: [{}]",
            best_fitness,
            best_iteration,
            best_variables.len(),
            best_variables.iter().join(", ")
        );
        output.append_best(&best_fitness, best_iteration, &best_variables);

        info!("Cache hits: {}", self.cache_hits);
        info!("Cache misses: {}", self.cache_misses);

        Some(RunResult {
            best_instance: best,
            best_fitness,
            best_iteration,
        })
    }

    /// Creates the initial candidate by drawing slots from the pool without
    /// replacement. A pool shorter than the slot count fills what it can and
    /// leaves the remaining slots empty.
    fn initialize(&mut self, instance_size: usize, pool: Vec<PropositionalVariable>) -> Instance {
        let mut data: Vec<Option<PropositionalVariable>> = vec![None; instance_size];
        let mut pool: Vec<Option<PropositionalVariable>> = pool.into_iter().map(Some).collect();

        if !pool.is_empty() {
            let mut remaining = pool.len();
            for slot in data.iter_mut() {
                if remaining == 0 {
                    break;
                }
                loop {
                    let pool_index = self.rng.gen_range(0..pool.len());
                    if pool[pool_index].is_some() {
                        std::mem::swap(slot, &mut pool[pool_index]);
                        remaining -= 1;
                        break;
                    }
                }
            }
            pool.retain(|entry| entry.is_some());
        }

        Instance::new(data, pool)
    }

    /// Mutates the candidate by swapping each slot with a random pool entry
    /// at rate `1/size`; one mutated slot per child in expectation. Swapping
    /// is what keeps `data ∪ pool` a fixed multiset.
    fn mutate(&mut self, instance: &mut Instance) {
        let size = instance.len();
        burrow_assert_simple!(size > 0);
        burrow_assert_simple!(instance.num_pool_entries() > 0);

        let mutation_rate = 1.0 / size as f64;
        for slot in 0..size {
            if self.rng.gen::<f64>() < mutation_rate {
                let pool_index = self.rng.gen_range(0..instance.num_pool_entries());
                instance.swap_slot_with_pool(slot, pool_index);
            }
        }
    }

    /// Prices a candidate, going through the global cache first. The cache
    /// key is the sorted variable set, so two slot arrangements of the same
    /// set share one evaluation.
    pub fn calculate_fitness(&mut self, instance: &mut Instance, solver: &mut SatSolver) -> Fitness {
        let key = instance.get_variables();
        if let Some(&fitness) = self.cache.get(&key) {
            self.cache_hits += 1;
            instance.set_cached_fitness(fitness);
            return fitness;
        }

        self.cache_misses += 1;
        let fitness = instance.calculate_fitness(solver);
        let _ = self.cache.insert(key, fitness);
        fitness
    }

    /// Drops all memoized fitness values. Worth doing between outer batches
    /// when the solver state the cache was computed against has changed.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn num_cache_hits(&self) -> u64 {
        self.cache_hits
    }

    pub fn num_cache_misses(&self) -> u64 {
        self.cache_misses
    }
}
