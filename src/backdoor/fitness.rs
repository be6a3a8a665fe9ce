/// The quality of a backdoor candidate: the fraction `rho` of sign cubes
/// decided by propagation alone, the number of hard tasks left over, and the
/// scalar the search minimises, which is exactly `1 - rho`. Comparisons look
/// at the scalar only.
#[derive(Clone, Copy, Debug)]
pub struct Fitness {
    pub fitness: f64,
    pub rho: f64,
    pub num_hard: u64,
}

impl PartialEq for Fitness {
    fn eq(&self, other: &Fitness) -> bool {
        self.fitness == other.fitness
    }
}

impl PartialOrd for Fitness {
    fn partial_cmp(&self, other: &Fitness) -> Option<std::cmp::Ordering> {
        self.fitness.partial_cmp(&other.fitness)
    }
}

impl std::fmt::Display for Fitness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (rho={}, hard={})",
            self.fitness, self.rho, self.num_hard
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_by_the_scalar_only() {
        let better = Fitness {
            fitness: 0.25,
            rho: 0.75,
            num_hard: 4,
        };
        let worse = Fitness {
            fitness: 0.5,
            rho: 0.5,
            num_hard: 8,
        };

        assert!(better < worse);
        assert!(worse > better);
        assert!(better <= better);
        assert_eq!(
            better,
            Fitness {
                fitness: 0.25,
                rho: 0.0,
                num_hard: 0
            }
        );
    }

    #[test]
    fn infinite_fitness_is_worse_than_everything() {
        let empty = Fitness {
            fitness: f64::INFINITY,
            rho: 0.0,
            num_hard: 0,
        };
        let anything = Fitness {
            fitness: 1.0,
            rho: 0.0,
            num_hard: 16,
        };

        assert!(anything < empty);
        assert!(anything <= empty);
    }

    #[test]
    fn display_matches_the_log_format() {
        let fitness = Fitness {
            fitness: 0.5,
            rho: 0.5,
            num_hard: 1,
        };
        assert_eq!(fitness.to_string(), "0.5 (rho=0.5, hard=1)");
    }
}
