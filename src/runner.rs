//! The command-line orchestrator: loads a DIMACS CNF into the kernel, builds
//! the pool of candidate variables and drives the evolutionary search for
//! the requested number of runs.

use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use log::debug;
use log::info;
use log::warn;

use crate::backdoor::BackdoorSearcher;
use crate::backdoor::OutputLog;
use crate::engine::SatSolver;
use crate::variables::Literal;
use crate::variables::PropositionalVariable;

#[derive(Debug, clap::Parser)]
#[command(
    about = "Searches for rho-backdoors of a CNF formula with a (1+1) evolutionary algorithm"
)]
pub struct Cli {
    /// The input formula, in DIMACS CNF format.
    pub instance: PathBuf,

    /// Seed for the evolutionary search.
    #[arg(long = "ea-seed", value_name = "INT", default_value_t = 42)]
    pub seed: u64,

    /// Number of runs of the evolutionary search.
    #[arg(long = "ea-num-runs", value_name = "INT", default_value_t = 1)]
    pub num_runs: usize,

    /// Number of iterations in each run.
    #[arg(long = "ea-num-iters", value_name = "INT", default_value_t = 1000)]
    pub num_iterations: usize,

    /// Number of variable slots in a candidate (the backdoor size target).
    #[arg(long = "ea-instance-size", value_name = "INT", default_value_t = 10)]
    pub instance_size: usize,

    /// Comma-separated list of 0-based variable ids (ranges like `5-9`
    /// allowed) the pool is restricted to.
    #[arg(long = "ea-vars", value_name = "LIST")]
    pub allowed_variables: Option<String>,

    /// Comma-separated list of 0-based variable ids (ranges allowed) to
    /// exclude from the pool.
    #[arg(long = "ea-bans", value_name = "LIST")]
    pub banned_variables: Option<String>,

    /// The append-only log receiving the best backdoor of each run;
    /// truncated at startup.
    #[arg(
        long = "ea-output-path",
        value_name = "FILE",
        default_value = "backdoors.txt"
    )]
    pub output_path: PathBuf,
}

/// Runs the orchestrator and reports the process exit code: 20 when the
/// formula is unsatisfiable on load, 0 otherwise.
pub fn run() -> anyhow::Result<i32> {
    use clap::Parser;

    let args = Cli::parse();
    let start_time = Instant::now();

    let mut solver = SatSolver::default();
    let infeasible = load_formula(&mut solver, &args.instance)?;

    info!("Number of variables: {}", solver.num_variables());
    info!("Number of clauses: {}", solver.num_clauses());

    if infeasible {
        solver.log_statistics();
        eprintln!("UNSATISFIABLE");
        return Ok(20);
    }

    let mut output = OutputLog::create(&args.output_path)
        .with_context(|| format!("Error opening {}", args.output_path.display()))?;

    let allowed = args
        .allowed_variables
        .as_deref()
        .map(parse_index_intervals)
        .transpose()?;
    let banned = args
        .banned_variables
        .as_deref()
        .map(parse_index_intervals)
        .transpose()?
        .unwrap_or_default();

    let pool = build_pool(&solver, allowed.as_deref(), &banned);
    info!("Pool size: {}", pool.len());

    let mut searcher = BackdoorSearcher::new(args.seed);
    for run_index in 1..=args.num_runs {
        info!("=== [{}/{}] ===", run_index, args.num_runs);
        let _ = searcher.run(
            &mut solver,
            &mut output,
            args.num_iterations,
            args.instance_size,
            pool.clone(),
            Some(args.seed),
        );
    }

    info!(
        "Done {} EA runs in {:.3} s",
        args.num_runs,
        start_time.elapsed().as_secs_f64()
    );
    solver.log_statistics();

    Ok(0)
}

/// Parses a DIMACS CNF file into the kernel and returns whether the formula
/// turned out unsatisfiable while posting. File variables are 1-based and
/// become the 0-based kernel variables; the variable count grows past the
/// header if the clauses demand it.
pub(crate) fn load_formula(solver: &mut SatSolver, path: &Path) -> anyhow::Result<bool> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Error reading {}", path.display()))?;
    let parsed = dimacs::parse_dimacs(&contents).map_err(|error| {
        anyhow::anyhow!("Failed to parse DIMACS from {}: {:?}", path.display(), error)
    })?;

    let (num_vars, clauses) = match parsed {
        dimacs::Instance::Cnf { num_vars, clauses } => (num_vars, clauses),
        dimacs::Instance::Sat { .. } => {
            anyhow::bail!("{} is a SAT instance, expected CNF", path.display())
        }
    };

    for _ in 0..num_vars {
        let _ = solver.new_variable();
    }

    for clause in clauses.iter() {
        let mut literals = Vec::with_capacity(clause.lits().len());
        for lit in clause.lits() {
            let index = (lit.var().to_u64() - 1) as u32;
            while solver.num_variables() <= index as usize {
                let _ = solver.new_variable();
            }
            literals.push(Literal::new(
                PropositionalVariable::new(index),
                matches!(lit.sign(), dimacs::Sign::Pos),
            ));
        }

        if solver.add_clause(literals).is_err() {
            return Ok(true);
        }
    }

    Ok(false)
}

/// Builds the pool of candidate variables: every variable of the formula
/// except the "holes" that occur in no stored clause after root-level
/// simplification, the ones already assigned at the root, the banned ones,
/// and (when a whitelist is given) the ones outside it.
pub(crate) fn build_pool(
    solver: &SatSolver,
    allowed: Option<&[u32]>,
    banned: &[u32],
) -> Vec<PropositionalVariable> {
    let num_variables = solver.num_variables();

    let mut occurs = vec![false; num_variables];
    for &reference in solver.get_original_clause_references() {
        for &literal in solver.get_clause(reference).get_literal_slice() {
            occurs[literal.variable().index()] = true;
        }
    }

    let mut is_banned = vec![false; num_variables];
    for &index in banned {
        if (index as usize) < num_variables {
            is_banned[index as usize] = true;
        } else {
            warn!("banned variable {} is not in the formula", index);
        }
    }

    let is_allowed = allowed.map(|allowed| {
        let mut mask = vec![false; num_variables];
        for &index in allowed {
            if (index as usize) < num_variables {
                mask[index as usize] = true;
            } else {
                warn!("allowed variable {} is not in the formula", index);
            }
        }
        mask
    });

    let mut pool = Vec::new();
    for index in 0..num_variables {
        let variable = PropositionalVariable::new(index as u32);

        if let Some(mask) = &is_allowed {
            if !mask[index] {
                continue;
            }
        }
        if !occurs[index] {
            debug!("Skipping hole {}", variable);
            continue;
        }
        if is_banned[index] {
            debug!("Skipping banned variable {}", variable);
            continue;
        }
        if !solver.get_variable_value(variable).is_unknown() {
            debug!(
                "Skipping variable {} already assigned to {}",
                variable,
                solver.get_variable_value(variable)
            );
            continue;
        }

        pool.push(variable);
    }

    pool
}

/// Parses a comma-separated list of 0-based indices with `start-end` ranges;
/// a descending range enumerates downwards, matching the original option
/// syntax.
pub(crate) fn parse_index_intervals(input: &str) -> anyhow::Result<Vec<u32>> {
    let mut result = Vec::new();

    for part in input.split(',') {
        let pieces: Vec<&str> = part.split('-').collect();
        match pieces.as_slice() {
            [single] => {
                result.push(
                    single
                        .trim()
                        .parse()
                        .with_context(|| format!("invalid variable index '{}'", single))?,
                );
            }
            [start, end] => {
                let start: u32 = start
                    .trim()
                    .parse()
                    .with_context(|| format!("invalid range start '{}'", start))?;
                let end: u32 = end
                    .trim()
                    .parse()
                    .with_context(|| format!("invalid range end '{}'", end))?;
                if start <= end {
                    result.extend(start..=end);
                } else {
                    result.extend((end..=start).rev());
                }
            }
            _ => anyhow::bail!("invalid interval '{}'", part),
        }
    }

    Ok(result)
}
