//! Command line surface of the `crossoverstudy` binary.

use crate::engine::StopKind;
use crate::experiment::BatchPlan;
use crate::runner::RunConfig;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

// Populations are seeded at a fixed bit density; the instance dictates the
// dimension, the density stays the same across problems.
const INIT_DENSITY: f64 = 0.25;

#[derive(Parser)]
#[command(name = "crossoverstudy")]
#[command(version, about = "Genetic algorithm experiments on binary combinatorial problems")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Maximize profit on a multidimensional knapsack instance
    Knapsack(RunArgs),
    /// Minimize row cost on a set covering instance
    SetCovering(RunArgs),
    /// Sweep crossover operators and rates on one instance
    Batch(BatchArgs),
}

#[derive(Args, Clone)]
pub struct RunArgs {
    /// Problem instance file
    pub infile: PathBuf,

    /// Population size
    #[arg(short = 'p', long, default_value_t = 100)]
    pub pop_size: usize,

    /// Stopping bound: generations, seconds or evaluations, depending on --stop
    #[arg(short = 'g', long = "epochs", default_value_t = 200)]
    pub epochs: u32,

    /// Probability of applying crossover to a parent pair
    #[arg(short = 'x', long, default_value_t = 0.8)]
    pub crossover_rate: f64,

    /// Independent flip probability per offspring bit
    #[arg(short = 'm', long, default_value_t = 0.05)]
    pub mutation_rate: f64,

    /// Tournament size for parent selection
    #[arg(short = 't', long, default_value_t = 4)]
    pub tour_size: usize,

    /// Crossover operator id (1 one-point, 2 two-point, 3 uniform)
    #[arg(short = 'c', long, default_value_t = 1)]
    pub crossover: u8,

    /// Stopping criterion the bound applies to
    #[arg(long, value_enum, default_value_t = StopArg::Generations)]
    pub stop: StopArg,

    /// Probability that an offspring replaces its slot each generation
    #[arg(long, default_value_t = 1.0)]
    pub replacement_rate: f64,

    /// Append the run record to this CSV file
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Write a convergence chart to this image file
    #[arg(long)]
    pub plot: Option<PathBuf>,
}

#[derive(Args, Clone)]
pub struct BatchArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Which problem the instance file encodes
    #[arg(long, value_enum)]
    pub problem: ProblemArg,

    /// Crossover operator ids to sweep
    #[arg(long, value_delimiter = ',', default_value = "1,2,3")]
    pub crossovers: Vec<u8>,

    /// Crossover rates to sweep; defaults to the single -x value
    #[arg(long, value_delimiter = ',')]
    pub crossover_rates: Vec<f64>,

    /// Mutation rates to sweep; defaults to the single -m value
    #[arg(long, value_delimiter = ',')]
    pub mutation_rates: Vec<f64>,

    /// Runs per parameter combination
    #[arg(long, default_value_t = 5)]
    pub repetitions: u32,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopArg {
    Generations,
    Time,
    Evaluations,
}

impl From<StopArg> for StopKind {
    fn from(value: StopArg) -> Self {
        match value {
            StopArg::Generations => StopKind::Generations,
            StopArg::Time => StopKind::TimeLimit,
            StopArg::Evaluations => StopKind::Evaluations,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProblemArg {
    Knapsack,
    SetCovering,
}

impl RunArgs {
    pub fn stop_kind(&self) -> StopKind {
        self.stop.into()
    }

    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            population_size: self.pop_size,
            init_density: INIT_DENSITY,
            tournament_size: self.tour_size,
            stop_bound: self.epochs,
            crossover_id: self.crossover,
            crossover_rate: self.crossover_rate,
            mutation_rate: self.mutation_rate,
            replacement_rate: self.replacement_rate,
        }
    }
}

impl BatchArgs {
    pub fn plan(&self) -> BatchPlan {
        let or_single = |values: &[f64], single: f64| {
            if values.is_empty() {
                vec![single]
            } else {
                values.to_vec()
            }
        };
        BatchPlan {
            crossover_ids: self.crossovers.clone(),
            crossover_rates: or_single(&self.crossover_rates, self.run.crossover_rate),
            mutation_rates: or_single(&self.mutation_rates, self.run.mutation_rate),
            repetitions: self.repetitions,
        }
    }
}
