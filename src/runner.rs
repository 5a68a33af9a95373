//! The generic execution harness: wires a problem, a stopping policy and the
//! engine together and normalizes the outcome into a problem-agnostic result.

use crate::encoding::Population;
use crate::engine::{GeneticAlgorithm, StopKind};
use crate::error::Error;
use crate::problem::{reported_cost, LoadInstance, Problem};
use crate::record::RunRecord;
use std::path::Path;
use std::time::{Duration, Instant};

/// Raw run parameters, shared by every stopping-policy variant.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub population_size: usize,
    pub init_density: f64,
    pub tournament_size: usize,
    pub stop_bound: u32,
    pub crossover_id: u8,
    pub crossover_rate: f64,
    pub mutation_rate: f64,
    pub replacement_rate: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            init_density: 0.25,
            tournament_size: 4,
            stop_bound: 200,
            crossover_id: 1,
            crossover_rate: 0.8,
            mutation_rate: 0.05,
            replacement_rate: 1.0,
        }
    }
}

/// The normalized outcome of one run. Costs and the convergence series are in
/// true problem units; the minimization inversion has already been undone,
/// exactly once, by the harness.
#[derive(Clone, Debug)]
pub struct RunResult {
    pub instance_file: String,
    /// 1-based indices of the selected items or rows, ascending.
    pub selected: Vec<usize>,
    pub total_cost: f64,
    pub duration: Duration,
    pub convergence: Vec<f64>,
}

impl RunResult {
    pub fn solution_size(&self) -> usize {
        self.selected.len()
    }

    pub fn formatted_solution(&self) -> String {
        self.selected
            .iter()
            .map(|index| index.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// The file name under which an instance is reported and recorded.
pub fn instance_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub struct Runner<P> {
    problem: P,
    instance_file: String,
    stop_kind: StopKind,
    result: Option<RunResult>,
}

impl<P: Problem> Runner<P> {
    pub fn new(problem: P, instance_file: impl Into<String>, stop_kind: StopKind) -> Self {
        Self {
            problem,
            instance_file: instance_file.into(),
            stop_kind,
            result: None,
        }
    }

    pub fn from_file(path: &Path, stop_kind: StopKind) -> Result<Self, Error>
    where
        P: LoadInstance,
    {
        let problem = P::from_instance_file(path)?;
        Ok(Self::new(problem, instance_label(path), stop_kind))
    }

    pub fn problem(&self) -> &P {
        &self.problem
    }

    pub fn stop_kind(&self) -> StopKind {
        self.stop_kind
    }

    /// Runs the whole pipeline: population setup, evolution with wall-clock
    /// timing, and extraction of the best solution.
    pub fn execute<F>(&mut self, config: &RunConfig, observer: F) -> Result<&RunResult, Error>
    where
        F: FnMut(u32, &Population),
    {
        let mut population = self
            .problem
            .init_population(config.population_size, config.init_density)?;
        self.problem.evaluate(&mut population);

        let engine = GeneticAlgorithm::configure(
            self.stop_kind,
            config.stop_bound,
            config.tournament_size,
            config.crossover_id,
            config.crossover_rate,
            config.mutation_rate,
        )?
        .replacement_rate(config.replacement_rate)?;

        let started = Instant::now();
        let trace = engine.evolve(&self.problem, &mut population, observer)?;
        let duration = started.elapsed();

        let sense = self.problem.sense();
        let best = population.best();
        self.result = Some(RunResult {
            instance_file: self.instance_file.clone(),
            selected: best.ones(),
            total_cost: reported_cost(best.fitness(), sense),
            duration,
            convergence: trace
                .iter()
                .map(|&fitness| reported_cost(fitness, sense))
                .collect(),
        });
        Ok(self.result.as_ref().expect("result stored above"))
    }

    fn executed(&self) -> Result<&RunResult, Error> {
        self.result
            .as_ref()
            .ok_or(Error::State("run results are not available before execute"))
    }

    pub fn result(&self) -> Result<&RunResult, Error> {
        self.executed()
    }

    pub fn solution_size(&self) -> Result<usize, Error> {
        Ok(self.executed()?.solution_size())
    }

    pub fn total_cost(&self) -> Result<f64, Error> {
        Ok(self.executed()?.total_cost)
    }

    pub fn formatted_solution(&self) -> Result<String, Error> {
        Ok(self.executed()?.formatted_solution())
    }

    /// The persistence row for this run. Only available after `execute`.
    pub fn record(&self, problem_name: &str, config: &RunConfig) -> Result<RunRecord, Error> {
        let result = self.executed()?;
        RunRecord::new(problem_name, self.stop_kind, config, result)
    }
}
