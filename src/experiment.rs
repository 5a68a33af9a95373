//! Batch sweeps: run every combination of a parameter grid several times and
//! summarize the outcomes.

use crate::crossover::Crossover;
use crate::engine::StopKind;
use crate::error::Error;
use crate::problem::Problem;
use crate::runner::{RunConfig, Runner};
use itertools::iproduct;
use serde::Serialize;

#[derive(Clone, Debug)]
pub struct BatchPlan {
    pub crossover_ids: Vec<u8>,
    pub crossover_rates: Vec<f64>,
    pub mutation_rates: Vec<f64>,
    pub repetitions: u32,
}

#[derive(Clone, Debug, Serialize)]
pub struct BatchSummary {
    pub crossover: String,
    pub crossover_rate: f64,
    pub mutation_rate: f64,
    pub repetitions: u32,
    pub best_cost: f64,
    pub mean_cost: f64,
    pub var_cost: f64,
    pub mean_duration_ms: f64,
}

pub fn mean_variance(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values
        .iter()
        .map(|value| {
            let diff = value - mean;
            diff * diff
        })
        .sum::<f64>()
        / n;

    (mean, variance)
}

/// Runs the full grid. Every combination gets `repetitions` fresh runs of a
/// fresh runner; the base config supplies everything the grid does not vary.
pub fn run_batch<P: Problem + Clone>(
    problem: &P,
    instance_file: &str,
    stop_kind: StopKind,
    base: &RunConfig,
    plan: &BatchPlan,
) -> Result<Vec<BatchSummary>, Error> {
    if plan.repetitions == 0 {
        return Err(Error::configuration("repetitions must be positive"));
    }
    if plan.crossover_ids.is_empty()
        || plan.crossover_rates.is_empty()
        || plan.mutation_rates.is_empty()
    {
        return Err(Error::configuration("the parameter grid must not be empty"));
    }

    let minimize = problem.is_minimization();
    let mut summaries = Vec::new();

    for (&crossover_id, &crossover_rate, &mutation_rate) in iproduct!(
        &plan.crossover_ids,
        &plan.crossover_rates,
        &plan.mutation_rates
    ) {
        let crossover = Crossover::from_id(crossover_id)?;
        let config = RunConfig {
            crossover_id,
            crossover_rate,
            mutation_rate,
            ..base.clone()
        };

        let mut costs = Vec::with_capacity(plan.repetitions as usize);
        let mut durations = Vec::with_capacity(plan.repetitions as usize);
        for _ in 0..plan.repetitions {
            let mut runner = Runner::new(problem.clone(), instance_file, stop_kind);
            let result = runner.execute(&config, |_, _| {})?;
            costs.push(result.total_cost);
            durations.push(result.duration.as_millis() as f64);
        }

        let (mean_cost, var_cost) = mean_variance(&costs);
        let (mean_duration_ms, _) = mean_variance(&durations);
        let best_cost = costs
            .iter()
            .copied()
            .reduce(if minimize { f64::min } else { f64::max })
            .expect("repetitions checked positive");

        summaries.push(BatchSummary {
            crossover: crossover.name().to_string(),
            crossover_rate,
            mutation_rate,
            repetitions: plan.repetitions,
            best_cost,
            mean_cost,
            var_cost,
            mean_duration_ms,
        });
    }

    Ok(summaries)
}
