//! Multidimensional knapsack: maximize profit under several capacity
//! constraints.
//!
//! The instance reader follows the OR-Library `mknap` token stream:
//! `n m optimal`, then `n` profits, then `m` rows of `n` weights, then the
//! `m` capacities. An `optimal` of zero means the best value is unknown.

use crate::encoding::Chromosome;
use crate::error::Error;
use crate::problem::{LoadInstance, Problem, Sense};
use std::fs;
use std::io::Write;
use std::path::Path;

#[derive(Clone, Debug)]
pub struct KnapsackProblem {
    profits: Vec<f64>,
    weights: Vec<Vec<f64>>,
    capacities: Vec<f64>,
    optimal: Option<f64>,
}

impl KnapsackProblem {
    pub fn new(
        profits: Vec<f64>,
        weights: Vec<Vec<f64>>,
        capacities: Vec<f64>,
    ) -> Result<Self, Error> {
        if profits.is_empty() {
            return Err(Error::configuration("knapsack needs at least one item"));
        }
        if weights.len() != capacities.len() {
            return Err(Error::configuration(
                "knapsack needs one capacity per constraint",
            ));
        }
        if weights.iter().any(|row| row.len() != profits.len()) {
            return Err(Error::configuration(
                "every weight row must cover every item",
            ));
        }
        Ok(Self {
            profits,
            weights,
            capacities,
            optimal: None,
        })
    }

    pub fn profits(&self) -> &[f64] {
        &self.profits
    }

    pub fn num_constraints(&self) -> usize {
        self.capacities.len()
    }

    /// Best known value from the instance file, when one was given.
    pub fn optimal(&self) -> Option<f64> {
        self.optimal
    }

    /// Total amount by which the selection overruns the capacities.
    fn excess(&self, chromosome: &Chromosome) -> f64 {
        let mut excess = 0.0;
        for (row, &capacity) in self.weights.iter().zip(&self.capacities) {
            let load: f64 = row
                .iter()
                .zip(chromosome.bits())
                .filter(|(_, &selected)| selected)
                .map(|(weight, _)| weight)
                .sum();
            if load > capacity {
                excess += load - capacity;
            }
        }
        excess
    }

    fn parse(text: &str) -> Result<Self, String> {
        let mut tokens = text.split_whitespace();
        let mut next = |what: &str| -> Result<f64, String> {
            let token = tokens
                .next()
                .ok_or_else(|| format!("unexpected end of file, expected {}", what))?;
            token
                .parse::<f64>()
                .map_err(|_| format!("expected {} but found {:?}", what, token))
        };

        let num_items = next("item count")? as usize;
        let num_constraints = next("constraint count")? as usize;
        let optimal = next("best known value")?;
        if num_items == 0 || num_constraints == 0 {
            return Err("item and constraint counts must be positive".into());
        }

        let profits = (0..num_items)
            .map(|_| next("item profit"))
            .collect::<Result<Vec<_>, _>>()?;
        let weights = (0..num_constraints)
            .map(|_| (0..num_items).map(|_| next("item weight")).collect())
            .collect::<Result<Vec<Vec<_>>, _>>()?;
        let capacities = (0..num_constraints)
            .map(|_| next("capacity"))
            .collect::<Result<Vec<_>, _>>()?;

        let mut problem = KnapsackProblem::new(profits, weights, capacities)
            .map_err(|error| error.to_string())?;
        if optimal > 0.0 {
            problem.optimal = Some(optimal);
        }
        Ok(problem)
    }
}

impl LoadInstance for KnapsackProblem {
    fn from_instance_file(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path)
            .map_err(|error| Error::instance_parse(path.display().to_string(), error.to_string()))?;
        Self::parse(&text)
            .map_err(|message| Error::instance_parse(path.display().to_string(), message))
    }
}

impl Problem for KnapsackProblem {
    fn dimension(&self) -> usize {
        self.profits.len()
    }

    fn sense(&self) -> Sense {
        Sense::Maximize
    }

    // Feasible selections score their profit sum. Infeasible ones score the
    // negated capacity excess: dropping an item never increases the excess,
    // and any feasible selection outranks every infeasible one.
    fn objective(&self, chromosome: &Chromosome) -> f64 {
        let excess = self.excess(chromosome);
        if excess > 0.0 {
            return -excess;
        }
        self.profits
            .iter()
            .zip(chromosome.bits())
            .filter(|(_, &selected)| selected)
            .map(|(profit, _)| profit)
            .sum()
    }

    fn display_info(&self, out: &mut dyn Write) -> std::io::Result<()> {
        writeln!(
            out,
            "Multidimensional knapsack: {} items, {} constraints",
            self.profits.len(),
            self.num_constraints()
        )?;
        if let Some(optimal) = self.optimal {
            writeln!(out, "Best known value: {}", optimal)?;
        }
        Ok(())
    }
}
