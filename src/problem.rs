//! The capability contract every optimization problem provides to the engine.

use crate::encoding::{Chromosome, Population};
use crate::error::Error;
use rand::distributions::{Bernoulli, Distribution};
use rand::thread_rng;
use std::io::Write;
use std::path::Path;

/// Optimization direction, fixed for an instance's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sense {
    Minimize,
    Maximize,
}

/// Converts an internal fitness into the cost a user sees. Internally the
/// engine always maximizes, so minimization problems store the inverse of the
/// true cost as fitness. This is the single place that inversion is undone;
/// apply it exactly once per reported value.
pub fn reported_cost(fitness: f64, sense: Sense) -> f64 {
    match sense {
        Sense::Minimize => 1.0 / fitness,
        Sense::Maximize => fitness,
    }
}

// The problem side of the engine: how big a solution is, which direction is
// better, and what a given bit assignment is worth.
pub trait Problem {
    fn dimension(&self) -> usize;

    fn sense(&self) -> Sense;

    /// Pure function from a bit assignment to a single fitness number, in
    /// "larger is better" units regardless of the optimization sense.
    fn objective(&self, chromosome: &Chromosome) -> f64;

    fn display_info(&self, out: &mut dyn Write) -> std::io::Result<()>;

    fn is_minimization(&self) -> bool {
        self.sense() == Sense::Minimize
    }

    /// Builds `size` chromosomes of the problem's dimension, each bit set
    /// independently with probability `density`.
    fn init_population(&self, size: usize, density: f64) -> Result<Population, Error> {
        if size == 0 {
            return Err(Error::configuration("population size must be positive"));
        }
        if !(0.0..=1.0).contains(&density) {
            return Err(Error::configuration(format!(
                "bit density {} outside [0, 1]",
                density
            )));
        }
        let coin = Bernoulli::new(density).expect("density range checked above");
        let mut rng = thread_rng();
        let members = (0..size)
            .map(|_| {
                let bits = (0..self.dimension()).map(|_| coin.sample(&mut rng)).collect();
                Chromosome::from_bits(bits)
            })
            .collect();
        Ok(Population::new(members))
    }

    /// Assigns a fitness to every member that lacks one. Members that already
    /// carry a fitness are left alone, so evaluating twice changes nothing.
    fn evaluate(&self, population: &mut Population) {
        for chromosome in population.members_mut() {
            if !chromosome.is_evaluated() {
                let fitness = self.objective(chromosome);
                chromosome.set_fitness(fitness);
            }
        }
    }
}

/// The instance-loader contract: problems that know how to read themselves
/// from an instance file.
pub trait LoadInstance: Sized {
    fn from_instance_file(path: &Path) -> Result<Self, Error>;
}

#[cfg(test)]
pub(crate) use tests::OnesProblem;
