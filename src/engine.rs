//! The generational loop and its stopping policies.

use crate::crossover::Crossover;
use crate::encoding::{Chromosome, Population};
use crate::error::Error;
use crate::problem::Problem;
use rand::prelude::*;
use std::time::{Duration, Instant};

/// Which stopping semantics a run binds its bound to. This is the factory
/// selector: the same numeric bound means generations, whole seconds or
/// fitness evaluations depending on the kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopKind {
    Generations,
    TimeLimit,
    Evaluations,
}

impl StopKind {
    pub fn bind(self, bound: u32) -> StopCondition {
        match self {
            StopKind::Generations => StopCondition::Generations(bound),
            StopKind::TimeLimit => StopCondition::TimeLimit(Duration::from_secs(u64::from(bound))),
            StopKind::Evaluations => StopCondition::Evaluations(u64::from(bound)),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StopKind::Generations => "generations",
            StopKind::TimeLimit => "time",
            StopKind::Evaluations => "evaluations",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum StopCondition {
    Generations(u32),
    TimeLimit(Duration),
    Evaluations(u64),
}

impl StopCondition {
    fn satisfied(&self, progress: &Progress) -> bool {
        match *self {
            StopCondition::Generations(bound) => progress.generations >= bound,
            StopCondition::TimeLimit(bound) => progress.started.elapsed() >= bound,
            StopCondition::Evaluations(bound) => progress.evaluations >= bound,
        }
    }
}

// Counters advanced once per generation, owned by a single evolve call.
struct Progress {
    generations: u32,
    evaluations: u64,
    started: Instant,
}

/// A fully configured generational GA: deterministic tournament selection,
/// one crossover operator applied at a fixed rate, independent bit-flip
/// mutation and slot-wise replacement.
#[derive(Clone, Debug)]
pub struct GeneticAlgorithm {
    stop: StopCondition,
    tournament_size: usize,
    crossover: Crossover,
    crossover_rate: f64,
    mutation_rate: f64,
    replacement_rate: f64,
    zero_bound_generation: bool,
}

impl GeneticAlgorithm {
    /// Validates the raw parameters and binds the stopping bound to the
    /// chosen semantics. The tournament's upper limit depends on the
    /// population and is checked when `evolve` first sees one.
    pub fn configure(
        stop_kind: StopKind,
        stop_bound: u32,
        tournament_size: usize,
        crossover_id: u8,
        crossover_rate: f64,
        mutation_rate: f64,
    ) -> Result<Self, Error> {
        let crossover = Crossover::from_id(crossover_id)?;
        check_rate("crossover rate", crossover_rate)?;
        check_rate("mutation rate", mutation_rate)?;
        if tournament_size < 2 {
            return Err(Error::configuration(format!(
                "tournament size {} is below the minimum of 2",
                tournament_size
            )));
        }
        Ok(Self {
            stop: stop_kind.bind(stop_bound),
            tournament_size,
            crossover,
            crossover_rate,
            mutation_rate,
            replacement_rate: 1.0,
            zero_bound_generation: true,
        })
    }

    /// Probability that an offspring takes over its slot each generation.
    /// 1.0 is full generational replacement, the default.
    pub fn replacement_rate(mut self, rate: f64) -> Result<Self, Error> {
        check_rate("replacement rate", rate)?;
        self.replacement_rate = rate;
        Ok(self)
    }

    /// Whether a bound that is already satisfied at generation zero still
    /// runs one generation. Defaults to true: termination is only tested
    /// after a full generation.
    pub fn run_zero_bound_generation(mut self, run: bool) -> Self {
        self.zero_bound_generation = run;
        self
    }

    pub fn crossover(&self) -> Crossover {
        self.crossover
    }

    /// Runs the loop until the stopping condition is satisfied and returns
    /// the per-generation best fitness, in raw internal units. The population
    /// must already be evaluated. The observer sees each finished generation
    /// (0-based index) and must not influence the run.
    pub fn evolve<P, F>(
        &self,
        problem: &P,
        population: &mut Population,
        mut observer: F,
    ) -> Result<Vec<f64>, Error>
    where
        P: Problem + ?Sized,
        F: FnMut(u32, &Population),
    {
        let size = population.len();
        if size == 0 {
            return Err(Error::configuration("cannot evolve an empty population"));
        }
        if self.tournament_size > size {
            return Err(Error::configuration(format!(
                "tournament size {} exceeds population size {}",
                self.tournament_size, size
            )));
        }

        let mut rng = thread_rng();
        let mut trace = Vec::new();
        let mut progress = Progress {
            generations: 0,
            evaluations: 0,
            started: Instant::now(),
        };

        if !self.zero_bound_generation && self.stop.satisfied(&progress) {
            return Ok(trace);
        }

        loop {
            let mut offspring = Vec::with_capacity(size);
            while offspring.len() < size {
                let parent_1 = tournament(&mut rng, population, self.tournament_size);
                let parent_2 = tournament(&mut rng, population, self.tournament_size);

                let (mut child_1, mut child_2) = if rng.gen_bool(self.crossover_rate) {
                    self.crossover.apply(&mut rng, parent_1, parent_2)
                } else {
                    (parent_1.clone(), parent_2.clone())
                };
                mutate(&mut rng, &mut child_1, self.mutation_rate);
                mutate(&mut rng, &mut child_2, self.mutation_rate);

                offspring.push(child_1);
                if offspring.len() < size {
                    offspring.push(child_2);
                }
            }

            let pending = offspring.iter().filter(|c| !c.is_evaluated()).count() as u64;
            let mut brood = Population::new(offspring);
            problem.evaluate(&mut brood);

            for (slot, child) in brood.into_members().into_iter().enumerate() {
                if rng.gen_bool(self.replacement_rate) {
                    population.replace(slot, child);
                }
            }

            trace.push(population.best().fitness());
            observer(progress.generations, population);

            progress.generations += 1;
            progress.evaluations += pending;
            if self.stop.satisfied(&progress) {
                break;
            }
        }

        Ok(trace)
    }
}

fn check_rate(what: &str, rate: f64) -> Result<(), Error> {
    if (0.0..=1.0).contains(&rate) {
        Ok(())
    } else {
        Err(Error::configuration(format!(
            "{} {} outside [0, 1]",
            what, rate
        )))
    }
}

// Best of `size` uniformly drawn members, drawn with replacement.
fn tournament<'a, R: Rng>(rng: &mut R, population: &'a Population, size: usize) -> &'a Chromosome {
    let mut best = population.get(rng.gen_range(0..population.len()));
    for _ in 1..size {
        let challenger = population.get(rng.gen_range(0..population.len()));
        if challenger.fitness() > best.fitness() {
            best = challenger;
        }
    }
    best
}

// Independent bit flips; `set` drops the stale fitness on the first flip.
fn mutate<R: Rng>(rng: &mut R, chromosome: &mut Chromosome, rate: f64) {
    if rate <= 0.0 {
        return;
    }
    for index in 0..chromosome.len() {
        if rng.gen_bool(rate) {
            chromosome.set(index, !chromosome.get(index));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::OnesProblem;

    fn engine(stop_kind: StopKind, bound: u32) -> GeneticAlgorithm {
        GeneticAlgorithm::configure(stop_kind, bound, 2, 1, 1.0, 0.02).unwrap()
    }

    fn evaluated_population(problem: &OnesProblem, size: usize) -> Population {
        let mut population = problem.init_population(size, 0.5).unwrap();
        problem.evaluate(&mut population);
        population
    }

    #[test]
    fn generation_bound_runs_exactly_that_many_generations() {
        let problem = OnesProblem { dimension: 12 };
        let mut population = evaluated_population(&problem, 10);
        let trace = engine(StopKind::Generations, 7)
            .evolve(&problem, &mut population, |_, _| {})
            .unwrap();
        assert_eq!(trace.len(), 7);
        assert_eq!(population.len(), 10);
    }

    #[test]
    fn zero_generation_bound_runs_once() {
        let problem = OnesProblem { dimension: 12 };
        let mut population = evaluated_population(&problem, 10);
        let trace = engine(StopKind::Generations, 0)
            .evolve(&problem, &mut population, |_, _| {})
            .unwrap();
        assert_eq!(trace.len(), 1);
    }

    #[test]
    fn zero_generation_bound_can_run_zero() {
        let problem = OnesProblem { dimension: 12 };
        let mut population = evaluated_population(&problem, 10);
        let trace = engine(StopKind::Generations, 0)
            .run_zero_bound_generation(false)
            .evolve(&problem, &mut population, |_, _| {})
            .unwrap();
        assert!(trace.is_empty());
    }

    #[test]
    fn evaluation_budget_stops_once_consumed() {
        let problem = OnesProblem { dimension: 12 };
        // Crossover rate 1.0 makes every offspring fresh, so each generation
        // consumes exactly one evaluation per slot.
        let mut population = evaluated_population(&problem, 10);
        let trace = engine(StopKind::Evaluations, 10)
            .evolve(&problem, &mut population, |_, _| {})
            .unwrap();
        assert_eq!(trace.len(), 1);

        let mut population = evaluated_population(&problem, 10);
        let trace = engine(StopKind::Evaluations, 11)
            .evolve(&problem, &mut population, |_, _| {})
            .unwrap();
        assert_eq!(trace.len(), 2);
    }

    #[test]
    fn expired_time_budget_still_finishes_the_running_generation() {
        let problem = OnesProblem { dimension: 12 };
        let mut population = evaluated_population(&problem, 10);
        let trace = engine(StopKind::TimeLimit, 0)
            .evolve(&problem, &mut population, |_, _| {})
            .unwrap();
        assert_eq!(trace.len(), 1);
    }

    #[test]
    fn observer_sees_every_generation_in_order() {
        let problem = OnesProblem { dimension: 12 };
        let mut population = evaluated_population(&problem, 10);
        let mut seen = Vec::new();
        engine(StopKind::Generations, 5)
            .evolve(&problem, &mut population, |generation, _| {
                seen.push(generation)
            })
            .unwrap();
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn bad_parameters_are_rejected_at_configuration() {
        assert!(matches!(
            GeneticAlgorithm::configure(StopKind::Generations, 5, 1, 1, 0.8, 0.05),
            Err(Error::Configuration(_))
        ));
        assert!(matches!(
            GeneticAlgorithm::configure(StopKind::Generations, 5, 2, 9, 0.8, 0.05),
            Err(Error::Configuration(_))
        ));
        assert!(matches!(
            GeneticAlgorithm::configure(StopKind::Generations, 5, 2, 1, 1.2, 0.05),
            Err(Error::Configuration(_))
        ));
        assert!(matches!(
            GeneticAlgorithm::configure(StopKind::Generations, 5, 2, 1, 0.8, -0.5),
            Err(Error::Configuration(_))
        ));
        assert!(matches!(
            engine(StopKind::Generations, 5).replacement_rate(1.5),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn oversized_tournament_is_rejected_at_evolve() {
        let problem = OnesProblem { dimension: 12 };
        let mut population = evaluated_population(&problem, 4);
        let engine =
            GeneticAlgorithm::configure(StopKind::Generations, 3, 9, 1, 0.8, 0.05).unwrap();
        assert!(matches!(
            engine.evolve(&problem, &mut population, |_, _| {}),
            Err(Error::Configuration(_))
        ));
    }
}
