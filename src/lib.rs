//! An experimentation harness for solving binary-encoded combinatorial
//! optimization problems with a generational genetic algorithm.
//!
//! A [`problem::Problem`] supplies the encoding dimension, the optimization
//! sense and the fitness function; the [`engine`] runs the evolutionary loop
//! under one of three stopping policies; the [`runner::Runner`] wires both
//! together and normalizes the outcome into a [`runner::RunResult`] that the
//! [`record`] module can persist. The crossover operator applied each
//! generation is picked from the closed family in [`crossover`].

pub mod cli;
pub mod crossover;
pub mod encoding;
pub mod engine;
pub mod error;
pub mod experiment;
pub mod knapsack;
pub mod plot;
pub mod problem;
pub mod record;
pub mod runner;
pub mod set_covering;

pub use crate::error::Error;
