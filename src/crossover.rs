//! The crossover operator family. Operators are picked once per run by a
//! numeric id; the id table is closed and an unknown id is a configuration
//! error, never a silent pass-through.

use crate::encoding::Chromosome;
use crate::error::Error;
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Crossover {
    OnePoint,
    TwoPoint,
    Uniform,
}

impl Crossover {
    pub const IDS: [u8; 3] = [1, 2, 3];

    pub fn from_id(id: u8) -> Result<Self, Error> {
        match id {
            1 => Ok(Crossover::OnePoint),
            2 => Ok(Crossover::TwoPoint),
            3 => Ok(Crossover::Uniform),
            _ => Err(Error::configuration(format!(
                "unknown crossover operator id {}",
                id
            ))),
        }
    }

    pub fn id(&self) -> u8 {
        match self {
            Crossover::OnePoint => 1,
            Crossover::TwoPoint => 2,
            Crossover::Uniform => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Crossover::OnePoint => "One-point",
            Crossover::TwoPoint => "Two-point",
            Crossover::Uniform => "Uniform",
        }
    }

    /// Produces two children from two parents of equal length. The parents
    /// are left untouched and the children start without a fitness.
    pub fn apply<R: Rng>(
        &self,
        rng: &mut R,
        parent_1: &Chromosome,
        parent_2: &Chromosome,
    ) -> (Chromosome, Chromosome) {
        assert_eq!(
            parent_1.len(),
            parent_2.len(),
            "crossover parents must have the same length"
        );
        match self {
            Crossover::OnePoint => one_point(rng, parent_1, parent_2),
            Crossover::TwoPoint => two_point(rng, parent_1, parent_2),
            Crossover::Uniform => uniform(rng, parent_1, parent_2),
        }
    }
}

fn one_point<R: Rng>(
    rng: &mut R,
    parent_1: &Chromosome,
    parent_2: &Chromosome,
) -> (Chromosome, Chromosome) {
    let len = parent_1.len();
    let cut = rng.gen_range(0..len);

    let mut bits_1 = Vec::with_capacity(len);
    let mut bits_2 = Vec::with_capacity(len);

    bits_1.extend_from_slice(&parent_1.bits()[..cut]);
    bits_2.extend_from_slice(&parent_2.bits()[..cut]);
    bits_1.extend_from_slice(&parent_2.bits()[cut..]);
    bits_2.extend_from_slice(&parent_1.bits()[cut..]);

    (Chromosome::from_bits(bits_1), Chromosome::from_bits(bits_2))
}

fn two_point<R: Rng>(
    rng: &mut R,
    parent_1: &Chromosome,
    parent_2: &Chromosome,
) -> (Chromosome, Chromosome) {
    let len = parent_1.len();
    let cut_1 = rng.gen_range(0..len);
    let cut_2 = rng.gen_range(cut_1..len);

    let mut bits_1 = Vec::with_capacity(len);
    let mut bits_2 = Vec::with_capacity(len);

    bits_1.extend_from_slice(&parent_1.bits()[..cut_1]);
    bits_2.extend_from_slice(&parent_2.bits()[..cut_1]);
    bits_1.extend_from_slice(&parent_2.bits()[cut_1..cut_2]);
    bits_2.extend_from_slice(&parent_1.bits()[cut_1..cut_2]);
    bits_1.extend_from_slice(&parent_1.bits()[cut_2..]);
    bits_2.extend_from_slice(&parent_2.bits()[cut_2..]);

    (Chromosome::from_bits(bits_1), Chromosome::from_bits(bits_2))
}

fn uniform<R: Rng>(
    rng: &mut R,
    parent_1: &Chromosome,
    parent_2: &Chromosome,
) -> (Chromosome, Chromosome) {
    let len = parent_1.len();
    let mut bits_1 = Vec::with_capacity(len);
    let mut bits_2 = Vec::with_capacity(len);

    for index in 0..len {
        if rng.gen_bool(0.5) {
            bits_1.push(parent_2.get(index));
            bits_2.push(parent_1.get(index));
        } else {
            bits_1.push(parent_1.get(index));
            bits_2.push(parent_2.get(index));
        }
    }

    (Chromosome::from_bits(bits_1), Chromosome::from_bits(bits_2))
}
